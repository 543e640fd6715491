// Aliyun Resource Adapter for Rust
// Copyright 2026 the aliyun-adapter authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The synthesized layer-2 wire: one per (VPC, zone) pair, so a uniform
//! compute-plus-network topology holds even though the vendor has none.

use crate::aliyun::WIRE_BANDWIDTH_MBPS;
use crate::aliyun::error::Result;
use crate::aliyun::region::{Region, VSwitch, Vpc};
use crate::aliyun::types::CloudResource;

/// One emulated wire per (VPC, zone); identity `<vpc-id>-<zone-id>`.
#[derive(Clone, Debug)]
pub struct Wire {
    region: Region,
    vpc: Vpc,
    zone_id: String,
}

impl Wire {
    pub(crate) fn new(region: Region, vpc: Vpc, zone_id: String) -> Self {
        Self {
            region,
            vpc,
            zone_id,
        }
    }

    pub fn vpc_id(&self) -> &str {
        &self.vpc.vpc_id
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn bandwidth_mbps(&self) -> u32 {
        WIRE_BANDWIDTH_MBPS
    }

    pub fn is_emulated(&self) -> bool {
        true
    }

    /// The wire's networks: the VPC's vswitches located in this zone.
    pub async fn networks(&self) -> Result<Vec<VSwitch>> {
        self.region
            .vswitches(Some(&self.vpc.vpc_id), Some(&self.zone_id))
            .await
    }
}

impl CloudResource for Wire {
    fn id(&self) -> &str {
        &self.vpc.vpc_id
    }

    fn name(&self) -> String {
        let vpc_name = if self.vpc.vpc_name.is_empty() {
            &self.vpc.vpc_id
        } else {
            &self.vpc.vpc_name
        };
        format!("{}-{}", vpc_name, self.zone_id)
    }

    fn global_id(&self) -> String {
        format!("{}-{}", self.vpc.vpc_id, self.zone_id)
    }

    fn status(&self) -> &'static str {
        "available"
    }
}
