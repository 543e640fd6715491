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

//! The synthesized hypervisor host.
//!
//! The vendor has no per-host identity, so the adapter presents one
//! always-online host per availability zone. Physical attributes are zero;
//! only the logical ones (type, manufacturer, identity) carry meaning.

use crate::aliyun::PROVIDER;
use crate::aliyun::error::Result;
use crate::aliyun::instance::{Instance, VmCreateOptions};
use crate::aliyun::region::Region;
use crate::aliyun::types::CloudResource;

/// One emulated host per zone; identity `<account-id>-<zone-id>`.
#[derive(Clone, Debug)]
pub struct Host {
    region: Region,
    zone_id: String,
    zone_name: String,
}

impl Host {
    pub(crate) fn new(region: Region, zone_id: String, zone_name: String) -> Self {
        Self {
            region,
            zone_id,
            zone_name,
        }
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn is_emulated(&self) -> bool {
        true
    }

    pub fn enabled(&self) -> bool {
        true
    }

    pub fn manufacturer(&self) -> &'static str {
        PROVIDER
    }

    pub fn host_type(&self) -> &'static str {
        PROVIDER
    }

    /// Physical sizes are not meaningful on an emulated host.
    pub fn cpu_count(&self) -> u32 {
        0
    }

    pub fn memory_mb(&self) -> u32 {
        0
    }

    pub fn storage_gb(&self) -> u32 {
        0
    }

    /// VMs running in this host's zone.
    pub async fn vms(&self) -> Result<Vec<Instance>> {
        self.region.instances(Some(&self.zone_id), &[]).await
    }

    /// Creates a VM in this zone and returns it once it is visible. The
    /// zone on the options is overridden by the host's own zone.
    pub async fn create_vm(&self, mut options: VmCreateOptions) -> Result<Instance> {
        options.zone_id = self.zone_id.clone();
        let instance_id = self.region.create_vm(options).await?;
        self.region.instance(&instance_id).await
    }
}

impl CloudResource for Host {
    fn id(&self) -> &str {
        &self.zone_id
    }

    fn name(&self) -> String {
        self.zone_name.clone()
    }

    fn global_id(&self) -> String {
        format!("{}-{}", self.region.account_id(), self.zone_id)
    }

    fn status(&self) -> &'static str {
        "running"
    }
}
