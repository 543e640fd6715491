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

//! Availability zones, and the synthesized host / storage pools they carry.

use serde::Deserialize;

use crate::aliyun::host::Host;
use crate::aliyun::region::Region;
use crate::aliyun::storage::StoragePool;
use crate::aliyun::types::CloudResource;

/// A zone as `DescribeZones` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ZoneData {
    pub zone_id: String,
    pub local_name: String,
    pub available_disk_categories: DiskCategories,
    pub available_instance_types: InstanceTypes,
    pub available_resource_creation: ResourceCreation,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiskCategories {
    #[serde(rename = "DiskCategories")]
    pub disk_categories: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct InstanceTypes {
    #[serde(rename = "InstanceTypes")]
    pub instance_types: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResourceCreation {
    #[serde(rename = "ResourceTypes")]
    pub resource_types: Vec<String>,
}

/// One availability zone. Synthesizes exactly one [`Host`] and one
/// [`StoragePool`] per offered disk category.
#[derive(Clone, Debug)]
pub struct Zone {
    region: Region,
    data: ZoneData,
}

impl Zone {
    pub(crate) fn new(region: Region, data: ZoneData) -> Self {
        Self { region, data }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn zone_id(&self) -> &str {
        &self.data.zone_id
    }

    pub fn local_name(&self) -> &str {
        &self.data.local_name
    }

    pub fn available_disk_categories(&self) -> &[String] {
        &self.data.available_disk_categories.disk_categories
    }

    pub fn available_instance_types(&self) -> &[String] {
        &self.data.available_instance_types.instance_types
    }

    /// The synthesized host for this zone.
    pub fn host(&self) -> Host {
        Host::new(
            self.region.clone(),
            self.data.zone_id.clone(),
            self.data.local_name.clone(),
        )
    }

    /// One synthesized storage pool per disk category the zone offers.
    pub fn storage_pools(&self) -> Vec<StoragePool> {
        self.available_disk_categories()
            .iter()
            .map(|category| {
                StoragePool::new(
                    self.region.clone(),
                    self.data.zone_id.clone(),
                    category.clone(),
                )
            })
            .collect()
    }
}

impl CloudResource for Zone {
    fn id(&self) -> &str {
        &self.data.zone_id
    }

    fn name(&self) -> String {
        if self.data.local_name.is_empty() {
            self.data.zone_id.clone()
        } else {
            self.data.local_name.clone()
        }
    }

    fn global_id(&self) -> String {
        self.data.zone_id.clone()
    }

    fn status(&self) -> &'static str {
        "available"
    }
}
