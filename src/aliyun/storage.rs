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

//! The synthesized storage pool: one per (zone, disk category). Creating a
//! disk through a pool fixes the disk's zone and category.

use crate::aliyun::disk::{Disk, DiskCreateOptions};
use crate::aliyun::error::Result;
use crate::aliyun::region::Region;
use crate::aliyun::types::CloudResource;

/// One virtual pool per (zone, disk category); identity
/// `<zone-id>-<category>`. Capacity is virtual (zero), status always
/// available.
#[derive(Clone, Debug)]
pub struct StoragePool {
    region: Region,
    zone_id: String,
    category: String,
}

impl StoragePool {
    pub(crate) fn new(region: Region, zone_id: String, category: String) -> Self {
        Self {
            region,
            zone_id,
            category,
        }
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// The canonical storage class this pool carves disks from.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_emulated(&self) -> bool {
        true
    }

    pub fn capacity_gb(&self) -> u64 {
        0
    }

    /// Disks of this pool's category in this pool's zone.
    pub async fn disks(&self) -> Result<Vec<Disk>> {
        let disks = self
            .region
            .disks(Some(&self.zone_id), None, &[])
            .await?;
        Ok(disks
            .into_iter()
            .filter(|d| d.canonical_category() == self.category)
            .collect())
    }

    /// Creates a disk in this pool and returns its id.
    pub async fn create_disk(&self, name: &str, size_gb: u32) -> Result<String> {
        self.region
            .create_disk(DiskCreateOptions {
                zone_id: self.zone_id.clone(),
                category: self.category.clone(),
                name: name.to_string(),
                size_gb,
                snapshot_id: None,
                description: String::new(),
            })
            .await
    }
}

impl CloudResource for StoragePool {
    fn id(&self) -> &str {
        &self.zone_id
    }

    fn name(&self) -> String {
        format!("{}-{}", self.zone_id, self.category)
    }

    fn global_id(&self) -> String {
        format!("{}-{}", self.zone_id, self.category)
    }

    fn status(&self) -> &'static str {
        "available"
    }
}
