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

//! Block disks.
//!
//! The attached-disk listing of an instance carries a total order the
//! orchestrator relies on: system disk first, then swap, then data disks by
//! ascending attach time. [`sort_attached`] is that order.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{
    ChargeType, CloudResource, DiskRole, DiskStatus, canonical_disk_category,
    expand_disk_category,
};
use crate::aliyun::utils;
use crate::aliyun::wait::{self, Probe};

const DELETE_INTERVAL: Duration = Duration::from_secs(10);
const DELETE_TIMEOUT: Duration = Duration::from_secs(300);

const CONFLICT_CODES: &[&str] = &["InvalidOperation.Conflict"];
const CONFLICT_RETRIES: u32 = 4;
const CONFLICT_DELAY: Duration = Duration::from_secs(10);

const INIT_CODES: &[&str] = &["IncorrectDiskStatus.Initializing", "IncorrectDiskStatus"];

/// A disk as `DescribeDisks` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Disk {
    pub disk_id: String,
    pub disk_name: String,
    /// Vendor status string; see [`Disk::state`].
    pub status: String,
    /// Vendor category (`cloud_essd`, ...); pair with `performance_level`
    /// through [`Disk::canonical_category`].
    pub category: String,
    pub performance_level: String,
    pub size: u32,
    /// Vendor role: `system` or `data`.
    #[serde(rename = "Type")]
    pub disk_type: String,
    pub instance_id: String,
    pub device: String,
    pub zone_id: String,
    pub delete_with_instance: bool,
    pub encrypted: bool,
    pub disk_charge_type: String,
    pub source_snapshot_id: String,
    pub image_id: String,
    #[serde(deserialize_with = "utils::de_opt_time")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "utils::de_opt_time")]
    pub attached_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "utils::de_opt_time")]
    pub detached_time: Option<DateTime<Utc>>,
}

impl Disk {
    pub fn state(&self) -> DiskStatus {
        DiskStatus::from_vendor(&self.status)
    }

    pub fn role(&self) -> DiskRole {
        DiskRole::from_vendor(&self.disk_type)
    }

    pub fn charge_type(&self) -> ChargeType {
        ChargeType::from_vendor(&self.disk_charge_type)
    }

    /// The canonical storage class, folding the performance level back in.
    pub fn canonical_category(&self) -> String {
        canonical_disk_category(&self.category, &self.performance_level)
    }

    pub fn is_attached(&self) -> bool {
        !self.instance_id.is_empty()
    }

    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.disk(&self.disk_id).await?;
        Ok(())
    }
}

impl CloudResource for Disk {
    fn id(&self) -> &str {
        &self.disk_id
    }

    fn name(&self) -> String {
        if self.disk_name.is_empty() {
            self.disk_id.clone()
        } else {
            self.disk_name.clone()
        }
    }

    fn global_id(&self) -> String {
        self.disk_id.clone()
    }

    fn status(&self) -> &'static str {
        self.state().as_str()
    }
}

/// Sorts an instance's disks into the canonical order: role precedence
/// system < swap < data, then ascending attach time within a role.
pub fn sort_attached(disks: &mut [Disk]) {
    disks.sort_by_key(|d| (d.role().order(), d.attached_time));
}

/// Canonical disk-create request.
#[derive(Clone, Debug, Default)]
pub struct DiskCreateOptions {
    pub zone_id: String,
    /// Canonical storage class; expanded at encode time.
    pub category: String,
    pub name: String,
    pub description: String,
    pub size_gb: u32,
    pub snapshot_id: Option<String>,
}

impl Region {
    /// Disks, optionally filtered by zone, attached instance and ids.
    /// Paged at the endpoint cap of 500.
    pub async fn disks(
        &self,
        zone_id: Option<&str>,
        instance_id: Option<&str>,
        disk_ids: &[&str],
    ) -> Result<Vec<Disk>> {
        paging::collect_indexed(500, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            p.opt("ZoneId", zone_id);
            p.opt("InstanceId", instance_id);
            p.set_json_list("DiskIds", disk_ids);
            let doc = self.ecs("DescribeDisks", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Disks", "Disk"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing disks in {}", self.id())))
    }

    pub async fn disk(&self, disk_id: &str) -> Result<Disk> {
        self.disks(None, None, &[disk_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("disk {disk_id}")))
    }

    /// An instance's disks in the canonical total order.
    pub async fn instance_disks(&self, instance_id: &str) -> Result<Vec<Disk>> {
        let mut disks = self.disks(None, Some(instance_id), &[]).await?;
        sort_attached(&mut disks);
        Ok(disks)
    }

    /// Creates a disk and returns its id.
    pub async fn create_disk(&self, options: DiskCreateOptions) -> Result<String> {
        let wire = expand_disk_category(&options.category);
        let mut p = ParamMap::new();
        p.set("ZoneId", options.zone_id);
        p.set("DiskCategory", wire.category);
        p.opt("PerformanceLevel", wire.performance_level);
        if wire.bursting {
            p.set_bool("BurstingEnabled", true);
        }
        p.set("DiskName", options.name);
        p.opt("Description", Some(options.description));
        p.set("Size", options.size_gb.to_string());
        p.opt("SnapshotId", options.snapshot_id);
        p.client_token();
        let doc = self.ecs("CreateDisk", p).await?;
        doc.str_at(&["DiskId"])
    }

    /// Deletes a disk and waits until it is gone. An already-absent disk is
    /// an immediate successful no-op (no delete call is issued); while the
    /// disk initialises, the delete is retried with back-off.
    pub async fn delete_disk(&self, disk_id: &str) -> Result<()> {
        match self.disk(disk_id).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        }
        wait::retry_on_codes(INIT_CODES, CONFLICT_RETRIES, CONFLICT_DELAY, async || {
            let mut p = ParamMap::new();
            p.set("DiskId", disk_id);
            self.ecs("DeleteDisk", p).await.map(|_| ())
        })
        .await?;
        wait::poll_until(
            DELETE_INTERVAL,
            DELETE_TIMEOUT,
            &format!("disk {disk_id} to be deleted"),
            async || match self.disk(disk_id).await {
                Ok(_) => Ok(Probe::Pending),
                Err(e) if e.is_not_found() => Ok(Probe::Done(())),
                Err(e) => Err(e),
            },
        )
        .await
    }

    /// Online-resizes a disk to `size_gb`.
    pub async fn resize_disk(&self, disk_id: &str, size_gb: u32) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("DiskId", disk_id);
        p.set("NewSize", size_gb.to_string());
        p.set("Type", "online");
        p.client_token();
        self.ecs("ResizeDisk", p).await?;
        Ok(())
    }

    /// Attaches a disk, retrying through transient attach conflicts.
    pub async fn attach_disk(&self, instance_id: &str, disk_id: &str) -> Result<()> {
        wait::retry_on_codes(
            CONFLICT_CODES,
            CONFLICT_RETRIES,
            CONFLICT_DELAY,
            async || {
                let mut p = ParamMap::new();
                p.set("InstanceId", instance_id);
                p.set("DiskId", disk_id);
                self.ecs("AttachDisk", p).await.map(|_| ())
            },
        )
        .await
        .map_err(|e| e.ctx(format!("attaching disk {disk_id} to {instance_id}")))
    }

    /// Detaches a disk, retrying through transient detach conflicts.
    /// Detaching an already-detached disk is a successful no-op.
    pub async fn detach_disk(&self, instance_id: &str, disk_id: &str) -> Result<()> {
        let disk = match self.disk(disk_id).await {
            Ok(d) => d,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };
        if !disk.is_attached() {
            return Ok(());
        }
        wait::retry_on_codes(
            CONFLICT_CODES,
            CONFLICT_RETRIES,
            CONFLICT_DELAY,
            async || {
                let mut p = ParamMap::new();
                p.set("InstanceId", instance_id);
                p.set("DiskId", disk_id);
                self.ecs("DetachDisk", p).await.map(|_| ())
            },
        )
        .await
        .map_err(|e| e.ctx(format!("detaching disk {disk_id} from {instance_id}")))
    }
}
