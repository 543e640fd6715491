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

//! RDS backups. Creating one is a three-step dance: read the instance
//! attributes to pick a backup method the engine supports, start the job,
//! then poll the job until it resolves to a backup id.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{BackupMode, BackupStatus, CloudResource, plan_backup};
use crate::aliyun::utils::de_opt_time;
use crate::aliyun::wait::{self, Probe};

const BACKUP_JOB_INTERVAL: Duration = Duration::from_secs(10);
const BACKUP_JOB_TIMEOUT: Duration = Duration::from_secs(40 * 60);

/// A backup as `DescribeBackups` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DbBackup {
    pub backup_id: String,
    #[serde(rename = "DBInstanceId")]
    pub db_instance_id: String,
    #[serde(deserialize_with = "de_opt_time")]
    pub backup_start_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "de_opt_time")]
    pub backup_end_time: Option<DateTime<Utc>>,
    /// `Manual` or `Automated`.
    pub backup_mode: String,
    /// `Success`, `Failed`, or a transitional value.
    pub backup_status: String,
    /// `Physical`, `Logical` or `Snapshot`.
    pub backup_method: String,
    /// Bytes.
    pub backup_size: i64,
    #[serde(rename = "BackupDBNames")]
    pub backup_db_names: String,
}

impl DbBackup {
    pub fn state(&self) -> BackupStatus {
        BackupStatus::from_vendor(&self.backup_status)
    }

    pub fn mode(&self) -> BackupMode {
        BackupMode::from_vendor(&self.backup_mode)
    }

    /// Size in MiB, rounded up so a non-empty backup never reports zero.
    pub fn size_mb(&self) -> i64 {
        (self.backup_size + (1 << 20) - 1) >> 20
    }

    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.db_backup(&self.db_instance_id, &self.backup_id).await?;
        Ok(())
    }
}

impl CloudResource for DbBackup {
    fn id(&self) -> &str {
        &self.backup_id
    }

    fn name(&self) -> String {
        self.backup_id.clone()
    }

    fn global_id(&self) -> String {
        self.backup_id.clone()
    }

    fn status(&self) -> &'static str {
        self.state().as_str()
    }
}

/// The attribute subset backup planning needs, from
/// `DescribeDBInstanceAttribute`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DbInstanceAttribute {
    #[serde(rename = "DBInstanceId")]
    pub db_instance_id: String,
    pub engine: String,
    pub engine_version: String,
    /// Storage category, e.g. `cloud_essd`, `local_ssd`.
    #[serde(rename = "DBInstanceStorageType")]
    pub storage_type: String,
    /// HA category, e.g. `Basic`, `HighAvailability`.
    pub category: String,
}

/// One row of `DescribeBackupTasks`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct BackupJob {
    backup_status: String,
    #[serde(rename = "BackupId")]
    backup_id: String,
}

impl Region {
    pub async fn db_instance_attribute(&self, db_instance_id: &str) -> Result<DbInstanceAttribute> {
        let mut p = ParamMap::new();
        p.set("DBInstanceId", db_instance_id);
        let doc = self.rds("DescribeDBInstanceAttribute", p).await?;
        let items: Vec<DbInstanceAttribute> =
            doc.unmarshal_or_default(&["Items", "DBInstanceAttribute"])?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("db instance {db_instance_id}")))
    }

    pub async fn db_backups(&self, db_instance_id: &str) -> Result<Vec<DbBackup>> {
        paging::collect_indexed(50, async |page, size| {
            let mut p = ParamMap::new();
            p.set("DBInstanceId", db_instance_id);
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            let doc = self.rds("DescribeBackups", p).await?;
            // RDS spells the total TotalRecordCount; tolerate the common
            // spelling too.
            let total = doc.int_or(&["TotalRecordCount"], doc.int_or(&["TotalCount"], 0));
            Ok(Page::new(
                doc.unmarshal_or_default(&["Items", "Backup"])?,
                total as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing backups of {db_instance_id}")))
    }

    pub async fn db_backup(&self, db_instance_id: &str, backup_id: &str) -> Result<DbBackup> {
        let mut p = ParamMap::new();
        p.set("DBInstanceId", db_instance_id);
        p.set("BackupId", backup_id);
        let doc = self.rds("DescribeBackups", p).await?;
        let items: Vec<DbBackup> = doc.unmarshal_or_default(&["Items", "Backup"])?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("backup {backup_id} of {db_instance_id}")))
    }

    /// Starts a backup, waits for the job to finish (10s cadence, 40min
    /// ceiling) and returns the finished backup. The method is picked from
    /// the instance's engine and storage; `databases` narrows MySQL logical
    /// backups to a whitelist.
    pub async fn create_db_backup(
        &self,
        db_instance_id: &str,
        databases: &[String],
    ) -> Result<DbBackup> {
        let attr = self.db_instance_attribute(db_instance_id).await?;
        let plan = plan_backup(
            &attr.engine,
            &attr.engine_version,
            &attr.storage_type,
            &attr.category,
            databases,
        );
        let mut p = ParamMap::new();
        p.set("DBInstanceId", db_instance_id);
        p.set("BackupMethod", plan.method.as_str());
        p.opt("BackupStrategy", plan.strategy);
        p.opt("DBName", plan.db_names);
        let doc = self.rds("CreateBackup", p).await?;
        let job_id = doc.str_at(&["BackupJobId"])?;

        let backup_id = wait::poll_until(
            BACKUP_JOB_INTERVAL,
            BACKUP_JOB_TIMEOUT,
            &format!("backup job {job_id} of {db_instance_id}"),
            async || {
                let mut p = ParamMap::new();
                p.set("DBInstanceId", db_instance_id);
                p.set("BackupJobId", job_id.clone());
                let doc = self.rds("DescribeBackupTasks", p).await?;
                let jobs: Vec<BackupJob> = doc.unmarshal_or_default(&["Items", "BackupJob"])?;
                match jobs.into_iter().next() {
                    Some(job) if job.backup_status == "Finished" => {
                        if job.backup_id.is_empty() {
                            // A finished job without a backup id cannot be
                            // resolved; retrying will not change it.
                            return Err(Error::BadResponse {
                                path: "Items.BackupJob.BackupId".into(),
                                detail: format!("missing backup id for job {job_id}"),
                            });
                        }
                        Ok(Probe::Done(job.backup_id))
                    }
                    _ => Ok(Probe::Pending),
                }
            },
        )
        .await?;

        self.db_backup(db_instance_id, &backup_id).await
    }

    /// Deleting an absent backup is a successful no-op.
    pub async fn delete_db_backup(&self, db_instance_id: &str, backup_id: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("DBInstanceId", db_instance_id);
        p.set("BackupId", backup_id);
        match self.rds("DeleteBackup", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
