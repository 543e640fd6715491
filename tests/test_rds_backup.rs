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

mod common;

use aliyun_adapter::aliyun::{CloudResource, ProductFamily};
use common::region;
use serde_json::{Value, json};

fn attribute_body(engine: &str, version: &str, storage: &str, category: &str) -> Value {
    json!({
        "Items": { "DBInstanceAttribute": [{
            "DBInstanceId": "rm-1",
            "Engine": engine,
            "EngineVersion": version,
            "DBInstanceStorageType": storage,
            "Category": category
        }]}
    })
}

fn job_body(status: &str, backup_id: &str) -> Value {
    json!({
        "Items": { "BackupJob": [{
            "BackupStatus": status,
            "BackupId": backup_id,
            "BackupJobId": "job-1"
        }]}
    })
}

#[tokio::test(start_paused = true)]
async fn mysql_on_essd_ha_snapshots_and_resolves_the_backup() {
    let (gateway, region) = region();
    gateway
        .reply(
            ProductFamily::Rds,
            "DescribeDBInstanceAttribute",
            attribute_body("MySQL", "8.0", "cloud_essd", "HighAvailability"),
        )
        .reply(ProductFamily::Rds, "CreateBackup", json!({ "BackupJobId": "job-1" }))
        .reply(ProductFamily::Rds, "DescribeBackupTasks", job_body("Checking", ""))
        .reply(ProductFamily::Rds, "DescribeBackupTasks", job_body("Finished", "b-9"))
        .reply(
            ProductFamily::Rds,
            "DescribeBackups",
            json!({
                "TotalRecordCount": 1,
                "Items": { "Backup": [{
                    "BackupId": "b-9",
                    "DBInstanceId": "rm-1",
                    "BackupMode": "Manual",
                    "BackupStatus": "Success",
                    "BackupMethod": "Snapshot",
                    "BackupSize": 1048577i64,
                    "BackupStartTime": "2026-08-29T02:00:00Z",
                    "BackupEndTime": "2026-08-29T02:05:00Z"
                }]}
            }),
        );

    let backup = region.create_db_backup("rm-1", &[]).await.unwrap();
    assert_eq!(backup.backup_id, "b-9");
    assert_eq!(backup.status(), "ready");
    assert_eq!(backup.size_mb(), 2);

    let create = &gateway.calls_for("CreateBackup")[0];
    assert_eq!(create.param("BackupMethod"), Some("Snapshot"));
    assert_eq!(create.param("BackupStrategy"), None);
    assert_eq!(create.param("DBName"), None);
    // One pending probe, one finished probe.
    assert_eq!(gateway.call_count("DescribeBackupTasks"), 2);
}

#[tokio::test(start_paused = true)]
async fn whitelisted_mysql_goes_logical_with_a_db_list() {
    let (gateway, region) = region();
    gateway
        .reply(
            ProductFamily::Rds,
            "DescribeDBInstanceAttribute",
            attribute_body("MySQL", "5.6", "local_ssd", "Basic"),
        )
        .reply(ProductFamily::Rds, "CreateBackup", json!({ "BackupJobId": "job-1" }))
        .reply(ProductFamily::Rds, "DescribeBackupTasks", job_body("Finished", "b-1"))
        .reply(
            ProductFamily::Rds,
            "DescribeBackups",
            json!({
                "TotalRecordCount": 1,
                "Items": { "Backup": [{ "BackupId": "b-1", "DBInstanceId": "rm-1" }]}
            }),
        );

    let databases = vec!["orders".to_string(), "billing".to_string()];
    region.create_db_backup("rm-1", &databases).await.unwrap();

    let create = &gateway.calls_for("CreateBackup")[0];
    assert_eq!(create.param("BackupMethod"), Some("Logical"));
    assert_eq!(create.param("BackupStrategy"), Some("db"));
    assert_eq!(create.param("DBName"), Some("orders,billing"));
}

#[tokio::test(start_paused = true)]
async fn finished_job_without_a_backup_id_is_fatal() {
    let (gateway, region) = region();
    gateway
        .reply(
            ProductFamily::Rds,
            "DescribeDBInstanceAttribute",
            attribute_body("PostgreSQL", "14.0", "cloud_essd", "Basic"),
        )
        .reply(ProductFamily::Rds, "CreateBackup", json!({ "BackupJobId": "job-2" }))
        .reply(ProductFamily::Rds, "DescribeBackupTasks", job_body("Finished", ""));

    let err = region.create_db_backup("rm-1", &[]).await.unwrap_err();
    assert!(err.to_string().contains("missing backup id"), "{err}");
    // The probe fails fast; a missing id never resolves by waiting.
    assert_eq!(gateway.call_count("DescribeBackupTasks"), 1);
    assert_eq!(gateway.call_count("DescribeBackups"), 0);
}
