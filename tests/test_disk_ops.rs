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

use aliyun_adapter::aliyun::{DiskCreateOptions, ProductFamily};
use common::{disk_body, disks_page, empty_disks, region};
use serde_json::json;

#[tokio::test]
async fn deleting_an_absent_disk_issues_no_delete_call() {
    let (gateway, region) = region();
    gateway.reply(ProductFamily::Ecs, "DescribeDisks", empty_disks());

    region.delete_disk("d-gone").await.unwrap();
    assert_eq!(gateway.call_count("DeleteDisk"), 0);
    assert_eq!(gateway.call_count("DescribeDisks"), 1);
}

#[tokio::test(start_paused = true)]
async fn delete_retries_through_initialisation_then_polls_to_absent() {
    let (gateway, region) = region();
    gateway
        .reply(
            ProductFamily::Ecs,
            "DescribeDisks",
            disks_page(vec![disk_body("d-1", "Available", "data")], 1),
        )
        .reply(ProductFamily::Ecs, "DescribeDisks", empty_disks())
        .fail(
            ProductFamily::Ecs,
            "DeleteDisk",
            "IncorrectDiskStatus.Initializing",
            "The disk is initializing",
        )
        .reply(ProductFamily::Ecs, "DeleteDisk", json!({ "RequestId": "r" }));

    region.delete_disk("d-1").await.unwrap();
    assert_eq!(gateway.call_count("DeleteDisk"), 2);
}

#[tokio::test(start_paused = true)]
async fn attach_retries_on_conflict() {
    let (gateway, region) = region();
    gateway
        .fail(
            ProductFamily::Ecs,
            "AttachDisk",
            "InvalidOperation.Conflict",
            "Request was denied due to conflict with a previous request",
        )
        .reply(ProductFamily::Ecs, "AttachDisk", json!({ "RequestId": "r" }));

    region.attach_disk("i-1", "d-1").await.unwrap();
    assert_eq!(gateway.call_count("AttachDisk"), 2);
}

#[tokio::test]
async fn detaching_a_detached_disk_is_a_no_op() {
    let (gateway, region) = region();
    gateway.reply(
        ProductFamily::Ecs,
        "DescribeDisks",
        disks_page(vec![disk_body("d-1", "Available", "data")], 1),
    );

    region.detach_disk("i-1", "d-1").await.unwrap();
    assert_eq!(gateway.call_count("DetachDisk"), 0);
}

#[tokio::test]
async fn create_expands_the_category_and_returns_the_id() {
    let (gateway, region) = region();
    gateway.reply(ProductFamily::Ecs, "CreateDisk", json!({ "DiskId": "d-new" }));

    let id = region
        .create_disk(DiskCreateOptions {
            zone_id: "cn-hangzhou-h".into(),
            category: "cloud_auto".into(),
            name: "scratch".into(),
            description: String::new(),
            size_gb: 100,
            snapshot_id: None,
        })
        .await
        .unwrap();
    assert_eq!(id, "d-new");

    let call = &gateway.calls_for("CreateDisk")[0];
    assert_eq!(call.param("DiskCategory"), Some("cloud_auto"));
    assert_eq!(call.param("BurstingEnabled"), Some("true"));
    assert_eq!(call.param("Size"), Some("100"));
    assert!(call.param("ClientToken").is_some());
}
