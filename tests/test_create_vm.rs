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

use aliyun_adapter::aliyun::{ProductFamily, VmCreateOptions};
use common::{instance_body, instances_page, region};
use serde_json::json;

fn zones_body() -> serde_json::Value {
    json!({
        "Zones": { "Zone": [{
            "ZoneId": "cn-hangzhou-h",
            "LocalName": "Hangzhou Zone H",
            "AvailableDiskCategories": { "DiskCategories": ["cloud_essd", "cloud_efficiency"] },
            "AvailableInstanceTypes": { "InstanceTypes": ["ecs.g6.large", "ecs.c6.large"] }
        }]}
    })
}

fn catalog_body() -> serde_json::Value {
    json!({
        "InstanceTypes": { "InstanceType": [
            { "InstanceTypeId": "ecs.g6.large", "CpuCoreCount": 2, "MemorySize": 4.0 },
            { "InstanceTypeId": "ecs.c6.large", "CpuCoreCount": 2, "MemorySize": 4.0 },
            { "InstanceTypeId": "ecs.g6.xlarge", "CpuCoreCount": 4, "MemorySize": 16.0 }
        ]}
    })
}

#[tokio::test(start_paused = true)]
async fn create_falls_through_candidates_and_waits_for_visibility() {
    let (gateway, region) = region();
    gateway
        .reply(ProductFamily::Ecs, "DescribeZones", zones_body())
        .reply(ProductFamily::Ecs, "DescribeInstanceTypes", catalog_body())
        .fail(
            ProductFamily::Ecs,
            "CreateInstance",
            "OperationDenied.NoStock",
            "The requested resource is sold out in the specified zone",
        )
        .reply(ProductFamily::Ecs, "CreateInstance", json!({ "InstanceId": "i-new" }))
        .reply(ProductFamily::Ecs, "DescribeInstances", instances_page(vec![], 0))
        .reply(
            ProductFamily::Ecs,
            "DescribeInstances",
            instances_page(vec![instance_body("i-new", "Running", "cn-hangzhou-h")], 1),
        );

    let options = VmCreateOptions::builder()
        .name("web-1")
        .image_id("m-base")
        .zone_id("cn-hangzhou-h")
        .security_group_id("sg-1")
        .cpu(2u32)
        .memory_mb(4096u32)
        .system_disk_category("cloud_essd_pl2")
        .build();
    let instance_id = region.create_vm(options).await.unwrap();
    assert_eq!(instance_id, "i-new");

    let creates = gateway.calls_for("CreateInstance");
    assert_eq!(creates.len(), 2);
    // Catalog order: the sold-out g6 first, then the c6 fallback.
    assert_eq!(creates[0].param("InstanceType"), Some("ecs.g6.large"));
    assert_eq!(creates[1].param("InstanceType"), Some("ecs.c6.large"));
    // The pl2 class splits into category + performance level on the wire.
    assert_eq!(creates[0].param("SystemDisk.Category"), Some("cloud_essd"));
    assert_eq!(creates[0].param("SystemDisk.PerformanceLevel"), Some("PL2"));
    assert_eq!(creates[0].param("InstanceChargeType"), Some("PostPaid"));
    // A fresh idempotency token per attempt.
    let t0 = creates[0].param("ClientToken").unwrap();
    let t1 = creates[1].param("ClientToken").unwrap();
    assert_eq!(t0.len(), 20);
    assert_ne!(t0, t1);
    // One empty appearance probe, then the instance shows up.
    assert!(gateway.call_count("DescribeInstances") >= 2);
}

#[tokio::test]
async fn unmatchable_shape_is_rejected_without_a_create_call() {
    let (gateway, region) = region();
    gateway
        .reply(ProductFamily::Ecs, "DescribeZones", zones_body())
        .reply(ProductFamily::Ecs, "DescribeInstanceTypes", catalog_body());

    let options = VmCreateOptions::builder()
        .name("web-2")
        .image_id("m-base")
        .zone_id("cn-hangzhou-h")
        .cpu(64u32)
        .memory_mb(262144u32)
        .build();
    let err = region.create_vm(options).await.unwrap_err();
    assert_eq!(err.kind(), aliyun_adapter::aliyun::ErrorKind::InvalidInput);
    assert_eq!(gateway.call_count("CreateInstance"), 0);
}

#[tokio::test(start_paused = true)]
async fn explicit_type_skips_the_catalog() {
    let (gateway, region) = region();
    gateway
        .reply(ProductFamily::Ecs, "CreateInstance", json!({ "InstanceId": "i-3" }))
        .reply(
            ProductFamily::Ecs,
            "DescribeInstances",
            instances_page(vec![instance_body("i-3", "Running", "cn-hangzhou-h")], 1),
        );

    let options = VmCreateOptions::builder()
        .name("web-3")
        .image_id("m-base")
        .instance_type("ecs.g6.large")
        .build();
    assert_eq!(region.create_vm(options).await.unwrap(), "i-3");
    assert_eq!(gateway.call_count("DescribeInstanceTypes"), 0);
    assert_eq!(gateway.call_count("DescribeZones"), 0);
}
