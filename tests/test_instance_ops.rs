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

use aliyun_adapter::aliyun::{DeployVmOptions, ErrorKind, ProductFamily, SpecChangeOptions};
use common::{instance_body, instances_page, region};
use serde_json::json;

#[tokio::test]
async fn stopping_a_stopped_vm_is_a_no_op() {
    let (gateway, region) = region();
    gateway.reply(
        ProductFamily::Ecs,
        "DescribeInstances",
        instances_page(vec![instance_body("i-1", "Stopped", "cn-hangzhou-h")], 1),
    );

    region.stop_vm("i-1", false).await.unwrap();
    assert_eq!(gateway.call_count("StopInstance"), 0);
}

#[tokio::test]
async fn stopping_a_transitional_vm_is_rejected() {
    let (gateway, region) = region();
    gateway.reply(
        ProductFamily::Ecs,
        "DescribeInstances",
        instances_page(vec![instance_body("i-1", "Starting", "cn-hangzhou-h")], 1),
    );

    let err = region.stop_vm("i-1", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStatus);
    assert_eq!(gateway.call_count("StopInstance"), 0);
}

#[tokio::test(start_paused = true)]
async fn non_forced_stop_releases_billing() {
    let (gateway, region) = region();
    gateway
        .reply(
            ProductFamily::Ecs,
            "DescribeInstances",
            instances_page(vec![instance_body("i-1", "Running", "cn-hangzhou-h")], 1),
        )
        .reply(
            ProductFamily::Ecs,
            "DescribeInstances",
            instances_page(vec![instance_body("i-1", "Stopped", "cn-hangzhou-h")], 1),
        )
        .reply(ProductFamily::Ecs, "StopInstance", json!({ "RequestId": "r" }));

    region.stop_vm("i-1", false).await.unwrap();
    let stop = &gateway.calls_for("StopInstance")[0];
    assert_eq!(stop.param("ForceStop"), Some("false"));
    assert_eq!(stop.param("StoppedMode"), Some("StopCharging"));
}

#[tokio::test]
async fn deleting_an_absent_vm_succeeds_without_a_delete_call() {
    let (gateway, region) = region();
    gateway.reply(ProductFamily::Ecs, "DescribeInstances", instances_page(vec![], 0));

    region.delete_vm("i-gone").await.unwrap();
    assert_eq!(gateway.call_count("DeleteInstance"), 0);
}

#[tokio::test(start_paused = true)]
async fn delete_forces_and_polls_to_absent() {
    let (gateway, region) = region();
    gateway
        .reply(
            ProductFamily::Ecs,
            "DescribeInstances",
            instances_page(vec![instance_body("i-1", "Stopped", "cn-hangzhou-h")], 1),
        )
        .reply(ProductFamily::Ecs, "DescribeInstances", instances_page(vec![], 0))
        .reply(ProductFamily::Ecs, "DeleteInstance", json!({ "RequestId": "r" }));

    region.delete_vm("i-1").await.unwrap();
    let del = &gateway.calls_for("DeleteInstance")[0];
    assert_eq!(del.param("Force"), Some("true"));
}

#[tokio::test]
async fn deploy_syncs_the_key_pair_and_batches_attribute_changes() {
    let (gateway, region) = region();
    gateway
        .reply(
            ProductFamily::Ecs,
            "DescribeInstances",
            instances_page(vec![instance_body("i-1", "Stopped", "cn-hangzhou-h")], 1),
        )
        .reply(ProductFamily::Ecs, "DescribeKeyPairs", json!({ "KeyPairs": { "KeyPair": [] } }))
        .reply(ProductFamily::Ecs, "ImportKeyPair", json!({ "RequestId": "r" }))
        .reply(ProductFamily::Ecs, "AttachKeyPair", json!({ "RequestId": "r" }))
        .reply(ProductFamily::Ecs, "ModifyInstanceAttribute", json!({ "RequestId": "r" }));

    let options = DeployVmOptions::builder()
        .name("renamed")
        .password("hunter2aA!")
        .public_key("ssh-rsa AAAAB3Nza... test@host")
        .build();
    region.deploy_vm("i-1", options).await.unwrap();

    // The key pair name derives from the key material, so lookup and
    // import agree on it.
    let looked_up = gateway.calls_for("DescribeKeyPairs")[0]
        .param("KeyPairName")
        .unwrap()
        .to_string();
    let imported = &gateway.calls_for("ImportKeyPair")[0];
    assert_eq!(imported.param("KeyPairName"), Some(looked_up.as_str()));
    assert!(looked_up.starts_with("sshkey-"));

    let attach = &gateway.calls_for("AttachKeyPair")[0];
    assert_eq!(attach.param("InstanceIds"), Some(r#"["i-1"]"#));

    let modify = &gateway.calls_for("ModifyInstanceAttribute")[0];
    assert_eq!(modify.param("InstanceName"), Some("renamed"));
    assert_eq!(modify.param("Password"), Some("hunter2aA!"));
    assert_eq!(modify.param("InstanceId"), Some("i-1"));
}

#[tokio::test]
async fn auto_renew_query_sends_a_plain_id() {
    let (gateway, region) = region();
    gateway.reply(
        ProductFamily::Ecs,
        "DescribeInstanceAutoRenewAttribute",
        json!({
            "InstanceRenewAttributes": { "InstanceRenewAttribute": [{
                "AutoRenewEnabled": true,
                "Duration": 1,
                "PeriodUnit": "Month"
            }]}
        }),
    );

    let attr = region.vm_auto_renew("i-1").await.unwrap();
    assert!(attr.enabled);
    let call = &gateway.calls_for("DescribeInstanceAutoRenewAttribute")[0];
    assert_eq!(call.param("InstanceId"), Some("i-1"));
}

fn spec_catalog() -> serde_json::Value {
    json!({
        "InstanceTypes": { "InstanceType": [
            { "InstanceTypeId": "ecs.g6.large", "CpuCoreCount": 2, "MemorySize": 4.0 },
            { "InstanceTypeId": "ecs.g6.xlarge", "CpuCoreCount": 4, "MemorySize": 16.0 }
        ]}
    })
}

#[tokio::test]
async fn explicit_type_upgrade_on_prepaid_carries_no_operator_hint() {
    let (gateway, region) = region();
    let mut body = instance_body("i-1", "Running", "cn-hangzhou-h");
    body["InstanceChargeType"] = json!("PrePaid");
    gateway
        .reply(ProductFamily::Ecs, "DescribeInstances", instances_page(vec![body], 1))
        .reply(ProductFamily::Ecs, "DescribeInstanceTypes", spec_catalog())
        .reply(ProductFamily::Ecs, "ModifyPrepayInstanceSpec", json!({ "RequestId": "r" }));

    let vm = region.instance("i-1").await.unwrap();
    let options = SpecChangeOptions::builder().instance_type("ecs.g6.xlarge").build();
    region.change_vm_spec(&vm, options).await.unwrap();

    // Growing 2c/4GiB to 4c/16GiB is not a downgrade.
    let modify = &gateway.calls_for("ModifyPrepayInstanceSpec")[0];
    assert_eq!(modify.param("InstanceType"), Some("ecs.g6.xlarge"));
    assert_eq!(modify.param("OperatorType"), None);
    assert_eq!(gateway.call_count("ModifyInstanceSpec"), 0);
}

#[tokio::test]
async fn explicit_type_shrink_on_prepaid_is_marked_downgrade() {
    let (gateway, region) = region();
    let mut body = instance_body("i-1", "Running", "cn-hangzhou-h");
    body["InstanceChargeType"] = json!("PrePaid");
    body["InstanceType"] = json!("ecs.g6.xlarge");
    body["Cpu"] = json!(4);
    body["Memory"] = json!(16384);
    gateway
        .reply(ProductFamily::Ecs, "DescribeInstances", instances_page(vec![body], 1))
        .reply(ProductFamily::Ecs, "DescribeInstanceTypes", spec_catalog())
        .reply(ProductFamily::Ecs, "ModifyPrepayInstanceSpec", json!({ "RequestId": "r" }));

    let vm = region.instance("i-1").await.unwrap();
    let options = SpecChangeOptions::builder().instance_type("ecs.g6.large").build();
    region.change_vm_spec(&vm, options).await.unwrap();

    let modify = &gateway.calls_for("ModifyPrepayInstanceSpec")[0];
    assert_eq!(modify.param("OperatorType"), Some("downgrade"));
}

#[tokio::test]
async fn deploy_without_changes_issues_no_modify_call() {
    let (gateway, region) = region();
    gateway.reply(
        ProductFamily::Ecs,
        "DescribeInstances",
        instances_page(vec![instance_body("i-1", "Stopped", "cn-hangzhou-h")], 1),
    );

    region
        .deploy_vm("i-1", DeployVmOptions::builder().build())
        .await
        .unwrap();
    assert_eq!(gateway.call_count("ModifyInstanceAttribute"), 0);
}
