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

use aliyun_adapter::aliyun::{DnsRecordOptions, ProductFamily};
use common::region;
use serde_json::{Value, json};

fn records_body(status: &str) -> Value {
    json!({
        "TotalCount": 1,
        "DomainRecords": { "Record": [{
            "RecordId": "rec-1",
            "DomainName": "example.com",
            "RR": "www",
            "Type": "A",
            "Value": "1.2.3.4",
            "TTL": 600,
            "Status": status,
            "Line": "default"
        }]}
    })
}

#[tokio::test]
async fn zone_listing_reports_the_tier_ttl_floor() {
    let (gateway, region) = region();
    gateway.reply(
        ProductFamily::AliDns,
        "DescribeDomains",
        json!({
            "TotalCount": 1,
            "Domains": { "Domain": [{
                "DomainId": "dom-1",
                "DomainName": "example.com",
                "PunyCode": "example.com",
                "VersionCode": "mianfei"
            }]}
        }),
    );

    let zones = region.dns_zones().await.unwrap();
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].min_ttl(), 600);
}

#[tokio::test]
async fn record_listing_page_size_is_tunable() {
    let (gateway, region) = region();
    gateway
        .reply(ProductFamily::AliDns, "DescribeDomainRecords", records_body("ENABLE"));

    region.dns_records("example.com", None).await.unwrap();
    region.dns_records("example.com", Some(500)).await.unwrap();

    let calls = gateway.calls_for("DescribeDomainRecords");
    assert_eq!(calls[0].param("PageSize"), Some("20"));
    assert_eq!(calls[1].param("PageSize"), Some("500"));
}

#[tokio::test]
async fn record_add_translates_the_policy_to_a_line() {
    let (gateway, region) = region();
    gateway.reply(ProductFamily::AliDns, "AddDomainRecord", json!({ "RecordId": "rec-2" }));

    let options = DnsRecordOptions {
        rr: "campus".into(),
        record_type: "A".into(),
        value: "1.2.3.4".into(),
        ttl: 600,
        policy: "cernet".into(),
        priority: None,
    };
    let id = region.create_dns_record("example.com", &options).await.unwrap();
    assert_eq!(id, "rec-2");

    let add = &gateway.calls_for("AddDomainRecord")[0];
    assert_eq!(add.param("DomainName"), Some("example.com"));
    assert_eq!(add.param("Line"), Some("edu"));
}

#[tokio::test]
async fn enabling_an_enabled_record_is_a_no_op() {
    let (gateway, region) = region();
    gateway.reply(ProductFamily::AliDns, "DescribeDomainRecords", records_body("ENABLE"));

    region
        .set_dns_record_enabled("example.com", "rec-1", true)
        .await
        .unwrap();
    assert_eq!(gateway.call_count("SetDomainRecordStatus"), 0);
}

#[tokio::test]
async fn disabling_an_enabled_record_issues_one_status_call() {
    let (gateway, region) = region();
    gateway
        .reply(ProductFamily::AliDns, "DescribeDomainRecords", records_body("ENABLE"))
        .reply(ProductFamily::AliDns, "SetDomainRecordStatus", json!({ "RequestId": "r" }));

    region
        .set_dns_record_enabled("example.com", "rec-1", false)
        .await
        .unwrap();

    let call = &gateway.calls_for("SetDomainRecordStatus")[0];
    assert_eq!(call.param("RecordId"), Some("rec-1"));
    assert_eq!(call.param("Status"), Some("Disable"));
}
