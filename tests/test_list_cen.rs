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

use aliyun_adapter::aliyun::{CloudResource, ErrorKind, ProductFamily};
use common::{cen_body, cens_page, region};

#[tokio::test]
async fn forty_seven_cens_take_exactly_three_pages() {
    let (gateway, region) = region();
    let rows: Vec<_> = (0..47).map(|i| cen_body(&format!("cen-{i}"), "Active")).collect();
    gateway
        .reply(ProductFamily::Cbn, "DescribeCens", cens_page(rows[..20].to_vec(), 47))
        .reply(ProductFamily::Cbn, "DescribeCens", cens_page(rows[20..40].to_vec(), 47))
        .reply(ProductFamily::Cbn, "DescribeCens", cens_page(rows[40..].to_vec(), 47));

    let cens = region.cens().await.unwrap();
    assert_eq!(cens.len(), 47);
    // Server order survives the paging.
    assert_eq!(cens[0].cen_id, "cen-0");
    assert_eq!(cens[46].cen_id, "cen-46");
    assert_eq!(cens[0].status(), "available");

    let calls = gateway.calls_for("DescribeCens");
    assert_eq!(calls.len(), 3);
    let pages: Vec<_> = calls.iter().map(|c| c.param("PageNumber").unwrap()).collect();
    assert_eq!(pages, ["1", "2", "3"]);
    assert!(calls.iter().all(|c| c.param("PageSize") == Some("20")));
}

#[tokio::test]
async fn empty_listing_is_one_call() {
    let (gateway, region) = region();
    gateway.reply(ProductFamily::Cbn, "DescribeCens", cens_page(vec![], 0));

    assert!(region.cens().await.unwrap().is_empty());
    assert_eq!(gateway.call_count("DescribeCens"), 1);
}

#[tokio::test]
async fn missing_cen_is_not_found() {
    let (gateway, region) = region();
    gateway.reply(
        ProductFamily::Cbn,
        "DescribeCens",
        cens_page(vec![cen_body("cen-1", "Active")], 1),
    );

    let err = region.cen("cen-nope").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
