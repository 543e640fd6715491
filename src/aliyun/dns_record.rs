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

//! Public DNS records. Line codes translate both ways through the tables
//! in [`crate::aliyun::types`].

use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{CloudResource, line_from_policy, policy_from_line};

/// Record listing page size. The vendor caps at 500; 20 is a conservative
/// default that callers may raise per call.
pub const DNS_RECORDS_PAGE_SIZE: u32 = 20;

/// A record as `DescribeDomainRecords` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DnsRecord {
    pub record_id: String,
    pub domain_name: String,
    /// Host label (`www`, `@`, ...).
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
    /// `ENABLE` or `DISABLE`.
    pub status: String,
    pub locked: bool,
    /// Vendor line code; see [`DnsRecord::policy`].
    pub line: String,
    /// Meaningful only for MX records.
    pub priority: u32,
}

impl DnsRecord {
    pub fn is_enabled(&self) -> bool {
        self.status.eq_ignore_ascii_case("enable")
    }

    /// Canonical routing policy for the vendor line code.
    pub fn policy(&self) -> &'static str {
        policy_from_line(&self.line)
    }
}

impl CloudResource for DnsRecord {
    fn id(&self) -> &str {
        &self.record_id
    }

    fn name(&self) -> String {
        format!("{}.{}", self.rr, self.domain_name)
    }

    fn global_id(&self) -> String {
        self.record_id.clone()
    }

    fn status(&self) -> &'static str {
        if self.is_enabled() { "available" } else { "disabled" }
    }
}

/// Canonical record-write request.
#[derive(Clone, Debug, Default)]
pub struct DnsRecordOptions {
    pub rr: String,
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
    /// Canonical policy value; translated to a vendor line.
    pub policy: String,
    /// MX only.
    pub priority: Option<u32>,
}

impl DnsRecordOptions {
    fn encode(&self) -> Result<ParamMap> {
        let policy = if self.policy.is_empty() { "default" } else { &self.policy };
        let line = line_from_policy(policy).ok_or_else(|| {
            Error::NotSupported(format!("dns routing policy {policy:?} on aliyun"))
        })?;
        let mut p = ParamMap::new();
        p.set("RR", self.rr.clone());
        p.set("Type", self.record_type.clone());
        p.set("Value", self.value.clone());
        if self.ttl > 0 {
            p.set("TTL", self.ttl.to_string());
        }
        p.set("Line", line);
        if self.record_type == "MX" {
            p.set("Priority", self.priority.unwrap_or(10).to_string());
        }
        Ok(p)
    }
}

impl Region {
    /// Records of one zone. `page_size` tunes the listing; `None` uses
    /// [`DNS_RECORDS_PAGE_SIZE`].
    pub async fn dns_records(
        &self,
        domain_name: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<DnsRecord>> {
        let size = page_size.unwrap_or(DNS_RECORDS_PAGE_SIZE);
        paging::collect_indexed(size, async |page, size| {
            let mut p = ParamMap::new();
            p.set("DomainName", domain_name);
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            let doc = self.alidns("DescribeDomainRecords", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["DomainRecords", "Record"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing records of {domain_name}")))
    }

    pub async fn dns_record(&self, domain_name: &str, record_id: &str) -> Result<DnsRecord> {
        self.dns_records(domain_name, None)
            .await?
            .into_iter()
            .find(|r| r.record_id == record_id)
            .ok_or_else(|| Error::NotFound(format!("record {record_id} in {domain_name}")))
    }

    /// Adds a record and returns its id.
    pub async fn create_dns_record(
        &self,
        domain_name: &str,
        options: &DnsRecordOptions,
    ) -> Result<String> {
        let mut p = options.encode()?;
        p.set("DomainName", domain_name);
        let doc = self.alidns("AddDomainRecord", p).await?;
        doc.str_at(&["RecordId"])
    }

    pub async fn update_dns_record(
        &self,
        record_id: &str,
        options: &DnsRecordOptions,
    ) -> Result<()> {
        let mut p = options.encode()?;
        p.set("RecordId", record_id);
        self.alidns("UpdateDomainRecord", p).await?;
        Ok(())
    }

    /// Deleting an absent record is a successful no-op.
    pub async fn delete_dns_record(&self, record_id: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("RecordId", record_id);
        match self.alidns("DeleteDomainRecord", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Enables or disables a record; already-in-state is a no-op without a
    /// status call.
    pub async fn set_dns_record_enabled(
        &self,
        domain_name: &str,
        record_id: &str,
        enabled: bool,
    ) -> Result<()> {
        let record = self.dns_record(domain_name, record_id).await?;
        if record.is_enabled() == enabled {
            return Ok(());
        }
        let mut p = ParamMap::new();
        p.set("RecordId", record_id);
        p.set("Status", if enabled { "Enable" } else { "Disable" });
        self.alidns("SetDomainRecordStatus", p).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_write_translates_the_policy() {
        let p = DnsRecordOptions {
            rr: "www".into(),
            record_type: "A".into(),
            value: "1.2.3.4".into(),
            ttl: 600,
            policy: "cernet".into(),
            priority: None,
        }
        .encode()
        .unwrap();
        assert_eq!(p.get("Line"), Some("edu"));
        assert_eq!(p.get("TTL"), Some("600"));
        assert!(!p.contains_key("Priority"));
    }

    #[test]
    fn mx_priority_and_default_policy() {
        let p = DnsRecordOptions {
            rr: "@".into(),
            record_type: "MX".into(),
            value: "mail.example.com".into(),
            ttl: 0,
            policy: String::new(),
            priority: Some(5),
        }
        .encode()
        .unwrap();
        assert_eq!(p.get("Line"), Some("default"));
        assert_eq!(p.get("Priority"), Some("5"));
        assert!(!p.contains_key("TTL"));
    }

    #[test]
    fn unexpressible_policy_is_not_supported() {
        let err = DnsRecordOptions {
            rr: "www".into(),
            record_type: "A".into(),
            value: "1.2.3.4".into(),
            policy: "geodistance".into(),
            ..Default::default()
        }
        .encode()
        .unwrap_err();
        assert_eq!(err.kind(), crate::aliyun::error::ErrorKind::NotSupported);
    }

    #[test]
    fn record_read_translates_the_line() {
        let record = DnsRecord {
            record_id: "r-1".into(),
            domain_name: "example.com".into(),
            rr: "www".into(),
            line: "biying".into(),
            status: "ENABLE".into(),
            ..Default::default()
        };
        assert_eq!(record.policy(), "bing");
        assert!(record.is_enabled());
        assert_eq!(record.status(), "available");
        assert_eq!(record.name(), "www.example.com");
    }
}
