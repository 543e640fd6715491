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

//! Private zone records. Record ids are numeric on the wire; they are
//! carried as strings crate-wide for a uniform identity surface.

use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::pvtz_zone::check_pvtz_ttl;
use crate::aliyun::region::Region;
use crate::aliyun::types::CloudResource;

/// A record as `DescribeZoneRecords` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PvtzRecord {
    pub record_id: i64,
    #[serde(rename = "Rr")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
    /// Meaningful only for MX records.
    pub priority: u32,
    /// `ENABLE` or `DISABLE`.
    pub status: String,
}

impl PvtzRecord {
    pub fn is_enabled(&self) -> bool {
        self.status.eq_ignore_ascii_case("enable")
    }

    pub fn record_id(&self) -> String {
        self.record_id.to_string()
    }
}

impl CloudResource for PvtzRecord {
    fn id(&self) -> &str {
        &self.rr
    }

    fn name(&self) -> String {
        self.rr.clone()
    }

    fn global_id(&self) -> String {
        self.record_id.to_string()
    }

    fn status(&self) -> &'static str {
        if self.is_enabled() { "available" } else { "disabled" }
    }
}

/// Canonical private-record write request.
#[derive(Clone, Debug, Default)]
pub struct PvtzRecordOptions {
    pub rr: String,
    pub record_type: String,
    pub value: String,
    pub ttl: u32,
    /// MX only.
    pub priority: Option<u32>,
}

impl Region {
    pub async fn pvtz_records(&self, zone_id: &str) -> Result<Vec<PvtzRecord>> {
        paging::collect_indexed(100, async |page, size| {
            let mut p = ParamMap::new();
            p.set("ZoneId", zone_id);
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            let doc = self.pvtz("DescribeZoneRecords", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Records", "Record"])?,
                doc.int_or(&["TotalItems"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing records of private zone {zone_id}")))
    }

    pub async fn pvtz_record(&self, zone_id: &str, record_id: &str) -> Result<PvtzRecord> {
        self.pvtz_records(zone_id)
            .await?
            .into_iter()
            .find(|r| r.record_id.to_string() == record_id)
            .ok_or_else(|| Error::NotFound(format!("record {record_id} in private zone {zone_id}")))
    }

    /// Adds a record and returns its numeric id, stringified. The TTL is
    /// checked against the product whitelist before any call.
    pub async fn create_pvtz_record(
        &self,
        zone_id: &str,
        options: &PvtzRecordOptions,
    ) -> Result<String> {
        if options.ttl > 0 {
            check_pvtz_ttl(options.ttl)?;
        }
        let mut p = ParamMap::new();
        p.set("ZoneId", zone_id);
        p.set("Rr", options.rr.clone());
        p.set("Type", options.record_type.clone());
        p.set("Value", options.value.clone());
        if options.ttl > 0 {
            p.set("Ttl", options.ttl.to_string());
        }
        if options.record_type == "MX" {
            p.set("Priority", options.priority.unwrap_or(10).to_string());
        }
        let doc = self.pvtz("AddZoneRecord", p).await?;
        doc.str_at(&["RecordId"])
    }

    /// Deleting an absent record is a successful no-op.
    pub async fn delete_pvtz_record(&self, record_id: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("RecordId", record_id);
        match self.pvtz("DeleteZoneRecord", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Enables or disables a record; already-in-state is a no-op without a
    /// status call.
    pub async fn set_pvtz_record_enabled(
        &self,
        zone_id: &str,
        record_id: &str,
        enabled: bool,
    ) -> Result<()> {
        let record = self.pvtz_record(zone_id, record_id).await?;
        if record.is_enabled() == enabled {
            return Ok(());
        }
        let mut p = ParamMap::new();
        p.set("RecordId", record_id);
        p.set("Status", if enabled { "ENABLE" } else { "DISABLE" });
        self.pvtz("SetZoneRecordStatus", p).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_id_is_stringified() {
        let record = PvtzRecord {
            record_id: 4211,
            rr: "db".into(),
            status: "DISABLE".into(),
            ..Default::default()
        };
        assert_eq!(record.global_id(), "4211");
        assert_eq!(record.record_id(), "4211");
        assert!(!record.is_enabled());
        assert_eq!(record.status(), "disabled");
    }
}
