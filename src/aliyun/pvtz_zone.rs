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

//! Private DNS zones (pvtz). The vendor's bind call replaces the whole VPC
//! set, so `add_vpc`/`remove_vpc` read the current set and re-submit it in
//! full.

use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{CloudResource, PVTZ_TTLS};

/// A private zone as `DescribeZones` answers it. Bind info rides along in
/// the listing.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PvtzZone {
    pub zone_id: String,
    pub zone_name: String,
    pub record_count: i64,
    pub proxy_pattern: String,
    pub is_ptr: bool,
    #[serde(rename = "Vpcs")]
    pub vpcs: PvtzVpcs,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PvtzVpcs {
    #[serde(rename = "Vpc")]
    pub vpc: Vec<PvtzVpc>,
}

/// One VPC bound to a private zone.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct PvtzVpc {
    pub vpc_id: String,
    pub region_id: String,
}

impl PvtzZone {
    pub fn bound_vpcs(&self) -> &[PvtzVpc] {
        &self.vpcs.vpc
    }

    pub fn is_bound(&self, vpc_id: &str) -> bool {
        self.vpcs.vpc.iter().any(|v| v.vpc_id == vpc_id)
    }

    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.pvtz_zone(&self.zone_id).await?;
        Ok(())
    }
}

impl CloudResource for PvtzZone {
    fn id(&self) -> &str {
        &self.zone_id
    }

    fn name(&self) -> String {
        self.zone_name.clone()
    }

    fn global_id(&self) -> String {
        self.zone_id.clone()
    }

    fn status(&self) -> &'static str {
        "available"
    }
}

impl Region {
    /// All private zones of the account, bind info included. pvtz is a
    /// global product; the region only lends its request plumbing.
    pub async fn pvtz_zones(&self) -> Result<Vec<PvtzZone>> {
        paging::collect_indexed(100, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            let doc = self.pvtz("DescribeZones", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Zones", "Zone"])?,
                doc.int_or(&["TotalItems"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx("listing private zones"))
    }

    /// One zone with its bind set. `DescribeZoneInfo` answers the VPC list
    /// at the top level, not under a `Zone` wrapper.
    pub async fn pvtz_zone(&self, zone_id: &str) -> Result<PvtzZone> {
        let mut p = ParamMap::new();
        p.set("ZoneId", zone_id);
        let doc = self.pvtz("DescribeZoneInfo", p).await?;
        let zone: PvtzZone = doc.unmarshal(&[])?;
        if zone.zone_id.is_empty() {
            return Err(Error::NotFound(format!("private zone {zone_id}")));
        }
        Ok(zone)
    }

    /// Creates a private zone and returns its id.
    pub async fn create_pvtz_zone(&self, zone_name: &str) -> Result<String> {
        let mut p = ParamMap::new();
        p.set("ZoneName", zone_name);
        let doc = self.pvtz("AddZone", p).await?;
        doc.str_at(&["ZoneId"])
    }

    /// Deleting an absent zone is a successful no-op.
    pub async fn delete_pvtz_zone(&self, zone_id: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("ZoneId", zone_id);
        match self.pvtz("DeleteZone", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Binds one more VPC to the zone. The vendor call replaces the whole
    /// set, so the current binds are re-submitted alongside the new one.
    /// Binding an already-bound VPC is a no-op.
    pub async fn pvtz_add_vpc(&self, zone_id: &str, vpc_id: &str, region_id: &str) -> Result<()> {
        let zone = self.pvtz_zone(zone_id).await?;
        if zone.is_bound(vpc_id) {
            return Ok(());
        }
        let mut vpcs = zone.vpcs.vpc;
        vpcs.push(PvtzVpc {
            vpc_id: vpc_id.into(),
            region_id: region_id.into(),
        });
        self.pvtz_bind_vpcs(zone_id, &vpcs).await
    }

    /// Unbinds one VPC, re-submitting the remaining set. Removing an
    /// unbound VPC is a no-op.
    pub async fn pvtz_remove_vpc(&self, zone_id: &str, vpc_id: &str) -> Result<()> {
        let zone = self.pvtz_zone(zone_id).await?;
        if !zone.is_bound(vpc_id) {
            return Ok(());
        }
        let vpcs: Vec<PvtzVpc> = zone
            .vpcs
            .vpc
            .into_iter()
            .filter(|v| v.vpc_id != vpc_id)
            .collect();
        self.pvtz_bind_vpcs(zone_id, &vpcs).await
    }

    async fn pvtz_bind_vpcs(&self, zone_id: &str, vpcs: &[PvtzVpc]) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("ZoneId", zone_id);
        for (i, vpc) in vpcs.iter().enumerate() {
            let mut g = p.group("Vpcs", i + 1);
            g.set("VpcId", vpc.vpc_id.clone());
            g.set("RegionId", vpc.region_id.clone());
        }
        self.pvtz("BindZoneVpc", p)
            .await
            .map_err(|e| e.ctx(format!("binding {} vpcs to {zone_id}", vpcs.len())))?;
        Ok(())
    }
}

/// Rejects TTLs the product does not accept; callers see the whitelist in
/// the error.
pub fn check_pvtz_ttl(ttl: u32) -> Result<()> {
    if PVTZ_TTLS.contains(&ttl) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "private zone ttl {ttl} not in {PVTZ_TTLS:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_with(vpcs: &[(&str, &str)]) -> PvtzZone {
        PvtzZone {
            zone_id: "pz-1".into(),
            zone_name: "corp.local".into(),
            vpcs: PvtzVpcs {
                vpc: vpcs
                    .iter()
                    .map(|(id, region)| PvtzVpc {
                        vpc_id: (*id).into(),
                        region_id: (*region).into(),
                    })
                    .collect(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn bind_membership() {
        let zone = zone_with(&[("vpc-a", "cn-hangzhou"), ("vpc-b", "cn-beijing")]);
        assert!(zone.is_bound("vpc-a"));
        assert!(!zone.is_bound("vpc-c"));
        assert_eq!(zone.bound_vpcs().len(), 2);
    }

    #[test]
    fn ttl_whitelist() {
        assert!(check_pvtz_ttl(60).is_ok());
        assert!(check_pvtz_ttl(86400).is_ok());
        let err = check_pvtz_ttl(7).unwrap_err();
        assert_eq!(err.kind(), crate::aliyun::error::ErrorKind::InvalidInput);
    }
}
