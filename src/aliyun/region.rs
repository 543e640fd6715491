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

//! The per-region hub.
//!
//! `Region` owns the per-product-family request helpers and the region-wide
//! inventory (zones, VPCs, vswitches, instance-type catalog, key pairs).
//! Resource modules add their operations onto `Region` in their own files;
//! everything remote below this module goes through [`Client::request`].

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::aliyun::client::Client;
use crate::aliyun::error::{Error, Result};
use crate::aliyun::gateway::{Document, ProductFamily};
use crate::aliyun::host::Host;
use crate::aliyun::instance_type::InstanceType;
use crate::aliyun::paging::{self, Page, TokenPage};
use crate::aliyun::params::ParamMap;
use crate::aliyun::storage::StoragePool;
use crate::aliyun::utils;
use crate::aliyun::wire::Wire;
use crate::aliyun::zone::{Zone, ZoneData};

/// One Aliyun region. Cheap to clone; zone and instance-type catalogs are
/// fetched once per handle tree and memoized.
#[derive(Clone)]
pub struct Region {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    region_id: String,
    zones: OnceCell<Vec<ZoneData>>,
    instance_types: OnceCell<Vec<InstanceType>>,
}

/// A VPC as `DescribeVpcs` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Vpc {
    pub vpc_id: String,
    pub vpc_name: String,
    pub cidr_block: String,
    pub status: String,
    pub is_default: bool,
    #[serde(rename = "VSwitchIds")]
    pub vswitch_ids: VSwitchIds,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct VSwitchIds {
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: Vec<String>,
}

/// A subnet (`VSwitch`), scoped to one zone of its VPC.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct VSwitch {
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    #[serde(rename = "VSwitchName")]
    pub vswitch_name: String,
    pub vpc_id: String,
    pub zone_id: String,
    pub cidr_block: String,
    pub status: String,
    pub available_ip_address_count: i64,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct KeyPair {
    key_pair_name: String,
    key_pair_finger_print: String,
}

impl Region {
    pub(crate) fn new(client: Client, region_id: String) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                region_id,
                zones: OnceCell::new(),
                instance_types: OnceCell::new(),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.region_id
    }

    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    /// Account id of the owning client (synthesized host identities).
    pub fn account_id(&self) -> &str {
        self.inner.client.account_id()
    }

    // Per-family request helpers. The regional families get `RegionId`
    // injected unless the call site already set one; the global DNS
    // families do not take it.

    async fn regional(
        &self,
        family: ProductFamily,
        action: &str,
        mut params: ParamMap,
    ) -> Result<Document> {
        if !params.contains_key("RegionId") {
            params.set("RegionId", self.id());
        }
        self.inner.client.request(family, action, &params).await
    }

    pub(crate) async fn ecs(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.regional(ProductFamily::Ecs, action, params).await
    }

    pub(crate) async fn vpc_request(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.regional(ProductFamily::Vpc, action, params).await
    }

    pub(crate) async fn cbn(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.inner.client.request(ProductFamily::Cbn, action, &params).await
    }

    pub(crate) async fn rds(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.regional(ProductFamily::Rds, action, params).await
    }

    pub(crate) async fn kvstore(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.regional(ProductFamily::Kvstore, action, params).await
    }

    pub(crate) async fn alidns(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.inner.client.request(ProductFamily::AliDns, action, &params).await
    }

    pub(crate) async fn pvtz(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.inner.client.request(ProductFamily::Pvtz, action, &params).await
    }

    pub(crate) async fn waf_request(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.regional(ProductFamily::Waf, action, params).await
    }

    pub(crate) async fn wafv2(&self, action: &str, params: ParamMap) -> Result<Document> {
        self.regional(ProductFamily::WafV2, action, params).await
    }

    // Zones and the synthesized infrastructure hanging off them.

    async fn zone_data(&self) -> Result<&[ZoneData]> {
        let zones = self
            .inner
            .zones
            .get_or_try_init(|| async {
                let doc = self.ecs("DescribeZones", ParamMap::new()).await?;
                doc.unmarshal_or_default::<Vec<ZoneData>>(&["Zones", "Zone"])
            })
            .await?;
        Ok(zones)
    }

    pub async fn zones(&self) -> Result<Vec<Zone>> {
        let data = self.zone_data().await?;
        Ok(data
            .iter()
            .map(|d| Zone::new(self.clone(), d.clone()))
            .collect())
    }

    pub async fn zone(&self, zone_id: &str) -> Result<Zone> {
        self.zones()
            .await?
            .into_iter()
            .find(|z| z.zone_id() == zone_id)
            .ok_or_else(|| Error::NotFound(format!("zone {zone_id} in region {}", self.id())))
    }

    /// One synthesized host per zone.
    pub async fn hosts(&self) -> Result<Vec<Host>> {
        Ok(self.zones().await?.into_iter().map(|z| z.host()).collect())
    }

    /// One synthesized storage pool per (zone, disk category).
    pub async fn storage_pools(&self) -> Result<Vec<StoragePool>> {
        let mut pools = Vec::new();
        for zone in self.zones().await? {
            pools.extend(zone.storage_pools());
        }
        Ok(pools)
    }

    /// One synthesized wire per (VPC, zone), composed exactly like the
    /// region's infrastructure fetch: every VPC crossed with every zone.
    pub async fn wires(&self) -> Result<Vec<Wire>> {
        let vpcs = self.vpcs(&[]).await?;
        let zones = self.zone_data().await?;
        let mut wires = Vec::with_capacity(vpcs.len() * zones.len());
        for vpc in &vpcs {
            for zone in zones {
                wires.push(Wire::new(self.clone(), vpc.clone(), zone.zone_id.clone()));
            }
        }
        Ok(wires)
    }

    // VPC inventory.

    pub async fn vpcs(&self, vpc_ids: &[&str]) -> Result<Vec<Vpc>> {
        paging::collect_indexed(50, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            p.set_csv("VpcId", vpc_ids);
            let doc = self.vpc_request("DescribeVpcs", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Vpcs", "Vpc"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing vpcs in {}", self.id())))
    }

    pub async fn vpc(&self, vpc_id: &str) -> Result<Vpc> {
        self.vpcs(&[vpc_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("vpc {vpc_id}")))
    }

    /// Creates a VPC and returns its id. Minimal surface: CIDR plus naming.
    pub async fn create_vpc(&self, name: &str, description: &str, cidr: &str) -> Result<String> {
        let mut p = ParamMap::new();
        p.opt("CidrBlock", Some(cidr));
        p.opt("VpcName", Some(name));
        p.opt("Description", Some(description));
        p.client_token();
        let doc = self.vpc_request("CreateVpc", p).await?;
        doc.str_at(&["VpcId"])
    }

    pub async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("VpcId", vpc_id);
        self.vpc_request("DeleteVpc", p).await?;
        Ok(())
    }

    pub async fn vswitches(
        &self,
        vpc_id: Option<&str>,
        zone_id: Option<&str>,
    ) -> Result<Vec<VSwitch>> {
        paging::collect_indexed(50, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            p.opt("VpcId", vpc_id);
            p.opt("ZoneId", zone_id);
            let doc = self.vpc_request("DescribeVSwitches", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["VSwitches", "VSwitch"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing vswitches in {}", self.id())))
    }

    // Instance-type catalog, fetched once and matched locally.

    pub async fn instance_types(&self) -> Result<&[InstanceType]> {
        let types = self
            .inner
            .instance_types
            .get_or_try_init(|| async {
                paging::collect_tokened(async |token| {
                    let mut p = ParamMap::new();
                    p.set("MaxResults", "100");
                    p.opt("NextToken", token);
                    let doc = self.ecs("DescribeInstanceTypes", p).await?;
                    Ok(TokenPage::new(
                        doc.unmarshal_or_default(&["InstanceTypes", "InstanceType"])?,
                        doc.opt_str(&["NextToken"]),
                    ))
                })
                .await
                .map_err(|e| e.ctx("listing instance types"))
            })
            .await?;
        Ok(types)
    }

    /// Instance types matching the requested shape, restricted to what the
    /// zone offers when a zone is given. Order follows the vendor catalog;
    /// VM create tries candidates in this order.
    pub async fn match_instance_types(
        &self,
        cpu: u32,
        memory_mb: u32,
        zone_id: Option<&str>,
    ) -> Result<Vec<InstanceType>> {
        let available = match zone_id {
            Some(id) => Some(self.zone(id).await?.available_instance_types().to_vec()),
            None => None,
        };
        let mut matched = Vec::new();
        for t in self.instance_types().await? {
            if t.cpu_core_count == cpu && t.memory_mb() == memory_mb {
                if let Some(ref avail) = available {
                    if !avail.iter().any(|a| a == &t.instance_type_id) {
                        continue;
                    }
                }
                matched.push(t.clone());
            }
        }
        Ok(matched)
    }

    // Vendor-managed key pairs; deploy synchronises public keys through
    // these.

    /// Ensures a key pair holding `public_key` exists and returns its name.
    /// The name is derived from the key material, so the same key always
    /// lands on the same remote object.
    pub async fn sync_key_pair(&self, public_key: &str) -> Result<String> {
        let name = utils::key_pair_name(public_key);
        let mut p = ParamMap::new();
        p.set("KeyPairName", name.clone());
        let doc = self.ecs("DescribeKeyPairs", p).await?;
        let existing: Vec<KeyPair> =
            doc.unmarshal_or_default(&["KeyPairs", "KeyPair"])?;
        if existing.iter().any(|k| k.key_pair_name == name) {
            return Ok(name);
        }
        let mut p = ParamMap::new();
        p.set("KeyPairName", name.clone());
        p.set("PublicKeyBody", public_key);
        self.ecs("ImportKeyPair", p)
            .await
            .map_err(|e| e.ctx(format!("importing key pair {name}")))?;
        Ok(name)
    }

    pub async fn attach_key_pair(&self, instance_id: &str, key_pair_name: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("KeyPairName", key_pair_name);
        p.set_json_list("InstanceIds", &[instance_id]);
        self.ecs("AttachKeyPair", p).await?;
        Ok(())
    }

    pub async fn detach_key_pair(&self, instance_id: &str, key_pair_name: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("KeyPairName", key_pair_name);
        p.set_json_list("InstanceIds", &[instance_id]);
        self.ecs("DetachKeyPair", p).await?;
        Ok(())
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("region_id", &self.inner.region_id)
            .finish_non_exhaustive()
    }
}
