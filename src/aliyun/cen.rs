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

//! CEN inter-VPC networks: the network itself, its attached child
//! instances, and the route entries published through it.
//!
//! Route entries have no vendor id of their own; their identity is the
//! composite `<route-table-id>:<cidr>`, which callers hand back when
//! publishing or withdrawing.

use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{CenStatus, CloudResource};

/// A CEN as `DescribeCens` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Cen {
    pub cen_id: String,
    pub name: String,
    pub description: String,
    pub status: String,
}

impl Cen {
    pub fn state(&self) -> CenStatus {
        CenStatus::from_vendor(&self.status)
    }

    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.cen(&self.cen_id).await?;
        Ok(())
    }
}

impl CloudResource for Cen {
    fn id(&self) -> &str {
        &self.cen_id
    }

    fn name(&self) -> String {
        if self.name.is_empty() {
            self.cen_id.clone()
        } else {
            self.name.clone()
        }
    }

    fn global_id(&self) -> String {
        self.cen_id.clone()
    }

    fn status(&self) -> &'static str {
        self.state().as_str()
    }
}

/// A child instance attached to a CEN.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CenChild {
    pub child_instance_id: String,
    /// `VPC`, `VBR` or `CCN`.
    pub child_instance_type: String,
    pub child_instance_region_id: String,
    pub child_instance_owner_id: i64,
    pub status: String,
}

/// Attach request; `owner_id` crosses accounts when set.
#[derive(Clone, Debug, Default)]
pub struct CenChildSpec {
    pub instance_id: String,
    pub instance_type: String,
    pub region_id: String,
    pub owner_id: Option<String>,
}

/// One route entry of a child's route table, as
/// `DescribeCenChildInstanceRouteEntries` answers it plus the owning child
/// threaded in by the lister.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CenRouteEntry {
    pub route_table_id: String,
    pub destination_cidr_block: String,
    /// `System`, `Custom` or `CEN`.
    #[serde(rename = "Type")]
    pub route_type: String,
    /// `Published` or `NonPublished`.
    pub publish_status: String,
    pub next_hops: CenNextHops,
    #[serde(skip)]
    pub child: CenChild,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CenNextHops {
    #[serde(rename = "NextHop")]
    pub next_hop: Vec<CenNextHop>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CenNextHop {
    pub next_hop_id: String,
    pub next_hop_type: String,
}

impl CenRouteEntry {
    pub fn is_published(&self) -> bool {
        self.publish_status == "Published"
    }

    pub fn next_hop(&self) -> Option<&CenNextHop> {
        self.next_hops.next_hop.first()
    }
}

impl CloudResource for CenRouteEntry {
    fn id(&self) -> &str {
        &self.destination_cidr_block
    }

    fn name(&self) -> String {
        self.destination_cidr_block.clone()
    }

    fn global_id(&self) -> String {
        format!("{}:{}", self.route_table_id, self.destination_cidr_block)
    }

    fn status(&self) -> &'static str {
        "available"
    }
}

/// Splits a `<route-table-id>:<cidr>` composite; anything else is a shape
/// the vendor cannot address.
fn split_route_id(composite: &str) -> Result<(&str, &str)> {
    let mut parts = composite.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(rtb), Some(cidr), None) if !rtb.is_empty() && !cidr.is_empty() => Ok((rtb, cidr)),
        _ => Err(Error::NotSupported(format!(
            "route entry id {composite:?}, want <route-table-id>:<cidr>"
        ))),
    }
}

impl Region {
    pub async fn cens(&self) -> Result<Vec<Cen>> {
        paging::collect_indexed(20, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            let doc = self.cbn("DescribeCens", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Cens", "Cen"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx("listing cens"))
    }

    pub async fn cen(&self, cen_id: &str) -> Result<Cen> {
        self.cens()
            .await?
            .into_iter()
            .find(|c| c.cen_id == cen_id)
            .ok_or_else(|| Error::NotFound(format!("cen {cen_id}")))
    }

    /// Creates a CEN and returns its id.
    pub async fn create_cen(&self, name: &str, description: &str) -> Result<String> {
        let mut p = ParamMap::new();
        p.set("Name", name);
        p.opt("Description", Some(description));
        p.client_token();
        let doc = self.cbn("CreateCen", p).await?;
        doc.str_at(&["CenId"])
    }

    /// Deleting an absent CEN is a successful no-op.
    pub async fn delete_cen(&self, cen_id: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("CenId", cen_id);
        match self.cbn("DeleteCen", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn cen_children(&self, cen_id: &str) -> Result<Vec<CenChild>> {
        paging::collect_indexed(20, async |page, size| {
            let mut p = ParamMap::new();
            p.set("CenId", cen_id);
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            let doc = self.cbn("DescribeCenAttachedChildInstances", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["ChildInstances", "ChildInstance"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing children of {cen_id}")))
    }

    pub async fn attach_cen_child(&self, cen_id: &str, child: &CenChildSpec) -> Result<()> {
        let mut p = child_params(cen_id, child);
        p.opt("ChildInstanceOwnerId", child.owner_id.clone());
        self.cbn("AttachCenChildInstance", p)
            .await
            .map_err(|e| e.ctx(format!("attaching {} to {cen_id}", child.instance_id)))?;
        Ok(())
    }

    pub async fn detach_cen_child(&self, cen_id: &str, child: &CenChildSpec) -> Result<()> {
        let mut p = child_params(cen_id, child);
        p.opt("ChildInstanceOwnerId", child.owner_id.clone());
        self.cbn("DetachCenChildInstance", p)
            .await
            .map_err(|e| e.ctx(format!("detaching {} from {cen_id}", child.instance_id)))?;
        Ok(())
    }

    /// Route entries of every attached child, `CEN`-propagated ones
    /// filtered out (the orchestrator only tracks routes that originate in
    /// the children).
    pub async fn cen_route_entries(&self, cen_id: &str) -> Result<Vec<CenRouteEntry>> {
        let mut entries = Vec::new();
        for child in self.cen_children(cen_id).await? {
            let batch = paging::collect_indexed(20, async |page, size| {
                let mut p = ParamMap::new();
                p.set("CenId", cen_id);
                p.set("ChildInstanceId", child.child_instance_id.clone());
                p.set("ChildInstanceType", child.child_instance_type.clone());
                p.set("ChildInstanceRegionId", child.child_instance_region_id.clone());
                p.set("PageNumber", page.to_string());
                p.set("PageSize", size.to_string());
                let doc = self.cbn("DescribeCenChildInstanceRouteEntries", p).await?;
                let rows: Vec<CenRouteEntry> =
                    doc.unmarshal_or_default(&["CenRouteEntries", "CenRouteEntry"])?;
                Ok(Page::new(rows, doc.int_or(&["TotalCount"], 0) as usize))
            })
            .await
            .map_err(|e| e.ctx(format!("listing routes of {}", child.child_instance_id)))?;
            for mut entry in batch {
                if entry.route_type == "CEN" {
                    continue;
                }
                entry.child = child.clone();
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Publishes or withdraws a route entry addressed by its
    /// `<route-table-id>:<cidr>` composite id. Already-in-desired-state is
    /// a successful no-op without a publish call.
    pub async fn set_cen_route_published(
        &self,
        cen_id: &str,
        route_id: &str,
        publish: bool,
    ) -> Result<()> {
        let (route_table_id, cidr) = split_route_id(route_id)?;
        let entry = self
            .cen_route_entries(cen_id)
            .await?
            .into_iter()
            .find(|e| e.route_table_id == route_table_id && e.destination_cidr_block == cidr)
            .ok_or_else(|| Error::NotFound(format!("route {route_id} in {cen_id}")))?;
        if entry.is_published() == publish {
            return Ok(());
        }
        let mut p = ParamMap::new();
        p.set("CenId", cen_id);
        p.set("ChildInstanceId", entry.child.child_instance_id.clone());
        p.set("ChildInstanceType", entry.child.child_instance_type.clone());
        p.set(
            "ChildInstanceRegionId",
            entry.child.child_instance_region_id.clone(),
        );
        p.set("ChildInstanceRouteTableId", route_table_id);
        p.set("DestinationCidrBlock", cidr);
        let action = if publish {
            "PublishRouteEntries"
        } else {
            "WithdrawPublishedRouteEntries"
        };
        self.cbn(action, p)
            .await
            .map_err(|e| e.ctx(format!("publishing route {route_id}")))?;
        Ok(())
    }
}

fn child_params(cen_id: &str, child: &CenChildSpec) -> ParamMap {
    let mut p = ParamMap::new();
    p.set("CenId", cen_id);
    p.set("ChildInstanceId", child.instance_id.clone());
    p.set("ChildInstanceType", child.instance_type.clone());
    p.set("ChildInstanceRegionId", child.region_id.clone());
    p
}
