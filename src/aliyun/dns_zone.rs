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

//! Public DNS zones (AliDNS domains). The product tier on a domain bounds
//! the minimum record TTL.

use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::CloudResource;

/// A domain as `DescribeDomains` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct DnsZone {
    pub domain_id: String,
    pub domain_name: String,
    pub puny_code: String,
    pub record_count: i64,
    /// Product tier (`version_code`), e.g. `mianfei` for the free tier.
    pub version_code: String,
    pub dns_servers: DnsServers,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DnsServers {
    #[serde(rename = "DnsServer")]
    pub dns_server: Vec<String>,
}

impl DnsZone {
    /// Lowest record TTL the domain's product tier accepts. The free tier
    /// bottoms out at 600s; enterprise tiers go lower.
    pub fn min_ttl(&self) -> u32 {
        match self.version_code.as_str() {
            "version_enterprise_basic" => 60,
            "version_enterprise_advance" => 1,
            // mianfei (free), version_personal, unknown future tiers
            _ => 600,
        }
    }

    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.dns_zone(&self.domain_name).await?;
        Ok(())
    }
}

impl CloudResource for DnsZone {
    fn id(&self) -> &str {
        &self.domain_id
    }

    /// Punycode preferred over the raw (possibly internationalised) name.
    fn name(&self) -> String {
        if self.puny_code.is_empty() {
            self.domain_name.clone()
        } else {
            self.puny_code.clone()
        }
    }

    fn global_id(&self) -> String {
        self.domain_id.clone()
    }

    fn status(&self) -> &'static str {
        "available"
    }
}

impl Region {
    /// All public zones of the account. AliDNS is a global product; the
    /// region only lends its request plumbing.
    pub async fn dns_zones(&self) -> Result<Vec<DnsZone>> {
        paging::collect_indexed(100, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            let doc = self.alidns("DescribeDomains", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Domains", "Domain"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx("listing dns zones"))
    }

    pub async fn dns_zone(&self, domain_name: &str) -> Result<DnsZone> {
        self.dns_zones()
            .await?
            .into_iter()
            .find(|z| z.domain_name == domain_name || z.puny_code == domain_name)
            .ok_or_else(|| Error::NotFound(format!("dns zone {domain_name}")))
    }

    pub async fn create_dns_zone(&self, domain_name: &str) -> Result<String> {
        let mut p = ParamMap::new();
        p.set("DomainName", domain_name);
        let doc = self.alidns("AddDomain", p).await?;
        doc.str_at(&["DomainId"])
    }

    /// Deleting an absent zone is a successful no-op.
    pub async fn delete_dns_zone(&self, domain_name: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("DomainName", domain_name);
        match self.alidns("DeleteDomain", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_ttl_follows_the_tier() {
        let mut zone = DnsZone {
            version_code: "mianfei".into(),
            ..Default::default()
        };
        assert_eq!(zone.min_ttl(), 600);
        zone.version_code = "version_personal".into();
        assert_eq!(zone.min_ttl(), 600);
        zone.version_code = "version_enterprise_basic".into();
        assert_eq!(zone.min_ttl(), 60);
        zone.version_code = "version_enterprise_advance".into();
        assert_eq!(zone.min_ttl(), 1);
    }

    #[test]
    fn punycode_preferred_as_display_name() {
        let zone = DnsZone {
            domain_id: "dom-1".into(),
            domain_name: "例え.jp".into(),
            puny_code: "xn--r8jz45g.jp".into(),
            ..Default::default()
        };
        assert_eq!(zone.name(), "xn--r8jz45g.jp");
    }
}
