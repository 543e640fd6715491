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

//! WAF instances and protected domains. The domain list call answers names
//! only, so the full domain detail is fetched lazily on first access and
//! memoized per facade.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{CloudResource, WafAction, WafDefenseType, waf_action};

/// The account's WAF instance, from `DescribeInstanceInfo`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct WafInstance {
    pub instance_id: String,
    /// Edition code.
    pub version: String,
    pub pay_type: i64,
    /// Subscription end, milliseconds since the epoch.
    pub end_date: i64,
    pub status: i64,
    pub in_debt: i64,
    pub remain_day: i64,
}

impl CloudResource for WafInstance {
    fn id(&self) -> &str {
        &self.instance_id
    }

    fn name(&self) -> String {
        self.instance_id.clone()
    }

    fn global_id(&self) -> String {
        self.instance_id.clone()
    }

    fn status(&self) -> &'static str {
        if self.status == 1 { "available" } else { "unknown" }
    }
}

/// Domain detail as `DescribeDomain` answers it, plus the rule group
/// resolved alongside.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct WafDomainDetail {
    pub cname: String,
    pub http_port: Vec<u16>,
    pub https_port: Vec<u16>,
    /// Backend origins.
    pub source_ips: Vec<String>,
    /// 0 physical cluster, 1 virtual cluster.
    pub cluster_type: i64,
    /// 0 ip-hash, 1 round-robin, 2 least-time.
    pub load_balancing: i64,
    pub https_redirect: i64,
    pub cert_name: String,
    #[serde(skip)]
    pub rule_group_id: i64,
}

/// A protected domain. Identity is the domain name itself; everything else
/// comes from the lazy detail.
#[derive(Clone, Debug)]
pub struct WafDomain {
    pub domain: String,
    pub instance_id: String,
    detail: Arc<OnceCell<WafDomainDetail>>,
}

impl WafDomain {
    pub(crate) fn new(domain: String, instance_id: String) -> Self {
        Self {
            domain,
            instance_id,
            detail: Arc::new(OnceCell::new()),
        }
    }

    /// Full detail, fetched once and memoized across clones.
    pub async fn detail(&self, region: &Region) -> Result<&WafDomainDetail> {
        self.detail
            .get_or_try_init(|| region.waf_domain_detail(&self.instance_id, &self.domain))
            .await
    }

    pub async fn cname(&self, region: &Region) -> Result<String> {
        Ok(self.detail(region).await?.cname.clone())
    }

    /// Live action for one defense type.
    pub async fn defense_action(
        &self,
        region: &Region,
        defense: WafDefenseType,
    ) -> Result<WafAction> {
        let mut p = ParamMap::new();
        p.set("InstanceId", self.instance_id.clone());
        p.set("Domain", self.domain.clone());
        p.set("DefenseType", defense.as_str());
        let doc = region.wafv2("DescribeProtectionModuleMode", p).await?;
        Ok(waf_action(defense, doc.int_or(&["Mode"], -1)))
    }
}

impl CloudResource for WafDomain {
    fn id(&self) -> &str {
        &self.domain
    }

    fn name(&self) -> String {
        self.domain.clone()
    }

    fn global_id(&self) -> String {
        self.domain.clone()
    }

    fn status(&self) -> &'static str {
        "available"
    }
}

impl Region {
    /// The account's WAF instance in this region; absent subscription
    /// surfaces as not-found.
    pub async fn waf_instance(&self) -> Result<WafInstance> {
        let doc = self.waf_request("DescribeInstanceInfo", ParamMap::new()).await?;
        let info: WafInstance = doc.unmarshal_or_default(&["InstanceInfo"])?;
        if info.instance_id.is_empty() {
            return Err(Error::NotFound(format!("waf instance in {}", self.id())));
        }
        Ok(info)
    }

    /// Protected domains of one WAF instance. The vendor answers bare
    /// names; detail hangs off each facade lazily.
    pub async fn waf_domains(&self, instance_id: &str) -> Result<Vec<WafDomain>> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        let doc = self.wafv2("DescribeDomainNames", p).await?;
        let names: Vec<String> = doc.unmarshal_or_default(&["DomainNames"])?;
        Ok(names
            .into_iter()
            .map(|name| WafDomain::new(name, instance_id.to_string()))
            .collect())
    }

    pub async fn waf_domain(&self, instance_id: &str, domain: &str) -> Result<WafDomain> {
        self.waf_domains(instance_id)
            .await?
            .into_iter()
            .find(|d| d.domain == domain)
            .ok_or_else(|| Error::NotFound(format!("waf domain {domain}")))
    }

    pub(crate) async fn waf_domain_detail(
        &self,
        instance_id: &str,
        domain: &str,
    ) -> Result<WafDomainDetail> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        p.set("Domain", domain);
        let doc = self.wafv2("DescribeDomain", p).await?;
        let mut detail: WafDomainDetail = doc.unmarshal_or_default(&["Domain"])?;

        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        p.set("Domain", domain);
        let doc = self.wafv2("DescribeDomainRuleGroup", p).await?;
        detail.rule_group_id = doc.int_or(&["RuleGroupId"], 0);
        Ok(detail)
    }

    /// Puts a domain behind the WAF instance.
    pub async fn create_waf_domain(
        &self,
        instance_id: &str,
        domain: &str,
        source_ips: &[&str],
        http_ports: &[u16],
        https_ports: &[u16],
    ) -> Result<WafDomain> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        p.set("Domain", domain);
        p.set_json_list("SourceIps", source_ips);
        let http: Vec<String> = http_ports.iter().map(u16::to_string).collect();
        let https: Vec<String> = https_ports.iter().map(u16::to_string).collect();
        let http: Vec<&str> = http.iter().map(String::as_str).collect();
        let https: Vec<&str> = https.iter().map(String::as_str).collect();
        p.set_json_list("HttpPort", &http);
        p.set_json_list("HttpsPort", &https);
        p.set("IsAccessProduct", "0");
        self.wafv2("CreateDomain", p)
            .await
            .map_err(|e| e.ctx(format!("creating waf domain {domain}")))?;
        Ok(WafDomain::new(domain.to_string(), instance_id.to_string()))
    }

    /// Deleting an absent domain is a successful no-op.
    pub async fn delete_waf_domain(&self, instance_id: &str, domain: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        p.set("Domain", domain);
        match self.wafv2("DeleteDomain", p).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }
}
