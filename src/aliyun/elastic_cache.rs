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

//! Elastic caches (r-kvstore: Redis and Memcache). Read surface only: the
//! listing row, the richer attribute record, and the per-endpoint network
//! info the public connection data hides in.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{CloudResource, ElasticCacheArch, ElasticCacheStatus};
use crate::aliyun::utils::de_opt_time;

/// One row of the kvstore `DescribeInstances`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ElasticCache {
    pub instance_id: String,
    pub instance_name: String,
    pub instance_status: String,
    /// `Redis` or `Memcache`.
    pub instance_type: String,
    pub engine_version: String,
    pub instance_class: String,
    pub architecture_type: String,
    pub node_type: String,
    /// MiB, despite the bare field name.
    #[serde(rename = "Capacity")]
    pub capacity_mb: i64,
    pub connections: i64,
    pub bandwidth: i64,
    #[serde(rename = "QPS")]
    pub qps: i64,
    pub port: u16,
    #[serde(rename = "PrivateIp")]
    pub private_ip: String,
    pub connection_domain: String,
    pub network_type: String,
    pub vpc_id: String,
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    pub zone_id: String,
    pub region_id: String,
    pub charge_type: String,
    #[serde(deserialize_with = "de_opt_time")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "de_opt_time")]
    pub end_time: Option<DateTime<Utc>>,
}

impl ElasticCache {
    pub fn state(&self) -> ElasticCacheStatus {
        ElasticCacheStatus::from_vendor(&self.instance_status)
    }

    pub fn arch(&self) -> ElasticCacheArch {
        ElasticCacheArch::from_vendor(&self.architecture_type, &self.node_type)
    }

    /// The endpoint reachable from outside the VPC, when one is exposed.
    pub async fn public_net_info(&self, region: &Region) -> Result<Option<CacheNetInfo>> {
        let nets = region.elastic_cache_net_info(&self.instance_id).await?;
        Ok(nets.into_iter().find(CacheNetInfo::is_public))
    }

    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.elastic_cache(&self.instance_id).await?;
        Ok(())
    }
}

impl CloudResource for ElasticCache {
    fn id(&self) -> &str {
        &self.instance_id
    }

    fn name(&self) -> String {
        if self.instance_name.is_empty() {
            self.instance_id.clone()
        } else {
            self.instance_name.clone()
        }
    }

    fn global_id(&self) -> String {
        self.instance_id.clone()
    }

    fn status(&self) -> &'static str {
        self.state().as_str()
    }
}

/// The attribute record from `DescribeInstanceAttribute`. A superset of the
/// listing row where maintenance windows and the IP whitelist live.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ElasticCacheAttribute {
    pub instance_id: String,
    pub instance_name: String,
    pub instance_status: String,
    pub engine: String,
    pub engine_version: String,
    pub instance_class: String,
    pub architecture_type: String,
    pub node_type: String,
    pub maintain_start_time: String,
    pub maintain_end_time: String,
    /// `Open` (password-free VPC access) or `Close`.
    pub vpc_auth_mode: String,
    #[serde(rename = "SecurityIPList")]
    pub security_ip_list: String,
    pub audit_log_retention: String,
}

impl ElasticCacheAttribute {
    /// Whitelisted source addresses, CSV on the wire.
    pub fn security_ips(&self) -> Vec<&str> {
        self.security_ip_list
            .split(',')
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// One endpoint of `DescribeDBInstanceNetInfo`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CacheNetInfo {
    pub connection_string: String,
    /// The vendor reports the port as a string here.
    pub port: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    /// `Public` or `Private`.
    #[serde(rename = "IPType")]
    pub ip_type: String,
    #[serde(rename = "DBInstanceNetType")]
    pub db_instance_net_type: String,
    #[serde(rename = "VPCId")]
    pub vpc_id: String,
    #[serde(rename = "VPCInstanceId")]
    pub vpc_instance_id: String,
}

impl CacheNetInfo {
    pub fn is_public(&self) -> bool {
        self.ip_type == "Public"
    }

    pub fn port(&self) -> u16 {
        self.port.parse().unwrap_or(0)
    }
}

impl Region {
    /// Elastic caches in the region, optionally restricted to an id list.
    /// Server order, paged at 50.
    pub async fn elastic_caches(&self, ids: &[&str]) -> Result<Vec<ElasticCache>> {
        paging::collect_indexed(50, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            p.set_csv("InstanceIds", ids);
            let doc = self.kvstore("DescribeInstances", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Instances", "KVStoreInstance"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing elastic caches in {}", self.id())))
    }

    pub async fn elastic_cache(&self, instance_id: &str) -> Result<ElasticCache> {
        self.elastic_caches(&[instance_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("elastic cache {instance_id}")))
    }

    pub async fn elastic_cache_attribute(
        &self,
        instance_id: &str,
    ) -> Result<ElasticCacheAttribute> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        let doc = self.kvstore("DescribeInstanceAttribute", p).await?;
        let items: Vec<ElasticCacheAttribute> =
            doc.unmarshal_or_default(&["Instances", "DBInstanceAttribute"])?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("elastic cache {instance_id}")))
    }

    pub async fn elastic_cache_net_info(&self, instance_id: &str) -> Result<Vec<CacheNetInfo>> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        let doc = self.kvstore("DescribeDBInstanceNetInfo", p).await?;
        doc.unmarshal_or_default(&["NetInfoItems", "InstanceNetInfo"])
    }
}
