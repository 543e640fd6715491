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

//! Elastic network interfaces.

use serde::Deserialize;

use crate::aliyun::error::Result;
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::CloudResource;

/// A network interface as `DescribeNetworkInterfaces` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkInterface {
    pub network_interface_id: String,
    pub network_interface_name: String,
    /// `Primary` or `Secondary`.
    #[serde(rename = "Type")]
    pub interface_type: String,
    pub status: String,
    pub mac_address: String,
    pub instance_id: String,
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    pub vpc_id: String,
    pub zone_id: String,
    pub private_ip_address: String,
    pub private_ip_sets: PrivateIpSets,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrivateIpSets {
    #[serde(rename = "PrivateIpSet")]
    pub private_ip_set: Vec<PrivateIpSet>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PrivateIpSet {
    pub private_ip_address: String,
    pub primary: bool,
}

impl NetworkInterface {
    pub fn is_primary(&self) -> bool {
        self.interface_type == "Primary"
    }

    /// Private IPs with the primary address first, then secondaries in
    /// server order.
    pub fn private_ips(&self) -> Vec<&str> {
        let sets = &self.private_ip_sets.private_ip_set;
        let mut ips: Vec<&str> = sets
            .iter()
            .filter(|s| s.primary)
            .map(|s| s.private_ip_address.as_str())
            .collect();
        ips.extend(
            sets.iter()
                .filter(|s| !s.primary)
                .map(|s| s.private_ip_address.as_str()),
        );
        ips
    }
}

impl CloudResource for NetworkInterface {
    fn id(&self) -> &str {
        &self.network_interface_id
    }

    fn name(&self) -> String {
        if self.network_interface_name.is_empty() {
            self.network_interface_id.clone()
        } else {
            self.network_interface_name.clone()
        }
    }

    fn global_id(&self) -> String {
        self.network_interface_id.clone()
    }

    fn status(&self) -> &'static str {
        "available"
    }
}

impl Region {
    /// Network interfaces, optionally restricted to one instance. Paged at
    /// the endpoint cap of 500.
    pub async fn network_interfaces(
        &self,
        instance_id: Option<&str>,
    ) -> Result<Vec<NetworkInterface>> {
        paging::collect_indexed(500, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            p.opt("InstanceId", instance_id);
            let doc = self.ecs("DescribeNetworkInterfaces", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["NetworkInterfaceSets", "NetworkInterfaceSet"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing network interfaces in {}", self.id())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_ip_sorts_first() {
        let eni = NetworkInterface {
            interface_type: "Primary".into(),
            private_ip_sets: PrivateIpSets {
                private_ip_set: vec![
                    PrivateIpSet {
                        private_ip_address: "10.0.0.3".into(),
                        primary: false,
                    },
                    PrivateIpSet {
                        private_ip_address: "10.0.0.1".into(),
                        primary: true,
                    },
                    PrivateIpSet {
                        private_ip_address: "10.0.0.9".into(),
                        primary: false,
                    },
                ],
            },
            ..Default::default()
        };
        assert!(eni.is_primary());
        assert_eq!(eni.private_ips(), vec!["10.0.0.1", "10.0.0.3", "10.0.0.9"]);
    }
}
