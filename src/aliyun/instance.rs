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

//! ECS instances: the facade payload and the full VM lifecycle.
//!
//! Lifecycle: `creating → running ↔ stopping/starting ↔ stopped → deleting`.
//! Creation is passively awaited (appearance poll); stop/start are
//! caller-initiated and rejected from transitional states; delete is forced
//! with a warning when the instance is not stopped.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::paging::{self, Page};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;
use crate::aliyun::types::{
    BillingCycle, ChargeType, CloudResource, InstanceStatus, expand_disk_category,
};
use crate::aliyun::utils;
use crate::aliyun::wait::{self, Probe};

const APPEAR_INTERVAL: Duration = Duration::from_secs(3);
const APPEAR_TIMEOUT: Duration = Duration::from_secs(60);
const STATE_INTERVAL: Duration = Duration::from_secs(10);
const STATE_TIMEOUT: Duration = Duration::from_secs(300);
const EIP_INTERVAL: Duration = Duration::from_secs(5);
const EIP_TIMEOUT: Duration = Duration::from_secs(300);

const INIT_CODES: &[&str] = &["IncorrectInstanceStatus.Initializing"];
const INIT_RETRIES: u32 = 4;
const INIT_DELAY: Duration = Duration::from_secs(10);

/// An instance as `DescribeInstances` answers it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Instance {
    pub instance_id: String,
    pub instance_name: String,
    /// Vendor status string; see [`Instance::state`] for the canonical form.
    pub status: String,
    pub instance_type: String,
    pub cpu: u32,
    /// MiB.
    pub memory: u32,
    pub zone_id: String,
    pub image_id: String,
    #[serde(rename = "OSType")]
    pub os_type: String,
    #[serde(rename = "OSName")]
    pub os_name: String,
    pub host_name: String,
    pub description: String,
    pub instance_charge_type: String,
    pub internet_max_bandwidth_out: u32,
    pub key_pair_name: String,
    #[serde(deserialize_with = "utils::de_opt_time")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "utils::de_opt_time")]
    pub expired_time: Option<DateTime<Utc>>,
    pub vpc_attributes: VpcAttributes,
    pub eip_address: EipAddress,
    pub public_ip_address: IpAddressSet,
    pub security_group_ids: SecurityGroupIds,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct VpcAttributes {
    pub vpc_id: String,
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    pub private_ip_address: IpAddressSet,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EipAddress {
    pub allocation_id: String,
    pub ip_address: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct IpAddressSet {
    #[serde(rename = "IpAddress")]
    pub ip_address: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SecurityGroupIds {
    #[serde(rename = "SecurityGroupId")]
    pub security_group_id: Vec<String>,
}

/// Auto-renewal configuration of a prepaid instance.
#[derive(Clone, Debug, Default)]
pub struct AutoRenewAttr {
    pub enabled: bool,
    pub duration: u32,
    pub period_unit: String,
}

impl Instance {
    /// Canonical lifecycle state.
    pub fn state(&self) -> InstanceStatus {
        InstanceStatus::from_vendor(&self.status)
    }

    pub fn charge_type(&self) -> ChargeType {
        ChargeType::from_vendor(&self.instance_charge_type)
    }

    pub fn private_ips(&self) -> &[String] {
        &self.vpc_attributes.private_ip_address.ip_address
    }

    pub fn public_ips(&self) -> &[String] {
        &self.public_ip_address.ip_address
    }

    pub fn eip(&self) -> Option<(&str, &str)> {
        if self.eip_address.allocation_id.is_empty() {
            None
        } else {
            Some((&self.eip_address.allocation_id, &self.eip_address.ip_address))
        }
    }

    pub fn security_group_ids(&self) -> &[String] {
        &self.security_group_ids.security_group_id
    }

    /// Reloads this facade from the region.
    pub async fn refresh(&mut self, region: &Region) -> Result<()> {
        *self = region.instance(&self.instance_id).await?;
        Ok(())
    }
}

impl CloudResource for Instance {
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

/// One data disk of a VM-create request. Always encodes the four base
/// fields (`Size`, `Category`, `DiskName`, `Description`); the rest only
/// when set.
#[derive(Clone, Debug, Default)]
pub struct DataDiskSpec {
    pub size_gb: u32,
    /// Canonical storage class; expanded at encode time.
    pub category: String,
    pub name: String,
    pub description: String,
    pub snapshot_id: Option<String>,
    pub delete_with_instance: Option<bool>,
    pub encrypted: Option<bool>,
}

impl DataDiskSpec {
    fn encode(&self, params: &mut ParamMap, n: usize) {
        let wire = expand_disk_category(&self.category);
        let mut g = params.group("DataDisk", n);
        g.set("Size", self.size_gb.to_string());
        g.set("Category", wire.category.clone());
        g.set("DiskName", self.name.clone());
        g.set("Description", self.description.clone());
        g.opt("PerformanceLevel", wire.performance_level);
        if wire.bursting {
            g.set_bool("BurstingEnabled", true);
        }
        g.opt("SnapshotId", self.snapshot_id.clone());
        if let Some(del) = self.delete_with_instance {
            g.set_bool("DeleteWithInstance", del);
        }
        if let Some(enc) = self.encrypted {
            g.set_bool("Encrypted", enc);
        }
    }
}

/// Canonical VM-create request. Either `instance_type` or a (cpu,
/// memory_mb) shape must be given; with a shape, matching candidate types
/// are tried in catalog order.
#[derive(Clone, Debug, TypedBuilder)]
pub struct VmCreateOptions {
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(into))]
    pub description: String,
    #[builder(default, setter(into))]
    pub hostname: String,
    #[builder(setter(into))]
    pub image_id: String,
    #[builder(default, setter(into))]
    pub zone_id: String,
    #[builder(default, setter(into))]
    pub security_group_id: String,
    #[builder(default, setter(into, strip_option))]
    pub instance_type: Option<String>,
    #[builder(default)]
    pub cpu: u32,
    #[builder(default)]
    pub memory_mb: u32,
    #[builder(default, setter(into))]
    pub vswitch_id: String,
    #[builder(default, setter(into, strip_option))]
    pub private_ip: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub password: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub key_pair_name: Option<String>,
    #[builder(default = "cloud_efficiency".into(), setter(into))]
    pub system_disk_category: String,
    #[builder(default)]
    pub system_disk_size_gb: u32,
    #[builder(default)]
    pub data_disks: Vec<DataDiskSpec>,
    /// Outbound bandwidth for a NAT public IP; 0 means no public IP.
    #[builder(default)]
    pub public_bandwidth_mbps: u32,
    #[builder(default, setter(into, strip_option))]
    pub user_data: Option<String>,
    #[builder(default)]
    pub tags: Vec<(String, String)>,
    /// Prepaid period; `None` means postpaid.
    #[builder(default, setter(strip_option))]
    pub billing: Option<BillingCycle>,
    #[builder(default)]
    pub auto_renew: bool,
}

impl VmCreateOptions {
    /// Everything but `InstanceType` and `ClientToken`, which vary per
    /// candidate attempt.
    fn encode(&self, p: &mut ParamMap) {
        p.set("ImageId", self.image_id.clone());
        p.set("InstanceName", self.name.clone());
        p.opt("Description", Some(self.description.clone()));
        p.opt("HostName", Some(self.hostname.clone()));
        p.opt("ZoneId", Some(self.zone_id.clone()));
        p.opt("SecurityGroupId", Some(self.security_group_id.clone()));
        p.opt("VSwitchId", Some(self.vswitch_id.clone()));
        p.opt("PrivateIpAddress", self.private_ip.clone());
        p.opt("Password", self.password.clone());
        p.opt("KeyPairName", self.key_pair_name.clone());
        p.opt("UserData", self.user_data.clone());

        let sys = expand_disk_category(&self.system_disk_category);
        p.set("SystemDisk.Category", sys.category);
        p.opt("SystemDisk.PerformanceLevel", sys.performance_level);
        if sys.bursting {
            p.set_bool("SystemDisk.BurstingEnabled", true);
        }
        if self.system_disk_size_gb > 0 {
            p.set("SystemDisk.Size", self.system_disk_size_gb.to_string());
        }
        for (i, disk) in self.data_disks.iter().enumerate() {
            disk.encode(p, i + 1);
        }
        for (i, (key, value)) in self.tags.iter().enumerate() {
            let mut g = p.group("Tag", i + 1);
            g.set("Key", key.clone());
            g.set("Value", value.clone());
        }

        if self.public_bandwidth_mbps > 0 {
            p.set("InternetChargeType", "PayByTraffic");
            p.set(
                "InternetMaxBandwidthOut",
                self.public_bandwidth_mbps.to_string(),
            );
        }
        match &self.billing {
            Some(cycle) => {
                p.set("InstanceChargeType", "PrePaid");
                cycle.encode_into(p);
                if self.auto_renew {
                    p.set_bool("AutoRenew", true);
                }
            }
            None => {
                p.set("InstanceChargeType", "PostPaid");
            }
        }
        p.set("IoOptimized", "optimized");
    }
}

/// Deploy request: key rotation plus batched attribute changes.
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct DeployVmOptions {
    #[builder(default, setter(into, strip_option))]
    pub name: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub description: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub password: Option<String>,
    /// Public key to synchronise to a vendor key pair and attach.
    #[builder(default, setter(into, strip_option))]
    pub public_key: Option<String>,
    /// Detach the currently attached key pair first.
    #[builder(default)]
    pub delete_key_pair: bool,
}

/// Spec-change request: an explicit type, or a shape to match.
#[derive(Clone, Debug, Default, TypedBuilder)]
pub struct SpecChangeOptions {
    #[builder(default, setter(into, strip_option))]
    pub instance_type: Option<String>,
    #[builder(default)]
    pub cpu: u32,
    #[builder(default)]
    pub memory_mb: u32,
}

impl Region {
    /// Instances in the region, optionally restricted to a zone and/or an
    /// id list. Server order, paged at 100.
    pub async fn instances(&self, zone_id: Option<&str>, ids: &[&str]) -> Result<Vec<Instance>> {
        paging::collect_indexed(100, async |page, size| {
            let mut p = ParamMap::new();
            p.set("PageNumber", page.to_string());
            p.set("PageSize", size.to_string());
            p.opt("ZoneId", zone_id);
            p.set_json_list("InstanceIds", ids);
            let doc = self.ecs("DescribeInstances", p).await?;
            Ok(Page::new(
                doc.unmarshal_or_default(&["Instances", "Instance"])?,
                doc.int_or(&["TotalCount"], 0) as usize,
            ))
        })
        .await
        .map_err(|e| e.ctx(format!("listing instances in {}", self.id())))
    }

    pub async fn instance(&self, instance_id: &str) -> Result<Instance> {
        self.instances(None, &[instance_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("instance {instance_id}")))
    }

    /// Creates a VM and returns its id once `DescribeInstances` shows it.
    ///
    /// Without an explicit instance type, candidates matching the requested
    /// (cpu, memory) shape are tried in catalog order and only the last
    /// vendor error surfaces if every one fails.
    pub async fn create_vm(&self, options: VmCreateOptions) -> Result<String> {
        let candidates: Vec<String> = match &options.instance_type {
            Some(t) => vec![t.clone()],
            None => {
                let zone = (!options.zone_id.is_empty()).then_some(options.zone_id.as_str());
                let matched = self
                    .match_instance_types(options.cpu, options.memory_mb, zone)
                    .await?;
                matched.into_iter().map(|t| t.instance_type_id).collect()
            }
        };
        if candidates.is_empty() {
            return Err(Error::InvalidInput(format!(
                "no instance type matches cpu={} memory_mb={} in zone {:?}",
                options.cpu, options.memory_mb, options.zone_id
            )));
        }

        let mut last_err = None;
        for candidate in &candidates {
            let mut p = ParamMap::new();
            options.encode(&mut p);
            p.set("InstanceType", candidate.clone());
            p.client_token();
            match self.ecs("CreateInstance", p).await {
                Ok(doc) => {
                    let instance_id = doc.str_at(&["InstanceId"])?;
                    self.wait_vm_visible(&instance_id).await?;
                    return Ok(instance_id);
                }
                Err(e) => {
                    warn!(
                        "creating vm {} with type {candidate} failed: {e}",
                        options.name
                    );
                    last_err = Some(e);
                }
            }
        }
        // Non-empty candidates, so an error was recorded.
        Err(last_err
            .unwrap_or_else(|| Error::InvalidInput("no create attempt was made".into()))
            .ctx(format!("creating vm {}", options.name)))
    }

    async fn wait_vm_visible(&self, instance_id: &str) -> Result<()> {
        wait::poll_until(
            APPEAR_INTERVAL,
            APPEAR_TIMEOUT,
            &format!("instance {instance_id} to appear"),
            async || match self.instance(instance_id).await {
                Ok(_) => Ok(Probe::Done(())),
                Err(e) if e.is_not_found() => Ok(Probe::Pending),
                Err(e) => Err(e),
            },
        )
        .await
    }

    async fn wait_vm_state(&self, instance_id: &str, want: InstanceStatus) -> Result<()> {
        wait::poll_until(
            STATE_INTERVAL,
            STATE_TIMEOUT,
            &format!("instance {instance_id} to reach {want}"),
            async || {
                let current = self.instance(instance_id).await?.state();
                Ok(if current == want {
                    Probe::Done(())
                } else {
                    Probe::Pending
                })
            },
        )
        .await
    }

    /// Starts a stopped VM and waits for `running`. Already-running is a
    /// successful no-op; transitional states are rejected.
    pub async fn start_vm(&self, instance_id: &str) -> Result<()> {
        let state = self.instance(instance_id).await?.state();
        match state {
            InstanceStatus::Running => Ok(()),
            InstanceStatus::Ready => {
                let mut p = ParamMap::new();
                p.set("InstanceId", instance_id);
                self.ecs("StartInstance", p).await?;
                self.wait_vm_state(instance_id, InstanceStatus::Running).await
            }
            other => Err(Error::state(
                "StartInstance",
                format!("instance {instance_id} is {other}"),
            )),
        }
    }

    /// Stops a running VM and waits for `ready`. Already-stopped is a
    /// successful no-op without a stop call; other states are rejected.
    /// Non-forced stops release billing (`StoppedMode=StopCharging`).
    pub async fn stop_vm(&self, instance_id: &str, force: bool) -> Result<()> {
        let state = self.instance(instance_id).await?.state();
        match state {
            InstanceStatus::Ready => Ok(()),
            InstanceStatus::Running => {
                let mut p = ParamMap::new();
                p.set("InstanceId", instance_id);
                p.set_bool("ForceStop", force);
                if !force {
                    p.set("StoppedMode", "StopCharging");
                }
                self.ecs("StopInstance", p).await?;
                self.wait_vm_state(instance_id, InstanceStatus::Ready).await
            }
            other => Err(Error::state(
                "StopInstance",
                format!("instance {instance_id} is {other}"),
            )),
        }
    }

    /// Deletes a VM and waits until it is gone. Already-absent is a
    /// successful no-op; a not-stopped instance is force-deleted with a
    /// warning. Initialisation races are retried with back-off.
    pub async fn delete_vm(&self, instance_id: &str) -> Result<()> {
        let instance = match self.instance(instance_id).await {
            Ok(i) => i,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(e),
        };
        if instance.state() != InstanceStatus::Ready {
            warn!(
                "deleting instance {instance_id} in state {}, delete is forced",
                instance.state()
            );
        }
        wait::retry_on_codes(INIT_CODES, INIT_RETRIES, INIT_DELAY, async || {
            let mut p = ParamMap::new();
            p.set("InstanceId", instance_id);
            p.set_bool("Force", true);
            self.ecs("DeleteInstance", p).await.map(|_| ())
        })
        .await?;
        wait::poll_until(
            STATE_INTERVAL,
            STATE_TIMEOUT,
            &format!("instance {instance_id} to be deleted"),
            async || match self.instance(instance_id).await {
                Ok(_) => Ok(Probe::Pending),
                Err(e) if e.is_not_found() => Ok(Probe::Done(())),
                Err(e) => Err(e),
            },
        )
        .await
    }

    /// Key rotation plus batched attribute changes, in that order: detach
    /// the old key pair when requested, sync and attach the new public key,
    /// then one attribute-modify call for name/description/password.
    pub async fn deploy_vm(&self, instance_id: &str, options: DeployVmOptions) -> Result<()> {
        let instance = self.instance(instance_id).await?;
        if options.delete_key_pair && !instance.key_pair_name.is_empty() {
            self.detach_key_pair(instance_id, &instance.key_pair_name)
                .await?;
        }
        if let Some(public_key) = &options.public_key {
            let name = self.sync_key_pair(public_key).await?;
            self.attach_key_pair(instance_id, &name).await?;
        }
        let mut p = ParamMap::new();
        p.opt("InstanceName", options.name);
        p.opt("Description", options.description);
        p.opt("Password", options.password);
        if !p.is_empty() {
            p.set("InstanceId", instance_id);
            self.ecs("ModifyInstanceAttribute", p).await?;
        }
        Ok(())
    }

    /// Replaces the system disk from an image; returns the new disk id.
    /// The disk only grows when the requested size exceeds the image
    /// minimum; the password is inherited when omitted.
    pub async fn rebuild_vm_root(
        &self,
        instance_id: &str,
        image_id: &str,
        size_gb: Option<u32>,
        password: Option<&str>,
    ) -> Result<String> {
        let image = self.image(image_id).await?;
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        p.set("ImageId", image_id);
        if let Some(size) = size_gb {
            if size > image.size_gb() {
                p.set("SystemDisk.Size", size.to_string());
            }
        }
        p.opt("Password", password);
        p.client_token();
        let doc = self.ecs("ReplaceSystemDisk", p).await?;
        doc.str_at(&["DiskId"])
    }

    /// Changes the instance spec. Prepaid instances go through the prepaid
    /// endpoint, carrying `OperatorType=downgrade` when the new shape is
    /// smaller; candidates are tried in order and the last error surfaces.
    pub async fn change_vm_spec(
        &self,
        instance: &Instance,
        options: SpecChangeOptions,
    ) -> Result<()> {
        let candidates: Vec<String> = match &options.instance_type {
            Some(t) => vec![t.clone()],
            None => self
                .match_instance_types(options.cpu, options.memory_mb, Some(&instance.zone_id))
                .await?
                .into_iter()
                .map(|t| t.instance_type_id)
                .collect(),
        };
        if candidates.is_empty() {
            return Err(Error::InvalidInput(format!(
                "no instance type matches cpu={} memory_mb={}",
                options.cpu, options.memory_mb
            )));
        }
        let prepaid = instance.charge_type() == ChargeType::Prepaid;
        let downgrade = if prepaid {
            let shape = match &options.instance_type {
                Some(t) => self
                    .instance_types()
                    .await?
                    .iter()
                    .find(|row| row.instance_type_id == *t)
                    .map(|row| (row.cpu_core_count, row.memory_mb())),
                None => Some((options.cpu, options.memory_mb)),
            };
            // An explicit type missing from the catalog gets no operator
            // hint; the vendor rejects the call if the direction matters.
            shape.is_some_and(|(cpu, memory_mb)| {
                cpu < instance.cpu || memory_mb < instance.memory
            })
        } else {
            false
        };
        let action = if prepaid {
            "ModifyPrepayInstanceSpec"
        } else {
            "ModifyInstanceSpec"
        };

        let mut last_err = None;
        for candidate in &candidates {
            let mut p = ParamMap::new();
            p.set("InstanceId", instance.instance_id.clone());
            p.set("InstanceType", candidate.clone());
            if prepaid && downgrade {
                p.set("OperatorType", "downgrade");
            }
            p.client_token();
            match self.ecs(action, p).await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    warn!(
                        "changing {} to type {candidate} failed: {e}",
                        instance.instance_id
                    );
                    last_err = Some(e);
                }
            }
        }
        Err(last_err
            .unwrap_or_else(|| Error::InvalidInput("no spec-change attempt was made".into()))
            .ctx(format!("changing spec of {}", instance.instance_id)))
    }

    /// Renews a prepaid instance for another billing period.
    pub async fn renew_vm(&self, instance_id: &str, cycle: BillingCycle) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        cycle.encode_into(&mut p);
        p.client_token();
        self.ecs("RenewInstance", p).await?;
        Ok(())
    }

    pub async fn vm_auto_renew(&self, instance_id: &str) -> Result<AutoRenewAttr> {
        let mut p = ParamMap::new();
        // Unlike DescribeInstances, this action takes plain CSV ids.
        p.set_csv("InstanceId", &[instance_id]);
        let doc = self
            .ecs("DescribeInstanceAutoRenewAttribute", p)
            .await?;
        #[derive(Default, Deserialize)]
        #[serde(default, rename_all = "PascalCase")]
        struct Row {
            auto_renew_enabled: bool,
            duration: u32,
            period_unit: String,
        }
        let rows: Vec<Row> = doc.unmarshal_or_default(&[
            "InstanceRenewAttributes",
            "InstanceRenewAttribute",
        ])?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("renew attribute of {instance_id}")))?;
        Ok(AutoRenewAttr {
            enabled: row.auto_renew_enabled,
            duration: row.duration,
            period_unit: row.period_unit,
        })
    }

    pub async fn set_vm_auto_renew(&self, instance_id: &str, enabled: bool) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        p.set_bool("AutoRenew", enabled);
        if enabled {
            p.set("Duration", "1");
            p.set("PeriodUnit", "Month");
        }
        self.ecs("ModifyInstanceAutoRenewAttribute", p).await?;
        Ok(())
    }

    pub async fn vm_vnc_url(&self, instance_id: &str) -> Result<String> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        let doc = self.ecs("DescribeInstanceVncUrl", p).await?;
        doc.str_at(&["VncUrl"])
    }

    /// VNC password: exactly six alphanumerics, vendor-enforced.
    pub async fn set_vm_vnc_password(&self, instance_id: &str, password: &str) -> Result<()> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        p.set("VncPassword", password);
        self.ecs("ModifyInstanceVncPasswd", p).await?;
        Ok(())
    }

    /// Converts the instance's NAT public IP to an EIP and waits until the
    /// allocation shows on the instance; returns the allocation id.
    pub async fn convert_vm_public_ip_to_eip(&self, instance_id: &str) -> Result<String> {
        let mut p = ParamMap::new();
        p.set("InstanceId", instance_id);
        self.vpc_request("ConvertNatPublicIpToEip", p).await?;
        wait::poll_until(
            EIP_INTERVAL,
            EIP_TIMEOUT,
            &format!("eip of instance {instance_id} to appear"),
            async || {
                let instance = self.instance(instance_id).await?;
                Ok(match instance.eip() {
                    Some((allocation_id, _)) => Probe::Done(allocation_id.to_string()),
                    None => Probe::Pending,
                })
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_options_encode_disks_and_billing() {
        let options = VmCreateOptions::builder()
            .name("web-1")
            .image_id("m-abc")
            .zone_id("cn-hangzhou-b")
            .security_group_id("sg-1")
            .vswitch_id("vsw-1")
            .system_disk_category("cloud_essd_pl2")
            .system_disk_size_gb(60)
            .data_disks(vec![
                DataDiskSpec {
                    size_gb: 100,
                    category: "cloud_auto".into(),
                    name: "data-1".into(),
                    ..Default::default()
                },
                DataDiskSpec {
                    size_gb: 200,
                    category: "cloud_ssd".into(),
                    name: "data-2".into(),
                    delete_with_instance: Some(true),
                    ..Default::default()
                },
            ])
            .tags(vec![("env".into(), "prod".into())])
            .billing(BillingCycle::months(3))
            .auto_renew(true)
            .build();

        let mut p = ParamMap::new();
        options.encode(&mut p);

        assert_eq!(p.get("SystemDisk.Category"), Some("cloud_essd"));
        assert_eq!(p.get("SystemDisk.PerformanceLevel"), Some("PL2"));
        assert_eq!(p.get("SystemDisk.Size"), Some("60"));

        // Two disks: 4 base entries each, plus the documented extras.
        assert_eq!(p.get("DataDisk.1.Size"), Some("100"));
        assert_eq!(p.get("DataDisk.1.Category"), Some("cloud_auto"));
        assert_eq!(p.get("DataDisk.1.DiskName"), Some("data-1"));
        assert_eq!(p.get("DataDisk.1.Description"), Some(""));
        assert_eq!(p.get("DataDisk.1.BurstingEnabled"), Some("true"));
        assert_eq!(p.get("DataDisk.2.Category"), Some("cloud_ssd"));
        assert_eq!(p.get("DataDisk.2.DeleteWithInstance"), Some("true"));
        assert_eq!(p.keys_under("DataDisk").count(), 4 + 1 + 4 + 1);

        assert_eq!(p.get("Tag.1.Key"), Some("env"));
        assert_eq!(p.get("Tag.1.Value"), Some("prod"));

        assert_eq!(p.get("InstanceChargeType"), Some("PrePaid"));
        assert_eq!(p.get("Period"), Some("3"));
        assert_eq!(p.get("PeriodUnit"), Some("Month"));
        assert_eq!(p.get("AutoRenew"), Some("true"));
        assert_eq!(p.get("IoOptimized"), Some("optimized"));
    }

    #[test]
    fn postpaid_without_public_ip_is_the_default() {
        let options = VmCreateOptions::builder()
            .name("w")
            .image_id("m-1")
            .build();
        let mut p = ParamMap::new();
        options.encode(&mut p);
        assert_eq!(p.get("InstanceChargeType"), Some("PostPaid"));
        assert!(!p.contains_key("InternetMaxBandwidthOut"));
        assert!(!p.contains_key("Period"));
        assert_eq!(p.get("SystemDisk.Category"), Some("cloud_efficiency"));
    }

    #[test]
    fn instance_getters() {
        let instance = Instance {
            instance_id: "i-1".into(),
            status: "Stopped".into(),
            instance_charge_type: "PrePaid".into(),
            eip_address: EipAddress {
                allocation_id: "eip-1".into(),
                ip_address: "1.2.3.4".into(),
            },
            ..Default::default()
        };
        assert_eq!(instance.state(), InstanceStatus::Ready);
        assert_eq!(instance.status(), "ready");
        assert_eq!(instance.charge_type(), ChargeType::Prepaid);
        assert_eq!(instance.eip(), Some(("eip-1", "1.2.3.4")));
        assert_eq!(instance.name(), "i-1"); // falls back to the id
        assert_eq!(instance.global_id(), "i-1");
    }
}
