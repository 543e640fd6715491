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

//! Canonical vocabulary and the vendor↔canonical mapping tables.
//!
//! Everything here is pure data: vendor status strings in, canonical
//! lowercase tokens out, with the documented fallback for anything the
//! vendor grows later. Facades call these from their getters; nothing else
//! in the crate hardcodes a vendor status string.

use std::fmt;

use crate::aliyun::error::{Error, Result};
use crate::aliyun::params::ParamMap;

/// The identity contract every facade implements for the orchestrator.
pub trait CloudResource {
    /// Vendor id, verbatim.
    fn id(&self) -> &str;
    /// Display name; the id when the vendor left the name empty.
    fn name(&self) -> String;
    /// Stable cross-refresh id: the vendor id, or a `-`-joined composite
    /// for synthesized resources.
    fn global_id(&self) -> String;
    /// Canonical status token.
    fn status(&self) -> &'static str;
}

macro_rules! canonical_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

canonical_enum! {
    /// Canonical CEN status.
    CenStatus {
        Creating => "creating",
        Available => "available",
        Deleting => "deleting",
        Unknown => "unknown",
    }
}

impl CenStatus {
    pub fn from_vendor(status: &str) -> Self {
        match status {
            "Creating" => CenStatus::Creating,
            "Active" => CenStatus::Available,
            "Deleting" => CenStatus::Deleting,
            _ => CenStatus::Unknown,
        }
    }
}

canonical_enum! {
    /// Canonical disk status. Anything past initialization is usable.
    DiskStatus {
        Allocating => "allocating",
        Ready => "ready",
    }
}

impl DiskStatus {
    pub fn from_vendor(status: &str) -> Self {
        match status {
            "Creating" | "ReIniting" => DiskStatus::Allocating,
            _ => DiskStatus::Ready,
        }
    }
}

canonical_enum! {
    /// Canonical VM status. Vendor `Stopped` maps to `ready` (stopped but
    /// deployable), matching the orchestrator's vocabulary.
    InstanceStatus {
        Running => "running",
        Starting => "starting",
        Stopping => "stopping",
        Ready => "ready",
        Unknown => "unknown",
    }
}

impl InstanceStatus {
    pub fn from_vendor(status: &str) -> Self {
        match status {
            "Running" => InstanceStatus::Running,
            "Starting" => InstanceStatus::Starting,
            "Stopping" => InstanceStatus::Stopping,
            "Stopped" => InstanceStatus::Ready,
            _ => InstanceStatus::Unknown,
        }
    }
}

canonical_enum! {
    /// Canonical image status, in the orchestrator's glance-flavoured terms.
    ImageStatus {
        Queued => "queued",
        Active => "active",
        Deleted => "deleted",
        Killed => "killed",
    }
}

impl ImageStatus {
    pub fn from_vendor(status: &str) -> Self {
        match status {
            "Creating" => ImageStatus::Queued,
            "Available" => ImageStatus::Active,
            "UnAvailable" => ImageStatus::Deleted,
            _ => ImageStatus::Killed, // CreateFailed and anything newer
        }
    }
}

canonical_enum! {
    /// Canonical image ownership class.
    ImageOwner {
        System => "system",
        Customised => "customised",
        Market => "market",
        Shared => "shared",
    }
}

impl ImageOwner {
    pub fn from_vendor(alias: &str) -> Self {
        match alias {
            "system" => ImageOwner::System,
            "self" => ImageOwner::Customised,
            "marketplace" => ImageOwner::Market,
            "others" => ImageOwner::Shared,
            _ => ImageOwner::Customised,
        }
    }

    /// The `ImageOwnerAlias` filter value for list calls.
    pub fn vendor_alias(&self) -> &'static str {
        match self {
            ImageOwner::System => "system",
            ImageOwner::Customised => "self",
            ImageOwner::Market => "marketplace",
            ImageOwner::Shared => "others",
        }
    }
}

canonical_enum! {
    /// Disk role in the attached-disk ordering: system < swap < data.
    /// Aliyun has no swap disks; the variant exists for the canonical order.
    DiskRole {
        Sys => "sys",
        Swap => "swap",
        Data => "data",
    }
}

impl DiskRole {
    pub fn from_vendor(disk_type: &str) -> Self {
        match disk_type {
            "system" => DiskRole::Sys,
            _ => DiskRole::Data,
        }
    }

    /// Sort precedence within one instance's disk listing.
    pub fn order(&self) -> u8 {
        match self {
            DiskRole::Sys => 0,
            DiskRole::Swap => 1,
            DiskRole::Data => 2,
        }
    }
}

canonical_enum! {
    /// Canonical DB backup mode.
    BackupMode {
        Manual => "manual",
        Automated => "automated",
    }
}

impl BackupMode {
    pub fn from_vendor(mode: &str) -> Self {
        match mode {
            "Manual" => BackupMode::Manual,
            _ => BackupMode::Automated,
        }
    }
}

canonical_enum! {
    /// Canonical DB backup status.
    BackupStatus {
        Ready => "ready",
        Failed => "failed",
        Unknown => "unknown",
    }
}

impl BackupStatus {
    pub fn from_vendor(status: &str) -> Self {
        match status {
            "Success" => BackupStatus::Ready,
            "Failed" => BackupStatus::Failed,
            _ => BackupStatus::Unknown,
        }
    }
}

/// Instance/disk billing flavour. The vendor spells these `PrePaid` and
/// `PostPaid` for ECS, `Prepaid`/`Postpaid` for some other products.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChargeType {
    Prepaid,
    #[default]
    Postpaid,
}

impl ChargeType {
    pub fn from_vendor(charge_type: &str) -> Self {
        if charge_type.eq_ignore_ascii_case("prepaid") {
            ChargeType::Prepaid
        } else {
            ChargeType::Postpaid
        }
    }
}

/// A prepaid billing period: unit and count, encoded as
/// `Period=<n>, PeriodUnit=<Week|Month|Year>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillingCycle {
    unit: BillingUnit,
    count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BillingUnit {
    Week,
    Month,
    Year,
}

impl BillingCycle {
    pub fn weeks(count: u32) -> Self {
        Self { unit: BillingUnit::Week, count }
    }

    pub fn months(count: u32) -> Self {
        Self { unit: BillingUnit::Month, count }
    }

    pub fn years(count: u32) -> Self {
        Self { unit: BillingUnit::Year, count }
    }

    /// Parses a caller-supplied unit name. Anything but weeks, months or
    /// years is a caller error and fails before any API call.
    pub fn from_unit(unit: &str, count: u32) -> Result<Self> {
        match unit.to_ascii_lowercase().as_str() {
            "w" | "week" | "weeks" => Ok(Self::weeks(count)),
            "m" | "month" | "months" => Ok(Self::months(count)),
            "y" | "year" | "years" => Ok(Self::years(count)),
            other => Err(Error::InvalidInput(format!(
                "unsupported billing unit {other:?} (want weeks, months or years)"
            ))),
        }
    }

    pub fn encode_into(&self, params: &mut ParamMap) {
        let unit = match self.unit {
            BillingUnit::Week => "Week",
            BillingUnit::Month => "Month",
            BillingUnit::Year => "Year",
        };
        params.set("Period", self.count.to_string());
        params.set("PeriodUnit", unit);
    }
}

/// A disk category as it goes on the wire. Synthetic canonical categories
/// expand into two parameters; everything else passes through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireDiskCategory {
    pub category: String,
    pub performance_level: Option<&'static str>,
    pub bursting: bool,
}

/// Expands a canonical storage class to its wire form:
/// `cloud_essd_pl0|pl2|pl3` → `cloud_essd` + `PerformanceLevel`;
/// `cloud_auto` → `cloud_auto` + `BurstingEnabled=true`.
pub fn expand_disk_category(category: &str) -> WireDiskCategory {
    let (category, performance_level, bursting) = match category {
        "cloud_essd_pl0" => ("cloud_essd", Some("PL0"), false),
        "cloud_essd_pl2" => ("cloud_essd", Some("PL2"), false),
        "cloud_essd_pl3" => ("cloud_essd", Some("PL3"), false),
        "cloud_auto" => ("cloud_auto", None, true),
        other => (other, None, false),
    };
    WireDiskCategory {
        category: category.to_string(),
        performance_level,
        bursting,
    }
}

/// Folds a vendor (category, performance level) pair back into the
/// canonical storage class.
pub fn canonical_disk_category(category: &str, performance_level: &str) -> String {
    match (category, performance_level) {
        ("cloud_essd", "PL0") => "cloud_essd_pl0".into(),
        ("cloud_essd", "PL2") => "cloud_essd_pl2".into(),
        ("cloud_essd", "PL3") => "cloud_essd_pl3".into(),
        _ => category.into(),
    }
}

/// Vendor DNS line ↔ canonical routing policy value. The vendor column is
/// what `DescribeDomainRecords` answers and `AddDomainRecord` accepts.
const DNS_LINES: &[(&str, &str)] = &[
    ("default", "default"),
    ("oversea", "oversea"),
    ("telecom", "telecom"),
    ("unicom", "unicom"),
    ("mobile", "mobile"),
    ("edu", "cernet"),
    ("drpeng", "drpeng"),
    ("btvn", "btvn"),
    ("baidu", "baidu"),
    ("google", "google"),
    ("youdao", "youdao"),
    ("biying", "bing"),
];

/// Canonical policy for a vendor line; unknown lines fold into `default`.
pub fn policy_from_line(line: &str) -> &'static str {
    DNS_LINES
        .iter()
        .find(|(vendor, _)| *vendor == line)
        .map(|(_, policy)| *policy)
        .unwrap_or("default")
}

/// Vendor line for a canonical policy; `None` for policies the vendor
/// cannot express (surfaced to the caller as not-supported).
pub fn line_from_policy(policy: &str) -> Option<&'static str> {
    DNS_LINES
        .iter()
        .find(|(_, canonical)| *canonical == policy)
        .map(|(vendor, _)| *vendor)
}

/// Record TTLs the private-DNS product accepts.
pub const PVTZ_TTLS: &[u32] = &[
    5, 10, 15, 20, 30, 60, 120, 300, 600, 1800, 3600, 43200, 86400,
];

canonical_enum! {
    /// Canonical WAF action.
    WafAction {
        Block => "block",
        Alert => "alert",
        Allow => "allow",
        Unknown => "unknown",
    }
}

/// WAF defense types whose numeric `Mode` each carries its own meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WafDefenseType {
    Waf,
    Dld,
    AcCc,
    Antifraud,
    Normalized,
}

impl WafDefenseType {
    pub fn from_vendor(defense: &str) -> Option<Self> {
        match defense {
            "waf" => Some(WafDefenseType::Waf),
            "dld" => Some(WafDefenseType::Dld),
            "ac_cc" => Some(WafDefenseType::AcCc),
            "antifraud" => Some(WafDefenseType::Antifraud),
            "normalized" => Some(WafDefenseType::Normalized),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WafDefenseType::Waf => "waf",
            WafDefenseType::Dld => "dld",
            WafDefenseType::AcCc => "ac_cc",
            WafDefenseType::Antifraud => "antifraud",
            WafDefenseType::Normalized => "normalized",
        }
    }
}

/// Interprets a vendor `Mode` for one defense type. The tables differ per
/// type; `ac_cc` is the odd one out with allow-at-0.
pub fn waf_action(defense: WafDefenseType, mode: i64) -> WafAction {
    match (defense, mode) {
        (WafDefenseType::Waf, 0) => WafAction::Block,
        (WafDefenseType::Waf, 1) => WafAction::Alert,
        (WafDefenseType::AcCc, 0) => WafAction::Allow,
        (WafDefenseType::AcCc, 1) => WafAction::Block,
        (WafDefenseType::Dld, 0) => WafAction::Alert,
        (WafDefenseType::Dld, 1) => WafAction::Block,
        (WafDefenseType::Antifraud, 0) => WafAction::Alert,
        (WafDefenseType::Antifraud, 1) => WafAction::Block,
        (WafDefenseType::Normalized, 0) => WafAction::Alert,
        (WafDefenseType::Normalized, 1) => WafAction::Block,
        _ => WafAction::Unknown,
    }
}

canonical_enum! {
    /// RDS backup method sent as `BackupMethod`.
    BackupMethod {
        Physical => "Physical",
        Logical => "Logical",
        Snapshot => "Snapshot",
    }
}

/// A resolved backup request: the method plus the logical-backup extras.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackupPlan {
    pub method: BackupMethod,
    /// `BackupStrategy=db` when backing up a database whitelist.
    pub strategy: Option<&'static str>,
    /// CSV `DBName` list for logical backups.
    pub db_names: Option<String>,
}

impl BackupPlan {
    fn method(method: BackupMethod) -> Self {
        Self {
            method,
            strategy: None,
            db_names: None,
        }
    }
}

/// Picks the backup method from engine, engine version, storage category and
/// HA category, per the vendor's support matrix. A database whitelist forces
/// a logical backup on the MySQL rows that would otherwise go physical.
pub fn plan_backup(
    engine: &str,
    engine_version: &str,
    storage_category: &str,
    ha_category: &str,
    databases: &[String],
) -> BackupPlan {
    match engine {
        "MySQL" => {
            let essd_or_ssd =
                storage_category.starts_with("cloud_essd") || storage_category == "cloud_ssd";
            let ha = ha_category != "Basic";
            if matches!(engine_version, "5.7" | "8.0") && essd_or_ssd && ha {
                BackupPlan::method(BackupMethod::Snapshot)
            } else if storage_category == "cloud_ssd" && !ha {
                BackupPlan::method(BackupMethod::Snapshot)
            } else if !databases.is_empty() {
                BackupPlan {
                    method: BackupMethod::Logical,
                    strategy: Some("db"),
                    db_names: Some(databases.join(",")),
                }
            } else {
                BackupPlan::method(BackupMethod::Physical)
            }
        }
        "MariaDB" => BackupPlan::method(BackupMethod::Snapshot),
        "SQLServer" | "PPAS" => BackupPlan::method(BackupMethod::Physical),
        "PostgreSQL" => {
            if storage_category == "local_ssd" {
                BackupPlan::method(BackupMethod::Physical)
            } else {
                BackupPlan::method(BackupMethod::Snapshot)
            }
        }
        _ => BackupPlan::method(BackupMethod::Physical),
    }
}

canonical_enum! {
    /// Canonical elastic cache status. The many vendor maintenance states
    /// collapse into `changing`.
    ElasticCacheStatus {
        Running => "running",
        Deploying => "deploying",
        Changing => "changing",
        Inactive => "inactive",
        Flushing => "flushing",
        Released => "released",
        Unavailable => "unavailable",
        Error => "error",
        Migrating => "migrating",
        BackupRecovering => "backup_recovering",
        Unknown => "unknown",
    }
}

impl ElasticCacheStatus {
    pub fn from_vendor(status: &str) -> Self {
        match status {
            "Normal" => ElasticCacheStatus::Running,
            "Creating" => ElasticCacheStatus::Deploying,
            "Changing" | "Transforming" | "NetworkModifying" | "SSLModifying"
            | "MinorVersionUpgrading" | "MajorVersionUpgrading" => ElasticCacheStatus::Changing,
            "Inactive" => ElasticCacheStatus::Inactive,
            "Flushing" => ElasticCacheStatus::Flushing,
            "Released" => ElasticCacheStatus::Released,
            "Unavailable" => ElasticCacheStatus::Unavailable,
            "Error" => ElasticCacheStatus::Error,
            "Migrating" => ElasticCacheStatus::Migrating,
            "BackupRecovering" => ElasticCacheStatus::BackupRecovering,
            _ => ElasticCacheStatus::Unknown,
        }
    }
}

canonical_enum! {
    /// Canonical elastic cache topology.
    ElasticCacheArch {
        Single => "single",
        Master => "master",
        Cluster => "cluster",
        RwSplit => "rwsplit",
        Unknown => "unknown",
    }
}

impl ElasticCacheArch {
    /// The vendor splits the standard architecture by node count, so the
    /// mapping needs both fields.
    pub fn from_vendor(architecture_type: &str, node_type: &str) -> Self {
        match (architecture_type, node_type) {
            ("rwsplit", _) => ElasticCacheArch::RwSplit,
            ("cluster", _) => ElasticCacheArch::Cluster,
            ("standard", "single") => ElasticCacheArch::Single,
            ("standard", "double") => ElasticCacheArch::Master,
            _ => ElasticCacheArch::Unknown,
        }
    }
}
