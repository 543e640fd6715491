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

//! Aliyun adapter: clients, core engines and one module per resource family.
//!
//! The layering is strict: facades call [`Region`], `Region` calls
//! [`Client`], `Client` calls the injected [`Gateway`]. The engines
//! ([`paging`], [`wait`], [`params`]) and the mapping tables ([`types`])
//! are pure over that stack and carry the bulk of the unit tests.

pub mod cen;
pub mod client;
pub mod disk;
pub mod dns_record;
pub mod dns_zone;
pub mod elastic_cache;
pub mod eni;
pub mod error;
pub mod gateway;
pub mod host;
pub mod image;
pub mod instance;
pub mod instance_type;
pub mod params;
pub mod paging;
pub mod pvtz_record;
pub mod pvtz_zone;
pub mod rds_backup;
pub mod region;
pub mod storage;
pub mod types;
pub mod utils;
pub mod wait;
pub mod waf;
pub mod wire;
pub mod zone;

pub use cen::{Cen, CenChild, CenChildSpec, CenRouteEntry};
pub use client::{Client, ClientBuilder};
pub use disk::{Disk, DiskCreateOptions};
pub use dns_record::{DnsRecord, DnsRecordOptions};
pub use dns_zone::DnsZone;
pub use elastic_cache::{CacheNetInfo, ElasticCache, ElasticCacheAttribute};
pub use eni::NetworkInterface;
pub use error::{Error, ErrorKind, Result};
pub use gateway::{ApiError, Document, Gateway, ProductFamily};
pub use host::Host;
pub use image::Image;
pub use instance::{
    DataDiskSpec, DeployVmOptions, Instance, SpecChangeOptions, VmCreateOptions,
};
pub use instance_type::InstanceType;
pub use params::ParamMap;
pub use paging::{Page, TokenPage};
pub use pvtz_record::{PvtzRecord, PvtzRecordOptions};
pub use pvtz_zone::{PvtzVpc, PvtzZone};
pub use rds_backup::{DbBackup, DbInstanceAttribute};
pub use region::{Region, VSwitch, Vpc};
pub use storage::StoragePool;
pub use types::{BillingCycle, CloudResource};
pub use waf::{WafDomain, WafDomainDetail, WafInstance};
pub use wire::Wire;
pub use zone::Zone;

/// Provider tag used in synthesized identities and manufacturer fields.
pub const PROVIDER: &str = "aliyun";

/// Bandwidth (Mbps) reported for synthesized wires. The vendor does not
/// expose per-VPC fabric bandwidth, so a uniform constant stands in.
pub const WIRE_BANDWIDTH_MBPS: u32 = 10000;
