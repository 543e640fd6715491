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

//! # Aliyun Resource Adapter (`aliyun-adapter`)
//!
//! This crate translates Alibaba Cloud (Aliyun) REST APIs into the canonical
//! resource model of a multi-cloud orchestrator: ECS instances, disks, images
//! and network interfaces, VPC/CEN networking, public and private DNS, RDS
//! backups, elastic caches, WAF, plus the synthesized host/wire/storage-pool
//! views a public cloud is expected to present.
//!
//! The crate does not sign or send HTTP itself. The host supplies a
//! [`aliyun::Gateway`] implementation that owns credentials, endpoint
//! resolution and the wire; everything above it (pagination, polling,
//! parameter encoding, status mapping, error classification) lives here.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use aliyun_adapter::aliyun::{ApiError, Client, Document, Gateway, ParamMap, ProductFamily};
//!
//! struct SignedTransport; // your signer + HTTP stack
//!
//! #[async_trait::async_trait]
//! impl Gateway for SignedTransport {
//!     async fn request(
//!         &self,
//!         family: ProductFamily,
//!         action: &str,
//!         params: &ParamMap,
//!     ) -> Result<Document, ApiError> {
//!         // sign, POST to the family endpoint, hand back the JSON body
//!         unimplemented!()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Client::builder(Arc::new(SignedTransport))
//!         .account_id("1234567890123456")
//!         .build();
//!
//!     let region = client.region("cn-hangzhou");
//!     for vm in region.instances(None, &[]).await.expect("request failed") {
//!         println!("{} is {}", vm.instance_id, vm.state());
//!     }
//! }
//! ```
//!
//! ## Design
//! - One module per resource family under [`aliyun`], each pairing a serde
//!   payload with the operations the orchestrator drives
//! - Listings run through the pagination drivers in [`aliyun::paging`]
//! - Long-running vendor operations poll through [`aliyun::wait`]
//! - Vendor error codes are classified once, in [`aliyun::error`]

pub mod aliyun;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
