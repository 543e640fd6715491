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

//! The injected transport seam.
//!
//! Everything below flat parameter maps and parsed JSON documents — signing,
//! endpoint resolution, HTTP, connection pooling, low-level retry — belongs
//! to the host's [`Gateway`] implementation. The adapter never opens a
//! socket itself.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::aliyun::error::{Error as AdapterError, Result};
use crate::aliyun::params::ParamMap;

/// Product families the gateway routes on. Each corresponds to one Aliyun
/// RPC endpoint family (`ecs.aliyuncs.com`, `cbn.aliyuncs.com`, ...); the
/// gateway owns the endpoint and API-version lookup per family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductFamily {
    /// Compute: instances, disks, images, key pairs, network interfaces.
    Ecs,
    /// VPC inventory: vpcs, vswitches.
    Vpc,
    /// Cloud Enterprise Network (inter-VPC routing).
    Cbn,
    /// Relational database service (backups).
    Rds,
    /// Elastic cache (r-kvstore: Redis and Memcache instances).
    Kvstore,
    /// Public DNS.
    AliDns,
    /// Private DNS zones.
    Pvtz,
    /// Web application firewall.
    Waf,
    /// Web application firewall, v2 API surface.
    WafV2,
}

impl ProductFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductFamily::Ecs => "ecs",
            ProductFamily::Vpc => "vpc",
            ProductFamily::Cbn => "cbn",
            ProductFamily::Rds => "rds",
            ProductFamily::Kvstore => "r-kvstore",
            ProductFamily::AliDns => "alidns",
            ProductFamily::Pvtz => "pvtz",
            ProductFamily::Waf => "waf",
            ProductFamily::WafV2 => "wafv2",
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vendor failure as the gateway surfaces it: the RPC `Code`/`Message`
/// pair, plus the request id when one came back. Transport-level failures
/// use a synthetic code (for example `SDK.ServerError`) so the classifier
/// has something to chew on either way.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }
}

/// The transport the host plugs in. One call = one signed RPC `Action`.
///
/// Implementations must resolve the regional endpoint for `family`, sign the
/// flat `params` (plus whatever common parameters the wire format needs) and
/// hand back the parsed JSON body. A non-2xx RPC answer becomes an
/// [`ApiError`] carrying the vendor `Code` and `Message` verbatim.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn request(
        &self,
        family: ProductFamily,
        action: &str,
        params: &ParamMap,
    ) -> Result<Document, ApiError>;
}

/// A parsed RPC response body.
///
/// Aliyun answers are JSON objects with PascalCase keys and one level of
/// wrapper nesting around lists (`{"Disks": {"Disk": [...]}}`); the accessors
/// here take a key path so call sites can reach through that shape without
/// intermediate types.
#[derive(Clone, Debug, Default)]
pub struct Document {
    root: Value,
}

impl From<Value> for Document {
    fn from(root: Value) -> Self {
        Self { root }
    }
}

impl Document {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The `RequestId` every RPC answer carries.
    pub fn request_id(&self) -> Option<&str> {
        self.root.get("RequestId").and_then(Value::as_str)
    }

    /// Raw node at `path`, if present.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut node = &self.root;
        for key in path {
            node = node.get(key)?;
        }
        Some(node)
    }

    /// String at `path`; numbers and booleans are stringified, which matches
    /// the vendor's habit of answering numeric ids as either shape.
    pub fn str_at(&self, path: &[&str]) -> Result<String> {
        match self.get(path) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            _ => Err(missing(path)),
        }
    }

    pub fn opt_str(&self, path: &[&str]) -> Option<String> {
        self.str_at(path).ok().filter(|s| !s.is_empty())
    }

    /// Integer at `path`; tolerates numeric strings.
    pub fn int_at(&self, path: &[&str]) -> Result<i64> {
        match self.get(path) {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| missing(path)),
            Some(Value::String(s)) => s.parse().map_err(|_| missing(path)),
            _ => Err(missing(path)),
        }
    }

    pub fn int_or(&self, path: &[&str], default: i64) -> i64 {
        self.int_at(path).unwrap_or(default)
    }

    /// Deserializes the node at `path` into a caller shape.
    pub fn unmarshal<T: DeserializeOwned>(&self, path: &[&str]) -> Result<T> {
        let node = self.get(path).ok_or_else(|| missing(path))?;
        serde_json::from_value(node.clone()).map_err(|e| AdapterError::BadResponse {
            path: path.join("."),
            detail: e.to_string(),
        })
    }

    /// Like [`unmarshal`](Self::unmarshal), but an absent node yields the
    /// default value. List endpoints omit the wrapper entirely when nothing
    /// matched, so every list call site goes through this.
    pub fn unmarshal_or_default<T: DeserializeOwned + Default>(&self, path: &[&str]) -> Result<T> {
        match self.get(path) {
            None => Ok(T::default()),
            Some(Value::Null) => Ok(T::default()),
            Some(node) => {
                serde_json::from_value(node.clone()).map_err(|e| AdapterError::BadResponse {
                    path: path.join("."),
                    detail: e.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

fn missing(path: &[&str]) -> AdapterError {
    AdapterError::BadResponse {
        path: path.join("."),
        detail: "missing or mistyped field".into(),
    }
}
