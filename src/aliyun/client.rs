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

//! The account-scoped client: a gateway handle plus the account identity
//! that synthesized hosts are named after.

use std::sync::Arc;

use log::debug;

use crate::aliyun::error::{Result, classify_api};
use crate::aliyun::gateway::{Document, Gateway, ProductFamily};
use crate::aliyun::params::ParamMap;
use crate::aliyun::region::Region;

/// Cheap-to-clone handle over the injected gateway. One `Client` per
/// Aliyun account; regions hang off it via [`Client::region`].
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    gateway: Arc<dyn Gateway>,
    account_id: String,
    debug: bool,
}

impl Client {
    pub fn builder(gateway: Arc<dyn Gateway>) -> ClientBuilder {
        ClientBuilder {
            gateway,
            account_id: String::new(),
            debug: false,
        }
    }

    /// The account id, used in synthesized host identities
    /// (`<account-id>-<zone-id>`) and cross-account CEN attachments.
    pub fn account_id(&self) -> &str {
        &self.inner.account_id
    }

    /// A handle on one region. Regions are cheap; nothing is fetched until
    /// an operation runs.
    pub fn region(&self, region_id: impl Into<String>) -> Region {
        Region::new(self.clone(), region_id.into())
    }

    /// Sends one RPC action and classifies any vendor failure. All remote
    /// traffic in the crate funnels through here.
    pub(crate) async fn request(
        &self,
        family: ProductFamily,
        action: &str,
        params: &ParamMap,
    ) -> Result<Document> {
        if self.inner.debug {
            debug!("-> {family} {action} {params:?}");
        }
        match self.inner.gateway.request(family, action, params).await {
            Ok(doc) => {
                if self.inner.debug {
                    debug!("<- {action} request_id={:?}", doc.request_id());
                }
                Ok(doc)
            }
            Err(api) => {
                if self.inner.debug {
                    debug!("<- {action} error {api}");
                }
                Err(classify_api(action, api))
            }
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("account_id", &self.inner.account_id)
            .field("debug", &self.inner.debug)
            .finish_non_exhaustive()
    }
}

/// Fluent builder for [`Client`].
pub struct ClientBuilder {
    gateway: Arc<dyn Gateway>,
    account_id: String,
    debug: bool,
}

impl ClientBuilder {
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Logs every request and response line at debug level.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn build(self) -> Client {
        Client {
            inner: Arc::new(Inner {
                gateway: self.gateway,
                account_id: self.account_id,
                debug: self.debug,
            }),
        }
    }
}
