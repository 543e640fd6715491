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

//! Scripted gateway for the integration tests: replies are queued per
//! (family, action); the last reply of a queue is sticky so polling loops
//! can be scripted with a finite list.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use aliyun_adapter::aliyun::{
    ApiError, Client, Document, Gateway, ParamMap, ProductFamily, Region,
};

/// One request as the adapter issued it.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub family: ProductFamily,
    pub action: String,
    pub params: BTreeMap<String, String>,
}

impl RecordedCall {
    #[allow(dead_code)]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Default)]
struct MockState {
    routes: BTreeMap<(ProductFamily, String), VecDeque<Result<Value, ApiError>>>,
    calls: Vec<RecordedCall>,
}

/// In-memory [`Gateway`]: no signing, no sockets, just scripted bodies.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one successful reply for `(family, action)`.
    pub fn reply(&self, family: ProductFamily, action: &str, body: Value) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .entry((family, action.to_string()))
            .or_default()
            .push_back(Ok(body));
        self
    }

    /// Queues one vendor failure for `(family, action)`.
    pub fn fail(&self, family: ProductFamily, action: &str, code: &str, message: &str) -> &Self {
        self.state
            .lock()
            .unwrap()
            .routes
            .entry((family, action.to_string()))
            .or_default()
            .push_back(Err(ApiError::new(code, message)));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_for(&self, action: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.action == action)
            .collect()
    }

    pub fn call_count(&self, action: &str) -> usize {
        self.calls_for(action).len()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn request(
        &self,
        family: ProductFamily,
        action: &str,
        params: &ParamMap,
    ) -> Result<Document, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            family,
            action: action.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        let queue = state
            .routes
            .get_mut(&(family, action.to_string()))
            .ok_or_else(|| {
                ApiError::new("Mock.NoRoute", format!("no reply scripted for {family} {action}"))
            })?;
        // Sticky last entry: drain the queue, then repeat its tail forever.
        let body = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .ok_or_else(|| {
                    ApiError::new("Mock.NoRoute", format!("reply queue empty for {action}"))
                })?
        };
        body.map(Document::new)
    }
}

/// A client over a fresh mock, test account id baked in.
pub fn client() -> (MockGateway, Client) {
    let gateway = MockGateway::new();
    let client = Client::builder(Arc::new(gateway.clone()))
        .account_id("1234567890123456")
        .build();
    (gateway, client)
}

/// Shorthand for the region every test drives.
#[allow(dead_code)]
pub fn region() -> (MockGateway, Region) {
    let (gateway, client) = client();
    (gateway, client.region("cn-hangzhou"))
}

// Fixture bodies, shaped the way the vendor answers them.

#[allow(dead_code)]
pub fn instance_body(instance_id: &str, status: &str, zone_id: &str) -> Value {
    json!({
        "InstanceId": instance_id,
        "InstanceName": format!("name-{instance_id}"),
        "Status": status,
        "ZoneId": zone_id,
        "Cpu": 2,
        "Memory": 4096,
        "InstanceType": "ecs.g6.large",
        "InstanceChargeType": "PostPaid",
        "OSType": "linux",
        "ImageId": "m-base",
        "CreationTime": "2026-08-01T03:15Z",
        "VpcAttributes": {
            "VpcId": "vpc-1",
            "VSwitchId": "vsw-1",
            "PrivateIpAddress": { "IpAddress": ["192.168.0.10"] }
        },
        "SecurityGroupIds": { "SecurityGroupId": ["sg-1"] },
        "PublicIpAddress": { "IpAddress": [] },
        "EipAddress": { "AllocationId": "", "IpAddress": "" }
    })
}

#[allow(dead_code)]
pub fn instances_page(items: Vec<Value>, total: usize) -> Value {
    json!({
        "TotalCount": total,
        "Instances": { "Instance": items }
    })
}

#[allow(dead_code)]
pub fn disk_body(disk_id: &str, status: &str, disk_type: &str) -> Value {
    json!({
        "DiskId": disk_id,
        "DiskName": format!("name-{disk_id}"),
        "Status": status,
        "Type": disk_type,
        "Category": "cloud_essd",
        "PerformanceLevel": "PL1",
        "Size": 40,
        "ZoneId": "cn-hangzhou-h",
        "InstanceId": "",
        "DiskChargeType": "PostPaid"
    })
}

#[allow(dead_code)]
pub fn disks_page(items: Vec<Value>, total: usize) -> Value {
    json!({
        "TotalCount": total,
        "Disks": { "Disk": items }
    })
}

#[allow(dead_code)]
pub fn empty_disks() -> Value {
    disks_page(vec![], 0)
}

#[allow(dead_code)]
pub fn cen_body(cen_id: &str, status: &str) -> Value {
    json!({
        "CenId": cen_id,
        "Name": format!("name-{cen_id}"),
        "Description": "",
        "Status": status
    })
}

#[allow(dead_code)]
pub fn cens_page(items: Vec<Value>, total: usize) -> Value {
    json!({
        "TotalCount": total,
        "Cens": { "Cen": items }
    })
}
