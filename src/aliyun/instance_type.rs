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

//! The instance-type catalog row. Fetched once per region (token-paginated)
//! and matched locally against requested CPU/memory shapes.

use serde::Deserialize;

/// One row of `DescribeInstanceTypes`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct InstanceType {
    pub instance_type_id: String,
    pub instance_type_family: String,
    pub cpu_core_count: u32,
    /// Vendor reports GiB, possibly fractional (0.5 for the smallest burst
    /// types).
    pub memory_size: f64,
    #[serde(rename = "GPUAmount")]
    pub gpu_amount: u32,
    pub local_storage_capacity: i64,
    pub local_storage_category: String,
}

impl InstanceType {
    /// Memory in MiB, the unit the canonical create request speaks.
    pub fn memory_mb(&self) -> u32 {
        (self.memory_size * 1024.0).round() as u32
    }
}
