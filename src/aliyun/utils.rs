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

//! Small shared helpers: tolerant vendor timestamp parsing and the key-pair
//! fingerprint naming scheme.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parses the timestamp shapes Aliyun answers with. Most products use full
/// RFC 3339; ECS truncates creation/expiration times to minute precision
/// (`2019-05-16T03:22Z`).
pub fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%MZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t.and_utc());
        }
    }
    None
}

/// Serde helper for optional vendor timestamps. Absent, empty and unparsable
/// values all deserialize to `None`; facades treat a missing time as
/// "vendor did not report one", never as an error.
pub fn de_opt_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().filter(|s| !s.is_empty()).and_then(parse_time))
}

/// Name for a vendor-managed key pair derived from the public key material,
/// so repeated deploys of the same key converge on one remote object.
pub fn key_pair_name(public_key: &str) -> String {
    format!("sshkey-{:x}", md5::compute(public_key.trim().as_bytes()))
}
