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

//! The flat parameter map every RPC action takes, plus the encoding rules
//! for the awkward parts of the wire format: `Prefix.N.Field` indexed
//! groups, JSON-array id filters, and the per-call idempotency token.
//!
//! Call sites never compose indexed keys by hand; groups go through
//! [`ParamMap::group`] so indices stay contiguous and 1-based.

use std::collections::BTreeMap;

use rand::Rng;
use rand::distr::Alphanumeric;

/// Ordered flat `Name=Value` map. BTreeMap keeps emission deterministic,
/// which the gateway's canonical signing string wants anyway.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: BTreeMap<String, String>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Sets `key` only when `value` is present and non-empty.
    pub fn opt(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> &mut Self {
        if let Some(v) = value {
            let v: String = v.into();
            if !v.is_empty() {
                self.entries.insert(key.into(), v);
            }
        }
        self
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: impl Into<i64>) -> &mut Self {
        self.entries.insert(key.into(), value.into().to_string());
        self
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) -> &mut Self {
        self.entries
            .insert(key.into(), if value { "true" } else { "false" }.into());
        self
    }

    /// JSON-array encoding for endpoints that filter by id list
    /// (`InstanceIds=["i-a","i-b"]`).
    pub fn set_json_list(&mut self, key: impl Into<String>, items: &[&str]) -> &mut Self {
        if !items.is_empty() {
            // Serializing &[&str] cannot fail.
            let encoded = serde_json::to_string(items).unwrap_or_default();
            self.entries.insert(key.into(), encoded);
        }
        self
    }

    /// Comma-joined encoding for endpoints that want CSV (`ImageId=a,b`).
    pub fn set_csv(&mut self, key: impl Into<String>, items: &[&str]) -> &mut Self {
        if !items.is_empty() {
            self.entries.insert(key.into(), items.join(","));
        }
        self
    }

    /// Opens indexed group `n` (1-based) under `prefix`, e.g.
    /// `map.group("DataDisk", 1).set("Size", "100")` emits `DataDisk.1.Size`.
    pub fn group(&mut self, prefix: &str, n: usize) -> ParamGroup<'_> {
        debug_assert!(n >= 1, "indexed groups are 1-based");
        ParamGroup {
            map: self,
            prefix: format!("{prefix}.{n}"),
        }
    }

    /// Fresh idempotency nonce for this call. Mutating actions that support
    /// `ClientToken` must emit one per attempt; it is the only duplicate
    /// protection when a network retry happens below the gateway.
    pub fn client_token(&mut self) -> &mut Self {
        let token = gen_client_token();
        self.entries.insert("ClientToken".into(), token);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys under `prefix.` (used by tests to assert group contiguity).
    pub fn keys_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let dotted = format!("{prefix}.");
        self.entries
            .keys()
            .filter(move |k| k.starts_with(&dotted))
            .map(String::as_str)
    }
}

/// Writer for one `Prefix.N` indexed group.
pub struct ParamGroup<'a> {
    map: &'a mut ParamMap,
    prefix: String,
}

impl ParamGroup<'_> {
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.map.set(format!("{}.{}", self.prefix, field), value);
        self
    }

    pub fn opt(&mut self, field: &str, value: Option<impl Into<String>>) -> &mut Self {
        self.map.opt(format!("{}.{}", self.prefix, field), value);
        self
    }

    pub fn set_bool(&mut self, field: &str, value: bool) -> &mut Self {
        self.map.set_bool(format!("{}.{}", self.prefix, field), value);
        self
    }
}

/// 20-character alphanumeric request nonce.
pub fn gen_client_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_optional_params() {
        let mut p = ParamMap::new();
        p.set("RegionId", "cn-hangzhou");
        p.opt("ZoneId", Some("cn-hangzhou-b"));
        p.opt("VpcId", None::<String>);
        p.opt("Name", Some(""));
        assert_eq!(p.get("RegionId"), Some("cn-hangzhou"));
        assert_eq!(p.get("ZoneId"), Some("cn-hangzhou-b"));
        assert!(!p.contains_key("VpcId"));
        assert!(!p.contains_key("Name"));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn indexed_groups_are_one_based_and_contiguous() {
        let mut p = ParamMap::new();
        for (i, (k, v)) in [("env", "prod"), ("team", "infra")].iter().enumerate() {
            let mut g = p.group("Tag", i + 1);
            g.set("Key", *k);
            g.set("Value", *v);
        }
        assert_eq!(p.get("Tag.1.Key"), Some("env"));
        assert_eq!(p.get("Tag.1.Value"), Some("prod"));
        assert_eq!(p.get("Tag.2.Key"), Some("team"));
        assert_eq!(p.get("Tag.2.Value"), Some("infra"));
        assert_eq!(p.keys_under("Tag").count(), 4);
    }

    #[test]
    fn list_encodings() {
        let mut p = ParamMap::new();
        p.set_json_list("InstanceIds", &["i-a", "i-b"]);
        p.set_csv("ImageId", &["m-1", "m-2"]);
        p.set_json_list("DiskIds", &[]);
        assert_eq!(p.get("InstanceIds"), Some(r#"["i-a","i-b"]"#));
        assert_eq!(p.get("ImageId"), Some("m-1,m-2"));
        assert!(!p.contains_key("DiskIds"));
    }

    #[test]
    fn client_tokens_are_twenty_alphanumerics_and_fresh() {
        let mut p = ParamMap::new();
        p.client_token();
        let first = p.get("ClientToken").unwrap().to_string();
        assert_eq!(first.len(), 20);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        p.client_token();
        let second = p.get("ClientToken").unwrap();
        assert_ne!(first, second);
    }

    quickcheck! {
        fn tokens_always_valid(_seed: u8) -> bool {
            let t = gen_client_token();
            t.len() == 20 && t.chars().all(|c| c.is_ascii_alphanumeric())
        }
    }
}
