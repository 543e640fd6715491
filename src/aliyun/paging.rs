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

//! Pagination drivers.
//!
//! Aliyun list endpoints paginate in one of two ways: `PageNumber`/`PageSize`
//! with a `TotalCount` in the answer, or an opaque `NextToken`. Both drivers
//! preserve server order, stop on an empty batch, and wrap a failed page
//! request with the page it was fetching.

use crate::aliyun::error::Result;

/// Default `PageSize` when an endpoint has no documented cap.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One indexed page: the rows plus the server-reported total.
#[derive(Clone, Debug, Default)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }
}

/// One token page: the rows plus the continuation token, if any.
#[derive(Clone, Debug, Default)]
pub struct TokenPage<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> TokenPage<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }
}

/// Drives `PageNumber`/`PageSize` pagination to exhaustion. Page numbers
/// start at 1; accumulation stops once the server-reported total is reached,
/// or on an empty batch (servers have been seen reporting a total they then
/// never deliver).
pub async fn collect_indexed<T, F>(page_size: u32, mut fetch: F) -> Result<Vec<T>>
where
    F: AsyncFnMut(u32, u32) -> Result<Page<T>>,
{
    let mut rows: Vec<T> = Vec::new();
    let mut page_number = 1u32;
    loop {
        let page = fetch(page_number, page_size)
            .await
            .map_err(|e| e.ctx(format!("page {page_number} (size {page_size})")))?;
        let batch = page.items.len();
        rows.extend(page.items);
        if batch == 0 || rows.len() >= page.total {
            return Ok(rows);
        }
        page_number += 1;
    }
}

/// Drives `NextToken` pagination to exhaustion. Stops when the answer has no
/// token, an empty token, or a token alongside an empty batch (the required
/// short-circuit for endpoints that keep returning a token past the end).
pub async fn collect_tokened<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: AsyncFnMut(Option<&str>) -> Result<TokenPage<T>>,
{
    let mut rows: Vec<T> = Vec::new();
    let mut token: Option<String> = None;
    let mut batch_number = 1u32;
    loop {
        let page = fetch(token.as_deref())
            .await
            .map_err(|e| e.ctx(format!("batch {batch_number}")))?;
        let batch = page.items.len();
        rows.extend(page.items);
        match page.next_token {
            Some(next) if !next.is_empty() && batch > 0 => token = Some(next),
            _ => return Ok(rows),
        }
        batch_number += 1;
    }
}
