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

//! The wait/poll engine and the bounded transient-retry helper.
//!
//! Asynchronous vendor workflows (provisioning, deletion, backup jobs)
//! become synchronous "done or failed" calls here. A probe runs immediately,
//! then on a fixed interval until it reports done, fails, the deadline
//! elapses, or the caller cancels.

use std::time::Duration;

use log::debug;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use crate::aliyun::error::{Error, Result};

/// What a poll probe saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe<T> {
    Done(T),
    Pending,
}

/// Polls `probe` every `interval` until it reports done or `timeout`
/// elapses. The first probe fires immediately. A probe error is fatal and
/// surfaces as-is; an elapsed deadline surfaces as [`Error::Timeout`].
pub async fn poll_until<T, F>(
    interval: Duration,
    timeout: Duration,
    what: &str,
    probe: F,
) -> Result<T>
where
    F: AsyncFnMut() -> Result<Probe<T>>,
{
    poll_with_cancel(interval, timeout, what, None, probe).await
}

/// [`poll_until`] with a cooperative cancellation token, consulted between
/// ticks. An in-flight probe is never interrupted; cancellation lands at the
/// next suspension point and surfaces as [`Error::Cancelled`].
pub async fn poll_with_cancel<T, F>(
    interval: Duration,
    timeout: Duration,
    what: &str,
    cancel: Option<&CancellationToken>,
    mut probe: F,
) -> Result<T>
where
    F: AsyncFnMut() -> Result<Probe<T>>,
{
    let started = Instant::now();
    loop {
        if let Probe::Done(value) = probe().await? {
            return Ok(value);
        }
        let waited = started.elapsed();
        if waited >= timeout {
            return Err(Error::Timeout {
                waited,
                what: what.into(),
            });
        }
        match cancel {
            None => sleep(interval).await,
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => return Err(Error::Cancelled(what.into())),
                    _ = sleep(interval) => {}
                }
            }
        }
    }
}

/// Runs `op`, retrying while the failure's vendor code contains any of
/// `codes`, up to `max_attempts` total attempts with `delay` between them.
/// Matching is on the structured vendor code, never a formatted message.
/// Anything non-matching, and the final attempt's failure, surface as-is.
pub async fn retry_on_codes<T, F>(
    codes: &[&str],
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T>
where
    F: AsyncFnMut() -> Result<T>,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let transient = e
                    .vendor_code()
                    .map(|code| codes.iter().any(|pat| code.contains(pat)))
                    .unwrap_or(false);
                if !transient || attempt >= max_attempts {
                    return Err(e);
                }
                debug!("attempt {attempt}/{max_attempts} hit transient {:?}, retrying", e.vendor_code());
                attempt += 1;
                sleep(delay).await;
            }
        }
    }
}
