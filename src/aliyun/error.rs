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

//! Canonical error model and the vendor-code classifier.
//!
//! Orchestrators react to [`ErrorKind`], never to display strings. Vendor
//! codes are classified exactly once, here, through a data-driven substring
//! table; the retry helper in [`crate::aliyun::wait`] matches on
//! [`Error::vendor_code`] for the same reason.

use std::time::Duration;

use thiserror::Error;

use crate::aliyun::gateway::ApiError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification the caller can branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resource does not exist upstream.
    NotFound,
    /// The remote state refuses the operation right now.
    InvalidStatus,
    /// Concurrent mutation, throttling or another transient clash; retryable.
    Conflict,
    /// The vendor (or this adapter) does not support the request.
    NotSupported,
    /// A poll deadline elapsed or the wait was cancelled.
    Timeout,
    /// Caller-side validation failed; no API call was made.
    InvalidInput,
    /// Anything else: transport failures, unclassified vendor codes,
    /// malformed response bodies.
    Transport,
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Conflict)
    }
}

/// Vendor-code substring table, first match wins. Codes follow the
/// `Invalid<Thing>.<Reason>` convention, so substrings are stable across
/// resource kinds.
const CODE_KINDS: &[(&str, ErrorKind)] = &[
    (".NotFound", ErrorKind::NotFound),
    ("NotExist", ErrorKind::NotFound),
    ("NoExist", ErrorKind::NotFound),
    ("EntityNotExist", ErrorKind::NotFound),
    ("Forbidden.InstanceNotFound", ErrorKind::NotFound),
    ("IncorrectInstanceStatus", ErrorKind::InvalidStatus),
    ("IncorrectDiskStatus", ErrorKind::InvalidStatus),
    ("IncorrectStatus", ErrorKind::InvalidStatus),
    ("OperationDenied", ErrorKind::InvalidStatus),
    ("InvalidOperation.Conflict", ErrorKind::Conflict),
    ("OperationConflict", ErrorKind::Conflict),
    ("LastTokenProcessing", ErrorKind::Conflict),
    ("Throttling", ErrorKind::Conflict),
    ("ServiceUnavailable", ErrorKind::Conflict),
    ("NotSupported", ErrorKind::NotSupported),
    ("UnsupportedOperation", ErrorKind::NotSupported),
    ("InvalidParameter", ErrorKind::InvalidInput),
    ("MissingParameter", ErrorKind::InvalidInput),
];

pub(crate) fn classify_code(code: &str) -> ErrorKind {
    for (pat, kind) in CODE_KINDS {
        if code.contains(pat) {
            return *kind;
        }
    }
    ErrorKind::Transport
}

/// Last-resort inference for gateways that lose the code but keep a message.
fn infer_from_message(message: &str) -> Option<ErrorKind> {
    let m = message.to_ascii_lowercase();
    if m.contains("not found") || m.contains("does not exist") {
        Some(ErrorKind::NotFound)
    } else if m.contains("try again later") || m.contains("conflict") {
        Some(ErrorKind::Conflict)
    } else {
        None
    }
}

/// Adapter error. Every variant renders as a single line; context wrapping
/// adds one more line per call site through the error source chain.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("{action} rejected: {detail}")]
    InvalidStatus {
        action: String,
        detail: String,
        /// Vendor code when the rejection came from upstream, empty when it
        /// was a local state check.
        code: String,
    },

    #[error("{action} conflicted: {detail}")]
    Conflict {
        action: String,
        detail: String,
        code: String,
    },

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout { waited: Duration, what: String },

    #[error("cancelled while waiting for {0}")]
    Cancelled(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Vendor error with no better classification.
    #[error("{action} failed")]
    Api {
        action: String,
        #[source]
        source: ApiError,
    },

    /// The response body did not hold the expected shape.
    #[error("malformed response at {path}: {detail}")]
    BadResponse { path: String, detail: String },

    /// One line of call-site context around a lower error.
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidStatus { .. } => ErrorKind::InvalidStatus,
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::NotSupported(_) => ErrorKind::NotSupported,
            Error::Timeout { .. } | Error::Cancelled(_) => ErrorKind::Timeout,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::Api { .. } | Error::BadResponse { .. } => ErrorKind::Transport,
            Error::Context { source, .. } => source.kind(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// The vendor code behind this error, when one exists. Walks through
    /// context wrapping so retry configuration sees the original code.
    pub fn vendor_code(&self) -> Option<&str> {
        match self {
            Error::InvalidStatus { code, .. } | Error::Conflict { code, .. } => {
                (!code.is_empty()).then_some(code.as_str())
            }
            Error::Api { source, .. } => Some(&source.code),
            Error::Context { source, .. } => source.vendor_code(),
            _ => None,
        }
    }

    /// Wraps `self` with one line of call-site context.
    pub fn ctx(self, context: impl Into<String>) -> Error {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Local (not vendor-reported) state rejection.
    pub(crate) fn state(action: &str, detail: impl Into<String>) -> Error {
        Error::InvalidStatus {
            action: action.into(),
            detail: detail.into(),
            code: String::new(),
        }
    }
}

/// Turns a gateway failure into the canonical error for `action`.
pub(crate) fn classify_api(action: &str, source: ApiError) -> Error {
    let mut kind = classify_code(&source.code);
    if kind == ErrorKind::Transport {
        if let Some(inferred) = infer_from_message(&source.message) {
            kind = inferred;
        }
    }
    match kind {
        ErrorKind::NotFound => Error::NotFound(format!("{action}: {}", source.code)),
        ErrorKind::InvalidStatus => Error::InvalidStatus {
            action: action.into(),
            detail: format!("{}: {}", source.code, source.message),
            code: source.code,
        },
        ErrorKind::Conflict => Error::Conflict {
            action: action.into(),
            detail: format!("{}: {}", source.code, source.message),
            code: source.code,
        },
        ErrorKind::NotSupported => Error::NotSupported(format!("{action}: {}", source.code)),
        ErrorKind::InvalidInput => {
            Error::InvalidInput(format!("{action}: {}: {}", source.code, source.message))
        }
        _ => Error::Api {
            action: action.into(),
            source,
        },
    }
}
