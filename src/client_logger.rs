//! Logging trait for FlowFix client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! every exchange passing through the [`FlowFix`](crate::FlowFix) client, and
//! [`StderrLogger`], which writes them to stderr as one JSON document per line.

use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::types::{ChatRequest, ChatResponse};

/// A trait for logging FlowFix client operations.
///
/// # Example
///
/// ```rust,ignore
/// use flowfix::{ChatRequest, ChatResponse, ClientLogger, Error};
/// use std::sync::Mutex;
/// use url::Url;
///
/// #[derive(Default)]
/// struct CountingLogger {
///     failures: Mutex<usize>,
/// }
///
/// impl ClientLogger for CountingLogger {
///     fn log_request(&self, _: &Url, _: &ChatRequest) {}
///     fn log_response(&self, _: &ChatResponse) {}
///     fn log_error(&self, _: &Error) {
///         *self.failures.lock().unwrap() += 1;
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent to `endpoint`.
    fn log_request(&self, endpoint: &Url, request: &ChatRequest);

    /// Log a successfully decoded response.
    fn log_response(&self, response: &ChatResponse);

    /// Log a failed exchange.
    ///
    /// Called once per request that ends in an error, whatever the cause:
    /// transport failure, non-success status or undecodable body.
    fn log_error(&self, error: &Error);
}

/// A [`ClientLogger`] that writes each event to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogger;

impl StderrLogger {
    /// Creates a new stderr logger.
    pub fn new() -> Self {
        Self
    }

    fn emit<T: Serialize>(&self, label: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => eprintln!("[flowfix] {label} {json}"),
            Err(e) => eprintln!("[flowfix] {label} <serialization error: {e}>"),
        }
    }
}

impl ClientLogger for StderrLogger {
    fn log_request(&self, endpoint: &Url, request: &ChatRequest) {
        self.emit(&format!("POST {endpoint}"), request);
    }

    fn log_response(&self, response: &ChatResponse) {
        self.emit("response", response);
    }

    fn log_error(&self, error: &Error) {
        eprintln!("[flowfix] error {error}");
    }
}
