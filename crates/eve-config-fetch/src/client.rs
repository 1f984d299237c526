// SPDX-License-Identifier: BUSL-1.1

//! The wire protocol spoken to the controller (protobuf framing, mTLS) is an
//! external collaborator out of scope here; `ControllerClient` is the narrow
//! interface the fetcher reaches through, one instance per eligible uplink.

use std::future::Future;
use std::pin::Pin;

use crate::error::FetchError;

/// Outcome of a single successful round-trip to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResponse {
    /// The config changed since `prev_hash`; carries the raw response body.
    Modified(Vec<u8>),
    /// The controller confirmed `prev_hash` is still current.
    NotModified,
}

pub trait ControllerClient: Send + Sync {
    /// Fetch the config, conditioned on the hash of the last accepted
    /// config (spec §4.C step 1: "carrying the hash of the previously
    /// accepted config").
    fn fetch_config<'a>(
        &'a self,
        prev_hash: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ConfigResponse, FetchError>> + Send + 'a>>;
}

/// In-memory test double standing in for an uplink.
pub struct TestDoubleClient {
    pub responses: std::sync::Mutex<std::collections::VecDeque<Result<ConfigResponse, FetchError>>>,
}

impl TestDoubleClient {
    pub fn new(responses: Vec<Result<ConfigResponse, FetchError>>) -> Self {
        Self { responses: std::sync::Mutex::new(responses.into_iter().collect()) }
    }
}

impl ControllerClient for TestDoubleClient {
    fn fetch_config<'a>(
        &'a self,
        _prev_hash: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ConfigResponse, FetchError>> + Send + 'a>> {
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Temporary("test double exhausted".to_string())));
        Box::pin(async move { next })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
