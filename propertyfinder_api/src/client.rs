//! HTTP client for propertyfinder search and detail pages.

use std::time::Duration;

use reqwest::header::HeaderMap;
use url::Url;

use crate::{
    headers::request_headers,
    retry::{request_timeout_from_env, with_retry, RetryPolicy},
    Error, FailureKind,
};

/// Page fetcher shared by every crawl task.
///
/// Wraps a single `reqwest::Client` (one connection pool, safe to use
/// from many in-flight requests) and applies the [`RetryPolicy`] to each
/// fetch. Requests carry browser-like headers with a referer derived
/// from the target URL.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl Client {
    /// Creates a client configured from the environment
    /// (see [`RetryPolicy::from_env`]).
    pub fn new() -> Result<Self, Error> {
        Self::with_policy(RetryPolicy::from_env(), request_timeout_from_env())
    }

    /// Creates a client with an explicit retry policy and per-request timeout.
    pub fn with_policy(policy: RetryPolicy, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(Error::Client)?;
        Ok(Self { http, policy })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `url` and returns the response body.
    ///
    /// Transport failures and non-2xx statuses are retried per the policy;
    /// after the last attempt the failure is returned as
    /// [`Error::RetriesExhausted`].
    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let headers = request_headers(&parsed)?;
        let client = self;
        with_retry(&self.policy, url, move |_| {
            client.attempt(parsed.clone(), headers.clone())
        })
        .await
    }

    async fn attempt(&self, url: Url, headers: HeaderMap) -> Result<String, FailureKind> {
        let resp = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| FailureKind::classify(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FailureKind::HttpStatus(status.as_u16()));
        }

        resp.text().await.map_err(|e| FailureKind::classify(&e))
    }
}
