//! Generic JSON client for the dealer and review cloud functions.
//!
//! The `try_*` operations return a typed [`RemoteError`]; the plain ones log the
//! failure and degrade to an empty/absent result so page handlers can render with
//! whatever data is available.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::RemoteError;

/// Query for endpoints that take no parameters.
pub const NO_PARAMS: &[(&str, &str)] = &[];

#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
}

impl RemoteClient {
    pub fn new(timeout: Duration) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }

    /// GET `url` with query `params`, expecting a JSON array.
    pub async fn try_fetch_list<P>(&self, url: &str, params: &P) -> Result<Vec<Value>, RemoteError>
    where
        P: Serialize + ?Sized,
    {
        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| RemoteError::Malformed(format!("response body: {e}")))?;
        match body {
            Value::Array(records) => {
                debug!("[REMOTE] {} returned {} records", url, records.len());
                Ok(records)
            }
            other => Err(RemoteError::Malformed(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Like [`try_fetch_list`](Self::try_fetch_list), but any failure is logged and
    /// reported as an empty list.
    pub async fn fetch_list<P>(&self, url: &str, params: &P) -> Vec<Value>
    where
        P: Serialize + ?Sized,
    {
        match self.try_fetch_list(url, params).await {
            Ok(records) => records,
            Err(err) => {
                warn!("[REMOTE] GET {} failed: {}", url, err);
                Vec::new()
            }
        }
    }

    /// GET `url?id=<id>` and return the first record.
    pub async fn try_fetch_one(&self, url: &str, id: i64) -> Result<Value, RemoteError> {
        self.try_fetch_list(url, &[("id", id)])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(format!("id {id} at {url}")))
    }

    pub async fn fetch_one(&self, url: &str, id: i64) -> Option<Value> {
        match self.try_fetch_one(url, id).await {
            Ok(record) => Some(record),
            Err(RemoteError::NotFound(what)) => {
                info!("[REMOTE] No record for {}", what);
                None
            }
            Err(err) => {
                warn!("[REMOTE] GET {} (id {}) failed: {}", url, id, err);
                None
            }
        }
    }

    /// POST `payload` as JSON with `query` parameters. The status is left to the caller.
    pub async fn submit<B, Q>(
        &self,
        url: &str,
        payload: &B,
        query: &Q,
    ) -> Result<reqwest::Response, RemoteError>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let resp = self.http.post(url).query(query).json(payload).send().await?;
        debug!("[REMOTE] POST {} -> {}", url, resp.status());
        Ok(resp)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
