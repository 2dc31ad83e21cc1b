//! Cloudflare Workers KV backend (REST API).
//!
//! Layout: the raw slug is the KV key, the value is the decimal count.
//! Workers KV has no atomic increment, so `increment` runs its
//! read-modify-write under a key-scoped lock.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{stream, StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use viewcounter_core::error::{Result, ViewCounterError};
use viewcounter_core::store::next_count;
use viewcounter_core::{Slug, ViewMap, ViewStore};

use super::key_lock::KeyLocks;

/// Page size for the key listing endpoint (API maximum).
const LIST_PAGE_LIMIT: u32 = 1000;
/// Value fetches in flight during `list`.
const LIST_FETCH_CONCURRENCY: usize = 16;

#[derive(Debug, Clone)]
pub struct CloudflareKvParams {
    pub api_base: String,
    pub account_id: String,
    pub namespace_id: String,
    pub api_token: String,
    pub timeout: Duration,
}

pub struct CloudflareKvStore {
    client: Client,
    params: CloudflareKvParams,
    locks: KeyLocks,
}

#[derive(Debug, Deserialize)]
struct KeyPage {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Vec<KeyName>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
struct KeyName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    cursor: Option<String>,
}

impl CloudflareKvStore {
    pub fn new(params: CloudflareKvParams) -> Result<Self> {
        let client = Client::builder()
            .timeout(params.timeout)
            .build()
            .map_err(|e| ViewCounterError::Config(format!("http client build failed: {e}")))?;
        Ok(Self { client, params, locks: KeyLocks::new() })
    }

    /// `{api_base}/accounts/{account}/storage/kv/namespaces/{ns}/{tail..}`,
    /// each segment percent-encoded.
    fn namespace_url(&self, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.params.api_base)
            .map_err(|e| ViewCounterError::Config(format!("invalid api_base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ViewCounterError::Config("api_base cannot be a base URL".into()))?
            .pop_if_empty()
            .extend([
                "accounts",
                self.params.account_id.as_str(),
                "storage",
                "kv",
                "namespaces",
                self.params.namespace_id.as_str(),
            ])
            .extend(tail);
        Ok(url)
    }

    /// URL of a single value. KV does not accept `.` or `..` as key names and
    /// URL path normalization would turn them into the collection itself.
    fn value_url(&self, key: &str) -> Result<Url> {
        if key == "." || key == ".." {
            return Err(ViewCounterError::Validation(format!(
                "slug {key:?} cannot be stored in Workers KV"
            )));
        }
        self.namespace_url(&["values", key])
    }

    async fn read(&self, key: &str) -> Result<u64> {
        let url = self.value_url(key)?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.params.api_token)
            .send()
            .await
            .map_err(ViewCounterError::backend)?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        let body = resp
            .error_for_status()
            .map_err(ViewCounterError::backend)?
            .text()
            .await
            .map_err(ViewCounterError::backend)?;

        parse_stored(key, &body)
    }

    async fn write(&self, key: &str, count: u64) -> Result<()> {
        let url = self.value_url(key)?;
        self.client
            .put(url)
            .bearer_auth(&self.params.api_token)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(count.to_string())
            .send()
            .await
            .map_err(ViewCounterError::backend)?
            .error_for_status()
            .map_err(ViewCounterError::backend)?;
        Ok(())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url = self.namespace_url(&["keys"])?;
            {
                let mut q = url.query_pairs_mut();
                q.append_pair("limit", &LIST_PAGE_LIMIT.to_string());
                if let Some(c) = cursor.as_deref() {
                    q.append_pair("cursor", c);
                }
            }

            let page: KeyPage = self
                .client
                .get(url)
                .bearer_auth(&self.params.api_token)
                .send()
                .await
                .map_err(ViewCounterError::backend)?
                .error_for_status()
                .map_err(ViewCounterError::backend)?
                .json()
                .await
                .map_err(ViewCounterError::backend)?;

            if !page.success {
                return Err(ViewCounterError::BackendUnavailable(
                    "kv key listing reported success=false".into(),
                ));
            }
            keys.extend(page.result.into_iter().map(|k| k.name));

            cursor = page
                .result_info
                .and_then(|i| i.cursor)
                .filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(keys)
    }
}

fn parse_stored(key: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        ViewCounterError::BackendUnavailable(format!("corrupt count stored for {key}: {raw:?}"))
    })
}

#[async_trait]
impl ViewStore for CloudflareKvStore {
    fn backend_id(&self) -> &'static str {
        "cloudflare-kv"
    }

    async fn get(&self, slug: &Slug) -> Result<u64> {
        self.read(slug.as_str()).await
    }

    async fn set(&self, slug: &Slug, count: u64) -> Result<()> {
        // Serialize with in-flight increments so an import is not clobbered.
        self.locks
            .with_lock(slug.as_str(), || async move { self.write(slug.as_str(), count).await })
            .await
    }

    async fn increment(&self, slug: &Slug) -> Result<u64> {
        self.locks
            .with_lock(slug.as_str(), || async move {
                let next = next_count(slug, self.read(slug.as_str()).await?)?;
                self.write(slug.as_str(), next).await?;
                Ok(next)
            })
            .await
    }

    async fn list(&self) -> Result<ViewMap> {
        let keys = self.list_keys().await?;
        stream::iter(keys)
            .map(|key| async move {
                let count = self.read(&key).await?;
                Ok::<_, ViewCounterError>((key, count))
            })
            .buffer_unordered(LIST_FETCH_CONCURRENCY)
            .try_collect()
            .await
    }
}
