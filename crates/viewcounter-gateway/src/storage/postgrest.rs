//! Relational backend over PostgREST (e.g. Supabase).
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE view_counts (
//!   slug TEXT PRIMARY KEY,
//!   count INTEGER DEFAULT 0,
//!   updated_at TIMESTAMPTZ DEFAULT NOW()
//! );
//!
//! CREATE OR REPLACE FUNCTION increment_view(p_slug TEXT)
//! RETURNS INTEGER AS $$
//! DECLARE new_count INTEGER;
//! BEGIN
//!   INSERT INTO view_counts (slug, count) VALUES (p_slug, 1)
//!   ON CONFLICT (slug)
//!   DO UPDATE SET count = view_counts.count + 1, updated_at = NOW()
//!   RETURNING count INTO new_count;
//!   RETURN new_count;
//! END;
//! $$ LANGUAGE plpgsql;
//! ```
//!
//! The upsert inside the function is the atomic increment; row locking in
//! Postgres serializes concurrent callers on the same slug.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use viewcounter_core::error::{Result, ViewCounterError};
use viewcounter_core::{Slug, ViewMap, ViewStore};

/// Rows per page when listing.
const LIST_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct PostgrestParams {
    /// Project URL; `/rest/v1` is appended.
    pub url: String,
    pub api_key: String,
    pub table: String,
    pub increment_fn: String,
    pub timeout: Duration,
}

pub struct PostgrestStore {
    client: Client,
    rest: String,
    params: PostgrestParams,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ViewRow {
    slug: String,
    count: u64,
}

impl PostgrestStore {
    pub fn new(params: PostgrestParams) -> Result<Self> {
        let client = Client::builder()
            .timeout(params.timeout)
            .build()
            .map_err(|e| ViewCounterError::Config(format!("http client build failed: {e}")))?;
        let rest = format!("{}/rest/v1", params.url.trim_end_matches('/'));
        Ok(Self { client, rest, params })
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("apikey", &self.params.api_key)
            .bearer_auth(&self.params.api_key)
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.rest, self.params.table)
    }

    async fn send(&self, rb: RequestBuilder) -> Result<Response> {
        self.authed(rb)
            .send()
            .await
            .map_err(ViewCounterError::backend)?
            .error_for_status()
            .map_err(ViewCounterError::backend)
    }
}

#[async_trait]
impl ViewStore for PostgrestStore {
    fn backend_id(&self) -> &'static str {
        "postgrest"
    }

    async fn get(&self, slug: &Slug) -> Result<u64> {
        let filter = format!("eq.{slug}");
        let rows: Vec<CountRow> = self
            .send(
                self.client
                    .get(self.table_url())
                    .query(&[("slug", filter.as_str()), ("select", "count")]),
            )
            .await?
            .json()
            .await
            .map_err(ViewCounterError::backend)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    async fn set(&self, slug: &Slug, count: u64) -> Result<()> {
        let row = ViewRow { slug: slug.as_str().to_owned(), count };
        self.send(
            self.client
                .post(self.table_url())
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&row),
        )
        .await?;
        Ok(())
    }

    async fn increment(&self, slug: &Slug) -> Result<u64> {
        let url = format!("{}/rpc/{}", self.rest, self.params.increment_fn);
        self.send(self.client.post(url).json(&json!({ "p_slug": slug.as_str() })))
            .await?
            .json::<u64>()
            .await
            .map_err(ViewCounterError::backend)
    }

    async fn list(&self) -> Result<ViewMap> {
        let mut out = ViewMap::new();
        let mut offset = 0usize;

        loop {
            let limit = LIST_PAGE_SIZE.to_string();
            let off = offset.to_string();
            let rows: Vec<ViewRow> = self
                .send(self.client.get(self.table_url()).query(&[
                    ("select", "slug,count"),
                    ("order", "slug"),
                    ("limit", limit.as_str()),
                    ("offset", off.as_str()),
                ]))
                .await?
                .json()
                .await
                .map_err(ViewCounterError::backend)?;

            let n = rows.len();
            out.extend(rows.into_iter().map(|r| (r.slug, r.count)));
            if n < LIST_PAGE_SIZE {
                break;
            }
            offset += n;
        }

        Ok(out)
    }
}
