use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// A persisted feedback record, exactly as stored. Records are insert-only;
/// the service never patches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub rating: u8,
    pub user_review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub recommended_actions: String,
    pub created_at: String,
}

/// Insert payload: everything except the store-assigned id.
#[derive(Debug, Clone, Serialize)]
pub struct NewFeedback {
    pub rating: u8,
    pub user_review: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub recommended_actions: String,
    pub created_at: String,
}

/// Records are timestamped in fixed UTC+05:30.
pub fn ist_timestamp() -> String {
    let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
    Utc::now().with_timezone(&offset).to_rfc3339()
}

/// Supabase-style REST store for feedback records.
///
/// Speaks PostgREST over HTTP: insert returning the representation, ranged
/// selects ordered by creation time, counts. Writes are serialized by the
/// store itself; the service does no coordination of its own.
pub struct ReviewStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ReviewStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client for the review store")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/reviews", self.base_url)
    }

    pub async fn insert(&self, feedback: NewFeedback) -> Result<FeedbackRecord> {
        let response = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&feedback)
            .send()
            .await
            .context("failed to reach the review store")?;

        if !response.status().is_success() {
            anyhow::bail!("review insert failed: {}", response.status());
        }

        let mut rows: Vec<FeedbackRecord> = response
            .json()
            .await
            .context("failed to parse inserted review")?;

        if rows.is_empty() {
            anyhow::bail!("review store returned no inserted row");
        }
        Ok(rows.remove(0))
    }

    /// One page of records, newest first.
    pub async fn list(&self, offset: usize, limit: usize) -> Result<Vec<FeedbackRecord>> {
        let response = self
            .client
            .get(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await
            .context("failed to reach the review store")?;

        if !response.status().is_success() {
            anyhow::bail!("review list failed: {}", response.status());
        }

        response.json().await.context("failed to parse review page")
    }

    pub async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .get(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "id")])
            .send()
            .await
            .context("failed to reach the review store")?;

        if !response.status().is_success() {
            anyhow::bail!("review count failed: {}", response.status());
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .context("failed to parse review count")?;
        Ok(rows.len())
    }

    /// Every record, newest first. The stats endpoint aggregates over this.
    pub async fn all_desc(&self) -> Result<Vec<FeedbackRecord>> {
        let response = self
            .client
            .get(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
            ])
            .send()
            .await
            .context("failed to reach the review store")?;

        if !response.status().is_success() {
            anyhow::bail!("review fetch failed: {}", response.status());
        }

        response.json().await.context("failed to parse reviews")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_carries_the_fixed_offset() {
        let stamp = ist_timestamp();
        assert!(stamp.ends_with("+05:30"), "unexpected timestamp: {stamp}");
    }

    #[test]
    fn base_url_is_normalized() {
        let store = ReviewStore::new("https://example.supabase.co/", "key").unwrap();
        assert_eq!(
            store.table_url(),
            "https://example.supabase.co/rest/v1/reviews"
        );
    }
}
