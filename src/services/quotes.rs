// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quote content client.
//!
//! Fetches one inspirational quote per call. Fetching never fails the
//! user-visible action: an unreachable or empty API falls back to the
//! built-in quote set.

use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::Quote;

const QUOTES_API_URL: &str = "https://api.api-ninjas.com/v1/quotes";

/// Built-in quotes used when the API returns nothing usable.
const FALLBACK_QUOTES: &[(&str, &str)] = &[
    (
        "Believe you can and you're halfway there.",
        "Theodore Roosevelt",
    ),
    (
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
    ),
    (
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
];

/// Quote shown when the network itself is down.
const OFFLINE_QUOTE: (&str, &str) = (
    "Every day is a new beginning. Take a deep breath and start again.",
    "Unknown",
);

/// Client for the quote content API.
#[derive(Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl QuoteClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: QUOTES_API_URL.to_string(),
            api_key,
        }
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Fetch a fresh quote, falling back to the built-in set on any failure.
    pub async fn fetch_quote(&self) -> Quote {
        match self.fetch_from_api().await {
            Ok(Some(quote)) => quote,
            Ok(None) => {
                // API reachable but empty: random built-in pick
                let (text, author) = FALLBACK_QUOTES
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or(OFFLINE_QUOTE);
                Quote::new(text, author, now_ms())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Quote fetch failed, using offline fallback");
                Quote::new(OFFLINE_QUOTE.0, OFFLINE_QUOTE.1, now_ms())
            }
        }
    }

    async fn fetch_from_api(&self) -> Result<Option<Quote>, AppError> {
        let url = format!("{}?category=inspirational", self.base_url);

        let response = self
            .http
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::QuoteApi(e.to_string()))?;

        if !response.status().is_success() {
            // Treated like an empty result, not an error: the built-in set
            // still gives the user a quote.
            tracing::warn!(status = %response.status(), "Quote API returned an error status");
            return Ok(None);
        }

        let quotes: Vec<ApiQuote> = response
            .json()
            .await
            .map_err(|e| AppError::QuoteApi(format!("JSON parse error: {}", e)))?;

        Ok(quotes
            .into_iter()
            .next()
            .map(|q| Quote::new(q.quote, q.author, now_ms())))
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Deserialize)]
struct ApiQuote {
    quote: String,
    author: String,
}
