//! Program guide lookups.
//!
//! The grid only ever asks for a channel's programs and moves on; whatever the
//! guide does with the answer (caching, rendering elsewhere) is its business.

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Something that can be asked for a channel's schedule.
pub trait EpgService: Send + Sync {
    /// Fire-and-forget lookup keyed by channel display name.
    fn get_channel_programs(&self, name: &str);
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Program {
    pub title: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub stop: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// HTTP guide client. Without a base URL lookups are only logged.
#[derive(Clone)]
pub struct EpgClient {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl EpgClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.filter(|u| !u.trim().is_empty()),
            http: reqwest::Client::new(),
        }
    }
}

impl EpgService for EpgClient {
    fn get_channel_programs(&self, name: &str) {
        let Some(base_url) = self.base_url.clone() else {
            debug!("[epg] no guide configured, skipping lookup for {}", name);
            return;
        };
        let http = self.http.clone();
        let name = name.to_string();
        tokio::spawn(async move {
            match fetch_programs(&http, &base_url, &name).await {
                Ok(programs) => info!("[epg] {} programs for {}", programs.len(), name),
                Err(e) => warn!("[epg] lookup for {} failed: {:#}", name, e),
            }
        });
    }
}

async fn fetch_programs(
    http: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> anyhow::Result<Vec<Program>> {
    let response = http
        .get(base_url)
        .query(&[("channel", name)])
        .header("Accept", "application/json")
        .send()
        .await
        .context("guide request failed")?;

    if !response.status().is_success() {
        anyhow::bail!("guide returned status: {}", response.status());
    }

    let body: serde_json::Value = response
        .json()
        .await
        .context("failed to parse guide response")?;
    parse_programs(body)
}

/// Accepts either a bare array or `{ "programs": [...] }`.
pub fn parse_programs(body: serde_json::Value) -> anyhow::Result<Vec<Program>> {
    let list = match body {
        serde_json::Value::Object(mut obj) => obj
            .remove("programs")
            .context("guide response has no programs field")?,
        other => other,
    };
    Ok(serde_json::from_value(list)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_array() {
        let programs = parse_programs(json!([
            {"title": "Morning News", "start": "06:00", "stop": "09:00"},
            {"title": "Weather"}
        ]))
        .unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].start.as_deref(), Some("06:00"));
        assert!(programs[1].description.is_none());
    }

    #[test]
    fn test_parse_wrapped_object() {
        let programs = parse_programs(json!({"programs": [{"title": "Late Show"}]})).unwrap();
        assert_eq!(programs[0].title, "Late Show");
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        assert!(parse_programs(json!({"items": []})).is_err());
        assert!(parse_programs(json!("nope")).is_err());
    }

    #[test]
    fn test_unconfigured_client_does_not_spawn() {
        // No runtime here: spawning would panic, so this proves the early return.
        let client = EpgClient::new(Some("   ".into()));
        client.get_channel_programs("News 24");
    }
}
