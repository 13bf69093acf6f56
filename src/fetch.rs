//! Fetch page HTML using ureq (simple blocking HTTP)
//!
//! Tracker pages are rendered client-side, so a fetched page only carries
//! the fields when the server pre-renders them. Saved pages are the usual input.

use std::time::Duration;

use tracing::debug;

use crate::error::{ExtractError, Result};

pub const USER_AGENT: &str = concat!("issue-clip/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn fetch_page(url: &str, timeout_secs: u64) -> Result<String> {
    let agent = ureq::Agent::new_with_config(
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .user_agent(USER_AGENT)
            .http_status_as_error(false)
            .build(),
    );

    let fetch_error = |reason: String| ExtractError::Fetch {
        url: url.to_string(),
        reason,
    };

    let resp = agent.get(url).call().map_err(|e| fetch_error(e.to_string()))?;
    if !resp.status().is_success() {
        return Err(fetch_error(format!("HTTP {}", resp.status())));
    }

    let html = resp
        .into_body()
        .read_to_string()
        .map_err(|e| fetch_error(e.to_string()))?;
    debug!(url, bytes = html.len(), "fetched page");
    Ok(html)
}
