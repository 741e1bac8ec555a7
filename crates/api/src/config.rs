//! Process configuration, read once at startup.
//!
//! Every external collaborator gets an explicit config struct; nothing below
//! the binary reads the environment.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use intake_ai::{GEMINI_BASE_URL, GeminiConfig};
use intake_infra::{SHEETS_BASE_URL, SheetsConfig};
use intake_observability::BugsnagConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SHEETS_RANGE: &str = "Products!A:E";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub gemini: GeminiConfig,
    /// `None` selects the in-memory store.
    pub sheets: Option<SheetsConfig>,
    /// `None` keeps error reports in the local log only.
    pub bugsnag: Option<BugsnagConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source (blank values count as unset).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let api_key = get("GEMINI_API_KEY").unwrap_or_else(|| {
            tracing::warn!("GEMINI_API_KEY not set; generated messages will fall back");
            String::new()
        });
        let model = get("GEMINI_MODEL").unwrap_or_else(|| {
            tracing::warn!("GEMINI_MODEL not set; using {DEFAULT_GEMINI_MODEL}");
            DEFAULT_GEMINI_MODEL.to_string()
        });
        let mut gemini = GeminiConfig::new(api_key, model)
            .with_base_url(get("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_BASE_URL.to_string()));
        gemini.timeout = get("GEMINI_TIMEOUT_SECS")
            .map(|s| s.parse::<u64>().map(Duration::from_secs))
            .transpose()
            .context("GEMINI_TIMEOUT_SECS must be a whole number of seconds")?;

        let sheets = match get("GOOGLE_SHEETS_SPREADSHEET_ID") {
            Some(id) => {
                let token = get("GOOGLE_SHEETS_ACCESS_TOKEN").unwrap_or_else(|| {
                    tracing::warn!("GOOGLE_SHEETS_ACCESS_TOKEN not set; sheet calls will be rejected");
                    String::new()
                });
                Some(
                    SheetsConfig::new(id, token)
                        .with_range(
                            get("GOOGLE_SHEETS_RANGE")
                                .unwrap_or_else(|| DEFAULT_SHEETS_RANGE.to_string()),
                        )
                        .with_base_url(
                            get("GOOGLE_SHEETS_BASE_URL")
                                .unwrap_or_else(|| SHEETS_BASE_URL.to_string()),
                        ),
                )
            }
            None => {
                tracing::warn!("GOOGLE_SHEETS_SPREADSHEET_ID not set; using in-memory product store");
                None
            }
        };

        let bugsnag = get("BUGSNAG_API_KEY").map(|key| {
            let mut cfg = BugsnagConfig::new(key);
            if let Some(stage) = get("BUGSNAG_RELEASE_STAGE") {
                cfg.release_stage = stage;
            }
            cfg
        });

        Ok(Self {
            bind_addr,
            gemini,
            sheets,
            bugsnag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.gemini.api_key, "");
        assert_eq!(cfg.gemini.base_url, GEMINI_BASE_URL);
        assert_eq!(cfg.gemini.timeout, None);
        assert!(cfg.sheets.is_none());
        assert!(cfg.bugsnag.is_none());
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-1.5-pro"),
            ("GEMINI_TIMEOUT_SECS", "30"),
            ("GOOGLE_SHEETS_SPREADSHEET_ID", "sheet-1"),
            ("GOOGLE_SHEETS_ACCESS_TOKEN", "tok"),
            ("GOOGLE_SHEETS_RANGE", "Inventory!A:E"),
            ("BUGSNAG_API_KEY", "bug"),
            ("BUGSNAG_RELEASE_STAGE", "production"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.gemini.api_key, "k");
        assert_eq!(cfg.gemini.model, "gemini-1.5-pro");
        assert_eq!(cfg.gemini.timeout, Some(Duration::from_secs(30)));

        let sheets = cfg.sheets.unwrap();
        assert_eq!(sheets.spreadsheet_id, "sheet-1");
        assert_eq!(sheets.access_token, "tok");
        assert_eq!(sheets.range, "Inventory!A:E");
        assert_eq!(sheets.base_url, SHEETS_BASE_URL);

        let bugsnag = cfg.bugsnag.unwrap();
        assert_eq!(bugsnag.api_key, "bug");
        assert_eq!(bugsnag.release_stage, "production");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("GEMINI_MODEL", "  "), ("GOOGLE_SHEETS_SPREADSHEET_ID", "")]).unwrap();
        assert_eq!(cfg.gemini.model, DEFAULT_GEMINI_MODEL);
        assert!(cfg.sheets.is_none());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(config(&[("BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config(&[("GEMINI_TIMEOUT_SECS", "soon")]).is_err());
    }
}
