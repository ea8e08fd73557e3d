//! Runtime configuration resolved from `.env`, the environment and CLI flags.

use std::path::PathBuf;

use crate::error::AppError;

/// Base URL used when neither `--api` nor `SALES_API_BASE` is set.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

const ENV_API_BASE: &str = "SALES_API_BASE";
const ENV_LOG_FILE: &str = "SALES_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Origin serving `/products/sales` and `/products/import`.
    pub api_base: String,
    /// Optional log file (the TUI only logs when this is set).
    pub log_file: Option<PathBuf>,
}

impl DashboardConfig {
    /// Load `.env` (if present) and read the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(
            std::env::var(ENV_API_BASE).ok(),
            std::env::var(ENV_LOG_FILE).ok(),
        )
    }

    fn from_vars(api_base: Option<String>, log_file: Option<String>) -> Self {
        let api_base = api_base
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let log_file = log_file
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        Self { api_base, log_file }
    }

    /// Apply CLI overrides on top of the environment.
    pub fn with_overrides(mut self, api: Option<&str>, log_file: Option<&PathBuf>) -> Result<Self, AppError> {
        if let Some(api) = api {
            self.api_base = api.trim().to_string();
        }
        if let Some(path) = log_file {
            self.log_file = Some(path.clone());
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), AppError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(AppError::new(
                2,
                format!("Invalid API base '{}': expected an http(s) URL.", self.api_base),
            ));
        }
        Ok(())
    }

    /// Join the base URL with an endpoint path such as `/products/sales`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let cfg = DashboardConfig::from_vars(Some("  ".to_string()), Some(String::new()));
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.log_file, None);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = DashboardConfig::from_vars(Some("http://shop.local/".to_string()), None);
        assert_eq!(cfg.endpoint("/products/sales"), "http://shop.local/products/sales");
    }

    #[test]
    fn overrides_are_validated() {
        let cfg = DashboardConfig::from_vars(None, None);
        let err = cfg.clone().with_overrides(Some("ftp://nope"), None).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let path = PathBuf::from("dash.log");
        let ok = cfg.with_overrides(Some("https://api.example.com"), Some(&path)).unwrap();
        assert_eq!(ok.api_base, "https://api.example.com");
        assert_eq!(ok.log_file, Some(path));
    }
}
