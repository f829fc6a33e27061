use std::path::Path;

use serde::Deserialize;

use super::error::AppError;
use crate::domain::StaticAccountIds;

fn default_log_filter() -> String {
    "info".to_string()
}

/// Runtime configuration, read once at startup and passed down explicitly
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    #[serde(default)]
    pub accounts: StaticAccountIds,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            accounts: StaticAccountIds::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl LedgerConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file; absent keys take their defaults
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{COLD_STORAGE_ACCOUNT_ID, LND_LEDGER_ACCOUNT_ID, LedgerAccountId};

    #[test]
    fn empty_object_takes_defaults() {
        let config = LedgerConfig::from_json("{}").unwrap();

        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.accounts.lnd.as_str(), LND_LEDGER_ACCOUNT_ID);
        assert_eq!(config.accounts.cold_storage.as_str(), COLD_STORAGE_ACCOUNT_ID);
        assert_eq!(config.accounts.bank_owner.as_str(), "Liabilities:bank-owner");
    }

    #[test]
    fn partial_accounts_override_only_given_keys() {
        let config = LedgerConfig::from_json(
            r#"{"accounts": {"bankOwner": "Liabilities:treasury"}, "logFilter": "ledger=debug"}"#,
        )
        .unwrap();

        assert_eq!(
            config.accounts.bank_owner,
            LedgerAccountId::new("Liabilities:treasury")
        );
        assert_eq!(config.accounts.dealer_usd.as_str(), "Liabilities:dealer-usd");
        assert_eq!(config.log_filter, "ledger=debug");
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            LedgerConfig::from_json("{accounts"),
            Err(AppError::Json(_))
        ));
    }

    #[tokio::test]
    async fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        tokio::fs::write(&path, r#"{"logFilter": "warn"}"#).await.unwrap();

        let config = LedgerConfig::from_file(&path).await.unwrap();
        assert_eq!(config.log_filter, "warn");
    }

    #[tokio::test]
    async fn missing_file_is_a_config_error() {
        let result = LedgerConfig::from_file("/nonexistent/ledger.json").await;
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
