use rebalance_engine::models::TradeMode;
use thiserror::Error;

pub const PRACTICE_BASE_URL: &str = "https://openapivts.koreainvestment.com:29443";
pub const LIVE_BASE_URL: &str = "https://openapi.koreainvestment.com:9443";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid account number: expected more than 8 digits, got {0}")]
    InvalidAccount(usize),
}

/// Brokerage credentials and account identity, read once at process start
/// and immutable thereafter. The trade mode decides both the API host and
/// the transaction-type ids used for orders.
#[derive(Debug, Clone)]
pub struct KisConfig {
    pub mode: TradeMode,
    pub app_key: String,
    pub app_secret: String,
    pub access_token: String,
    /// First 8 digits of the account number.
    pub cano: String,
    /// Account product code, the remainder of the account number.
    pub acnt_prdt_cd: String,
}

impl KisConfig {
    /// Reads `KIS_ENV`, `KIS_APP_KEY`, `KIS_APP_SECRET`, `KIS_ACCESS_TOKEN`
    /// and `KIS_ACCOUNT`. Missing credentials are fatal; there are no
    /// placeholder defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = match std::env::var("KIS_ENV").as_deref() {
            Ok("live") | Ok("real") => TradeMode::Live,
            _ => TradeMode::Practice,
        };
        Self::new(
            mode,
            require("KIS_APP_KEY")?,
            require("KIS_APP_SECRET")?,
            require("KIS_ACCESS_TOKEN")?,
            &require("KIS_ACCOUNT")?,
        )
    }

    pub fn new(
        mode: TradeMode,
        app_key: String,
        app_secret: String,
        access_token: String,
        account: &str,
    ) -> Result<Self, ConfigError> {
        if account.len() <= 8 {
            return Err(ConfigError::InvalidAccount(account.len()));
        }
        let (cano, acnt_prdt_cd) = account.split_at(8);

        Ok(Self {
            mode,
            app_key,
            app_secret,
            access_token,
            cano: cano.to_string(),
            acnt_prdt_cd: acnt_prdt_cd.to_string(),
        })
    }

    pub fn base_url(&self) -> &'static str {
        match self.mode {
            TradeMode::Practice => PRACTICE_BASE_URL,
            TradeMode::Live => LIVE_BASE_URL,
        }
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: TradeMode) -> KisConfig {
        KisConfig::new(
            mode,
            "key".into(),
            "secret".into(),
            "token".into(),
            "1234567801",
        )
        .unwrap()
    }

    #[test]
    fn account_splits_into_cano_and_product_code() {
        let cfg = config(TradeMode::Practice);
        assert_eq!(cfg.cano, "12345678");
        assert_eq!(cfg.acnt_prdt_cd, "01");
    }

    #[test]
    fn short_account_is_rejected() {
        let err = KisConfig::new(
            TradeMode::Practice,
            "key".into(),
            "secret".into(),
            "token".into(),
            "12345678",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAccount(8)));
    }

    #[test]
    fn mode_selects_the_api_host() {
        assert_eq!(config(TradeMode::Practice).base_url(), PRACTICE_BASE_URL);
        assert_eq!(config(TradeMode::Live).base_url(), LIVE_BASE_URL);
    }
}
