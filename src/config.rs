use crate::engine::PairCap;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub pair_cap_mode: PairCapMode,
    pub pair_cap_tokens: u64,
}

/// How `PAIR_CAP_TOKENS` becomes a base-unit cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairCapMode {
    /// `tokens * 10^18`.
    WholeTokens,
    /// `tokens ^ 18`, the legacy computation.
    LiteralPower,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let pair_cap_mode = match env_map
            .get("PAIR_CAP_MODE")
            .map(|s| s.as_str())
            .unwrap_or("whole-tokens")
        {
            "whole-tokens" => PairCapMode::WholeTokens,
            "literal-power" => PairCapMode::LiteralPower,
            other => {
                return Err(ConfigError::InvalidValue(
                    "PAIR_CAP_MODE".to_string(),
                    format!("must be whole-tokens or literal-power, got {}", other),
                ))
            }
        };

        let pair_cap_tokens = env_map
            .get("PAIR_CAP_TOKENS")
            .map(|s| s.as_str())
            .unwrap_or("856")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "PAIR_CAP_TOKENS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        Ok(Config {
            port,
            pair_cap_mode,
            pair_cap_tokens,
        })
    }

    pub fn pair_cap(&self) -> PairCap {
        match self.pair_cap_mode {
            PairCapMode::WholeTokens => PairCap::whole_tokens(self.pair_cap_tokens),
            PairCapMode::LiteralPower => PairCap::literal_power(self.pair_cap_tokens),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            pair_cap_mode: PairCapMode::WholeTokens,
            pair_cap_tokens: 856,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Amount;

    #[test]
    fn test_defaults_from_empty_env() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.pair_cap_mode, PairCapMode::WholeTokens);
        assert_eq!(config.pair_cap_tokens, 856);
        assert_eq!(config.pair_cap().amount(), &Amount::from_whole_tokens(856));
    }

    #[test]
    fn test_literal_power_mode() {
        let mut env_map = HashMap::new();
        env_map.insert("PAIR_CAP_MODE".to_string(), "literal-power".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.pair_cap(), PairCap::literal_power(856));
    }

    #[test]
    fn test_large_literal_power_cap_is_positive() {
        let mut env_map = HashMap::new();
        env_map.insert("PAIR_CAP_MODE".to_string(), "literal-power".to_string());
        env_map.insert("PAIR_CAP_TOKENS".to_string(), "20000".to_string());
        let config = Config::from_env_map(env_map).unwrap();

        let cap = config.pair_cap();
        assert!(!cap.amount().is_negative());
        assert!(cap.amount() > &Amount::from_whole_tokens(u64::MAX));
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_pair_cap_mode() {
        let mut env_map = HashMap::new();
        env_map.insert("PAIR_CAP_MODE".to_string(), "invalid".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PAIR_CAP_MODE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_pair_cap_tokens() {
        let mut env_map = HashMap::new();
        env_map.insert("PAIR_CAP_TOKENS".to_string(), "-1".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PAIR_CAP_TOKENS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
