use num_bigint::BigUint;
use num_traits::One;
use std::collections::HashMap;
use thiserror::Error;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Positions must hold strictly more than this many units to count.
    ///
    /// The default of 1 drops 1-wei rounding dust left behind by closes and
    /// transfers; set it to 0 to include every nonzero balance.
    pub dust_threshold: BigUint,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dust_threshold: BigUint::one(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let dust_threshold = match env_map.get("HYPERSTATS_DUST_THRESHOLD") {
            Some(raw) => raw.parse::<BigUint>().map_err(|_| {
                ConfigError::InvalidValue(
                    "HYPERSTATS_DUST_THRESHOLD".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?,
            None => BigUint::one(),
        };

        Ok(EngineConfig { dust_threshold })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dust_threshold_is_one() {
        assert_eq!(EngineConfig::default().dust_threshold, BigUint::one());
        let config = EngineConfig::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.dust_threshold, BigUint::one());
    }

    #[test]
    fn test_dust_threshold_from_env() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "HYPERSTATS_DUST_THRESHOLD".to_string(),
            "1000000000".to_string(),
        );
        let config = EngineConfig::from_env_map(env_map).unwrap();
        assert_eq!(config.dust_threshold, BigUint::from(1_000_000_000u64));
    }

    #[test]
    fn test_invalid_dust_threshold() {
        let mut env_map = HashMap::new();
        env_map.insert("HYPERSTATS_DUST_THRESHOLD".to_string(), "-5".to_string());
        let result = EngineConfig::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "HYPERSTATS_DUST_THRESHOLD"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
