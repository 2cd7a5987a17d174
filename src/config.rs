//! Engine configuration.
//!
//! All tunables have defaults that reproduce the documented rules, so
//! `EngineConfig::default()` is the normal starting point. Configs can
//! also be loaded from JSON.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// How a fractional dungeon reward multiplier is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardRounding {
    /// Floor the multiplier first, then multiply. A 1.5x multiplier pays
    /// the same as 1.0x.
    #[default]
    Truncate,
    /// Multiply by the exact multiplier and floor the product.
    Exact,
}

/// Tunables for the engine.
///
/// # Examples
///
/// ```rust
/// use zzcombat::config::{EngineConfig, RewardRounding};
///
/// let config = EngineConfig::from_json(r#"{ "reward_rounding": "exact" }"#).unwrap();
/// assert_eq!(config.reward_rounding, RewardRounding::Exact);
/// assert_eq!(config.crit_rate_cap, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rounding rule for dungeon reward multipliers.
    pub reward_rounding: RewardRounding,
    /// Upper bound for aggregated crit rate.
    pub crit_rate_cap: f64,
    /// Two-star threshold as a ratio of target time
    /// (`numerator / denominator`, 3/2 by default).
    pub two_star_numerator: u32,
    pub two_star_denominator: u32,
    /// Fraction of the entry cost refunded for an unfinished dungeon run.
    pub partial_refund_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reward_rounding: RewardRounding::Truncate,
            crit_rate_cap: 1.0,
            two_star_numerator: 3,
            two_star_denominator: 2,
            partial_refund_ratio: 0.3,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is in range.
    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.crit_rate_cap) {
            return Err(EngineError::InvalidConfig(format!(
                "crit_rate_cap must be within [0, 1], got {}",
                self.crit_rate_cap
            )));
        }
        if self.two_star_denominator == 0 || self.two_star_numerator < self.two_star_denominator {
            return Err(EngineError::InvalidConfig(format!(
                "two-star ratio must be at least 1, got {}/{}",
                self.two_star_numerator, self.two_star_denominator
            )));
        }
        if !(0.0..=1.0).contains(&self.partial_refund_ratio) {
            return Err(EngineError::InvalidConfig(format!(
                "partial_refund_ratio must be within [0, 1], got {}",
                self.partial_refund_ratio
            )));
        }
        Ok(())
    }
}
