//! Dungeon completion rewards.
//!
//! Stars rate completion time against a target: at or under par is 3
//! stars, up to 1.5× par is 2 stars, anything slower is 1 star. A dungeon
//! with no target time always awards 3 stars. Gold and experience are the
//! dungeon's base rewards scaled by its reward multiplier.

use crate::config::{EngineConfig, RewardRounding};
use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reward parameters and entry requirements of a dungeon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonRewardParams {
    pub id: String,
    pub base_gold: u64,
    pub base_experience: u64,
    #[serde(default = "default_multiplier")]
    pub reward_multiplier: f64,
    /// Par time in seconds. `None` means the dungeon is unclocked.
    #[serde(default)]
    pub target_time: Option<u64>,
    /// Spirit stones paid to enter.
    #[serde(default)]
    pub energy_cost: u64,
    /// Minimum character level.
    #[serde(default)]
    pub level_requirement: u32,
    /// Entries allowed per day. `None` means unlimited.
    #[serde(default)]
    pub daily_attempts: Option<u32>,
    #[serde(default = "default_floors")]
    pub floors: u32,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_floors() -> u32 {
    1
}

impl DungeonRewardParams {
    /// An unclocked single-floor dungeon with no entry requirements.
    pub fn new(id: impl Into<String>, base_gold: u64, base_experience: u64) -> Self {
        Self {
            id: id.into(),
            base_gold,
            base_experience,
            reward_multiplier: 1.0,
            target_time: None,
            energy_cost: 0,
            level_requirement: 0,
            daily_attempts: None,
            floors: 1,
        }
    }

    /// Set the reward multiplier.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.reward_multiplier = multiplier;
        self
    }

    /// Set the par time in seconds.
    pub fn with_target_time(mut self, seconds: u64) -> Self {
        self.target_time = Some(seconds);
        self
    }

    /// Set the spirit stone entry cost.
    pub fn with_energy_cost(mut self, spirit_stones: u64) -> Self {
        self.energy_cost = spirit_stones;
        self
    }

    /// Set the minimum character level.
    pub fn with_level_requirement(mut self, level: u32) -> Self {
        self.level_requirement = level;
        self
    }

    /// Limit entries per day.
    pub fn with_daily_attempts(mut self, attempts: u32) -> Self {
        self.daily_attempts = Some(attempts);
        self
    }

    /// Set the number of floors.
    pub fn with_floors(mut self, floors: u32) -> Self {
        self.floors = floors;
        self
    }
}

/// Stars, gold and experience earned by a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonRewardResult {
    pub stars: u8,
    pub gold: u64,
    pub experience: u64,
}

/// Star rating for a run, using the default 1.5× two-star threshold.
///
/// # Examples
///
/// ```rust
/// use zzcombat::dungeon::compute_stars;
///
/// assert_eq!(compute_stars(100, Some(100)), 3);
/// assert_eq!(compute_stars(150, Some(100)), 2);
/// assert_eq!(compute_stars(151, Some(100)), 1);
/// assert_eq!(compute_stars(9_999, None), 3);
/// ```
pub fn compute_stars(time_spent: u64, target_time: Option<u64>) -> u8 {
    stars_with_ratio(time_spent, target_time, 3, 2)
}

/// Star rating using the two-star ratio from `config`.
pub fn compute_stars_with(time_spent: u64, target_time: Option<u64>, config: &EngineConfig) -> u8 {
    stars_with_ratio(
        time_spent,
        target_time,
        config.two_star_numerator,
        config.two_star_denominator,
    )
}

fn stars_with_ratio(time_spent: u64, target_time: Option<u64>, num: u32, den: u32) -> u8 {
    let Some(target) = target_time else {
        return 3;
    };
    if time_spent <= target {
        return 3;
    }
    // time_spent <= target * num / den, compared exactly in integers
    if time_spent as u128 * den as u128 <= target as u128 * num as u128 {
        2
    } else {
        1
    }
}

/// Scale a base reward by a multiplier under the given rounding rule.
///
/// # Examples
///
/// ```rust
/// use zzcombat::config::RewardRounding;
/// use zzcombat::dungeon::apply_multiplier;
///
/// assert_eq!(apply_multiplier(100, 1.5, RewardRounding::Truncate), 100);
/// assert_eq!(apply_multiplier(100, 1.5, RewardRounding::Exact), 150);
/// assert_eq!(apply_multiplier(100, 2.0, RewardRounding::Truncate), 200);
/// ```
pub fn apply_multiplier(base: u64, multiplier: f64, rounding: RewardRounding) -> u64 {
    let multiplier = multiplier.max(0.0);
    match rounding {
        RewardRounding::Truncate => base.saturating_mul(multiplier.floor() as u64),
        RewardRounding::Exact => (base as f64 * multiplier).floor() as u64,
    }
}

/// Compute stars and rewards for a completed run.
///
/// # Examples
///
/// ```rust
/// use zzcombat::config::EngineConfig;
/// use zzcombat::dungeon::{compute_rewards, DungeonRewardParams};
///
/// let cave = DungeonRewardParams::new("spirit_cave", 200, 80)
///     .with_multiplier(2.0)
///     .with_target_time(300);
///
/// let result = compute_rewards(420, &cave, &EngineConfig::default());
/// assert_eq!(result.stars, 2);
/// assert_eq!(result.gold, 400);
/// assert_eq!(result.experience, 160);
/// ```
pub fn compute_rewards(
    time_spent: u64,
    params: &DungeonRewardParams,
    config: &EngineConfig,
) -> DungeonRewardResult {
    let result = DungeonRewardResult {
        stars: compute_stars_with(time_spent, params.target_time, config),
        gold: apply_multiplier(params.base_gold, params.reward_multiplier, config.reward_rounding),
        experience: apply_multiplier(
            params.base_experience,
            params.reward_multiplier,
            config.reward_rounding,
        ),
    };
    debug!(
        dungeon = %params.id,
        time_spent,
        stars = result.stars,
        gold = result.gold,
        experience = result.experience,
        "dungeon rewards computed"
    );
    result
}

/// What a caller knows about a character when it asks to enter a dungeon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRequest {
    /// Character level (not the cultivation tier).
    pub level: u32,
    pub spirit_stones: u128,
    pub attempts_today: u32,
}

/// Check whether a character may enter a dungeon.
///
/// This is a helper for the caller, run before any battle. It checks the
/// level requirement, the spirit stone energy cost and the daily attempt
/// limit, in that order, and reports the first one that fails.
///
/// # Examples
///
/// ```rust
/// use zzcombat::dungeon::{check_entry, DungeonRewardParams, EntryRequest};
/// use zzcombat::EngineError;
///
/// let cave = DungeonRewardParams::new("spirit_cave", 200, 80).with_energy_cost(25);
/// let poor = EntryRequest { level: 5, spirit_stones: 10, attempts_today: 0 };
///
/// assert!(matches!(
///     check_entry(&cave, &poor),
///     Err(EngineError::InsufficientResource { required: 25, available: 10, .. })
/// ));
/// ```
pub fn check_entry(params: &DungeonRewardParams, request: &EntryRequest) -> EngineResult<()> {
    if request.level < params.level_requirement {
        return Err(EngineError::InsufficientResource {
            resource: "character level".to_string(),
            required: params.level_requirement as u128,
            available: request.level as u128,
        });
    }
    if request.spirit_stones < params.energy_cost as u128 {
        return Err(EngineError::InsufficientResource {
            resource: "spirit stones".to_string(),
            required: params.energy_cost as u128,
            available: request.spirit_stones,
        });
    }
    if let Some(limit) = params.daily_attempts {
        if request.attempts_today >= limit {
            return Err(EngineError::InsufficientResource {
                resource: "daily attempts".to_string(),
                required: 1,
                available: limit.saturating_sub(request.attempts_today) as u128,
            });
        }
    }
    Ok(())
}

/// Spirit stones refunded for a run abandoned after `floors_completed`.
///
/// `floor(entry_cost × ratio × floors_completed / total_floors)`. A
/// dungeon with zero floors refunds nothing.
///
/// # Examples
///
/// ```rust
/// use zzcombat::dungeon::partial_refund;
///
/// assert_eq!(partial_refund(100, 2, 5, 0.3), 12);
/// assert_eq!(partial_refund(100, 0, 5, 0.3), 0);
/// ```
pub fn partial_refund(entry_cost: u64, floors_completed: u32, total_floors: u32, ratio: f64) -> u64 {
    if total_floors == 0 {
        return 0;
    }
    let completed = floors_completed.min(total_floors) as f64;
    (entry_cost as f64 * ratio * completed / total_floors as f64)
        .floor()
        .max(0.0) as u64
}
