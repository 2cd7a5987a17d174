//! Cultivation tiers and tier advancement.
//!
//! A tier is a discrete power stage. It declares an experience threshold,
//! stat floors, and a multiplier applied to every scaled effective stat.
//! Advancing a tier resets hp/mp and the core stats to the new floors;
//! equipment is re-applied afterwards by the aggregator.

use crate::error::{EngineError, EngineResult};
use crate::stats::CombatStats;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single cultivation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultivationTier {
    pub level: u32,
    pub name: String,
    /// Minimum cumulative experience required to hold this tier.
    pub min_exp: u64,
    pub max_hp: i64,
    pub max_mp: i64,
    pub attack: i64,
    pub defense: i64,
    pub speed: i64,
    /// Scalar applied to attack, defense, speed, max hp and max mp.
    pub multiplier: f64,
}

impl CultivationTier {
    /// A tier with zeroed floors and the given multiplier.
    pub fn new(level: u32, name: impl Into<String>, min_exp: u64, multiplier: f64) -> Self {
        Self {
            level,
            name: name.into(),
            min_exp,
            max_hp: 0,
            max_mp: 0,
            attack: 0,
            defense: 0,
            speed: 0,
            multiplier,
        }
    }

    /// Set the stat floors of this tier.
    pub fn with_floors(
        mut self,
        max_hp: i64,
        max_mp: i64,
        attack: i64,
        defense: i64,
        speed: i64,
    ) -> Self {
        self.max_hp = max_hp;
        self.max_mp = max_mp;
        self.attack = attack;
        self.defense = defense;
        self.speed = speed;
        self
    }

    /// The stat reset a character receives on entering this tier.
    pub fn reset(&self) -> TierReset {
        TierReset {
            current_hp: self.max_hp,
            max_hp: self.max_hp,
            current_mp: self.max_mp,
            max_mp: self.max_mp,
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
        }
    }
}

/// Tiers ordered by level, with contiguous levels and strictly increasing
/// experience thresholds.
///
/// # Examples
///
/// ```rust
/// use zzcombat::cultivation::{CultivationTier, TierTable};
///
/// let table = TierTable::new(vec![
///     CultivationTier::new(1, "Qi Condensation", 0, 1.0),
///     CultivationTier::new(2, "Foundation Establishment", 1_000, 1.5),
/// ]).unwrap();
/// assert_eq!(table.len(), 2);
///
/// let broken = TierTable::new(vec![
///     CultivationTier::new(1, "Qi Condensation", 500, 1.0),
///     CultivationTier::new(2, "Foundation Establishment", 500, 1.5),
/// ]);
/// assert!(broken.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CultivationTier>", into = "Vec<CultivationTier>")]
pub struct TierTable {
    tiers: Vec<CultivationTier>,
}

impl TierTable {
    /// Build a table, sorting by level and checking the ordering invariant.
    pub fn new(mut tiers: Vec<CultivationTier>) -> EngineResult<Self> {
        tiers.sort_by_key(|t| t.level);
        for pair in tiers.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.level == upper.level {
                return Err(EngineError::InvalidTierTable(format!(
                    "duplicate level {}",
                    lower.level
                )));
            }
            if lower.level.checked_add(1) != Some(upper.level) {
                return Err(EngineError::InvalidTierTable(format!(
                    "gap between level {} and level {}",
                    lower.level, upper.level
                )));
            }
            if lower.min_exp >= upper.min_exp {
                return Err(EngineError::InvalidTierTable(format!(
                    "threshold of level {} ({}) is not below level {} ({})",
                    lower.level, lower.min_exp, upper.level, upper.min_exp
                )));
            }
        }
        Ok(Self { tiers })
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The lowest tier.
    pub fn first(&self) -> Option<&CultivationTier> {
        self.tiers.first()
    }

    /// Look up a tier by level.
    pub fn get(&self, level: u32) -> Option<&CultivationTier> {
        self.tiers
            .binary_search_by_key(&level, |t| t.level)
            .ok()
            .map(|idx| &self.tiers[idx])
    }

    /// Tiers in ascending level order.
    pub fn iter(&self) -> std::slice::Iter<'_, CultivationTier> {
        self.tiers.iter()
    }
}

impl TryFrom<Vec<CultivationTier>> for TierTable {
    type Error = EngineError;

    fn try_from(tiers: Vec<CultivationTier>) -> Result<Self, Self::Error> {
        TierTable::new(tiers)
    }
}

impl From<TierTable> for Vec<CultivationTier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}

/// Stats a character holds immediately after a breakthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierReset {
    pub current_hp: i64,
    pub max_hp: i64,
    pub current_mp: i64,
    pub max_mp: i64,
    pub attack: i64,
    pub defense: i64,
    pub speed: i64,
}

impl TierReset {
    /// Apply the reset to a character's base stats. Crit stats are kept.
    pub fn apply_to(&self, base: &CombatStats) -> CombatStats {
        CombatStats {
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
            current_hp: self.current_hp,
            max_hp: self.max_hp,
            current_mp: self.current_mp,
            max_mp: self.max_mp,
            ..*base
        }
    }
}

/// A successful breakthrough into the next tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierAdvance {
    pub tier: CultivationTier,
    pub reset: TierReset,
}

/// Result of an advancement request.
///
/// Reaching the top tier is a defined boundary, so it is returned as
/// data; callers branch on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Advancement {
    Advanced(TierAdvance),
    MaxTierReached { level: u32 },
}

impl Advancement {
    pub fn is_advanced(&self) -> bool {
        matches!(self, Advancement::Advanced(_))
    }

    /// The advance, if there was one.
    pub fn ok(self) -> Option<TierAdvance> {
        match self {
            Advancement::Advanced(advance) => Some(advance),
            Advancement::MaxTierReached { .. } => None,
        }
    }

    /// Convert to a `Result` for callers that propagate with `?`.
    pub fn into_result(self) -> EngineResult<TierAdvance> {
        match self {
            Advancement::Advanced(advance) => Ok(advance),
            Advancement::MaxTierReached { level } => Err(EngineError::MaxTierReached { level }),
        }
    }
}

/// Advance from `current` to the tier at `current.level + 1`.
///
/// # Examples
///
/// ```rust
/// use zzcombat::cultivation::{advance, Advancement, CultivationTier, TierTable};
///
/// let table = TierTable::new(vec![
///     CultivationTier::new(1, "Qi Condensation", 0, 1.0),
///     CultivationTier::new(2, "Foundation Establishment", 1_000, 1.5)
///         .with_floors(300, 120, 40, 25, 15),
/// ]).unwrap();
///
/// let first = table.first().unwrap();
/// let next = advance(first, &table).ok().unwrap();
/// assert_eq!(next.tier.level, 2);
/// assert_eq!(next.reset.current_hp, 300);
///
/// let top = table.get(2).unwrap();
/// assert_eq!(advance(top, &table), Advancement::MaxTierReached { level: 2 });
/// ```
pub fn advance(current: &CultivationTier, table: &TierTable) -> Advancement {
    let Some(next) = current.level.checked_add(1).and_then(|l| table.get(l)) else {
        debug!(level = current.level, "cultivation already at top tier");
        return Advancement::MaxTierReached {
            level: current.level,
        };
    };

    debug!(
        from = current.level,
        to = next.level,
        tier = %next.name,
        "cultivation breakthrough"
    );
    Advancement::Advanced(TierAdvance {
        tier: next.clone(),
        reset: next.reset(),
    })
}

/// The highest tier whose threshold `experience` meets.
pub fn qualifying_tier(experience: u64, table: &TierTable) -> Option<&CultivationTier> {
    table.iter().rev().find(|t| t.min_exp <= experience)
}

/// Whether `experience` meets the threshold of the tier after `current`.
pub fn can_advance(experience: u64, current: &CultivationTier, table: &TierTable) -> bool {
    current
        .level
        .checked_add(1)
        .and_then(|l| table.get(l))
        .is_some_and(|next| experience >= next.min_exp)
}
