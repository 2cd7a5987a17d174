//! Stat aggregation.
//!
//! Combines a character's base stats, summed equipment bonuses, and a
//! cultivation tier multiplier into effective combat stats:
//!
//! ```text
//! [base] + [equipment totals] → × tier multiplier → [AggregatedStats]
//! ```
//!
//! - attack, defense, speed, max hp and max mp are
//!   `trunc((base + equipment) × multiplier)`.
//! - crit rate is `base + equipment`, clamped into `[0, cap]` (cap 1.0 by default).
//! - crit damage is `base + equipment`, unclamped.
//!
//! No inputs are rejected; negative values propagate arithmetically.

use crate::breakdown::StatBreakdown;
use crate::config::EngineConfig;
use crate::cultivation::CultivationTier;
use crate::equipment::{EquipmentBonus, EquipmentTotals};
use crate::numeric::{clamp_rate, scale_truncated};
use crate::stats::{AggregatedStats, CombatStats, StatKind};
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregates effective stats.
///
/// # Examples
///
/// ```rust
/// use zzcombat::*;
/// use zzcombat::equipment::{EquipmentBonus, EquipmentSlot, Rarity};
/// use zzcombat::cultivation::CultivationTier;
///
/// let base = CombatStats::new(20, 10, 5, 100).with_crit(0.1, 1.5);
/// let gear = vec![
///     EquipmentBonus::new("jade_sword", EquipmentSlot::Weapon, Rarity::Rare)
///         .with_attack(10)
///         .with_crit_rate(0.05),
/// ];
/// let tier = CultivationTier::new(2, "Foundation Establishment", 1_000, 1.5);
///
/// let stats = StatAggregator::new().aggregate(&base, &gear, &tier);
/// assert_eq!(stats.attack, 45);   // (20 + 10) * 1.5
/// assert_eq!(stats.defense, 15);  // 10 * 1.5
/// assert_eq!(stats.max_hp, 150);
/// assert!((stats.crit_rate - 0.15).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatAggregator {
    crit_rate_cap: f64,
}

impl StatAggregator {
    /// An aggregator with the default crit rate cap of 1.0.
    pub fn new() -> Self {
        Self { crit_rate_cap: 1.0 }
    }

    /// An aggregator using the cap from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            crit_rate_cap: config.crit_rate_cap,
        }
    }

    /// Compute effective stats.
    ///
    /// The order of `equipment` does not affect the result.
    pub fn aggregate(
        &self,
        base: &CombatStats,
        equipment: &[EquipmentBonus],
        tier: &CultivationTier,
    ) -> AggregatedStats {
        let totals = EquipmentTotals::sum(equipment);
        let scale = |base: i64, bonus: i64| scale_truncated(base + bonus, tier.multiplier);

        let stats = AggregatedStats {
            attack: scale(base.attack, totals.attack),
            defense: scale(base.defense, totals.defense),
            speed: scale(base.speed, totals.speed),
            max_hp: scale(base.max_hp, totals.hp),
            max_mp: scale(base.max_mp, totals.mp),
            crit_rate: clamp_rate(base.crit_rate + totals.crit_rate, self.crit_rate_cap),
            crit_damage: base.crit_damage + totals.crit_damage,
        };

        debug!(
            tier = tier.level,
            items = equipment.len(),
            attack = stats.attack,
            defense = stats.defense,
            speed = stats.speed,
            max_hp = stats.max_hp,
            crit_rate = stats.crit_rate,
            "stats aggregated"
        );
        stats
    }

    /// Explain how one effective stat was derived.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzcombat::*;
    /// use zzcombat::equipment::{EquipmentBonus, EquipmentSlot, Rarity};
    /// use zzcombat::cultivation::CultivationTier;
    ///
    /// let base = CombatStats::new(20, 10, 5, 100).with_crit(0.6, 1.5);
    /// let gear = vec![
    ///     EquipmentBonus::new("ring", EquipmentSlot::Accessory, Rarity::Epic).with_crit_rate(0.7),
    /// ];
    /// let tier = CultivationTier::new(1, "Qi Condensation", 0, 1.0);
    ///
    /// let breakdown = StatAggregator::new().explain(StatKind::CritRate, &base, &gear, &tier);
    /// assert_eq!(breakdown.value, 1.0);
    /// assert_eq!(breakdown.sources.len(), 2);
    /// assert_eq!(breakdown.transforms.len(), 1);
    /// ```
    pub fn explain(
        &self,
        stat: StatKind,
        base: &CombatStats,
        equipment: &[EquipmentBonus],
        tier: &CultivationTier,
    ) -> StatBreakdown {
        let value = self.aggregate(base, equipment, tier).get(stat);
        let mut breakdown = StatBreakdown::new(stat, value);

        breakdown.add_source("base", base.get(stat));
        for item in equipment {
            let bonus = item.get(stat);
            if bonus != 0.0 {
                breakdown.add_source(item.id.clone(), bonus);
            }
        }

        match stat {
            StatKind::CritRate => {
                let raw = base.crit_rate + EquipmentTotals::sum(equipment).crit_rate;
                if raw != value {
                    breakdown.add_transform(format!("clamp [0, {}]", self.crit_rate_cap), value);
                }
            }
            StatKind::CritDamage => {}
            _ => {
                breakdown.add_transform(format!("{} x{}", tier.name, tier.multiplier), value);
            }
        }
        breakdown
    }

    /// Explain every stat, keyed by stat.
    pub fn explain_all(
        &self,
        base: &CombatStats,
        equipment: &[EquipmentBonus],
        tier: &CultivationTier,
    ) -> BTreeMap<StatKind, StatBreakdown> {
        StatKind::ALL
            .iter()
            .map(|&stat| (stat, self.explain(stat, base, equipment, tier)))
            .collect()
    }
}

impl Default for StatAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate with the default configuration.
pub fn aggregate(
    base: &CombatStats,
    equipment: &[EquipmentBonus],
    tier: &CultivationTier,
) -> AggregatedStats {
    StatAggregator::new().aggregate(base, equipment, tier)
}
