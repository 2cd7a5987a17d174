//! Combat stat types.
//!
//! Stats are plain value objects. Every derivation in the engine returns
//! a new value; nothing here is mutated in place by the resolvers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for each stat the engine derives.
///
/// # Examples
///
/// ```rust
/// use zzcombat::StatKind;
///
/// assert_eq!(StatKind::CritRate.as_str(), "crit_rate");
/// assert_eq!(StatKind::ALL.len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Attack,
    Defense,
    Speed,
    MaxHp,
    MaxMp,
    CritRate,
    CritDamage,
}

impl StatKind {
    /// Every stat, in display order.
    pub const ALL: [StatKind; 7] = [
        StatKind::Attack,
        StatKind::Defense,
        StatKind::Speed,
        StatKind::MaxHp,
        StatKind::MaxMp,
        StatKind::CritRate,
        StatKind::CritDamage,
    ];

    /// Stable snake_case name of the stat.
    pub fn as_str(self) -> &'static str {
        match self {
            StatKind::Attack => "attack",
            StatKind::Defense => "defense",
            StatKind::Speed => "speed",
            StatKind::MaxHp => "max_hp",
            StatKind::MaxMp => "max_mp",
            StatKind::CritRate => "crit_rate",
            StatKind::CritDamage => "crit_damage",
        }
    }

    /// Whether the cultivation tier multiplier scales this stat.
    pub fn scales_with_tier(self) -> bool {
        !matches!(self, StatKind::CritRate | StatKind::CritDamage)
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A combatant's stats as supplied to, or produced by, the engine.
///
/// `crit_rate` is a probability in `[0, 1]` and `crit_damage` a
/// multiplier of at least `1.0`. The engine does not reject values
/// outside those ranges; they propagate arithmetically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack: i64,
    pub defense: i64,
    pub speed: i64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub current_hp: i64,
    pub max_hp: i64,
    #[serde(default)]
    pub current_mp: i64,
    #[serde(default)]
    pub max_mp: i64,
}

impl CombatStats {
    /// Create stats with full hp, no mp, no crit chance and a 1.0 crit multiplier.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzcombat::CombatStats;
    ///
    /// let stats = CombatStats::new(20, 10, 5, 100);
    /// assert_eq!(stats.current_hp, 100);
    /// assert_eq!(stats.crit_rate, 0.0);
    /// ```
    pub fn new(attack: i64, defense: i64, speed: i64, max_hp: i64) -> Self {
        Self {
            attack,
            defense,
            speed,
            crit_rate: 0.0,
            crit_damage: 1.0,
            current_hp: max_hp,
            max_hp,
            current_mp: 0,
            max_mp: 0,
        }
    }

    /// Return a copy with the given crit rate and crit damage.
    pub fn with_crit(self, crit_rate: f64, crit_damage: f64) -> Self {
        Self {
            crit_rate,
            crit_damage,
            ..self
        }
    }

    /// Return a copy with the given mp pool, filled.
    pub fn with_mp(self, max_mp: i64) -> Self {
        Self {
            current_mp: max_mp,
            max_mp,
            ..self
        }
    }

    /// Return a copy with current hp replaced.
    pub fn with_current_hp(self, current_hp: i64) -> Self {
        Self { current_hp, ..self }
    }

    /// Base value of a single stat, as a float.
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Attack => self.attack as f64,
            StatKind::Defense => self.defense as f64,
            StatKind::Speed => self.speed as f64,
            StatKind::MaxHp => self.max_hp as f64,
            StatKind::MaxMp => self.max_mp as f64,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
        }
    }
}

/// Effective stats after equipment and tier multiplier are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStats {
    pub attack: i64,
    pub defense: i64,
    pub speed: i64,
    pub max_hp: i64,
    pub max_mp: i64,
    pub crit_rate: f64,
    pub crit_damage: f64,
}

impl AggregatedStats {
    /// Value of a single effective stat, as a float.
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Attack => self.attack as f64,
            StatKind::Defense => self.defense as f64,
            StatKind::Speed => self.speed as f64,
            StatKind::MaxHp => self.max_hp as f64,
            StatKind::MaxMp => self.max_mp as f64,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
        }
    }

    /// Build the stats a combatant enters battle with.
    ///
    /// Current hp and mp are capped at the effective maximums.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzcombat::AggregatedStats;
    ///
    /// let effective = AggregatedStats {
    ///     attack: 30, defense: 12, speed: 8, max_hp: 150, max_mp: 40,
    ///     crit_rate: 0.1, crit_damage: 1.5,
    /// };
    /// let combatant = effective.combatant(200, 10);
    /// assert_eq!(combatant.current_hp, 150);
    /// assert_eq!(combatant.current_mp, 10);
    /// ```
    pub fn combatant(&self, current_hp: i64, current_mp: i64) -> CombatStats {
        CombatStats {
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
            crit_rate: self.crit_rate,
            crit_damage: self.crit_damage,
            current_hp: current_hp.min(self.max_hp),
            max_hp: self.max_hp,
            current_mp: current_mp.min(self.max_mp),
            max_mp: self.max_mp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_kind_scaling() {
        assert!(StatKind::Attack.scales_with_tier());
        assert!(StatKind::MaxMp.scales_with_tier());
        assert!(!StatKind::CritRate.scales_with_tier());
        assert!(!StatKind::CritDamage.scales_with_tier());
    }

    #[test]
    fn test_stat_kind_serde_name() {
        let json = serde_json::to_string(&StatKind::MaxHp).unwrap();
        assert_eq!(json, "\"max_hp\"");
    }

    #[test]
    fn test_combat_stats_builders() {
        let stats = CombatStats::new(10, 4, 3, 80)
            .with_crit(0.2, 1.8)
            .with_mp(30)
            .with_current_hp(45);
        assert_eq!(stats.current_hp, 45);
        assert_eq!(stats.max_hp, 80);
        assert_eq!(stats.current_mp, 30);
        assert_eq!(stats.crit_damage, 1.8);
    }

    #[test]
    fn test_combat_stats_deserialize_without_mp() {
        let json = r#"{
            "attack": 12, "defense": 6, "speed": 4,
            "crit_rate": 0.05, "crit_damage": 1.5,
            "current_hp": 60, "max_hp": 60
        }"#;
        let stats: CombatStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.max_mp, 0);
        assert_eq!(stats.attack, 12);
    }
}
