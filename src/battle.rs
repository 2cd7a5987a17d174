//! Battle resolution.
//!
//! A battle is a two-state machine, `InProgress` then `Resolved`. Each
//! side's damage is rolled once and then applied for every exchange.
//! Within an exchange the defender is hit first; the attacker only takes
//! return damage if the defender is still standing. Both damage values
//! are at least 1, so a battle over finite hp always terminates.

use crate::damage::{roll_hit, Hit};
use crate::random::RandomSource;
use crate::stats::CombatStats;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// State of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    InProgress,
    Resolved,
}

/// Final result of a battle.
///
/// Hp fields are clamped to zero, so the losing side reads 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Whether the attacker (player side) won.
    pub success: bool,
    /// Attacker hp remaining.
    pub player_hp: i64,
    /// Defender hp remaining.
    pub monster_hp: i64,
    /// Damage the attacker dealt per exchange.
    pub player_damage: i64,
    /// Damage the defender dealt per exchange.
    pub monster_damage: i64,
    /// Whether the attacker's rolled damage was critical.
    #[serde(default)]
    pub player_critical: bool,
    /// Whether the defender's rolled damage was critical.
    #[serde(default)]
    pub monster_critical: bool,
    /// Number of exchanges played.
    pub exchanges: u64,
}

/// A battle between two combatants with fixed per-exchange damage.
///
/// # Examples
///
/// ```rust
/// use zzcombat::battle::{Battle, BattleState};
///
/// let mut battle = Battle::new(100, 50, 30, 30);
/// assert_eq!(battle.state(), BattleState::InProgress);
///
/// battle.step();
/// assert_eq!(battle.hp(), (70, 20));
///
/// battle.step();
/// assert_eq!(battle.state(), BattleState::Resolved);
///
/// let outcome = battle.outcome().unwrap();
/// assert!(outcome.success);
/// assert_eq!(outcome.player_hp, 70);
/// assert_eq!(outcome.monster_hp, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Battle {
    attacker_hp: i64,
    defender_hp: i64,
    attacker_hit: Hit,
    defender_hit: Hit,
    exchanges: u64,
    state: BattleState,
}

impl Battle {
    /// Start a battle from current hp and fixed damage per exchange.
    ///
    /// Damage below 1 is raised to 1. A side already at 0 hp or below
    /// resolves the battle immediately.
    pub fn new(
        attacker_hp: i64,
        defender_hp: i64,
        attacker_damage: i64,
        defender_damage: i64,
    ) -> Self {
        Self::from_hits(
            attacker_hp,
            defender_hp,
            Hit {
                damage: attacker_damage,
                critical: false,
            },
            Hit {
                damage: defender_damage,
                critical: false,
            },
        )
    }

    /// Start a battle from two rolled hits.
    pub fn from_hits(
        attacker_hp: i64,
        defender_hp: i64,
        attacker_hit: Hit,
        defender_hit: Hit,
    ) -> Self {
        let state = if attacker_hp <= 0 || defender_hp <= 0 {
            BattleState::Resolved
        } else {
            BattleState::InProgress
        };
        Self {
            attacker_hp,
            defender_hp,
            attacker_hit: Hit {
                damage: attacker_hit.damage.max(1),
                ..attacker_hit
            },
            defender_hit: Hit {
                damage: defender_hit.damage.max(1),
                ..defender_hit
            },
            exchanges: 0,
            state,
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Current `(attacker_hp, defender_hp)`, unclamped.
    pub fn hp(&self) -> (i64, i64) {
        (self.attacker_hp, self.defender_hp)
    }

    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    /// Play one exchange. Does nothing once resolved.
    pub fn step(&mut self) -> BattleState {
        if self.state == BattleState::Resolved {
            return self.state;
        }

        self.exchanges = self.exchanges.saturating_add(1);
        self.defender_hp = self.defender_hp.saturating_sub(self.attacker_hit.damage);
        if self.defender_hp > 0 {
            self.attacker_hp = self.attacker_hp.saturating_sub(self.defender_hit.damage);
        }

        if self.attacker_hp <= 0 || self.defender_hp <= 0 {
            self.state = BattleState::Resolved;
        }
        self.state
    }

    /// The outcome, once the battle is resolved.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        if self.state != BattleState::Resolved {
            return None;
        }
        Some(BattleOutcome {
            success: self.attacker_hp > 0,
            player_hp: self.attacker_hp.max(0),
            monster_hp: self.defender_hp.max(0),
            player_damage: self.attacker_hit.damage,
            monster_damage: self.defender_hit.damage,
            player_critical: self.attacker_hit.critical,
            monster_critical: self.defender_hit.critical,
            exchanges: self.exchanges,
        })
    }

    /// Play the remaining exchanges and return the outcome.
    ///
    /// The result is identical to calling [`Battle::step`] until resolved,
    /// but it is computed directly from the exchange counts, so it costs
    /// the same for any hp.
    pub fn run(mut self) -> BattleOutcome {
        if self.state == BattleState::InProgress {
            self.fast_forward();
        }

        let outcome = BattleOutcome {
            success: self.attacker_hp > 0,
            player_hp: self.attacker_hp.max(0),
            monster_hp: self.defender_hp.max(0),
            player_damage: self.attacker_hit.damage,
            monster_damage: self.defender_hit.damage,
            player_critical: self.attacker_hit.critical,
            monster_critical: self.defender_hit.critical,
            exchanges: self.exchanges,
        };
        debug!(
            success = outcome.success,
            player_hp = outcome.player_hp,
            monster_hp = outcome.monster_hp,
            exchanges = outcome.exchanges,
            "battle resolved"
        );
        outcome
    }

    /// Jump to the end of an in-progress battle.
    ///
    /// The defender falls after `ceil(defender_hp / attacker_damage)`
    /// exchanges and the attacker after `ceil(attacker_hp / defender_damage)`.
    /// The defender is struck first in each exchange, so the attacker wins
    /// ties.
    fn fast_forward(&mut self) {
        let attacker_hp = self.attacker_hp as i128;
        let defender_hp = self.defender_hp as i128;
        let attacker_damage = self.attacker_hit.damage as i128;
        let defender_damage = self.defender_hit.damage as i128;

        let to_fell_defender = ceil_div(defender_hp, attacker_damage);
        let to_fell_attacker = ceil_div(attacker_hp, defender_damage);

        let (exchanges, attacker_hits_taken) = if to_fell_defender <= to_fell_attacker {
            (to_fell_defender, to_fell_defender - 1)
        } else {
            (to_fell_attacker, to_fell_attacker)
        };

        // both results lie in (-damage, hp], so they fit back into i64
        self.defender_hp = (defender_hp - exchanges * attacker_damage) as i64;
        self.attacker_hp = (attacker_hp - attacker_hits_taken * defender_damage) as i64;
        self.exchanges = self
            .exchanges
            .saturating_add(u64::try_from(exchanges).unwrap_or(u64::MAX));
        self.state = BattleState::Resolved;
    }
}

/// `ceil(a / b)` for positive `a` and `b`.
fn ceil_div(a: i128, b: i128) -> i128 {
    (a + b - 1) / b
}

/// Resolve a battle between an attacker and a defender.
///
/// Rolls the attacker's hit, then the defender's hit (two draws from
/// `rng`), and plays exchanges from each side's current hp until one
/// side falls.
///
/// # Examples
///
/// ```rust
/// use zzcombat::battle::resolve;
/// use zzcombat::random::RngSource;
/// use zzcombat::CombatStats;
///
/// let player = CombatStats::new(40, 10, 8, 120);
/// let slime = CombatStats::new(12, 4, 3, 60);
///
/// let mut rng = RngSource::seeded(5);
/// let outcome = resolve(&player, &slime, &mut rng);
/// assert!(outcome.success);
/// assert_eq!(outcome.player_damage, 38);
/// assert_eq!(outcome.monster_damage, 7);
/// assert_eq!(outcome.player_hp, 113);
/// ```
pub fn resolve<R: RandomSource + ?Sized>(
    attacker: &CombatStats,
    defender: &CombatStats,
    rng: &mut R,
) -> BattleOutcome {
    let attacker_hit = roll_hit(
        attacker.attack,
        defender.defense,
        attacker.crit_rate,
        attacker.crit_damage,
        rng,
    );
    let defender_hit = roll_hit(
        defender.attack,
        attacker.defense,
        defender.crit_rate,
        defender.crit_damage,
        rng,
    );
    Battle::from_hits(
        attacker.current_hp,
        defender.current_hp,
        attacker_hit,
        defender_hit,
    )
    .run()
}

/// Resolve a battle with pre-computed damage values.
pub fn resolve_fixed(
    attacker_hp: i64,
    defender_hp: i64,
    attacker_damage: i64,
    defender_damage: i64,
) -> BattleOutcome {
    Battle::new(attacker_hp, defender_hp, attacker_damage, defender_damage).run()
}
