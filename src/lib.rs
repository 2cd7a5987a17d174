//! # zzcombat - Deterministic Cultivation Combat and Progression Engine
//!
//! The combat and progression core of a cultivation RPG:
//! - **Stat aggregation**: base stats, equipment and cultivation tier
//!   combined into effective stats
//! - **Damage and battle**: single-hit damage with critical hits, and
//!   battles resolved as alternating exchanges
//! - **Loot**: independent per-entry drop rolls
//! - **Dungeon rewards**: star ratings and scaled gold/experience
//! - **Cultivation**: tier advancement with stat resets
//!
//! Every component is a pure function of its inputs plus a caller-supplied
//! [`random::RandomSource`]. Nothing is persisted; callers commit results.
//!
//! ## Pipeline
//!
//! ```text
//! [CombatStats] + [EquipmentBonus] + [CultivationTier] → [AggregatedStats]
//! [AggregatedStats] vs [monster CombatStats] → [BattleOutcome] → [LootDrop]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use zzcombat::*;
//! use zzcombat::battle::resolve;
//! use zzcombat::cultivation::CultivationTier;
//! use zzcombat::equipment::{EquipmentBonus, EquipmentSlot, Rarity};
//! use zzcombat::random::RngSource;
//!
//! let base = CombatStats::new(20, 10, 5, 100).with_crit(0.1, 1.5);
//! let gear = vec![EquipmentBonus::new("jade_sword", EquipmentSlot::Weapon, Rarity::Rare)
//!     .with_attack(10)];
//! let tier = CultivationTier::new(1, "Qi Condensation", 0, 1.0);
//!
//! let stats = StatAggregator::new().aggregate(&base, &gear, &tier);
//! assert_eq!(stats.attack, 30);
//!
//! let player = stats.combatant(base.current_hp, base.current_mp);
//! let wolf = CombatStats::new(15, 4, 9, 60);
//!
//! let mut rng = RngSource::seeded(7);
//! let outcome = resolve(&player, &wolf, &mut rng);
//! assert!(outcome.success);
//! ```
//!
//! ## Modules
//!
//! - [`stats`] - Combat stat types
//! - [`equipment`] - Equipment bonuses
//! - [`aggregate`] - Effective stat aggregation
//! - [`breakdown`] - Per-stat derivation breakdown
//! - [`random`] - Random sources
//! - [`damage`] - Single-hit damage
//! - [`battle`] - Battle resolution
//! - [`loot`] - Loot tables and drops
//! - [`dungeon`] - Dungeon stars, rewards and entry checks
//! - [`cultivation`] - Cultivation tiers and advancement
//! - [`snapshot`] - Character and monster records
//! - [`catalog`] - Game data lookup
//! - [`encounter`] - Orchestration over a catalog
//! - [`config`] - Engine configuration
//! - [`numeric`] - Rounding helpers
//! - [`error`] - Error types

pub mod aggregate;
pub mod battle;
pub mod breakdown;
pub mod catalog;
pub mod config;
pub mod cultivation;
pub mod damage;
pub mod dungeon;
pub mod encounter;
pub mod equipment;
pub mod error;
pub mod loot;
pub mod numeric;
pub mod random;
pub mod snapshot;
pub mod stats;

// Re-export main types for convenience
pub use aggregate::StatAggregator;
pub use battle::BattleOutcome;
pub use breakdown::StatBreakdown;
pub use config::EngineConfig;
pub use encounter::Engine;
pub use error::{EngineError, EngineResult};
pub use stats::{AggregatedStats, CombatStats, StatKind};
