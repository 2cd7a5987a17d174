//! Single-hit damage model.
//!
//! Base damage is `max(1, attack - defense / 2)`. A Bernoulli trial with
//! probability `crit_rate` decides a critical hit, which multiplies the
//! damage by `crit_damage` and rounds half up. Damage never drops below 1,
//! which guarantees every battle makes progress.

use crate::numeric::round_half_up;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Outcome of one hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub damage: i64,
    pub critical: bool,
}

/// Damage before the critical roll: `max(1, attack - floor(defense / 2))`.
///
/// # Examples
///
/// ```rust
/// use zzcombat::damage::base_damage;
///
/// assert_eq!(base_damage(20, 10), 15);
/// assert_eq!(base_damage(20, 11), 15);
/// assert_eq!(base_damage(3, 100), 1);
/// ```
pub fn base_damage(attack: i64, defense: i64) -> i64 {
    attack.saturating_sub(defense.div_euclid(2)).max(1)
}

/// Roll one hit, returning the damage and whether it was critical.
///
/// Consumes exactly one unit draw from `rng`, even when `crit_rate`
/// is zero.
///
/// # Examples
///
/// ```rust
/// use zzcombat::damage::roll_hit;
/// use zzcombat::random::ScriptedSource;
///
/// // 0.0 is below any positive crit rate.
/// let mut rng = ScriptedSource::constant(0.0);
/// let hit = roll_hit(20, 10, 0.5, 1.5, &mut rng);
/// assert!(hit.critical);
/// assert_eq!(hit.damage, 23); // 15 * 1.5 = 22.5, rounded half up
/// ```
pub fn roll_hit<R: RandomSource + ?Sized>(
    attack: i64,
    defense: i64,
    crit_rate: f64,
    crit_damage: f64,
    rng: &mut R,
) -> Hit {
    let base = base_damage(attack, defense);
    let critical = rng.next_unit() < crit_rate;
    let damage = if critical {
        round_half_up(base as f64 * crit_damage).max(1)
    } else {
        base
    };

    trace!(attack, defense, base, damage, critical, "hit rolled");
    Hit { damage, critical }
}

/// Damage of one hit.
///
/// # Examples
///
/// ```rust
/// use zzcombat::damage::hit;
/// use zzcombat::random::RngSource;
///
/// let mut rng = RngSource::seeded(1);
/// assert_eq!(hit(20, 10, 0.0, 1.0, &mut rng), 15);
/// ```
pub fn hit<R: RandomSource + ?Sized>(
    attack: i64,
    defense: i64,
    crit_rate: f64,
    crit_damage: f64,
    rng: &mut R,
) -> i64 {
    roll_hit(attack, defense, crit_rate, crit_damage, rng).damage
}
