//! Equipment bonuses and their summed totals.
//!
//! Slot exclusivity (one item per slot) is enforced by whoever assembles
//! the loadout. The engine only sums what it is given.

use crate::numeric::sum_unordered;
use crate::stats::StatKind;
use serde::{Deserialize, Serialize};

/// Slot category an item occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Accessory,
}

/// Rarity tier of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Flat stat bonuses granted by one equipped item.
///
/// # Examples
///
/// ```rust
/// use zzcombat::equipment::{EquipmentBonus, EquipmentSlot, Rarity};
///
/// let sword = EquipmentBonus::new("iron_sword", EquipmentSlot::Weapon, Rarity::Common)
///     .with_attack(12)
///     .with_crit_rate(0.05);
/// assert_eq!(sword.attack, 12);
/// assert_eq!(sword.defense, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentBonus {
    pub id: String,
    pub slot: EquipmentSlot,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub attack: i64,
    #[serde(default)]
    pub defense: i64,
    #[serde(default)]
    pub speed: i64,
    #[serde(default)]
    pub hp: i64,
    #[serde(default)]
    pub mp: i64,
    #[serde(default)]
    pub crit_rate: f64,
    #[serde(default)]
    pub crit_damage: f64,
}

impl EquipmentBonus {
    /// Create an item with no bonuses.
    pub fn new(id: impl Into<String>, slot: EquipmentSlot, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            slot,
            rarity,
            attack: 0,
            defense: 0,
            speed: 0,
            hp: 0,
            mp: 0,
            crit_rate: 0.0,
            crit_damage: 0.0,
        }
    }

    /// Set the flat attack bonus.
    pub fn with_attack(mut self, attack: i64) -> Self {
        self.attack = attack;
        self
    }

    /// Set the flat defense bonus.
    pub fn with_defense(mut self, defense: i64) -> Self {
        self.defense = defense;
        self
    }

    /// Set the flat speed bonus.
    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the max hp bonus.
    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = hp;
        self
    }

    /// Set the max mp bonus.
    pub fn with_mp(mut self, mp: i64) -> Self {
        self.mp = mp;
        self
    }

    /// Set the crit rate bonus, added before clamping.
    pub fn with_crit_rate(mut self, crit_rate: f64) -> Self {
        self.crit_rate = crit_rate;
        self
    }

    /// Set the crit damage multiplier bonus.
    pub fn with_crit_damage(mut self, crit_damage: f64) -> Self {
        self.crit_damage = crit_damage;
        self
    }

    /// The bonus this item contributes to one stat.
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Attack => self.attack as f64,
            StatKind::Defense => self.defense as f64,
            StatKind::Speed => self.speed as f64,
            StatKind::MaxHp => self.hp as f64,
            StatKind::MaxMp => self.mp as f64,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
        }
    }
}

/// Per-stat sum of every equipped item's bonuses.
///
/// Summation is order independent: any permutation of the same items
/// yields an identical value, including the float fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EquipmentTotals {
    pub attack: i64,
    pub defense: i64,
    pub speed: i64,
    pub hp: i64,
    pub mp: i64,
    pub crit_rate: f64,
    pub crit_damage: f64,
}

impl EquipmentTotals {
    /// Sum the bonuses of a loadout.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzcombat::equipment::{EquipmentBonus, EquipmentSlot, EquipmentTotals, Rarity};
    ///
    /// let items = vec![
    ///     EquipmentBonus::new("blade", EquipmentSlot::Weapon, Rarity::Rare).with_attack(15),
    ///     EquipmentBonus::new("robe", EquipmentSlot::Armor, Rarity::Common).with_defense(8).with_hp(40),
    /// ];
    /// let totals = EquipmentTotals::sum(&items);
    /// assert_eq!(totals.attack, 15);
    /// assert_eq!(totals.hp, 40);
    /// ```
    pub fn sum(items: &[EquipmentBonus]) -> Self {
        Self {
            attack: items.iter().map(|i| i.attack).sum(),
            defense: items.iter().map(|i| i.defense).sum(),
            speed: items.iter().map(|i| i.speed).sum(),
            hp: items.iter().map(|i| i.hp).sum(),
            mp: items.iter().map(|i| i.mp).sum(),
            crit_rate: sum_unordered(items.iter().map(|i| i.crit_rate)),
            crit_damage: sum_unordered(items.iter().map(|i| i.crit_damage)),
        }
    }

    /// The summed bonus for one stat.
    pub fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Attack => self.attack as f64,
            StatKind::Defense => self.defense as f64,
            StatKind::Speed => self.speed as f64,
            StatKind::MaxHp => self.hp as f64,
            StatKind::MaxMp => self.mp as f64,
            StatKind::CritRate => self.crit_rate,
            StatKind::CritDamage => self.crit_damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loadout() -> Vec<EquipmentBonus> {
        vec![
            EquipmentBonus::new("jade_sword", EquipmentSlot::Weapon, Rarity::Epic)
                .with_attack(25)
                .with_crit_rate(0.1)
                .with_crit_damage(0.3),
            EquipmentBonus::new("cloud_robe", EquipmentSlot::Armor, Rarity::Rare)
                .with_defense(14)
                .with_hp(120)
                .with_mp(30),
            EquipmentBonus::new("wind_ring", EquipmentSlot::Accessory, Rarity::Uncommon)
                .with_speed(6)
                .with_crit_rate(0.07),
        ]
    }

    #[test]
    fn test_empty_totals_are_zero() {
        assert_eq!(EquipmentTotals::sum(&[]), EquipmentTotals::default());
    }

    #[test]
    fn test_sum_all_fields() {
        let totals = EquipmentTotals::sum(&loadout());
        assert_eq!(totals.attack, 25);
        assert_eq!(totals.defense, 14);
        assert_eq!(totals.speed, 6);
        assert_eq!(totals.hp, 120);
        assert_eq!(totals.mp, 30);
        assert!((totals.crit_rate - 0.17).abs() < 1e-12);
        assert!((totals.crit_damage - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_sum_is_order_independent() {
        let items = loadout();
        let mut reversed = items.clone();
        reversed.reverse();
        assert_eq!(EquipmentTotals::sum(&items), EquipmentTotals::sum(&reversed));
    }

    #[test]
    fn test_deserialize_sparse_item() {
        let json = r#"{ "id": "charm", "slot": "accessory", "crit_rate": 0.02 }"#;
        let item: EquipmentBonus = serde_json::from_str(json).unwrap();
        assert_eq!(item.rarity, Rarity::Common);
        assert_eq!(item.attack, 0);
        assert_eq!(item.get(StatKind::CritRate), 0.02);
    }
}
