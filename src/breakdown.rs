//! Stat breakdown module.
//!
//! Contains the `StatBreakdown` type, which explains how an effective
//! stat was derived: which sources contributed to it and which
//! transforms were applied afterwards.

use crate::stats::StatKind;
use serde::{Deserialize, Serialize};

/// An effective stat value together with the steps that produced it.
///
/// Read-only and serializable, so it can be attached to audit logs.
///
/// # Examples
///
/// ```rust
/// use zzcombat::{StatBreakdown, StatKind};
///
/// let mut breakdown = StatBreakdown::new(StatKind::Attack, 45.0);
/// breakdown.add_source("base", 20.0);
/// breakdown.add_source("jade_sword", 10.0);
/// breakdown.add_transform("tier x1.5", 45.0);
///
/// assert_eq!(breakdown.source_total(), 30.0);
/// assert_eq!(breakdown.transforms.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatBreakdown {
    /// The stat being explained.
    pub stat: StatKind,

    /// The final effective value.
    pub value: f64,

    /// Contributing sources as `(description, value)`, in input order.
    pub sources: Vec<(String, f64)>,

    /// Applied transforms as `(description, value_after_transform)`,
    /// in application order.
    pub transforms: Vec<(String, f64)>,
}

impl StatBreakdown {
    /// Create an empty breakdown for `stat` with the given final value.
    pub fn new(stat: StatKind, value: f64) -> Self {
        Self {
            stat,
            value,
            sources: Vec::new(),
            transforms: Vec::new(),
        }
    }

    /// Record a source contribution.
    pub fn add_source(&mut self, description: impl Into<String>, value: f64) {
        self.sources.push((description.into(), value));
    }

    /// Record a transform and the value it produced.
    pub fn add_transform(&mut self, description: impl Into<String>, value: f64) {
        self.transforms.push((description.into(), value));
    }

    /// Sum of every source contribution, before transforms.
    pub fn source_total(&self) -> f64 {
        self.sources.iter().map(|(_, v)| v).sum()
    }
}
