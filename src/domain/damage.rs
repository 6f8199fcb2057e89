// Damage domain models
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Labels emitted by the damage classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DamageCategory {
    Crack,
    MajorCrack,
    MinorCrack,
    Spalling,
    Peeling,
    Algae,
    Stain,
    Normal,
}

impl DamageCategory {
    pub const ALL: [DamageCategory; 8] = [
        DamageCategory::Crack,
        DamageCategory::MajorCrack,
        DamageCategory::MinorCrack,
        DamageCategory::Spalling,
        DamageCategory::Peeling,
        DamageCategory::Algae,
        DamageCategory::Stain,
        DamageCategory::Normal,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Crack => "crack",
            Self::MajorCrack => "major_crack",
            Self::MinorCrack => "minor_crack",
            Self::Spalling => "spalling",
            Self::Peeling => "peeling",
            Self::Algae => "algae",
            Self::Stain => "stain",
            Self::Normal => "normal",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Crack => "Crack",
            Self::MajorCrack => "Major Crack",
            Self::MinorCrack => "Minor Crack",
            Self::Spalling => "Spalling",
            Self::Peeling => "Peeling",
            Self::Algae => "Algae",
            Self::Stain => "Stain",
            Self::Normal => "Normal",
        }
    }
}

/// Human readable name for a raw classifier label.
pub fn display_label(raw: &str) -> String {
    match DamageCategory::from_label(raw) {
        Some(category) => category.display_name().to_string(),
        None => raw.replace('_', " "),
    }
}

/// Detection counts keyed by classifier label.
///
/// Labels are kept verbatim so that categories unknown to this client still
/// show up in history and reports. A zero count is the same as no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageObservation {
    counts: BTreeMap<String, u32>,
}

impl DamageObservation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, count: u32) -> Self {
        self.insert(label, count);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, count: u32) {
        self.counts.insert(label.into(), count);
    }

    pub fn count(&self, label: &str) -> u32 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn contains(&self, category: DamageCategory) -> bool {
        self.count(category.label()) > 0
    }

    /// Entries with a non-zero count, ordered by label.
    pub fn detections(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(label, count)| (label.as_str(), *count))
    }

    pub fn total_detections(&self) -> u32 {
        self.detections()
            .fold(0u32, |total, (_, count)| total.saturating_add(count))
    }

    pub fn is_empty(&self) -> bool {
        self.detections().next().is_none()
    }
}
