// Scoring engine - Turns classifier detections into a verdict
use crate::domain::damage::{DamageCategory, DamageObservation};
use crate::domain::inspection::{InspectionResult, Severity};
use serde::Deserialize;
use std::collections::HashMap;

const BASELINE_SCORE: u32 = 100;

const FIXED_PRECAUTIONS: [&str; 3] = [
    "Regular inspection recommended",
    "Monitor damaged areas monthly",
    "Consider professional assessment",
];

/// Score deduction per detection, keyed by classifier label.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyTable {
    weights: HashMap<String, u32>,
}

impl PenaltyTable {
    /// Applies configured weights on top of the defaults.
    pub fn with_overrides(overrides: &HashMap<String, u32>) -> Self {
        let mut table = Self::default();
        for (label, weight) in overrides {
            table.weights.insert(label.clone(), *weight);
        }
        table
    }

    /// Unknown labels do not penalise.
    pub fn penalty(&self, label: &str) -> u32 {
        self.weights.get(label).copied().unwrap_or(0)
    }
}

impl Default for PenaltyTable {
    fn default() -> Self {
        let weights = DamageCategory::ALL
            .into_iter()
            .map(|category| (category.label().to_string(), default_penalty(category)))
            .collect();
        Self { weights }
    }
}

fn default_penalty(category: DamageCategory) -> u32 {
    match category {
        DamageCategory::Crack => 12,
        DamageCategory::MajorCrack => 15,
        DamageCategory::MinorCrack => 8,
        DamageCategory::Spalling => 20,
        DamageCategory::Peeling => 10,
        DamageCategory::Algae => 5,
        DamageCategory::Stain => 5,
        DamageCategory::Normal => 0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecautionPolicy {
    /// The same advice for every result.
    #[default]
    Fixed,
    /// Advice for each detected category, in label order.
    PerCategory,
}

fn category_guidance(category: DamageCategory) -> Option<&'static str> {
    match category {
        DamageCategory::Crack => Some("Seal cracks early to prevent structural weakening."),
        DamageCategory::MajorCrack => {
            Some("Immediate structural inspection and repair required.")
        }
        DamageCategory::MinorCrack => Some("Monitor cracks and apply sealant if needed."),
        DamageCategory::Spalling => {
            Some("Repair damaged concrete immediately to avoid further degradation.")
        }
        DamageCategory::Peeling => Some("Remove loose material and reapply protective coating."),
        DamageCategory::Algae => {
            Some("Clean surface and improve drainage to prevent moisture retention.")
        }
        DamageCategory::Stain => Some("Identify moisture source and clean affected area."),
        DamageCategory::Normal => None,
    }
}

/// Severity is driven by how many detections there are, not by the score.
pub fn severity_for(total_detections: u32) -> Severity {
    match total_detections {
        0 => Severity::Good,
        1..=2 => Severity::Moderate,
        _ => Severity::Critical,
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    penalties: PenaltyTable,
    precaution_policy: PrecautionPolicy,
}

impl ScoringEngine {
    pub fn new(penalties: PenaltyTable, precaution_policy: PrecautionPolicy) -> Self {
        Self {
            penalties,
            precaution_policy,
        }
    }

    pub fn score(&self, damages: &DamageObservation) -> InspectionResult {
        InspectionResult {
            severity: severity_for(damages.total_detections()),
            health_score: self.health_score(damages),
            damages: damages.clone(),
            precautions: self.precautions(damages),
        }
    }

    pub fn health_score(&self, damages: &DamageObservation) -> u8 {
        let deduction = damages.detections().fold(0u32, |total, (label, count)| {
            total.saturating_add(self.penalties.penalty(label).saturating_mul(count))
        });

        // Clamped to [0, 100]: the baseline is the ceiling, saturation the floor.
        BASELINE_SCORE.saturating_sub(deduction) as u8
    }

    fn precautions(&self, damages: &DamageObservation) -> Vec<String> {
        if self.precaution_policy == PrecautionPolicy::PerCategory {
            let mut advice: Vec<String> = Vec::new();
            for (label, _) in damages.detections() {
                let guidance = DamageCategory::from_label(label).and_then(category_guidance);
                if let Some(text) = guidance {
                    if !advice.iter().any(|existing| existing == text) {
                        advice.push(text.to_string());
                    }
                }
            }
            if !advice.is_empty() {
                return advice;
            }
        }

        FIXED_PRECAUTIONS.iter().map(|p| p.to_string()).collect()
    }
}
