// Damage-type labelling for the history list
use crate::domain::damage::{DamageCategory, DamageObservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageType {
    CriticalDamage,
    SurfaceDamage,
    MinorDamage,
    NoDamage,
}

impl DamageType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CriticalDamage => "Critical Damage",
            Self::SurfaceDamage => "Surface Damage",
            Self::MinorDamage => "Minor Damage",
            Self::NoDamage => "No Damage",
        }
    }
}

type Rule = (fn(&DamageObservation) -> bool, DamageType);

/// Evaluated top to bottom; the first matching rule wins.
const RULES: [Rule; 3] = [
    (has_structural_damage, DamageType::CriticalDamage),
    (has_surface_damage, DamageType::SurfaceDamage),
    (has_any_damage, DamageType::MinorDamage),
];

fn has_structural_damage(damages: &DamageObservation) -> bool {
    damages.contains(DamageCategory::MajorCrack) || damages.contains(DamageCategory::Spalling)
}

fn has_surface_damage(damages: &DamageObservation) -> bool {
    damages.contains(DamageCategory::MinorCrack) || damages.contains(DamageCategory::Peeling)
}

fn has_any_damage(damages: &DamageObservation) -> bool {
    !damages.is_empty()
}

pub fn classify(damages: &DamageObservation) -> DamageType {
    RULES
        .iter()
        .find(|(matches, _)| matches(damages))
        .map(|(_, damage_type)| *damage_type)
        .unwrap_or(DamageType::NoDamage)
}
