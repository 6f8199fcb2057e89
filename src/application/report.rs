// Report shaping - Lays out an inspection result for the downloadable report
use crate::domain::damage::display_label;
use crate::domain::inspection::{InspectionResult, Severity};
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const REPORT_TITLE: &str = "Building Inspection Report";
pub const NO_DAMAGE_TEXT: &str = "No damage detected";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportMeta {
    #[serde(default, rename = "inspectionId", alias = "inspection_id")]
    pub inspection_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeBand {
    Green,
    Amber,
    Red,
}

impl GaugeBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => Self::Green,
            60..=79 => Self::Amber,
            _ => Self::Red,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Green => "#28a745",
            Self::Amber => "#ffc107",
            Self::Red => "#dc3545",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthGauge {
    pub score: u8,
    pub sweep_degrees: f64,
    pub band: GaugeBand,
}

impl HealthGauge {
    pub fn new(score: u8) -> Self {
        Self {
            score,
            sweep_degrees: f64::from(score) * 360.0 / 100.0,
            band: GaugeBand::for_score(score),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeverityBadge {
    pub severity: Severity,
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DamageLine {
    pub label: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberedPrecaution {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: &'static str,
    pub generated_at: DateTime<Utc>,
    pub inspection_id: Option<String>,
    pub source_filename: Option<String>,
    pub badge: SeverityBadge,
    pub gauge: HealthGauge,
    pub damages: Vec<DamageLine>,
    pub precautions: Vec<NumberedPrecaution>,
    pub file_name: String,
}

impl ReportDocument {
    pub fn build(result: &InspectionResult, meta: &ReportMeta, generated_at: DateTime<Utc>) -> Self {
        let damages = result
            .damages
            .detections()
            .map(|(label, count)| DamageLine {
                label: display_label(label),
                count,
            })
            .collect();

        let precautions = result
            .precautions
            .iter()
            .enumerate()
            .map(|(index, text)| NumberedPrecaution {
                number: index + 1,
                text: text.clone(),
            })
            .collect();

        let inspection_id = meta.inspection_id.clone().filter(|id| !id.is_empty());
        let file_name = match &inspection_id {
            Some(id) => format!("inspection_report_{}.html", sanitize_file_stem(id)),
            None => format!(
                "inspection_report_{}.html",
                generated_at.format("%Y%m%d_%H%M%S")
            ),
        };

        Self {
            title: REPORT_TITLE,
            generated_at,
            inspection_id,
            source_filename: meta.filename.clone(),
            badge: SeverityBadge {
                severity: result.severity,
                label: result.severity.label(),
                description: result.severity.description(),
            },
            gauge: HealthGauge::new(result.health_score),
            damages,
            precautions,
            file_name,
        }
    }

    pub fn has_damages(&self) -> bool {
        !self.damages.is_empty()
    }
}

fn sanitize_file_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
