// Report rendering - Self-contained HTML with an SVG health gauge
use crate::application::report::{NO_DAMAGE_TEXT, ReportDocument};
use std::f64::consts::PI;
use std::fmt::Write;
use thiserror::Error;

const GAUGE_RADIUS: f64 = 70.0;

pub const REPORT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("health score {0} is outside 0-100")]
    InvalidScore(u8),
    #[error("failed to lay out report: {0}")]
    Layout(#[from] std::fmt::Error),
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Renders the whole document or nothing.
pub fn render_report(doc: &ReportDocument) -> Result<RenderedReport, ReportError> {
    if doc.gauge.score > 100 {
        return Err(ReportError::InvalidScore(doc.gauge.score));
    }

    let mut html = String::new();
    write_document(&mut html, doc)?;

    Ok(RenderedReport {
        file_name: doc.file_name.clone(),
        content_type: REPORT_CONTENT_TYPE,
        bytes: html.into_bytes(),
    })
}

fn write_document(out: &mut String, doc: &ReportDocument) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head><meta charset=\"utf-8\"><title>{}</title>", escape(doc.title))?;
    writeln!(
        out,
        "<style>body{{font-family:sans-serif;margin:2rem;color:#212529}}\
         .badge{{display:inline-block;padding:.3rem .8rem;border-radius:1rem;color:#fff}}\
         .good{{background:#28a745}}.moderate{{background:#ffc107;color:#212529}}\
         .critical{{background:#dc3545}}</style></head>"
    )?;
    writeln!(out, "<body>")?;

    // Header
    writeln!(out, "<h1>{}</h1>", escape(doc.title))?;
    writeln!(
        out,
        "<p>Generated {}</p>",
        doc.generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    if let Some(id) = &doc.inspection_id {
        writeln!(out, "<p>Inspection ID: {}</p>", escape(id))?;
    }
    if let Some(filename) = &doc.source_filename {
        writeln!(out, "<p>Image: {}</p>", escape(filename))?;
    }

    // Severity badge
    writeln!(out, "<h2>Severity Assessment</h2>")?;
    writeln!(
        out,
        "<span class=\"badge {}\">{}</span>",
        doc.badge.label.to_ascii_lowercase(),
        escape(doc.badge.label)
    )?;
    writeln!(out, "<p>{}</p>", escape(doc.badge.description))?;

    // Gauge
    writeln!(out, "<h2>Health Score</h2>")?;
    write_gauge(out, doc)?;

    // Damages
    writeln!(out, "<h2>Detected Damages</h2>")?;
    if doc.has_damages() {
        writeln!(out, "<ul>")?;
        for line in &doc.damages {
            writeln!(out, "<li>{}: {} detected</li>", escape(&line.label), line.count)?;
        }
        writeln!(out, "</ul>")?;
    } else {
        writeln!(out, "<p>{}</p>", NO_DAMAGE_TEXT)?;
    }

    // Precautions
    writeln!(out, "<h2>Recommended Actions</h2>")?;
    writeln!(out, "<ol>")?;
    for precaution in &doc.precautions {
        writeln!(
            out,
            "<li value=\"{}\">{}</li>",
            precaution.number,
            escape(&precaution.text)
        )?;
    }
    writeln!(out, "</ol>")?;

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_gauge(out: &mut String, doc: &ReportDocument) -> std::fmt::Result {
    let circumference = 2.0 * PI * GAUGE_RADIUS;
    let offset = circumference - doc.gauge.sweep_degrees / 360.0 * circumference;

    writeln!(out, "<svg width=\"160\" height=\"160\" viewBox=\"0 0 160 160\">")?;
    writeln!(
        out,
        "<circle cx=\"80\" cy=\"80\" r=\"{GAUGE_RADIUS}\" fill=\"none\" stroke=\"#e9ecef\" stroke-width=\"10\"/>"
    )?;
    writeln!(
        out,
        "<circle cx=\"80\" cy=\"80\" r=\"{GAUGE_RADIUS}\" fill=\"none\" stroke=\"{}\" stroke-width=\"10\" \
         stroke-linecap=\"round\" stroke-dasharray=\"{circumference:.2}\" stroke-dashoffset=\"{offset:.2}\" \
         transform=\"rotate(-90 80 80)\"/>",
        doc.gauge.band.color()
    )?;
    writeln!(
        out,
        "<text x=\"80\" y=\"88\" text-anchor=\"middle\" font-size=\"28\">{}</text>",
        doc.gauge.score
    )?;
    writeln!(out, "</svg>")
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
