use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use outline_core::{PanelMode, SessionState};
use outline_engine::{Observation, SessionDriver, EMPTY_PLACEHOLDER};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub index: usize,
    pub id: String,
    pub summary: String,
    pub full_text: String,
    pub detected_at: String,
    pub time_label: String,
}

/// Final state of a run, as printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineReport {
    pub generated_at: String,
    pub session: &'static str,
    pub panel: &'static str,
    pub observing: Option<String>,
    pub passes: u64,
    pub elapsed_ms: u64,
    pub entries: Vec<ReportEntry>,
}

pub fn build_report(driver: &SessionDriver, generated_at: DateTime<Utc>) -> OutlineReport {
    let view = driver.view();
    let session = match view.session {
        SessionState::Inactive => "inactive",
        SessionState::Active => "active",
    };
    let panel = match view.panel_mode {
        PanelMode::Expanded => "expanded",
        PanelMode::Minimized => "minimized",
    };
    let observing = driver.observation().map(|observation| match observation {
        Observation::Container { selector, .. } => selector.clone(),
        Observation::Degraded { .. } => "body (degraded)".to_string(),
    });
    let entries = driver
        .outline()
        .entries()
        .iter()
        .map(|entry| ReportEntry {
            index: entry.index,
            id: entry.id.clone(),
            summary: entry.summary.clone(),
            full_text: entry.full_text.clone(),
            detected_at: DateTime::<Utc>::from(entry.detected_at).to_rfc3339(),
            time_label: entry.time_label.clone(),
        })
        .collect();

    OutlineReport {
        generated_at: generated_at.to_rfc3339(),
        session,
        panel,
        observing,
        passes: driver.passes(),
        elapsed_ms: u64::try_from(driver.now().as_millis()).unwrap_or(u64::MAX),
        entries,
    }
}

pub fn render(report: &OutlineReport, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report),
    }
}

fn render_text(report: &OutlineReport) -> String {
    let mut out = String::new();
    let observing = report.observing.as_deref().unwrap_or("nothing");
    let _ = writeln!(
        out,
        "Outline: {} entries | session {} | panel {} | {} passes | observing {}",
        report.entries.len(),
        report.session,
        report.panel,
        report.passes,
        observing
    );
    if report.entries.is_empty() {
        let _ = writeln!(out, "  {}", EMPTY_PLACEHOLDER);
    }
    for entry in &report.entries {
        let _ = writeln!(
            out,
            "{}. {} ({}) — {}",
            entry.index, entry.summary, entry.time_label, entry.full_text
        );
    }
    out
}
