use crate::infra::{load_service, DirectoryService};
use chrono::Utc;
use clap::Args;
use school_ratings::config::AppConfig;
use school_ratings::error::AppError;
use school_ratings::ratings::Urn;
use school_ratings::refresh::RefreshReport;
use school_ratings::service::{AreaRanking, AreaSummary};
use school_ratings::telemetry::{self, LogSink};
use school_ratings::{Rating, SchoolRecord};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DataArgs {
    /// Directory holding the CSV exports (defaults to SCHOOL_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RateArgs {
    /// Unique Reference Number of the school
    #[arg(long)]
    pub(crate) urn: String,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug)]
pub(crate) struct AreaArgs {
    /// Local authority or town name
    #[arg(long)]
    pub(crate) name: String,
    /// Only list the first N schools of the ranking
    #[arg(long)]
    pub(crate) top: Option<usize>,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

// Logs go to stderr so the printed report stays clean.
fn prepare(data: DataArgs) -> Result<Arc<DirectoryService>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;
    load_service(&config, data.data_dir)
}

pub(crate) fn run_refresh(args: DataArgs) -> Result<(), AppError> {
    let service = prepare(args)?;
    let report = service.refresh(Utc::now())?;
    print_lines(refresh_lines(&report));
    Ok(())
}

pub(crate) fn run_rate(args: RateArgs) -> Result<(), AppError> {
    let RateArgs { urn, data } = args;
    let service = prepare(data)?;
    let record = service.school(&Urn::new(urn))?;
    let rating = service.compute(&record.metrics);
    print_lines(rating_lines(&record, &rating));
    Ok(())
}

pub(crate) fn run_area_report(args: AreaArgs) -> Result<(), AppError> {
    let AreaArgs { name, top, data } = args;
    let service = prepare(data)?;

    // Stored ratings live in memory, so a fresh process has none until it refreshes.
    service.refresh(Utc::now())?;

    let ranking = service.area_rankings(&name, top)?;
    let summary = service.area_summary(&name)?;
    print_lines(area_lines(&ranking, &summary));
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}

fn rating_text(overall: Option<f64>) -> String {
    overall
        .map(|value| format!("{value:.1}/10"))
        .unwrap_or_else(|| "not rated".to_string())
}

pub(crate) fn refresh_lines(report: &RefreshReport) -> Vec<String> {
    let mut lines = vec![
        format!("Rating refresh at {}", report.started_at.to_rfc3339()),
        format!(
            "- {} due | {} rated | {} insufficient data | {} skipped | {} failed",
            report.considered,
            report.rated,
            report.insufficient_data,
            report.skipped,
            report.failures.len()
        ),
    ];
    lines.extend(
        report
            .failures
            .iter()
            .map(|failure| format!("  ! {}: {}", failure.urn, failure.reason)),
    );
    lines
}

pub(crate) fn rating_lines(record: &SchoolRecord, rating: &Rating) -> Vec<String> {
    let profile = &record.profile;
    let mut lines = vec![
        format!("{} (URN {})", profile.name, profile.urn),
        format!("Jurisdiction: {}", profile.jurisdiction.label()),
        format!(
            "Overall: {} ({}) | data completeness {}%",
            rating_text(rating.overall),
            rating.label(),
            rating.completeness
        ),
    ];

    if rating.components.is_empty() {
        lines.push("No rating components: every metric is missing.".to_string());
    }
    for component in &rating.components {
        lines.push(format!(
            "- {}: {:.1} ({}) weight {}%",
            component.name.label(),
            component.score,
            component.label,
            component.weight
        ));
    }
    lines
}

pub(crate) fn area_lines(ranking: &AreaRanking, summary: &AreaSummary) -> Vec<String> {
    let geo = &summary.summary;
    let mut lines = vec![
        format!("Area: {} ({} schools)", ranking.area, ranking.total_schools),
        format!(
            "Phases: {} primary | {} secondary | {} sixth form | {} special",
            geo.phase_counts.primary,
            geo.phase_counts.secondary,
            geo.phase_counts.sixth_form,
            geo.phase_counts.special
        ),
        format!(
            "Ofsted: {} outstanding | {} good | {} requires improvement | {} inadequate | {} not inspected",
            geo.ofsted_distribution.outstanding,
            geo.ofsted_distribution.good,
            geo.ofsted_distribution.requires_improvement,
            geo.ofsted_distribution.inadequate,
            geo.ofsted_distribution.not_inspected
        ),
        format!(
            "Mean overall rating: {} across {} rated schools",
            rating_text(geo.overall_rating.mean),
            geo.rated_schools()
        ),
        String::new(),
        "Ranking".to_string(),
    ];

    for entry in &ranking.schools {
        lines.push(format!(
            "{:>3}. {} [{}] {}",
            entry.position,
            entry.school.name,
            entry.tier_label,
            rating_text(entry.school.overall_rating)
        ));
    }
    lines
}
