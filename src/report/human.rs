//! Human-readable refiner report.

use std::fmt::{self, Write};

use crate::report::mask::mask_secret;
use crate::report::TechnicalContext;
use crate::stats::{
    CombinedStatsResult, ErrorRecord, ExecutionStats, IngestionStats, SourceStatus, StatsSource,
    Tally,
};

/// Number of `recent_errors` entries shown.
pub const RECENT_ERRORS_SHOWN: usize = 3;

const LABEL_WIDTH: usize = 24;

/// Render the report sections in order: execution, ingestion, queries,
/// error analysis and (verbose only) technical details.
pub fn render_human(
    result: &CombinedStatsResult,
    verbose: bool,
    context: Option<&TechnicalContext>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    let title = format!("Refiner #{} Statistics", result.refiner_id);
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(title.len()))?;

    write_execution(&mut out, result)?;
    write_ingestion(&mut out, result)?;
    if let Some(stats) = &result.ingestion_stats {
        if stats.total_queries_executed > 0 {
            write_queries(&mut out, stats)?;
        }
    }
    write_error_analysis(
        &mut out,
        result.execution_stats.as_ref(),
        result.ingestion_stats.as_ref(),
    )?;
    if verbose {
        write_technical_details(&mut out, result, context)?;
    }

    Ok(out)
}

fn section(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

fn field(out: &mut String, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(out, "  {:<width$} {}", format!("{}:", label), value, width = LABEL_WIDTH)
}

fn unavailable(out: &mut String, result: &CombinedStatsResult, source: StatsSource) -> fmt::Result {
    match result.status_of(source) {
        SourceStatus::Failed(err) => writeln!(out, "  Unavailable: {}", err),
        _ => writeln!(
            out,
            "  No {} data ({} not configured)",
            source,
            source.config_key()
        ),
    }
}

fn write_execution(out: &mut String, result: &CombinedStatsResult) -> fmt::Result {
    section(out, "Execution Jobs")?;
    let Some(stats) = &result.execution_stats else {
        return unavailable(out, result, StatsSource::Execution);
    };

    field(out, "Total jobs", format_count(stats.total_jobs))?;
    field(
        out,
        "Successful",
        with_percent(stats.successful_jobs, stats.total_jobs),
    )?;
    field(out, "Failed", with_percent(stats.failed_jobs, stats.total_jobs))?;
    field(out, "Processing", format_count(stats.processing_jobs))?;
    field(out, "Submitted", format_count(stats.submitted_jobs))?;
    field(out, "Success rate", format!("{:.1}%", stats.success_rate * 100.0))?;
    field(
        out,
        "Avg processing time",
        format_duration(stats.average_processing_time_seconds),
    )?;
    field(out, "Jobs per hour", format!("{:.2}", stats.jobs_per_hour))?;
    write_period(
        out,
        stats.first_job_at.as_deref(),
        stats.last_job_at.as_deref(),
        stats.processing_period_days,
        ("First job", "Last job", "Active period"),
    )
}

fn write_ingestion(out: &mut String, result: &CombinedStatsResult) -> fmt::Result {
    section(out, "Data Ingestion")?;
    let Some(stats) = &result.ingestion_stats else {
        return unavailable(out, result, StatsSource::Ingestion);
    };

    field(out, "File contributions", format_count(stats.total_file_contributions))?;
    field(out, "Data rows", format_count(stats.total_data_rows))?;
    field(out, "Unique contributors", format_count(stats.unique_contributors))?;
    field(
        out,
        "Ingestion rate",
        format!("{:.2} files/hour", stats.average_ingestion_rate_per_hour),
    )?;
    write_period(
        out,
        stats.first_ingestion_at.as_deref(),
        stats.last_ingestion_at.as_deref(),
        stats.ingestion_period_days,
        ("First ingestion", "Last ingestion", "Ingestion period"),
    )?;

    if !stats.table_row_counts.is_empty() {
        writeln!(out, "  Rows by table:")?;
        for (table, rows) in stats.table_row_counts.iter() {
            writeln!(out, "    {:<width$} {}", table, format_count(rows), width = LABEL_WIDTH - 2)?;
        }
    }
    Ok(())
}

fn write_period(
    out: &mut String,
    first: Option<&str>,
    last: Option<&str>,
    days: Option<f64>,
    labels: (&str, &str, &str),
) -> fmt::Result {
    if let Some(first) = first {
        field(out, labels.0, first)?;
    }
    if let Some(last) = last {
        field(out, labels.1, last)?;
    }
    if let Some(days) = days {
        field(out, labels.2, format!("{:.1} days", days))?;
    }
    Ok(())
}

fn write_queries(out: &mut String, stats: &IngestionStats) -> fmt::Result {
    section(out, "Query Execution")?;
    field(out, "Total queries", format_count(stats.total_queries_executed))?;
    field(
        out,
        "Successful",
        with_percent(stats.successful_queries, stats.total_queries_executed),
    )?;
    field(
        out,
        "Failed",
        with_percent(stats.failed_queries, stats.total_queries_executed),
    )
}

fn write_error_analysis(
    out: &mut String,
    execution: Option<&ExecutionStats>,
    ingestion: Option<&IngestionStats>,
) -> fmt::Result {
    section(out, "Error Analysis")?;

    let job_errors = execution.map(|s| &s.error_types).filter(|t| !t.is_empty());
    let query_errors = ingestion.map(|s| &s.query_error_types).filter(|t| !t.is_empty());
    let recent = execution.map(|s| s.recent_errors.as_slice()).unwrap_or_default();

    if job_errors.is_none() && query_errors.is_none() && recent.is_empty() {
        return writeln!(out, "  No errors recorded");
    }

    if let Some(tally) = job_errors {
        write_tally(out, "Job errors by type", tally)?;
    }
    if let Some(tally) = query_errors {
        write_tally(out, "Query errors by type", tally)?;
    }
    if !recent.is_empty() {
        write_recent_errors(out, recent)?;
    }
    Ok(())
}

fn write_tally(out: &mut String, heading: &str, tally: &Tally) -> fmt::Result {
    writeln!(out, "  {}:", heading)?;
    for (name, count) in tally.sorted_by_count() {
        writeln!(out, "    {:<width$} {}", name, format_count(count), width = LABEL_WIDTH - 2)?;
    }
    Ok(())
}

fn write_recent_errors(out: &mut String, recent: &[ErrorRecord]) -> fmt::Result {
    writeln!(out, "  Recent job errors:")?;
    for record in recent.iter().take(RECENT_ERRORS_SHOWN) {
        match &record.job_id {
            Some(job_id) => writeln!(
                out,
                "    [{}] {} (job {})",
                record.timestamp, record.error, job_id
            )?,
            None => writeln!(out, "    [{}] {}", record.timestamp, record.error)?,
        }
    }
    if recent.len() > RECENT_ERRORS_SHOWN {
        writeln!(out, "    ... and {} more", recent.len() - RECENT_ERRORS_SHOWN)?;
    }
    Ok(())
}

fn write_technical_details(
    out: &mut String,
    result: &CombinedStatsResult,
    context: Option<&TechnicalContext>,
) -> fmt::Result {
    section(out, "Technical Details")?;

    let last_block = result
        .ingestion_stats
        .as_ref()
        .and_then(|s| s.last_processed_block)
        .map(|b| b.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    field(out, "Last processed block", last_block)?;

    let endpoints = context.map(|c| (c.ingestion_endpoint.as_deref(), c.execution_endpoint.as_deref()));
    field(
        out,
        "Ingestion service",
        connectivity(result.status_of(StatsSource::Ingestion), endpoints.and_then(|e| e.0)),
    )?;
    field(
        out,
        "Execution service",
        connectivity(result.status_of(StatsSource::Execution), endpoints.and_then(|e| e.1)),
    )?;

    if let Some(context) = context {
        field(out, "Signer address", &context.signer_address)?;
        field(out, "Private key", mask_secret(&context.private_key))?;
    }
    Ok(())
}

fn connectivity(status: SourceStatus<'_>, endpoint: Option<&str>) -> String {
    let state = match status {
        SourceStatus::Connected => "connected".to_string(),
        SourceStatus::Failed(err) => format!("failed ({})", err),
        SourceStatus::NotConfigured => return "not configured".to_string(),
    };
    match endpoint {
        Some(url) => format!("{} [{}]", state, url),
        None => state,
    }
}

/// `1234567` → `1,234,567`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn with_percent(part: u64, total: u64) -> String {
    if total == 0 {
        return format_count(part);
    }
    format!(
        "{} ({:.1}%)",
        format_count(part),
        part as f64 / total as f64 * 100.0
    )
}

/// Seconds rendered as `12.3s`, `4m 5s` or `2h 10m`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "n/a".to_string();
    }
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }
    let total = seconds.round() as u64;
    if total < 3600 {
        format!("{}m {}s", total / 60, total % 60)
    } else {
        format!("{}h {}m", total / 3600, (total % 3600) / 60)
    }
}
