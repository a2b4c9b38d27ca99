//! `coauthor run` - build the co-authorship table

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use coauthor_core::SharedProgress;
use coauthor_openalex::YearRange;

use crate::config::Config;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Concept id filtering authors and works
    #[arg(long)]
    pub concept: Option<String>,

    /// Output CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Author listing pages to scan
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// Works pages to read per author
    #[arg(long)]
    pub work_pages: Option<u32>,

    /// Results per page (1-200)
    #[arg(long)]
    pub per_page: Option<u32>,

    /// First publication year counted
    #[arg(long)]
    pub first_year: Option<i32>,

    /// Last publication year counted
    #[arg(long)]
    pub last_year: Option<i32>,
}

/// Merge CLI overrides over the file configuration.
pub fn pipeline_config(args: RunArgs, config: &Config) -> Result<coauthor_openalex::Config> {
    let first = args.first_year.unwrap_or(config.years.first);
    let last = args.last_year.unwrap_or(config.years.last);
    let years = YearRange::new(first, last)
        .with_context(|| format!("Invalid year range: {first} > {last}"))?;

    let oa = &config.openalex;
    let pipeline = coauthor_openalex::Config {
        api_url: oa.api_url.clone(),
        concept: args.concept.unwrap_or_else(|| oa.concept.clone()),
        per_page: args.per_page.unwrap_or(oa.per_page),
        max_pages: args.pages.unwrap_or(oa.max_pages),
        max_work_pages: args.work_pages.unwrap_or(oa.max_work_pages),
        years,
        output_path: args.output.unwrap_or_else(|| config.output.path.clone()),
        http: coauthor_core::HttpConfig {
            request_timeout: Duration::from_secs(config.http.timeout),
            max_attempts: config.http.max_attempts,
        },
    };
    pipeline.validate()?;
    Ok(pipeline)
}

pub fn run(args: RunArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let pipeline = pipeline_config(args, config)?;
    let summary = coauthor_openalex::run(&pipeline, progress)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Co-authorship").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);
    for (label, value) in summary.rows() {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    progress.println(format!("\n{table}"));
    Ok(())
}
