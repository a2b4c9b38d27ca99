//! coauthor - OpenAlex co-authorship table builder
//!
//! Enumerates the authors of a concept, tallies their co-authors per year,
//! joins author profiles, and writes the result as one CSV file.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "coauthor")]
#[command(about = "Per-year co-authorship tables from OpenAlex")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./coauthor.toml or ~/.config/coauthor/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Attempts per HTTP request, including the first
    #[arg(long, global = true)]
    max_retries: Option<u32>,

    /// Whole-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, aggregate and export the co-authorship table
    Run(cmd::run::RunArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = Arc::new(coauthor_core::ProgressContext::new());

    // Logging:
    //   TTY:     info through the progress bars, debug with --debug
    //   non-TTY: plain lines, logs are the only progress indicator
    let multi = progress.is_tty().then(|| progress.multi());
    coauthor_core::init_logging(false, cli.debug, multi)?;

    let mut config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    // CLI overrides for HTTP settings
    if let Some(n) = cli.max_retries {
        config.http.max_attempts = n;
    }
    if let Some(secs) = cli.timeout {
        config.http.timeout = secs;
    }

    match cli.command {
        Command::Run(args) => cmd::run::run(args, &config, &progress),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec!["API URL", &config.openalex.api_url]);
            table.add_row(vec!["Concept", &config.openalex.concept]);
            table.add_row(vec![
                "Author pages",
                &format!(
                    "{} x {} per page",
                    config.openalex.max_pages, config.openalex.per_page
                ),
            ]);
            table.add_row(vec![
                "Works pages per author",
                &config.openalex.max_work_pages.to_string(),
            ]);
            table.add_row(vec![
                "Years",
                &format!("{}-{}", config.years.first, config.years.last),
            ]);
            table.add_row(vec!["Output", &config.output.path.display().to_string()]);
            table.add_row(vec!["Timeout", &format!("{}s", config.http.timeout)]);
            table.add_row(vec![
                "Max attempts",
                &config.http.max_attempts.to_string(),
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
