use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use earnings_analysis::{
    config::{AppConfig, load_config_path},
    pipeline::{TickerAnalysis, TickerRequest, analyze_ticker},
    providers::{bars_request_options, build_bars_provider, build_earnings_provider},
    render, report,
};
use shared_utils::logging::init_tracing;

#[derive(Parser)]
#[command(version, about = "Post-earnings price-movement analysis")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Fetch bars and earnings and report the return extremum around each announcement.
    Analyze {
        /// Comma-separated tickers, analysed one after another.
        #[arg(long, value_delimiter = ',', required = true)]
        symbols: Vec<String>,
        /// First announcement date (YYYY-MM-DD).
        #[arg(long)]
        from: NaiveDate,
        /// Last announcement date (YYYY-MM-DD).
        #[arg(long)]
        to: NaiveDate,
        /// TOML configuration file; defaults apply when omitted.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Calendar days before each announcement, overriding the config.
        #[arg(long)]
        days_before: Option<u32>,
        /// Calendar days after each announcement, overriding the config.
        #[arg(long)]
        days_after: Option<u32>,
        /// Write SVG charts into this directory.
        #[arg(long, value_name = "DIR")]
        chart_dir: Option<PathBuf>,
        /// Output format for the result tables.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn write_charts(dir: &Path, analyses: &[TickerAnalysis]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create chart dir {}", dir.display()))?;

    for a in analyses {
        let path = dir.join(format!("{}_performance.svg", a.symbol));
        let svg = render::performance_report_svg(&a.symbol, &a.combined, &a.run.results);
        std::fs::write(&path, svg).with_context(|| format!("write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote chart");
    }

    let runs: Vec<(String, Vec<_>)> = analyses
        .iter()
        .map(|a| (a.symbol.clone(), a.run.results.clone()))
        .collect();
    let path = dir.join("days_to_max.svg");
    std::fs::write(&path, render::days_to_max_histogram_svg(&runs))
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote chart");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("info")?;
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Analyze {
            symbols,
            from,
            to,
            config,
            days_before,
            days_after,
            chart_dir,
            format,
        } => {
            // 1) Config file (or defaults), then CLI overrides
            let mut cfg = match &config {
                Some(path) => load_config_path(path)?,
                None => AppConfig::default(),
            };
            if let Some(n) = days_before {
                cfg.analysis.days_before = n;
            }
            if let Some(n) = days_after {
                cfg.analysis.days_after = n;
            }
            let settings = cfg.analysis_settings()?;

            // 2) Providers, credentials from the environment
            let bars = build_bars_provider(&cfg.bars)?;
            let earnings = build_earnings_provider(&cfg.earnings)?;
            let provider_params = bars_request_options(&cfg.bars);

            // 3) One ticker at a time
            let mut analyses = Vec::with_capacity(symbols.len());
            let symbols = symbols
                .iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty());
            for symbol in symbols {
                let req = TickerRequest {
                    symbol,
                    from,
                    to,
                    provider_params: provider_params.clone(),
                };
                let analysis =
                    analyze_ticker(bars.as_ref(), earnings.as_ref(), &req, &settings).await?;
                analyses.push(analysis);
            }

            // 4) Output
            match format {
                Format::Text => {
                    for a in &analyses {
                        println!("{}", report::format_text(a));
                    }
                }
                Format::Json => println!("{}", report::to_json(&analyses)?),
            }
            if let Some(dir) = chart_dir {
                write_charts(&dir, &analyses)?;
            }
        }
    }

    Ok(())
}
