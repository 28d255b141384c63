//! Resilience CLI - batch AI resilience classification for occupation records

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input and timestamp yield byte-for-byte identical output
// - Logs go to stderr; stdout carries only report output

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use resilience_core::config::{self, ResolvedConfig};
use resilience_core::legacy::{legacy_label, legacy_score};
use resilience_core::pipeline::{self, BatchOptions};
use resilience_core::report::{self, build_report};
use resilience_core::{
    classify_input, explain, human_advantage_from_epoch, job_growth_category, AssessmentContext,
    Classification, ClassificationInput, EpochScores, ExposureLevel, HumanAdvantageCategory,
    JobGrowthCategory,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "resilience")]
#[command(about = "Classify occupations into AI resilience tiers")]
#[command(version = env!("RESILIENCE_VERSION"))]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess occupation records in a file or directory
    Assess {
        /// Path to an occupation JSON file or a directory of them
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Write assessments back into the record files
        #[arg(long)]
        write: bool,

        /// Show only top N rows, riskiest first (overrides config file)
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        top: Option<usize>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// RFC 3339 timestamp stamped on every record (default: now)
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Classify a single set of signals
    Classify {
        /// Task exposure tercile (low, medium, high)
        #[arg(long)]
        task_exposure: ExposureLevel,

        /// Automation potential (default: same as task exposure)
        #[arg(long)]
        automation_potential: Option<ExposureLevel>,

        /// Job growth category
        #[arg(long, conflicts_with = "percent_change", required_unless_present = "percent_change")]
        growth: Option<JobGrowthCategory>,

        /// Projected percent employment change
        #[arg(long, allow_negative_numbers = true)]
        percent_change: Option<f64>,

        /// Human advantage category
        #[arg(long, conflicts_with = "epoch", required_unless_present = "epoch")]
        human_advantage: Option<HumanAdvantageCategory>,

        /// EPOCH sub-scores as five comma-separated values (E,P,O,C,H)
        #[arg(long, value_delimiter = ',')]
        epoch: Option<Vec<u8>>,

        /// Show every rule evaluated before the one that fired
        #[arg(long)]
        explain: bool,
    },
    /// List the classification tiers and their display attributes
    Tiers,
    /// Validate or show a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without running an assessment
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Assess {
            path,
            format,
            write,
            top,
            config: config_path,
            timestamp,
        } => {
            let normalized_path = if path.is_relative() {
                std::env::current_dir()?.join(&path)
            } else {
                path
            };
            if !normalized_path.exists() {
                anyhow::bail!("Path does not exist: {}", normalized_path.display());
            }

            // Config is discovered next to the data
            let project_root = if normalized_path.is_dir() {
                normalized_path.clone()
            } else {
                normalized_path
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| normalized_path.clone())
            };
            let resolved_config = config::load_and_resolve(&project_root, config_path.as_deref())
                .context("failed to load configuration")?;
            if let Some(p) = &resolved_config.config_path {
                info!("using config: {}", p.display());
            }

            let effective_top = top.or(resolved_config.top_n);
            run_assess(
                &normalized_path,
                &resolved_config,
                format,
                write,
                effective_top,
                timestamp.unwrap_or_else(Utc::now),
            )?;
        }
        Commands::Classify {
            task_exposure,
            automation_potential,
            growth,
            percent_change,
            human_advantage,
            epoch,
            explain: show_trace,
        } => {
            let job_growth = match (growth, percent_change) {
                (Some(g), _) => g,
                (None, Some(pct)) => {
                    if pct.is_nan() {
                        anyhow::bail!("--percent-change must be a number");
                    }
                    job_growth_category(pct)
                }
                (None, None) => anyhow::bail!("one of --growth or --percent-change is required"),
            };
            let human = match (human_advantage, epoch) {
                (Some(h), _) => h,
                (None, Some(values)) => human_advantage_from_epoch(&parse_epoch(&values)?),
                (None, None) => {
                    anyhow::bail!("one of --human-advantage or --epoch is required")
                }
            };

            let input = ClassificationInput {
                task_exposure,
                automation_potential: automation_potential.unwrap_or(task_exposure),
                job_growth,
                human_advantage: human,
            };
            let outcome = classify_input(&input);

            if show_trace {
                for step in explain(&input) {
                    println!(
                        "{:>2}. {:<36} {}",
                        step.rule.position(),
                        step.rule.as_str(),
                        if step.matched { "MATCH" } else { "-" }
                    );
                }
                println!();
            }

            println!(
                "{} {} ({})",
                outcome.classification.emoji(),
                outcome.classification,
                outcome.rule
            );
            println!("{}", outcome.rationale);
            println!(
                "inputs: task_exposure={} job_growth={} human_advantage={}",
                input.task_exposure, input.job_growth, input.human_advantage
            );
        }
        Commands::Tiers => {
            println!(
                "{:<5} {:<22} {:<6} {:<10} {}",
                "RANK", "CLASSIFICATION", "COLOR", "LEGACY", "DESCRIPTION"
            );
            for tier in Classification::ALL {
                let legacy = format!("{}/{}", legacy_score(tier), legacy_label(tier));
                println!(
                    "{:<5} {:<22} {:<6} {:<10} {} {}",
                    tier.rank(),
                    tier.as_str(),
                    tier.color(),
                    legacy,
                    tier.emoji(),
                    tier.description()
                );
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                match config::load_and_resolve(&project_root, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref())
                    .context("failed to load configuration")?;
                print_config(&resolved);
            }
        },
    }

    Ok(())
}

/// Route tracing output to stderr, honoring RUST_LOG when set
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resilience={0},resilience_core={0}", level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_epoch(values: &[u8]) -> anyhow::Result<EpochScores> {
    match values {
        [e, p, o, c, h] => EpochScores::new(*e, *p, *o, *c, *h).context("invalid --epoch scores"),
        _ => anyhow::bail!(
            "--epoch expects exactly 5 comma-separated scores (got {})",
            values.len()
        ),
    }
}

fn run_assess(
    path: &std::path::Path,
    resolved_config: &ResolvedConfig,
    format: OutputFormat,
    write: bool,
    top: Option<usize>,
    timestamp: DateTime<Utc>,
) -> anyhow::Result<()> {
    let files = pipeline::collect_assessable_files(path, resolved_config)?;
    info!("assessing {} occupation file(s)", files.len());

    let mut context = AssessmentContext::new(timestamp);
    context.data_source = resolved_config.data_source.clone();
    context.methodology_version = resolved_config.methodology_version.clone();

    let options = BatchOptions {
        config: resolved_config,
        context,
        write,
    };

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} occupations")?
            .progress_chars("=> "),
    );
    let result = pipeline::run_batch_with_progress(&files, &options, || progress.inc(1));
    progress.finish_and_clear();

    if !result.skipped.is_empty() {
        eprintln!("Skipped {} file(s) due to errors", result.skipped.len());
    }
    if write {
        info!(
            "wrote {} assessment(s) under key {:?}",
            result.written, resolved_config.output_key
        );
    }

    let batch_report = build_report(&result, top);
    match format {
        OutputFormat::Text => print!("{}", report::render_text(&batch_report)),
        OutputFormat::Json => println!("{}", report::render_json(&batch_report)),
    }

    Ok(())
}

fn print_config(resolved: &ResolvedConfig) {
    println!("Configuration:");
    if let Some(ref p) = resolved.config_path {
        println!("  Source: {}", p.display());
    } else {
        println!("  Source: defaults (no config file found)");
    }
    println!();
    println!("Assessment:");
    println!("  methodology_version: {}", resolved.methodology_version);
    println!("  data_source: {}", resolved.data_source);
    println!("  output_key: {}", resolved.output_key);
    println!();
    println!("Filters:");
    println!(
        "  top: {}",
        resolved
            .top_n
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!(
        "  include: {}",
        if resolved.include.is_some() {
            "custom patterns"
        } else {
            "all occupations"
        }
    );
    println!(
        "  exclude: {}",
        if resolved.exclude.is_some() {
            "custom patterns"
        } else {
            "none"
        }
    );
}
