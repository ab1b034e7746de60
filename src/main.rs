use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::{debug, warn};
use std::path::PathBuf;

use covgate::config::{ActionInputs, FileConfig, Overrides, Settings};
use covgate::coverage::evaluate;
use covgate::logging::{init_logging, parse_level};
use covgate::notifications::send_coverage_comment;
use covgate::{
    format_success, run_gate, summarize, CoverageSummary, ExcludeSet, GateOutcome, Threshold,
};

#[derive(Parser)]
#[command(name = "covgate")]
#[command(about = "Fail CI when LCOV line coverage drops below a minimum")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: covgate.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Diagnostic log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check coverage against min_coverage
    Check {
        #[command(flatten)]
        report: ReportArgs,

        /// Minimum overall line coverage, 0-100 (default: 100)
        #[arg(long)]
        min_coverage: Option<f64>,

        /// Project label used in the pull request comment
        #[arg(long)]
        project_name: Option<String>,

        /// Token used to post the pull request comment
        #[arg(long)]
        github_token: Option<String>,

        /// Post the coverage summary as a pull request comment on success
        #[arg(long)]
        report_coverage_comment: bool,
    },

    /// Print per-file and overall coverage without enforcing a minimum
    Summary {
        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// LCOV report to read (default: ./coverage/lcov.info)
    #[arg(short, long)]
    path: Option<String>,

    /// Glob of files to leave out; repeat or separate with commas
    #[arg(short, long)]
    exclude: Vec<String>,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Same stream as the threshold failure text, so CI logs show both
            println!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logging(parse_level(&cli.log_level)?, !cli.no_color)?;

    let file = FileConfig::discover(cli.config.as_deref())?;
    let inputs = ActionInputs::from_env();
    debug!("Action inputs: {:?}", redact(&inputs));

    match cli.command {
        Commands::Check {
            report,
            min_coverage,
            project_name,
            github_token,
            report_coverage_comment,
        } => {
            let overrides = Overrides {
                path: report.path,
                min_coverage,
                exclude: report.exclude,
                project_name,
                github_token,
                report_coverage_comment,
            };
            let settings = Settings::resolve(&overrides, &inputs, &file)?;
            cmd_check(&settings)
        }
        Commands::Summary { report } => {
            let overrides = Overrides {
                path: report.path,
                exclude: report.exclude,
                ..Default::default()
            };
            let settings = Settings::resolve(&overrides, &inputs, &file)?;
            cmd_summary(&settings)
        }
    }
}

fn cmd_check(settings: &Settings) -> Result<i32> {
    let config = settings.gate_config()?;
    let report = settings.read_report()?;

    let outcome = run_gate(&report, &config)?;
    print_verdict(outcome.summary(), config.threshold);

    match &outcome {
        GateOutcome::Fail { message, .. } => {
            println!("\n{}", message);
        }
        GateOutcome::Pass { summary } => {
            println!("\n{}", format_success(summary));

            if settings.report_coverage_comment {
                post_comment(summary, &config.project_name, settings.github_token.as_deref());
            }
        }
    }

    Ok(outcome.exit_code())
}

/// Print a one-line colored verdict
fn print_verdict(summary: &CoverageSummary, threshold: Threshold) {
    let actual = summary.overall.percentage;
    let required = threshold.value();
    let delta = actual - required;
    let status = if evaluate(summary, threshold).passed() {
        "✓".green()
    } else {
        "✗".red()
    };
    let delta_str = if delta >= 0.0 {
        format!("+{:.1}%", delta).green()
    } else {
        format!("{:.1}%", delta).red()
    };

    println!(
        "  {} Line coverage: {:.1}% (threshold: {}%, {})",
        status, actual, required, delta_str
    );
}

fn cmd_summary(settings: &Settings) -> Result<i32> {
    let exclude = ExcludeSet::new(&settings.exclude)?;
    let report = settings.read_report()?;

    let summary = summarize(&report, &exclude)?;

    println!("\n{} {}\n", "📊".cyan(), settings.report_path.bold());
    print!("{}", format_success(&summary));

    Ok(0)
}

/// A failed comment never changes the gate result
#[tokio::main]
async fn post_comment(summary: &CoverageSummary, project_name: &str, token: Option<&str>) {
    if let Err(e) = send_coverage_comment(summary, project_name, token).await {
        warn!("Could not post coverage comment: {:#}", e);
    }
}

fn redact(inputs: &ActionInputs) -> ActionInputs {
    ActionInputs {
        github_token: inputs.github_token.as_ref().map(|_| "***".to_string()),
        ..inputs.clone()
    }
}
