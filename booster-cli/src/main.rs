//! Booster CLI Binary
//!
//! ## Usage
//!
//! ```bash
//! # Dashboard metrics for one student
//! booster metrics --scores scores.json --subjects subjects.json --student 22AI101
//!
//! # Performance analysis (GEMINI_API_KEY from the environment or .env);
//! # cached for 24h under $BOOSTER_CACHE_DIR or the platform cache directory
//! booster --config booster.json analyze --scores scores.json --student 22AI101 --name "Asha Patil"
//!
//! # CSV transcript
//! booster transcript --scores scores.json --student 22AI101
//! ```

use std::path::PathBuf;

use booster_cli::analyze::{analyze_student, provider_for};
use booster_cli::{ledger, settings};
use booster_core::metrics::{subject_averages, weakest_subject};
use booster_core::transcript::{transcript_file_name, write_transcript};
use booster_core::{compute_metrics, AnalysisSource, BoosterConfig, ServedAnalysis};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "booster")]
#[command(about = "Academic performance metrics and cached analyses")]
#[command(version)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show dashboard metrics for a student
    Metrics(MetricsArgs),
    /// Obtain a performance analysis for a student
    Analyze(AnalyzeArgs),
    /// Export a student's records as a CSV transcript
    Transcript(TranscriptArgs),
}

#[derive(Args, Debug)]
struct MetricsArgs {
    /// Score ledger (JSON array of score entries)
    #[arg(long)]
    scores: PathBuf,
    /// Subject catalog (JSON array of subjects)
    #[arg(long)]
    subjects: PathBuf,
    /// Student roll number
    #[arg(long)]
    student: String,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Score ledger (JSON array of score entries)
    #[arg(long)]
    scores: PathBuf,
    /// Student roll number
    #[arg(long)]
    student: String,
    /// Name used in the analysis prompt (defaults to the roll number)
    #[arg(long)]
    name: Option<String>,
    /// Bypass the cache and request a fresh analysis
    #[arg(long)]
    force: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TranscriptArgs {
    /// Score ledger (JSON array of score entries)
    #[arg(long)]
    scores: PathBuf,
    /// Student roll number
    #[arg(long)]
    student: String,
    /// Output file (defaults to transcript_<student>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so --json output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booster=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = settings::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Metrics(args) => metrics(args),
        Command::Analyze(args) => analyze(&config, args).await,
        Command::Transcript(args) => transcript(args),
    }
}

fn metrics(args: MetricsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let entries = ledger::load_student_entries(&args.scores, &args.student)?;
    let subjects = ledger::load_subjects(&args.subjects)?;

    let metrics = compute_metrics(&entries, &subjects);
    let averages = subject_averages(&entries);
    let weakest = weakest_subject(&entries);

    if args.json {
        let output = json!({
            "studentId": args.student,
            "records": entries.len(),
            "metrics": metrics,
            "band": metrics.band(),
            "stability": metrics.stability(),
            "subjectAverages": averages,
            "weakestSubject": weakest,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Student {} ({} records)", args.student, entries.len());
    println!("  Pointer:            {:.2} / 10", metrics.pointer);
    println!(
        "  Average:            {}%  [{}]",
        metrics.average_percentage,
        metrics.band().label()
    );
    println!(
        "  Latest delta:       {:+}%  [{}]",
        metrics.latest_delta,
        metrics.stability().label()
    );
    println!(
        "  Credit completion:  {:.0}%",
        metrics.credit_completion_ratio * 100.0
    );

    if !averages.is_empty() {
        println!();
        println!("Subjects:");
        for average in &averages {
            println!(
                "  {:<40} {:>5.1}%  ({} records)",
                average.subject, average.average, average.entry_count
            );
        }
    }
    if let Some(weakest) = weakest {
        println!();
        println!("Focus area: {} ({:.1}%)", weakest.subject, weakest.average);
    }

    Ok(())
}

async fn analyze(config: &BoosterConfig, args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (orchestrator, served) = analyze_student(
        config,
        provider_for(config)?,
        &args.scores,
        &args.student,
        args.name.as_deref(),
        args.force,
    )
    .await?;

    let Some(served) = served else {
        if args.json {
            println!("null");
        } else {
            println!("No records for {}; nothing to analyze.", args.student);
        }
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&served)?);
    } else {
        print_analysis(&served, orchestrator.cache().now());
    }
    Ok(())
}

fn print_analysis(served: &ServedAnalysis, now: chrono::DateTime<chrono::Utc>) {
    let origin = match served.source {
        AnalysisSource::Cache => match served.cached_minutes_ago(now) {
            Some(minutes) => format!("cached {}m ago", minutes),
            None => "cached".to_string(),
        },
        AnalysisSource::Fresh => "fresh".to_string(),
        AnalysisSource::Fallback => "fallback".to_string(),
    };

    println!("Analysis ({})", origin);
    println!();
    println!("{}", served.result.summary);
    println!();
    println!("Recommendations:");
    for (i, recommendation) in served.result.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, recommendation);
    }
    println!();
    println!("Career path: {}", served.result.career_path);
}

fn transcript(args: TranscriptArgs) -> Result<(), Box<dyn std::error::Error>> {
    let entries = ledger::load_student_entries(&args.scores, &args.student)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(transcript_file_name(&args.student)));

    let mut csv = Vec::new();
    write_transcript(&args.student, &entries, &mut csv)?;
    std::fs::write(&output, csv)?;

    tracing::info!(path = %output.display(), rows = entries.len(), "transcript written");
    println!("{}", output.display());
    Ok(())
}
