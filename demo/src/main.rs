//! Triage Decision Engine — Demo CLI
//!
//! Runs the reference scenarios, or evaluates a single patient from the
//! command line against the configured remote model with the rule engine as
//! safety net.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- reference
//!   cargo run -p demo -- remote-paths
//!   cargo run -p demo -- neuro-session
//!   cargo run -p demo -- evaluate --age 55 --bp 145/95 --transcript "mild headache" --history diabetes
//!   cargo run -p demo -- evaluate --bp 120/80 --offline --neuro

use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use triage_audit::InMemoryDecisionLedger;
use triage_contracts::{
    error::EngineResult,
    patient::{BloodGroup, BloodPressure, PatientProfile},
};
use triage_core::{config::EngineConfig, IntakeDraft, Orchestrator, TriageSession};
use triage_ref_intake::{
    alerting::AlertTrigger,
    export::{export_row, CSV_HEADER},
    scenarios::{neuro_session, reference_cases, remote_paths, ScenarioReport},
    vitals::{ManualVitals, SimulatedVitals, VitalsBaseline, VitalsProvider},
};
use triage_remote::OllamaProvider;
use triage_rules::TriageRuleEngine;
use triage_verify::RemoteResponseValidator;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Triage decision engine demo.
///
/// Scenario subcommands use fictional patients and a scripted model; the
/// `evaluate` subcommand talks to a real Ollama endpoint unless `--offline`.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Triage decision engine demo",
    long_about = "Runs triage scenarios showing remote-first scoring, rule-engine\n\
                  fallback, the sticky neurological flag, and ledger integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// Scenarios A–D with the rule engine alone.
    Reference,
    /// Accepted, rejected, failed, and stalled remote answers.
    RemotePaths,
    /// Sticky neuro flag across requests, and the in-flight guard.
    NeuroSession,
    /// Evaluate one patient.
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
struct EvaluateArgs {
    /// Patient name used for alerts and the CSV row.
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    age: String,
    #[arg(long, default_value = "unspecified")]
    gender: String,
    #[arg(long, default_value = "O+")]
    blood_group: BloodGroup,
    /// Blood pressure as SYS/DIA.
    #[arg(long, default_value = "120/80")]
    bp: String,
    #[arg(long, default_value_t = 72)]
    heart_rate: u32,
    #[arg(long, default_value_t = 98)]
    spo2: u32,
    #[arg(long, default_value = "")]
    transcript: String,
    #[arg(long, default_value = "")]
    history: String,
    /// Start the session with the neurological flag already set.
    #[arg(long)]
    neuro: bool,
    /// Draw vitals from the wearable simulator around --bp/--heart-rate/--spo2.
    #[arg(long)]
    simulate_vitals: bool,
    /// Engine configuration TOML.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Skip the remote model even when the configuration enables it.
    #[arg(long)]
    offline: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all().await,
        Command::Reference => run_reports(vec![reference_cases::run_scenario().await]),
        Command::RemotePaths => run_reports(vec![remote_paths::run_scenario().await]),
        Command::NeuroSession => run_reports(vec![neuro_session::run_scenario().await]),
        Command::Evaluate(args) => evaluate(args).await,
    };

    match result {
        Ok(true) => {
            println!("Completed successfully.");
        }
        Ok(false) => {
            eprintln!("One or more checks failed.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run_all() -> EngineResult<bool> {
    run_reports(vec![
        reference_cases::run_scenario().await,
        remote_paths::run_scenario().await,
        neuro_session::run_scenario().await,
    ])
}

fn run_reports(reports: Vec<EngineResult<ScenarioReport>>) -> EngineResult<bool> {
    let mut all_passed = true;
    for report in reports {
        let report = report?;
        let passed = report.passed();
        println!("  {}: {}", report.title, if passed { "PASS" } else { "FAIL" });
        for failure in &report.failures {
            println!("    - {failure}");
        }
        all_passed &= passed;
    }
    println!();
    Ok(all_passed)
}

// ── Single evaluation ─────────────────────────────────────────────────────────

async fn evaluate(args: EvaluateArgs) -> EngineResult<bool> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    let rules = match &config.rules_path {
        Some(path) => TriageRuleEngine::from_file(path)?,
        None => TriageRuleEngine::default(),
    };

    let ledger = InMemoryDecisionLedger::new("demo-evaluate");
    let mut orchestrator = Orchestrator::new(
        Box::new(rules),
        Box::new(RemoteResponseValidator::new()),
        Box::new(ledger.clone()),
    )
    .with_timeout(config.remote.timeout());

    if config.remote.enabled && !args.offline {
        let provider = OllamaProvider::from_config(&config.remote)?;
        info!(
            endpoint = provider.endpoint(),
            model = %config.remote.model,
            timeout_secs = config.remote.timeout_secs,
            "remote reasoning enabled"
        );
        orchestrator = orchestrator.with_provider(Box::new(provider));
    } else {
        info!("remote reasoning disabled; rule engine only");
    }

    let vitals = if args.simulate_vitals {
        let bp = BloodPressure::parse(&args.bp);
        if bp.is_none() {
            warn!(bp = %args.bp, "unparsable --bp; simulating around 120/80");
        }
        let bp = bp.unwrap_or(BloodPressure { systolic: 120, diastolic: 80 });
        SimulatedVitals::new(VitalsBaseline {
            heart_rate: args.heart_rate,
            systolic: bp.systolic,
            diastolic: bp.diastolic,
            spo2: args.spo2,
        })
        .current()
    } else {
        ManualVitals::new(args.heart_rate, args.bp.clone(), args.spo2).current()
    };

    let session = TriageSession::new();
    if args.neuro {
        session.flag_neuro("set by operator");
    }

    let draft = IntakeDraft {
        patient_profile: PatientProfile {
            age: args.age,
            gender: args.gender,
            blood_pressure: args.bp,
            blood_group: args.blood_group,
        },
        symptom_transcript: args.transcript,
        ehr_history: args.history,
        vital_signs: vitals.clone(),
    };

    println!("=== Evaluate ===");
    println!();
    println!(
        "  Vitals:            HR {} bpm, BP {}, SpO2 {}%",
        vitals.heart_rate, vitals.blood_pressure, vitals.spo2
    );

    let result = orchestrator.evaluate_in_session(&session, draft).await?;

    println!("  Risk score:        {}", result.risk_score);
    println!("  Risk level:        {}", result.risk_level());
    println!("  Department:        {}", result.department);
    println!("  Confidence:        {:.2}", result.confidence);
    println!("  Fallback used:     {}", result.fallback_used);
    println!("  Justification:     {}", result.justification);
    println!("  Neuro flag:        {:?}", session.neuro_state());
    match AlertTrigger::default().evaluate(&args.name, &result) {
        Some(alert) => println!("  Alert:             {}", alert.body()),
        None => println!("  Alert:             none"),
    }
    println!();
    println!("{CSV_HEADER}");
    println!("{}", export_row(&args.name, &result, Utc::now()));
    println!();

    let verified = ledger.verify_integrity();
    println!(
        "  Decision ledger integrity: {} ({} entr{})",
        if verified { "VERIFIED" } else { "FAILED" },
        ledger.len(),
        if ledger.len() == 1 { "y" } else { "ies" }
    );
    println!();

    Ok(verified)
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Triage Decision Engine");
    println!("======================");
    println!();
    println!("Per request:");
    println!("  [1] Intake collectors build the payload; the session adds its sticky neuro flag");
    println!("  [2] Remote model is asked once, under a hard timeout");
    println!("  [3] Its answer must pass JSON Schema + department checks to be used");
    println!("  [4] Any failure → deterministic rule engine (crisis > neuro > moderate > baseline)");
    println!("  [5] Decision appended to the SHA-256 hash-chained ledger");
    println!();
}
