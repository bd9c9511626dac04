//! Reference scenarios.
//!
//! Each scenario wires real components (rule engine, response validator,
//! decision ledger, orchestrator) to the sample patients, prints what
//! happens at each step, and returns a report the caller can check.

pub mod neuro_session;
pub mod reference_cases;
pub mod remote_paths;

use std::time::Duration;

use chrono::Utc;

use triage_audit::InMemoryDecisionLedger;
use triage_core::{traits::ReasoningProvider, Orchestrator};
use triage_contracts::result::TriageResult;
use triage_rules::TriageRuleEngine;
use triage_verify::RemoteResponseValidator;

use crate::alerting::AlertTrigger;
use crate::export::export_row;

/// One evaluated case inside a scenario.
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub label: String,
    pub result: TriageResult,
    pub passed: bool,
}

/// Everything a scenario observed.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub title: &'static str,
    pub cases: Vec<CaseOutcome>,
    pub ledger_verified: bool,
    pub ledger_entries: usize,
    /// Checks that failed outside of an evaluated case.
    pub failures: Vec<String>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.ledger_verified && self.failures.is_empty() && self.cases.iter().all(|c| c.passed)
    }
}

/// Orchestrator over the default rules, writing to `ledger`.
pub(crate) fn build_orchestrator(
    ledger: &InMemoryDecisionLedger,
    provider: Option<Box<dyn ReasoningProvider>>,
    timeout: Duration,
) -> Orchestrator {
    let orchestrator = Orchestrator::new(
        Box::new(TriageRuleEngine::default()),
        Box::new(RemoteResponseValidator::new()),
        Box::new(ledger.clone()),
    )
    .with_timeout(timeout);

    match provider {
        Some(provider) => orchestrator.with_provider(provider),
        None => orchestrator,
    }
}

pub(crate) fn print_result(patient: &str, result: &TriageResult) {
    println!("  Risk score:        {} ({})", result.risk_score, result.risk_level());
    println!("  Department:        {}", result.department);
    println!("  Confidence:        {:.2}", result.confidence);
    println!(
        "  Source:            {}",
        if result.fallback_used { "rule engine (fallback)" } else { "remote model" }
    );
    println!("  Justification:     {}", result.justification);
    match AlertTrigger::default().evaluate(patient, result) {
        Some(alert) => println!("  Alert:             {}", alert.body()),
        None => println!("  Alert:             none"),
    }
    println!("  CSV:               {}", export_row(patient, result, Utc::now()));
}

pub(crate) fn finish(
    title: &'static str,
    cases: Vec<CaseOutcome>,
    ledger: &InMemoryDecisionLedger,
) -> ScenarioReport {
    let ledger_verified = ledger.verify_integrity();
    let ledger_entries = ledger.len();
    println!(
        "  Decision ledger integrity: {} ({} entr{} in chain)",
        if ledger_verified { "VERIFIED" } else { "FAILED" },
        ledger_entries,
        if ledger_entries == 1 { "y" } else { "ies" }
    );
    println!();

    ScenarioReport {
        title,
        cases,
        ledger_verified,
        ledger_entries,
        failures: Vec::new(),
    }
}
