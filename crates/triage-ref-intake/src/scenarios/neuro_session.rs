//! Sticky neurological flag and the one-analysis-per-session guard.
//!
//! A single session receives three requests. The first transcript mentions
//! shaking and latches the flag; the second no longer does, yet the flag
//! holds; after staff reset it, the third request scores as routine.

use std::time::Duration;

use triage_audit::InMemoryDecisionLedger;
use triage_contracts::{
    error::{EngineResult, TriageError},
    result::Department,
};
use triage_core::TriageSession;

use crate::mock_data::sample_patient;

use super::{build_orchestrator, finish, print_result, CaseOutcome, ScenarioReport};

/// Run the sticky-flag walkthrough on sample patient C.
pub async fn run_scenario() -> EngineResult<ScenarioReport> {
    println!("=== Sticky neurological flag ===");
    println!();

    let patient = sample_patient("C").ok_or_else(|| TriageError::Config {
        reason: "sample patient C is missing".to_string(),
    })?;
    let ledger = InMemoryDecisionLedger::new("neuro-session");
    let orchestrator = build_orchestrator(&ledger, None, Duration::from_secs(8));
    let session = TriageSession::new();

    let steps: [(&str, &str, bool, u8, Department); 3] = [
        ("marker in transcript", "my hands keep shaking", false, 88, Department::Neurology),
        ("marker gone, flag holds", "feeling better now", false, 88, Department::Neurology),
        ("after staff reset", "feeling better now", true, 15, Department::GeneralMedicine),
    ];

    let mut cases = Vec::new();
    for (label, transcript, reset_first, score, department) in steps {
        if reset_first {
            session.reset_neuro_flag();
            println!("  (staff reset the neuro flag)");
        }
        println!("  Step: {label}, transcript {transcript:?}");

        let mut draft = patient.draft();
        draft.symptom_transcript = transcript.to_string();
        let result = orchestrator.evaluate_in_session(&session, draft).await?;
        print_result(patient.name, &result);

        let passed = result.risk_score == score && result.department == department;
        println!(
            "  Flag state:        {:?} → {}",
            session.neuro_state(),
            if passed { "PASS" } else { "FAIL" }
        );
        println!();

        cases.push(CaseOutcome {
            label: label.to_string(),
            result,
            passed,
        });
    }

    // A second analysis while one is running is refused, not queued.
    println!("  Step: overlapping request");
    let guard = session.try_begin()?;
    let overlap = orchestrator.evaluate_in_session(&session, patient.draft()).await;
    drop(guard);
    let refused = matches!(overlap, Err(TriageError::AnalysisInFlight { .. }));
    println!(
        "  Overlap refused:   {}",
        if refused { "yes → PASS" } else { "no → FAIL" }
    );
    println!();

    let mut report = finish("Sticky neurological flag", cases, &ledger);
    if !refused {
        report.failures.push("overlapping request was not refused".to_string());
    }
    Ok(report)
}
