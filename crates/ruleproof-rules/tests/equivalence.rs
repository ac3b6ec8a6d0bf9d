//! Full equivalence proofs against a real solver
//!
//! The central law of the harness: for every enumerated width and all
//! operand values, the emitted overflow check agrees with the exact
//! condition. Each test runs one rule script end to end (32 obligations)
//! and is skipped when no solver binary is installed.

use ruleproof_engine::Rule;
use ruleproof_rules::{checked_add, checked_mul, checked_sub};
use ruleproof_solver::{detect_solver, SolverConfig};
use std::time::Duration;

fn rule() -> Option<Rule> {
    let solver = detect_solver()?;
    let config = SolverConfig::new().with_timeout(Duration::from_secs(120));
    Some(Rule::new(Box::new(solver)).with_config(config))
}

#[tokio::test]
async fn checked_add_proves_every_width() {
    let Some(rule) = rule() else {
        return;
    };
    let report = checked_add::verify(&rule).await.unwrap();
    assert_eq!(report.widths.len(), 32);
    assert!(report.all_proved(), "{report}");
}

#[tokio::test]
async fn checked_sub_proves_every_width() {
    let Some(rule) = rule() else {
        return;
    };
    let report = checked_sub::verify(&rule).await.unwrap();
    assert_eq!(report.widths.len(), 32);
    assert!(report.all_proved(), "{report}");
}

#[tokio::test]
async fn checked_mul_proves_every_width() {
    let Some(rule) = rule() else {
        return;
    };
    let report = checked_mul::verify(&rule).await.unwrap();
    assert_eq!(report.widths.len(), 32);
    assert!(report.all_proved(), "{report}");
}
