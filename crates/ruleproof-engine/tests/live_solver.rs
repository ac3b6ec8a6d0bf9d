//! Engine behavior against a real solver
//!
//! These tests exercise the full dispatch path (script emission, process
//! run, verdict and model parsing) and are skipped when no solver binary is
//! installed.

use ruleproof_bv::{eval_bool, BoolTerm, BvTerm};
use ruleproof_engine::Rule;
use ruleproof_solver::{detect_solver, SolverConfig};
use std::time::Duration;

fn rule() -> Option<Rule> {
    let solver = detect_solver()?;
    let config = SolverConfig::new().with_timeout(Duration::from_secs(30));
    Some(Rule::new(Box::new(solver)).with_config(config))
}

#[tokio::test]
async fn test_equivalent_formulas_are_proved() {
    let Some(rule) = rule() else {
        return;
    };

    // x > y and y < x are the same relation written two ways.
    let x = BvTerm::var("X", 8).unwrap();
    let y = BvTerm::var("Y", 8).unwrap();
    let candidate = BoolTerm::ugt(x.clone(), y.clone()).unwrap();
    let reference = BoolTerm::ult(y, x).unwrap();

    let outcome = rule.check(&candidate, &reference).await.unwrap();
    assert!(outcome.is_proved(), "expected proof, got {outcome}");
}

#[tokio::test]
async fn test_inequivalent_formulas_are_refuted_with_witness() {
    let Some(rule) = rule() else {
        return;
    };

    let x = BvTerm::var("X", 8).unwrap();
    let y = BvTerm::var("Y", 8).unwrap();
    let candidate = BoolTerm::ugt(x.clone(), y.clone()).unwrap();
    let reference = BoolTerm::ult(x.clone(), y.clone()).unwrap();

    let outcome = rule.check(&candidate, &reference).await.unwrap();
    let witness = outcome.witness().expect("x > y is not x < y");

    // Both operands must be reported.
    assert!(witness.get("X").is_some());
    assert!(witness.get("Y").is_some());

    // The witness, replayed through ground arithmetic, must actually
    // separate the two formulas.
    let env = witness.to_assignment();
    let candidate_holds = eval_bool(&candidate, &env).unwrap();
    let reference_holds = eval_bool(&reference, &env).unwrap();
    assert_ne!(candidate_holds, reference_holds);
}

#[tokio::test]
async fn test_contradiction_against_tautology_is_refuted() {
    let Some(rule) = rule() else {
        return;
    };

    let x = BvTerm::var("X", 8).unwrap();
    let always = BoolTerm::eq(x.clone(), x.clone()).unwrap();
    let never = BoolTerm::ne(x.clone(), x).unwrap();

    let outcome = rule.check(&always, &never).await.unwrap();
    assert!(outcome.witness().is_some());
}
