//! Equivalence-checking rule engine
//!
//! [`Rule::check`] is the single primitive every rule script is built on:
//! given a candidate formula and a reference formula over the same free
//! variables, it asks the solver for an assignment on which they disagree.
//!
//! - `unsat` certifies `candidate ⇔ reference` for *all* inputs (a
//!   universally quantified proof, not a sampled test) and yields
//!   [`ProofOutcome::Proved`].
//! - `sat` yields [`ProofOutcome::Refuted`] carrying the concrete witness
//!   values extracted from the model, so the discrepancy is reproducible.
//! - `unknown` yields [`ProofOutcome::Indeterminate`]; the harness cannot
//!   claim a proof it did not obtain, so this is never folded into success.
//!
//! Solver queries are deterministic for equivalent input, so no retry is
//! attempted; a timeout or process failure propagates as [`EngineError`].

mod obligation;

pub use obligation::EquivalenceObligation;

use num_bigint::BigUint;
use ruleproof_bv::{Assignment, BoolTerm, TermError};
use ruleproof_solver::{SatVerdict, SmtSolver, SolverConfig, SolverError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write as _;
use thiserror::Error;
use tracing::debug;

/// Errors from the engine itself, distinct from a refuted obligation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A formula handed to the engine was ill-formed.
    #[error(transparent)]
    Term(#[from] TermError),

    /// The solver process failed, timed out, or produced unreadable output.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// The counterexample model omitted a declared variable.
    #[error("counterexample model has no value for {name}")]
    MissingWitnessValue { name: String },

    /// Obligation script could not be written to disk.
    #[error("failed to write obligation script: {0}")]
    Io(#[from] std::io::Error),
}

/// One concrete value in a counterexample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WitnessValue {
    pub value: BigUint,
    pub width: u32,
}

impl fmt::Display for WitnessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-bit)", self.value, self.width)
    }
}

/// Concrete operand values on which candidate and reference disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Witness {
    pub assignments: BTreeMap<String, WitnessValue>,
}

impl Witness {
    pub fn get(&self, name: &str) -> Option<&WitnessValue> {
        self.assignments.get(name)
    }

    /// The witness as a plain assignment, for replaying through the
    /// concrete evaluator.
    pub fn to_assignment(&self) -> Assignment {
        self.assignments
            .iter()
            .map(|(name, value)| (name.clone(), value.value.clone()))
            .collect()
    }
}

impl fmt::Display for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.assignments {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Outcome of one proof obligation. There is no partial state: an
/// obligation is proved for all inputs, refuted by a witness, or
/// indeterminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProofOutcome {
    /// The formulas are equal for every input.
    Proved,
    /// The formulas disagree on the witness.
    Refuted { witness: Witness },
    /// The solver could not decide; treated as a failure, never success.
    Indeterminate { reason: String },
}

impl ProofOutcome {
    pub fn is_proved(&self) -> bool {
        matches!(self, ProofOutcome::Proved)
    }

    pub fn witness(&self) -> Option<&Witness> {
        match self {
            ProofOutcome::Refuted { witness } => Some(witness),
            _ => None,
        }
    }
}

impl fmt::Display for ProofOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProofOutcome::Proved => write!(f, "proved"),
            ProofOutcome::Refuted { witness } => write!(f, "refuted by {witness}"),
            ProofOutcome::Indeterminate { reason } => write!(f, "indeterminate: {reason}"),
        }
    }
}

/// The equivalence-checking primitive.
pub struct Rule {
    solver: Box<dyn SmtSolver>,
    config: SolverConfig,
}

impl Rule {
    pub fn new(solver: Box<dyn SmtSolver>) -> Self {
        Self {
            solver,
            config: SolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Prove that `candidate` and `reference` agree for all values of their
    /// free variables, or produce the inputs on which they do not.
    pub async fn check(
        &self,
        candidate: &BoolTerm,
        reference: &BoolTerm,
    ) -> Result<ProofOutcome, EngineError> {
        let obligation = EquivalenceObligation::new(candidate.clone(), reference.clone());
        self.check_obligation(&obligation).await
    }

    /// Discharge a prepared obligation.
    pub async fn check_obligation(
        &self,
        obligation: &EquivalenceObligation,
    ) -> Result<ProofOutcome, EngineError> {
        let vars = obligation.free_variables()?;
        let script = obligation.to_smt2()?;

        let mut file = tempfile::Builder::new()
            .prefix("obligation-")
            .suffix(".smt2")
            .tempfile()?;
        file.write_all(script.as_bytes())?;
        file.flush()?;

        debug!(solver = self.solver.name(), "dispatching obligation");
        let verdict = self.solver.check_sat(file.path(), &self.config).await?;

        match verdict {
            SatVerdict::Unsat => Ok(ProofOutcome::Proved),
            SatVerdict::Sat { model } => {
                let mut assignments = BTreeMap::new();
                for (name, width) in vars {
                    let value = model
                        .get(&name)
                        .ok_or_else(|| EngineError::MissingWitnessValue { name: name.clone() })?;
                    assignments.insert(
                        name,
                        WitnessValue {
                            value: value.value.clone(),
                            width,
                        },
                    );
                }
                Ok(ProofOutcome::Refuted {
                    witness: Witness { assignments },
                })
            }
            SatVerdict::Unknown { reason } => Ok(ProofOutcome::Indeterminate { reason }),
        }
    }
}
