//! External SMT solver boundary
//!
//! The harness depends on a decision procedure only through this crate: a
//! solver accepts an SMT-LIB2 script and answers one of `unsat`, `sat` plus
//! a model, or `unknown` plus a reason. The shipped implementation drives a
//! `z4` or `z3` binary found on `PATH` (or an explicitly supplied path) as a
//! child process with a hard per-query timeout.
//!
//! Nothing here interprets the formulas being checked; verdict semantics
//! belong to the rule engine.

pub mod model;
mod z3;

pub use model::{Model, ModelValue};
pub use z3::{detect_solver, Z3};

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Per-query solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Hard budget per query; the solver process is killed when it elapses.
    pub timeout: Duration,
    /// Random seed for reproducibility, if the solver supports one.
    pub seed: Option<u64>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            seed: None,
        }
    }
}

/// The three possible answers to a satisfiability query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatVerdict {
    /// No satisfying assignment exists.
    Unsat,
    /// A satisfying assignment was found.
    Sat { model: Model },
    /// The solver gave up without a verdict.
    Unknown { reason: String },
}

impl SatVerdict {
    pub fn is_unsat(&self) -> bool {
        matches!(self, SatVerdict::Unsat)
    }

    pub fn is_sat(&self) -> bool {
        matches!(self, SatVerdict::Sat { .. })
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SatVerdict::Sat { model } => Some(model),
            _ => None,
        }
    }
}

/// Errors from the solver boundary.
///
/// A timeout is deliberately its own variant: it must never be folded into
/// either a proved obligation or a counterexample.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("no SMT solver binary found (tried z4, z3)")]
    NotFound,

    #[error("failed to run solver: {0}")]
    ExecutionFailed(String),

    #[error("solver timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not interpret solver output: {0}")]
    UnexpectedOutput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A decision procedure for SMT-LIB2 scripts.
#[async_trait]
pub trait SmtSolver: Send + Sync {
    /// Solver name for logging and reports.
    fn name(&self) -> &str;

    /// Run the script at `path` and return the verdict.
    async fn check_sat(&self, path: &Path, config: &SolverConfig)
        -> Result<SatVerdict, SolverError>;
}

/// Locate an executable on `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = SolverConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_seed(7);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_verdict_predicates() {
        assert!(SatVerdict::Unsat.is_unsat());
        assert!(!SatVerdict::Unsat.is_sat());
        let sat = SatVerdict::Sat {
            model: Model::default(),
        };
        assert!(sat.is_sat());
        assert!(sat.model().is_some());
        let unknown = SatVerdict::Unknown {
            reason: "gave up".to_string(),
        };
        assert!(!unknown.is_sat());
        assert!(unknown.model().is_none());
    }

    #[test]
    fn test_find_executable_known_binary() {
        #[cfg(unix)]
        {
            let found = find_executable("ls");
            assert!(found.is_some(), "ls should be findable in PATH");
        }
        assert!(find_executable("no_such_binary_anywhere_404").is_none());
    }
}
