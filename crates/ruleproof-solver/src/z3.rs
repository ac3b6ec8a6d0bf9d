//! Z3-compatible SMT solver driver
//!
//! Runs a solver binary as a child process on an SMT-LIB2 script and parses
//! the textual verdict. The driver is written against Z3's command line but
//! also runs `z4`, which accepts plain script paths; Z3-specific options are
//! only passed when the binary looks like a Z3.

use crate::{find_executable, Model, SatVerdict, SmtSolver, SolverConfig, SolverError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Driver for a Z3-compatible solver binary.
pub struct Z3 {
    binary_path: PathBuf,
    name: String,
}

impl Z3 {
    /// Create a driver for a specific binary path.
    pub fn with_binary(path: impl Into<PathBuf>) -> Self {
        let binary_path = path.into();
        let name = binary_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "z3".to_string());
        Self { binary_path, name }
    }

    /// Detect a `z3` binary on `PATH`.
    pub fn detect() -> Option<Self> {
        find_executable("z3").map(Self::with_binary)
    }

    /// Whether the binary understands Z3's option syntax.
    fn speaks_z3_options(&self) -> bool {
        self.name.eq_ignore_ascii_case("z3")
    }
}

#[async_trait]
impl SmtSolver for Z3 {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check_sat(
        &self,
        path: &Path,
        config: &SolverConfig,
    ) -> Result<SatVerdict, SolverError> {
        if !path.exists() {
            return Err(SolverError::ExecutionFailed(format!(
                "script not found: {}",
                path.display()
            )));
        }

        let mut cmd = Command::new(&self.binary_path);
        if self.speaks_z3_options() {
            cmd.arg("-smt2");
            let timeout_secs = config.timeout.as_secs();
            if timeout_secs > 0 {
                cmd.arg(format!("-t:{timeout_secs}"));
            }
            if let Some(seed) = config.seed {
                cmd.arg(format!("smt.random_seed={seed}"));
            }
        }
        cmd.arg(path);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        debug!("running {}: {:?}", self.name, cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| SolverError::ExecutionFailed(e.to_string()))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        let result = timeout(config.timeout, async {
            let mut stdout = String::new();
            let mut stderr = String::new();

            let (status, stdout_result, stderr_result) = tokio::join!(
                child.wait(),
                async {
                    if let Some(mut handle) = stdout_handle {
                        let _ = handle.read_to_string(&mut stdout).await;
                    }
                    stdout
                },
                async {
                    if let Some(mut handle) = stderr_handle {
                        let _ = handle.read_to_string(&mut stderr).await;
                    }
                    stderr
                }
            );

            Ok::<_, std::io::Error>((status?, stdout_result, stderr_result))
        })
        .await;

        match result {
            Ok(Ok((_status, stdout, stderr))) => parse_verdict(&stdout, &stderr, config),
            Ok(Err(e)) => Err(SolverError::ExecutionFailed(e.to_string())),
            Err(_) => {
                warn!("{} timed out after {:?}", self.name, config.timeout);
                let _ = child.kill().await;
                Err(SolverError::Timeout(config.timeout))
            }
        }
    }
}

/// Find the preferred solver binary on `PATH`: `z4` first, then `z3`.
pub fn detect_solver() -> Option<Z3> {
    for name in &["z4", "z3"] {
        if let Some(path) = find_executable(name) {
            return Some(Z3::with_binary(path));
        }
    }
    None
}

/// Interpret solver output. The verdict is the first line that reads
/// exactly `sat`, `unsat`, `unknown` or `timeout`; anything else (model
/// text, `(error ...)` chatter after an `unsat`/`(get-model)` pair) is
/// skipped until one is found.
fn parse_verdict(
    stdout: &str,
    stderr: &str,
    config: &SolverConfig,
) -> Result<SatVerdict, SolverError> {
    for line in stdout.lines() {
        match line.trim() {
            "unsat" => return Ok(SatVerdict::Unsat),
            "sat" => {
                return Ok(SatVerdict::Sat {
                    model: Model::parse(stdout),
                })
            }
            "unknown" => {
                return Ok(SatVerdict::Unknown {
                    reason: extract_reason(stdout)
                        .unwrap_or_else(|| "solver returned unknown".to_string()),
                })
            }
            "timeout" => return Err(SolverError::Timeout(config.timeout)),
            _ => continue,
        }
    }
    let mut summary = stdout.lines().next().unwrap_or("empty output").to_string();
    if !stderr.trim().is_empty() {
        summary.push_str("; stderr: ");
        summary.push_str(stderr.lines().next().unwrap_or(""));
    }
    Err(SolverError::UnexpectedOutput(summary))
}

/// Extract the reason from a `(:reason-unknown ...)` line if present.
fn extract_reason(output: &str) -> Option<String> {
    let start = output.find("(:reason-unknown")?;
    let rest = &output[start..];
    let end = rest.find(')')?;
    Some(rest[..=end].to_string())
}
