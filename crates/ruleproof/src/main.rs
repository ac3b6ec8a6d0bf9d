//! ruleproof CLI
//!
//! Each subcommand is an independently runnable rule script; `all` chains
//! the whole catalog. Exit code 0 means every selected obligation was
//! proved; anything else (counterexample, indeterminate verdict, solver
//! failure) exits nonzero with the failing width and witness reported.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ruleproof::engine::Rule;
use ruleproof::rules::{checked_add, checked_mul, checked_sub, RuleReport};
use ruleproof::solver::{detect_solver, SmtSolver as _, SolverConfig, Z3};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "ruleproof")]
#[command(about = "Prove generated checked-arithmetic overflow checks equivalent to exact semantics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an SMT solver binary (default: z4 or z3 from PATH)
    #[arg(long, global = true)]
    solver: Option<PathBuf>,

    /// Per-obligation solver timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    timeout: u64,

    /// Emit reports as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the checked unsigned addition rule
    Add,
    /// Verify the checked unsigned subtraction rule
    Sub,
    /// Verify the checked unsigned multiplication rule
    Mul,
    /// Verify every rule in the catalog
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let solver = match &cli.solver {
        Some(path) => Z3::with_binary(path),
        None => detect_solver().context("no SMT solver found on PATH (tried z4, z3)")?,
    };
    info!(solver = solver.name(), "using solver");

    let config = SolverConfig::new().with_timeout(Duration::from_secs(cli.timeout));
    let rule = Rule::new(Box::new(solver)).with_config(config);

    let reports: Vec<RuleReport> = match cli.command {
        Commands::Add => vec![checked_add::verify(&rule).await?],
        Commands::Sub => vec![checked_sub::verify(&rule).await?],
        Commands::Mul => vec![checked_mul::verify(&rule).await?],
        Commands::All => ruleproof::verify_all(&rule).await?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{report}");
        }
    }

    if reports.iter().any(|report| !report.all_proved()) {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["ruleproof", "add"]).unwrap();
        assert!(matches!(cli.command, Commands::Add));
        assert_eq!(cli.timeout, 60);
        assert!(!cli.json);
    }

    #[test]
    fn test_cli_parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ruleproof", "all", "--timeout", "5", "--json", "--solver", "/opt/z4",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::All));
        assert_eq!(cli.timeout, 5);
        assert!(cli.json);
        assert_eq!(cli.solver, Some(PathBuf::from("/opt/z4")));
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["ruleproof", "frobnicate"]).is_err());
    }
}
