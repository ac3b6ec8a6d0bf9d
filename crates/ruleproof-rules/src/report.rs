//! Per-rule verification reports

use ruleproof_engine::ProofOutcome;
use serde::Serialize;
use std::fmt;

/// Outcome of one width's obligation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidthOutcome {
    pub width: u32,
    pub outcome: ProofOutcome,
}

/// One rule script's verdict across every enumerated width.
#[derive(Debug, Clone, Serialize)]
pub struct RuleReport {
    pub rule: String,
    pub widths: Vec<WidthOutcome>,
}

impl RuleReport {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            widths: Vec::new(),
        }
    }

    pub fn record(&mut self, width: u32, outcome: ProofOutcome) {
        self.widths.push(WidthOutcome { width, outcome });
    }

    /// True iff every recorded width was proved.
    pub fn all_proved(&self) -> bool {
        !self.widths.is_empty() && self.widths.iter().all(|w| w.outcome.is_proved())
    }

    /// The widths that were not proved.
    pub fn failures(&self) -> impl Iterator<Item = &WidthOutcome> {
        self.widths.iter().filter(|w| !w.outcome.is_proved())
    }
}

impl fmt::Display for RuleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let proved = self.widths.iter().filter(|w| w.outcome.is_proved()).count();
        write!(f, "{}: {}/{} widths proved", self.rule, proved, self.widths.len())?;
        for failure in self.failures() {
            write!(f, "\n  width {:>3}: {}", failure.width, failure.outcome)?;
        }
        Ok(())
    }
}
