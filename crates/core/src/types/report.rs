//! The result of one probe run.

use super::{Step, StepOutcome, StepResult};

/// Ordered step results of one run against one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub base_url: String,
    pub steps: Vec<StepResult>,
    /// Set when login produced no token and the cart steps were not run.
    pub cart_skipped: bool,
    /// Set when a step errored and the remaining steps were not run.
    pub aborted: bool,
}

impl ProbeReport {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            steps: Vec::new(),
            cart_skipped: false,
            aborted: false,
        }
    }

    /// Append a result. An errored result marks the report as aborted.
    pub fn record(&mut self, result: StepResult) {
        if result.outcome.is_errored() {
            self.aborted = true;
        }
        self.steps.push(result);
    }

    /// The recorded result for `step`, if it ran.
    #[must_use]
    pub fn get(&self, step: Step) -> Option<&StepResult> {
        self.steps.iter().find(|result| result.step == step)
    }

    /// The outcome recorded for `step`, if it ran.
    #[must_use]
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.get(step).map(|result| &result.outcome)
    }

    /// Whether every recorded step passed and nothing was skipped.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.aborted
            && !self.cart_skipped
            && self.steps.iter().all(|result| result.outcome.is_passed())
    }

    /// Number of recorded steps that did not pass.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|result| !result.outcome.is_passed())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errored_step_aborts() {
        let mut report = ProbeReport::new("http://localhost:5000");
        report.record(StepResult::new(Step::SwaggerReachable, StepOutcome::Passed));
        assert!(!report.aborted);

        report.record(StepResult::new(
            Step::Register,
            StepOutcome::Errored("timed out".to_string()),
        ));
        assert!(report.aborted);
        assert!(!report.all_passed());
        assert_eq!(report.failure_count(), 1);
    }

    #[test]
    fn test_skipped_cart_is_not_all_passed() {
        let mut report = ProbeReport::new("http://localhost:5000");
        report.record(StepResult::new(Step::SwaggerReachable, StepOutcome::Passed));
        report.cart_skipped = true;
        assert!(!report.all_passed());
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn test_lookup_by_step() {
        let mut report = ProbeReport::new("http://localhost:5000");
        report.record(StepResult::new(Step::Login, StepOutcome::Failed));
        assert_eq!(report.outcome(Step::Login), Some(&StepOutcome::Failed));
        assert_eq!(report.outcome(Step::AddToCart), None);
    }
}
