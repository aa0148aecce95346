//! Checklist steps and their recorded results.

use core::fmt;

/// One item of the probe checklist, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    SwaggerReachable,
    Register,
    Login,
    AddToCart,
    QueryCart,
    DeleteCartItem,
    VerifyCartEmpty,
}

impl Step {
    /// Human-readable label printed next to the result glyph.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SwaggerReachable => "Swagger reachable",
            Self::Register => "User registration",
            Self::Login => "User login",
            Self::AddToCart => "Add to cart",
            Self::QueryCart => "Query cart",
            Self::DeleteCartItem => "Delete cart item",
            Self::VerifyCartEmpty => "Query cart again should be empty",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a step ended.
///
/// `Failed` is an expected, HTTP-level failure (e.g. a non-2xx status) after
/// which the run continues. `Errored` is an unexpected failure (transport
/// error, timeout, malformed body) that ends the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Failed,
    Errored(String),
}

impl StepOutcome {
    /// Map a pass/fail check onto an outcome.
    #[must_use]
    pub const fn from_check(ok: bool) -> Self {
        if ok { Self::Passed } else { Self::Failed }
    }

    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    #[must_use]
    pub const fn is_errored(&self) -> bool {
        matches!(self, Self::Errored(_))
    }

    /// Glyph printed at the start of the report line.
    #[must_use]
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Passed => "✅",
            Self::Failed | Self::Errored(_) => "❌",
        }
    }
}

/// The recorded result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub step: Step,
    pub outcome: StepOutcome,
    /// Extra context: the registered email, the cart body, ...
    pub detail: Option<String>,
}

impl StepResult {
    #[must_use]
    pub const fn new(step: Step, outcome: StepOutcome) -> Self {
        Self {
            step,
            outcome,
            detail: None,
        }
    }

    /// Attach a detail string.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Renders as `<glyph> <label>` followed by the detail, if any. An errored
/// step shows its message as the detail.
impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.outcome.glyph(), self.step)?;
        if let StepOutcome::Errored(message) = &self.outcome {
            write!(f, " error: {message}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " {detail}")?;
        }
        Ok(())
    }
}
