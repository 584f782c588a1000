//! Validator verdicts.

/// The outcome of applying a validator to a measurement value.
///
/// A verdict carries a pass/fail flag and, on failure, a human-readable
/// reason that ends up in the aggregated test failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verdict {
    /// Whether the value satisfied the validator.
    pub ok: bool,
    /// Reason text, set only when `ok` is false.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    #[cfg_attr(feature = "serde", serde(default))]
    pub reason: Option<String>,
}

impl Verdict {
    /// A passing verdict.
    pub fn pass() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    /// A failing verdict with a reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}
