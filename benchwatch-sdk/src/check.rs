//! Validator library: pure predicates over measurement values.
//!
//! Each constructor returns a boxed closure so call sites read as
//! `session.record("vcc", 3.3, VOLT, Some(within(3.0, 3.6)))`. Validators
//! hold no shared state.

use benchwatch_types::Verdict;

/// A measurement validator: a pure predicate over the raw value.
pub type Validator = Box<dyn Fn(f64) -> Verdict + Send>;

/// Value must lie in `[min, max]` (inclusive).
pub fn within(min: f64, max: f64) -> Validator {
    Box::new(move |value| {
        if min <= value && value <= max {
            Verdict::pass()
        } else {
            Verdict::fail(format!("{value} not in range [{min}, {max}]"))
        }
    })
}

/// Value must be strictly greater than `threshold`.
pub fn greater_than(threshold: f64) -> Validator {
    Box::new(move |value| {
        if value > threshold {
            Verdict::pass()
        } else {
            Verdict::fail(format!("{value} ≤ {threshold}"))
        }
    })
}

/// Value must be strictly less than `threshold`.
pub fn less_than(threshold: f64) -> Validator {
    Box::new(move |value| {
        if value < threshold {
            Verdict::pass()
        } else {
            Verdict::fail(format!("{value} ≥ {threshold}"))
        }
    })
}

/// Value must be zero or positive.
pub fn non_negative() -> Validator {
    Box::new(|value| {
        if value >= 0.0 {
            Verdict::pass()
        } else {
            Verdict::fail(format!("{value} is negative"))
        }
    })
}

/// Value must be within `tol` of `target`.
pub fn is_close_to(target: f64, tol: f64) -> Validator {
    Box::new(move |value| {
        if (value - target).abs() <= tol {
            Verdict::pass()
        } else {
            Verdict::fail(format!("{value} not within ±{tol} of {target}"))
        }
    })
}
