//! # benchwatch-types
//!
//! Core types for hardware production-test observability. This crate defines
//! the schema shared between the test-execution side (recording measurements,
//! asking operator questions) and the observer side (live dashboards
//! rendering broadcast events).
//!
//! ## Design Goals
//!
//! - **Zero required dependencies beyond error derive**: the schema works
//!   without any serialization framework
//! - **Optional serialization**: enable the `serde` feature to put events on
//!   a wire; the serialized shape is stable (`{"type": "input", ...}` etc.)
//! - **Transport agnostic**: events carry no assumptions about SSE,
//!   WebSockets, or any particular dashboard
//!
//! ## Example
//!
//! ```rust
//! use benchwatch_types::{convert, Verdict, MILLIVOLT, VOLT};
//!
//! let volts = convert(1500.0, &MILLIVOLT, &VOLT)?;
//! assert_eq!(volts, 1.5);
//!
//! let verdict = Verdict::fail("6 not in range [1, 5]");
//! assert!(!verdict.ok);
//! # Ok::<(), benchwatch_types::UnitError>(())
//! ```

mod event;
mod record;
mod timeline;
mod unit;
mod verdict;

pub use event::*;
pub use record::*;
pub use timeline::*;
pub use unit::*;
pub use verdict::*;
