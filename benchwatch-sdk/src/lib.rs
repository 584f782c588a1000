//! # benchwatch-sdk
//!
//! Interactive broker and measurement-validation engine for hardware
//! production tests.
//!
//! A test procedure running on a control thread can ask a human operator
//! yes/no questions and block until answered, stream numeric measurements to
//! live dashboards as they are taken, and have every measurement validated
//! against a policy at test teardown, failing the test if any sample is out
//! of bounds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use benchwatch_sdk::{check, Bench, VOLT};
//!
//! let bench = Bench::new();
//!
//! // Observer side (e.g. an SSE endpoint): each subscriber independently
//! // receives every event, starting from a snapshot of settled state.
//! let mut subscription = bench.subscribe();
//!
//! // Test-execution side.
//! let mut session = bench.session("test_adc");
//! if bench.ask("Is the probe connected?") {
//!     session.record("adc", 2.1, VOLT, Some(check::within(1.0, 5.0)));
//! }
//!
//! // Teardown: one aggregated failure iff any measurement was invalid.
//! session.finish()?;
//!
//! while let Some(event) = subscription.try_recv() {
//!     println!("{event:?}");
//! }
//! # Ok::<(), benchwatch_sdk::MeasurementFailure>(())
//! ```
//!
//! ## Features
//!
//! - **Blocking question broker**: condvar-backed waits with a bounded poll
//!   interval; answers persist so repeated questions short-circuit
//! - **Per-subscriber fan-out**: every observer owns its queue; a slow
//!   dashboard can never starve another or block the publisher
//! - **Relative-time timelines**: microsecond offsets from a per-test
//!   origin, re-synchronized process-wide on reset
//! - **Deferred validation**: validator failures (and panics) degrade to
//!   failed measurements, aggregated into one teardown error

mod bench;
mod broadcast;
pub mod check;
mod measure;
mod session;
mod state;

pub use bench::{Bench, BenchBuilder};
pub use broadcast::{Broadcaster, Delivery, Subscription};
pub use check::Validator;
pub use measure::{validate_all, Measurement, MeasurementFailure};
pub use session::TestSession;

// Re-export types for convenience
pub use benchwatch_types::{
    convert, BroadcastEvent, Outcome, TestResultRecord, TimelinePoint, Unit, UnitError, Verdict,
};
pub use benchwatch_types::{
    AMPERE, DEGREE, HERTZ, KILOAMP, KILOHERTZ, KILOVOLT, MEGAHERTZ, MICROSECOND, MILLIAMP,
    MILLISECOND, MILLIVOLT, OHM, SECOND, VOLT,
};
