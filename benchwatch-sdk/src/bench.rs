//! The main Bench type wiring the broker, timelines, and broadcast together.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use benchwatch_types::{BroadcastEvent, TestResultRecord, TimelinePoint, Unit};
use tracing::{debug, info};

use crate::broadcast::{Broadcaster, Subscription};
use crate::session::TestSession;
use crate::state::BenchState;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The entry point for wiring a production-test run to live observers.
///
/// One `Bench` is constructed per process and cloned (cheaply, by shared
/// reference) into whichever contexts need it: the test-execution thread
/// records measurements and asks operator questions; the transport layer
/// subscribes observers and feeds operator answers back in.
///
/// # Example
///
/// ```rust,no_run
/// use benchwatch_sdk::{check, Bench};
/// use benchwatch_sdk::VOLT;
///
/// let bench = Bench::new();
///
/// // Test-execution side.
/// let mut session = bench.session("test_adc");
/// session.record("vcc", 3.3, VOLT, Some(check::within(3.0, 3.6)));
/// if bench.ask("Is the power LED lit?") {
///     session.record("adc", 2.1, VOLT, Some(check::within(1.0, 5.0)));
/// }
/// session.finish().expect("measurements out of bounds");
/// ```
#[derive(Debug, Clone)]
pub struct Bench {
    state: Arc<BenchState>,
    broadcaster: Broadcaster,
    poll_interval: Duration,
    auto_answer: Option<bool>,
}

impl Bench {
    /// Create a bench with default settings (500 ms poll interval, operator
    /// input required).
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring the bench.
    pub fn builder() -> BenchBuilder {
        BenchBuilder::default()
    }

    /// Ask the operator a yes/no question, blocking until answered.
    ///
    /// Questions are identified by their literal text. A question answered
    /// earlier in the process returns its stored answer immediately; an
    /// unanswered one joins the pending set, is broadcast to observers, and
    /// blocks the calling thread until [`answer`](Bench::answer) records a
    /// response (woken at latest one poll interval after it arrives). There
    /// is no timeout: only process shutdown cancels the wait.
    ///
    /// In headless mode (see [`BenchBuilder::auto_answer`]) every question
    /// returns the configured answer without blocking or broadcasting.
    pub fn ask(&self, question: &str) -> bool {
        if let Some(answer) = self.auto_answer {
            return answer;
        }
        if let Some(answer) = self.state.lookup_answer(question) {
            return answer;
        }

        self.state.mark_pending(question);
        self.publish_input();
        info!(question, "waiting for operator input");
        self.state.wait_for_answer(question, self.poll_interval)
    }

    /// Record the operator's answer to a question.
    ///
    /// Idempotent, and accepted for questions never asked (answers are
    /// pre-seedable). Clears the question from the pending set, wakes any
    /// blocked [`ask`](Bench::ask), and broadcasts the new input state.
    pub fn answer(&self, question: &str, value: bool) {
        self.state.record_answer(question, value);
        debug!(question, value, "operator answer recorded");
        self.publish_input();
    }

    /// Open a measurement session for one test.
    ///
    /// Resets the test's timeline (which also clears every test's origin
    /// timestamp) before any sample is taken, so the session's first tick
    /// lands at offset zero.
    pub fn session(&self, test_id: &str) -> TestSession {
        self.reset(test_id);
        TestSession::new(self.clone(), test_id)
    }

    /// Reset the timeline for `test_id` and broadcast the reset.
    ///
    /// Clears `test_id`'s measurement log and the origin timestamps of
    /// *every* test: relative time is re-synchronized process-wide so
    /// dashboards can show cross-test offsets from a common zero.
    pub fn reset(&self, test_id: &str) {
        self.state.reset_timeline(test_id);
        debug!(test = test_id, "timeline reset");
        self.broadcaster.publish(BroadcastEvent::Reset {
            test: test_id.to_string(),
        });
    }

    /// Stamp one measurement sample onto `test_id`'s timeline and broadcast
    /// it.
    ///
    /// The first tick after a reset sets the test's origin and lands at
    /// offset zero; later ticks carry their offset from that origin in
    /// microseconds.
    pub fn record_tick(&self, test_id: &str, name: &str, value: f64, unit: &Unit) -> TimelinePoint {
        let point = self.state.record_tick(test_id, name, value, unit);
        self.broadcaster.publish(BroadcastEvent::Measurement {
            data: point.clone(),
        });
        point
    }

    /// Store the latest test result record and broadcast it.
    pub fn update_report(&self, record: TestResultRecord) {
        self.state.set_report(record.clone());
        self.broadcaster
            .publish(BroadcastEvent::Report { report: record });
    }

    /// Subscribe a new observer.
    ///
    /// The subscription starts with a snapshot burst (current input state,
    /// plus the last report if one was settled) followed by every event
    /// published from then on. Dropping the subscription unsubscribes it.
    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe_with(|| {
            let mut burst = vec![self.state.input_event()];
            if let Some(report) = self.state.last_report() {
                burst.push(BroadcastEvent::Report { report });
            }
            burst
        })
    }

    /// Questions currently awaiting an operator response.
    pub fn pending_questions(&self) -> Vec<String> {
        self.state.pending_questions()
    }

    /// All answers recorded so far, keyed by question text.
    pub fn answers(&self) -> BTreeMap<String, bool> {
        self.state.answers()
    }

    /// The latest test result record, if any.
    pub fn last_report(&self) -> Option<TestResultRecord> {
        self.state.last_report()
    }

    /// The measurement log for `test_id`, in recording order.
    pub fn timeline(&self, test_id: &str) -> Vec<TimelinePoint> {
        self.state.timeline(test_id)
    }

    fn publish_input(&self) {
        // Built after releasing the question lock; publishers never hold a
        // state-group lock while publishing.
        self.broadcaster.publish(self.state.input_event());
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`Bench`].
#[derive(Debug, Default)]
pub struct BenchBuilder {
    poll_interval: Option<Duration>,
    auto_answer: Option<bool>,
}

impl BenchBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the broker poll interval (default 500 ms).
    ///
    /// Bounds the latency between an answer arriving and a blocked
    /// [`Bench::ask`] observing it.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Run headless: every [`Bench::ask`] returns `answer` immediately.
    ///
    /// For unattended runs with no operator at the bench.
    pub fn auto_answer(mut self, answer: bool) -> Self {
        self.auto_answer = Some(answer);
        self
    }

    /// Build the bench.
    pub fn build(self) -> Bench {
        Bench {
            state: Arc::new(BenchState::default()),
            broadcaster: Broadcaster::new(),
            poll_interval: self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL),
            auto_answer: self.auto_answer,
        }
    }
}
