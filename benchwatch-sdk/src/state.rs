//! Internal shared state for a bench process.
//!
//! One `BenchState` exists per process, shared by reference between the
//! question broker, the measurement engine, and the broadcast side. Each
//! logical state group sits behind its own mutex; no group calls into
//! another while holding its lock, so there is no lock ordering to maintain.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use benchwatch_types::{BroadcastEvent, TestResultRecord, TimelinePoint, Unit};
use parking_lot::{Condvar, Mutex};

/// Pending and answered operator questions.
///
/// Answers persist for the process lifetime so repeated identical questions
/// short-circuit without involving the operator again.
#[derive(Debug, Default)]
pub struct QuestionState {
    pub pending: BTreeSet<String>,
    pub answers: BTreeMap<String, bool>,
}

impl QuestionState {
    /// Build the input-state event reflecting this state.
    pub fn input_event(&self) -> BroadcastEvent {
        BroadcastEvent::Input {
            pending: self.pending.iter().cloned().collect(),
            responses: self.answers.clone(),
        }
    }
}

/// Per-test origin timestamps and measurement logs.
#[derive(Debug, Default)]
pub struct TimelineState {
    /// Monotonic origin per test, set on the first tick after a reset.
    pub origins: BTreeMap<String, Instant>,
    /// Ordered measurement log per test.
    pub logs: BTreeMap<String, Vec<TimelinePoint>>,
}

impl TimelineState {
    /// Clear the log for one test and the origins for every test.
    ///
    /// The global origin clear re-synchronizes relative time across all
    /// tests; dashboards rely on it, so it is scoped deliberately wider
    /// than the log clear.
    pub fn reset(&mut self, test_id: &str) {
        self.logs.insert(test_id.to_string(), Vec::new());
        self.origins.clear();
    }

    /// Stamp a sample with its offset from the test's origin and append it.
    pub fn tick(&mut self, test_id: &str, name: &str, value: f64, unit: &Unit) -> TimelinePoint {
        let now = Instant::now();
        let origin = *self.origins.entry(test_id.to_string()).or_insert(now);
        let offset_us = now.duration_since(origin).as_nanos() as f64 / 1_000.0;

        let point = TimelinePoint {
            test: test_id.to_string(),
            name: if name.is_empty() { "unnamed" } else { name }.to_string(),
            value,
            unit: unit.symbol.to_string(),
            time: (offset_us * 1_000.0).round() / 1_000.0,
        };
        self.logs
            .entry(test_id.to_string())
            .or_default()
            .push(point.clone());
        point
    }
}

/// All shared mutable state for one bench process.
#[derive(Debug, Default)]
pub struct BenchState {
    questions: Mutex<QuestionState>,
    /// Signalled whenever an answer is recorded.
    answered: Condvar,
    timelines: Mutex<TimelineState>,
    report: Mutex<Option<TestResultRecord>>,
}

impl BenchState {
    /// Look up a recorded answer without blocking.
    pub fn lookup_answer(&self, question: &str) -> Option<bool> {
        self.questions.lock().answers.get(question).copied()
    }

    /// Add a question to the pending set.
    pub fn mark_pending(&self, question: &str) {
        self.questions.lock().pending.insert(question.to_string());
    }

    /// Record an answer, clear the question from pending, and wake waiters.
    ///
    /// Idempotent; accepting answers for never-asked questions makes them
    /// pre-seedable.
    pub fn record_answer(&self, question: &str, value: bool) {
        {
            let mut q = self.questions.lock();
            q.answers.insert(question.to_string(), value);
            q.pending.remove(question);
        }
        self.answered.notify_all();
    }

    /// Block until an answer for `question` exists, polling at
    /// `poll_interval`.
    ///
    /// The wait is a condvar timed-wait rather than a sleep loop, so an
    /// inbound answer wakes the caller early while worst-case latency stays
    /// at one interval. There is no timeout: operator response time is
    /// unbounded, and only process shutdown cancels the wait.
    pub fn wait_for_answer(&self, question: &str, poll_interval: Duration) -> bool {
        let mut q = self.questions.lock();
        loop {
            if let Some(&answer) = q.answers.get(question) {
                q.pending.remove(question);
                return answer;
            }
            self.answered.wait_for(&mut q, poll_interval);
        }
    }

    /// Build the input-state event for the current question state.
    pub fn input_event(&self) -> BroadcastEvent {
        self.questions.lock().input_event()
    }

    /// Questions currently awaiting an operator.
    pub fn pending_questions(&self) -> Vec<String> {
        self.questions.lock().pending.iter().cloned().collect()
    }

    /// All recorded answers.
    pub fn answers(&self) -> BTreeMap<String, bool> {
        self.questions.lock().answers.clone()
    }

    /// Reset the timeline for `test_id` (and all origins, see
    /// [`TimelineState::reset`]).
    pub fn reset_timeline(&self, test_id: &str) {
        self.timelines.lock().reset(test_id);
    }

    /// Record one timeline tick for `test_id`.
    pub fn record_tick(&self, test_id: &str, name: &str, value: f64, unit: &Unit) -> TimelinePoint {
        self.timelines.lock().tick(test_id, name, value, unit)
    }

    /// The measurement log for `test_id`, in recording order.
    pub fn timeline(&self, test_id: &str) -> Vec<TimelinePoint> {
        self.timelines
            .lock()
            .logs
            .get(test_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Store the latest test result record.
    pub fn set_report(&self, record: TestResultRecord) {
        *self.report.lock() = Some(record);
    }

    /// The latest test result record, if any was reported.
    pub fn last_report(&self) -> Option<TestResultRecord> {
        self.report.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchwatch_types::VOLT;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn record_answer_clears_pending() {
        let state = BenchState::default();
        state.mark_pending("Did the LED turn on?");
        assert_eq!(state.pending_questions(), vec!["Did the LED turn on?"]);

        state.record_answer("Did the LED turn on?", true);
        assert!(state.pending_questions().is_empty());
        assert_eq!(state.lookup_answer("Did the LED turn on?"), Some(true));
    }

    #[test]
    fn record_answer_is_idempotent() {
        let state = BenchState::default();
        state.record_answer("q", true);
        let after_once = (state.pending_questions(), state.answers());
        state.record_answer("q", true);
        assert_eq!((state.pending_questions(), state.answers()), after_once);
    }

    #[test]
    fn answers_are_preseedable() {
        let state = BenchState::default();
        state.record_answer("never asked", false);
        assert_eq!(state.lookup_answer("never asked"), Some(false));
    }

    #[test]
    fn wait_returns_when_answer_arrives_from_other_thread() {
        let state = Arc::new(BenchState::default());
        state.mark_pending("q");

        let answering = Arc::clone(&state);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            answering.record_answer("q", true);
        });

        let started = Instant::now();
        let answer = state.wait_for_answer("q", Duration::from_millis(500));
        handle.join().unwrap();

        assert!(answer);
        // Condvar wakeup, not a full poll interval.
        assert!(started.elapsed() < Duration::from_millis(450));
        assert!(state.pending_questions().is_empty());
    }

    #[test]
    fn first_tick_after_reset_has_zero_offset() {
        let state = BenchState::default();
        state.reset_timeline("adc_test");
        let point = state.record_tick("adc_test", "", 1.0, &VOLT);
        // Within clock-read granularity.
        assert!(point.time < 1_000.0, "offset was {} µs", point.time);
    }

    #[test]
    fn tick_offsets_are_non_decreasing() {
        let state = BenchState::default();
        state.reset_timeline("t");
        let mut last = -1.0;
        for i in 0..10 {
            let point = state.record_tick("t", "", i as f64, &VOLT);
            assert!(point.time >= last);
            last = point.time;
        }
        assert_eq!(state.timeline("t").len(), 10);
    }

    #[test]
    fn tick_defaults_unnamed() {
        let state = BenchState::default();
        let point = state.record_tick("t", "", 1.0, &VOLT);
        assert_eq!(point.name, "unnamed");
        let point = state.record_tick("t", "vcc", 1.0, &VOLT);
        assert_eq!(point.name, "vcc");
    }

    #[test]
    fn reset_clears_origins_for_every_test() {
        let state = BenchState::default();
        state.record_tick("t1", "", 1.0, &VOLT);
        thread::sleep(Duration::from_millis(20));

        // Resetting t2 must also re-origin t1.
        state.reset_timeline("t2");
        let point = state.record_tick("t1", "", 2.0, &VOLT);
        assert!(point.time < 1_000.0, "origin for t1 survived the reset");
    }

    #[test]
    fn reset_scopes_log_clear_to_one_test() {
        let state = BenchState::default();
        state.record_tick("t1", "", 1.0, &VOLT);
        state.record_tick("t2", "", 2.0, &VOLT);

        state.reset_timeline("t2");
        assert_eq!(state.timeline("t1").len(), 1);
        assert!(state.timeline("t2").is_empty());
    }

    #[test]
    fn report_roundtrip() {
        let state = BenchState::default();
        assert!(state.last_report().is_none());

        let record = TestResultRecord::builder("test_led").name("LED").build();
        state.set_report(record.clone());
        assert_eq!(state.last_report(), Some(record));
    }
}
