//! Broadcast events - the wire schema observers consume.

use std::collections::BTreeMap;

use crate::{TestResultRecord, TimelinePoint};

/// A state-change event fanned out to every connected observer.
///
/// Events are immutable once published. For a single origin, observers see
/// events in publish order; no ordering is guaranteed across origins.
///
/// With the `serde` feature enabled, events serialize with an internal
/// `"type"` tag, which is the shape streaming transports put on the wire:
///
/// ```json
/// {"type": "input", "pending": ["Did the LED turn on?"], "responses": {}}
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum BroadcastEvent {
    /// Operator-input state changed: a question was asked or answered.
    Input {
        /// Questions currently awaiting an operator response.
        pending: Vec<String>,
        /// All answers recorded so far, keyed by question text.
        responses: BTreeMap<String, bool>,
    },
    /// A measurement sample was recorded on a test's timeline.
    Measurement {
        /// The stamped sample.
        data: TimelinePoint,
    },
    /// The latest test result record changed.
    Report {
        /// The record in its final (or latest known) state.
        report: TestResultRecord,
    },
    /// A test's timeline was reset.
    Reset {
        /// Identity of the test whose timeline was cleared.
        test: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "serde")]
    #[test]
    fn input_event_wire_shape() {
        let event = BroadcastEvent::Input {
            pending: vec!["Did the LED turn on?".to_string()],
            responses: BTreeMap::from([("Are you ready?".to_string(), true)]),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "input",
                "pending": ["Did the LED turn on?"],
                "responses": {"Are you ready?": true},
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn measurement_event_wire_shape() {
        let event = BroadcastEvent::Measurement {
            data: TimelinePoint {
                test: "adc_test".to_string(),
                name: "unnamed".to_string(),
                value: 2.0,
                unit: "V".to_string(),
                time: 500123.456,
            },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "measurement");
        assert_eq!(json["data"]["test"], "adc_test");
        assert_eq!(json["data"]["time"], 500123.456);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn reset_event_wire_shape() {
        let event = BroadcastEvent::Reset {
            test: "adc_test".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"type": "reset", "test": "adc_test"})
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn report_event_roundtrips() {
        let event = BroadcastEvent::Report {
            report: TestResultRecord::builder("test_led")
                .name("LED")
                .failed("Operator reported LED did not turn on")
                .build(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let parsed: BroadcastEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
