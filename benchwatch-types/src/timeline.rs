//! Timeline points - stamped measurement samples.

/// One measurement sample stamped with its offset on a test's timeline.
///
/// The offset is relative to the test's origin timestamp (the moment its
/// first sample was recorded after a reset), expressed in microseconds and
/// rounded to three decimal places. Dashboards plot `value` against `time`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelinePoint {
    /// Identity of the test that recorded the sample.
    pub test: String,
    /// Measurement name; "unnamed" when the test did not name it.
    pub name: String,
    /// Raw sample value.
    pub value: f64,
    /// Unit symbol the value was recorded in.
    pub unit: String,
    /// Offset from the test's origin, in microseconds.
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> TimelinePoint {
        TimelinePoint {
            test: "adc_test".to_string(),
            name: "unnamed".to_string(),
            value: 4.5,
            unit: "V".to_string(),
            time: 512.125,
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_flat_keys() {
        let json = serde_json::to_value(point()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "test": "adc_test",
                "name": "unnamed",
                "value": 4.5,
                "unit": "V",
                "time": 512.125,
            })
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn roundtrips() {
        let p = point();
        let json = serde_json::to_string(&p).unwrap();
        let parsed: TimelinePoint = serde_json::from_str(&json).unwrap();
        assert_eq!(p, parsed);
    }
}
