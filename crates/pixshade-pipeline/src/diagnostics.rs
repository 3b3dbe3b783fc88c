//! Per-run diagnostics: stage timings and counts.
//!
//! Permanent instrumentation for parameter tuning — every
//! [`apply_with_diagnostics`](crate::pipeline::AutoShader::apply_with_diagnostics)
//! run collects one [`ShadeDiagnostics`] alongside its result.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since [`std::time::Duration`] does not implement
//! serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Timing and item count for one pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    /// Wall-clock time spent in the stage.
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific count: pixels detected, edge pixels found, or
    /// pixels shaded.
    pub items: usize,
}

/// Diagnostics collected from a single shading run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadeDiagnostics {
    /// Region detection; `items` is the region pixel count.
    pub detect: StageReport,
    /// Region analysis; `items` is the edge pixel count.
    pub analyze: StageReport,
    /// Normal estimation plus shading (they share one pass over the
    /// region); `items` is the number of pixels shaded.
    pub shade: StageReport,
    /// The region's largest distance-to-edge value.
    pub max_distance: f64,
    /// End-to-end wall-clock time.
    #[serde(with = "duration_serde")]
    pub total: Duration,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn durations_serialize_as_seconds() {
        let report = StageReport {
            duration: Duration::from_millis(1500),
            items: 42,
        };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["duration"], serde_json::json!(1.5));
        assert_eq!(json["items"], serde_json::json!(42));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let diagnostics = ShadeDiagnostics {
            detect: StageReport {
                duration: Duration::from_micros(250),
                items: 100,
            },
            analyze: StageReport {
                duration: Duration::from_micros(125),
                items: 36,
            },
            shade: StageReport {
                duration: Duration::from_micros(500),
                items: 100,
            },
            max_distance: 4.0,
            total: Duration::from_micros(875),
        };
        let json = serde_json::to_string(&diagnostics).unwrap();
        let back: ShadeDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(diagnostics, back);
    }

    #[test]
    fn negative_duration_seconds_rejected() {
        let result: Result<StageReport, _> =
            serde_json::from_str(r#"{"duration": -1.0, "items": 0}"#);
        assert!(result.is_err());
    }
}
