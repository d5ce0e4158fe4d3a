//! Per-frame observations delivered by the face detector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An instantaneous "is the subject smiling" observation for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmileSignal {
    pub is_smiling: bool,
    pub observed_at: DateTime<Utc>,
}

impl SmileSignal {
    pub const fn new(is_smiling: bool, observed_at: DateTime<Utc>) -> Self {
        Self {
            is_smiling,
            observed_at,
        }
    }
}

/// A single face found in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub has_smile: bool,
}

/// Every face the detector reported for one captured frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceFrame {
    #[serde(default)]
    pub faces: Vec<DetectedFace>,
    pub observed_at: DateTime<Utc>,
}

impl FaceFrame {
    /// Reduces the frame to a single smile signal.
    ///
    /// Faces are visited in detector order and the last one wins. A frame
    /// with no faces produces no signal, so it leaves the session untouched.
    pub fn signal(&self) -> Option<SmileSignal> {
        self.faces
            .last()
            .map(|face| SmileSignal::new(face.has_smile, self.observed_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        "2025-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn empty_frame_yields_no_signal() {
        let frame = FaceFrame {
            faces: Vec::new(),
            observed_at: at(),
        };
        assert_eq!(frame.signal(), None);
    }

    #[test]
    fn last_face_wins() {
        let frame = FaceFrame {
            faces: vec![
                DetectedFace { has_smile: true },
                DetectedFace { has_smile: false },
            ],
            observed_at: at(),
        };
        assert_eq!(frame.signal(), Some(SmileSignal::new(false, at())));
    }

    #[test]
    fn signal_parses_from_json() {
        let json = r#"{"is_smiling":true,"observed_at":"2025-01-01T00:00:00Z"}"#;
        let signal: SmileSignal = serde_json::from_str(json).unwrap();
        assert!(signal.is_smiling);
        assert_eq!(signal.observed_at, at());
    }

    #[test]
    fn signal_requires_timestamp() {
        let result: Result<SmileSignal, _> = serde_json::from_str(r#"{"is_smiling":true}"#);
        assert!(result.is_err());
    }
}
