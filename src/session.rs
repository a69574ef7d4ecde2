use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LAP_DISTANCE;
use crate::lap::Lap;

/// Persisted state of one run. Instants are epoch milliseconds, durations are
/// milliseconds with paused intervals excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub laps: Vec<Lap>,
    pub lap_distance: f64,
    pub start_time: Option<i64>,
    pub is_running: bool,
    pub current_lap_start_time: Option<i64>,
    pub elapsed_time: u64,
    pub current_lap_time: u64,
}

impl Session {
    pub fn new(lap_distance: f64) -> Self {
        Self {
            laps: Vec::new(),
            lap_distance,
            start_time: None,
            is_running: false,
            current_lap_start_time: None,
            elapsed_time: 0,
            current_lap_time: 0,
        }
    }

    pub fn has_started(&self) -> bool {
        self.start_time.is_some() || self.elapsed_time > 0
    }

    pub fn has_laps(&self) -> bool {
        !self.laps.is_empty()
    }

    /// Sum of the recorded lap times.
    pub fn laps_time(&self) -> u64 {
        self.laps.iter().map(|lap| lap.time).sum()
    }

    /// Decode a stored session. A reload never resumes live counting.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        let mut session: Session = serde_json::from_slice(bytes)?;
        session.is_running = false;
        Ok(session)
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_LAP_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session() {
        let session = Session::default();

        assert!(session.laps.is_empty());
        assert_eq!(session.lap_distance, 200.0);
        assert!(!session.is_running);
        assert!(!session.has_started());
        assert!(!session.has_laps());
    }

    #[test]
    fn test_from_json_forces_paused() {
        let mut session = Session::new(400.0);
        session.is_running = true;
        session.start_time = Some(1_000);
        session.elapsed_time = 5_000;
        session.current_lap_time = 5_000;

        let bytes = session.to_json().unwrap();
        let restored = Session::from_json(&bytes).unwrap();

        assert!(!restored.is_running);
        assert_eq!(restored.start_time, Some(1_000));
        assert_eq!(restored.elapsed_time, 5_000);
        assert_eq!(restored.lap_distance, 400.0);
    }

    #[test]
    fn test_from_json_reads_camel_case_record() {
        let json = br#"{
            "laps": [{"lapNumber": 1, "time": 60000, "distance": 200, "pace": 300, "speed": 12}],
            "lapDistance": 200,
            "startTime": 1700000000000,
            "isRunning": true,
            "currentLapStartTime": 1700000060000,
            "elapsedTime": 61000,
            "currentLapTime": 1000
        }"#;

        let session = Session::from_json(json).unwrap();

        assert_eq!(session.laps.len(), 1);
        assert_eq!(session.laps[0].time, 60_000);
        assert_eq!(session.laps_time(), 60_000);
        assert!(!session.is_running);
        assert!(session.has_started());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Session::from_json(b"not json").is_err());
    }
}
