use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

use crate::grid::Slot;

/// Aggregate snapshot for one schedule, as returned by the store's `info`
/// endpoint. Immutable between fetches; replaced wholesale, never merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleInfo {
    #[serde(default)]
    pub name: Option<String>,
    pub count: u32,
    #[serde(default)]
    pub dayhours: HashMap<String, u32>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub blackouts: Option<Vec<String>>,
}

impl ScheduleInfo {
    /// Participation counts keyed by parsed slot. Keys outside the grid are
    /// dropped and logged.
    pub fn slot_counts(&self) -> BTreeMap<Slot, u32> {
        let mut counts = BTreeMap::new();
        for (key, count) in &self.dayhours {
            match Slot::parse(key) {
                Some(slot) => {
                    counts.insert(slot, *count);
                }
                None => {
                    log::warn!("Ignoring invalid slot key {:?} in info response", key);
                }
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// What went wrong talking to the store. Variants map onto the recovery
/// paths the app offers: fatal panel, offline retry screen, name capture,
/// or a plain status-line error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("schedule or user id is missing")]
    MissingIdentifier,
    #[error("schedule not found")]
    UnknownSchedule,
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("display name required")]
    NameRequired,
    #[error("server rejected the request: {0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Connectivity-class failures get the offline screen; everything else
    /// keeps the current view.
    pub fn is_offline(&self) -> bool {
        matches!(self, StoreError::Timeout | StoreError::Network(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StoreError::MissingIdentifier | StoreError::UnknownSchedule
        )
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout
        } else if err.is_decode() {
            StoreError::Malformed(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_decodes_store_response() {
        let json = r#"{
            "name": "league-night",
            "count": 4,
            "users": ["ana", "ben", "cy", "dot"],
            "dayhours": {"M08": 4, "T08": 3, "W08": 2}
        }"#;
        let info: ScheduleInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.count, 4);
        assert_eq!(info.users.len(), 4);
        assert!(!info.is_owner);
        assert!(info.blackouts.is_none());
        assert_eq!(info.slot_counts().len(), 3);
    }

    #[test]
    fn test_info_with_owner_fields() {
        let json = r#"{
            "count": 2,
            "dayhours": {},
            "is_owner": true,
            "blackouts": ["M08", "T09", "W10"]
        }"#;
        let info: ScheduleInfo = serde_json::from_str(json).unwrap();
        assert!(info.is_owner);
        assert_eq!(info.blackouts.as_deref().unwrap().len(), 3);
    }

    #[test]
    fn test_slot_counts_drops_unknown_keys() {
        let json = r#"{"count": 3, "dayhours": {"M08": 2, "M99": 3, "lunch": 1}}"#;
        let info: ScheduleInfo = serde_json::from_str(json).unwrap();
        let counts = info.slot_counts();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.values().copied().sum::<u32>(), 2);
    }

    #[test]
    fn test_timeout_and_network_errors_read_as_offline() {
        assert!(StoreError::Timeout.is_offline());
        assert!(StoreError::Network("connection refused".into()).is_offline());
        assert!(!StoreError::NameRequired.is_offline());
        assert!(!StoreError::Rejected("400".into()).is_offline());
    }

    #[test]
    fn test_missing_identifier_and_unknown_schedule_are_fatal() {
        assert!(StoreError::MissingIdentifier.is_fatal());
        assert!(StoreError::UnknownSchedule.is_fatal());
        assert!(!StoreError::Timeout.is_fatal());
    }
}
