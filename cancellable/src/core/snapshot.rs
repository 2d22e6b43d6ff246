//! Point-in-time view of a task.

use super::TaskState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A serializable snapshot of a task's identity and state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    /// Unique task identifier.
    pub id: Uuid,
    /// Optional human-readable label.
    pub name: Option<String>,
    /// State at the time of the snapshot.
    pub state: TaskState,
    /// When the task was constructed.
    pub created_at: DateTime<Utc>,
    /// When the task reached its terminal state, if it has.
    pub settled_at: Option<DateTime<Utc>>,
}

impl TaskSnapshot {
    /// Returns the time spent pending, if the task is terminal.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        self.settled_at
            .map(|settled| (settled - self.created_at).num_milliseconds())
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("id".to_string(), serde_json::json!(self.id.to_string()));
        map.insert("state".to_string(), serde_json::json!(self.state.to_string()));
        map.insert(
            "created_at".to_string(),
            serde_json::json!(self.created_at.to_rfc3339()),
        );

        if let Some(ref name) = self.name {
            map.insert("name".to_string(), serde_json::json!(name));
        }
        if let Some(settled_at) = self.settled_at {
            map.insert("settled_at".to_string(), serde_json::json!(settled_at.to_rfc3339()));
        }
        if let Some(duration) = self.duration_ms() {
            map.insert("duration_ms".to_string(), serde_json::json!(duration));
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn snapshot(settled: bool) -> TaskSnapshot {
        let created_at = Utc::now();
        TaskSnapshot {
            id: Uuid::new_v4(),
            name: Some("download".to_string()),
            state: if settled { TaskState::Fulfilled } else { TaskState::Pending },
            created_at,
            settled_at: settled.then(|| created_at + Duration::milliseconds(250)),
        }
    }

    #[test]
    fn test_pending_snapshot_to_dict() {
        let snap = snapshot(false);
        let dict = snap.to_dict();

        assert_eq!(dict.get("state").unwrap(), "pending");
        assert_eq!(dict.get("name").unwrap(), "download");
        assert!(dict.get("settled_at").is_none());
        assert!(dict.get("duration_ms").is_none());
    }

    #[test]
    fn test_settled_snapshot_duration() {
        let snap = snapshot(true);
        assert_eq!(snap.duration_ms(), Some(250));

        let dict = snap.to_dict();
        assert_eq!(dict.get("duration_ms").unwrap(), 250);
        assert_eq!(dict.get("state").unwrap(), "fulfilled");
    }

    #[test]
    fn test_snapshot_serde() {
        let snap = snapshot(true);
        let json = serde_json::to_string(&snap).unwrap();
        let parsed: TaskSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snap);
    }
}
