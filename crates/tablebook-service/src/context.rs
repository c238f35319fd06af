//! Request context carrying the correlation trace ID through every
//! engine call.
//!
//! The identifier is an explicit value threaded through service
//! methods, so the engine has no hidden global state and tests need no
//! request machinery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for one logical operation against the reservation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Correlation identifier attached to every log line.
    pub trace_id: Uuid,
    /// The acting user, when the call originates from a request.
    /// Sweeper runs have no user.
    pub user_id: Option<Uuid>,
    /// When the operation started.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a customer- or owner-initiated call.
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            user_id: Some(user_id),
            request_time: Utc::now(),
        }
    }

    /// Context for a scheduler-initiated run.
    pub fn system() -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            user_id: None,
            request_time: Utc::now(),
        }
    }
}
