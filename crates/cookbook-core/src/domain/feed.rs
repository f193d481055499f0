use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldErrors;

const MAX_STATUS_LEN: usize = 255;

/// Profile status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFeedItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status_text: String,
    /// Set once on creation, never changed.
    pub created_on: DateTime<Utc>,
}

impl ProfileFeedItem {
    pub fn new(user_id: Uuid, status_text: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            status_text,
            created_on: Utc::now(),
        }
    }
}

/// Validate status text into `errors`.
pub fn validate_status_text(text: &str, errors: &mut FieldErrors) {
    if text.trim().is_empty() {
        errors.add("status_text", "This field may not be blank.");
    } else if text.chars().count() > MAX_STATUS_LEN {
        errors.add(
            "status_text",
            "Ensure this field has no more than 255 characters.",
        );
    }
}
