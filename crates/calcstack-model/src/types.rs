//! Stored calculation record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored expression together with its evaluated result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Expression text as submitted.
    pub expression: String,
    /// Rendered evaluation result.
    pub result: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the last update; equals `created_at` for new records.
    pub updated_at: DateTime<Utc>,
}

impl Calculation {
    /// A new record whose timestamps are both `now`.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        expression: impl Into<String>,
        result: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            expression: expression.into(),
            result: result.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
