// src/explain/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub id: String,
    pub comparison_id: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}
