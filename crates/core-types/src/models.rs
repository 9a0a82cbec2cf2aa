use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An organisation that issues or is associated with reports (e.g., a credit bureau).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Agency {
    pub id: i64,
    /// Unique across all agencies.
    pub name: String,
    pub description: String,
}

/// The request body accepted when registering a new agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgency {
    pub name: String,
    pub description: String,
}

/// The request body for both creating and fully replacing a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInput {
    /// The subject of the report.
    pub name: String,
    /// Free-form category label (e.g., "Credit").
    pub check_type: String,
    pub result: String,
    /// Caller-supplied correlation id. Not unique and never used as a key.
    pub reference_id: String,
    pub agency_id: i64,
}

/// A report as returned to clients, with its owning agency embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub name: String,
    pub check_type: String,
    pub result: String,
    pub reference_id: String,
    /// Set once at insertion, never touched by updates.
    pub created_at: DateTime<Utc>,
    pub agency: Agency,
}
