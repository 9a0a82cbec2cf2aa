pub mod models;

// Re-export the core types to provide a clean public API.
pub use models::{Agency, NewAgency, Report, ReportInput};
