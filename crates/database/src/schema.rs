//! Table definitions, applied idempotently at startup.

pub(crate) const CREATE_AGENCIES: &str = r#"
    CREATE TABLE IF NOT EXISTS agencies (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT    NOT NULL UNIQUE,
        description TEXT    NOT NULL
    )
"#;

pub(crate) const CREATE_REPORTS: &str = r#"
    CREATE TABLE IF NOT EXISTS reports (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        name         TEXT    NOT NULL,
        check_type   TEXT    NOT NULL,
        result       TEXT    NOT NULL,
        reference_id TEXT    NOT NULL,
        created_at   TEXT    NOT NULL,
        agency_id    INTEGER NOT NULL REFERENCES agencies (id)
    )
"#;

pub(crate) const CREATE_REPORTS_AGENCY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reports_agency_id ON reports (agency_id)";

pub(crate) const ALL: [&str; 3] = [CREATE_AGENCIES, CREATE_REPORTS, CREATE_REPORTS_AGENCY_INDEX];
