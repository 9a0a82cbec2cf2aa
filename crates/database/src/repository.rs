use crate::DbError;
use chrono::{DateTime, Utc};
use core_types::{Agency, NewAgency, Report, ReportInput};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

/// A row of `reports` joined with its agency.
#[derive(Debug, FromRow)]
struct ReportRow {
    id: i64,
    name: String,
    check_type: String,
    result: String,
    reference_id: String,
    created_at: DateTime<Utc>,
    agency_id: i64,
    agency_name: String,
    agency_description: String,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Report {
            id: row.id,
            name: row.name,
            check_type: row.check_type,
            result: row.result,
            reference_id: row.reference_id,
            created_at: row.created_at,
            agency: Agency {
                id: row.agency_id,
                name: row.agency_name,
                description: row.agency_description,
            },
        }
    }
}

const SELECT_REPORTS: &str = r#"
    SELECT
        r.id, r.name, r.check_type, r.result, r.reference_id, r.created_at,
        a.id AS agency_id, a.name AS agency_name, a.description AS agency_description
    FROM
        reports AS r
    JOIN
        agencies AS a ON a.id = r.agency_id
"#;

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Releases every pooled connection. Used once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Registers a new agency.
    ///
    /// A duplicate name is rolled back and reported as `DbError::Conflict`.
    pub async fn create_agency(&self, new_agency: &NewAgency) -> Result<Agency, DbError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Agency>(
            "INSERT INTO agencies (name, description) VALUES (?, ?) RETURNING id, name, description",
        )
        .bind(&new_agency.name)
        .bind(&new_agency.description)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(agency) => {
                tx.commit().await?;
                tracing::debug!(agency_id = agency.id, "Agency created.");
                Ok(agency)
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                tracing::debug!(name = %new_agency.name, "Rejected duplicate agency name.");
                Err(DbError::Conflict("name".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetches all agencies in insertion order.
    pub async fn list_agencies(&self) -> Result<Vec<Agency>, DbError> {
        let agencies = sqlx::query_as::<_, Agency>(
            "SELECT id, name, description FROM agencies ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(agencies)
    }

    /// Inserts a report stamped with the current instant and returns it with
    /// its agency embedded.
    ///
    /// The insert is the first statement of the transaction so the write lock is
    /// taken up front; an unknown agency surfaces as a foreign-key violation.
    pub async fn create_report(&self, input: &ReportInput) -> Result<Report, DbError> {
        let mut tx = self.pool.begin().await?;

        let report_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reports (name, check_type, result, reference_id, created_at, agency_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.check_type)
        .bind(&input.result)
        .bind(&input.reference_id)
        .bind(Utc::now())
        .bind(input.agency_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| reference_error(e, input.agency_id))?;

        let report = fetch_report(&mut tx, report_id)
            .await?
            .ok_or(DbError::NotFound)?;
        tx.commit().await?;

        tracing::debug!(report_id, agency_id = input.agency_id, "Report created.");
        Ok(report)
    }

    /// Fetches all reports, each with its agency, in insertion order.
    pub async fn list_reports(&self) -> Result<Vec<Report>, DbError> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!("{SELECT_REPORTS} ORDER BY r.id ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Report::from).collect())
    }

    /// Fetches a single report by id.
    pub async fn get_report(&self, report_id: i64) -> Result<Report, DbError> {
        let mut conn = self.pool.acquire().await?;
        fetch_report(&mut conn, report_id)
            .await?
            .ok_or(DbError::NotFound)
    }

    /// Replaces every mutable field of a report. `id` and `created_at` are kept.
    ///
    /// A missing report is `NotFound` regardless of the agency, since no row is
    /// touched and the foreign key is never checked.
    pub async fn update_report(
        &self,
        report_id: i64,
        input: &ReportInput,
    ) -> Result<Report, DbError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE reports
            SET name = ?, check_type = ?, result = ?, reference_id = ?, agency_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.name)
        .bind(&input.check_type)
        .bind(&input.result)
        .bind(&input.reference_id)
        .bind(input.agency_id)
        .bind(report_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| reference_error(e, input.agency_id))?
        .rows_affected();
        if updated == 0 {
            return Err(DbError::NotFound);
        }

        let report = fetch_report(&mut tx, report_id)
            .await?
            .ok_or(DbError::NotFound)?;
        tx.commit().await?;

        tracing::debug!(report_id, "Report updated.");
        Ok(report)
    }

    /// Removes a report.
    pub async fn delete_report(&self, report_id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(report_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(DbError::NotFound);
        }
        tx.commit().await?;

        tracing::debug!(report_id, "Report deleted.");
        Ok(())
    }
}

async fn fetch_report(
    conn: &mut SqliteConnection,
    report_id: i64,
) -> Result<Option<Report>, DbError> {
    let row = sqlx::query_as::<_, ReportRow>(&format!("{SELECT_REPORTS} WHERE r.id = ?"))
        .bind(report_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(Report::from))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

// An unknown agency is only ever detected by the foreign key on `reports`.
fn reference_error(err: sqlx::Error, agency_id: i64) -> DbError {
    let dangling = err
        .as_database_error()
        .is_some_and(|e| e.is_foreign_key_violation());
    if dangling {
        DbError::InvalidReference(agency_id)
    } else {
        err.into()
    }
}
