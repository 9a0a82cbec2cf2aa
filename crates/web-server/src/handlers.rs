use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use core_types::{Agency, NewAgency, Report, ReportInput};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// A JSON body whose shape errors are reported through `AppError`.
type JsonBody<T> = WithRejection<Json<T>, AppError>;
/// The `{report_id}` segment, rejected with 422 when it is not an integer.
type ReportId = WithRejection<Path<i64>, AppError>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// # GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// # POST /agencies/
pub async fn create_agency(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(new_agency), _): JsonBody<NewAgency>,
) -> Result<(StatusCode, Json<Agency>), AppError> {
    let agency = state.db_repo.create_agency(&new_agency).await?;
    Ok((StatusCode::CREATED, Json(agency)))
}

/// # GET /agencies/
pub async fn list_agencies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Agency>>, AppError> {
    let agencies = state.db_repo.list_agencies().await?;
    Ok(Json(agencies))
}

/// # POST /reports/
/// The referenced agency must already exist.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(input), _): JsonBody<ReportInput>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    let report = state.db_repo.create_report(&input).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// # GET /reports/
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Report>>, AppError> {
    let reports = state.db_repo.list_reports().await?;
    Ok(Json(reports))
}

/// # GET /reports/:report_id
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(report_id), _): ReportId,
) -> Result<Json<Report>, AppError> {
    let report = state.db_repo.get_report(report_id).await?;
    Ok(Json(report))
}

/// # PUT /reports/:report_id
/// Full replacement: every field of the create body is required.
pub async fn update_report(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(report_id), _): ReportId,
    WithRejection(Json(input), _): JsonBody<ReportInput>,
) -> Result<Json<Report>, AppError> {
    let report = state.db_repo.update_report(report_id, &input).await?;
    Ok(Json(report))
}

/// # DELETE /reports/:report_id
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(report_id), _): ReportId,
) -> Result<Json<Value>, AppError> {
    state.db_repo.delete_report(report_id).await?;
    Ok(Json(json!({ "detail": "Report deleted successfully" })))
}
