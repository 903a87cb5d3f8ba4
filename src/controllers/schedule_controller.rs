//! Handlers de horarios
//!
//! Dashboard, disponibilidad, exportación, subida y edición de ubicación de
//! cada clase de vehículo.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::collections::HashSet;
use tracing::{error, info};
use validator::Validate;

use crate::dto::api_response::ApiResponse;
use crate::dto::schedule_dto::{
    DashboardQuery, DashboardResponse, KindInfo, RowView, ScheduleEntryResponse,
    UpdateWhereaboutsRequest, UploadQuery, UploadResponse,
};
use crate::models::{Session, StatusSet, VehicleKind};
use crate::services::authorization_service::can_upload;
use crate::services::availability_view::{compute_availability, identifiers, todays_schedule};
use crate::services::clock::{slot_time, stamp};
use crate::services::schedule_exporter::{export_file_name, export_to_xlsx, XLSX_CONTENT_TYPE};
use crate::services::{ImportError, WhereaboutsUpdate};
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::{parse_identifier_list, validate_status};

const UPLOAD_FIELD: &str = "file";

fn parse_kind(kind: &str) -> AppResult<VehicleKind> {
    kind.parse()
        .map_err(|e: crate::models::vehicle_kind::UnknownVehicleKind| AppError::NotFound(e.to_string()))
}

/// Clases de vehículo con sus columnas y estados
pub async fn list_kinds(State(state): State<AppState>) -> Json<ApiResponse<Vec<KindInfo>>> {
    let kinds = VehicleKind::ALL
        .iter()
        .map(|&kind| KindInfo {
            kind,
            display_name: kind.display_name(),
            time_boxed: kind.is_time_boxed(),
            required_columns: kind.required_columns(),
            statuses: state.statuses(kind),
        })
        .collect();

    Json(ApiResponse::success(kinds))
}

/// Vista del dashboard. Un fallo del store no rompe la pantalla: se devuelve
/// 200 con `load_error` y tablas vacías.
pub async fn dashboard(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let kind = parse_kind(&kind)?;
    let statuses = state.statuses(kind);
    let now = state.clock.now();
    let now_hhmm = slot_time(&now);
    let mut response = DashboardResponse::empty(kind, stamp(&now), statuses.clone());

    let rows = match state.store.load(kind).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("❌ No se pudo cargar el horario de {}: {}", kind, e);
            response.load_error = Some(format!("Could not load the {} schedule: {}", kind.display_name(), e));
            return Ok(Json(response));
        }
    };

    if rows.is_empty() {
        response.notice = Some(format!(
            "No {} schedule has been uploaded yet. Please upload a file first.",
            kind.display_name()
        ));
        return Ok(Json(response));
    }

    let filter: Option<HashSet<String>> = query
        .vehicles
        .as_deref()
        .map(parse_identifier_list)
        .filter(|ids| !ids.is_empty())
        .map(|ids| ids.into_iter().collect());

    response.vehicles = identifiers(&rows);
    response.available_now = compute_availability(kind, &statuses, &rows, &now_hhmm)
        .into_iter()
        .map(|row| RowView::new(kind, row))
        .collect();
    response.schedule = todays_schedule(kind, &statuses, &rows, filter.as_ref(), &now_hhmm)
        .iter()
        .map(|entry| ScheduleEntryResponse::new(kind, entry))
        .collect();

    Ok(Json(response))
}

/// Solo las filas disponibles ahora
pub async fn available(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<RowView>>>> {
    let kind = parse_kind(&kind)?;
    let rows = state.store.load(kind).await?;
    let now_hhmm = slot_time(&state.clock.now());

    let available = compute_availability(kind, &state.statuses(kind), &rows, &now_hhmm)
        .into_iter()
        .map(|row| RowView::new(kind, row))
        .collect();

    Ok(Json(ApiResponse::success(available)))
}

pub async fn statuses(State(state): State<AppState>, Path(kind): Path<String>) -> AppResult<Json<StatusSet>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.statuses(kind)))
}

/// Tabla actual como `.xlsx`
pub async fn export(State(state): State<AppState>, Path(kind): Path<String>) -> AppResult<Response> {
    let kind = parse_kind(&kind)?;
    let rows = state.store.load(kind).await?;
    let bytes = export_to_xlsx(kind, &rows).map_err(|e| AppError::Internal(e.to_string()))?;
    let file_name = export_file_name(kind, &state.clock.now().format("%Y-%m-%d").to_string());

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        bytes,
    )
        .into_response())
}

/// Subida de un horario (campo multipart `file`)
pub async fn upload(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<UploadQuery>,
    Extension(session): Extension<Session>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let kind = parse_kind(&kind)?;

    // Sin permiso no se llega a leer el fichero
    if !can_upload(&session) {
        return Err(ImportError::Forbidden(session.username).into());
    }

    let mut upload: Option<(Option<String>, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Could not read uploaded file: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::BadRequest(format!("Multipart field '{}' is required", UPLOAD_FIELD)))?;

    let count = state
        .importer()
        .import_file(&session, kind, file_name.as_deref(), &bytes, query.mode, state.clock.now())
        .await?;

    let message = format!("{} rows imported into the {} schedule", count, kind.display_name());
    Ok(Json(ApiResponse::success_with_message(
        UploadResponse {
            kind,
            mode: query.mode,
            rows_imported: count,
        },
        message,
    )))
}

/// Fila que se editaría ahora; sirve de valores por defecto del formulario
pub async fn target(
    State(state): State<AppState>,
    Path((kind, identifier)): Path<(String, String)>,
) -> AppResult<Json<RowView>> {
    let kind = parse_kind(&kind)?;
    let row = state.editor().target_row(kind, &identifier, state.clock.now()).await?;
    Ok(Json(RowView::new(kind, &row)))
}

pub async fn update_whereabouts(
    State(state): State<AppState>,
    Path((kind, identifier)): Path<(String, String)>,
    Json(request): Json<UpdateWhereaboutsRequest>,
) -> AppResult<Json<ApiResponse<RowView>>> {
    let kind = parse_kind(&kind)?;
    request.validate()?;

    let statuses = state.statuses(kind);
    let status = request.status.trim().to_string();
    if validate_status(&status, &statuses).is_err() {
        return Err(validation_error(
            "status",
            &format!("'{}' is not one of: {}", status, statuses.values().join(", ")),
        ));
    }

    let update = WhereaboutsUpdate {
        current_location: request.current_location.trim().to_string(),
        status,
        remarks: request.remarks.trim().to_string(),
    };

    let row = state
        .editor()
        .update_whereabouts(kind, &identifier, update, state.clock.now())
        .await?;

    info!("✅ Ubicación de {} '{}' guardada", kind, identifier);
    Ok(Json(ApiResponse::success_with_message(
        RowView::new(kind, &row),
        format!("{} '{}' updated", kind.display_name(), identifier),
    )))
}
