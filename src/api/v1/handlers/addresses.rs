/*
 * Responsibility
 * - /regions, /communes, /addresses の handler
 * - address の持ち主は token の subject (body では受けない)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::addresses::{
            AddressResponse, CommuneResponse, CreateAddressRequest, CreateCommuneRequest,
            CreateRegionRequest, RegionResponse,
        },
        extractors::AuthCtxExtractor,
        policy::ensure_owner_or,
    },
    error::AppError,
    repos::{address_repo, error::RepoError, region_repo},
    state::AppState,
};

pub async fn list_regions(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegionResponse>>, AppError> {
    let rows = region_repo::list_regions(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_region(
    State(state): State<AppState>,
    Json(req): Json<CreateRegionRequest>,
) -> Result<(StatusCode, Json<RegionResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = region_repo::create_region(&state.db, req.name.trim())
        .await
        .map_err(|e| match e {
            RepoError::Conflict => AppError::conflict("REGION_EXISTS", "region already exists"),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_communes(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommuneResponse>>, AppError> {
    let rows = region_repo::list_communes(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_communes_by_region(
    State(state): State<AppState>,
    Path(region_id): Path<i64>,
) -> Result<Json<Vec<CommuneResponse>>, AppError> {
    let rows = region_repo::list_communes_by_region(&state.db, region_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_commune(
    State(state): State<AppState>,
    Json(req): Json<CreateCommuneRequest>,
) -> Result<(StatusCode, Json<CommuneResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = region_repo::create_commune(&state.db, req.name.trim(), req.region_id)
        .await
        .map_err(|e| match e {
            RepoError::ForeignKey => AppError::bad_request("UNKNOWN_REGION", "region does not exist"),
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_addresses(
    State(state): State<AppState>,
) -> Result<Json<Vec<AddressResponse>>, AppError> {
    let rows = address_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_user_addresses(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<AddressResponse>>, AppError> {
    ensure_owner_or(&ctx, user_id, &state.policy.user_read)?;

    let rows = address_repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_address(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateAddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = address_repo::create(
        &state.db,
        req.street.trim(),
        req.postal_code.as_deref().map(str::trim),
        ctx.user_id,
        req.commune_id,
    )
    .await
    .map_err(|e| match e {
        RepoError::ForeignKey => {
            AppError::bad_request("UNKNOWN_COMMUNE", "commune does not exist")
        }
        other => other.into(),
    })?;

    tracing::info!(address_id = row.id, user_id = ctx.user_id, "address created");

    Ok((StatusCode::CREATED, Json(row.into())))
}
