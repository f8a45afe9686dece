/*
 * Responsibility
 * - /sales 系 handler
 * - checkout は services::checkout に委譲 (transaction / 在庫ロック)
 * - 個人の売上参照は所有者 or sales_read
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::sales::{
            CheckoutRequest, CheckoutResponse, DeliveryProofRequest, SaleDetailResponse,
            SaleProductResponse, SaleResponse,
        },
        extractors::AuthCtxExtractor,
        policy::ensure_owner_or,
    },
    error::AppError,
    repos::sale_repo,
    services::checkout,
    state::AppState,
};

pub async fn checkout(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let placed =
        checkout::place_order(&state.db, ctx.user_id, req.address_id, &req.lines()).await?;

    Ok((StatusCode::CREATED, Json(placed.into())))
}

pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Vec<SaleResponse>>, AppError> {
    let rows = sale_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_sale_details(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleDetailResponse>>, AppError> {
    let rows = sale_repo::list_details(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_user_sales(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SaleResponse>>, AppError> {
    ensure_owner_or(&ctx, user_id, &state.policy.sales_read)?;

    let rows = sale_repo::list_by_user(&state.db, user_id).await?;
    if rows.is_empty() {
        return Err(AppError::not_found("sales"));
    }

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_address_sales(
    State(state): State<AppState>,
    Path(address_id): Path<i64>,
) -> Result<Json<Vec<SaleResponse>>, AppError> {
    let rows = sale_repo::list_by_address(&state.db, address_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn list_sale_products(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(sale_id): Path<i64>,
) -> Result<Json<Vec<SaleProductResponse>>, AppError> {
    let sale = sale_repo::get(&state.db, sale_id)
        .await?
        .ok_or(AppError::not_found("sale"))?;
    ensure_owner_or(&ctx, sale.user_id, &state.policy.sales_read)?;

    let rows = sale_repo::products_of_sale(&state.db, sale_id).await?;
    if rows.is_empty() {
        return Err(AppError::not_found("sale products"));
    }

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn upload_proof(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(sale_id): Path<i64>,
    Json(req): Json<DeliveryProofRequest>,
) -> Result<Json<SaleResponse>, AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = sale_repo::set_proof(&state.db, sale_id, req.proof_uri.trim())
        .await?
        .ok_or(AppError::not_found("sale"))?;

    tracing::info!(sale_id, delivered_by = ctx.user_id, "sale delivered");

    Ok(Json(row.into()))
}
