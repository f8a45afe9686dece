/*
 * Responsibility
 * - /categories, /products の handler
 * - 読み取りは公開、書き込みは catalog_admin
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::dto::catalog::{
        CategoryResponse, CreateCategoryRequest, ProductRequest, ProductResponse,
    },
    error::AppError,
    repos::{error::RepoError, product_repo},
    state::AppState,
};

fn unknown_category(e: RepoError) -> AppError {
    match e {
        RepoError::ForeignKey => {
            AppError::bad_request("UNKNOWN_CATEGORY", "category does not exist")
        }
        other => other.into(),
    }
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let rows = product_repo::list_categories(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = product_repo::create_category(&state.db, req.name.trim())
        .await
        .map_err(|e| match e {
            RepoError::Conflict => {
                AppError::conflict("CATEGORY_EXISTS", "category already exists")
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let rows = product_repo::list(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = product_repo::get(&state.db, product_id)
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = product_repo::create(&state.db, req.fields())
        .await
        .map_err(unknown_category)?;

    tracing::info!(product_id = row.id, "product created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate().map_err(AppError::validation)?;

    let row = product_repo::update(&state.db, product_id, req.fields())
        .await
        .map_err(unknown_category)?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = product_repo::delete(&state.db, product_id)
        .await
        .map_err(|e| match e {
            RepoError::ForeignKey => {
                AppError::conflict("PRODUCT_IN_USE", "product is referenced by sales")
            }
            other => other.into(),
        })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("product"))
    }
}
