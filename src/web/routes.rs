//! HTTP routes
//!
//! Catalog routes return the query rows verbatim. Single-winner queries
//! answer `null` on an empty dataset, every other query answers `[]`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::db::queries::{
    CategoryRanking, CountrySalesRanking, CountrySpend, CountryTopCategory, MonthRanking,
    MonthlySales, ProductRanking, ProductSales, QueryId, TopCustomer, TopSeller, CATALOG_VERSION,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn index() -> &'static str {
    "Bienvenido a la API de Proyecto 1"
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: QueryId,
    pub ruta: &'static str,
    pub descripcion: &'static str,
    pub parametros: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub version: u32,
    pub consultas: Vec<CatalogEntry>,
}

/// GET /consultas
pub async fn catalog() -> Json<CatalogResponse> {
    let consultas = QueryId::ALL
        .into_iter()
        .map(|id| CatalogEntry {
            id,
            ruta: id.route(),
            descripcion: id.description(),
            parametros: id.params(),
        })
        .collect();

    Json(CatalogResponse {
        version: CATALOG_VERSION,
        consultas,
    })
}

#[derive(Debug, Deserialize)]
pub struct CountryFilter {
    pub pais: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub categoria: Option<String>,
}

pub async fn consulta1(State(state): State<Arc<AppState>>) -> ApiResult<Option<TopCustomer>> {
    let row = state.db.top_customer().await.map_err(ApiError::Query)?;
    Ok(Json(row))
}

pub async fn consulta2(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ProductRanking>> {
    let rows = state.db.product_extremes().await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

pub async fn consulta3(State(state): State<Arc<AppState>>) -> ApiResult<Option<TopSeller>> {
    let row = state.db.top_seller().await.map_err(ApiError::Query)?;
    Ok(Json(row))
}

pub async fn consulta4(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CountrySalesRanking>> {
    let rows = state.db.seller_country_extremes().await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

pub async fn consulta5(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CountrySpend>> {
    let rows = state.db.top_buyer_countries().await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

pub async fn consulta6(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CategoryRanking>> {
    let rows = state.db.category_extremes().await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

pub async fn consulta7(State(state): State<Arc<AppState>>) -> ApiResult<Vec<CountryTopCategory>> {
    let rows = state.db.top_category_per_country().await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

pub async fn consulta8(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CountryFilter>,
) -> ApiResult<Vec<MonthlySales>> {
    let country = filter.pais.as_deref().unwrap_or(&state.queries.country);
    let rows = state.db.monthly_country_sales(country).await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

pub async fn consulta9(State(state): State<Arc<AppState>>) -> ApiResult<Vec<MonthRanking>> {
    let rows = state.db.month_extremes().await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

pub async fn consulta10(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CategoryFilter>,
) -> ApiResult<Vec<ProductSales>> {
    let category = filter.categoria.as_deref().unwrap_or(&state.queries.category);
    let rows = state.db.category_product_sales(category).await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

/// GET /crearmodelo
pub async fn create_model(State(state): State<Arc<AppState>>) -> ApiResult<Value> {
    state.db.create_schema().await.map_err(ApiError::Schema)?;
    Ok(Json(json!({ "message": "Modelo creado correctamente" })))
}

/// GET /eliminarmodelo
pub async fn delete_model(State(state): State<Arc<AppState>>) -> ApiResult<Value> {
    state.db.drop_schema().await.map_err(ApiError::Schema)?;
    Ok(Json(json!({ "message": "Modelo eliminado correctamente" })))
}

/// GET /borrarinfodb
pub async fn delete_data(State(state): State<Arc<AppState>>) -> ApiResult<Value> {
    state.db.clear_data().await.map_err(ApiError::Schema)?;
    Ok(Json(json!({ "message": "Informacion eliminada correctamente" })))
}

/// GET /cargarmodelo
pub async fn load_model(State(state): State<Arc<AppState>>) -> ApiResult<Value> {
    tracing::info!("Bulk load requested from {}", state.loader.data_dir().display());
    let report = state.loader.load_model(&state.db).await?;
    Ok(Json(json!({
        "message": "Modelo cargado correctamente",
        "filas": report.filas
    })))
}
