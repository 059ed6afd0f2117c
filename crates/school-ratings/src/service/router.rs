use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use super::{AreaRanking, AreaSummary, SchoolService};
use crate::directory::{SchoolDirectory, SchoolRecord};
use crate::error::AppError;
use crate::ranking::{RankCandidate, RankedSchool};
use crate::ratings::{Rating, SchoolMetrics, Urn};
use crate::refresh::{RatingStore, RefreshReport};
use crate::sources::SchoolSource;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankingQuery {
    pub(crate) limit: Option<usize>,
}

/// Router exposing profiles, on-demand ratings, rankings and area summaries.
pub fn rating_router<D>(service: Arc<SchoolService<D>>) -> Router
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    Router::new()
        .route("/api/v1/schools/:urn", get(school_handler::<D>))
        .route("/api/v1/ratings/compute", post(compute_handler::<D>))
        .route("/api/v1/ratings/refresh", post(refresh_handler::<D>))
        .route("/api/v1/rankings", post(rank_handler::<D>))
        .route(
            "/api/v1/areas/:area/rankings",
            get(area_rankings_handler::<D>),
        )
        .route("/api/v1/areas/:area/summary", get(area_summary_handler::<D>))
        .with_state(service)
}

pub(crate) async fn school_handler<D>(
    State(service): State<Arc<SchoolService<D>>>,
    Path(urn): Path<String>,
) -> Result<Json<SchoolRecord>, AppError>
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    Ok(Json(service.school(&Urn::new(urn))?))
}

pub(crate) async fn compute_handler<D>(
    State(service): State<Arc<SchoolService<D>>>,
    Json(metrics): Json<SchoolMetrics>,
) -> Json<Rating>
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    Json(service.compute(&metrics))
}

pub(crate) async fn rank_handler<D>(
    State(service): State<Arc<SchoolService<D>>>,
    Query(query): Query<RankingQuery>,
    Json(candidates): Json<Vec<RankCandidate>>,
) -> Json<Vec<RankedSchool>>
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    Json(service.rank(candidates, query.limit))
}

pub(crate) async fn area_rankings_handler<D>(
    State(service): State<Arc<SchoolService<D>>>,
    Path(area): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<AreaRanking>, AppError>
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    Ok(Json(service.area_rankings(&area, query.limit)?))
}

pub(crate) async fn area_summary_handler<D>(
    State(service): State<Arc<SchoolService<D>>>,
    Path(area): Path<String>,
) -> Result<Json<AreaSummary>, AppError>
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    Ok(Json(service.area_summary(&area)?))
}

/// Runs a refresh pass on the blocking pool. Overlapping requests get 409.
pub(crate) async fn refresh_handler<D>(
    State(service): State<Arc<SchoolService<D>>>,
) -> Result<Json<RefreshReport>, AppError>
where
    D: SchoolDirectory + SchoolSource + RatingStore + 'static,
{
    let report = tokio::task::spawn_blocking(move || service.refresh(Utc::now()))
        .await
        .map_err(axum::Error::new)??;
    Ok(Json(report))
}
