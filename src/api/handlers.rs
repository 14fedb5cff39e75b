use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::request_id::RequestId;
use crate::models::{EligibilityPolicy, Group, Movie, MovieDetails, Opinion};
use crate::services::{
    eligibility::{filter_eligible, policy_counts, PolicyCounts, MIN_SPIN_CHOICES},
    selection::ThreadRandom,
    spin::{spin as run_spin, SpinOutcome},
    stats::{group_stats, GroupStats},
};

use super::{AppState, Member};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetOpinionRequest {
    #[serde(default)]
    pub opinion: Option<Opinion>,
}

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub rating: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReelQuery {
    #[serde(default)]
    pub policy: EligibilityPolicy,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpinRequest {
    #[serde(default)]
    pub policy: EligibilityPolicy,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReelResponse {
    pub policy: EligibilityPolicy,
    pub eligible: Vec<Movie>,
    pub counts: PolicyCounts,
    pub can_spin: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedMovieResponse {
    #[serde(flatten)]
    pub movie: Movie,
    pub average_rating: Option<f64>,
}

impl From<Movie> for WatchedMovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            average_rating: movie.average_rating(),
            movie,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Create a new group owned by the caller
pub async fn create_group(
    State(state): State<AppState>,
    Member(member): Member,
    Json(request): Json<CreateGroupRequest>,
) -> AppResult<(StatusCode, Json<Group>)> {
    let group = state.store.create_group(request.name, member).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> AppResult<Json<Group>> {
    Ok(Json(state.store.get_group(group_id).await?))
}

/// Join a group as the caller
pub async fn join_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Member(member): Member,
) -> AppResult<Json<Group>> {
    Ok(Json(state.store.join_group(group_id, member).await?))
}

/// Leave a group as the caller; 204 when the group was deleted with its last member
pub async fn leave_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Member(member): Member,
) -> AppResult<Response> {
    let response = match state.store.leave_group(group_id, &member).await? {
        Some(group) => Json(group).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Member(member): Member,
) -> AppResult<StatusCode> {
    state.store.delete_group(group_id, &member).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_movies(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.store.list_movies(group_id).await?))
}

/// Suggest a movie to the group
pub async fn add_movie(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Member(member): Member,
    Json(details): Json<MovieDetails>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let movie = state.store.add_movie(group_id, member, details).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn remove_movie(
    State(state): State<AppState>,
    Path((group_id, movie_id)): Path<(Uuid, Uuid)>,
    Member(member): Member,
) -> AppResult<StatusCode> {
    state.store.remove_movie(group_id, movie_id, &member).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Set or clear (`null`) the caller's opinion on a movie
pub async fn set_opinion(
    State(state): State<AppState>,
    Path((group_id, movie_id)): Path<(Uuid, Uuid)>,
    Member(member): Member,
    Json(request): Json<SetOpinionRequest>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .store
        .update_opinion(group_id, movie_id, &member, request.opinion)
        .await?;
    Ok(Json(movie))
}

/// Eligible movies under a policy, with counts for every policy
pub async fn reel(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<ReelQuery>,
) -> AppResult<Json<ReelResponse>> {
    let pool = state.store.unwatched_movies(group_id).await?;
    let counts = policy_counts(&pool);
    let eligible: Vec<Movie> = filter_eligible(&pool, query.policy)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ReelResponse {
        policy: query.policy,
        can_spin: eligible.len() >= MIN_SPIN_CHOICES,
        eligible,
        counts,
    }))
}

/// Draw a winner from the group's unwatched pool
pub async fn spin(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    request: Option<Json<SpinRequest>>,
) -> AppResult<Json<SpinOutcome>> {
    // A bare POST spins with the default policy
    let request = request.map(|Json(r)| r).unwrap_or_default();
    tracing::info!(
        request_id = %request_id,
        group_id = %group_id,
        policy = %request.policy,
        "Processing spin request"
    );

    let pool = state.store.unwatched_movies(group_id).await?;
    let outcome = run_spin(&pool, request.policy, &mut ThreadRandom, &state.reel)?;

    Ok(Json(outcome))
}

/// Confirm the group watched a movie
pub async fn mark_watched(
    State(state): State<AppState>,
    Path((group_id, movie_id)): Path<(Uuid, Uuid)>,
    Member(member): Member,
) -> AppResult<Json<Movie>> {
    Ok(Json(state.store.mark_watched(group_id, movie_id, &member).await?))
}

pub async fn unwatch(
    State(state): State<AppState>,
    Path((group_id, movie_id)): Path<(Uuid, Uuid)>,
    Member(member): Member,
) -> AppResult<Json<Movie>> {
    Ok(Json(state.store.unwatch(group_id, movie_id, &member).await?))
}

pub async fn rate_movie(
    State(state): State<AppState>,
    Path((group_id, movie_id)): Path<(Uuid, Uuid)>,
    Member(member): Member,
    Json(request): Json<RateMovieRequest>,
) -> AppResult<Json<WatchedMovieResponse>> {
    let movie = state
        .store
        .rate_movie(group_id, movie_id, &member, request.rating)
        .await?;
    Ok(Json(movie.into()))
}

pub async fn watch_history(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> AppResult<Json<Vec<WatchedMovieResponse>>> {
    let history = state.store.watch_history(group_id).await?;
    Ok(Json(history.into_iter().map(WatchedMovieResponse::from).collect()))
}

/// Aggregates over the group's watch history
pub async fn stats(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> AppResult<Json<GroupStats>> {
    let history = state.store.watch_history(group_id).await?;
    Ok(Json(group_stats(&history)))
}
