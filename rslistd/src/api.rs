//! HTTP API for the rslist daemon.
//!
//! Provides REST endpoints for:
//! - Health check and Prometheus metrics
//! - User registration and event submission
//! - Ranked listing
//! - Voting
//! - Slot purchases and trade history

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use rslist_domain::{Amount, BuySlotCommand, Event, Rank, Trade, User, VoteCommand};
use rslist_service::{RankingService, ServiceError};
use rslist_store::Store;

use crate::metrics::{Metrics, Outcome};

// =============================================================================
// API State
// =============================================================================

/// Shared state for API handlers.
///
/// Mutating handlers take the write lock, so writes are serialized.
pub struct ApiState<S: Store + 'static> {
    pub service: Arc<RwLock<RankingService<S>>>,
    pub metrics: Arc<Metrics>,
    pub default_vote_budget: u32,
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub events: usize,
}

/// Request to register a user.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub vote_budget: Option<u32>,
}

/// A registered user.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub vote_budget: u32,
}

/// Request to submit an event.
#[derive(Debug, Deserialize)]
pub struct SubmitEventRequest {
    pub user_id: Uuid,
    pub name: String,
    pub keyword: String,
}

/// An event as listed.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub keyword: String,
    pub vote_num: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

/// Request to vote for an event.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub user_id: Uuid,
    pub quantity: u32,
    #[serde(default)]
    pub voted_at: Option<DateTime<Utc>>,
}

/// Request to buy a slot for an event.
#[derive(Debug, Deserialize)]
pub struct BuySlotRequest {
    pub amount: Decimal,
    pub rank: u32,
}

/// One past slot purchase.
#[derive(Debug, Serialize, Deserialize)]
pub struct TradeResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub rank: u32,
    pub traded_at: DateTime<Utc>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

// =============================================================================
// Router
// =============================================================================

/// Create the API router.
pub fn create_router<S: Store + 'static>(state: Arc<ApiState<S>>) -> Router {
    Router::new()
        .route("/health", get(health_handler::<S>))
        .route("/metrics", get(metrics_handler::<S>))
        .route("/users", post(register_user_handler::<S>))
        .route("/events", get(list_events_handler::<S>).post(submit_event_handler::<S>))
        .route("/events/:id", get(get_event_handler::<S>))
        .route("/events/:id/votes", post(vote_handler::<S>))
        .route(
            "/events/:id/trades",
            get(trade_history_handler::<S>).post(buy_slot_handler::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
) -> ApiResult<Json<HealthResponse>> {
    let service = state.service.read().await;
    let events = service.event_count().await.map_err(to_error_response)?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        events,
    }))
}

/// Prometheus scrape endpoint.
async fn metrics_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
) -> ApiResult<impl IntoResponse> {
    let body = state.metrics.export().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

/// Register a user.
async fn register_user_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
    Json(req): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let budget = req.vote_budget.unwrap_or(state.default_vote_budget);

    let service = state.service.write().await;
    let user = service
        .register_user(&req.user_name, req.email, budget)
        .await
        .map_err(to_error_response)?;

    Ok((StatusCode::CREATED, Json(user_to_response(user))))
}

/// Submit an event.
async fn submit_event_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
    Json(req): Json<SubmitEventRequest>,
) -> ApiResult<(StatusCode, Json<EventResponse>)> {
    let service = state.service.write().await;
    let event = service
        .submit_event(req.user_id, &req.name, &req.keyword)
        .await
        .map_err(to_error_response)?;

    Ok((StatusCode::CREATED, Json(event_to_response(&event))))
}

/// Ranked list.
async fn list_events_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
) -> ApiResult<Json<Vec<EventResponse>>> {
    let service = state.service.read().await;
    let events = service.list_in_order().await.map_err(to_error_response)?;

    Ok(Json(events.iter().map(event_to_response).collect()))
}

/// Get a single event.
async fn get_event_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<EventResponse>> {
    let service = state.service.read().await;
    let event = service.get_event(id).await.map_err(to_error_response)?;

    Ok(Json(event_to_response(&event)))
}

/// Vote for an event. Responds with the event after the vote.
async fn vote_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<Json<EventResponse>> {
    let command = VoteCommand {
        user_id: req.user_id,
        event_id: id,
        quantity: req.quantity,
        voted_at: req.voted_at.unwrap_or_else(Utc::now),
    };

    let service = state.service.write().await;
    let result = service.vote(command).await;
    state.metrics.record_vote(outcome_of(&result));
    result.map_err(to_error_response)?;

    let event = service.get_event(id).await.map_err(to_error_response)?;
    Ok(Json(event_to_response(&event)))
}

/// Buy a slot for an event. Responds with the event after the purchase.
async fn buy_slot_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
    Path(id): Path<Uuid>,
    Json(req): Json<BuySlotRequest>,
) -> ApiResult<Json<EventResponse>> {
    let command = match (Amount::new(req.amount), Rank::new(req.rank)) {
        (Ok(amount), Ok(rank)) => BuySlotCommand {
            event_id: id,
            amount,
            rank,
        },
        (Err(e), _) | (_, Err(e)) => {
            state.metrics.record_slot_purchase(Outcome::Rejected);
            return Err(to_error_response(e.into()));
        },
    };

    let service = state.service.write().await;
    let result = service.buy_slot(command).await;
    state.metrics.record_slot_purchase(outcome_of(&result));
    result.map_err(to_error_response)?;

    let event = service.get_event(id).await.map_err(to_error_response)?;
    Ok(Json(event_to_response(&event)))
}

/// Purchase ledger of an event, highest amount first.
async fn trade_history_handler<S: Store + 'static>(
    State(state): State<Arc<ApiState<S>>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<TradeResponse>>> {
    let service = state.service.read().await;
    let trades = service.trade_history(id).await.map_err(to_error_response)?;

    Ok(Json(trades.iter().map(trade_to_response).collect()))
}

// =============================================================================
// Helpers
// =============================================================================

fn outcome_of<T>(result: &Result<T, ServiceError>) -> Outcome {
    match result {
        Ok(_) => Outcome::Accepted,
        Err(_) => Outcome::Rejected,
    }
}

fn to_error_response(error: ServiceError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        ServiceError::EventNotFound(_) | ServiceError::UserNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidVote(_)
        | ServiceError::InsufficientBid { .. }
        | ServiceError::Domain(_) => StatusCode::BAD_REQUEST,
        ServiceError::Engine(_) | ServiceError::Store(_) => {
            tracing::error!(error = %error, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        },
    };

    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn user_to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        user_name: user.user_name,
        email: user.email,
        vote_budget: user.vote_budget,
    }
}

fn event_to_response(event: &Event) -> EventResponse {
    EventResponse {
        id: event.id,
        user_id: event.user_id,
        name: event.name.clone(),
        keyword: event.keyword.clone(),
        vote_num: event.vote_num,
        rank: event.rank.map(|r| r.get()),
    }
}

fn trade_to_response(trade: &Trade) -> TradeResponse {
    TradeResponse {
        id: trade.id,
        amount: trade.amount.as_decimal(),
        rank: trade.rank.get(),
        traded_at: trade.traded_at,
    }
}
