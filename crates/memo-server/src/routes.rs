//! HTTP routes for the memo service.
//!
//! ```text
//! POST   /api/memo        createMemo
//! GET    /api/memo        getMemoList   (scoped)
//! GET    /api/memo/all    getAllMemos   (public)
//! GET    /api/memo/:id    getMemoStats
//! PATCH  /api/memo/:id    patchMemo
//! DELETE /api/memo/:id    deleteMemo
//! GET    /health
//! ```

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use memo_core::{Memo, MemoDraft, MemoId, MemoPatch, MemoStats, MemoStore, Requester};
use memo_service::{require_session, MemoService};
use std::convert::Infallible;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::dto::{ContentRules, ListParams};
use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::session::SessionResolver;

/// Shared state for route handlers
pub struct AppState<S> {
    /// Memo operations
    pub service: MemoService<S>,
    /// Identity provider
    pub sessions: Arc<dyn SessionResolver>,
    /// Body validation rules
    pub content_rules: ContentRules,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            sessions: Arc::clone(&self.sessions),
            content_rules: self.content_rules,
        }
    }
}

impl<S: MemoStore> AppState<S> {
    /// Build state from configuration
    pub fn new(store: S, sessions: Arc<dyn SessionResolver>, config: &ServerConfig) -> Self {
        Self {
            service: MemoService::with_limits(store, config.page_limits()),
            sessions,
            content_rules: ContentRules {
                max_length: config.max_content_length,
            },
        }
    }
}

/// Requester of the current request, resolved once per request
#[derive(Debug, Clone)]
pub struct Session(pub Requester);

#[async_trait]
impl<S: Send + Sync + 'static> FromRequestParts<AppState<S>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session(state.sessions.requester(&parts.headers)))
    }
}

/// Build the router with tracing and CORS layers
pub fn router<S: MemoStore + 'static>(state: AppState<S>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/memo", get(get_memo_list::<S>).post(create_memo::<S>))
        .route("/api/memo/all", get(get_all_memos::<S>))
        .route(
            "/api/memo/:id",
            get(get_memo_stats::<S>)
                .patch(patch_memo::<S>)
                .delete(delete_memo::<S>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// CORS layer for the configured origins. Credentials are always allowed, so a
/// wildcard mirrors the request origin instead of sending `*`.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
}

async fn health() -> ApiResponse<&'static str> {
    ApiResponse::ok("ok")
}

fn parse_id(raw: &str) -> Result<MemoId, ApiError> {
    raw.parse::<MemoId>().map_err(ApiError::from)
}

fn list_params(params: Result<Query<ListParams>, QueryRejection>) -> Result<ListParams, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::invalid(rejection.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid(rejection.body_text()))
}

async fn create_memo<S: MemoStore + 'static>(
    State(state): State<AppState<S>>,
    Session(requester): Session,
    body: Result<Json<MemoDraft>, JsonRejection>,
) -> ApiResult<Memo> {
    // Guarded routes check the session before parsing input.
    require_session(&requester, "createMemo")?;
    let draft = state.content_rules.draft(json_body(body)?)?;
    let memo = state.service.create_memo(&requester, draft).await?;
    Ok(ApiResponse::created(memo))
}

async fn delete_memo<S: MemoStore + 'static>(
    State(state): State<AppState<S>>,
    Session(requester): Session,
    Path(id): Path<String>,
) -> ApiResult<()> {
    require_session(&requester, "deleteMemo")?;
    state.service.delete_memo(&requester, parse_id(&id)?).await?;
    Ok(ApiResponse::empty())
}

async fn patch_memo<S: MemoStore + 'static>(
    State(state): State<AppState<S>>,
    Session(requester): Session,
    Path(id): Path<String>,
    body: Result<Json<MemoPatch>, JsonRejection>,
) -> ApiResult<Memo> {
    require_session(&requester, "patchMemo")?;
    let id = parse_id(&id)?;
    let patch = state.content_rules.patch(json_body(body)?)?;
    let memo = state.service.patch_memo(&requester, id, patch).await?;
    Ok(ApiResponse::ok(memo))
}

async fn get_memo_stats<S: MemoStore + 'static>(
    State(state): State<AppState<S>>,
    Session(requester): Session,
    Path(id): Path<String>,
) -> ApiResult<MemoStats> {
    require_session(&requester, "getMemoStats")?;
    let stats = state
        .service
        .get_memo_stats(&requester, parse_id(&id)?)
        .await?;
    Ok(ApiResponse::ok(stats))
}

async fn get_memo_list<S: MemoStore + 'static>(
    State(state): State<AppState<S>>,
    Session(requester): Session,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Vec<Memo>> {
    let request = list_params(params)?.into_request()?;
    let memos = state.service.get_memo_list(&requester, request).await?;
    Ok(ApiResponse::ok(memos))
}

async fn get_all_memos<S: MemoStore + 'static>(
    State(state): State<AppState<S>>,
    Session(requester): Session,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Vec<Memo>> {
    let request = list_params(params)?.into_request()?;
    let memos = state.service.get_all_memos(&requester, request).await?;
    Ok(ApiResponse::ok(memos))
}
