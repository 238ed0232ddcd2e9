// Photo Diary - Web Server
// REST API with Axum + the single-page diary UI

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use photo_diary::{
    available_dates, build_feed, category_counts, telemetry, AppConfig, Post, PostStore,
    SelectionState, ALL_DIARIES,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state (read-only, so no lock)
#[derive(Clone)]
struct AppState {
    store: Arc<PostStore>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Sidebar entry with its post count
#[derive(Serialize)]
struct TimelineEntry<'a> {
    id: &'a str,
    label: &'a str,
    subtitle: &'a str,
    image: &'a str,
    post_count: usize,
}

/// Date popover contents
#[derive(Serialize)]
struct DatesResponse<'a> {
    all_label: &'static str,
    dates: Vec<&'a str>,
}

/// GET /api/feed query string
#[derive(Debug, Default, Deserialize)]
struct FeedQuery {
    category: Option<String>,
    date: Option<String>,
}

/// Replay query parameters as selection events: date first, then category,
/// so a request carrying both ends up filtered by category.
fn selection_for(store: &PostStore, query: &FeedQuery) -> SelectionState {
    let mut selection = SelectionState::new();

    if let Some(date) = query.date.as_deref().filter(|d| !d.is_empty()) {
        selection.select_date(Some(date));
    }

    if let Some(id) = query.category.as_deref().filter(|c| !c.is_empty()) {
        let label = store.category(id).map(|c| c.label.as_str()).unwrap_or(id);
        selection.select_category(id, label);
    }

    selection
}

fn feed_response(store: &PostStore, selection: &SelectionState) -> Response {
    let feed = build_feed(store, selection);
    (StatusCode::OK, Json(ApiResponse::ok(feed))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/profile - Photographer shown in the sidebar
async fn get_profile(State(state): State<AppState>) -> Response {
    Json(ApiResponse::ok(state.store.profile())).into_response()
}

/// GET /api/timeline - Timeline entries with post counts
async fn get_timeline(State(state): State<AppState>) -> Response {
    let entries: Vec<TimelineEntry> = category_counts(&state.store)
        .into_iter()
        .map(|(category, post_count)| TimelineEntry {
            id: category.id.as_str(),
            label: &category.label,
            subtitle: &category.subtitle,
            image: &category.image,
            post_count,
        })
        .collect();

    Json(ApiResponse::ok(entries)).into_response()
}

/// GET /api/dates - Date popover entries, newest first
async fn get_dates(State(state): State<AppState>) -> Response {
    let response = DatesResponse {
        all_label: ALL_DIARIES,
        dates: available_dates(&state.store),
    };

    Json(ApiResponse::ok(response)).into_response()
}

/// GET /api/feed?category=..&date=.. - Grouped feed for a selection
async fn get_feed(State(state): State<AppState>, Query(query): Query<FeedQuery>) -> Response {
    let selection = selection_for(&state.store, &query);
    feed_response(&state.store, &selection)
}

/// GET /api/categories/:id - Feed filtered by one timeline entry
async fn get_category_feed(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let query = FeedQuery {
        category: Some(id),
        date: None,
    };
    let selection = selection_for(&state.store, &query);
    feed_response(&state.store, &selection)
}

/// GET /api/dates/:date - Feed filtered by one exact date
async fn get_date_feed(State(state): State<AppState>, Path(date): Path<String>) -> Response {
    // Dates contain spaces and commas; accept double-encoded clients too
    let decoded = urlencoding::decode(&date)
        .map(|d| d.into_owned())
        .unwrap_or(date);

    let mut selection = SelectionState::new();
    selection.select_date(Some(decoded.as_str()));
    feed_response(&state.store, &selection)
}

/// GET /api/posts/:id - Single post
async fn get_post(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    match state.store.post(id) {
        Some(post) => (StatusCode::OK, Json(ApiResponse::ok(post))).into_response(),
        None => {
            tracing::debug!(post_id = id, "post not found");
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<&Post>::err(format!("post {} not found", id))),
            )
                .into_response()
        }
    }
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

fn build_router(state: AppState, config: &AppConfig) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/profile", get(get_profile))
        .route("/timeline", get(get_timeline))
        .route("/dates", get(get_dates))
        .route("/dates/:date", get(get_date_feed))
        .route("/feed", get(get_feed))
        .route("/categories/:id", get(get_category_feed))
        .route("/posts/:id", get(get_post))
        .with_state(state);

    // Post images are referenced by root paths ("/placeholder.svg"), so the
    // asset directory is also the fallback
    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(&config.assets_dir))
        .fallback_service(ServeDir::new(&config.assets_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing("info,photo_diary=debug,tower_http=info");

    println!("🌐 Photo Diary - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = AppConfig::from_env();
    let store = config.load_store()?;
    println!(
        "✓ Diary loaded: {} posts, {} timeline entries",
        store.posts().len(),
        store.categories().len()
    );

    let state = AppState {
        store: Arc::new(store),
    };
    let app = build_router(state, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, assets = %config.assets_dir.display(), "server listening");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/feed", addr);
    println!("   UI:  http://{}", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
