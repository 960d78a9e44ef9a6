mod config;
mod feedback;
mod store;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use config::ServiceConfig;
use feedback::generate_feedback;
use llm::LlmClient;
use store::{FeedbackRecord, NewFeedback, ReviewStore};

struct AppState {
    llm: LlmClient,
    store: ReviewStore,
}

#[derive(Deserialize)]
struct SubmitReviewRequest {
    rating: u8,
    user_review: String,
}

#[derive(Deserialize)]
struct ListParams {
    page: Option<usize>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ReviewListResponse {
    total: usize,
    page: usize,
    limit: usize,
    data: Vec<FeedbackRecord>,
}

#[derive(Serialize)]
struct AdminStatsResponse {
    total_reviews: usize,
    avg_rating: f64,
    rating_distribution: BTreeMap<u8, usize>,
    recent_reviews: Vec<FeedbackRecord>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().json().init();

    let config = ServiceConfig::from_env()?;
    let llm = LlmClient::new(config.llm.clone())?;
    let store = ReviewStore::new(&config.store_url, &config.store_key)?;

    let state = Arc::new(AppState { llm, store });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/reviews", post(submit_review).get(list_reviews))
        .route("/api/admin/stats", get(admin_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "feedback service listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "review feedback service",
    })
}

/// Accept a rating + review, generate the three feedback artifacts and
/// persist the full record. Validation happens before any model call.
async fn submit_review(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitReviewRequest>,
) -> Result<Json<FeedbackRecord>, StatusCode> {
    let review = req.user_review.trim().to_string();
    if !(1..=5).contains(&req.rating) || review.is_empty() || review.chars().count() > 1000 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let feedback = generate_feedback(&state.llm, &review, req.rating).await;

    let record = state
        .store
        .insert(NewFeedback {
            rating: req.rating,
            user_review: review,
            ai_response: feedback.response,
            ai_summary: feedback.summary,
            recommended_actions: feedback.actions,
            created_at: store::ist_timestamp(),
        })
        .await
        .map_err(|err| {
            error!(error = %err, "failed to persist review");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(record))
}

async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ReviewListResponse>, StatusCode> {
    let (page, limit, offset) = page_window(params.page, params.limit);

    let total = state.store.count().await.map_err(|err| {
        error!(error = %err, "failed to count reviews");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let data = state.store.list(offset, limit).await.map_err(|err| {
        error!(error = %err, "failed to list reviews");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ReviewListResponse {
        total,
        page,
        limit,
        data,
    }))
}

async fn admin_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdminStatsResponse>, StatusCode> {
    let records = state.store.all_desc().await.map_err(|err| {
        error!(error = %err, "failed to fetch reviews for stats");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(compute_stats(records)))
}

/// Clamp paging parameters (page >= 1, limit 1..=50) and derive the row
/// offset.
fn page_window(page: Option<usize>, limit: Option<usize>) -> (usize, usize, usize) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, 50);
    (page, limit, (page - 1) * limit)
}

/// Aggregate the admin dashboard numbers. An empty store yields zeroed
/// stats, not an error.
fn compute_stats(records: Vec<FeedbackRecord>) -> AdminStatsResponse {
    let total = records.len();
    let avg = if total > 0 {
        records.iter().map(|r| r.rating as f64).sum::<f64>() / total as f64
    } else {
        0.0
    };

    let mut distribution: BTreeMap<u8, usize> = (1..=5).map(|stars| (stars, 0)).collect();
    for record in &records {
        if let Some(count) = distribution.get_mut(&record.rating) {
            *count += 1;
        }
    }

    AdminStatsResponse {
        total_reviews: total,
        avg_rating: (avg * 100.0).round() / 100.0,
        rating_distribution: distribution,
        recent_reviews: records.into_iter().take(20).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rating: u8, created_at: &str) -> FeedbackRecord {
        FeedbackRecord {
            id: format!("id-{rating}-{created_at}"),
            rating,
            user_review: "text".to_string(),
            ai_response: "reply".to_string(),
            ai_summary: "summary".to_string(),
            recommended_actions: "actions".to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn stats_over_known_records() {
        let records = vec![
            record(5, "2025-03-03"),
            record(4, "2025-03-02"),
            record(4, "2025-03-01"),
            record(1, "2025-02-28"),
        ];

        let stats = compute_stats(records);
        assert_eq!(stats.total_reviews, 4);
        assert_eq!(stats.avg_rating, 3.5);
        assert_eq!(stats.rating_distribution[&4], 2);
        assert_eq!(stats.rating_distribution[&3], 0);
        assert_eq!(stats.recent_reviews.len(), 4);
    }

    #[test]
    fn empty_store_yields_zeroed_stats() {
        let stats = compute_stats(Vec::new());
        assert_eq!(stats.total_reviews, 0);
        assert_eq!(stats.avg_rating, 0.0);
        assert!(stats.recent_reviews.is_empty());
        assert_eq!(stats.rating_distribution.len(), 5);
    }

    #[test]
    fn recent_reviews_cap_at_twenty() {
        let records: Vec<FeedbackRecord> =
            (0..30).map(|i| record(3, &format!("2025-01-{i:02}"))).collect();
        let stats = compute_stats(records);
        assert_eq!(stats.total_reviews, 30);
        assert_eq!(stats.recent_reviews.len(), 20);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let records = vec![record(5, "a"), record(4, "b"), record(4, "c")];
        let stats = compute_stats(records);
        assert_eq!(stats.avg_rating, 4.33);
    }

    #[test]
    fn paging_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (1, 10, 0));
        assert_eq!(page_window(Some(3), Some(25)), (3, 25, 50));
        assert_eq!(page_window(Some(0), Some(500)), (1, 50, 0));
        assert_eq!(page_window(Some(2), Some(0)), (2, 1, 1));
    }
}
