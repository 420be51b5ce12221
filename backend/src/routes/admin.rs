use crate::commands::moderation;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/overview", get(moderation::get_overview_axum))
        .route("/api/admin/reset", post(moderation::reset_board_axum))
        // Recipe submissions
        .route(
            "/api/admin/submissions",
            get(moderation::get_submissions_axum),
        )
        .route(
            "/api/admin/submissions/review",
            post(moderation::review_submission_axum),
        )
        // Content
        .route("/api/admin/content", get(moderation::get_content_axum))
        .route(
            "/api/admin/content/create",
            post(moderation::create_content_axum),
        )
        .route(
            "/api/admin/content/status",
            post(moderation::set_content_status_axum),
        )
        // Notifications
        .route(
            "/api/admin/notifications",
            get(moderation::get_notifications_axum),
        )
        .route(
            "/api/admin/notifications/create",
            post(moderation::create_notification_axum),
        )
        .route(
            "/api/admin/notifications/send",
            post(moderation::send_notification_axum),
        )
        .route(
            "/api/admin/notifications/schedule",
            post(moderation::schedule_notification_axum),
        )
        // Advertisements
        .route("/api/admin/ads", get(moderation::get_ads_axum))
        .route(
            "/api/admin/ads/status",
            post(moderation::set_ad_status_axum),
        )
        // Support tickets
        .route("/api/admin/tickets", get(moderation::get_tickets_axum))
        .route(
            "/api/admin/tickets/status",
            post(moderation::set_ticket_status_axum),
        )
        .route(
            "/api/admin/tickets/reply",
            post(moderation::reply_ticket_axum),
        )
}
