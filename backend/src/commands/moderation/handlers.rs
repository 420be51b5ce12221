use super::board::{
    Advertisement, AdminOverview, ContentItem, NewContent, NewNotification, Notification,
    RecipeSubmission, SupportTicket,
};
use super::workflow::{AdStatus, ContentStatus, Decision, ModerationStatus, TicketStatus, Workflow};
use crate::error::PantryChefResult;
use crate::state::AppState;
use axum::extract::{Json, Query, State as AxumState};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFilter {
    pub status: Option<String>,
}

impl StatusFilter {
    fn keeps(&self, status: &str) -> bool {
        self.status
            .as_deref()
            .map_or(true, |s| s.is_empty() || s.eq_ignore_ascii_case(status))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub id: String,
    #[serde(flatten)]
    pub decision: Decision,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStatusInput {
    pub id: String,
    pub status: ContentStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdInput {
    pub id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub id: String,
    pub at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdStatusInput {
    pub id: String,
    pub status: AdStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStatusInput {
    pub id: String,
    pub status: TicketStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReplyInput {
    pub id: String,
    #[serde(default)]
    pub author: String,
    pub message: String,
}

pub async fn get_overview_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<AdminOverview>> {
    Ok(Json(state.admin()?.overview()))
}

pub async fn reset_board_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<AdminOverview>> {
    let mut board = state.admin()?;
    board.reset();
    tracing::info!("Admin board reloaded from fixtures");
    Ok(Json(board.overview()))
}

pub async fn get_submissions_axum(
    AxumState(state): AxumState<AppState>,
    Query(filter): Query<StatusFilter>,
) -> PantryChefResult<Json<Vec<RecipeSubmission>>> {
    let board = state.admin()?;
    Ok(Json(
        board
            .submissions
            .iter()
            .filter(|s| filter.keeps(s.status.as_str()))
            .cloned()
            .collect(),
    ))
}

pub async fn review_submission_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<ReviewInput>,
) -> PantryChefResult<Json<RecipeSubmission>> {
    let mut board = state.admin()?;
    let reviewed = board
        .review_submission(&input.id, &input.decision, Utc::now())?
        .clone();
    match reviewed.status {
        ModerationStatus::Rejected => tracing::info!(
            "Submission {} rejected: {}",
            reviewed.id,
            reviewed.rejection_reason.as_deref().unwrap_or_default()
        ),
        _ => tracing::info!("Submission {} approved", reviewed.id),
    }
    Ok(Json(reviewed))
}

pub async fn get_content_axum(
    AxumState(state): AxumState<AppState>,
    Query(filter): Query<StatusFilter>,
) -> PantryChefResult<Json<Vec<ContentItem>>> {
    let board = state.admin()?;
    Ok(Json(
        board
            .content
            .iter()
            .filter(|c| filter.keeps(c.status.as_str()))
            .cloned()
            .collect(),
    ))
}

pub async fn create_content_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<NewContent>,
) -> PantryChefResult<Json<ContentItem>> {
    let mut board = state.admin()?;
    let item = board.create_content(input, Utc::now())?.clone();
    tracing::info!("Content draft created: {}", item.id);
    Ok(Json(item))
}

pub async fn set_content_status_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<ContentStatusInput>,
) -> PantryChefResult<Json<ContentItem>> {
    let mut board = state.admin()?;
    let item = board
        .set_content_status(&input.id, input.status, Utc::now())?
        .clone();
    tracing::info!("Content {} is now {:?}", item.id, item.status);
    Ok(Json(item))
}

pub async fn get_notifications_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<Vec<Notification>>> {
    Ok(Json(state.admin()?.notifications.clone()))
}

pub async fn create_notification_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<NewNotification>,
) -> PantryChefResult<Json<Notification>> {
    let mut board = state.admin()?;
    let notification = board.create_notification(input, Utc::now())?.clone();
    tracing::info!("Notification draft created: {}", notification.id);
    Ok(Json(notification))
}

pub async fn send_notification_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<IdInput>,
) -> PantryChefResult<Json<Notification>> {
    let mut board = state.admin()?;
    let notification = board.send_notification(&input.id, Utc::now())?.clone();
    tracing::info!(
        "Notification {} sent to '{}'",
        notification.id,
        notification.audience
    );
    Ok(Json(notification))
}

pub async fn schedule_notification_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<ScheduleInput>,
) -> PantryChefResult<Json<Notification>> {
    let mut board = state.admin()?;
    let notification = board
        .schedule_notification(&input.id, input.at, Utc::now())?
        .clone();
    tracing::info!("Notification {} scheduled for {}", notification.id, input.at);
    Ok(Json(notification))
}

pub async fn get_ads_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<Vec<Advertisement>>> {
    Ok(Json(state.admin()?.ads.clone()))
}

pub async fn set_ad_status_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<AdStatusInput>,
) -> PantryChefResult<Json<Advertisement>> {
    let mut board = state.admin()?;
    let ad = board.set_ad_status(&input.id, input.status)?.clone();
    tracing::info!("Advertisement {} is now {:?}", ad.id, ad.status);
    Ok(Json(ad))
}

pub async fn get_tickets_axum(
    AxumState(state): AxumState<AppState>,
    Query(filter): Query<StatusFilter>,
) -> PantryChefResult<Json<Vec<SupportTicket>>> {
    let board = state.admin()?;
    Ok(Json(
        board
            .tickets
            .iter()
            .filter(|t| filter.keeps(t.status.as_str()))
            .cloned()
            .collect(),
    ))
}

pub async fn set_ticket_status_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<TicketStatusInput>,
) -> PantryChefResult<Json<SupportTicket>> {
    let mut board = state.admin()?;
    let ticket = board
        .set_ticket_status(&input.id, input.status, Utc::now())?
        .clone();
    tracing::info!("Ticket {} is now {:?}", ticket.id, ticket.status);
    Ok(Json(ticket))
}

pub async fn reply_ticket_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<TicketReplyInput>,
) -> PantryChefResult<Json<SupportTicket>> {
    let mut board = state.admin()?;
    let ticket = board
        .reply_ticket(&input.id, &input.author, &input.message, Utc::now())?
        .clone();
    tracing::info!("Reply added to ticket {}", ticket.id);
    Ok(Json(ticket))
}
