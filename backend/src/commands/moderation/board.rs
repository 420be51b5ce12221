//! In-memory admin back-office. Every list is seeded from fixtures and
//! [`AdminBoard::reset`] puts them back, the way a page refresh would.

use super::workflow::{
    transition, AdStatus, ContentStatus, Decision, ModerationStatus, NotificationStatus,
    TicketStatus, Workflow,
};
use crate::error::{PantryChefError, PantryChefResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub trait Record {
    const KIND: &'static str;
    fn id(&self) -> &str;
}

fn find_mut<'a, T: Record>(items: &'a mut [T], id: &str) -> PantryChefResult<&'a mut T> {
    items
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or_else(|| PantryChefError::NotFound(format!("{} '{}'", T::KIND, id)))
}

fn required(value: &str, field: &str) -> PantryChefResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PantryChefError::Validation(format!(
            "Please fill in the {}",
            field
        )));
    }
    Ok(value.to_string())
}

fn counts<S: Workflow>(statuses: impl Iterator<Item = S>) -> BTreeMap<String, usize> {
    let mut map = BTreeMap::new();
    for s in statuses {
        *map.entry(s.as_str().to_string()).or_insert(0) += 1;
    }
    map
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSubmission {
    pub id: String,
    pub title: String,
    pub author: String,
    pub submitted_at: DateTime<Utc>,
    pub status: ModerationStatus,
    pub review_note: Option<String>,
    pub rejection_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub body: String,
    pub status: ContentStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub audience: String,
    pub status: NotificationStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    pub id: String,
    pub advertiser: String,
    pub title: String,
    pub placement: String,
    pub status: AdStatus,
    pub impressions: u64,
    pub clicks: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketReply {
    pub author: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: String,
    pub subject: String,
    pub requester: String,
    pub priority: String,
    pub status: TicketStatus,
    pub replies: Vec<TicketReply>,
    pub updated_at: DateTime<Utc>,
}

impl Record for RecipeSubmission {
    const KIND: &'static str = "Submission";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ContentItem {
    const KIND: &'static str = "Content item";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Notification {
    const KIND: &'static str = "Notification";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Advertisement {
    const KIND: &'static str = "Advertisement";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for SupportTicket {
    const KIND: &'static str = "Ticket";
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    pub title: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub audience: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub submissions: BTreeMap<String, usize>,
    pub content: BTreeMap<String, usize>,
    pub notifications: BTreeMap<String, usize>,
    pub ads: BTreeMap<String, usize>,
    pub tickets: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminBoard {
    pub submissions: Vec<RecipeSubmission>,
    pub content: Vec<ContentItem>,
    pub notifications: Vec<Notification>,
    pub ads: Vec<Advertisement>,
    pub tickets: Vec<SupportTicket>,
}

impl AdminBoard {
    pub fn seeded() -> Self {
        fixtures(Utc::now())
    }

    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    pub fn review_submission(
        &mut self,
        id: &str,
        decision: &Decision,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&RecipeSubmission> {
        let submission = find_mut(&mut self.submissions, id)?;
        let (target, text) = decision.resolve()?;
        submission.status = transition(submission.status, target)?;
        match target {
            ModerationStatus::Rejected => submission.rejection_reason = text,
            _ => submission.review_note = text,
        }
        submission.reviewed_at = Some(now);
        Ok(&*submission)
    }

    pub fn create_content(
        &mut self,
        input: NewContent,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&ContentItem> {
        let title = required(&input.title, "title")?;
        let kind = match input.kind.trim() {
            "" => "article".to_string(),
            k => k.to_lowercase(),
        };
        self.content.push(ContentItem {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            kind,
            body: input.body,
            status: ContentStatus::Draft,
            updated_at: now,
        });
        Ok(&self.content[self.content.len() - 1])
    }

    pub fn set_content_status(
        &mut self,
        id: &str,
        next: ContentStatus,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&ContentItem> {
        let item = find_mut(&mut self.content, id)?;
        item.status = transition(item.status, next)?;
        item.updated_at = now;
        Ok(&*item)
    }

    pub fn create_notification(
        &mut self,
        input: NewNotification,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&Notification> {
        let title = required(&input.title, "title")?;
        let message = required(&input.message, "message")?;
        let audience = match input.audience.trim() {
            "" => "all".to_string(),
            a => a.to_string(),
        };
        self.notifications.push(Notification {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            message,
            audience,
            status: NotificationStatus::Draft,
            scheduled_for: None,
            sent_at: None,
            created_at: now,
        });
        Ok(&self.notifications[self.notifications.len() - 1])
    }

    pub fn send_notification(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&Notification> {
        let notification = find_mut(&mut self.notifications, id)?;
        notification.status = transition(notification.status, NotificationStatus::Sent)?;
        notification.sent_at = Some(now);
        Ok(&*notification)
    }

    pub fn schedule_notification(
        &mut self,
        id: &str,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&Notification> {
        let notification = find_mut(&mut self.notifications, id)?;
        if at <= now {
            return Err(PantryChefError::Validation(
                "Scheduled time must be in the future".to_string(),
            ));
        }
        notification.status = transition(notification.status, NotificationStatus::Scheduled)?;
        notification.scheduled_for = Some(at);
        Ok(&*notification)
    }

    pub fn set_ad_status(&mut self, id: &str, next: AdStatus) -> PantryChefResult<&Advertisement> {
        let ad = find_mut(&mut self.ads, id)?;
        ad.status = transition(ad.status, next)?;
        Ok(&*ad)
    }

    pub fn set_ticket_status(
        &mut self,
        id: &str,
        next: TicketStatus,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&SupportTicket> {
        let ticket = find_mut(&mut self.tickets, id)?;
        ticket.status = transition(ticket.status, next)?;
        ticket.updated_at = now;
        Ok(&*ticket)
    }

    /// Appends a staff reply. An open ticket is picked up (moves to in progress).
    pub fn reply_ticket(
        &mut self,
        id: &str,
        author: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> PantryChefResult<&SupportTicket> {
        let ticket = find_mut(&mut self.tickets, id)?;
        let message = required(message, "reply")?;
        if ticket.status.is_final() {
            return Err(PantryChefError::Validation(
                "This ticket is closed".to_string(),
            ));
        }
        if ticket.status == TicketStatus::Open {
            ticket.status = transition(ticket.status, TicketStatus::InProgress)?;
        }
        let author = match author.trim() {
            "" => "Support".to_string(),
            a => a.to_string(),
        };
        ticket.replies.push(TicketReply {
            author,
            message,
            at: now,
        });
        ticket.updated_at = now;
        Ok(&*ticket)
    }

    pub fn overview(&self) -> AdminOverview {
        AdminOverview {
            submissions: counts(self.submissions.iter().map(|s| s.status)),
            content: counts(self.content.iter().map(|c| c.status)),
            notifications: counts(self.notifications.iter().map(|n| n.status)),
            ads: counts(self.ads.iter().map(|a| a.status)),
            tickets: counts(self.tickets.iter().map(|t| t.status)),
        }
    }
}

fn fixtures(now: DateTime<Utc>) -> AdminBoard {
    let hours_ago = |h: i64| now - Duration::hours(h);

    let submission = |id: &str, title: &str, author: &str, h: i64| RecipeSubmission {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        submitted_at: hours_ago(h),
        status: ModerationStatus::Pending,
        review_note: None,
        rejection_reason: None,
        reviewed_at: None,
    };

    let content = |id: &str, title: &str, kind: &str, status: ContentStatus| ContentItem {
        id: id.to_string(),
        title: title.to_string(),
        kind: kind.to_string(),
        body: String::new(),
        status,
        updated_at: hours_ago(48),
    };

    let ad = |id: &str, advertiser: &str, title: &str, placement: &str, status: AdStatus, imp: u64, clicks: u64| Advertisement {
        id: id.to_string(),
        advertiser: advertiser.to_string(),
        title: title.to_string(),
        placement: placement.to_string(),
        status,
        impressions: imp,
        clicks,
    };

    let ticket = |id: &str, subject: &str, requester: &str, priority: &str, status: TicketStatus| SupportTicket {
        id: id.to_string(),
        subject: subject.to_string(),
        requester: requester.to_string(),
        priority: priority.to_string(),
        status,
        replies: Vec::new(),
        updated_at: hours_ago(6),
    };

    AdminBoard {
        submissions: vec![
            submission("sub-1", "Grandma's Maqluba", "layla.h", 3),
            submission("sub-2", "Five-Minute Hummus", "sam.k", 20),
            submission("sub-3", "Vegan Date Brownies", "noor.a", 30),
        ],
        content: vec![
            content("cnt-1", "Knife Skills 101", "video", ContentStatus::Published),
            content("cnt-2", "Ramadan Meal Prep Guide", "article", ContentStatus::Draft),
            content("cnt-3", "Spring Produce Spotlight", "article", ContentStatus::Draft),
        ],
        notifications: vec![
            Notification {
                id: "ntf-1".to_string(),
                title: "New recipes this week".to_string(),
                message: "Twelve fresh ideas for your pantry staples.".to_string(),
                audience: "all".to_string(),
                status: NotificationStatus::Sent,
                scheduled_for: None,
                sent_at: Some(hours_ago(24)),
                created_at: hours_ago(26),
            },
            Notification {
                id: "ntf-2".to_string(),
                title: "Premium trial ending".to_string(),
                message: "Your trial ends in three days.".to_string(),
                audience: "trial".to_string(),
                status: NotificationStatus::Draft,
                scheduled_for: None,
                sent_at: None,
                created_at: hours_ago(2),
            },
        ],
        ads: vec![
            ad("ad-1", "Olive Grove Co.", "Cold-pressed oil sale", "recipe-sidebar", AdStatus::Active, 18250, 412),
            ad("ad-2", "FreshBox", "First box free", "home-banner", AdStatus::Pending, 0, 0),
            ad("ad-3", "SpiceRoute", "Saffron bundle", "search-results", AdStatus::Paused, 5400, 96),
        ],
        tickets: vec![
            ticket("tkt-1", "Cannot cancel subscription", "maria@example.com", "high", TicketStatus::Open),
            ticket("tkt-2", "Arabic text overlaps on iPad", "omar@example.com", "medium", TicketStatus::InProgress),
            ticket("tkt-3", "Wrong calorie value on Shakshuka", "li@example.com", "low", TicketStatus::Resolved),
        ],
    }
}
