use crate::error::{PantryChefError, PantryChefResult};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A status field whose legal moves are fixed up front.
pub trait Workflow: Copy + Eq + Debug + 'static {
    fn allowed_next(self) -> &'static [Self];

    fn as_str(self) -> &'static str;

    fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next().contains(&next)
    }

    fn is_final(self) -> bool {
        self.allowed_next().is_empty()
    }
}

pub fn transition<S: Workflow>(current: S, next: S) -> PantryChefResult<S> {
    if current.can_transition_to(next) {
        Ok(next)
    } else {
        Err(PantryChefError::InvalidTransition {
            from: current.as_str().to_string(),
            to: next.as_str().to_string(),
        })
    }
}

/// Community recipe submissions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl Workflow for ModerationStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            ModerationStatus::Pending => &[ModerationStatus::Approved, ModerationStatus::Rejected],
            ModerationStatus::Approved | ModerationStatus::Rejected => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

/// Content library entries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Published,
    Removed,
}

impl Workflow for ContentStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            ContentStatus::Draft => &[ContentStatus::Published, ContentStatus::Removed],
            ContentStatus::Published => &[ContentStatus::Removed],
            ContentStatus::Removed => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Removed => "removed",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Draft,
    Scheduled,
    Sent,
}

impl Workflow for NotificationStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            NotificationStatus::Draft => &[NotificationStatus::Sent, NotificationStatus::Scheduled],
            NotificationStatus::Scheduled => &[NotificationStatus::Sent],
            NotificationStatus::Sent => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            NotificationStatus::Draft => "draft",
            NotificationStatus::Scheduled => "scheduled",
            NotificationStatus::Sent => "sent",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdStatus {
    Pending,
    Active,
    Paused,
    Rejected,
    Ended,
}

impl Workflow for AdStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            AdStatus::Pending => &[AdStatus::Active, AdStatus::Rejected],
            AdStatus::Active => &[AdStatus::Paused, AdStatus::Ended],
            AdStatus::Paused => &[AdStatus::Active, AdStatus::Ended],
            AdStatus::Rejected | AdStatus::Ended => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            AdStatus::Pending => "pending",
            AdStatus::Active => "active",
            AdStatus::Paused => "paused",
            AdStatus::Rejected => "rejected",
            AdStatus::Ended => "ended",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Workflow for TicketStatus {
    fn allowed_next(self) -> &'static [Self] {
        match self {
            TicketStatus::Open => &[TicketStatus::InProgress, TicketStatus::Closed],
            TicketStatus::InProgress => &[TicketStatus::Resolved, TicketStatus::Open],
            TicketStatus::Resolved => &[TicketStatus::Closed, TicketStatus::Open],
            TicketStatus::Closed => &[],
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

/// Admin verdict on a pending submission.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Decision {
    Approve {
        #[serde(default)]
        note: Option<String>,
    },
    Reject {
        #[serde(default)]
        reason: String,
    },
}

impl Decision {
    /// Target status plus the trimmed note or reason. A blank rejection reason is refused.
    pub fn resolve(&self) -> PantryChefResult<(ModerationStatus, Option<String>)> {
        match self {
            Decision::Approve { note } => {
                let note = note
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                Ok((ModerationStatus::Approved, note))
            }
            Decision::Reject { reason } => {
                let reason = reason.trim();
                if reason.is_empty() {
                    return Err(PantryChefError::Validation(
                        "Please provide a reason for rejection".to_string(),
                    ));
                }
                Ok((ModerationStatus::Rejected, Some(reason.to_string())))
            }
        }
    }
}
