use crate::commands::nutrition::{percent_of, progress_fill};
use crate::error::{PantryChefError, PantryChefResult};
use crate::state::AppState;
use axum::extract::{Json, State as AxumState};
use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    Free,
    Pro,
    Family,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    pub monthly_price_cents: u32,
    /// `None` means unlimited.
    pub personalization_limit: Option<u32>,
}

impl PlanId {
    pub fn plan(self) -> Plan {
        match self {
            PlanId::Free => Plan {
                id: self,
                name: "Free",
                monthly_price_cents: 0,
                personalization_limit: Some(5),
            },
            PlanId::Pro => Plan {
                id: self,
                name: "Pro",
                monthly_price_cents: 799,
                personalization_limit: Some(100),
            },
            PlanId::Family => Plan {
                id: self,
                name: "Family",
                monthly_price_cents: 1299,
                personalization_limit: None,
            },
        }
    }
}

pub fn plans() -> Vec<Plan> {
    [PlanId::Free, PlanId::Pro, PlanId::Family]
        .into_iter()
        .map(PlanId::plan)
        .collect()
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub plan: PlanId,
    pub used: u32,
    /// End of the current usage period. Unset until the first use or plan change.
    pub renews_on: Option<NaiveDate>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub used: u32,
    pub limit: Option<u32>,
    pub percent: i64,
    pub fill: u8,
    pub resets_on: Option<NaiveDate>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self {
            plan: PlanId::Free,
            used: 0,
            renews_on: None,
        }
    }
}

fn next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(1))
}

impl Subscription {
    /// Starts the first period, or clears usage once `today` reaches the renewal date.
    pub fn roll_over(&mut self, today: NaiveDate) {
        match self.renews_on {
            None => self.renews_on = next_month(today),
            Some(due) if today >= due => {
                let mut next = due;
                while next <= today {
                    match next_month(next) {
                        Some(later) => next = later,
                        None => break,
                    }
                }
                self.used = 0;
                self.renews_on = Some(next);
            }
            Some(_) => {}
        }
    }

    pub fn change_plan(&mut self, plan: PlanId, today: NaiveDate) {
        if plan == self.plan {
            return;
        }
        self.plan = plan;
        self.used = 0;
        self.renews_on = next_month(today);
    }

    /// Drops to the free plan. Usage in the running period still counts.
    pub fn cancel(&mut self) {
        self.plan = PlanId::Free;
    }

    pub fn usage(&self) -> Usage {
        match self.plan.plan().personalization_limit {
            Some(limit) => {
                let percent = percent_of(self.used as f64, limit as f64);
                Usage {
                    used: self.used,
                    limit: Some(limit),
                    percent,
                    fill: progress_fill(percent),
                    resets_on: self.renews_on,
                }
            }
            None => Usage {
                used: self.used,
                limit: None,
                percent: 0,
                fill: 0,
                resets_on: self.renews_on,
            },
        }
    }

    pub fn record_use(&mut self, today: NaiveDate) -> PantryChefResult<Usage> {
        self.roll_over(today);
        if let Some(limit) = self.plan.plan().personalization_limit {
            if self.used >= limit {
                return Err(PantryChefError::QuotaExceeded(format!(
                    "You have used all {} personalizations on the {} plan",
                    limit,
                    self.plan.plan().name
                )));
            }
        }
        self.used += 1;
        Ok(self.usage())
    }
}

// --- Axum handlers ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePlanInput {
    pub plan: PlanId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub subscription: Subscription,
    pub plan: Plan,
    pub usage: Usage,
}

impl From<&Subscription> for SubscriptionView {
    fn from(sub: &Subscription) -> Self {
        Self {
            subscription: sub.clone(),
            plan: sub.plan.plan(),
            usage: sub.usage(),
        }
    }
}

pub async fn get_plans_axum() -> Json<Vec<Plan>> {
    Json(plans())
}

pub async fn get_subscription_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<SubscriptionView>> {
    let mut session = state.session()?;
    session.subscription.roll_over(Utc::now().date_naive());
    Ok(Json(SubscriptionView::from(&session.subscription)))
}

pub async fn change_plan_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<ChangePlanInput>,
) -> PantryChefResult<Json<SubscriptionView>> {
    let mut session = state.session()?;
    session
        .subscription
        .change_plan(input.plan, Utc::now().date_naive());
    tracing::info!("Subscription changed to {:?}", input.plan);
    Ok(Json(SubscriptionView::from(&session.subscription)))
}

pub async fn cancel_subscription_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<SubscriptionView>> {
    let mut session = state.session()?;
    session.subscription.cancel();
    tracing::info!("Subscription cancelled");
    Ok(Json(SubscriptionView::from(&session.subscription)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn free_plan_runs_out() {
        let today = date(2026, 4, 10);
        let mut sub = Subscription::default();
        for _ in 0..5 {
            sub.record_use(today).unwrap();
        }
        let usage = sub.usage();
        assert_eq!(usage.percent, 100);
        assert_eq!(usage.fill, 100);
        assert_eq!(usage.resets_on, Some(date(2026, 5, 10)));
        assert!(matches!(
            sub.record_use(today),
            Err(PantryChefError::QuotaExceeded(_))
        ));
        assert_eq!(sub.used, 5);
    }

    #[test]
    fn quota_comes_back_next_month() {
        let mut sub = Subscription::default();
        for _ in 0..5 {
            sub.record_use(date(2026, 4, 10)).unwrap();
        }
        assert!(sub.record_use(date(2026, 5, 9)).is_err());

        let usage = sub.record_use(date(2026, 5, 10)).unwrap();
        assert_eq!(usage.used, 1);
        assert_eq!(usage.resets_on, Some(date(2026, 6, 10)));
    }

    #[test]
    fn idle_months_are_skipped() {
        let mut sub = Subscription::default();
        sub.record_use(date(2026, 1, 15)).unwrap();
        sub.roll_over(date(2026, 4, 20));
        assert_eq!(sub.used, 0);
        assert_eq!(sub.renews_on, Some(date(2026, 5, 15)));
    }

    #[test]
    fn upgrading_resets_usage_and_sets_renewal() {
        let today = date(2026, 1, 31);
        let mut sub = Subscription::default();
        sub.record_use(today).unwrap();
        sub.change_plan(PlanId::Pro, today);
        assert_eq!(sub.used, 0);
        assert_eq!(sub.renews_on, Some(date(2026, 2, 28)));

        sub.record_use(today).unwrap();
        assert_eq!(sub.usage().percent, 1);
    }

    #[test]
    fn percent_can_exceed_limit_after_downgrade() {
        let today = date(2026, 3, 1);
        let mut sub = Subscription::default();
        sub.change_plan(PlanId::Pro, today);
        for _ in 0..8 {
            sub.record_use(today).unwrap();
        }
        sub.cancel();
        let usage = sub.usage();
        assert_eq!(usage.percent, 160);
        assert_eq!(usage.fill, 100);
        assert!(sub.record_use(today).is_err());
        assert!(sub.record_use(date(2026, 4, 1)).is_ok());
    }

    #[test]
    fn family_plan_is_unlimited() {
        let today = date(2026, 3, 1);
        let mut sub = Subscription::default();
        sub.change_plan(PlanId::Family, today);
        for _ in 0..500 {
            sub.record_use(today).unwrap();
        }
        assert_eq!(sub.usage().limit, None);
    }
}
