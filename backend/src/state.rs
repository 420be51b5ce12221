use crate::commands::moderation::AdminBoard;
use crate::commands::nutrition::MealLog;
use crate::commands::pantry::{IngredientList, Pantry};
use crate::commands::subscription::Subscription;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::error::{PantryChefError, PantryChefResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
    pub session: Arc<Mutex<SessionState>>, // Single shopper session, rebuilt from fixtures on restart
    pub admin: Arc<Mutex<AdminBoard>>,
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let session = SessionState::new(config.default_language);
        Self {
            pool,
            config: Arc::new(config),
            session: Arc::new(Mutex::new(session)),
            admin: Arc::new(Mutex::new(AdminBoard::seeded())),
        }
    }

    pub fn session(&self) -> PantryChefResult<MutexGuard<'_, SessionState>> {
        self.session
            .lock()
            .map_err(|_| PantryChefError::Internal("session state poisoned".to_string()))
    }

    pub fn admin(&self) -> PantryChefResult<MutexGuard<'_, AdminBoard>> {
        self.admin
            .lock()
            .map_err(|_| PantryChefError::Internal("admin board poisoned".to_string()))
    }

    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let config = AppConfig {
            assistant_delay: crate::config::AssistantDelay::NONE,
            ..AppConfig::default()
        };
        let pool = crate::db::init_pool(&config.database_url)
            .await
            .expect("lazy pool");
        Self::new(pool, config)
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub language: Language,
    pub ingredients: IngredientList,
    pub pantry: Pantry,
    pub meal_log: MealLog,
    pub subscription: Subscription,
}

impl SessionState {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ingredients: IngredientList::default(),
            pantry: Pantry::seeded(),
            meal_log: MealLog::default(),
            subscription: Subscription::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Language {
    pub const SUPPORTED: [Language; 2] = [Language::En, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Language::En => Direction::Ltr,
            Language::Ar => Direction::Rtl,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PantryChefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ar" | "arabic" => Ok(Language::Ar),
            other => Err(PantryChefError::Validation(format!(
                "Unsupported language '{}'",
                other
            ))),
        }
    }
}
