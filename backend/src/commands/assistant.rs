//! Canned recipe-personalization replies.
//!
//! No model is called. The prompt is lower-cased and checked for keyword
//! substrings in a fixed order; the first topic that matches wins, otherwise
//! the general reply is used. A configurable random delay stands in for
//! network latency.

use crate::commands::recipe::{catalogue, find_recipe};
use crate::commands::subscription::Usage;
use crate::config::AssistantDelay;
use crate::error::{PantryChefError, PantryChefResult};
use crate::state::{AppState, Direction, Language};
use axum::extract::{Json, State as AxumState};
use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Vegetarian,
    Healthy,
    DairyFree,
    Quick,
    General,
}

const KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Vegetarian,
        &["vegetarian", "vegan", "meatless", "plant-based", "نباتي"],
    ),
    (
        Topic::Healthy,
        &[
            "healthy",
            "low calorie",
            "low-calorie",
            "lighter",
            "light version",
            "صحي",
        ],
    ),
    (
        Topic::DairyFree,
        &["dairy-free", "dairy free", "lactose", "no milk", "بدون حليب"],
    ),
    (
        Topic::Quick,
        &["quick", "faster", "fast recipe", "in a hurry", "سريع"],
    ),
];

pub fn detect_topic(input: &str) -> Topic {
    let text = input.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| text.contains(w)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::General)
}

pub fn canned_response(topic: Topic, language: Language) -> &'static str {
    match (topic, language) {
        (Topic::Vegetarian, Language::En) => {
            "Here is a vegetarian take on this recipe.\n\n\
             Swap the meat for chickpeas or firm tofu and brown them well so they keep their bite. \
             Use vegetable stock in place of chicken stock, and add a spoon of smoked paprika for depth.\n\n\
             Finish with toasted nuts or seeds for extra protein."
        }
        (Topic::Vegetarian, Language::Ar) => {
            "إليك نسخة نباتية من هذه الوصفة.\n\n\
             استبدل اللحم بالحمص أو التوفو الصلب وحمّره جيداً ليحافظ على قوامه. \
             استخدم مرق الخضار بدلاً من مرق الدجاج، وأضف ملعقة من البابريكا المدخنة لنكهة أعمق.\n\n\
             زيّن الطبق بالمكسرات أو البذور المحمصة لمزيد من البروتين."
        }
        (Topic::Healthy, Language::En) => {
            "Here is a lighter version of this recipe.\n\n\
             Cut the oil in half and roast instead of frying. Double the vegetables, \
             use whole-grain rice or pasta, and swap cream for plain yogurt.\n\n\
             This trims roughly a third of the calories while keeping the flavour."
        }
        (Topic::Healthy, Language::Ar) => {
            "إليك نسخة أخف من هذه الوصفة.\n\n\
             قلّل الزيت إلى النصف واشوِ المكونات في الفرن بدلاً من القلي. ضاعف كمية الخضار، \
             واستخدم الأرز أو المعكرونة من الحبوب الكاملة، واستبدل الكريمة باللبن الزبادي.\n\n\
             هذا يقلل السعرات بنحو الثلث مع الحفاظ على النكهة."
        }
        (Topic::DairyFree, Language::En) => {
            "Here is a dairy-free version of this recipe.\n\n\
             Use oat or almond milk in place of milk, and coconut cream wherever cream is called for. \
             Olive oil replaces butter, and nutritional yeast gives a cheesy finish.\n\n\
             Check stock cubes and bread for hidden milk powder."
        }
        (Topic::DairyFree, Language::Ar) => {
            "إليك نسخة خالية من الألبان من هذه الوصفة.\n\n\
             استخدم حليب الشوفان أو اللوز بدلاً من الحليب، وكريمة جوز الهند بدلاً من الكريمة. \
             زيت الزيتون يحل محل الزبدة، والخميرة الغذائية تمنح نكهة تشبه الجبن.\n\n\
             تحقق من مكعبات المرق والخبز لاحتمال احتوائها على حليب مجفف."
        }
        (Topic::Quick, Language::En) => {
            "Here is a faster way to make this recipe.\n\n\
             Use canned beans and pre-cut vegetables, cook the grains while you prep, \
             and finish everything in one wide pan over high heat.\n\n\
             You can have it on the table in about 20 minutes."
        }
        (Topic::Quick, Language::Ar) => {
            "إليك طريقة أسرع لتحضير هذه الوصفة.\n\n\
             استخدم البقوليات المعلبة والخضار المقطعة مسبقاً، واطهُ الحبوب أثناء التحضير، \
             ثم أنهِ الطهي في مقلاة واسعة على نار عالية.\n\n\
             يمكن أن يكون الطبق جاهزاً خلال 20 دقيقة تقريباً."
        }
        (Topic::General, Language::En) => {
            "Here are a few ideas to make this recipe your own.\n\n\
             Adjust the spice level to taste, use whatever fresh herbs you have, \
             and swap in seasonal vegetables from your pantry.\n\n\
             Tell me if you want it vegetarian, healthier, dairy-free or quicker."
        }
        (Topic::General, Language::Ar) => {
            "إليك بعض الأفكار لتجعل هذه الوصفة على ذوقك.\n\n\
             عدّل مستوى التوابل حسب رغبتك، واستخدم الأعشاب الطازجة المتوفرة لديك، \
             وأضف الخضار الموسمية من مخزنك.\n\n\
             أخبرني إن كنت تريدها نباتية أو صحية أو خالية من الألبان أو أسرع."
        }
    }
}

pub fn select_response(input: &str, language: Language) -> (Topic, &'static str) {
    let topic = detect_topic(input);
    (topic, canned_response(topic, language))
}

pub fn pick_delay(delay: AssistantDelay) -> Duration {
    let ms = if delay.max_ms > delay.min_ms {
        rand::rng().random_range(delay.min_ms..=delay.max_ms)
    } else {
        delay.min_ms
    };
    Duration::from_millis(ms)
}

// --- Axum handler ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeInput {
    pub prompt: String,
    pub recipe_id: Option<String>,
    /// Falls back to the session language.
    pub language: Option<Language>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub topic: Topic,
    pub recipe_title: Option<String>,
    pub text: String,
    pub language: Language,
    pub direction: Direction,
    pub latency_ms: u64,
    pub usage: Usage,
}

pub async fn personalize_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<PersonalizeInput>,
) -> PantryChefResult<Json<AssistantReply>> {
    if input.prompt.trim().is_empty() {
        return Err(PantryChefError::Validation(
            "Please describe how you want the recipe changed".to_string(),
        ));
    }

    let recipe_title = match input.recipe_id.as_deref() {
        Some(id) => {
            let recipes = catalogue();
            Some(find_recipe(&recipes, id)?.title.clone())
        }
        None => None,
    };

    let (language, usage) = {
        let mut session = state.session()?;
        let language = input.language.unwrap_or(session.language);
        let usage = session.subscription.record_use(Utc::now().date_naive())?;
        (language, usage)
    };

    let (topic, text) = select_response(&input.prompt, language);
    let latency = pick_delay(state.config.assistant_delay);
    tokio::time::sleep(latency).await;

    tracing::info!(
        "Assistant reply topic={:?} lang={} after {}ms",
        topic,
        language,
        latency.as_millis()
    );

    Ok(Json(AssistantReply {
        topic,
        recipe_title,
        text: text.to_string(),
        language,
        direction: language.direction(),
        latency_ms: latency.as_millis() as u64,
        usage,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vegetarian_prompt_gets_vegetarian_reply() {
        let (topic, text) = select_response("I want something vegetarian", Language::En);
        assert_eq!(topic, Topic::Vegetarian);
        assert_eq!(text, canned_response(Topic::Vegetarian, Language::En));

        let (_, arabic) = select_response("I want something vegetarian", Language::Ar);
        assert_eq!(arabic, canned_response(Topic::Vegetarian, Language::Ar));
        assert_ne!(text, arabic);
    }

    #[test]
    fn matching_is_case_insensitive_and_ordered() {
        assert_eq!(detect_topic("HEALTHY please"), Topic::Healthy);
        // vegetarian is checked before dairy-free
        assert_eq!(detect_topic("dairy-free and vegan"), Topic::Vegetarian);
        assert_eq!(detect_topic("make it Dairy Free"), Topic::DairyFree);
        assert_eq!(detect_topic("something quick"), Topic::Quick);
        assert_eq!(detect_topic("أريد وصفة صحية"), Topic::Healthy);
    }

    #[test]
    fn words_containing_short_keywords_do_not_match() {
        assert_eq!(detect_topic("breakfast ideas"), Topic::General);
        assert_eq!(detect_topic("a delight for a long flight"), Topic::General);
        assert_eq!(detect_topic("make it lighter"), Topic::Healthy);
        assert_eq!(detect_topic("can it be faster?"), Topic::Quick);
    }

    #[test]
    fn unknown_prompt_falls_back() {
        assert_eq!(detect_topic("surprise me"), Topic::General);
        assert!(canned_response(Topic::General, Language::En).contains("vegetarian"));
    }

    #[test]
    fn delay_stays_in_bounds() {
        let bounds = AssistantDelay::new(1200, 3500);
        for _ in 0..100 {
            let ms = pick_delay(bounds).as_millis() as u64;
            assert!((1200..=3500).contains(&ms));
        }
        assert_eq!(pick_delay(AssistantDelay::NONE), Duration::ZERO);
        assert_eq!(
            pick_delay(AssistantDelay::new(1500, 1500)),
            Duration::from_millis(1500)
        );
    }
}
