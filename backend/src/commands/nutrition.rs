//! Daily-value arithmetic for nutrition labels and the shopper's meal log.
//!
//! Percentages are reported twice on purpose: `percent` is the raw
//! `round(amount / target * 100)` and may exceed 100, `fill` is the same
//! number clamped into `0..=100` for progress bars.

use crate::error::{PantryChefError, PantryChefResult};
use crate::state::AppState;
use axum::extract::{Json, State as AxumState};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Nutrient {
    Calories,
    Protein,
    Carbohydrates,
    Fat,
    SaturatedFat,
    Fiber,
    Sugar,
    Sodium,
    Cholesterol,
    Potassium,
    Calcium,
    Iron,
    Magnesium,
    Phosphorus,
    Zinc,
    VitaminA,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminK,
    Thiamin,
    Riboflavin,
    Niacin,
    VitaminB6,
    Folate,
    VitaminB12,
}

impl Nutrient {
    pub const ALL: [Nutrient; 26] = [
        Nutrient::Calories,
        Nutrient::Protein,
        Nutrient::Carbohydrates,
        Nutrient::Fat,
        Nutrient::SaturatedFat,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Sodium,
        Nutrient::Cholesterol,
        Nutrient::Potassium,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Magnesium,
        Nutrient::Phosphorus,
        Nutrient::Zinc,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
        Nutrient::VitaminD,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::Thiamin,
        Nutrient::Riboflavin,
        Nutrient::Niacin,
        Nutrient::VitaminB6,
        Nutrient::Folate,
        Nutrient::VitaminB12,
    ];

    /// Reference daily intake for a 2000 kcal diet.
    pub fn target(self) -> f64 {
        match self {
            Nutrient::Calories => 2000.0,
            Nutrient::Protein => 50.0,
            Nutrient::Carbohydrates => 275.0,
            Nutrient::Fat => 78.0,
            Nutrient::SaturatedFat => 20.0,
            Nutrient::Fiber => 28.0,
            Nutrient::Sugar => 50.0,
            Nutrient::Sodium => 2300.0,
            Nutrient::Cholesterol => 300.0,
            Nutrient::Potassium => 4700.0,
            Nutrient::Calcium => 1300.0,
            Nutrient::Iron => 18.0,
            Nutrient::Magnesium => 420.0,
            Nutrient::Phosphorus => 1250.0,
            Nutrient::Zinc => 11.0,
            Nutrient::VitaminA => 900.0,
            Nutrient::VitaminC => 90.0,
            Nutrient::VitaminD => 20.0,
            Nutrient::VitaminE => 15.0,
            Nutrient::VitaminK => 120.0,
            Nutrient::Thiamin => 1.2,
            Nutrient::Riboflavin => 1.3,
            Nutrient::Niacin => 16.0,
            Nutrient::VitaminB6 => 1.7,
            Nutrient::Folate => 400.0,
            Nutrient::VitaminB12 => 2.4,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Protein
            | Nutrient::Carbohydrates
            | Nutrient::Fat
            | Nutrient::SaturatedFat
            | Nutrient::Fiber
            | Nutrient::Sugar => "g",
            Nutrient::VitaminA
            | Nutrient::VitaminD
            | Nutrient::VitaminK
            | Nutrient::Folate
            | Nutrient::VitaminB12 => "mcg",
            _ => "mg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Nutrient::Calories => "Calories",
            Nutrient::Protein => "Protein",
            Nutrient::Carbohydrates => "Total Carbohydrate",
            Nutrient::Fat => "Total Fat",
            Nutrient::SaturatedFat => "Saturated Fat",
            Nutrient::Fiber => "Dietary Fiber",
            Nutrient::Sugar => "Total Sugars",
            Nutrient::Sodium => "Sodium",
            Nutrient::Cholesterol => "Cholesterol",
            Nutrient::Potassium => "Potassium",
            Nutrient::Calcium => "Calcium",
            Nutrient::Iron => "Iron",
            Nutrient::Magnesium => "Magnesium",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Zinc => "Zinc",
            Nutrient::VitaminA => "Vitamin A",
            Nutrient::VitaminC => "Vitamin C",
            Nutrient::VitaminD => "Vitamin D",
            Nutrient::VitaminE => "Vitamin E",
            Nutrient::VitaminK => "Vitamin K",
            Nutrient::Thiamin => "Thiamin",
            Nutrient::Riboflavin => "Riboflavin",
            Nutrient::Niacin => "Niacin",
            Nutrient::VitaminB6 => "Vitamin B6",
            Nutrient::Folate => "Folate",
            Nutrient::VitaminB12 => "Vitamin B12",
        }
    }
}

/// Display bucket for a daily-value percentage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DvLevel {
    Neutral,
    Low,
    Good,
    High,
}

impl DvLevel {
    pub fn from_percent(percent: i64) -> Self {
        match percent {
            p if p < 5 => DvLevel::Neutral,
            p if p < 20 => DvLevel::Low,
            p if p < 100 => DvLevel::Good,
            _ => DvLevel::High,
        }
    }
}

pub fn percent_of(amount: f64, target: f64) -> i64 {
    if target <= 0.0 || !amount.is_finite() {
        return 0;
    }
    (amount / target * 100.0).round() as i64
}

pub fn daily_value_percent(amount: f64, nutrient: Nutrient) -> i64 {
    percent_of(amount, nutrient.target())
}

pub fn progress_fill(percent: i64) -> u8 {
    percent.clamp(0, 100) as u8
}

macro_rules! nutritional_data {
    ($($field:ident),+ $(,)?) => {
        /// Flat per-recipe (or per-meal) nutrient record. Absent fields read as zero.
        #[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
        #[serde(rename_all = "camelCase", default)]
        pub struct NutritionalData {
            $(pub $field: Option<f64>,)+
        }

        impl NutritionalData {
            fn fields(&self) -> Vec<(&'static str, Option<f64>)> {
                vec![$((stringify!($field), self.$field)),+]
            }

            fn map_amounts(&self, f: impl Fn(f64) -> f64) -> Self {
                Self { $($field: self.$field.map(&f),)+ }
            }

            fn zip_amounts(&self, other: &Self) -> Self {
                Self {
                    $($field: match (self.$field, other.$field) {
                        (None, None) => None,
                        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
                    },)+
                }
            }
        }
    };
}

nutritional_data!(
    calories,
    protein,
    carbohydrates,
    fat,
    saturated_fat,
    trans_fat,
    monounsaturated_fat,
    polyunsaturated_fat,
    cholesterol,
    sodium,
    fiber,
    sugar,
    added_sugar,
    potassium,
    calcium,
    iron,
    magnesium,
    phosphorus,
    zinc,
    vitamin_a,
    vitamin_c,
    vitamin_d,
    vitamin_e,
    vitamin_k,
    thiamin,
    riboflavin,
    niacin,
    vitamin_b6,
    folate,
    vitamin_b12,
);

impl NutritionalData {
    pub fn amount(&self, nutrient: Nutrient) -> f64 {
        let value = match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Carbohydrates => self.carbohydrates,
            Nutrient::Fat => self.fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sugar => self.sugar,
            Nutrient::Sodium => self.sodium,
            Nutrient::Cholesterol => self.cholesterol,
            Nutrient::Potassium => self.potassium,
            Nutrient::Calcium => self.calcium,
            Nutrient::Iron => self.iron,
            Nutrient::Magnesium => self.magnesium,
            Nutrient::Phosphorus => self.phosphorus,
            Nutrient::Zinc => self.zinc,
            Nutrient::VitaminA => self.vitamin_a,
            Nutrient::VitaminC => self.vitamin_c,
            Nutrient::VitaminD => self.vitamin_d,
            Nutrient::VitaminE => self.vitamin_e,
            Nutrient::VitaminK => self.vitamin_k,
            Nutrient::Thiamin => self.thiamin,
            Nutrient::Riboflavin => self.riboflavin,
            Nutrient::Niacin => self.niacin,
            Nutrient::VitaminB6 => self.vitamin_b6,
            Nutrient::Folate => self.folate,
            Nutrient::VitaminB12 => self.vitamin_b12,
        };
        value.unwrap_or(0.0)
    }

    pub fn validate(&self) -> PantryChefResult<()> {
        for (name, value) in self.fields() {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(PantryChefError::Validation(format!(
                        "Nutrient '{}' must be a non-negative number",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn per_serving(&self, servings: u32) -> Self {
        let servings = servings.max(1) as f64;
        self.map_amounts(|v| v / servings)
    }

    pub fn combined(&self, other: &Self) -> Self {
        self.zip_amounts(other)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyValueRow {
    pub nutrient: Nutrient,
    pub label: &'static str,
    pub amount: f64,
    pub unit: &'static str,
    pub percent: i64,
    pub level: DvLevel,
    pub fill: u8,
}

/// Share of macro calories, in whole percent.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MacroSplit {
    pub protein: u8,
    pub carbohydrates: u8,
    pub fat: u8,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLabel {
    pub servings: u32,
    pub rows: Vec<DailyValueRow>,
    pub macros: MacroSplit,
}

pub fn daily_value_row(nutrient: Nutrient, amount: f64) -> DailyValueRow {
    let percent = daily_value_percent(amount, nutrient);
    DailyValueRow {
        nutrient,
        label: nutrient.label(),
        amount: (amount * 10.0).round() / 10.0,
        unit: nutrient.unit(),
        percent,
        level: DvLevel::from_percent(percent),
        fill: progress_fill(percent),
    }
}

pub fn macro_split(data: &NutritionalData) -> MacroSplit {
    let protein = data.amount(Nutrient::Protein) * 4.0;
    let carbs = data.amount(Nutrient::Carbohydrates) * 4.0;
    let fat = data.amount(Nutrient::Fat) * 9.0;
    let total = protein + carbs + fat;
    if total <= 0.0 {
        return MacroSplit::default();
    }
    let share = |kcal: f64| percent_of(kcal, total).clamp(0, 100) as u8;
    MacroSplit {
        protein: share(protein),
        carbohydrates: share(carbs),
        fat: share(fat),
    }
}

pub fn nutrition_label(data: &NutritionalData, servings: u32) -> PantryChefResult<NutritionLabel> {
    if servings == 0 {
        return Err(PantryChefError::Validation(
            "Servings must be at least 1".to_string(),
        ));
    }
    data.validate()?;

    let serving = data.per_serving(servings);
    let rows = Nutrient::ALL
        .iter()
        .map(|&n| daily_value_row(n, serving.amount(n)))
        .collect();

    Ok(NutritionLabel {
        servings,
        rows,
        macros: macro_split(&serving),
    })
}

// --- Meal log ---

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub id: String,
    pub name: String,
    pub logged_at: DateTime<Utc>,
    pub nutrition: NutritionalData,
}

#[derive(Debug, Clone, Default)]
pub struct MealLog {
    entries: Vec<MealEntry>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub meals: Vec<MealEntry>,
    pub label: NutritionLabel,
}

impl MealLog {
    pub fn log_meal(
        &mut self,
        name: &str,
        nutrition: NutritionalData,
        logged_at: DateTime<Utc>,
    ) -> PantryChefResult<MealEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PantryChefError::Validation(
                "Please enter a meal name".to_string(),
            ));
        }
        nutrition.validate()?;

        let entry = MealEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            logged_at,
            nutrition,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    pub fn entries(&self) -> &[MealEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn daily_summary(&self, date: NaiveDate) -> PantryChefResult<DailySummary> {
        let meals: Vec<MealEntry> = self
            .entries
            .iter()
            .filter(|e| e.logged_at.date_naive() == date)
            .cloned()
            .collect();

        let total = meals
            .iter()
            .fold(NutritionalData::default(), |acc, m| acc.combined(&m.nutrition));

        Ok(DailySummary {
            date,
            meals,
            label: nutrition_label(&total, 1)?,
        })
    }
}

// --- Axum handlers ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyValuesInput {
    #[serde(default)]
    pub nutrition: NutritionalData,
    pub servings: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientTarget {
    pub nutrient: Nutrient,
    pub label: &'static str,
    pub target: f64,
    pub unit: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMealInput {
    pub name: String,
    #[serde(default)]
    pub nutrition: NutritionalData,
}

pub async fn get_daily_values_axum(
    Json(input): Json<DailyValuesInput>,
) -> PantryChefResult<Json<NutritionLabel>> {
    let label = nutrition_label(&input.nutrition, input.servings.unwrap_or(1))?;
    Ok(Json(label))
}

pub async fn get_targets_axum() -> Json<Vec<NutrientTarget>> {
    Json(
        Nutrient::ALL
            .iter()
            .map(|&n| NutrientTarget {
                nutrient: n,
                label: n.label(),
                target: n.target(),
                unit: n.unit(),
            })
            .collect(),
    )
}

pub async fn log_meal_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<LogMealInput>,
) -> PantryChefResult<Json<MealEntry>> {
    let mut session = state.session()?;
    let entry = session
        .meal_log
        .log_meal(&input.name, input.nutrition, Utc::now())?;
    tracing::info!("Logged meal '{}'", entry.name);
    Ok(Json(entry))
}

pub async fn get_today_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<DailySummary>> {
    let session = state.session()?;
    let summary = session.meal_log.daily_summary(Utc::now().date_naive())?;
    Ok(Json(summary))
}

pub async fn clear_log_axum(AxumState(state): AxumState<AppState>) -> PantryChefResult<Json<()>> {
    state.session()?.meal_log.clear();
    tracing::info!("Meal log cleared");
    Ok(Json(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn percent_matches_reference_table() {
        assert_eq!(daily_value_percent(1000.0, Nutrient::Calories), 50);
        assert_eq!(daily_value_percent(45.0, Nutrient::VitaminC), 50);
        assert_eq!(daily_value_percent(12.3, Nutrient::Protein), 25);
        assert_eq!(daily_value_percent(0.0, Nutrient::Iron), 0);
    }

    #[test]
    fn percent_is_not_clamped_but_fill_is() {
        let percent = daily_value_percent(180.0, Nutrient::VitaminC);
        assert_eq!(percent, 200);
        assert_eq!(progress_fill(percent), 100);
        assert_eq!(progress_fill(-3), 0);
        assert_eq!(progress_fill(42), 42);
    }

    #[test]
    fn levels_follow_bucket_edges() {
        assert_eq!(DvLevel::from_percent(0), DvLevel::Neutral);
        assert_eq!(DvLevel::from_percent(4), DvLevel::Neutral);
        assert_eq!(DvLevel::from_percent(5), DvLevel::Low);
        assert_eq!(DvLevel::from_percent(19), DvLevel::Low);
        assert_eq!(DvLevel::from_percent(20), DvLevel::Good);
        assert_eq!(DvLevel::from_percent(99), DvLevel::Good);
        assert_eq!(DvLevel::from_percent(100), DvLevel::High);
        assert_eq!(DvLevel::from_percent(340), DvLevel::High);
    }

    #[test]
    fn non_negative_for_every_target() {
        for n in Nutrient::ALL {
            for amount in [0.0, 0.4, 1.0, 17.5, 5000.0] {
                let p = daily_value_percent(amount, n);
                assert!(p >= 0, "{:?} {}", n, amount);
                assert_eq!(p, (amount / n.target() * 100.0).round() as i64);
            }
        }
    }

    #[test]
    fn missing_fields_read_as_zero() {
        let data = NutritionalData {
            protein: Some(25.0),
            ..Default::default()
        };
        let label = nutrition_label(&data, 1).unwrap();
        assert_eq!(label.rows.len(), 26);

        let protein = label.rows.iter().find(|r| r.nutrient == Nutrient::Protein).unwrap();
        assert_eq!(protein.percent, 50);
        assert_eq!(protein.level, DvLevel::Good);

        let sodium = label.rows.iter().find(|r| r.nutrient == Nutrient::Sodium).unwrap();
        assert_eq!(sodium.amount, 0.0);
        assert_eq!(sodium.level, DvLevel::Neutral);
    }

    #[test]
    fn label_divides_by_servings() {
        let data = NutritionalData {
            calories: Some(2000.0),
            ..Default::default()
        };
        let label = nutrition_label(&data, 4).unwrap();
        assert_eq!(label.rows[0].amount, 500.0);
        assert_eq!(label.rows[0].percent, 25);
        assert!(nutrition_label(&data, 0).is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let data = NutritionalData {
            sodium: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            nutrition_label(&data, 1),
            Err(PantryChefError::Validation(_))
        ));
    }

    #[test]
    fn macro_split_uses_calorie_weights() {
        let data = NutritionalData {
            protein: Some(25.0),
            carbohydrates: Some(50.0),
            fat: Some(100.0 / 9.0),
            ..Default::default()
        };
        let split = macro_split(&data);
        assert_eq!(split.protein, 25);
        assert_eq!(split.carbohydrates, 50);
        assert_eq!(split.fat, 25);
        assert_eq!(macro_split(&NutritionalData::default()), MacroSplit::default());
    }

    #[test]
    fn daily_summary_sums_only_that_day() {
        let mut log = MealLog::default();
        let day = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2026, 3, 3, 8, 0, 0).unwrap();

        let meal = NutritionalData {
            calories: Some(600.0),
            vitamin_c: Some(30.0),
            ..Default::default()
        };
        log.log_meal("Breakfast", meal.clone(), day).unwrap();
        log.log_meal("Lunch", meal.clone(), day).unwrap();
        log.log_meal("Tomorrow", meal, next_day).unwrap();

        let summary = log.daily_summary(day.date_naive()).unwrap();
        assert_eq!(summary.meals.len(), 2);
        let calories = &summary.label.rows[0];
        assert_eq!(calories.nutrient, Nutrient::Calories);
        assert_eq!(calories.percent, 60);
        let vitamin_c = summary
            .label
            .rows
            .iter()
            .find(|r| r.nutrient == Nutrient::VitaminC)
            .unwrap();
        assert_eq!(vitamin_c.percent, 67);
    }

    #[test]
    fn blank_meal_name_is_rejected() {
        let mut log = MealLog::default();
        assert!(log
            .log_meal("  ", NutritionalData::default(), Utc::now())
            .is_err());
        assert!(log.entries().is_empty());
    }

    #[test]
    fn camel_case_wire_names() {
        let data: NutritionalData =
            serde_json::from_str(r#"{"vitaminB12": 1.2, "saturatedFat": 4}"#).unwrap();
        assert_eq!(data.amount(Nutrient::VitaminB12), 1.2);
        assert_eq!(data.amount(Nutrient::SaturatedFat), 4.0);
        assert_eq!(
            serde_json::to_value(Nutrient::VitaminB6).unwrap(),
            serde_json::json!("vitaminB6")
        );
    }
}
