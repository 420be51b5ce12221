use crate::error::{PantryChefError, PantryChefResult};
use crate::state::AppState;
use axum::extract::{Json, Query, State as AxumState};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const ALL_CATEGORIES: &str = "All";
pub const LOW_STOCK_THRESHOLD: f64 = 2.0;
pub const EXPIRY_WINDOW_DAYS: i64 = 3;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// --- Ingredient list (recipe search input) ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngredientList {
    items: Vec<Ingredient>,
}

impl IngredientList {
    /// Appends a new ingredient. A blank name leaves the list untouched.
    pub fn add(&mut self, name: &str, quantity: f64, unit: &str) -> Option<&Ingredient> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.items.push(Ingredient {
            id: new_id(),
            name: name.to_string(),
            quantity: quantity.max(0.0),
            unit: unit.trim().to_string(),
        });
        self.items.last()
    }

    pub fn remove(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Ingredient] {
        &self.items
    }

    pub fn names(&self) -> Vec<String> {
        self.items.iter().map(|i| i.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Pending input fields for the ingredient list.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IngredientForm {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl IngredientForm {
    /// Adds the form contents to `list` and clears the fields on success.
    pub fn submit(&mut self, list: &mut IngredientList) -> Option<Ingredient> {
        let added = list.add(&self.name, self.quantity, &self.unit).cloned();
        if added.is_some() {
            *self = IngredientForm::default();
        }
        added
    }
}

// --- Pantry ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_low: bool,
}

impl PantryItem {
    pub fn is_low_stock(&self) -> bool {
        self.is_low || self.quantity < LOW_STOCK_THRESHOLD
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewPantryItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub category: String,
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_low: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Pantry {
    items: Vec<PantryItem>,
}

impl Pantry {
    pub fn new(items: Vec<PantryItem>) -> Self {
        Self { items }
    }

    pub fn seeded() -> Self {
        let today = Utc::now().date_naive();
        let item = |id: &str, name: &str, qty: f64, unit: &str, cat: &str, days: Option<i64>, low: bool| PantryItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity: qty,
            unit: unit.to_string(),
            category: cat.to_string(),
            expiry_date: days.map(|d| today + Duration::days(d)),
            is_low: low,
        };

        Self::new(vec![
            item("milk", "Milk", 1.0, "L", "Dairy", Some(2), true),
            item("eggs", "Eggs", 12.0, "pcs", "Dairy", Some(10), false),
            item("rice", "Basmati Rice", 2.0, "kg", "Grains", None, false),
            item("tomatoes", "Tomatoes", 6.0, "pcs", "Vegetables", Some(4), false),
            item("spinach", "Spinach", 1.0, "bag", "Vegetables", Some(1), false),
            item("chicken-breast", "Chicken Breast", 3.0, "pcs", "Meat", Some(3), false),
            item("olive-oil", "Olive Oil", 0.5, "L", "Pantry", None, true),
            item("chickpeas", "Chickpeas", 4.0, "cans", "Pantry", None, false),
        ])
    }

    pub fn items(&self) -> &[PantryItem] {
        &self.items
    }

    pub fn add_item(&mut self, input: NewPantryItem) -> PantryChefResult<&PantryItem> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(PantryChefError::Validation(
                "Please enter an item name".to_string(),
            ));
        }
        if !input.quantity.is_finite() || input.quantity < 0.0 {
            return Err(PantryChefError::Validation(
                "Quantity must be zero or more".to_string(),
            ));
        }
        let category = match input.category.trim() {
            "" => "Other".to_string(),
            c => c.to_string(),
        };

        self.items.push(PantryItem {
            id: new_id(),
            name: name.to_string(),
            quantity: input.quantity,
            unit: input.unit.trim().to_string(),
            category,
            expiry_date: input.expiry_date,
            is_low: input.is_low,
        });
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|i| i.id != id);
    }

    /// Adjusts the quantity by `delta`, never going below zero.
    pub fn update_quantity(&mut self, id: &str, delta: f64) -> Option<&PantryItem> {
        let item = self.items.iter_mut().find(|i| i.id == id)?;
        item.quantity = (item.quantity + delta).max(0.0);
        Some(&*item)
    }

    pub fn filter_by_category(&self, category: &str) -> Vec<&PantryItem> {
        self.items
            .iter()
            .filter(|i| category == ALL_CATEGORIES || i.category == category)
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for item in &self.items {
            if !categories.contains(&item.category) {
                categories.push(item.category.clone());
            }
        }
        categories
    }

    pub fn low_stock_items(&self) -> Vec<&PantryItem> {
        self.items.iter().filter(|i| i.is_low_stock()).collect()
    }

    pub fn expiring_items(&self, today: NaiveDate) -> Vec<&PantryItem> {
        let horizon = today + Duration::days(EXPIRY_WINDOW_DAYS);
        self.items
            .iter()
            .filter(|i| matches!(i.expiry_date, Some(d) if d >= today && d <= horizon))
            .collect()
    }

    pub fn expired_items(&self, today: NaiveDate) -> Vec<&PantryItem> {
        self.items
            .iter()
            .filter(|i| matches!(i.expiry_date, Some(d) if d < today))
            .collect()
    }

    /// Names of items still in stock, used to drive recipe search.
    pub fn available_names(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.quantity > 0.0)
            .map(|i| i.name.clone())
            .collect()
    }
}

// --- Axum handlers ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddIngredientInput {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdInput {
    pub id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityInput {
    pub id: String,
    pub delta: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryOverview {
    pub items: Vec<PantryItem>,
    pub low_stock: Vec<PantryItem>,
    pub expiring: Vec<PantryItem>,
    pub expired: Vec<PantryItem>,
}

fn owned(items: Vec<&PantryItem>) -> Vec<PantryItem> {
    items.into_iter().cloned().collect()
}

pub async fn get_ingredients_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<Vec<Ingredient>>> {
    Ok(Json(state.session()?.ingredients.items().to_vec()))
}

pub async fn add_ingredient_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<AddIngredientInput>,
) -> PantryChefResult<Json<Vec<Ingredient>>> {
    let mut session = state.session()?;
    let mut form = IngredientForm {
        name: input.name,
        quantity: input.quantity,
        unit: input.unit,
    };
    match form.submit(&mut session.ingredients) {
        Some(added) => tracing::info!("Ingredient added: {}", added.name),
        None => tracing::debug!("Ignored blank ingredient"),
    }
    Ok(Json(session.ingredients.items().to_vec()))
}

pub async fn remove_ingredient_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<IdInput>,
) -> PantryChefResult<Json<Vec<Ingredient>>> {
    let mut session = state.session()?;
    session.ingredients.remove(&input.id);
    Ok(Json(session.ingredients.items().to_vec()))
}

pub async fn clear_ingredients_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<()>> {
    state.session()?.ingredients.clear();
    Ok(Json(()))
}

pub async fn get_pantry_axum(
    AxumState(state): AxumState<AppState>,
    Query(query): Query<CategoryQuery>,
) -> PantryChefResult<Json<PantryOverview>> {
    let session = state.session()?;
    let pantry = &session.pantry;
    let today = Utc::now().date_naive();
    let category = query.category.as_deref().unwrap_or(ALL_CATEGORIES);

    Ok(Json(PantryOverview {
        items: owned(pantry.filter_by_category(category)),
        low_stock: owned(pantry.low_stock_items()),
        expiring: owned(pantry.expiring_items(today)),
        expired: owned(pantry.expired_items(today)),
    }))
}

pub async fn add_pantry_item_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<NewPantryItem>,
) -> PantryChefResult<Json<PantryItem>> {
    let mut session = state.session()?;
    let item = session.pantry.add_item(input)?.clone();
    tracing::info!("Pantry item added: {} ({})", item.name, item.id);
    Ok(Json(item))
}

pub async fn remove_pantry_item_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<IdInput>,
) -> PantryChefResult<Json<()>> {
    state.session()?.pantry.remove_item(&input.id);
    Ok(Json(()))
}

pub async fn update_quantity_axum(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<QuantityInput>,
) -> PantryChefResult<Json<PantryItem>> {
    if !input.delta.is_finite() {
        return Err(PantryChefError::Validation(
            "Quantity change must be a number".to_string(),
        ));
    }
    let mut session = state.session()?;
    let item = session
        .pantry
        .update_quantity(&input.id, input.delta)
        .cloned()
        .ok_or_else(|| PantryChefError::NotFound(format!("Pantry item '{}'", input.id)))?;
    tracing::info!("Pantry item {} quantity now {}", item.id, item.quantity);
    Ok(Json(item))
}

pub async fn get_low_stock_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<Vec<PantryItem>>> {
    Ok(Json(owned(state.session()?.pantry.low_stock_items())))
}

pub async fn get_expiring_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<Vec<PantryItem>>> {
    let today = Utc::now().date_naive();
    Ok(Json(owned(state.session()?.pantry.expiring_items(today))))
}

pub async fn get_categories_axum(
    AxumState(state): AxumState<AppState>,
) -> PantryChefResult<Json<Vec<String>>> {
    Ok(Json(state.session()?.pantry.categories()))
}
