#[cfg(test)]
mod tests {
    use crate::commands::assistant::{personalize_axum, PersonalizeInput, Topic};
    use crate::commands::locale::{get_locale_axum, set_locale_axum, SetLocaleInput};
    use crate::commands::moderation::workflow::{Decision, TicketStatus};
    use crate::commands::moderation::{
        get_overview_axum, get_submissions_axum, reply_ticket_axum, reset_board_axum,
        review_submission_axum, ReviewInput, StatusFilter, TicketReplyInput,
    };
    use crate::commands::nutrition::{
        get_today_axum, log_meal_axum, LogMealInput, Nutrient, NutritionalData,
    };
    use crate::commands::pantry::{
        add_ingredient_axum, get_low_stock_axum, update_quantity_axum, AddIngredientInput,
        QuantityInput,
    };
    use crate::commands::recipe::{search_recipes_axum, SearchInput};
    use crate::commands::subscription::{change_plan_axum, ChangePlanInput, PlanId};
    use crate::commands::translation::{
        coverage_internal, delete_translation_internal, list_translations_internal,
        upsert_translation_internal,
    };
    use crate::db::{self, DbPool};
    use crate::error::PantryChefError;
    use crate::state::{AppState, Direction, Language};
    use axum::body::{Body, Bytes};
    use axum::extract::{Json, Query, State};
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn setup_test_db() -> Option<DbPool> {
        dotenvy::dotenv().ok();
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };
        let pool = db::init_pool(&database_url)
            .await
            .expect("Failed to create pool");
        db::init_database(&pool).await.expect("Failed to migrate");
        Some(pool)
    }

    #[tokio::test]
    async fn test_quantity_update_through_session() {
        let state = AppState::for_tests().await;

        let Json(milk) = update_quantity_axum(
            State(state.clone()),
            Json(QuantityInput {
                id: "milk".to_string(),
                delta: -5.0,
            }),
        )
        .await
        .unwrap();
        assert_eq!(milk.quantity, 0.0);

        let Json(low) = get_low_stock_axum(State(state.clone())).await.unwrap();
        assert!(low.iter().any(|i| i.id == "milk"));

        let missing = update_quantity_axum(
            State(state),
            Json(QuantityInput {
                id: "nope".to_string(),
                delta: 1.0,
            }),
        )
        .await;
        assert!(matches!(missing, Err(PantryChefError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_uses_session_ingredients() {
        let state = AppState::for_tests().await;

        let empty = search_recipes_axum(
            State(state.clone()),
            Json(SearchInput {
                ingredients: None,
                filter: Default::default(),
            }),
        )
        .await;
        assert!(matches!(empty, Err(PantryChefError::Validation(_))));

        let mut listed = Vec::new();
        for name in ["Chickpeas", "Spinach", "   "] {
            let Json(items) = add_ingredient_axum(
                State(state.clone()),
                Json(AddIngredientInput {
                    name: name.to_string(),
                    quantity: 1.0,
                    unit: String::new(),
                }),
            )
            .await
            .unwrap();
            listed.push(items.len());
        }
        assert_eq!(listed, vec![1, 2, 2]);
        assert_eq!(state.session().unwrap().ingredients.len(), 2);

        let Json(matches) = search_recipes_axum(
            State(state),
            Json(SearchInput {
                ingredients: None,
                filter: Default::default(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(matches[0].recipe.id, "chickpea-spinach-curry");
    }

    #[tokio::test]
    async fn test_rejection_flow_over_handlers() {
        let state = AppState::for_tests().await;

        let blocked = review_submission_axum(
            State(state.clone()),
            Json(ReviewInput {
                id: "sub-2".to_string(),
                decision: Decision::Reject {
                    reason: String::new(),
                },
            }),
        )
        .await;
        assert!(matches!(blocked, Err(PantryChefError::Validation(_))));

        let Json(pending) = get_submissions_axum(
            State(state.clone()),
            Query(StatusFilter {
                status: Some("pending".to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(pending.iter().any(|s| s.id == "sub-2"));

        let Json(approved) = review_submission_axum(
            State(state.clone()),
            Json(ReviewInput {
                id: "sub-2".to_string(),
                decision: Decision::Approve { note: None },
            }),
        )
        .await
        .unwrap();

        let again = review_submission_axum(
            State(state.clone()),
            Json(ReviewInput {
                id: approved.id.clone(),
                decision: Decision::Reject {
                    reason: "changed my mind".to_string(),
                },
            }),
        )
        .await;
        assert!(matches!(
            again,
            Err(PantryChefError::InvalidTransition { .. })
        ));

        let Json(overview) = get_overview_axum(State(state.clone())).await.unwrap();
        assert_eq!(overview.submissions.get("approved"), Some(&1));

        let Json(reset) = reset_board_axum(State(state)).await.unwrap();
        assert_eq!(reset.submissions.get("approved"), None);
    }

    #[tokio::test]
    async fn test_reply_moves_open_ticket_forward() {
        let state = AppState::for_tests().await;
        let Json(ticket) = reply_ticket_axum(
            State(state),
            Json(TicketReplyInput {
                id: "tkt-1".to_string(),
                author: String::new(),
                message: "We are looking into it.".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.replies.last().map(|r| r.author.as_str()), Some("Support"));
    }

    #[tokio::test]
    async fn test_assistant_respects_locale_and_quota() {
        let state = AppState::for_tests().await;

        let Json(locale) = set_locale_axum(
            State(state.clone()),
            Json(SetLocaleInput {
                language: "ar".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(locale.direction, Direction::Rtl);

        let bad = set_locale_axum(
            State(state.clone()),
            Json(SetLocaleInput {
                language: "klingon".to_string(),
            }),
        )
        .await;
        assert!(bad.is_err());
        let Json(current) = get_locale_axum(State(state.clone())).await.unwrap();
        assert_eq!(current.language, Language::Ar);

        let ask = |prompt: &str| PersonalizeInput {
            prompt: prompt.to_string(),
            recipe_id: Some("shakshuka".to_string()),
            language: None,
        };

        let Json(reply) = personalize_axum(State(state.clone()), Json(ask("vegetarian please")))
            .await
            .unwrap();
        assert_eq!(reply.topic, Topic::Vegetarian);
        assert_eq!(reply.language, Language::Ar);
        assert_eq!(reply.recipe_title.as_deref(), Some("Shakshuka"));
        assert_eq!(reply.usage.used, 1);

        for expected in 2..=5 {
            let Json(reply) = personalize_axum(State(state.clone()), Json(ask("quick")))
                .await
                .unwrap();
            assert_eq!(reply.usage.used, expected);
        }
        let exhausted = personalize_axum(State(state.clone()), Json(ask("quick"))).await;
        assert!(matches!(exhausted, Err(PantryChefError::QuotaExceeded(_))));

        let Json(upgraded) = change_plan_axum(
            State(state.clone()),
            Json(ChangePlanInput { plan: PlanId::Pro }),
        )
        .await
        .unwrap();
        assert_eq!(upgraded.usage.used, 0);
        assert_eq!(upgraded.usage.limit, Some(100));
        assert!(personalize_axum(State(state), Json(ask("quick"))).await.is_ok());
    }

    #[tokio::test]
    async fn test_meal_log_totals() {
        let state = AppState::for_tests().await;
        let meal = |calories: f64| NutritionalData {
            calories: Some(calories),
            protein: Some(25.0),
            ..Default::default()
        };

        for (name, calories) in [("Breakfast", 400.0), ("Lunch", 600.0)] {
            let Json(entry) = log_meal_axum(
                State(state.clone()),
                Json(LogMealInput {
                    name: name.to_string(),
                    nutrition: meal(calories),
                }),
            )
            .await
            .unwrap();
            assert_eq!(entry.name, name);
        }

        let Json(today) = get_today_axum(State(state)).await.unwrap();
        assert_eq!(today.meals.len(), 2);
        let calories = today
            .label
            .rows
            .iter()
            .find(|r| r.nutrient == Nutrient::Calories)
            .unwrap();
        assert_eq!(calories.amount, 1000.0);
        assert_eq!(calories.percent, 50);
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Bytes) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let length = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, length, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_router_wraps_api_responses() {
        let app = crate::build_app(AppState::for_tests().await);

        let (status, length, body) = send(&app, get("/api/pantry/categories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(length, Some(body.len().to_string()));
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"][0], "All");

        let (status, _, body) = send(
            &app,
            post_json(
                "/api/admin/submissions/review",
                r#"{"id":"sub-1","action":"reject","reason":""}"#,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "error": "Please provide a reason for rejection" })
        );

        // missing `delta` is rejected by the Json extractor as plain text
        let (status, length, body) =
            send(&app, post_json("/api/pantry/quantity", r#"{"id":"milk"}"#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(length, Some(body.len().to_string()));
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error"].as_str().unwrap().contains("delta"));
    }

    #[tokio::test]
    async fn test_router_passes_ping_and_root_through() {
        let app = crate::build_app(AppState::for_tests().await);

        let (status, _, body) = send(&app, get("/api/ping")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"pong");

        let (status, _, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"Hello, PantryChef is running!");
    }

    #[tokio::test]
    async fn test_translation_crud_integration() {
        let Some(pool) = setup_test_db().await else {
            return;
        };
        let key = format!("test.integration.k{}", uuid::Uuid::new_v4().simple());

        let en = upsert_translation_internal(&pool, &key, Language::En, "Hello")
            .await
            .expect("insert en");
        let updated = upsert_translation_internal(&pool, &key, Language::En, "Hello there")
            .await
            .expect("upsert en");
        assert_eq!(en.id, updated.id);
        assert_eq!(updated.value, "Hello there");

        let coverage = coverage_internal(&pool, Language::Ar).await.expect("coverage");
        assert!(coverage.missing.contains(&key));

        let ar = upsert_translation_internal(&pool, &key, Language::Ar, "مرحبا")
            .await
            .expect("insert ar");
        let coverage = coverage_internal(&pool, Language::Ar).await.expect("coverage");
        assert!(!coverage.missing.contains(&key));

        let listed = list_translations_internal(&pool, Some(Language::Ar), Some(key.clone()))
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value, "مرحبا");

        delete_translation_internal(&pool, en.id).await.expect("delete en");
        delete_translation_internal(&pool, ar.id).await.expect("delete ar");
        assert!(matches!(
            delete_translation_internal(&pool, ar.id).await,
            Err(PantryChefError::NotFound(_))
        ));
    }
}
