use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::sync::Arc;
use subscription_service::handlers;
use subscription_service::services::{BillingService, SubscriptionService};
use subscription_service::storage::InMemorySubscriptionStore;

const USER: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

macro_rules! init_app {
    ($store:expr) => {{
        let store = Arc::new($store.clone());
        test::init_service(
            App::new()
                .app_data(web::Data::new(SubscriptionService::new(store.clone())))
                .app_data(web::Data::new(BillingService::new(store)))
                .app_data(handlers::json_config())
                .app_data(handlers::query_config())
                .configure(handlers::subscription_config)
                .configure(handlers::summary_config),
        )
        .await
    }};
}

fn body(name: &str, price: i64, start: &str, end: Option<&str>) -> Value {
    let mut value = json!({
        "service_name": name,
        "price": price,
        "user_id": USER,
        "start_period": start,
    });
    if let Some(end) = end {
        value["end_period"] = json!(end);
    }
    value
}

#[actix_web::test]
async fn create_then_fetch_subscription() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/subscriptions")
        .set_json(body("Yandex Plus", 400, "07-2025", None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["start_period"], "07-2025");
    assert!(created["data"].get("end_period").is_none());
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/subscriptions/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["data"], created["data"]);
    assert_eq!(store.len().await, 1);
}

#[actix_web::test]
async fn create_rejects_bad_period() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/subscriptions")
        .set_json(body("Netflix", 999, "2025-07", None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        err["error"]["message"],
        "invalid start_period format, use MM-YYYY"
    );
    assert!(store.is_empty().await);
}

#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/subscriptions")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"service_name": "Netflix"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["success"], false);
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn unknown_and_invalid_ids() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/subscriptions")
        .set_json(body("Netflix", 999, "01-2025", None))
        .to_request();
    test::call_service(&app, req).await;

    let missing = "2b8e4c1a-7f3d-4a6b-9c0e-5d1f2a3b4c5d";
    let req = test::TestRequest::get()
        .uri(&format!("/subscriptions/{missing}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&format!("/subscriptions/{missing}"))
        .set_json(body("Other", 1, "02-2025", None))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/subscriptions/{missing}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/subscriptions/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"]["message"], "invalid id");

    assert_eq!(store.len().await, 1);
}

#[actix_web::test]
async fn update_and_delete_subscription() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/subscriptions")
        .set_json(body("Netflix", 999, "01-2025", None))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/subscriptions/{id}"))
        .set_json(body("Netflix Premium", 1299, "02-2025", Some("12-2025")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["data"]["id"], id.as_str());
    assert_eq!(updated["data"]["price"], 1299);
    assert_eq!(updated["data"]["end_period"], "12-2025");

    let req = test::TestRequest::delete()
        .uri(&format!("/subscriptions/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/subscriptions/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_filters_by_service_name() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    for (name, start) in [("Yandex Plus", "01-2025"), ("Netflix", "02-2025"), ("YANDEX Music", "03-2025")] {
        let req = test::TestRequest::post()
            .uri("/subscriptions")
            .set_json(body(name, 100, start, None))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/subscriptions?service_name=yandex&user_id=")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["service_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Yandex Plus", "YANDEX Music"]);

    let req = test::TestRequest::get()
        .uri("/subscriptions?user_id=oops")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"]["message"], "invalid user_id");
}

#[actix_web::test]
async fn summary_sums_overlapping_subscriptions() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    for payload in [
        body("Netflix", 100, "01-2024", Some("03-2024")),
        body("Spotify", 200, "02-2024", None),
    ] {
        let req = test::TestRequest::post()
            .uri("/subscriptions")
            .set_json(payload)
            .to_request();
        test::call_service(&app, req).await;
    }

    let by_user = format!("from=02-2024&to=02-2024&user_id={USER}");
    let cases = [
        ("from=02-2024&to=02-2024", 300),
        ("from=01-2024&to=01-2024", 100),
        ("from=04-2024&to=12-2024", 200),
        ("from=01-2023&to=12-2023", 0),
        ("from=05-2024&to=01-2024", 0),
        ("from=02-2024&to=02-2024&service_name=SPOT", 200),
        (by_user.as_str(), 300),
    ];
    for (query, expected) in cases {
        let req = test::TestRequest::get()
            .uri(&format!("/summary?{query}"))
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp["data"]["total"], expected, "{query}");
    }
}

#[actix_web::test]
async fn summary_rejects_invalid_bounds() {
    let store = InMemorySubscriptionStore::new();
    let app = init_app!(store);

    let cases = [
        ("from=13-2024&to=12-2024", "invalid from format, use MM-YYYY"),
        ("from=01-2024&to=2024-12", "invalid to format, use MM-YYYY"),
        ("to=12-2024", "invalid from format, use MM-YYYY"),
        ("from=01-2024&to=12-2024&user_id=123", "invalid user_id"),
    ];
    for (query, message) in cases {
        let req = test::TestRequest::get()
            .uri(&format!("/summary?{query}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{query}");
        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"]["message"], message, "{query}");
    }
}
