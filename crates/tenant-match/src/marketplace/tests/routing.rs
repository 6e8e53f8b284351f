use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;

use crate::marketplace::domain::PropertyRequirements;
use crate::marketplace::memory::{
    InMemoryProfileRepository, InMemoryPropertyRepository, InMemoryPropertyViewRepository,
};
use crate::marketplace::router::profile_handler;

fn json_request(method: Method, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("valid request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("valid request")
}

#[tokio::test]
async fn score_route_returns_sub_scores_and_rating() {
    let router = router_with_service(build_service());

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/credentials/score",
            serde_json::to_value(score_request()).expect("serializable"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["income_score"], 60);
    assert_eq!(payload["credit_score"], 81);
    assert_eq!(payload["overall_score"], 76);
    assert_eq!(payload["rating"], "Good");
}

#[tokio::test]
async fn score_route_reports_invalid_fields() {
    let router = router_with_service(build_service());
    let mut payload = serde_json::to_value(score_request()).expect("serializable");
    payload["annual_income"] = json!(0);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/credentials/score",
            payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errors"][0]["field"], "annual_income");
}

#[tokio::test]
async fn profile_handler_returns_not_found() {
    let service = Arc::new(build_service());

    let response = profile_handler::<
        InMemoryProfileRepository,
        InMemoryPropertyRepository,
        InMemoryPropertyViewRepository,
    >(State(service), Path(321))
    .await;

    let response = match response {
        Ok(_) => panic!("profile should be missing"),
        Err(err) => axum::response::IntoResponse::into_response(err),
    };
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "tenant profile not found for user 321");
}

#[tokio::test]
async fn creating_a_profile_twice_conflicts() {
    let router = router_with_service(build_service());
    let payload = serde_json::to_value(verified_tenant(TENANT)).expect("serializable");

    let created = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/tenant-profiles",
            payload.clone(),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json_body(created).await;
    assert_eq!(body["overall_score"], 83);
    assert_eq!(body["verification_badge"], true);

    let duplicate = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/tenant-profiles",
            payload,
        ))
        .await
        .expect("route executes");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn derived_profile_fields_cannot_be_written() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/tenant-profiles/7",
            json!({ "overall_score": 100 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn misspelled_score_field_is_rejected() {
    let router = router_with_service(build_service());
    let mut payload = serde_json::to_value(score_request()).expect("serializable");
    payload["monthlyRent"] = json!(2_000.0);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/credentials/score",
            payload,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    let message = payload["error"].as_str().expect("error message");
    assert!(message.contains("monthlyRent"), "{message}");
}

#[tokio::test]
async fn listing_accepts_flat_payload() {
    let router = router_with_service(build_service());
    let payload = serde_json::to_value(new_property(
        "Garden Studio",
        requirements(90_000.0, 680, 12, 12),
    ))
    .expect("serializable");

    let response = router
        .oneshot(json_request(Method::POST, "/api/v1/properties", payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["title"], "Garden Studio");
    assert_eq!(body["minimum_income"], 90_000.0);
}

#[tokio::test]
async fn misspelled_listing_fields_are_rejected() {
    let router = router_with_service(build_service());
    let mut payload = serde_json::to_value(new_property(
        "Garden Studio",
        PropertyRequirements::default(),
    ))
    .expect("serializable");
    payload["minimumIncome"] = json!(150_000.0);
    payload["overall_score"] = json!(100);

    let response = router
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/properties", payload))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let listed = router
        .oneshot(get("/api/v1/properties"))
        .await
        .expect("route executes");
    assert_eq!(read_json_body(listed).await, json!([]));
}

#[tokio::test]
async fn match_route_orders_listings_best_first() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/match/tenant-properties",
            json!({ "tenant_id": TENANT.0 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let ranked: Vec<(u64, u64)> = payload
        .as_array()
        .expect("array payload")
        .iter()
        .map(|entry| {
            (
                entry["property"]["id"].as_u64().expect("id"),
                entry["match_score"].as_u64().expect("score"),
            )
        })
        .collect();
    assert_eq!(ranked, vec![(1, 100), (2, 98), (3, 90)]);
}

#[tokio::test]
async fn report_route_renders_breakdown() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(get("/api/v1/match/report/7/3"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["match_score"], 90);
    assert_eq!(
        payload["match_areas"]["income"]["details"],
        "Required: $174,000/year"
    );
    assert_eq!(payload["match_areas"]["credit_score"]["rating"], "Good");
}

#[tokio::test]
async fn report_route_for_missing_listing_is_not_found() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(get("/api/v1/match/report/7/99"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_lifecycle_over_http() {
    let router = router_with_service(build_service());
    let draft = serde_json::to_value(new_property(
        "Garden Duplex",
        requirements(90_000.0, 680, 12, 12),
    ))
    .expect("serializable");

    let created = router
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/properties", draft))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json_body(created).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["minimum_credit_score"], 680);

    let patched = router
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/properties/1",
            json!({ "featured": true, "minimum_income": null }),
        ))
        .await
        .expect("route executes");
    assert_eq!(patched.status(), StatusCode::OK);
    let body = read_json_body(patched).await;
    assert_eq!(body["featured"], true);
    assert_eq!(body["minimum_income"], Value::Null);

    let featured = router
        .clone()
        .oneshot(get("/api/v1/properties/featured?limit=5"))
        .await
        .expect("route executes");
    let body = read_json_body(featured).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let deleted = router
        .clone()
        .oneshot(
            Request::delete("/api/v1/properties/1")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = router
        .oneshot(get("/api/v1/properties/1"))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn view_route_stamps_match_score() {
    let router = router_with_service(seeded_service());

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/property-views",
            json!({ "property_id": 2, "tenant_id": TENANT.0 }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["match_score"], 98);
    assert_eq!(body["application_status"], "pending");

    let reviewed = router
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            "/api/v1/property-views/1",
            json!({ "application_status": "rejected" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(reviewed.status(), StatusCode::OK);

    let views = router
        .oneshot(get("/api/v1/property-views/tenant/7"))
        .await
        .expect("route executes");
    let body = read_json_body(views).await;
    assert_eq!(body[0]["application_status"], "rejected");
}

#[tokio::test]
async fn non_numeric_ids_are_rejected() {
    let router = router_with_service(seeded_service());

    let response = router
        .oneshot(get("/api/v1/properties/not-a-number"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
