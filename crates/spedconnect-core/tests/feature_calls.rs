//! Request shapes of the per-endpoint calls against a mock backend.

use std::sync::Arc;

use serde_json::json;
use spedconnect_core::models::{
    CouponCreate, LoginDetails, ProfileUpdate, RatingInput, ServiceInput, SignUpRequest,
};
use spedconnect_core::{ApiClient, Session, SessionData};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(token: Option<&str>) -> (MockServer, Arc<Session>, ApiClient) {
    let server = MockServer::start().await;
    let session = Arc::new(Session::in_memory());
    if let Some(token) = token {
        session.update(SessionData::from_login(LoginDetails {
            id: "u1".into(),
            first_name: "Ada".into(),
            token: token.into(),
            ..Default::default()
        }));
    }
    let client = ApiClient::new(&server.uri(), session.clone(), || {}).unwrap();
    (server, session, client)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": 1, "data": data}))
}

#[tokio::test]
async fn test_sign_up_starts_session() {
    let (server, session, client) = client(None).await;

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(ok(json!({"result": {"_id": "u9", "email": "new@example.com", "token": "t9"}})))
        .expect(1)
        .mount(&server)
        .await;

    let request = SignUpRequest {
        first_name: "New".into(),
        email: "new@example.com".into(),
        password: "secret".into(),
        ..Default::default()
    };
    client.sign_up(&request).await.unwrap();

    assert_eq!(session.token().as_deref(), Some("t9"));
    assert_eq!(session.profile().map(|p| p.email), Some("new@example.com".into()));
}

#[tokio::test]
async fn test_forgot_password_and_logout_bodies() {
    let (server, _session, client) = client(Some("abc123")).await;

    Mock::given(method("POST"))
        .and(path("/auth/forgot_password"))
        .and(body_json(json!({"email": "ada@example.com"})))
        .respond_with(ok(json!({"message": "Reset link sent"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "abc123"))
        .and(body_json(json!({"token": "abc123"})))
        .respond_with(ok(json!({"message": "Logged out"})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client.forgot_password("ada@example.com").await.unwrap();
    assert_eq!(payload.message_or(""), "Reset link sent");
    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_update_profile_refreshes_stored_profile() {
    let (server, session, client) = client(Some("abc123")).await;

    Mock::given(method("PUT"))
        .and(path("/user/update_profile"))
        .and(body_json(json!({"bio": "Speech therapist"})))
        .respond_with(ok(json!({"result": {"_id": "u1", "firstName": "Ada", "bio": "Speech therapist"}})))
        .expect(1)
        .mount(&server)
        .await;

    let update = ProfileUpdate {
        bio: Some("Speech therapist".into()),
        ..Default::default()
    };
    client.update_profile(&update).await.unwrap();

    let profile = session.profile().unwrap();
    assert_eq!(profile.bio.as_deref(), Some("Speech therapist"));
    assert_eq!(session.token().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_service_add_and_update() {
    let (server, _session, client) = client(Some("abc123")).await;
    let input = ServiceInput {
        name: "Speech".into(),
        description: "One on one".into(),
        rate: "40".into(),
    };

    Mock::given(method("POST"))
        .and(path("/service/providers/add"))
        .and(body_json(json!({"name": "Speech", "description": "One on one", "rate": "40"})))
        .respond_with(ok(json!({"message": "Service added"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/service/providers/update/s1"))
        .respond_with(ok(json!({"message": "Service updated"})))
        .expect(1)
        .mount(&server)
        .await;

    client.add_service(&input).await.unwrap();
    client.update_service("s1", &input).await.unwrap();
}

#[tokio::test]
async fn test_coupon_calls() {
    let (server, _session, client) = client(Some("abc123")).await;

    Mock::given(method("POST"))
        .and(path("/coupon/create"))
        .and(body_json(json!({"count": 3, "planId": "pro"})))
        .respond_with(ok(json!({"message": "Created"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/coupon/deactivate/c1"))
        .and(body_json(json!({"isActive": false})))
        .respond_with(ok(json!({"message": "Deactivated"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/coupon"))
        .and(query_param("page", "1"))
        .respond_with(ok(json!({"result": {
            "CouponsDetails": [{"_id": "c1", "code": "ABC", "isActive": true}],
            "totalCount": 48
        }})))
        .mount(&server)
        .await;

    let request = CouponCreate {
        count: 3,
        plan_id: "pro".into(),
    };
    client.create_coupons(&request).await.unwrap();
    client.set_coupon_active("c1", false).await.unwrap();

    let page = client.coupons(1, 10).await.unwrap().into_result();
    assert_eq!(page.coupons[0].code, "ABC");
    assert_eq!(page.remaining_slots(), 2);
}

#[tokio::test]
async fn test_stripe_payment_returns_raw_payload() {
    let (server, _session, client) = client(Some("abc123")).await;

    Mock::given(method("GET"))
        .and(path("/stripe/payment"))
        .and(query_param("id", "pro"))
        .respond_with(ok(json!("https://checkout.example.com/s/1")))
        .expect(1)
        .mount(&server)
        .await;

    let checkout = client.stripe_payment("pro").await.unwrap();
    assert_eq!(checkout, json!("https://checkout.example.com/s/1"));
}

#[tokio::test]
async fn test_directory_details_and_rating_use_visitor_token() {
    let (server, _session, client) = client(None).await;

    Mock::given(method("GET"))
        .and(path("/user/get_provider_by_id/p1"))
        .and(header("authorization", "visitor"))
        .respond_with(ok(json!({"result": {
            "_id": "p1",
            "firstName": "Grace",
            "services": [{"_id": "s1", "name": "OT", "rate": 55}]
        }})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rating/parents/add"))
        .and(header("authorization", "visitor"))
        .and(body_json(json!({"providerId": "p1", "rate": 5, "description": "Great"})))
        .respond_with(ok(json!({"message": "Rated"})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = client.provider("p1", Some("visitor")).await.unwrap().into_result();
    assert_eq!(provider.services[0].name, "OT");

    let rating = RatingInput {
        provider_id: "p1".into(),
        rate: 5,
        description: "Great".into(),
    };
    client.add_rating(&rating, Some("visitor")).await.unwrap();
}

#[tokio::test]
async fn test_pick_lists() {
    let (server, _session, client) = client(None).await;

    Mock::given(method("GET"))
        .and(path("/occupations/all"))
        .respond_with(ok(json!({"result": [{"_id": "o1", "name": "Speech Therapist"}]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/insurance/all"))
        .respond_with(ok(json!([{"_id": "i1", "name": "Medicaid"}])))
        .mount(&server)
        .await;

    let occupations = client.occupation_list().await.unwrap().into_result();
    assert_eq!(occupations[0].name, "Speech Therapist");
    let insurance = client.insurance_list().await.unwrap().into_result();
    assert_eq!(insurance[0].name, "Medicaid");
}
