use std::sync::Arc;

use backoffice_api::app::{AppServices, build_app};
use backoffice_auth::{JwtClaims, Role};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{Value, json};

const SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory storage, ephemeral port.
        let services = Arc::new(AppServices::in_memory(SECRET));
        let app = build_app(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(role: Role) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: uuid::Uuid::now_v7().to_string(),
        role,
        email: None,
        iat: now.timestamp(),
        exp: (now + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn create_product(client: &reqwest::Client, srv: &TestServer, token: &str, a: i64, b: i64) -> Value {
    let res = client
        .post(srv.url("/product"))
        .bearer_auth(token)
        .json(&json!({
            "productName": "  Rice ",
            "stockA": { "quantity": a, "unit": "lb", "unitPrice": 2 },
            "stockB": { "quantity": b, "unitPrice": 3 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["data"].clone()
}

async fn stock_of(client: &reqwest::Client, srv: &TestServer, token: &str, id: &str) -> (f64, f64) {
    let res = client
        .get(srv.url(&format!("/product/{id}")))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    (
        body["data"]["stockA"]["quantity"].as_f64().unwrap(),
        body["data"]["stockB"]["quantity"].as_f64().unwrap(),
    )
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/product")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["message"], "Unauthorized request.");

    let res = client
        .get(srv.url("/product"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token.");
}

#[tokio::test]
async fn unknown_routes_get_the_envelope() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/nowhere")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["message"], "Route doesn't found");
}

#[tokio::test]
async fn product_lifecycle_and_pagination() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(Role::User);
    let client = reqwest::Client::new();

    let first = create_product(&client, &srv, &token, 1200, 35).await;
    assert_eq!(first["productId"], 1001);
    assert_eq!(first["productName"], "Rice");
    assert_eq!(first["stockA"]["display"], "1200lb");
    for _ in 0..2 {
        create_product(&client, &srv, &token, 1, 1).await;
    }

    let res = client
        .get(srv.url("/product?page=2&limit=2"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Product collection fetched successfully.");
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["products"][0]["productId"], 1003);
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);

    let res = client
        .get(srv.url("/product/search?query=1002"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["products"][0]["productId"], 1002);

    let res = client
        .get(srv.url("/product/not-a-key"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn orders_move_stock_and_deletion_keeps_it() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(Role::User);
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv, &token, 100, 50).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = client
        .post(srv.url("/order"))
        .bearer_auth(&token)
        .json(&json!({
            "product": product_id,
            "stockA": 10,
            "stockB": 5,
            "clientName": "Jane",
            "phone": "5550100",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Order placed successfully.");
    assert_eq!(body["data"]["orderId"], 1001);
    assert_eq!(body["data"]["product"]["productName"], "Rice");
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(stock_of(&client, &srv, &token, &product_id).await, (90.0, 45.0));

    let res = client
        .put(srv.url(&format!("/order/{order_id}")))
        .bearer_auth(&token)
        .json(&json!({ "stockA": 20, "stockB": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(stock_of(&client, &srv, &token, &product_id).await, (80.0, 50.0));

    let res = client
        .post(srv.url("/order"))
        .bearer_auth(&token)
        .json(&json!({ "product": product_id, "stockA": 500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Insufficient stock in the selected product.");
    assert_eq!(stock_of(&client, &srv, &token, &product_id).await, (80.0, 50.0));

    let res = client
        .delete(srv.url(&format!("/order/{order_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(stock_of(&client, &srv, &token, &product_id).await, (80.0, 50.0));
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/user"))
        .bearer_auth(mint_jwt(Role::User))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(srv.url("/user"))
        .bearer_auth(mint_jwt(Role::Admin))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "There is no any user register.");
}

#[tokio::test]
async fn login_returns_a_usable_token() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    srv.services
        .auth
        .ensure_admin("admin@example.com", "s3cret")
        .await
        .unwrap();

    let res = client
        .post(srv.url("/user/login"))
        .json(&json!({ "email": "admin@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(srv.url("/user/login"))
        .json(&json!({ "email": " Admin@Example.com ", "password": "s3cret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "login successfull.");
    assert_eq!(body["data"]["role"], "admin");
    let token = body["token"].as_str().unwrap().to_string();

    let res = client
        .get(srv.url("/dashboard/counter-details"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["totalProducts"], 0);
}

#[tokio::test]
async fn salary_status_is_set_through_the_record_path() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(Role::User);
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/salary"))
        .bearer_auth(&token)
        .json(&json!({
            "staffName": "Lina",
            "gender": "Female",
            "salary": 1200,
            "phone": "5550101",
            "paidBy": "Sam",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Unpaid");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let res = client
        .patch(srv.url(&format!("/salary/{id}?status=Paid")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Salary status updated successfully.");
    assert_eq!(body["data"]["status"], "Paid");

    let res = client
        .patch(srv.url(&format!("/salary/{id}/status?status=Unpaid")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Unpaid");

    let res = client
        .patch(srv.url(&format!("/salary/{id}?status=Later")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
