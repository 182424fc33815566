//! HTTP integration tests: the router driven directly with
//! `tower::ServiceExt::oneshot` against an in-memory database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shopbill_db::{Database, DbConfig, NewProduct};
use shopbill_server::auth::issue_token;
use shopbill_server::{app, AppState, ServerConfig};

async fn test_state() -> AppState {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    AppState::new(db, ServerConfig::for_tests())
}

fn session_cookie(state: &AppState) -> String {
    let token = issue_token(&state.config, 1, "tester").unwrap();
    format!("session={}", token)
}

async fn seed_product(state: &AppState, name: &str, price_paise: i64, stock: i64) -> i64 {
    state
        .db
        .products()
        .insert(NewProduct {
            name: name.to_string(),
            price_paise,
            stock,
            barcode: Some(format!("BC-{}", name)),
        })
        .await
        .unwrap()
        .id
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn raw_body(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn flat_checkout(
    router: &Router,
    cookie: &str,
    product_id: i64,
    quantity: i64,
    price: f64,
) -> (StatusCode, Value) {
    let body = json!({
        "customer_id": null,
        "items": [{"product_id": product_id, "quantity": quantity, "price": price}],
        "payment_method": "Cash",
    });
    let response = router
        .clone()
        .oneshot(post_json("/billing/create", Some(cookie), &body))
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn test_flat_rate_checkout_reference_math() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    let pad = seed_product(&state, "Pad", 5000, 10).await;
    let router = app(state.clone());

    let body = json!({
        "customer_id": null,
        "items": [
            {"product_id": pen, "quantity": 2, "price": 100.0},
            {"product_id": pad, "quantity": 1, "price": 50.0},
        ],
        "payment_method": "Cash",
    });
    let response = router
        .clone()
        .oneshot(post_json("/billing/create", Some(&cookie), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = json_body(response).await;
    assert_eq!(created["success"], json!(true));
    let bill_id = created["bill_id"].as_i64().unwrap();
    assert!(created["bill_number"].as_str().unwrap().starts_with("BILL"));

    // 2 × ₹100 + 1 × ₹50 → 250.00 / 45.00 / 295.00
    let response = router
        .clone()
        .oneshot(get(&format!("/invoices/{}/print", bill_id), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = json_body(response).await;
    let invoice = &page["invoice"];
    assert_eq!(invoice["subtotal"], json!(25000));
    assert_eq!(invoice["gst"], json!(4500));
    assert_eq!(invoice["total"], json!(29500));
    assert_eq!(invoice["billed_to"]["name"], json!("Walk-in Customer"));
    assert_eq!(invoice["lines"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_checkout_requires_session() {
    let state = test_state().await;
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    let router = app(state);

    let body = json!({
        "customer_id": null,
        "items": [{"product_id": pen, "quantity": 1, "price": 100.0}],
    });
    let response = router
        .oneshot(post_json("/billing/create", None, &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_createbill_accepts_unauthenticated_requests() {
    let state = test_state().await;
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    let router = app(state.clone());

    // No session cookie on purpose
    let body = json!({
        "customer_id": null,
        "items": [{"product_id": pen, "quantity": 1, "price": 100.0}],
        "subtotal": 100.0,
        "gst_type": "intra",
        "cgst": 9.0,
        "sgst": 9.0,
        "total": 118.0,
        "payment_method": "UPI",
    });
    let response = router
        .oneshot(post_json("/createbill", None, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = json_body(response).await;
    assert_eq!(created["status"], json!("success"));

    let bill_id = created["bill_id"].as_i64().unwrap();
    let bill = state.db.bills().get(bill_id).await.unwrap().unwrap();
    // Itemized mode records the caller's components
    assert_eq!(bill.gst_paise, 1800);
    assert_eq!(bill.total_paise, 11800);
}

#[tokio::test]
async fn test_stock_conflict_returns_409_and_persists_nothing() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let rare = seed_product(&state, "Rare", 10000, 1).await;
    let router = app(state.clone());

    let (status, body) = flat_checkout(&router, &cookie, rare, 2, 100.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));

    assert_eq!(state.db.bills().count().await.unwrap(), 0);
    assert_eq!(state.db.products().get(rare).await.unwrap().unwrap().stock, 1);

    // The last unit still sells normally afterwards
    let (status, _) = flat_checkout(&router, &cookie, rare, 1, 100.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.db.products().get(rare).await.unwrap().unwrap().stock, 0);
}

#[tokio::test]
async fn test_unknown_barcode_is_a_result_not_an_error() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    seed_product(&state, "Pen", 10000, 10).await;
    let router = app(state);

    let response = router
        .clone()
        .oneshot(get("/api/products/barcode/BC-Pen", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let found = json_body(response).await;
    assert_eq!(found["success"], json!(true));
    assert_eq!(found["product"]["name"], json!("Pen"));

    let response = router
        .oneshot(get("/api/products/barcode/no-such-code", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let missing = json_body(response).await;
    assert_eq!(missing["success"], json!(false));
    assert_eq!(missing["error"], json!("Product not found"));
}

#[tokio::test]
async fn test_product_delete_removes_from_listing() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let doomed = seed_product(&state, "Doomed", 500, 3).await;
    seed_product(&state, "Keeper", 500, 3).await;
    let router = app(state);

    let response = router
        .clone()
        .oneshot(get(&format!("/products/delete/{}", doomed), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains("status=success"));

    let response = router
        .oneshot(get("/api/products", Some(&cookie)))
        .await
        .unwrap();
    let listing = json_body(response).await;
    let names: Vec<&str> = listing["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Keeper"]);
}

#[tokio::test]
async fn test_savedraft_then_complete_payment() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    let router = app(state.clone());

    let body = json!({
        "customer_id": null,
        "items": [{"product_id": pen, "quantity": 1, "price": 100.0}],
        "subtotal": 100.0,
        "igst": 18.0,
        "gst_type": "inter",
        "total": 118.0,
        "payment_method": "UPI",
    });
    let response = router
        .clone()
        .oneshot(post_json("/savedraft", Some(&cookie), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bill_id = json_body(response).await["bill_id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(get(&format!("/confirm-payment/{}", bill_id), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let confirm = json_body(response).await;
    assert_eq!(confirm["payment_method"], json!("UPI"));
    assert_eq!(confirm["status"], json!("Payment Pending"));

    let response = router
        .clone()
        .oneshot(post_form(
            &format!("/complete-payment/{}", bill_id),
            Some(&cookie),
            "upi_id=shop%40upi",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/invoices/{}/print", bill_id));

    let bill = state.db.bills().get(bill_id).await.unwrap().unwrap();
    assert_eq!(bill.status.as_str(), "Completed");
    assert_eq!(bill.upi_id.as_deref(), Some("shop@upi"));
}

#[tokio::test]
async fn test_invoice_rendering_is_idempotent() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    let router = app(state);

    let (_, created) = flat_checkout(&router, &cookie, pen, 2, 100.0).await;
    let bill_id = created["bill_id"].as_i64().unwrap();
    let uri = format!("/invoices/{}/print", bill_id);

    let first = raw_body(
        router
            .clone()
            .oneshot(get(&uri, Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    let second = raw_body(router.clone().oneshot(get(&uri, Some(&cookie))).await.unwrap()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_invoice_pdf_download() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    let router = app(state);

    let (_, created) = flat_checkout(&router, &cookie, pen, 1, 100.0).await;
    let bill_id = created["bill_id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(get(&format!("/invoices/{}/pdf", bill_id), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let bytes = raw_body(response).await;
    assert!(bytes.starts_with(b"%PDF"));

    // Missing bill is a user-visible not-found
    let response = router
        .oneshot(get("/invoices/9999/pdf", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_validation_and_login_flow() {
    let state = test_state().await;
    let router = app(state);

    // Too-short username never reaches the database
    let response = router
        .clone()
        .oneshot(post_form(
            "/register",
            None,
            "username=abc&password=secret123&confirm_password=secret123",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains("status=error"));

    // Mismatched confirmation
    let response = router
        .clone()
        .oneshot(post_form(
            "/register",
            None,
            "username=cashier1&password=secret123&confirm_password=different",
        ))
        .await
        .unwrap();
    assert!(location(&response).contains("status=error"));

    // Valid registration
    let response = router
        .clone()
        .oneshot(post_form(
            "/register",
            None,
            "username=cashier1&password=secret123&confirm_password=secret123",
        ))
        .await
        .unwrap();
    assert!(location(&response).starts_with("/login?status=success"));

    // Duplicate username is rejected
    let response = router
        .clone()
        .oneshot(post_form(
            "/register",
            None,
            "username=cashier1&password=secret123&confirm_password=secret123",
        ))
        .await
        .unwrap();
    assert!(location(&response).contains("Username+already+exists"));

    // Wrong password fails, right password sets the session cookie
    let response = router
        .clone()
        .oneshot(post_form("/login", None, "username=cashier1&password=wrong"))
        .await
        .unwrap();
    assert!(location(&response).starts_with("/login?status=error"));

    let response = router
        .clone()
        .oneshot(post_form(
            "/login",
            None,
            "username=cashier1&password=secret123",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session="));

    // The issued cookie opens protected pages
    let session = cookie.split(';').next().unwrap().to_string();
    let response = router
        .oneshot(get("/dashboard", Some(&session)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let dashboard = json_body(response).await;
    assert_eq!(dashboard["week_labels"].as_array().unwrap().len(), 7);
    assert_eq!(dashboard["username"], json!("cashier1"));
}

#[tokio::test]
async fn test_dashboard_and_api_stats() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    seed_product(&state, "Scarce", 10000, 2).await;
    let router = app(state);

    let (_, _) = flat_checkout(&router, &cookie, pen, 1, 100.0).await;
    let (_, _) = flat_checkout(&router, &cookie, pen, 1, 100.0).await;

    let response = router
        .clone()
        .oneshot(get("/api/billing/stats", Some(&cookie)))
        .await
        .unwrap();
    let stats = json_body(response).await;
    assert_eq!(stats["today_bills"], json!(2));
    assert_eq!(stats["low_stock_count"], json!(1));

    let response = router
        .clone()
        .oneshot(get("/dashboard", Some(&cookie)))
        .await
        .unwrap();
    let dashboard = json_body(response).await;
    assert_eq!(dashboard["bill_count"], json!(2));
    // 2 × ₹118.00
    assert_eq!(dashboard["today_total"], json!(236.0));
    let totals = dashboard["week_totals"].as_array().unwrap();
    assert_eq!(totals.len(), 7);
    assert_eq!(totals[6], json!(236.0));
}

#[tokio::test]
async fn test_customer_quick_add_and_stats() {
    let state = test_state().await;
    let cookie = session_cookie(&state);
    let pen = seed_product(&state, "Pen", 10000, 10).await;
    let router = app(state.clone());

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/customers/quick-add",
            Some(&cookie),
            &json!({"name": "Asha Traders", "phone": "9876543210"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let added = json_body(response).await;
    assert_eq!(added["success"], json!(true));
    let customer_id = added["customer"]["id"].as_i64().unwrap();

    // Empty name is a validation failure
    let response = router
        .clone()
        .oneshot(post_json(
            "/api/customers/quick-add",
            Some(&cookie),
            &json!({"name": "   "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // One purchase attributed to the customer
    let body = json!({
        "customer_id": customer_id,
        "items": [{"product_id": pen, "quantity": 1, "price": 100.0}],
        "payment_method": "Cash",
    });
    let response = router
        .clone()
        .oneshot(post_json("/billing/create", Some(&cookie), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(get(
            &format!("/api/customer/{}/stats", customer_id),
            Some(&cookie),
        ))
        .await
        .unwrap();
    let stats = json_body(response).await;
    assert_eq!(stats["total_bills"], json!(1));
    assert_eq!(stats["total_spent"], json!(118.0));

    let response = router
        .oneshot(get("/api/customer/9999/stats", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
