use super::*;
use axum::{
    body::{self, Body},
    http::{header, Request, Response},
};
use serde_json::{json, Value};
use shared::{
    domain::{Money, ProductId},
    error::ErrorCode,
    protocol::{Order, Product, ProductPage, UploadResponse, UserProfile},
};
use storage::{NewUser, ProductFields};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    storage: Storage,
    product: ProductId,
}

async fn test_app() -> TestApp {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let password_hash = auth::hash_password("123456").expect("hash");
    let admin = storage
        .create_user(&NewUser {
            name: "Admin User",
            email: "admin@email.com",
            password_hash: &password_hash,
            is_admin: true,
        })
        .await
        .expect("admin");
    storage
        .create_user(&NewUser {
            name: "Bana Moja",
            email: "bana@email.com",
            password_hash: &password_hash,
            is_admin: false,
        })
        .await
        .expect("buyer");
    let product = storage
        .create_product(
            admin,
            &ProductFields {
                name: "Logitech G-Series Gaming Mouse".into(),
                image: "/images/mouse.jpg".into(),
                brand: "Logitech".into(),
                category: "Electronics".into(),
                description: "Precision mouse".into(),
                price: Money(49_99),
                count_in_stock: 7,
            },
        )
        .await
        .expect("product");

    let settings = Settings {
        paypal_client_id: Some("sandbox-client".into()),
        max_upload_bytes: 1024,
        ..Settings::default()
    };
    let state = Arc::new(build_state(storage.clone(), &settings));
    TestApp {
        app: build_router(state),
        storage,
        product,
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("response")
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, payload: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// Signs in and returns the `jwt=<token>` pair to send back as a cookie.
async fn login(app: &Router, email: &str) -> String {
    let response = send(
        app,
        json_request(
            "POST",
            "/api/users/auth",
            None,
            json!({ "email": email, "password": "123456" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie")
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let t = test_app().await;
    let response = send(&t.app, empty_request("GET", "/healthz", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn unknown_routes_name_the_missing_path() {
    let t = test_app().await;
    let response = send(&t.app, empty_request("GET", "/api/nothing-here", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.message, "Not Found - /api/nothing-here");
}

#[tokio::test]
async fn login_sets_cookie_and_profile_reads_it() {
    let t = test_app().await;
    let cookie = login(&t.app, "bana@email.com").await;

    let response = send(&t.app, empty_request("GET", "/api/users/profile", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile: UserProfile = json_body(response).await;
    assert_eq!(profile.email, "bana@email.com");
    assert!(!profile.is_admin);
}

#[tokio::test]
async fn bearer_token_is_accepted_without_cookie() {
    let t = test_app().await;
    let cookie = login(&t.app, "bana@email.com").await;
    let token = cookie.trim_start_matches("jwt=");

    let request = Request::get("/api/users/profile")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    assert_eq!(send(&t.app, request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_and_missing_session_are_unauthorized() {
    let t = test_app().await;
    let response = send(
        &t.app,
        json_request(
            "POST",
            "/api/users/auth",
            None,
            json!({ "email": "bana@email.com", "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.message, "Invalid email or password");

    let response = send(&t.app, empty_request("GET", "/api/orders/myorders", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &t.app,
        empty_request("GET", "/api/users/profile", Some("jwt=not-a-token")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_returns_created_profile_and_rejects_duplicates() {
    let t = test_app().await;
    let payload = json!({ "name": "New Shopper", "email": "new@email.com", "password": "secret1" });

    let response = send(&t.app, json_request("POST", "/api/users", None, payload.clone())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().contains_key(header::SET_COOKIE));
    let profile: UserProfile = json_body(response).await;
    assert_eq!(profile.name, "New Shopper");

    let response = send(&t.app, json_request("POST", "/api/users", None, payload)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let t = test_app().await;
    let response = send(&t.app, empty_request("POST", "/api/users/logout", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(set_cookie.starts_with("jwt=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn product_listing_and_detail_are_public() {
    let t = test_app().await;
    let response = send(
        &t.app,
        empty_request("GET", "/api/products?keyword=mouse&pageNumber=1", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: ProductPage = json_body(response).await;
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.page, 1);

    let response = send(
        &t.app,
        empty_request("GET", &format!("/api/products/{}", t.product.0), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body["_id"], json!(t.product.0));
    assert_eq!(body["price"], json!(49.99));
    assert_eq!(body["countInStock"], json!(7));

    let response = send(&t.app, empty_request("GET", "/api/products/top", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_and_unknown_product_ids_are_not_found() {
    let t = test_app().await;
    for uri in ["/api/products/not-an-id", "/api/products/9999"] {
        let response = send(&t.app, empty_request("GET", uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }
    let response = send(&t.app, empty_request("GET", "/api/products/not-an-id", None)).await;
    let err: ApiError = json_body(response).await;
    assert_eq!(err.message, "Resource not found");
}

#[tokio::test]
async fn admin_product_routes_reject_shoppers() {
    let t = test_app().await;
    let shopper = login(&t.app, "bana@email.com").await;
    let response = send(&t.app, empty_request("POST", "/api/products", Some(&shopper))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.message, "Not authorized as admin");

    let response = send(&t.app, empty_request("POST", "/api/products", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_creates_edits_and_deletes_a_product() {
    let t = test_app().await;
    let admin = login(&t.app, "admin@email.com").await;

    let response = send(&t.app, empty_request("POST", "/api/products", Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sample: Product = json_body(response).await;
    assert_eq!(sample.name, "Sample name");

    let response = send(
        &t.app,
        json_request(
            "PUT",
            &format!("/api/products/{}", sample.id.0),
            Some(&admin),
            json!({
                "name": "Mechanical Keyboard",
                "price": "120.50",
                "description": "Clicky",
                "image": "/uploads/keyboard.png",
                "brand": "Keys",
                "category": "Electronics",
                "countInStock": "4"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited: Product = json_body(response).await;
    assert_eq!(edited.name, "Mechanical Keyboard");
    assert_eq!(edited.price, Money(120_50));
    assert_eq!(edited.count_in_stock.0, 4);

    let response = send(
        &t.app,
        empty_request(
            "DELETE",
            &format!("/api/products/{}", sample.id.0),
            Some(&admin),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(
        &t.app,
        empty_request("GET", &format!("/api/products/{}", sample.id.0), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_checkout_pay_and_deliver_over_http() {
    let t = test_app().await;
    let shopper = login(&t.app, "bana@email.com").await;
    let admin = login(&t.app, "admin@email.com").await;

    let response = send(
        &t.app,
        json_request(
            "POST",
            "/api/orders",
            Some(&shopper),
            json!({
                "orderItems": [{ "_id": t.product.0, "qty": 2, "price": 0.01 }],
                "shippingAddress": {
                    "address": "Bulevar 1",
                    "city": "Novi Sad",
                    "postalCode": "21000",
                    "country": "Serbia"
                },
                "paymentMethod": "PayPal"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let order: Order = json_body(response).await;
    assert_eq!(order.items_price, Money(99_98));
    assert_eq!(order.shipping_price, Money(10_00));
    assert_eq!(order.tax_price, Money(15_00));
    assert_eq!(order.total_price, Money(124_98));
    let order_uri = format!("/api/orders/{}", order.id.0);

    let response = send(&t.app, empty_request("GET", "/api/orders/myorders", Some(&shopper))).await;
    let mine: Vec<Order> = json_body(response).await;
    assert_eq!(mine.len(), 1);

    let response = send(
        &t.app,
        empty_request("PUT", &format!("{order_uri}/deliver"), Some(&admin)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &t.app,
        json_request(
            "PUT",
            &format!("{order_uri}/pay"),
            Some(&shopper),
            json!({
                "id": "PAY-123",
                "status": "COMPLETED",
                "update_time": "2026-10-19T10:00:00Z",
                "payer": { "email_address": "bana@email.com" }
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let paid: Order = json_body(response).await;
    assert!(paid.is_paid);
    let payment = paid.payment_result.expect("payment result");
    assert_eq!(payment.id, "PAY-123");
    assert_eq!(payment.email_address, "bana@email.com");

    let response = send(
        &t.app,
        empty_request("GET", &format!("{order_uri}/pay"), Some(&shopper)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &t.app,
        empty_request("PUT", &format!("{order_uri}/deliver"), Some(&shopper)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &t.app,
        empty_request("PUT", &format!("{order_uri}/deliver"), Some(&admin)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let delivered: Order = json_body(response).await;
    assert!(delivered.is_delivered);

    let response = send(&t.app, empty_request("GET", "/api/orders/", Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let all: Vec<Order> = json_body(response).await;
    assert_eq!(all.len(), 1);

    let response = send(&t.app, empty_request("GET", "/api/orders", Some(&shopper))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bodiless_get_marks_order_paid() {
    let t = test_app().await;
    let shopper = login(&t.app, "bana@email.com").await;
    let response = send(
        &t.app,
        json_request(
            "POST",
            "/api/orders",
            Some(&shopper),
            json!({
                "orderItems": [{ "product": t.product.0, "qty": 3 }],
                "shippingAddress": {
                    "address": "Bulevar 1",
                    "city": "Novi Sad",
                    "postalCode": "21000",
                    "country": "Serbia"
                },
                "paymentMethod": "PayPal"
            }),
        ),
    )
    .await;
    let order: Order = json_body(response).await;
    assert_eq!(order.shipping_price, Money::ZERO);

    let response = send(
        &t.app,
        empty_request("GET", &format!("/api/orders/{}/pay", order.id.0), Some(&shopper)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let paid: Order = json_body(response).await;
    assert!(paid.is_paid);
    assert!(paid.payment_result.is_none());
}

#[tokio::test]
async fn foreign_orders_are_hidden_from_other_shoppers() {
    let t = test_app().await;
    let admin = login(&t.app, "admin@email.com").await;
    let shopper = login(&t.app, "bana@email.com").await;
    let response = send(
        &t.app,
        json_request(
            "POST",
            "/api/orders",
            Some(&admin),
            json!({
                "orderItems": [{ "_id": t.product.0, "qty": 1 }],
                "shippingAddress": {
                    "address": "HQ",
                    "city": "Belgrade",
                    "postalCode": "11000",
                    "country": "Serbia"
                },
                "paymentMethod": "PayPal"
            }),
        ),
    )
    .await;
    let order: Order = json_body(response).await;

    let response = send(
        &t.app,
        empty_request("GET", &format!("/api/orders/{}", order.id.0), Some(&shopper)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &t.app,
        empty_request("GET", "/api/orders/garbage", Some(&shopper)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn multipart_request(cookie: &str, file_name: &str, mime: &str, data: &[u8]) -> Request<Body> {
    let boundary = "storefront-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::post("/api/upload")
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn admin_uploads_image_and_it_is_served_back() {
    let t = test_app().await;
    let admin = login(&t.app, "admin@email.com").await;
    let png = b"\x89PNG\r\n\x1a\nfake-image-bytes";

    let response = send(&t.app, multipart_request(&admin, "photo.png", "image/png", png)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded: UploadResponse = json_body(response).await;
    assert_eq!(uploaded.message, "Image uploaded successfully");
    assert!(uploaded.image.starts_with("/uploads/image-"));
    assert!(uploaded.image.ends_with(".png"));

    let response = send(&t.app, empty_request("GET", &uploaded.image, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).expect("type"),
        "image/png"
    );
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(bytes.as_ref(), png);

    let name = uploaded.image.trim_start_matches("/uploads/");
    let stored = t.storage.load_image(name).await.expect("load").expect("image");
    assert_eq!(stored.mime_type, "image/png");
}

#[tokio::test]
async fn upload_rejects_wrong_types_oversized_files_and_shoppers() {
    let t = test_app().await;
    let admin = login(&t.app, "admin@email.com").await;
    let shopper = login(&t.app, "bana@email.com").await;

    let response = send(
        &t.app,
        multipart_request(&admin, "notes.txt", "text/plain", b"hello"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &t.app,
        multipart_request(&admin, "photo.png", "image/jpeg", b"bytes"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let oversized = vec![7u8; 2048];
    let response = send(
        &t.app,
        multipart_request(&admin, "big.jpg", "image/jpeg", &oversized),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let response = send(
        &t.app,
        multipart_request(&shopper, "photo.png", "image/png", b"bytes"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&t.app, empty_request("GET", "/uploads/missing.png", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn paypal_client_id_is_exposed() {
    let t = test_app().await;
    let response = send(&t.app, empty_request("GET", "/api/config/paypal", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body, json!({ "clientId": "sandbox-client" }));
}

#[tokio::test]
async fn admin_manages_users_but_cannot_delete_admins() {
    let t = test_app().await;
    let admin = login(&t.app, "admin@email.com").await;

    let response = send(&t.app, empty_request("GET", "/api/users", Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let users: Vec<UserProfile> = json_body(response).await;
    assert_eq!(users.len(), 2);
    let admin_id = users.iter().find(|u| u.is_admin).expect("admin").id;
    let shopper_id = users.iter().find(|u| !u.is_admin).expect("shopper").id;

    let response = send(
        &t.app,
        json_request(
            "PUT",
            &format!("/api/users/{}", shopper_id.0),
            Some(&admin),
            json!({ "name": "Bana Renamed" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: UserProfile = json_body(response).await;
    assert_eq!(updated.name, "Bana Renamed");

    let response = send(
        &t.app,
        empty_request("DELETE", &format!("/api/users/{}", admin_id.0), Some(&admin)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &t.app,
        empty_request("DELETE", &format!("/api/users/{}", shopper_id.0), Some(&admin)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn quoted_session_cookie_is_accepted() {
    let t = test_app().await;
    let cookie = login(&t.app, "bana@email.com").await;
    let token = cookie.trim_start_matches("jwt=");

    let quoted = format!("theme=dark; jwt=\"{token}\"");
    let response = send(&t.app, empty_request("GET", "/api/users/profile", Some(&quoted))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn production_cookies_are_secure_when_set_and_cleared() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let password_hash = auth::hash_password("123456").expect("hash");
    storage
        .create_user(&NewUser {
            name: "Bana Moja",
            email: "bana@email.com",
            password_hash: &password_hash,
            is_admin: false,
        })
        .await
        .expect("user");
    let settings = Settings {
        production: true,
        jwt_secret: "s3cret".into(),
        ..Settings::default()
    };
    let app = build_router(Arc::new(build_state(storage, &settings)));

    let response = send(
        &app,
        json_request(
            "POST",
            "/api/users/auth",
            None,
            json!({ "email": "bana@email.com", "password": "123456" }),
        ),
    )
    .await;
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(set_cookie.contains("Secure"));

    let response = send(&app, empty_request("POST", "/api/users/logout", None)).await;
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(cleared.starts_with("jwt=;"));
    assert!(cleared.contains("Max-Age=0"));
    assert!(cleared.contains("Secure"));
    assert!(cleared.contains("HttpOnly"));
}

#[tokio::test]
async fn price_above_the_ceiling_is_a_bad_request() {
    let t = test_app().await;
    let admin = login(&t.app, "admin@email.com").await;

    let response = send(
        &t.app,
        json_request(
            "PUT",
            &format!("/api/products/{}", t.product.0),
            Some(&admin),
            json!({
                "name": "Gold Mouse",
                "price": "10000000000000000",
                "description": "Expensive",
                "image": "/images/mouse.jpg",
                "brand": "Logitech",
                "category": "Electronics",
                "countInStock": 1
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.code, ErrorCode::Validation);

    let response = send(
        &t.app,
        empty_request("GET", &format!("/api/products/{}", t.product.0), None),
    )
    .await;
    let unchanged: Product = json_body(response).await;
    assert_eq!(unchanged.price, Money(49_99));
}

#[tokio::test]
async fn empty_capture_body_records_no_payment() {
    let t = test_app().await;
    let shopper = login(&t.app, "bana@email.com").await;
    let response = send(
        &t.app,
        json_request(
            "POST",
            "/api/orders",
            Some(&shopper),
            json!({
                "orderItems": [{ "product": t.product.0, "qty": 1 }],
                "shippingAddress": {
                    "address": "Bulevar 1",
                    "city": "Novi Sad",
                    "postalCode": "21000",
                    "country": "Serbia"
                },
                "paymentMethod": "PayPal"
            }),
        ),
    )
    .await;
    let order: Order = json_body(response).await;

    let response = send(
        &t.app,
        json_request(
            "PUT",
            &format!("/api/orders/{}/pay", order.id.0),
            Some(&shopper),
            json!({}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let paid: Order = json_body(response).await;
    assert!(paid.is_paid);
    assert!(paid.payment_result.is_none());
}
