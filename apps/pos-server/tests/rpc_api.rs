//! End-to-end tests of the RPC surface through the router, without
//! binding a socket: requests are driven with `tower::ServiceExt::oneshot`
//! against an in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use bistro_core::{Cashier, DevicePrinterRow, Item, ItemGroup, PosProfile};
use bistro_db::{hash_secret, Database, DbConfig};
use pos_server::{router, AppState, ServerConfig};

const DEVICE: &str = "TILL-01";

// =============================================================================
// Harness
// =============================================================================

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed(&db).await;
    router(AppState::new(db, ServerConfig::default()))
}

async fn seed(db: &Database) {
    let now = Utc::now();
    db.cashiers()
        .insert(&Cashier {
            id: Uuid::new_v4().to_string(),
            cashier_code: "1001".to_string(),
            password_hash: hash_secret("1234").unwrap(),
            full_name: "Demo Cashier".to_string(),
            email: Some("cashier@example.com".to_string()),
            enabled: true,
            api_key: None,
            api_secret_hash: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    db.devices().insert(DEVICE, "Front Till", true).await.unwrap();
    db.devices().insert("TILL-99", "Retired Till", false).await.unwrap();

    let catalog = db.catalog();
    for (id, parent, is_group) in [
        ("Food", None, true),
        ("Burgers", Some("Food"), false),
        ("Drinks", None, false),
    ] {
        catalog
            .insert_group(&ItemGroup {
                id: id.to_string(),
                group_name: id.to_string(),
                parent_group_id: parent.map(str::to_string),
                is_group,
            })
            .await
            .unwrap();
    }
    for (code, group, rate_cents) in [("BURGER", "Burgers", 5000), ("B52", "Drinks", 12000)] {
        catalog
            .insert_item(&Item {
                id: code.to_string(),
                item_name: code.to_string(),
                description: None,
                uom: "Unit".to_string(),
                rate_cents,
                group_id: group.to_string(),
                disabled: false,
            })
            .await
            .unwrap();
    }
    catalog
        .insert_profile(&PosProfile {
            id: "Main Cashier".to_string(),
            profile_name: "Main Cashier".to_string(),
            disabled: false,
        })
        .await
        .unwrap();
    catalog.link_profile_group("Main Cashier", "Food").await.unwrap();
    catalog.link_profile_group("Main Cashier", "Drinks").await.unwrap();

    db.printing()
        .insert_route(&DevicePrinterRow {
            device_id: DEVICE.to_string(),
            print_class: "Hot Kitchen".to_string(),
            preparation_printer: "kitchen-1".to_string(),
            connection_info: "tcp://kitchen-1:9100".to_string(),
            backup_printer: None,
            backup_connection_info: None,
        })
        .await
        .unwrap();

    db.currencies().insert_rate("USD", 48.5).await.unwrap();
}

fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    device: Option<&str>,
    body: Option<&Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("token {token}"));
    }
    if let Some(device) = device {
        builder = builder.header("X-Device-Id", device);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/pos/login",
            None,
            None,
            Some(&json!({ "cashier_code": "1001", "cashier_password": "1234" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["authorization"].as_str().unwrap().to_string()
}

async fn open_session(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/pos/session/open",
            Some(token),
            Some(DEVICE),
            Some(&json!({ "pos_profile": "Main Cashier", "opening_cash": 100.0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "session open failed: {body}");
    body["session"].as_str().unwrap().to_string()
}

// =============================================================================
// Auth & Guards
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let app = test_app().await;
    let (status, body) = send(&app, request("GET", "/api/pos/health", None, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn login_succeeds_and_returns_token() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/login",
            None,
            None,
            Some(&json!({ "cashier_code": "1001", "cashier_password": "1234" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["token_type"], "token");
    assert_eq!(body["full_name"], "Demo Cashier");
    assert!(body["authorization"].as_str().unwrap().contains(':'));
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/login",
            None,
            None,
            Some(&json!({ "cashier_code": "1001", "cashier_password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_FAILED");

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/pos/login",
            None,
            None,
            Some(&json!({ "cashier_code": "9999", "cashier_password": "1234" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_is_required_and_verified() {
    let app = test_app().await;

    let (status, _) = send(&app, request("GET", "/api/pos/session-info", None, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("GET", "/api/pos/session-info", Some("bogus:creds"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    let (status, body) = send(
        &app,
        request("GET", "/api/pos/session-info", Some(&token), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["cashier_code"], "1001");
    assert_eq!(body["session"]["currency"], "EGP");
}

#[tokio::test]
async fn login_rotates_previous_token() {
    let app = test_app().await;

    let old_token = login(&app).await;
    let new_token = login(&app).await;

    let (status, _) = send(
        &app,
        request("GET", "/api/pos/session-info", Some(&old_token), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("GET", "/api/pos/session-info", Some(&new_token), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn device_guard_rejects_missing_unknown_and_disabled() {
    let app = test_app().await;
    let token = login(&app).await;

    for device in [None, Some("TILL-42"), Some("TILL-99")] {
        let (status, body) = send(
            &app,
            request("GET", "/api/pos/session/active", Some(&token), device, None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "device {device:?}: {body}");
        assert_eq!(body["code"], "DEVICE_FORBIDDEN");
    }

    let (status, body) = send(
        &app,
        request("GET", "/api/pos/session/active", Some(&token), Some(DEVICE), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn logout_invalidates_token() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        request("POST", "/api/pos/logout", Some(&token), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(
        &app,
        request("GET", "/api/pos/session-info", Some(&token), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Public Endpoints
// =============================================================================

#[tokio::test]
async fn printers_map_is_public_and_filters() {
    let app = test_app().await;

    let (status, body) = send(&app, request("GET", "/api/pos/printers", None, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["cashier_device_name"], DEVICE);
    assert_eq!(
        body[0]["print_classes"]["Hot Kitchen"]["preparation_printer"],
        "kitchen-1"
    );

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/api/pos/printers?cashier_device_name=TILL-42",
            None,
            None,
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn currency_list_includes_base_and_exchange_rows() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        request("GET", "/api/pos/currencies", Some(&token), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "name": "EGP", "exchange_rate": 1.0 },
            { "name": "USD", "exchange_rate": 48.5 }
        ])
    );
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn session_open_close_lifecycle() {
    let app = test_app().await;
    let token = login(&app).await;

    let session_id = open_session(&app, &token).await;

    // Second open on the same profile conflicts.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/session/open",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "pos_profile": "Main Cashier" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, body) = send(
        &app,
        request("GET", "/api/pos/session/active", Some(&token), Some(DEVICE), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], session_id.as_str());
    assert_eq!(body["status"], "open");

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/session/close",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "session": session_id, "closing_cash": 320.0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["closing_entry"].is_string());

    // Closing again conflicts; closing an unknown session is 404.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/pos/session/close",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "session": session_id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/pos/session/close",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "session": "nope" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_open_unknown_profile_is_404() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/pos/session/open",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "pos_profile": "Ghost Profile" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn catalog_for_active_session_is_nested() {
    let app = test_app().await;
    let token = login(&app).await;

    // No session yet.
    let (status, body) = send(
        &app,
        request("GET", "/api/pos/catalog", Some(&token), Some(DEVICE), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);

    open_session(&app, &token).await;

    let (status, body) = send(
        &app,
        request("GET", "/api/pos/catalog", Some(&token), Some(DEVICE), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ok"], true);
    assert_eq!(body["pos_profile"], "Main Cashier");

    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["item_group_id"], "Food");
    assert_eq!(groups[0]["child_groups"][0]["item_group_id"], "Burgers");
    assert_eq!(
        groups[0]["child_groups"][0]["items"][0]["item_code"],
        "BURGER"
    );
    assert_eq!(groups[0]["child_groups"][0]["items"][0]["rate"], 50.0);
    assert_eq!(groups[1]["item_group_id"], "Drinks");
    assert_eq!(groups[1]["items"][0]["item_code"], "B52");
}

#[tokio::test]
async fn catalog_for_named_profile() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        request(
            "GET",
            "/api/pos/profile/Main%20Cashier/catalog",
            Some(&token),
            Some(DEVICE),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = send(
        &app,
        request(
            "GET",
            "/api/pos/profile/Ghost/catalog",
            Some(&token),
            Some(DEVICE),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn invoice_flow_upsert_bulk_void_list() {
    let app = test_app().await;
    let token = login(&app).await;
    let session_id = open_session(&app, &token).await;

    // Create requires a customer.
    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/pos/invoice/INV-NEW",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "table_number": "7" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Create.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/pos/invoice/INV-1",
            Some(&token),
            Some(DEVICE),
            Some(&json!({
                "customer": "Walk-In Customer",
                "pos_session": session_id,
                "table_number": "7",
                "number_of_guests": 2
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ok"], true);
    assert_eq!(body["invoice_id"], "INV-1");
    assert_eq!(body["docstatus"], 0);
    assert_eq!(body["invoice"]["customer"], "Walk-In Customer");
    assert_eq!(body["invoice"]["status"], "draft");

    // Update keeps untouched fields and replaces payments.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/pos/invoice/INV-1",
            Some(&token),
            Some(DEVICE),
            Some(&json!({
                "room_number": "204",
                "payments": [
                    { "mode_of_payment": "Cash", "amount": 100.0 },
                    { "mode_of_payment": "Room Folio", "amount": 120.0, "folio_window": "1" }
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["invoice"]["customer"], "Walk-In Customer");
    assert_eq!(body["invoice"]["table_number"], "7");
    assert_eq!(body["invoice"]["room_number"], "204");
    assert_eq!(body["invoice"]["paid_amount"], 220.0);
    assert_eq!(body["invoice"]["payments"].as_array().unwrap().len(), 2);

    // Bulk item upsert: the original acceptance case.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/INV-1/items",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "items": [
                { "item_code": "Burger", "item_name": "Burger", "uom": "Unit",
                  "qty": 2, "rate": 50, "amount": 100, "folio_window": "1" },
                { "item_code": "B52", "item_name": "B52", "uom": "Unit",
                  "qty": 1, "rate": 120, "amount": 120, "folio_window": "2" }
            ]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ok"], true);
    assert_eq!(body["invoice_id"], "INV-1");
    assert_eq!(body["count"], 2);
    assert_eq!(body["total_qty"], 3.0);
    assert_eq!(body["total_amount"], 220.0);

    let burger_row_id = body["items"][0]["id"].as_str().unwrap().to_string();

    // Editing a row by id does not duplicate it.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/INV-1/items",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "items": [
                { "name": burger_row_id, "item_code": "Burger", "qty": 3, "rate": 50 }
            ]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["id"], burger_row_id.as_str());
    assert_eq!(body["items"][0]["amount"], 150.0);

    // Void the burger row.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/item/void",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "item_row_id": burger_row_id, "cause": "customer changed order" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["ok"], true);
    assert_eq!(body["voided_item"]["invoice_id"], "INV-1");
    assert_eq!(body["voided_item"]["item_code"], "Burger");
    assert_eq!(body["voided_item"]["qty"], 3.0);

    // Only B52 remains; totals follow.
    let (status, body) = send(
        &app,
        request(
            "PUT",
            "/api/pos/invoice/INV-1",
            Some(&token),
            Some(DEVICE),
            Some(&json!({})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["invoice"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["invoice"]["items"][0]["item_code"], "B52");
    assert_eq!(body["invoice"]["grand_total"], 120.0);

    // The session lists the invoice.
    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/api/pos/session/{session_id}/invoices"),
            Some(&token),
            Some(DEVICE),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["orders"][0]["id"], "INV-1");
    assert_eq!(body["orders"][0]["grand_total"], 120.0);
}

#[tokio::test]
async fn bulk_upsert_validation_and_defaults() {
    let app = test_app().await;
    let token = login(&app).await;
    open_session(&app, &token).await;

    send(
        &app,
        request(
            "PUT",
            "/api/pos/invoice/INV-2",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "customer": "Walk-In Customer" })),
        ),
    )
    .await;

    // Empty list rejected.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/INV-2/items",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "items": [] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing item_code names the offending row.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/INV-2/items",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "items": [ { "item_code": "Burger", "qty": 1 }, { "qty": 2 } ] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item 2: item_code is required");

    // Missing qty rejected, qty 0 allowed.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/INV-2/items",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "items": [ { "item_code": "Burger" } ] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Item 1: qty is required");

    // Descriptive fields default; amount falls back to rate × qty.
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/INV-2/items",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "items": [ { "item_code": "Burger", "qty": 2, "rate": 50 } ] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["items"][0]["item_name"], "Burger");
    assert_eq!(body["items"][0]["description"], "Burger");
    assert_eq!(body["items"][0]["uom"], "Unit");
    assert_eq!(body["items"][0]["amount"], 100.0);

    // Unknown invoice is 404.
    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/GHOST/items",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "items": [ { "item_code": "Burger", "qty": 1 } ] })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn void_unknown_item_is_404() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/api/pos/invoice/item/void",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "item_row_id": "ghost-row", "cause": "test" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_upsert_rejects_unknown_session_reference() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/pos/invoice/INV-3",
            Some(&token),
            Some(DEVICE),
            Some(&json!({ "customer": "Walk-In Customer", "pos_session": "ghost-session" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
