//! `HttpBackend` against an in-process fake of the listing backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use listing::api::{ListingApi, ScanRequest};
use listing::{ApiError, FormPhase, MarketWindow, SubmitError, SuggestionSource};
use scanlist::draft::{DraftOptions, build_draft};
use scanlist::{Config, HttpBackend, Timeouts};
use serde_json::{Value, json};

type Created = Arc<Mutex<Vec<Value>>>;

// =============================================================
// Fake backend
// =============================================================

async fn scan(Json(body): Json<Value>) -> Json<Value> {
    let upc = body["upc"].as_str().unwrap_or_default().to_owned();
    if upc == "000000000000" {
        return Json(json!({ "success": false, "error": "Product not found" }));
    }
    Json(json!({
        "success": true,
        "product": {
            "upc": upc,
            "title": "Funko Pop! Marvel Guardians of the Galaxy Groot #49",
            "description": "Vinyl bobble-head",
            "brand": "Funko",
            "category": "Funko Pop",
            "images": ["https://img.test/groot.jpg"],
            "suggested_price": 14.99,
            "quantity": body["quantity"],
        }
    }))
}

async fn batch(Json(body): Json<Value>) -> Json<Value> {
    let items = body["items"].as_array().cloned().unwrap_or_default();
    Json(Value::Array(
        items
            .iter()
            .map(|item| {
                if item["upc"] == "000000000000" {
                    json!({ "upc": item["upc"], "success": false, "error": "Product not found" })
                } else {
                    json!({ "success": true, "product": { "upc": item["upc"], "title": "Groot" } })
                }
            })
            .collect(),
    ))
}

async fn aspects(Path(category_id): Path<String>) -> (StatusCode, Json<Value>) {
    if category_id != "149372" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Unknown category" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "aspects": [
                { "name": "Character", "required": true, "usage": "REQUIRED" },
                { "name": "Franchise", "usage": "RECOMMENDED", "values": ["Marvel", "Star Wars"] },
                { "name": "Brand", "required": true, "usage": "REQUIRED" },
                { "name": "Features", "usage": "OPTIONAL" },
            ]
        })),
    )
}

async fn values(Path((_category_id, aspect)): Path<(String, String)>) -> Json<Value> {
    Json(json!([format!("{aspect} A"), format!("{aspect} B")]))
}

async fn suggest_all() -> Json<Value> {
    Json(json!({
        "Character": { "value": "Groot", "confidence": 0.93, "source": "title" },
        "Franchise": { "value": "Marvel", "confidence": 0.55, "source": "description" },
        "Features": "Bobble-Head",
        "Brand": null,
    }))
}

async fn suggest_one(Path(aspect): Path<String>) -> Json<Value> {
    let mut body = serde_json::Map::new();
    body.insert(aspect.clone(), json!({ "value": format!("fresh {aspect}"), "confidence": 0.8 }));
    Json(Value::Object(body))
}

async fn create(State(created): State<Created>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["price"].as_f64().is_some_and(|p| p > 1000.0) {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "Price exceeds seller limit" })));
    }
    created.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({ "itemId": "110553", "url": "https://market.test/itm/110553" })))
}

async fn listing(Path(item_id): Path<String>) -> (StatusCode, Json<Value>) {
    if item_id != "110553" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Listing not found" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "title": "Funko Pop Rocket #48",
            "description": "Copied description",
            "price": 11.0,
            "condition_id": "3000",
            "item_specifics": { "Franchise": "Marvel" },
        })),
    )
}

async fn template(Path(key): Path<String>) -> (StatusCode, Json<Value>) {
    if key != "funko" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": format!("Template not found for category: {key}") })));
    }
    (StatusCode::OK, Json(json!({ "template": "<h1>{{title}}</h1><p>#{{pop_number}}</p>" })))
}

async fn fill_template(Path(key): Path<String>, Json(data): Json<Value>) -> (StatusCode, Json<Value>) {
    if key != "funko" {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": format!("Template not found for category: {key}") })));
    }
    let html = format!(
        "<h1>{}</h1><p>#{}</p>",
        data["title"].as_str().unwrap_or_default(),
        data["popNumber"].as_str().unwrap_or_default()
    );
    (StatusCode::OK, Json(json!({ "html": html })))
}

async fn terapeak(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let days = params.get("days").map(String::as_str).unwrap_or("30");
    if !matches!(days, "30" | "90" | "365") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "Days must be 30, 90, or 365" })));
    }
    if params.get("upc").map(String::as_str) != Some("889698111930") {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "No Terapeak data found for this UPC" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": {
                "metrics": { "totalSold": 40, "avgSoldPrice": 12.5, "sellThrough": 64, "totalGMV": 500.0, "avgShipping": 4.1 },
                "topListings": [
                    { "itemId": "1", "title": format!("Groot ({days} days)"), "price": 18.0, "soldQuantity": 9 },
                    { "itemId": "2", "title": "Groot flocked", "price": 22.0, "soldQuantity": 4 },
                ],
            }
        })),
    )
}

async fn spawn_backend() -> (HttpBackend, Created) {
    let created = Created::default();
    let app = Router::new()
        .route("/api/upc/scan", post(scan))
        .route("/api/upc/batch", post(batch))
        .route("/api/categories/{id}/aspects", get(aspects))
        .route("/api/categories/{id}/aspects/{name}/values", get(values))
        .route("/api/ai/item-specifics", post(suggest_all))
        .route("/api/ai/item-specific/{name}", post(suggest_one))
        .route("/api/listing/create", post(create))
        .route("/api/listings/{id}", get(listing))
        .route("/api/templates/{key}", get(template))
        .route("/api/templates/{key}/fill", post(fill_template))
        .route("/api/terapeak", get(terapeak))
        .with_state(created.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config::new(&format!("http://{addr}/"), Timeouts::default()).unwrap();
    (HttpBackend::new(config).unwrap(), created)
}

fn full_draft() -> DraftOptions {
    DraftOptions {
        upc: Some("889698111930".to_owned()),
        fields: [("series", "Pop! Marvel"), ("number", "49"), ("boxCondition", "Mint"), ("vaulted", "No")]
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect(),
        auto_fill: Some(0.7),
        ..DraftOptions::default()
    }
}

// =============================================================
// Transport
// =============================================================

#[tokio::test]
async fn scan_and_batch() {
    let (api, _) = spawn_backend().await;

    let product = api.scan_upc(&ScanRequest::new("889698111930", 2)).await.unwrap();
    assert_eq!(product.brand.as_deref(), Some("Funko"));
    assert_eq!(product.price, Some(14.99));
    assert_eq!(product.quantity, 2);

    let err = api.scan_upc(&ScanRequest::new("000000000000", 1)).await.unwrap_err();
    assert_eq!(err, ApiError::MissingData("product (Product not found)".to_owned()));

    let items = api
        .scan_batch(&[ScanRequest::new("889698111930", 1), ScanRequest::new("000000000000", 1)])
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].upc, "889698111930");
    assert!(items[0].result.is_ok());
    assert_eq!(items[1].result, Err("Product not found".to_owned()));
}

#[tokio::test]
async fn aspects_values_and_status_errors() {
    let (api, _) = spawn_backend().await;

    let aspects = api.fetch_aspects("149372").await.unwrap();
    assert_eq!(aspects.len(), 4);
    assert_eq!(aspects[1].allowed_values, ["Marvel", "Star Wars"]);

    let values = api.fetch_aspect_values("149372", "Release Year").await.unwrap();
    assert_eq!(values, ["Release Year A", "Release Year B"]);

    let err = api.fetch_aspects("999").await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 404, message: "Unknown category".to_owned() });
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let config = Config::new("http://127.0.0.1:9", Timeouts { request_secs: Some(5), connect_secs: 2 }).unwrap();
    let api = HttpBackend::new(config).unwrap();
    let err = api.fetch_aspects("149372").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
}

// =============================================================
// Suggestions
// =============================================================

#[tokio::test]
async fn suggestions_decode_and_refresh_one_key() {
    let (api, _) = spawn_backend().await;
    let mut session = build_draft(&api, &DraftOptions { upc: Some("889698111930".to_owned()), ..Default::default() })
        .await
        .unwrap();

    assert_eq!(session.request_suggestions(&api).await.unwrap(), 3);
    let character = &session.suggestions()["Character"];
    assert_eq!(character.source, SuggestionSource::Title);
    assert_eq!(session.suggestions()["Features"].source, SuggestionSource::AiGenerated);
    assert!(!session.suggestions().contains_key("Brand"));

    let before = session.suggestions()["Character"].clone();
    let fresh = session.refresh_suggestion(&api, "Franchise").await.unwrap().unwrap();
    assert_eq!(fresh.value, "fresh Franchise");
    assert_eq!(session.suggestions()["Franchise"].value, "fresh Franchise");
    assert_eq!(session.suggestions()["Character"], before);
}

// =============================================================
// Create
// =============================================================

#[tokio::test]
async fn draft_from_scan_submits_once() {
    let (api, created) = spawn_backend().await;
    let mut session = build_draft(&api, &full_draft()).await.unwrap();

    assert_eq!(session.form().category_id, "149372");
    assert_eq!(session.form().aspects["Brand"], "Funko");
    assert_eq!(session.form().aspects["Character"], "Groot");
    assert!(!session.form().aspects.contains_key("Franchise"));
    assert!(session.validate().is_empty(), "{:?}", session.validate());

    let listing = session.submit(&api).await.unwrap();
    assert_eq!(listing.item_id, "110553");
    assert_eq!(session.phase(), FormPhase::Succeeded);

    let bodies = created.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["category_id"], "149372");
    assert_eq!(bodies[0]["duration"], "GTC");
    assert_eq!(bodies[0]["upc"], "889698111930");
}

#[tokio::test]
async fn rejected_create_returns_to_editing() {
    let (api, created) = spawn_backend().await;
    let mut draft = full_draft();
    draft.price = Some(5000.0);
    let mut session = build_draft(&api, &draft).await.unwrap();

    let err = session.submit(&api).await.unwrap_err();
    assert_eq!(
        err,
        SubmitError::Api(ApiError::Status { status: 422, message: "Price exceeds seller limit".to_owned() })
    );
    assert_eq!(session.phase(), FormPhase::Editing);
    assert!(session.last_error().is_some_and(|e| e.contains("seller limit")));
    assert!(created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn incomplete_draft_sends_nothing() {
    let (api, created) = spawn_backend().await;
    let mut draft = full_draft();
    draft.fields.clear();
    let mut session = build_draft(&api, &draft).await.unwrap();

    let err = session.submit(&api).await.unwrap_err();
    assert!(matches!(err, SubmitError::Validation(ref issues) if !issues.is_empty()));
    assert!(created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn similar_listing_prefills_and_missing_one_fails() {
    let (api, _) = spawn_backend().await;
    let draft = DraftOptions {
        similar: Some("110553".to_owned()),
        category: Some("Funko Pop".to_owned()),
        ..DraftOptions::default()
    };
    let session = build_draft(&api, &draft).await.unwrap();
    assert_eq!(session.form().title, "Funko Pop Rocket #48");
    assert_eq!(session.form().condition_id, "3000");
    assert_eq!(session.form().price, Some(11.0));

    let missing = DraftOptions { similar: Some("42".to_owned()), ..DraftOptions::default() };
    let err = build_draft(&api, &missing).await.unwrap_err();
    assert!(err.to_string().contains("Listing not found"), "{err}");
}

// =============================================================
// Templates and market data
// =============================================================

#[tokio::test]
async fn template_fetch_and_fill() {
    let (api, _) = spawn_backend().await;

    let raw = api.fetch_template("funko").await.unwrap();
    assert!(raw.contains("{{title}}"));
    let err = api.fetch_template("books").await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 404, message: "Template not found for category: books".to_owned() });

    let mut draft = full_draft();
    draft.fill_description = true;
    let session = build_draft(&api, &draft).await.unwrap();
    assert_eq!(
        session.form().description,
        "<h1>Funko Pop! Marvel Guardians of the Galaxy Groot #49</h1><p>#49</p>"
    );
}

#[tokio::test]
async fn market_data_by_window() {
    let (api, _) = spawn_backend().await;

    let data = api.fetch_market_data("889698111930", MarketWindow::Quarter).await.unwrap();
    assert_eq!(data.metrics.total_sold, Some(40));
    assert_eq!(data.top_listings[0].title, "Groot (90 days)");
    assert_eq!(data.price_range(), Some((12.5, 22.0)));

    let err = api.fetch_market_data("000000000000", MarketWindow::Month).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }), "{err:?}");
}
