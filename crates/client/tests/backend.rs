use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};

use api_types::{
    card::{CardListQuery, CardNew, CardStatus, CardUpdate},
    card_group::{CardGroupConstraintUpdate, CardGroupListQuery},
    constraint::SpendingConstraintPayload,
};
use client::{
    ApiClient, ClientError, TransactionQuery,
    sources::{CardPages, MerchantSearch, TransactionFeed},
};
use engine::{
    BuildContext, CursorPager, CursorSource, DebounceConfig, EditSession, OffsetPager, PagerStatus,
    post_filter,
};

const TOKEN: &str = "t0k";

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    query: HashMap<String, String>,
    idempotency_key: Option<String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Backend {
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl Backend {
    fn record(
        &self,
        path: &str,
        query: HashMap<String, String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        self.calls.lock().unwrap().push(Recorded {
            path: path.to_string(),
            query,
            idempotency_key: headers
                .get("idempotency-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
    }

    fn calls(&self, path: &str) -> Vec<Recorded> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.path == path)
            .cloned()
            .collect()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn card_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "ACTIVE",
        "accountId": "acc-1",
        "virtualAccountId": "va-1",
        "last4": "4242",
    })
}

async fn accounts(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "missing token"}))).into_response();
    }
    Json(json!([{"id": "acc-1", "name": "Operating"}])).into_response()
}

async fn list_cards(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    backend.record("/cards", query, &headers, None);
    let content = match page {
        0 => vec![card_json("c1", "Travel"), card_json("c2", "Meals")],
        1 => vec![card_json("c3", "Fuel")],
        _ => vec![],
    };
    Json(json!({
        "content": content,
        "totalPages": 2,
        "totalElements": 3,
        "page": page,
    }))
}

async fn create_card(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    backend.record("/cards:create", HashMap::new(), &headers, Some(body.clone()));
    if body["name"] == "dup" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "card name already used"})),
        )
            .into_response();
    }
    let name = body["name"].as_str().unwrap_or_default();
    (StatusCode::CREATED, Json(card_json("c9", name))).into_response()
}

async fn update_card(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    backend.record(&format!("/cards/{id}"), HashMap::new(), &headers, Some(body.clone()));
    if body.get("utilizationLimitAmountCents").and_then(Value::as_i64) == Some(0) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "limit must be positive"})),
        )
            .into_response();
    }
    let mut card = card_json(&id, "Travel");
    card["status"] = body.get("status").cloned().unwrap_or(json!("ACTIVE"));
    Json(card).into_response()
}

async fn card_detail(
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if id != "c1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    let pan = (query.get("includePan").map(String::as_str) == Some("true"))
        .then_some("4242424242424242");
    let cvv = (query.get("includeCvv").map(String::as_str) == Some("true")).then_some("123");
    Json(json!({"pan": pan, "cvv": cvv, "last4": "4242", "expiryMonth": 12, "expiryYear": 2030}))
        .into_response()
}

async fn list_card_groups(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.record("/card-groups", query, &headers, None);
    Json(json!({
        "content": [{"id": "g1", "name": "Field team", "accountId": "acc-1"}],
        "totalPages": 1,
        "totalElements": 1,
        "page": 0,
    }))
}

async fn update_group_constraint(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    backend.record(
        &format!("/card-groups/{id}/spending-constraint"),
        HashMap::new(),
        &headers,
        Some(body.clone()),
    );
    Json(json!({
        "id": id,
        "name": "Field team",
        "accountId": "acc-1",
        "spendingConstraint": body,
    }))
}

async fn merchants(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let cursor = query.get("cursor").cloned();
    backend.record("/merchants", query, &headers, None);
    match cursor.as_deref() {
        None => Json(json!({
            "items": [{"id": "m1", "name": "Acme Coffee", "mcc": "5814"}],
            "metadata": {"nextCursor": "opaque+/=="},
        })),
        Some(_) => Json(json!({
            "items": [{"id": "m2", "name": "Acme Hardware"}],
            "metadata": {},
        })),
    }
}

async fn transactions(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let cursor = query.get("cursor").cloned();
    backend.record("/transactions", query, &headers, None);
    match cursor.as_deref() {
        None => Json(json!({
            "items": [
                {"id": "t1", "amountCents": 1250, "createdAt": "2024-03-01T10:00:00-05:00",
                 "description": "Coffee", "merchantData": {"description": "ACME COFFEE"}},
                {"id": "t2", "amountCents": 9900, "createdAt": "2024-03-02T10:00:00-05:00",
                 "memo": "hotel"},
            ],
            "nextCursor": "tx-2",
            "count": 3,
        })),
        Some(_) => Json(json!({
            "items": [
                {"id": "t3", "amountCents": 500, "createdAt": "2024-03-03T10:00:00-05:00",
                 "merchantDescription": "Acme Fuel"},
            ],
            "nextCursor": null,
        })),
    }
}

async fn countries() -> Json<Value> {
    Json(json!([{"code": "US", "name": "United States"}, {"code": "CA", "name": "Canada"}]))
}

async fn mcc_codes() -> Json<Value> {
    Json(json!([{"code": "5814", "description": "Fast Food Restaurants"}]))
}

async fn merchant_categories() -> Json<Value> {
    Json(json!([{"id": "food", "name": "Food & Drink"}]))
}

fn router(backend: Backend) -> Router {
    Router::new()
        .route("/api/accounts", get(accounts))
        .route("/api/cards", get(list_cards).post(create_card))
        .route("/api/cards/{id}", put(update_card))
        .route("/api/cards/{id}/detail", get(card_detail))
        .route("/api/card-groups", get(list_card_groups))
        .route(
            "/api/card-groups/{id}/spending-constraint",
            put(update_group_constraint),
        )
        .route("/api/merchants", get(merchants))
        .route("/api/transactions", get(transactions))
        .route("/api/meta/countries", get(countries))
        .route("/api/meta/mcc-codes", get(mcc_codes))
        .route("/api/merchant-categories", get(merchant_categories))
        .with_state(backend)
}

async fn spawn_backend() -> (ApiClient, Backend, String) {
    let backend = Backend::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base_url = format!("http://{addr}/api");
    let client = ApiClient::new(&base_url)
        .unwrap()
        .with_token(TOKEN)
        .with_page_size(2);
    (client, backend, base_url)
}

#[tokio::test]
async fn missing_token_maps_to_unauthorized() {
    let (client, _, base_url) = spawn_backend().await;
    let anonymous = ApiClient::new(&base_url).unwrap();
    let err = anonymous.accounts().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));

    let accounts = client.accounts().await.unwrap();
    assert_eq!(accounts[0].name, "Operating");
}

// Nothing listens on the discard port.
#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let client = ApiClient::new("http://127.0.0.1:9/api").unwrap();
    let err = client.accounts().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.user_message(), "Server unreachable, please try again.");
}

#[tokio::test]
async fn card_pages_drive_offset_pager() {
    let (client, backend, _) = spawn_backend().await;
    let source = CardPages(&client);
    let mut pager = OffsetPager::new();

    let query = CardListQuery {
        virtual_account_id: Some("va-1".to_string()),
        search: Some("  ".to_string()),
        status: Some(CardStatus::Active),
    };
    pager.refresh(&source, query).await;
    assert_eq!(pager.content().len(), 2);
    assert_eq!(pager.total_pages(), 2);
    assert!(pager.has_next());

    pager.goto_page(&source, 1).await.unwrap();
    assert_eq!(pager.page(), 1);
    assert_eq!(pager.content()[0].id, "c3");
    assert!(!pager.has_next());

    let calls = backend.calls("/cards");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].query["virtualAccountId"], "va-1");
    assert_eq!(calls[0].query["status"], "ACTIVE");
    assert_eq!(calls[0].query["size"], "2");
    assert!(!calls[0].query.contains_key("search"));
    assert_eq!(calls[1].query["page"], "1");
}

#[tokio::test]
async fn create_card_sends_fresh_idempotency_key() {
    let (client, backend, _) = spawn_backend().await;
    let payload = CardNew {
        account_id: "acc-1".to_string(),
        virtual_account_id: "va-1".to_string(),
        card_group_id: None,
        name: "Travel".to_string(),
        constraint: SpendingConstraintPayload {
            minimum_amount_cents: Some(1000),
            ..Default::default()
        },
    };

    let card = client.create_card(&payload).await.unwrap();
    assert_eq!(card.name, "Travel");
    client.create_card(&payload).await.unwrap();

    let calls = backend.calls("/cards:create");
    let first = calls[0].idempotency_key.clone().unwrap();
    let second = calls[1].idempotency_key.clone().unwrap();
    assert_ne!(first, second);
    assert!(uuid_like(&first));

    let body = calls[0].body.clone().unwrap();
    assert_eq!(body["minimumAmountCents"], 1000);
    assert!(body.get("countryAllow").is_none());
    assert!(body.get("cardGroupId").is_none());
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}

#[tokio::test]
async fn conflict_keeps_backend_message() {
    let (client, _, _) = spawn_backend().await;
    let payload = CardNew {
        account_id: "acc-1".to_string(),
        virtual_account_id: "va-1".to_string(),
        card_group_id: None,
        name: "dup".to_string(),
        constraint: SpendingConstraintPayload::default(),
    };

    let err = client.create_card(&payload).await.unwrap_err();
    match &err {
        ClientError::Conflict(message) => assert_eq!(message, "card name already used"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Conflict: card name already used");
}

#[tokio::test]
async fn update_card_and_validation_error() {
    let (client, _, _) = spawn_backend().await;
    let card = client
        .update_card(
            "c1",
            &CardUpdate {
                status: Some(CardStatus::Suspended),
                constraint: SpendingConstraintPayload::default(),
            },
        )
        .await
        .unwrap();
    assert_eq!(card.status, CardStatus::Suspended);

    let err = client
        .update_card(
            "c1",
            &CardUpdate {
                status: None,
                constraint: SpendingConstraintPayload {
                    utilization_limit_amount_cents: Some(0),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(ref m) if m == "limit must be positive"));
}

#[tokio::test]
async fn reveal_merges_sensitive_fields() {
    let (client, _, _) = spawn_backend().await;
    let mut card = client
        .list_cards(&CardListQuery::default(), 0)
        .await
        .unwrap()
        .content
        .remove(0);
    assert!(card.pan.is_none());

    client.reveal_card(&mut card, true, false).await.unwrap();
    assert_eq!(card.pan.as_deref(), Some("4242424242424242"));
    assert!(card.cvv.is_none());
    assert_eq!(card.expiry_year, Some(2030));

    card.redact();
    assert!(card.pan.is_none());

    let err = client.card_detail("missing", true, true).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
}

#[tokio::test]
async fn merchant_search_feeds_edit_session() {
    let (client, backend, _) = spawn_backend().await;
    let source = MerchantSearch(&client);
    let mut session = EditSession::with_config("acc-1", DebounceConfig::default());

    let now = tokio::time::Instant::now();
    session.search_input("acme", now);
    let request = session
        .poll_search(now + DebounceConfig::default().quiet)
        .unwrap();
    let result = source
        .fetch_chunk(&request.query, request.cursor.as_deref())
        .await;
    session.apply_merchants(request.ticket, result);
    assert!(session.merchant_search().has_more());

    let request = session.load_more_merchants().unwrap();
    let result = source
        .fetch_chunk(&request.query, request.cursor.as_deref())
        .await;
    session.apply_merchants(request.ticket, result);
    assert_eq!(session.merchant_search().items().len(), 2);
    assert!(!session.merchant_search().has_more());

    assert!(session.toggle_merchant("m2"));
    let payload = session
        .submit(&BuildContext::new(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "UTC",
        ))
        .unwrap();
    assert_eq!(payload.merchant_allow, Some(vec!["m2".to_string()]));
    assert_eq!(
        payload.user_data.unwrap().merchant_names,
        vec!["Acme Hardware".to_string()]
    );

    let calls = backend.calls("/merchants");
    assert_eq!(calls[0].query["search"], "acme");
    assert_eq!(calls[0].query["accountId"], "acc-1");
    assert!(!calls[0].query.contains_key("cursor"));
    assert_eq!(calls[1].query["cursor"], "opaque+/==");
}

#[tokio::test]
async fn transaction_feed_sends_filters_and_accumulates() {
    let (client, backend, _) = spawn_backend().await;
    let source = TransactionFeed(&client);
    let mut pager = CursorPager::new();

    let query = TransactionQuery::new("acc-1")
        .filter("status", "SETTLED")
        .filter("from", "");
    pager.refresh(&source, query).await;
    assert_eq!(pager.items().len(), 2);
    pager.fetch_more(&source).await;
    assert_eq!(pager.items().len(), 3);
    assert_eq!(pager.status(), PagerStatus::Loaded);
    assert!(pager.fetch_more(&source).await.is_none());

    let hits = post_filter(pager.items(), "acme");
    let ids: Vec<_> = hits.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t3"]);

    let calls = backend.calls("/transactions");
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].query["filter:status"], "SETTLED");
    assert!(!calls[0].query.contains_key("filter:from"));
    assert_eq!(calls[1].query["cursor"], "tx-2");
}

#[tokio::test]
async fn card_group_constraint_round_trip() {
    let (client, backend, _) = spawn_backend().await;
    let groups = client
        .list_card_groups(
            &CardGroupListQuery {
                account_id: "acc-1".to_string(),
                virtual_account_id: None,
                search: Some("field".to_string()),
            },
            0,
        )
        .await
        .unwrap();
    assert_eq!(groups.content[0].id, "g1");
    let listed = backend.calls("/card-groups");
    assert_eq!(listed[0].query["accountId"], "acc-1");
    assert_eq!(listed[0].query["search"], "field");
    assert!(!listed[0].query.contains_key("virtualAccountId"));

    let update = CardGroupConstraintUpdate {
        constraint: SpendingConstraintPayload {
            country_allow: Some(vec!["US".to_string()]),
            country_restriction: Some(api_types::constraint::RestrictionMode::Allowlist),
            ..Default::default()
        },
    };
    let group = client
        .update_card_group_constraint("g1", &update)
        .await
        .unwrap();
    assert_eq!(
        group.spending_constraint.unwrap().country_allow,
        Some(vec!["US".to_string()])
    );

    let sent = backend.calls("/card-groups/g1/spending-constraint");
    assert_eq!(
        sent[0].body.clone().unwrap(),
        json!({"countryAllow": ["US"], "countryRestriction": "allowlist"})
    );
}

#[tokio::test]
async fn resolvers_index_metadata() {
    let (client, _, _) = spawn_backend().await;
    let resolvers = client.resolvers().await.unwrap();
    assert_eq!(resolvers.countries.label("CA"), "Canada");
    assert_eq!(resolvers.mcc_codes.label("5814"), "Fast Food Restaurants");
    assert_eq!(resolvers.merchant_categories.label("food"), "Food & Drink");
    assert_eq!(resolvers.countries.label("ZZ"), "ZZ");
}
