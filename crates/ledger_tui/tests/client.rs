use std::sync::{Arc, Mutex};

use api_types::{
    analytics::{Aggregate, Analytics, PeriodQuery},
    item::{Item, ItemCreated, ItemKind, ItemPayload, ItemsQuery, ItemsResponse},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{TimeZone, Utc};
use ledger_tui::client::{Client, ClientError};
use ledger_view::{Amount, Kind, Record, RecordDraft, RecordView};
use serde::Deserialize;

#[derive(Default)]
struct FakeStore {
    items: Vec<Item>,
    next_id: i64,
}

type Store = Arc<Mutex<FakeStore>>;

#[derive(Deserialize)]
struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
}

fn item(id: i64, kind: ItemKind, amount: f64, category: &str) -> Item {
    Item {
        id,
        kind,
        amount,
        date: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::hours(id),
        category: Some(category.to_string()),
        description: None,
        created_at: None,
        updated_at: None,
    }
}

async fn list(State(store): State<Store>, Query(params): Query<ListParams>) -> Response {
    let store = store.lock().unwrap();
    let items = match (params.page, params.limit) {
        (_, Some(limit)) if limit == 0 || limit > 100 => {
            return (StatusCode::BAD_REQUEST, "bad_request").into_response();
        }
        (Some(page), Some(limit)) => store
            .items
            .iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect(),
        _ => store.items.clone(),
    };
    Json(ItemsResponse {
        items,
        total: Some(store.items.len() as i64),
        page: params.page,
        limit: params.limit,
    })
    .into_response()
}

async fn create(State(store): State<Store>, Json(payload): Json<ItemPayload>) -> Response {
    if payload.amount <= 0.0 {
        return (StatusCode::BAD_REQUEST, "bad_request").into_response();
    }
    let mut store = store.lock().unwrap();
    store.next_id += 1;
    let id = store.next_id;
    store.items.push(Item {
        id,
        kind: payload.kind,
        amount: payload.amount,
        date: payload.date,
        category: payload.category,
        description: payload.description,
        created_at: Some(Utc::now()),
        updated_at: None,
    });
    (StatusCode::CREATED, Json(ItemCreated { id })).into_response()
}

async fn get_one(State(store): State<Store>, Path(id): Path<i64>) -> Response {
    let store = store.lock().unwrap();
    match store.items.iter().find(|item| item.id == id) {
        Some(item) => Json(item.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "not_found").into_response(),
    }
}

async fn update(
    State(store): State<Store>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemPayload>,
) -> Response {
    let mut store = store.lock().unwrap();
    let Some(item) = store.items.iter_mut().find(|item| item.id == id) else {
        return (StatusCode::NOT_FOUND, "not_found").into_response();
    };
    item.kind = payload.kind;
    item.amount = payload.amount;
    item.date = payload.date;
    item.category = payload.category;
    item.description = payload.description;
    item.updated_at = Some(Utc::now());
    StatusCode::OK.into_response()
}

async fn remove(State(store): State<Store>, Path(id): Path<i64>) -> Response {
    let mut store = store.lock().unwrap();
    let before = store.items.len();
    store.items.retain(|item| item.id != id);
    if store.items.len() == before {
        return (StatusCode::NOT_FOUND, "not_found").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn analytics(State(store): State<Store>, Query(period): Query<PeriodQuery>) -> Response {
    if period.from > period.to {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "invalid date range" })),
        )
            .into_response();
    }
    let store = store.lock().unwrap();
    let aggregate = |kind: ItemKind| {
        let amounts: Vec<f64> = store
            .items
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.amount)
            .collect();
        let sum: f64 = amounts.iter().sum();
        Aggregate {
            sum,
            avg: if amounts.is_empty() {
                0.0
            } else {
                sum / amounts.len() as f64
            },
            count: amounts.len() as i64,
            median: 0.0,
            percent90: 0.0,
        }
    };
    Json(Analytics {
        income: Some(aggregate(ItemKind::Income)),
        expense: Some(aggregate(ItemKind::Expense)),
        details: store.items.clone(),
        ..Default::default()
    })
    .into_response()
}

async fn report() -> Response {
    (
        [("content-type", "text/csv; charset=utf-8")],
        "\u{feff}ОТЧЁТ\n",
    )
        .into_response()
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn fake_backend(items: Vec<Item>) -> Client {
    let next_id = items.iter().map(|item| item.id).max().unwrap_or(0);
    let store: Store = Arc::new(Mutex::new(FakeStore { items, next_id }));
    let router = Router::new()
        .route("/items", get(list).post(create))
        .route("/items/export", get(report))
        .route("/items/{id}", get(get_one).put(update).delete(remove))
        .route("/analytics", get(analytics))
        .with_state(store);
    Client::new(&spawn(router).await).unwrap()
}

fn view_of(items: Vec<Item>) -> RecordView {
    let (records, skipped) = Record::from_items(items);
    assert!(skipped.is_empty());
    let mut view = RecordView::new(25, chrono_tz::UTC);
    view.load(records);
    view
}

#[tokio::test]
async fn create_then_reload_adds_one_matching_record() {
    let client = fake_backend(vec![
        item(1, ItemKind::Income, 50_000.0, "Salary"),
        item(2, ItemKind::Expense, 320.0, "Food"),
    ])
    .await;

    let view = view_of(client.list_items().await.unwrap());
    let before = view.len();

    let draft = RecordDraft {
        kind: "expense".to_string(),
        amount: "1500,50".to_string(),
        date: "2024-03-10 12:00".to_string(),
        category: "Cafe".to_string(),
        note: "lunch".to_string(),
    };
    let payload = draft.validate(chrono_tz::UTC).unwrap();
    let id = client.create_item(&payload).await.unwrap();

    let view = view_of(client.list_items().await.unwrap());
    assert_eq!(view.len(), before + 1);
    let created = view.get(id).unwrap();
    assert_eq!(created.kind, Kind::Expense);
    assert_eq!(created.amount, Amount::new(150_050));
    assert_eq!(created.category.as_deref(), Some("Cafe"));
    assert_eq!(created.note.as_deref(), Some("lunch"));
    assert_eq!(
        created.timestamp,
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn update_and_delete_round_trip() {
    let client = fake_backend(vec![item(1, ItemKind::Expense, 100.0, "Food")]).await;

    let mut payload = ItemPayload {
        kind: ItemKind::Expense,
        amount: 120.0,
        date: Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap(),
        category: Some("Groceries".to_string()),
        description: None,
    };
    client.update_item(1, &payload).await.unwrap();
    let updated = client.get_item(1).await.unwrap();
    assert_eq!(updated.amount, 120.0);
    assert_eq!(updated.category.as_deref(), Some("Groceries"));
    assert!(updated.updated_at.is_some());

    client.delete_item(1).await.unwrap();
    assert!(matches!(client.get_item(1).await, Err(ClientError::NotFound)));
    assert!(matches!(client.delete_item(1).await, Err(ClientError::NotFound)));

    payload.amount = 1.0;
    assert!(matches!(
        client.update_item(1, &payload).await,
        Err(ClientError::NotFound)
    ));
}

#[tokio::test]
async fn rejected_payload_maps_to_bad_request() {
    let client = fake_backend(Vec::new()).await;
    let payload = ItemPayload {
        kind: ItemKind::Income,
        amount: -1.0,
        date: Utc::now(),
        category: None,
        description: None,
    };
    match client.create_item(&payload).await {
        Err(ClientError::BadRequest(message)) => assert_eq!(message, "bad_request"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_reads_json_body() {
    let router = Router::new().route(
        "/items",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "database_error" })),
            )
        }),
    );
    let client = Client::new(&spawn(router).await).unwrap();

    match client.list_items().await {
        Err(ClientError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database_error");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let router = Router::new().route("/items", get(|| async { "<html>maintenance</html>" }));
    let client = Client::new(&spawn(router).await).unwrap();

    assert!(matches!(
        client.list_items().await,
        Err(ClientError::Decode(_))
    ));
}

#[tokio::test]
async fn null_items_mean_an_empty_store() {
    let router = Router::new().route(
        "/items",
        get(|| async { Json(serde_json::json!({ "items": null, "total": 0 })) }),
    );
    let client = Client::new(&spawn(router).await).unwrap();

    assert!(client.list_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::new(&format!("http://{addr}")).unwrap();
    assert!(matches!(
        client.list_items().await,
        Err(ClientError::Transport(_))
    ));
}

#[tokio::test]
async fn server_paging_clamps_the_limit() {
    let items = (1..=120)
        .map(|id| item(id, ItemKind::Expense, 10.0, "Misc"))
        .collect();
    let client = fake_backend(items).await;

    let page = client
        .list_items_page(ItemsQuery {
            page: 2,
            limit: 500,
        })
        .await
        .unwrap();
    assert_eq!(page.limit, Some(100));
    assert_eq!(page.total, Some(120));
    assert_eq!(page.items.len(), 20);
    assert_eq!(page.items[0].id, 101);
}

#[tokio::test]
async fn analytics_and_report_for_a_period() {
    let client = fake_backend(vec![
        item(1, ItemKind::Income, 1000.0, "Salary"),
        item(2, ItemKind::Expense, 250.0, "Food"),
        item(3, ItemKind::Expense, 750.0, "Rent"),
    ])
    .await;
    let period = PeriodQuery {
        from: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        to: Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap(),
    };

    let analytics = client.analytics(period).await.unwrap();
    let expense = analytics.expense.unwrap();
    assert_eq!(expense.count, 2);
    assert_eq!(expense.sum, 1000.0);
    assert_eq!(analytics.details.len(), 3);

    let inverted = PeriodQuery {
        from: period.to,
        to: period.from,
    };
    match client.analytics(inverted).await {
        Err(ClientError::BadRequest(message)) => assert_eq!(message, "invalid date range"),
        other => panic!("unexpected result: {other:?}"),
    }

    let bytes = client.export_report(period).await.unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
}
