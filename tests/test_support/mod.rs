#![allow(dead_code)]

//! In-process stand-in for the fee backend, served by axum on a random port.

use std::path::Path;
use std::sync::{Arc, Mutex};

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use feedesk::config::{ApiConfig, AppConfig};
use feedesk::storage::{FileStorage, MemoryStorage, SessionStorage};
use feedesk::AppState;

pub const TOKEN: &str = "secret-token";
pub const GOOD_PASSWORD: &str = "correct-horse";

#[derive(Default)]
pub struct Backend {
    pub students: Vec<Value>,
    pub payments: Vec<Value>,
    pub fees: Vec<Value>,
    next_id: i64,
    /// Every protected call answers 401.
    pub expired: bool,
    pub fail_search: bool,
    pub fail_logout: bool,
    pub logout_calls: usize,
    pub payment_posts: usize,
}

impl Backend {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Shared = Arc<Mutex<Backend>>;

type Reply = (StatusCode, Json<Value>);

fn authorize(backend: &Backend, headers: &HeaderMap) -> Result<(), Reply> {
    let expected = format!("Token {TOKEN}");
    let ok = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);
    if ok && !backend.expired {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid token."})),
        ))
    }
}

fn user() -> Value {
    json!({
        "id": 1, "email": "office@school.test", "username": "office",
        "first_name": "Meera", "last_name": "Iyer", "user_type": "staff"
    })
}

pub fn student(id: i64, first: &str, last: &str, parent: &str, grade: &str, board: &str) -> Value {
    json!({
        "id": id, "first_name": first, "last_name": last,
        "full_name": format!("{first} {last}"),
        "grade": grade, "board": board, "parent_name": parent,
        "parent_contact_primary": "9000000000", "parent_contact_secondary": null,
        "admission_date": "2023-06-01", "total_paid": "0.00",
        "fee_structure": {"id": 1, "fee_amount": "24000.00"}
    })
}

async fn login(Json(body): Json<Value>) -> Reply {
    match body["password"].as_str() {
        Some(GOOD_PASSWORD) => (
            StatusCode::OK,
            Json(json!({"token": TOKEN, "user": user(), "message": "Login successful"})),
        ),
        Some("short") => (
            StatusCode::BAD_REQUEST,
            Json(json!({"password": ["Too short"]})),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Login failed",
                "errors": {"non_field_errors": ["Unable to log in with provided credentials."]}
            })),
        ),
    }
}

async fn register(Json(body): Json<Value>) -> Reply {
    if body["email"] == "taken@school.test" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Registration failed",
                "errors": {"email": ["user with this email already exists."]}
            })),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "Registration successful. Please wait for admin approval."})),
    )
}

async fn logout(State(b): State<Shared>) -> Reply {
    let mut backend = b.lock().unwrap();
    backend.logout_calls += 1;
    if backend.fail_logout {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "boom"})))
    } else {
        (StatusCode::OK, Json(json!({"message": "Logged out"})))
    }
}

async fn profile(State(b): State<Shared>, headers: HeaderMap) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    (StatusCode::OK, Json(user()))
}

async fn update_profile(
    State(b): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let mut updated = user();
    if let (Some(target), Some(changes)) = (updated.as_object_mut(), body.as_object()) {
        for (k, v) in changes {
            target.insert(k.clone(), v.clone());
        }
    }
    (StatusCode::OK, Json(updated))
}

async fn list_students(State(b): State<Shared>, headers: HeaderMap) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    (StatusCode::OK, Json(Value::from(backend.students.clone())))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

async fn search_students(
    State(b): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    if backend.fail_search {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(Value::Null));
    }
    let needle = query.q.to_lowercase();
    let found: Vec<Value> = backend
        .students
        .iter()
        .filter(|s| {
            ["first_name", "last_name", "parent_name", "grade", "board"]
                .iter()
                .any(|k| {
                    s[*k]
                        .as_str()
                        .map(|v| v.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
        })
        .cloned()
        .collect();
    (StatusCode::OK, Json(Value::from(found)))
}

async fn create_student(
    State(b): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    if body["parent_contact_primary"].as_str().map(str::len).unwrap_or(0) > 15 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "parent_contact_primary": ["Ensure this field has no more than 15 characters."]
            })),
        );
    }
    let id = backend.next_id();
    body["id"] = json!(id);
    body["total_paid"] = json!("0.00");
    body["fee_structure"] = Value::Null;
    backend.students.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn get_student(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    match backend.students.iter().find(|s| s["id"] == id) {
        Some(s) => (StatusCode::OK, Json(s.clone())),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))),
    }
}

async fn delete_student(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    backend.students.retain(|s| s["id"] != id);
    (StatusCode::NO_CONTENT, Json(Value::Null))
}

async fn update_student(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
    Json(mut body): Json<Value>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let Some(existing) = backend.students.iter_mut().find(|s| s["id"] == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})));
    };
    body["id"] = json!(id);
    body["full_name"] = json!(format!(
        "{} {}",
        body["first_name"].as_str().unwrap_or_default(),
        body["last_name"].as_str().unwrap_or_default()
    ));
    body["total_paid"] = existing["total_paid"].clone();
    body["fee_structure"] = existing["fee_structure"].clone();
    *existing = body.clone();
    (StatusCode::OK, Json(body))
}

async fn student_payments(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let found: Vec<Value> = backend
        .payments
        .iter()
        .filter(|p| p["student"] == id)
        .cloned()
        .collect();
    (StatusCode::OK, Json(Value::from(found)))
}

async fn student_summary(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let Some(student) = backend.students.iter().find(|s| s["id"] == id).cloned() else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})));
    };
    let paid = paid_by(&backend, id);
    (
        StatusCode::OK,
        Json(json!({
            "student": student, "total_fee": "24000.00",
            "total_paid": format!("{paid:.2}"), "balance": format!("{:.2}", 24000.0 - paid)
        })),
    )
}

fn paid_by(backend: &Backend, student: i64) -> f64 {
    backend
        .payments
        .iter()
        .filter(|p| p["student"] == student)
        .filter_map(|p| p["amount_paid"].as_str()?.parse::<f64>().ok())
        .sum()
}

async fn list_fees(State(b): State<Shared>, headers: HeaderMap) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    (StatusCode::OK, Json(Value::from(backend.fees.clone())))
}

fn fee_body(id: i64, body: &Value) -> Value {
    json!({
        "id": id, "grade": body["grade"], "board": body["board"],
        "fee_amount": format!("{:.2}", body["fee_amount"].as_f64().unwrap_or_default())
    })
}

async fn create_fee(
    State(b): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let id = backend.next_id();
    let fee = fee_body(id, &body);
    backend.fees.push(fee.clone());
    (StatusCode::CREATED, Json(fee))
}

async fn update_fee(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    match backend.fees.iter_mut().find(|f| f["id"] == id) {
        Some(existing) => {
            *existing = fee_body(id, &body);
            (StatusCode::OK, Json(existing.clone()))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))),
    }
}

async fn delete_fee(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    backend.fees.retain(|f| f["id"] != id);
    (StatusCode::NO_CONTENT, Json(Value::Null))
}

#[derive(Deserialize)]
struct GradeBoard {
    grade: String,
    board: String,
}

async fn fees_by_grade_board(
    State(b): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<GradeBoard>,
) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let found: Vec<Value> = backend
        .fees
        .iter()
        .filter(|f| f["grade"] == query.grade.as_str() && f["board"] == query.board.as_str())
        .cloned()
        .collect();
    (StatusCode::OK, Json(Value::from(found)))
}

async fn list_payments(State(b): State<Shared>, headers: HeaderMap) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    (StatusCode::OK, Json(Value::from(backend.payments.clone())))
}

async fn create_payment(
    State(b): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    backend.payment_posts += 1;
    let student_id = body["student"].as_i64().unwrap_or_default();
    let name = backend
        .students
        .iter()
        .find(|s| s["id"] == student_id)
        .and_then(|s| s["full_name"].as_str())
        .unwrap_or("Unknown")
        .to_string();
    let amount = body["amount_paid"].as_f64().unwrap_or_default();
    let id = backend.next_id();
    let payment = json!({
        "id": id, "student": student_id, "student_name": name,
        "payment_mode": body["payment_mode"], "payment_term": body["payment_term"],
        "payment_status": "Partial", "amount_paid": format!("{amount:.2}"),
        "amount_due": "6000.00", "transaction_date": "2024-07-15",
        "due_date": body.get("due_date").cloned().unwrap_or(Value::Null),
        "transaction_id": body.get("transaction_id").cloned().unwrap_or(Value::Null),
        "notes": body.get("notes").cloned().unwrap_or(Value::Null)
    });
    backend.payments.push(payment.clone());
    let paid = paid_by(&backend, student_id);

    let mut reply = payment;
    reply["payment_summary"] = json!({
        "student_name": name, "total_fee": "24000.00", "total_paid": format!("{paid:.2}"),
        "balance_due": format!("{:.2}", 24000.0 - paid), "term_fee": "6000.00",
        "current_term": body["payment_term"], "amount_just_paid": format!("{amount:.2}")
    });
    (StatusCode::CREATED, Json(reply))
}

async fn update_payment(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
    Json(body): Json<Value>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let Some(existing) = backend.payments.iter_mut().find(|p| p["id"] == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})));
    };
    let amount = body["amount_paid"].as_f64().unwrap_or_default();
    existing["student"] = body["student"].clone();
    existing["payment_mode"] = body["payment_mode"].clone();
    existing["payment_term"] = body["payment_term"].clone();
    existing["amount_paid"] = json!(format!("{amount:.2}"));
    for key in ["due_date", "transaction_id", "notes"] {
        existing[key] = body.get(key).cloned().unwrap_or(Value::Null);
    }
    (StatusCode::OK, Json(existing.clone()))
}

async fn payments_overview(State(b): State<Shared>, headers: HeaderMap) -> Reply {
    let backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    let mut total = 0.0;
    let mut by_mode = serde_json::Map::new();
    for p in &backend.payments {
        let amount = p["amount_paid"]
            .as_str()
            .and_then(|a| a.parse::<f64>().ok())
            .unwrap_or_default();
        total += amount;
        let mode = p["payment_mode"].as_str().unwrap_or("Unknown").to_string();
        let sum = by_mode.get(&mode).and_then(Value::as_f64).unwrap_or_default() + amount;
        by_mode.insert(mode, json!(sum));
    }
    (
        StatusCode::OK,
        Json(json!({
            "total_payments": backend.payments.len(),
            "total_amount": format!("{total:.2}"),
            "payments_by_mode": by_mode
        })),
    )
}

async fn delete_payment(
    State(b): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Reply {
    let mut backend = b.lock().unwrap();
    if let Err(reply) = authorize(&backend, &headers) {
        return reply;
    }
    backend.payments.retain(|p| p["id"] != id);
    (StatusCode::NO_CONTENT, Json(Value::Null))
}

pub fn router(backend: Shared) -> Router {
    Router::new()
        .route("/api/login/", post(login))
        .route("/api/register/", post(register))
        .route("/api/logout/", post(logout))
        .route("/api/profile/", get(profile).put(update_profile))
        .route("/api/students/", get(list_students).post(create_student))
        .route("/api/students/search/", get(search_students))
        .route(
            "/api/students/:id/",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/api/students/:id/payments/", get(student_payments))
        .route("/api/students/:id/payment_summary/", get(student_summary))
        .route("/api/fee-structures/", get(list_fees).post(create_fee))
        .route("/api/fee-structures/by_grade_board/", get(fees_by_grade_board))
        .route(
            "/api/fee-structures/:id/",
            put(update_fee).delete(delete_fee),
        )
        .route("/api/payments/", get(list_payments).post(create_payment))
        .route("/api/payments/summary/", get(payments_overview))
        .route(
            "/api/payments/:id/",
            put(update_payment).delete(delete_payment),
        )
        .with_state(backend)
        .layer(TraceLayer::new_for_http())
}

/// Serves the stand-in backend; returns its base URL and shared state.
pub async fn spawn_backend() -> (String, Shared) {
    let backend: Shared = Arc::new(Mutex::new(Backend {
        next_id: 100,
        ..Backend::default()
    }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    let app = router(backend.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve backend");
    });
    (format!("http://{addr}"), backend)
}

pub fn config(base_url: &str, session_file: &Path) -> Arc<AppConfig> {
    Arc::new(AppConfig {
        api: ApiConfig::new(base_url),
        session_file: session_file.to_path_buf(),
    })
}

pub async fn app_with_storage(base_url: &str, storage: Arc<dyn SessionStorage>) -> AppState {
    AppState::from_parts(config(base_url, Path::new("unused.json")), storage)
        .await
        .expect("app state")
}

pub async fn app(base_url: &str) -> AppState {
    app_with_storage(base_url, Arc::new(MemoryStorage::new())).await
}

pub async fn file_app(base_url: &str, path: &Path) -> AppState {
    app_with_storage(base_url, Arc::new(FileStorage::new(path))).await
}

pub async fn signed_in(base_url: &str) -> AppState {
    let state = app(base_url).await;
    let outcome = state
        .auth
        .login(&feedesk::auth::Credentials {
            email: "office@school.test".into(),
            password: GOOD_PASSWORD.into(),
        })
        .await;
    assert!(outcome.success, "login failed: {outcome:?}");
    state
}
