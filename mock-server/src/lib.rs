use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Credentials accepted by `account/login-api`.
pub const TEST_EMAIL: &str = "tester@example.com";
pub const TEST_API_KEY: &str = "test-api-key";
/// Token handed out on login and required on product routes.
pub const TEST_TOKEN: &str = "mock-access-token";

const PRODUCTS: [&str; 3] = ["businesses", "education", "websites"];
const DENIED: &str = "Authorization has been denied for this request.";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Process {
    pub process_id: Uuid,
    #[serde(rename = "CreationTimeUTC")]
    pub creation_time_utc: String,
    pub status: String,
    #[serde(skip)]
    pub product: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub email: String,
    pub api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateByUrl {
    pub url: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Process>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/v1/account/login-api", post(login))
        .route("/v1/broken", get(broken))
        .route("/v1/echo/{*rest}", any(echo))
        .route("/v1/{product}/count-credits", get(count_credits))
        .route("/v1/{product}/create-by-url", post(create_by_url))
        .route("/v1/{product}/create-by-file", post(create_by_file))
        .route("/v1/{product}/list", get(list_processes))
        .route("/v1/{product}/{id}/status", get(process_status))
        .route("/v1/{product}/{id}/result", get(process_result))
        .route("/v1/{product}/{id}/delete", delete(delete_process))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TEST_TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, DENIED).into_response()),
    }
}

fn known_product(product: &str) -> Result<(), Response> {
    if PRODUCTS.contains(&product) {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND.into_response())
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Callback and custom-field headers as the server saw them.
fn registration(headers: &HeaderMap) -> Value {
    let custom: HashMap<&str, &str> = headers
        .iter()
        .filter_map(|(name, value)| {
            let field = name.as_str().strip_prefix("copyleaks-client-custom-")?;
            Some((field, value.to_str().ok()?))
        })
        .collect();
    json!({
        "HttpCallback": header_str(headers, "copyleaks-http-callback"),
        "EmailCallback": header_str(headers, "copyleaks-email-callback"),
        "Sandbox": headers.contains_key("copyleaks-sandbox-mode"),
        "AllowPartialScan": headers.contains_key("copyleaks-allow-partial-scan"),
        "CustomFields": custom,
    })
}

fn now_utc() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    secs.to_string()
}

async fn store(db: &Db, product: &str) -> Process {
    let process = Process {
        process_id: Uuid::new_v4(),
        creation_time_utc: now_utc(),
        status: "Processing".to_string(),
        product: product.to_string(),
    };
    db.write().await.insert(process.process_id, process.clone());
    process
}

fn merge(mut base: Value, extra: Value) -> Value {
    if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
        base.extend(extra);
    }
    base
}

async fn login(Json(input): Json<LoginRequest>) -> Response {
    if input.email != TEST_EMAIL || input.api_key != TEST_API_KEY {
        return (StatusCode::UNAUTHORIZED, DENIED).into_response();
    }
    Json(json!({
        "access_token": TEST_TOKEN,
        ".issued": now_utc(),
        ".expires": now_utc(),
    }))
    .into_response()
}

async fn broken() -> &'static str {
    "this is not json"
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let headers: HashMap<&str, &str> = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
        .collect();
    Json(json!({
        "method": method.as_str(),
        "headers": headers,
        "body_len": body.len(),
    }))
}

async fn count_credits(Path(product): Path<String>, headers: HeaderMap) -> Result<Json<Value>, Response> {
    known_product(&product)?;
    authorize(&headers)?;
    Ok(Json(json!({ "Amount": 100 })))
}

async fn create_by_url(
    State(db): State<Db>,
    Path(product): Path<String>,
    headers: HeaderMap,
    Json(input): Json<CreateByUrl>,
) -> Result<Json<Value>, Response> {
    known_product(&product)?;
    authorize(&headers)?;
    let process = store(&db, &product).await;
    let created = serde_json::to_value(&process).unwrap_or_default();
    Ok(Json(merge(
        merge(created, json!({ "Url": input.url })),
        registration(&headers),
    )))
}

async fn create_by_file(
    State(db): State<Db>,
    Path(product): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, Response> {
    known_product(&product)?;
    authorize(&headers)?;

    let field = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "no file part").into_response())?;
    let name = field.name().map(str::to_string);
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field.bytes().await.map_err(IntoResponse::into_response)?;
    let extra_parts = multipart.next_field().await.map_err(IntoResponse::into_response)?.is_some();

    let process = store(&db, &product).await;
    let created = serde_json::to_value(&process).unwrap_or_default();
    Ok(Json(merge(
        merge(
            created,
            json!({
                "FieldName": name,
                "FileName": file_name,
                "ContentType": content_type,
                "Content": String::from_utf8_lossy(&data),
                "Size": data.len(),
                "ExtraParts": extra_parts,
            }),
        ),
        registration(&headers),
    )))
}

async fn list_processes(
    State(db): State<Db>,
    Path(product): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Process>>, Response> {
    known_product(&product)?;
    authorize(&headers)?;
    let processes = db.read().await;
    Ok(Json(
        processes
            .values()
            .filter(|p| p.product == product)
            .cloned()
            .collect(),
    ))
}

async fn process_status(
    State(db): State<Db>,
    Path((product, id)): Path<(String, Uuid)>,
    headers: HeaderMap,
) -> Result<Json<Value>, Response> {
    known_product(&product)?;
    authorize(&headers)?;
    let processes = db.read().await;
    let process = processes
        .get(&id)
        .ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;
    Ok(Json(json!({ "Status": process.status, "ProgressPercents": 100 })))
}

async fn process_result(
    State(db): State<Db>,
    Path((product, id)): Path<(String, Uuid)>,
    headers: HeaderMap,
) -> Result<Json<Value>, Response> {
    known_product(&product)?;
    authorize(&headers)?;
    if !db.read().await.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND.into_response());
    }
    Ok(Json(json!([])))
}

async fn delete_process(
    State(db): State<Db>,
    Path((product, id)): Path<(String, Uuid)>,
    headers: HeaderMap,
) -> Result<StatusCode, Response> {
    known_product(&product)?;
    authorize(&headers)?;
    db.write()
        .await
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| StatusCode::NOT_FOUND.into_response())
}
