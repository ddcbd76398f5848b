use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Process, TEST_API_KEY, TEST_EMAIL, TEST_TOKEN};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn bearer() -> String {
    format!("Bearer {TEST_TOKEN}")
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, bearer())
        .body(body.to_string())
        .unwrap()
}

fn authed(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, bearer())
        .body(String::new())
        .unwrap()
}

fn multipart_request(uri: &str, boundary: &str, filename: &str, data: &str) -> Request<String> {
    let body = format!(
        "\r\n--{boundary}\r\n\
         content-disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/plain\r\n\
         Content-Transfer-Encoding: binary\r\n\
         \r\n\
         {data}\r\n--{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary=\"{boundary}\""),
        )
        .header(http::header::AUTHORIZATION, bearer())
        .body(body)
        .unwrap()
}

// --- login ---

#[tokio::test]
async fn login_with_valid_credentials_returns_token() {
    let body = format!(r#"{{"Email":"{TEST_EMAIL}","ApiKey":"{TEST_API_KEY}"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/v1/account/login-api", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let token: Value = body_json(resp).await;
    assert_eq!(token["access_token"], TEST_TOKEN);
    assert!(token.get(".expires").is_some());
}

#[tokio::test]
async fn login_with_wrong_key_returns_401() {
    let body = format!(r#"{{"Email":"{TEST_EMAIL}","ApiKey":"wrong"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/v1/account/login-api", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- auth ---

#[tokio::test]
async fn product_routes_require_token() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/v1/businesses/count-credits")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_product_returns_404() {
    let resp = app()
        .oneshot(authed("GET", "/v1/groceries/count-credits"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- uploads ---

#[tokio::test]
async fn create_by_file_parses_single_part() {
    let resp = app()
        .oneshot(multipart_request(
            "/v1/businesses/create-by-file",
            "B1",
            "x.txt",
            "0123456789",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;
    assert_eq!(created["FieldName"], "file");
    assert_eq!(created["FileName"], "x.txt");
    assert_eq!(created["ContentType"], "text/plain");
    assert_eq!(created["Content"], "0123456789");
    assert_eq!(created["Size"], 10);
    assert_eq!(created["ExtraParts"], false);
}

#[tokio::test]
async fn create_by_url_reports_registration_headers() {
    let mut req = json_request(
        "POST",
        "/v1/education/create-by-url",
        r#"{"Url":"https://page.example"}"#,
    );
    let headers = req.headers_mut();
    headers.insert("copyleaks-http-callback", "https://cb.example".parse().unwrap());
    headers.insert("copyleaks-client-custom-team", "qa".parse().unwrap());

    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;
    assert_eq!(created["Url"], "https://page.example");
    assert_eq!(created["HttpCallback"], "https://cb.example");
    assert_eq!(created["EmailCallback"], Value::Null);
    assert_eq!(created["CustomFields"]["team"], "qa");
    assert!(created["ProcessId"].is_string());
}

// --- echo / broken ---

#[tokio::test]
async fn echo_reflects_method_and_headers() {
    let mut req = authed("DELETE", "/v1/echo/anything/at/all");
    req.headers_mut()
        .insert("copyleaks-sandbox-mode", "".parse().unwrap());
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: Value = body_json(resp).await;
    assert_eq!(echoed["method"], "DELETE");
    assert_eq!(echoed["headers"]["copyleaks-sandbox-mode"], "");
    assert_eq!(echoed["headers"]["authorization"], bearer());
}

#[tokio::test]
async fn broken_returns_non_json_success() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/broken").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&body).is_err());
}

// --- full process lifecycle ---

#[tokio::test]
async fn process_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v1/businesses/create-by-url",
            r#"{"Url":"https://page.example"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = body_json(resp).await;
    let id = created["ProcessId"].as_str().unwrap().to_string();

    // list, only under the product it was created for
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/v1/businesses/list"))
        .await
        .unwrap();
    let processes: Vec<Process> = body_json(resp).await;
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0].process_id.to_string(), id);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/v1/websites/list"))
        .await
        .unwrap();
    let processes: Vec<Process> = body_json(resp).await;
    assert!(processes.is_empty());

    // status
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/v1/businesses/{id}/status")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let status: Value = body_json(resp).await;
    assert_eq!(status["ProgressPercents"], 100);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("DELETE", &format!("/v1/businesses/{id}/delete")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // status after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/v1/businesses/{id}/status")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
