//! End-to-end recording through a real listener.

use std::collections::HashMap;

use apidoc_recorder::config::DocConfig;
use apidoc_recorder::doc::store;
use axum::{
    body::Bytes,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};

mod common;

fn app() -> Router {
    Router::new()
        .route(
            "/login",
            post(|Json(body): Json<Value>| async move {
                match body.get("u") {
                    Some(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
                    None => (StatusCode::BAD_REQUEST, Json(json!({ "ok": false }))),
                }
            }),
        )
        .route(
            "/signup",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                Json(json!({ "fields": form.len() }))
            }),
        )
        .route(
            "/upload",
            post(|headers: HeaderMap, body: Bytes| async move {
                let content_type = headers
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                let boundary = multer::parse_boundary(content_type).unwrap();
                let stream = futures_util::stream::once(async move {
                    Ok::<Bytes, std::convert::Infallible>(body)
                });
                let mut multipart = multer::Multipart::new(stream, boundary);
                let mut names = Vec::new();
                while let Ok(Some(field)) = multipart.next_field().await {
                    names.push(field.name().unwrap_or_default().to_string());
                }
                Json(json!({ "fields": names }))
            }),
        )
        .route("/favicon.ico", get(|| async { "icon" }))
        .route("/pets", get(|| async { Json(json!([])) }))
}

fn doc_config(title: &str) -> DocConfig {
    DocConfig {
        on: true,
        doc_title: title.to_string(),
        doc_path: common::temp_doc_path().to_string_lossy().into_owned(),
        ..DocConfig::default()
    }
}

#[tokio::test]
async fn test_records_distinct_calls_and_writes_files() {
    let server = common::start_server(app(), doc_config("Integration")).await;
    let client = common::client();

    for _ in 0..2 {
        let res = client
            .post(server.url("/login"))
            .header("Content-Type", "application/json")
            .header("Cookie", "sid=abc")
            .body(r#"{"u":"a"}"#)
            .send()
            .await
            .expect("server unreachable");
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), r#"{"ok":true}"#);
    }

    let res = client
        .post(server.url("/login"))
        .header("Content-Type", "application/json")
        .body(r#"{"x":1}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client.get(server.url("/favicon.ico")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(server.url("/nowhere")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client
        .get(server.url("/pets?species=dog&species=cat"))
        .header("X-Api-Key", "demo")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let doc_path = server.stop().await;

    let spec = store::load_spec(&store::json_path(&doc_path.to_string_lossy()).unwrap()).unwrap();
    let endpoints: Vec<(&str, &str)> = spec
        .api_specs
        .iter()
        .map(|a| (a.http_verb.as_str(), a.path.as_str()))
        .collect();
    assert_eq!(endpoints, vec![("POST", "/login"), ("GET", "/pets")]);

    let login = &spec.api_specs[0].calls;
    assert_eq!(login.len(), 1);
    assert_eq!(login[0].request_body, r#"{"u":"a"}"#);
    assert_eq!(login[0].response_body, r#"{"ok":true}"#);
    assert_eq!(login[0].response_code, 200);
    assert!(!login[0].request_header.contains_key("Cookie"));
    assert!(!login[0].request_header.contains_key("Host"));

    let pets = &spec.api_specs[1].calls[0];
    assert_eq!(pets.request_url_params["species"], "dog");
    assert_eq!(pets.request_header["X-Api-Key"], "demo");
    assert!(pets.id > login[0].id);

    let html = std::fs::read_to_string(&doc_path).unwrap();
    assert!(html.contains("<title>Integration</title>"));
    assert!(html.contains("/pets"));
    assert!(!html.contains("favicon"));

    std::fs::remove_dir_all(doc_path.parent().unwrap()).unwrap_or_default();
}

#[tokio::test]
async fn test_form_and_multipart_bodies_reach_handler() {
    let server = common::start_server(app(), doc_config("Forms")).await;
    let client = common::client();

    let res = client
        .post(server.url("/signup"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("user=rex&pass=s3cret")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), r#"{"fields":2}"#);

    let form = reqwest::multipart::Form::new()
        .text("name", "rex")
        .text("species", "dog")
        .part(
            "photo",
            reqwest::multipart::Part::bytes(vec![1, 2, 3]).file_name("rex.png"),
        );
    let res = client
        .post(server.url("/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "fields": ["name", "species", "photo"] })
    );

    let recorder = server.recorder.clone();
    let doc_path = server.stop().await;
    let spec = recorder.snapshot().await.unwrap();

    let signup = &spec.api_specs[0].calls[0];
    assert_eq!(signup.post_form["user"], "rex");
    assert_eq!(signup.post_form["pass"], "s3cret");
    assert!(signup.request_body.is_empty());

    let upload = &spec.api_specs[1].calls[0];
    assert_eq!(upload.request_header["Content-Type"], "multipart/form-data");
    assert_eq!(upload.post_form.len(), 2);
    assert_eq!(upload.post_form["name"], "rex");
    assert_eq!(upload.post_form["species"], "dog");

    std::fs::remove_dir_all(doc_path.parent().unwrap()).unwrap_or_default();
}

#[tokio::test]
async fn test_disabled_server_writes_nothing() {
    let mut doc = doc_config("Off");
    doc.on = false;
    let server = common::start_server(app(), doc).await;

    let res = common::client()
        .post(server.url("/login"))
        .header("Content-Type", "application/json")
        .body(r#"{"u":"a"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let doc_path = server.stop().await;
    assert!(!doc_path.exists());
    assert!(!store::json_path(&doc_path.to_string_lossy()).unwrap().exists());

    std::fs::remove_dir_all(doc_path.parent().unwrap()).unwrap_or_default();
}
