use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_catalog};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn titles(body: &Value) -> Vec<&str> {
    body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| item["volumeInfo"]["title"].as_str().unwrap())
                .collect()
        })
        .unwrap_or_default()
}

// --- search ---

#[tokio::test]
async fn search_by_title() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=+intitle:Dune&maxResults=10&orderBy=relevance"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["kind"], "books#volumes");
    assert_eq!(body["totalItems"], 3);
    assert_eq!(titles(&body), ["Dune", "Dune Messiah", "Children of Dune"]);
}

#[tokio::test]
async fn search_by_title_and_author() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=+intitle:Good+Omens+inauthor:Neil+Gaiman"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(titles(&body), ["Good Omens"]);
}

#[tokio::test]
async fn no_match_omits_items() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=+intitle:Necronomicon"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["totalItems"], 0);
    assert!(body.get("items").is_none());
}

#[tokio::test]
async fn max_results_truncates_but_keeps_total() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=+intitle:Dune&maxResults=1"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["totalItems"], 3);
    assert_eq!(titles(&body), ["Dune"]);
}

#[tokio::test]
async fn newest_orders_by_published_date() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=+intitle:Dune&orderBy=newest"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(titles(&body), ["Children of Dune", "Dune Messiah", "Dune"]);
}

#[tokio::test]
async fn custom_catalog_is_served_verbatim() {
    let item = json!({"volumeInfo": {"title": "Dune", "authors": ["Frank Herbert"]}});
    let resp = app_with_catalog(vec![item.clone()])
        .oneshot(get("/books/v1/volumes?q=+intitle:Dune"))
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["items"][0], item);
}

// --- errors ---

#[tokio::test]
async fn missing_query_returns_400() {
    let resp = app().oneshot(get("/books/v1/volumes")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], 400);
}

#[tokio::test]
async fn max_results_out_of_range_returns_400() {
    for value in ["0", "41"] {
        let resp = app()
            .oneshot(get(&format!("/books/v1/volumes?q=intitle:Dune&maxResults={value}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "maxResults={value}");
    }
}

#[tokio::test]
async fn non_numeric_max_results_returns_400() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=intitle:Dune&maxResults=lots"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_order_returns_400() {
    let resp = app()
        .oneshot(get("/books/v1/volumes?q=intitle:Dune&orderBy=oldest"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_path_returns_404() {
    let resp = app().oneshot(get("/books/v1/shelves")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}
