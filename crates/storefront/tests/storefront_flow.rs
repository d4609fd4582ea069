//! End-to-end library flow against a canned PostgREST endpoint.
//!
//! Each test serves one fixed HTTP response from a loopback listener, so no
//! live project or network access is needed.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use copperleaf_core::ProductId;
use copperleaf_storefront::{
    Catalog, CartStore, CategoryFilter, SupabaseClient, SupabaseConfig, SupabaseError,
};
use secrecy::SecretString;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use url::Url;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("copperleaf_storefront=debug")
        .with_test_writer()
        .try_init();
}

/// Serve exactly one canned HTTP response, then close the connection.
async fn serve_once(status_line: &str, extra_headers: &str, body: String) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let status_line = status_line.to_string();
    let extra_headers = extra_headers.to_string();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        // One read covers a small GET request
        let mut request = [0u8; 4096];
        let _ = stream.read(&mut request).await;

        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{extra_headers}Connection: close\r\n\r\n{body}",
            body.len(),
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
    });

    Url::parse(&format!("http://{addr}/")).unwrap()
}

fn client_for(base: Url) -> SupabaseClient {
    SupabaseClient::new(&SupabaseConfig {
        project_url: base,
        anon_key: SecretString::from("eyJhbGciOiJIUzI1NiJ9.integration-test"),
        fetch_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn catalog_body() -> String {
    json!([
        {
            "id": "6d9f1c8a-4f2b-4a2e-9a51-0a3f4a1c2b3d",
            "name": "Running Shoes",
            "description": "Lightweight trainers",
            "price": 199.99,
            "image_url": "https://cdn.example.com/shoes.jpg",
            "category": "Footwear",
            "stock": 12,
            "created_at": "2026-01-06T10:00:00Z",
            "updated_at": "2026-01-06T10:00:00Z"
        },
        {
            "id": "0b2c7d4e-5f60-4c71-8a92-b3c4d5e6f708",
            "name": "Yoga Mat",
            "description": "Non-slip mat",
            "price": 49.99,
            "image_url": null,
            "category": "Sports",
            "stock": 3,
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-05T09:00:00Z"
        }
    ])
    .to_string()
}

#[tokio::test]
async fn browse_and_cart_flow() {
    init_logging();

    let base = serve_once("HTTP/1.1 200 OK", "", catalog_body()).await;
    let client = client_for(base);

    let mut catalog = Catalog::new();
    catalog.refresh(&client).await.expect("catalog loads");

    // Facets derive from the fetched list
    assert_eq!(catalog.categories(), ["Footwear", "Sports"]);

    // Text filter narrows to the mat; empty search with "all" keeps fetch order
    let hits = catalog.filtered("mat", &CategoryFilter::from_param("all"));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.first().unwrap().name, "Yoga Mat");

    let shoes = catalog
        .products()
        .iter()
        .find(|p| p.name == "Running Shoes")
        .unwrap()
        .clone();
    let mat = catalog
        .products()
        .iter()
        .find(|p| p.name == "Yoga Mat")
        .unwrap()
        .clone();

    // Two pairs of shoes and one mat
    let cart = CartStore::new();
    cart.add(&shoes);
    cart.add(&shoes);
    cart.add(&mat);

    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.total().to_string(), "$449.97");
}

#[tokio::test]
async fn refresh_failure_keeps_last_known_products() {
    init_logging();

    let ok_base = serve_once("HTTP/1.1 200 OK", "", catalog_body()).await;
    let mut catalog = Catalog::new();
    catalog
        .refresh(&client_for(ok_base))
        .await
        .expect("seed load");

    let err_base = serve_once(
        "HTTP/1.1 500 Internal Server Error",
        "",
        json!({"message": "connection to the database failed", "code": "53300"}).to_string(),
    )
    .await;

    let outcome = catalog.refresh(&client_for(err_base)).await;

    assert!(matches!(outcome, Err(SupabaseError::Api(_))));
    assert_eq!(catalog.products().len(), 2);
    assert_eq!(catalog.categories(), ["Footwear", "Sports"]);
    assert!(!catalog.is_loading());
}

#[tokio::test]
async fn missing_product_is_none_not_an_error() {
    init_logging();

    let base = serve_once("HTTP/1.1 200 OK", "", "[]".to_string()).await;
    let client = client_for(base);

    let found = client.get_product(ProductId::random()).await.expect("query succeeds");
    assert!(found.is_none());
}

#[tokio::test]
async fn single_row_lookup_returns_the_product() {
    init_logging();

    let body = json!([{
        "id": "6d9f1c8a-4f2b-4a2e-9a51-0a3f4a1c2b3d",
        "name": "Running Shoes",
        "description": null,
        "price": 199.99,
        "image_url": null,
        "category": "Footwear",
        "stock": 12,
        "created_at": "2026-01-06T10:00:00Z",
        "updated_at": "2026-01-06T10:00:00Z"
    }])
    .to_string();

    let base = serve_once("HTTP/1.1 200 OK", "", body).await;
    let client = client_for(base);

    let id: ProductId = "6d9f1c8a-4f2b-4a2e-9a51-0a3f4a1c2b3d".parse().unwrap();
    let found = client.get_product(id).await.expect("query succeeds");

    assert_eq!(found.map(|p| p.name), Some("Running Shoes".to_string()));
}

#[tokio::test]
async fn rate_limit_surfaces_retry_after() {
    init_logging();

    let base = serve_once(
        "HTTP/1.1 429 Too Many Requests",
        "Retry-After: 7\r\n",
        "{}".to_string(),
    )
    .await;
    let client = client_for(base);

    let outcome = client.list_products().await;
    assert!(matches!(outcome, Err(SupabaseError::RateLimited(7))));
}
