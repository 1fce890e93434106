//! Browsing: home, shop filters, pagination and product pages.

use axum::http::StatusCode;
use luxe_integration_tests::TestClient;

#[tokio::test]
async fn test_health() {
    let mut client = TestClient::default();
    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let mut client = TestClient::default();
    let response = client.get("/health").await;
    let id = response.headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(id.len(), 36);
}

#[tokio::test]
async fn test_home_shows_featured_products() {
    let mut client = TestClient::default();
    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Classic Silk Trench Coat"));
    assert!(response.body.contains("Slim Fit Denim Jeans"));
    // Not featured.
    assert!(!response.body.contains("Diamond Stud Earrings"));
}

#[tokio::test]
async fn test_shop_query_filters_by_category() {
    let mut client = TestClient::default();
    let response = client.get("/shop?category=Accessories").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Diamond Stud Earrings"));
    assert!(response.body.contains("Geometric Silk Scarf"));
    assert!(!response.body.contains("Wool Cashmere Sweater"));
    assert!(response.body.contains("2 products"));
}

#[tokio::test]
async fn test_filters_are_remembered() {
    let mut client = TestClient::default();
    client.get("/shop?price=0-100&sort=price-low").await;

    let response = client.get("/shop").await;
    assert!(response.body.contains("Geometric Silk Scarf"));
    assert!(response.body.contains("Slim Fit Denim Jeans"));
    assert!(!response.body.contains("Classic Silk Trench Coat"));

    let scarf = response.body.find("Geometric Silk Scarf").unwrap();
    let jeans = response.body.find("Slim Fit Denim Jeans").unwrap();
    assert!(scarf < jeans, "cheapest first");
}

#[tokio::test]
async fn test_search_and_clear() {
    let mut client = TestClient::default();
    let response = client.get("/shop?q=SILK").await;
    assert!(response.body.contains("2 products"));

    let response = client.post_and_follow("/shop/clear", &[]).await;
    assert!(response.body.contains("6 products"));
}

#[tokio::test]
async fn test_no_matches_shows_empty_state() {
    let mut client = TestClient::default();
    let response = client.get("/shop?q=tuxedo").await;
    assert!(response.body.contains("No products match your filters."));
    assert!(response.body.contains("0 products"));
}

#[tokio::test]
async fn test_bad_filter_token_is_flashed_and_ignored() {
    let mut client = TestClient::default();
    let response = client.get("/shop?price=cheap&category=Men").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Ignored"));
    assert!(response.body.contains("Wool Cashmere Sweater"));
    assert!(!response.body.contains("Leather Crossbody Bag"));
}

#[tokio::test]
async fn test_pagination_clamps_out_of_range_pages() {
    let mut client = TestClient::with_page_size(4);
    let response = client.get("/shop?page=99").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("aria-current=\"page\">2</a>"));
    assert!(response.body.contains("Previous"));
    assert!(!response.body.contains(">Next</a>"));
}

#[tokio::test]
async fn test_category_route() {
    let mut client = TestClient::default();
    let response = client.get("/shop/category/Women").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Leather Crossbody Bag"));
    assert!(!response.body.contains("Slim Fit Denim Jeans"));

    let response = client.get("/shop/category/Kids").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_page() {
    let mut client = TestClient::default();
    let response = client.get("/products/101").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("W-TC-001"));
    assert!(response.body.contains("$499.00"));
    assert!(response.body.contains("12 in stock"));
    // Related: the other Women product.
    assert!(response.body.contains("Leather Crossbody Bag"));
}

#[tokio::test]
async fn test_unknown_product_redirects_to_shop() {
    let mut client = TestClient::default();
    let response = client.get("/products/999").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/shop"));

    let response = client.get("/shop").await;
    assert!(response.body.contains("Product not found."));
}

#[tokio::test]
async fn test_currency_and_dark_mode_preferences() {
    let mut client = TestClient::default();
    let response = client
        .post_form("/currency", &[("currency", "EUR"), ("next", "/products/101")])
        .await;
    assert_eq!(response.location(), Some("/products/101"));

    let response = client.get("/products/101").await;
    assert!(response.body.contains("€459.08"));

    let response = client
        .post_and_follow("/preferences/dark-mode", &[("next", "/")])
        .await;
    assert!(response.body.contains("<html lang=\"en\" class=\"dark\">"));
}

#[tokio::test]
async fn test_unknown_currency_is_bad_request() {
    let mut client = TestClient::default();
    let response = client.post_form("/currency", &[("currency", "JPY")]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offsite_next_is_ignored() {
    let mut client = TestClient::default();
    let response = client
        .post_form("/currency", &[("currency", "GBP"), ("next", "//evil.example")])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}
