//! Integration tests for the Luxe storefront.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; no
//! server or network is involved. [`TestClient`] keeps the session cookie
//! between requests the way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p luxe-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use luxe_core::Catalog;
use luxe_storefront::{config::StorefrontConfig, state::AppState};
use tower::ServiceExt;
use url::form_urlencoded;

/// A response with its body read to a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Parse the body as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }
}

/// One visitor talking to one storefront instance.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl TestClient {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            app: luxe_storefront::app(state),
            cookie: None,
        }
    }

    /// A storefront over the seed catalog with `per_page` products per page.
    #[must_use]
    pub fn with_page_size(per_page: usize) -> Self {
        let config = StorefrontConfig {
            page_size: per_page,
            ..StorefrontConfig::default()
        };
        Self::new(AppState::with_catalog(config, Catalog::seed()))
    }

    /// A second visitor on the same storefront, without this one's cookie.
    #[must_use]
    pub fn stranger(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri);
        self.send(request, Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request =
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(request, Body::from(body)).await
    }

    /// Follow a POST with a GET of wherever it redirected.
    pub async fn post_and_follow(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let response = self.post_form(uri, fields).await;
        assert_eq!(
            response.status,
            StatusCode::SEE_OTHER,
            "POST {uri} did not redirect: {}",
            response.body
        );
        let location = response
            .location()
            .expect("redirect without a location")
            .to_string();
        self.get(&location).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = request.body(body).expect("valid request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        if let Some(cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
        {
            self.cookie = Some(cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("readable body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
