//! Shared test utilities: app builder and a cookie-keeping client.

#![allow(dead_code)]

pub mod fake_canister;

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use book_register::{
    api,
    config::AppConfig,
    models::Principal,
    remote::{BackendConnector, HttpConnector},
    services::{clock::SystemClock, identity::IdentityClaims, Services},
    AppState,
};
use chrono::Duration;
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use fake_canister::FakeCanister;

pub const SECRET: &str = "integration-test-secret";

pub fn test_config(canister: &FakeCanister) -> AppConfig {
    let mut config = AppConfig::default();
    config.backend.host = canister.base_url();
    config.backend.canister_id = "bkyz2-fmaaa-aaaaa-qaaaq-cai".to_string();
    config.identity.assertion_secret = SECRET.to_string();
    config.notifications.display_secs = 60;
    config
}

pub fn build_router(config: AppConfig) -> Router {
    let connector = HttpConnector::new(&config.backend).expect("Failed to build connector");
    build_router_with(config, Arc::new(connector))
}

pub fn build_router_with(config: AppConfig, connector: Arc<dyn BackendConnector>) -> Router {
    let services = Services::new(&config, connector, Arc::new(SystemClock));
    api::router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

pub fn assertion(principal: &str) -> String {
    let principal: Principal = principal.parse().unwrap();
    IdentityClaims::new(&principal, Duration::minutes(5))
        .sign(SECRET)
        .unwrap()
}

/// Encode a urlencoded form body
pub fn form_body(fields: &[(&str, &str)]) -> String {
    let url = reqwest::Url::parse_with_params("http://localhost/", fields).unwrap();
    url.query().unwrap_or_default().to_string()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// One browser: sends requests through the router and keeps its cookies
#[derive(Clone)]
pub struct Browser {
    router: Router,
    cookies: HashMap<String, String>,
}

impl Browser {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            cookies: HashMap::new(),
        }
    }

    pub fn cookie(&self, name: &str) -> Option<&String> {
        self.cookies.get(name)
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = self.router.clone().oneshot(request).await.unwrap();

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let raw = set_cookie.to_str().unwrap();
            let pair = raw.split(';').next().unwrap();
            let (name, value) = pair.split_once('=').unwrap();
            if value.is_empty() {
                self.cookies.remove(name);
            } else {
                self.cookies.insert(name.to_string(), value.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body(fields)))
            .unwrap();
        self.send(request).await
    }

    /// Current page HTML
    pub async fn page(&mut self) -> String {
        self.get("/").await.body
    }

    /// Run the login redirect and callback for `principal`
    pub async fn sign_in(&mut self, principal: &str) {
        let login = self.get("/auth/login").await;
        assert_eq!(login.status, StatusCode::SEE_OTHER);

        let nonce = self
            .cookie(api::auth::LOGIN_STATE_COOKIE)
            .cloned()
            .expect("login nonce cookie");
        let uri = format!(
            "/auth/callback?token={}&state={}",
            assertion(principal),
            nonce
        );

        let callback = self.get(&uri).await;
        assert_eq!(callback.status, StatusCode::SEE_OTHER, "{}", callback.body);
    }
}
