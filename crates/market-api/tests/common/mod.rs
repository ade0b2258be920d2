//! In-memory fakes and request helpers shared by the API tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

use market_api::{build_router, AppState};
use market_core::domain::{
    NewUser, Order, OrderDraft, Product, ProductChanges, ProductDraft, ProductUpdate, Role, User,
};
use market_core::error::DomainError;
use market_core::repositories::{OrderRepository, ProductRepository, UserRepository};
use market_core::services::{AuthService, MarketService};
use market_infrastructure::{LocalImageStorage, MemorySessionStore};
use market_security::PasswordService;
use market_shared::config::SessionSettings;

pub const PASSWORD: &str = "violet-tractor-moonlit-47";
pub const BOUNDARY: &str = "market-test-boundary";
/// PNG signature plus the start of an IHDR chunk.
pub const PNG_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[derive(Default)]
pub struct FakeUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::UsernameTaken(user.username.clone()));
        }
        let created = User {
            id: users.len() as i64 + 1,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            phone_number: user.phone_number.clone(),
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct FakeProducts {
    rows: Mutex<Vec<Product>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ProductRepository for FakeProducts {
    async fn create(&self, draft: &ProductDraft, item_image: &str) -> Result<Product, DomainError> {
        let product = Product {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            game_name: draft.game_name.clone(),
            seller_username: draft.seller_username.clone(),
            seller_email: draft.seller_email.clone(),
            seller_phonenumber: draft.seller_phonenumber.clone(),
            item_price: draft.item_price,
            item_title: draft.item_title.clone(),
            item_description: draft.item_description.clone(),
            item_image: item_image.to_string(),
            item_stock: draft.item_stock,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, DomainError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_seller(&self, seller_username: &str) -> Result<Vec<Product>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|p| p.seller_username == seller_username)
            .cloned()
            .collect())
    }

    async fn find_by_seller_and_id(
        &self,
        seller_username: &str,
        id: i64,
    ) -> Result<Option<Product>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|p| p.id == id && p.seller_username == seller_username)
            .cloned())
    }

    async fn find_by_game(&self, game_name: &str) -> Result<Vec<Product>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|p| p.game_name == game_name).cloned().collect())
    }

    async fn list_games(&self) -> Result<Vec<String>, DomainError> {
        let mut games: Vec<String> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.game_name.clone())
            .collect();
        games.sort();
        games.dedup();
        Ok(games)
    }

    async fn update(
        &self,
        seller_username: &str,
        id: i64,
        changes: &ProductChanges,
        item_image: Option<String>,
    ) -> Result<Option<ProductUpdate>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(product) = rows
            .iter_mut()
            .find(|p| p.id == id && p.seller_username == seller_username)
        else {
            return Ok(None);
        };
        product.game_name = changes.game_name.clone();
        product.seller_email = changes.seller_email.clone();
        product.item_price = changes.item_price;
        product.item_title = changes.item_title.clone();
        product.item_description = changes.item_description.clone();
        product.item_stock = changes.item_stock;
        let previous_image = product.item_image.clone();
        if let Some(image) = item_image {
            product.item_image = image;
        }
        Ok(Some(ProductUpdate {
            product: product.clone(),
            previous_image,
        }))
    }

    async fn delete(&self, seller_username: &str, id: i64) -> Result<Option<Product>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let position = rows
            .iter()
            .position(|p| p.id == id && p.seller_username == seller_username);
        Ok(position.map(|i| rows.remove(i)))
    }
}

#[derive(Default)]
pub struct FakeOrders {
    rows: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderRepository for FakeOrders {
    async fn create(&self, draft: &OrderDraft, buyer_username: &str) -> Result<Order, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let order = Order {
            id: rows.len() as i64 + 1,
            seller_username: draft.seller_username.clone(),
            seller_email: draft.seller_email.clone(),
            buyer_username: buyer_username.to_string(),
            buyer_email: draft.buyer_email.clone(),
            item_title: draft.item_title.clone(),
            game_name: draft.game_name.clone(),
            item_quantity: draft.item_quantity,
            item_price: draft.item_price,
            buyer_note: draft.buyer_note.clone(),
            created_at: Utc::now(),
        };
        rows.push(order.clone());
        Ok(order)
    }

    async fn find_by_seller(&self, seller_username: &str) -> Result<Vec<Order>, DomainError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|o| o.seller_username == seller_username)
            .cloned()
            .collect())
    }

    async fn delete(&self, seller_username: &str, id: i64) -> Result<Option<Order>, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let position = rows
            .iter()
            .position(|o| o.id == id && o.seller_username == seller_username);
        Ok(position.map(|i| rows.remove(i)))
    }
}

pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    /// alice (seller), bob (seller), carol (buyer).
    pub async fn new() -> Self {
        Self::with_login_limit(1000).await
    }

    pub async fn with_login_limit(attempts_per_minute: u32) -> Self {
        Self::build(attempts_per_minute, SessionSettings::default().ttl_seconds).await
    }

    /// A negative TTL mints sessions that are already expired.
    pub async fn with_session_ttl(ttl_seconds: i64) -> Self {
        Self::build(1000, ttl_seconds).await
    }

    async fn build(attempts_per_minute: u32, ttl_seconds: i64) -> Self {
        let users = FakeUsers::default();
        for (username, role) in [("alice", Role::Seller), ("bob", Role::Seller), ("carol", Role::Buyer)] {
            let new_user = NewUser::new(
                username.to_string(),
                format!("{}@example.com", username),
                PasswordService::hash(PASSWORD).unwrap(),
                role,
                None,
            )
            .unwrap();
            users.create(&new_user).await.unwrap();
        }

        let uploads = tempfile::tempdir().unwrap();
        let images = LocalImageStorage::new(uploads.path()).await.unwrap();

        let session = SessionSettings {
            ttl_seconds,
            ..SessionSettings::default()
        };
        let auth = AuthService::new(
            Arc::new(users),
            Arc::new(MemorySessionStore::new()),
            session.ttl_seconds,
        );
        let market = MarketService::new(
            Arc::new(FakeProducts::default()),
            Arc::new(FakeOrders::default()),
            Arc::new(images),
        );

        let state = AppState::new(Arc::new(auth), Arc::new(market), &session, attempts_per_minute)
            .unwrap();

        Self {
            router: build_router(state),
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Logs in and returns the `name=value` pair to send back as `Cookie`.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/login",
                None,
                serde_json::json!({ "username": username, "credential": PASSWORD }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        session_cookie_pair(&response).expect("login sets the session cookie")
    }
}

pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("sid="))
        .and_then(|v| v.split(';').next())
        .map(|v| v.to_string())
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn multipart_request(
    uri: &str,
    cookie: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"item_image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `sellItem` request listing one Valorant account under `seller_username`.
pub fn sell_item_request(
    cookie: &str,
    seller_username: &str,
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let seller_email = format!("{}@example.com", seller_username);
    multipart_request(
        "/api/sellItem",
        cookie,
        &[
            ("game_name", "Valorant"),
            ("seller_username", seller_username),
            ("seller_email", &seller_email),
            ("item_price", "150000"),
            ("item_title", "Radiant account"),
            ("item_description", "Full agent roster"),
            ("item_stock", "1"),
        ],
        image,
    )
}
