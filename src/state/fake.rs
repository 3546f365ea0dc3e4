//! In-memory backend used by the state and route tests

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{
    ApiError, ApiResult, Backend, Message, PricePoint, ProductInfo, ScrapedProduct, Token,
    TrackedProduct, User,
};

#[derive(Default)]
struct Data {
    users: HashMap<String, (String, User)>,
    tokens: HashMap<String, String>,
    products: Vec<TrackedProduct>,
    history: HashMap<i64, Vec<PricePoint>>,
    failures: HashMap<&'static str, (u16, String)>,
    calls: Vec<String>,
    next_id: i64,
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    data: Mutex<Data>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> std::sync::MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }

    /// Register an account and return a valid token for it
    pub fn with_user(&self, email: &str, password: &str) -> String {
        let mut data = self.data();
        let id = data.users.len() as i64 + 1;
        data.users.insert(
            email.to_string(),
            (
                password.to_string(),
                User {
                    id,
                    email: email.to_string(),
                    is_active: true,
                },
            ),
        );
        let token = format!("token-{}-{}", id, data.tokens.len());
        data.tokens.insert(token.clone(), email.to_string());
        token
    }

    pub fn revoke(&self, token: &str) {
        self.data().tokens.remove(token);
    }

    pub fn with_product(&self, name: &str, price: f64) -> i64 {
        let mut data = self.data();
        data.next_id += 1;
        let id = data.next_id;
        data.products.push(product(id, name, price));
        id
    }

    pub fn with_history(&self, id: i64, prices: &[f64]) {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, price)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                price: *price,
            })
            .collect();
        self.data().history.insert(id, points);
    }

    /// Make every later call to `op` fail with the given status and detail
    pub fn fail(&self, op: &'static str, status: u16, detail: &str) {
        self.data().failures.insert(op, (status, detail.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.data().calls.clone()
    }

    pub fn product_ids(&self) -> Vec<i64> {
        self.data().products.iter().map(|p| p.id).collect()
    }

    fn enter(&self, op: &'static str, call: String) -> ApiResult<()> {
        let mut data = self.data();
        data.calls.push(call);
        match data.failures.get(op) {
            Some((status, detail)) => Err(ApiError::Status {
                status: *status,
                message: detail.clone(),
            }),
            None => Ok(()),
        }
    }

    fn authorize(&self, token: &str) -> ApiResult<String> {
        self.data()
            .tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 401,
                message: "Could not validate credentials".to_string(),
            })
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: "Tracked product not found".to_string(),
    }
}

pub(crate) fn product(id: i64, name: &str, price: f64) -> TrackedProduct {
    TrackedProduct {
        id,
        url: format!("https://www.amazon.in/dp/ITEM{}", id),
        currency: "INR".to_string(),
        current_price: Some(price),
        initial_price: Some(price),
        mrp: Some(price * 1.25),
        product: ProductInfo {
            name: Some(name.to_string()),
            brand: Some("Acme".to_string()),
            image_urls: vec![format!("https://img.example/{}.jpg", id)],
            ..ProductInfo::default()
        },
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, email: &str, password: &str) -> ApiResult<Token> {
        self.enter("login", "login".to_string())?;
        let mut data = self.data();
        match data.users.get(email) {
            Some((expected, _)) if expected == password => {
                let token = format!("token-{}", data.tokens.len() + 100);
                data.tokens.insert(token.clone(), email.to_string());
                Ok(Token {
                    access_token: token,
                    token_type: "bearer".to_string(),
                })
            }
            _ => Err(ApiError::Status {
                status: 401,
                message: "Incorrect username or password".to_string(),
            }),
        }
    }

    async fn register(&self, email: &str, password: &str) -> ApiResult<User> {
        self.enter("register", "register".to_string())?;
        if self.data().users.contains_key(email) {
            return Err(ApiError::Status {
                status: 400,
                message: "Email already registered".to_string(),
            });
        }
        self.with_user(email, password);
        Ok(self.data().users[email].1.clone())
    }

    async fn current_user(&self, token: &str) -> ApiResult<User> {
        self.enter("current_user", "current_user".to_string())?;
        let email = self.authorize(token)?;
        Ok(self.data().users[&email].1.clone())
    }

    async fn tracked_products(&self, token: &str) -> ApiResult<Vec<TrackedProduct>> {
        self.enter("tracked_products", "tracked_products".to_string())?;
        self.authorize(token)?;
        Ok(self.data().products.clone())
    }

    async fn track_product(&self, token: &str, url: &str) -> ApiResult<ScrapedProduct> {
        self.enter("track_product", format!("track_product:{}", url))?;
        self.authorize(token)?;
        if !url.starts_with("http") {
            return Err(ApiError::Status {
                status: 400,
                message: "Could not scrape URL: unsupported site".to_string(),
            });
        }
        let id = self.with_product(url, 499.0);
        Ok(ScrapedProduct {
            signature: Some(format!("sig-{}", id)),
            name: Some(url.to_string()),
            ..ScrapedProduct::default()
        })
    }

    async fn delete_tracked_product(&self, token: &str, id: i64) -> ApiResult<Message> {
        self.enter("delete", format!("delete:{}", id))?;
        self.authorize(token)?;
        let mut data = self.data();
        let before = data.products.len();
        data.products.retain(|p| p.id != id);
        if data.products.len() == before {
            return Err(not_found());
        }
        Ok(Message {
            msg: "Product removed successfully from tracking list".to_string(),
        })
    }

    async fn tracked_product(&self, token: &str, id: i64) -> ApiResult<TrackedProduct> {
        self.enter("tracked_product", format!("tracked_product:{}", id))?;
        self.authorize(token)?;
        self.data()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn price_history(&self, token: &str, id: i64) -> ApiResult<Vec<PricePoint>> {
        self.enter("price_history", format!("price_history:{}", id))?;
        self.authorize(token)?;
        let data = self.data();
        if !data.products.iter().any(|p| p.id == id) {
            return Err(not_found());
        }
        Ok(data.history.get(&id).cloned().unwrap_or_default())
    }
}
