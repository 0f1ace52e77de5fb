//! Shared test infrastructure: an in-memory pizza backend and HTTP helpers.
//!
//! - `MockPizza` implements `PizzaService` over in-memory users and franchises,
//!   recording every list call so tests can assert on fetch parameters.
//! - `MockGateway` logs known accounts in and hands out the shared `MockPizza`.
//! - `test_app!` builds the full actix app around an `AppState`; pull it in
//!   with `#[macro_use] mod common;`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test::{self, TestRequest};
use async_trait::async_trait;

use pizza_admin::api::{ApiError, Login, PizzaGateway, PizzaService};
use pizza_admin::auth::session::COOKIE_NAME;
use pizza_admin::config::ListSettings;
use pizza_admin::models::role::{ADMIN, DINER, FRANCHISEE};
use pizza_admin::models::{
    Franchise, FranchiseId, FranchiseListPage, NewFranchise, NewStore, Role, Store, StoreId, User,
    UserId, UserListPage,
};
use pizza_admin::state::AppState;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_EMAIL: &str = "a@jwt.com";
pub const DINER_EMAIL: &str = "d@jwt.com";
pub const PASSWORD: &str = "admin";

// ============================================================================
// FIXTURES
// ============================================================================

pub fn user(id: UserId, name: &str, roles: Vec<Role>) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@jwt.com", name.to_lowercase().replace(' ', ".")),
        roles,
    }
}

pub fn admin_user() -> User {
    User { id: 100, name: "Pat Ricci".to_string(), email: ADMIN_EMAIL.to_string(), roles: vec![Role::unscoped(ADMIN)] }
}

pub fn diner_user() -> User {
    User { id: 101, name: "Kai Chen".to_string(), email: DINER_EMAIL.to_string(), roles: vec![Role::unscoped(DINER)] }
}

/// Alpha, Beta and Gamma: two pages at page size 2.
pub fn greek_users() -> Vec<User> {
    greek_pages().concat()
}

/// The same users as fixed backend pages: `[Alpha, Beta]` then `[Gamma]`.
pub fn greek_pages() -> Vec<Vec<User>> {
    vec![
        vec![
            user(1, "Alpha Admin", vec![Role::unscoped(ADMIN)]),
            user(2, "Beta Diner", vec![Role::unscoped(DINER)]),
        ],
        vec![user(3, "Gamma Franchisee", vec![Role::scoped(FRANCHISEE, "1")])],
    ]
}

pub fn franchise(id: FranchiseId, name: &str, stores: Vec<Store>) -> Franchise {
    Franchise { id, name: name.to_string(), admins: vec![], stores }
}

pub fn store(id: StoreId, name: &str, revenue: Option<f64>) -> Store {
    Store { id, name: name.to_string(), total_revenue: revenue }
}

// ============================================================================
// MOCK BACKEND
// ============================================================================

/// A list fetch as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Users { page: u32, limit: u32, name: String },
    Franchises { page: u32, limit: u32, name: String },
}

#[derive(Debug, Default)]
struct Backend {
    users: Vec<User>,
    /// When set, users are served from these fixed pages instead of slicing `users`.
    user_pages: Option<Vec<Vec<User>>>,
    franchises: Vec<Franchise>,
    calls: Vec<Call>,
    deleted: Vec<UserId>,
    closed_franchises: Vec<FranchiseId>,
    closed_stores: Vec<(FranchiseId, StoreId)>,
    created_franchises: Vec<String>,
    created_stores: Vec<(FranchiseId, String)>,
    fail_lists: bool,
    fail_franchises: bool,
    reject_token: bool,
}

/// Case-insensitive "contains" match on the filter with `*` wildcards removed.
fn matches(name: &str, filter: &str) -> bool {
    let needle = filter.replace('*', "").to_lowercase();
    needle.is_empty() || name.to_lowercase().contains(&needle)
}

fn page_of<T: Clone>(items: &[T], index: usize, limit: usize) -> (Vec<T>, bool) {
    let start = index.saturating_mul(limit).min(items.len());
    let end = start.saturating_add(limit).min(items.len());
    (items[start..end].to_vec(), end < items.len())
}

#[derive(Debug, Default)]
pub struct MockPizza {
    backend: Mutex<Backend>,
}

impl MockPizza {
    pub fn new(users: Vec<User>, franchises: Vec<Franchise>) -> Arc<Self> {
        Arc::new(Self {
            backend: Mutex::new(Backend { users, franchises, ..Backend::default() }),
        })
    }

    /// Serve users from fixed pages: page `n` is `pages[n - 1]`, and `more` is
    /// set on every page but the last. Deleted users drop out of their page.
    pub fn with_user_pages(pages: Vec<Vec<User>>, franchises: Vec<Franchise>) -> Arc<Self> {
        Arc::new(Self {
            backend: Mutex::new(Backend {
                user_pages: Some(pages),
                franchises,
                ..Backend::default()
            }),
        })
    }

    fn backend(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.backend().calls.clone()
    }

    pub fn user_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| matches!(c, Call::Users { .. })).collect()
    }

    pub fn franchise_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| matches!(c, Call::Franchises { .. })).collect()
    }

    pub fn clear_calls(&self) {
        self.backend().calls.clear();
    }

    pub fn deleted(&self) -> Vec<UserId> {
        self.backend().deleted.clone()
    }

    pub fn closed_franchises(&self) -> Vec<FranchiseId> {
        self.backend().closed_franchises.clone()
    }

    pub fn closed_stores(&self) -> Vec<(FranchiseId, StoreId)> {
        self.backend().closed_stores.clone()
    }

    pub fn created_franchises(&self) -> Vec<String> {
        self.backend().created_franchises.clone()
    }

    pub fn created_stores(&self) -> Vec<(FranchiseId, String)> {
        self.backend().created_stores.clone()
    }

    /// Make every list fetch fail with a 500 until switched back.
    pub fn fail_lists(&self, fail: bool) {
        self.backend().fail_lists = fail;
    }

    /// Make only franchise list fetches fail.
    pub fn fail_franchises(&self, fail: bool) {
        self.backend().fail_franchises = fail;
    }

    /// Answer every call with 401, as for an expired token.
    pub fn reject_token(&self, reject: bool) {
        self.backend().reject_token = reject;
    }

    fn guard(backend: &Backend) -> Result<(), ApiError> {
        if backend.reject_token {
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

fn server_error() -> ApiError {
    ApiError::Status { status: 500, message: "oven on fire".to_string() }
}

#[async_trait]
impl PizzaService for MockPizza {
    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn list_users(&self, page: u32, limit: u32, name: &str) -> Result<UserListPage, ApiError> {
        let mut backend = self.backend();
        backend.calls.push(Call::Users { page, limit, name: name.to_string() });
        Self::guard(&backend)?;
        if backend.fail_lists {
            return Err(server_error());
        }
        if let Some(pages) = &backend.user_pages {
            let index = page.saturating_sub(1) as usize;
            let users: Vec<User> = pages
                .get(index)
                .map(|p| p.iter().filter(|u| matches(&u.name, name)).cloned().collect())
                .unwrap_or_default();
            return Ok(UserListPage { users, more: index + 1 < pages.len() });
        }
        let found: Vec<User> = backend.users.iter().filter(|u| matches(&u.name, name)).cloned().collect();
        let (users, more) = page_of(&found, page.saturating_sub(1) as usize, limit as usize);
        Ok(UserListPage { users, more })
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let mut backend = self.backend();
        Self::guard(&backend)?;
        backend.users.retain(|u| u.id != id);
        if let Some(pages) = backend.user_pages.as_mut() {
            pages.iter_mut().for_each(|p| p.retain(|u| u.id != id));
        }
        backend.deleted.push(id);
        Ok(())
    }

    async fn get_franchises(&self, page: u32, limit: u32, name: &str) -> Result<FranchiseListPage, ApiError> {
        let mut backend = self.backend();
        backend.calls.push(Call::Franchises { page, limit, name: name.to_string() });
        Self::guard(&backend)?;
        if backend.fail_lists || backend.fail_franchises {
            return Err(server_error());
        }
        let found: Vec<Franchise> =
            backend.franchises.iter().filter(|f| matches(&f.name, name)).cloned().collect();
        let (franchises, more) = page_of(&found, page as usize, limit as usize);
        Ok(FranchiseListPage { franchises, more })
    }

    async fn create_franchise(&self, new_franchise: &NewFranchise) -> Result<Franchise, ApiError> {
        let mut backend = self.backend();
        Self::guard(&backend)?;
        if new_franchise.name.is_empty() {
            return Err(ApiError::Status { status: 400, message: "franchise name required".to_string() });
        }
        let id = backend.franchises.iter().map(|f| f.id).max().unwrap_or(0) + 1;
        let created = franchise(id, &new_franchise.name, vec![]);
        backend.franchises.push(created.clone());
        backend.created_franchises.push(new_franchise.name.clone());
        Ok(created)
    }

    async fn close_franchise(&self, id: FranchiseId) -> Result<(), ApiError> {
        let mut backend = self.backend();
        Self::guard(&backend)?;
        backend.franchises.retain(|f| f.id != id);
        backend.closed_franchises.push(id);
        Ok(())
    }

    async fn create_store(&self, franchise_id: FranchiseId, new_store: &NewStore) -> Result<Store, ApiError> {
        let mut backend = self.backend();
        Self::guard(&backend)?;
        let id = backend
            .franchises
            .iter()
            .flat_map(|f| f.stores.iter().map(|s| s.id))
            .max()
            .unwrap_or(0)
            + 1;
        let created = store(id, &new_store.name, None);
        if let Some(f) = backend.franchises.iter_mut().find(|f| f.id == franchise_id) {
            f.stores.push(created.clone());
        }
        backend.created_stores.push((franchise_id, new_store.name.clone()));
        Ok(created)
    }

    async fn close_store(&self, franchise_id: FranchiseId, store_id: StoreId) -> Result<(), ApiError> {
        let mut backend = self.backend();
        Self::guard(&backend)?;
        if let Some(f) = backend.franchises.iter_mut().find(|f| f.id == franchise_id) {
            f.stores.retain(|s| s.id != store_id);
        }
        backend.closed_stores.push((franchise_id, store_id));
        Ok(())
    }
}

/// Logs in the accounts it knows; every login shares one `MockPizza`.
pub struct MockGateway {
    accounts: HashMap<String, User>,
    pizza: Arc<MockPizza>,
}

impl MockGateway {
    pub fn new(pizza: Arc<MockPizza>, accounts: Vec<User>) -> Arc<Self> {
        let accounts = accounts.into_iter().map(|u| (u.email.clone(), u)).collect();
        Arc::new(Self { accounts, pizza })
    }
}

#[async_trait]
impl PizzaGateway for MockGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Login, ApiError> {
        match self.accounts.get(email) {
            Some(user) if password == PASSWORD => {
                let service: Arc<dyn PizzaService> = self.pizza.clone();
                Ok(Login { user: user.clone(), service })
            }
            _ => Err(ApiError::Status { status: 404, message: "unknown user".to_string() }),
        }
    }
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

pub fn app_state(pizza: Arc<MockPizza>) -> AppState {
    let gateway = MockGateway::new(pizza, vec![admin_user(), diner_user()]);
    AppState::new(gateway, ListSettings::default(), "Mama Ricci's kitchen")
}

/// Build the full application around `state`, like `main` does.
#[allow(unused_macros)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(pizza_admin::auth::session::session_middleware(
                    actix_web::cookie::Key::generate(),
                    false,
                ))
                .app_data(actix_web::web::Data::new($state))
                .configure(pizza_admin::handlers::configure)
                .default_service(actix_web::web::to(pizza_admin::handlers::not_found)),
        )
        .await
    };
}

/// Pull the first CSRF token out of a rendered page.
pub fn csrf_from(body: &str) -> String {
    let re = regex::Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).unwrap();
    re.captures(body)
        .map(|c| c[1].to_string())
        .expect("page has no CSRF token")
}

pub fn form(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).unwrap()
}

/// Carries the session cookie from one request to the next.
#[derive(Default)]
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    pub fn get(&self, uri: &str) -> TestRequest {
        self.with_cookie(TestRequest::get().uri(uri))
    }

    pub fn post(&self, uri: &str, pairs: &[(&str, &str)]) -> TestRequest {
        self.with_cookie(
            TestRequest::post()
                .uri(uri)
                .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
                .set_payload(form(pairs)),
        )
    }

    fn with_cookie(&self, req: TestRequest) -> TestRequest {
        match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        }
    }

    /// Pick up a new or cleared session cookie from a response.
    pub fn absorb<B>(&mut self, resp: &ServiceResponse<B>) {
        let updated = resp
            .response()
            .cookies()
            .find(|c| c.name() == COOKIE_NAME)
            .map(|c| c.into_owned());
        if let Some(cookie) = updated {
            self.cookie = if cookie.value().is_empty() { None } else { Some(cookie) };
        }
    }

    pub fn is_logged_out(&self) -> bool {
        self.cookie.is_none()
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub async fn body_of<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}
