//! Client side of the pizza backend.
//!
//! [`PizzaGateway`] is the unauthenticated entry point (login). A successful
//! login yields a [`PizzaService`] bound to the caller's bearer token; every
//! admin operation goes through that handle.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Franchise, FranchiseId, FranchiseListPage, NewFranchise, NewStore, Store, StoreId, User, UserId,
    UserListPage,
};

pub use http::{HttpPizzaGateway, HttpPizzaService};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected the credentials")]
    Unauthorized,
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// A logged-in caller: who they are plus a service bound to their credentials.
pub struct Login {
    pub user: User,
    pub service: Arc<dyn PizzaService>,
}

impl std::fmt::Debug for Login {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Login").field("user", &self.user).finish()
    }
}

#[async_trait]
pub trait PizzaGateway: Send + Sync {
    /// `PUT /api/auth`
    async fn login(&self, email: &str, password: &str) -> Result<Login, ApiError>;
}

#[async_trait]
pub trait PizzaService: Send + Sync {
    /// `DELETE /api/auth`
    async fn logout(&self) -> Result<(), ApiError>;

    /// `GET /api/user?page=&limit=&name=`
    async fn list_users(&self, page: u32, limit: u32, name: &str) -> Result<UserListPage, ApiError>;

    /// `DELETE /api/user/<id>`
    async fn delete_user(&self, id: UserId) -> Result<(), ApiError>;

    /// `GET /api/franchise?page=&limit=&name=`
    async fn get_franchises(
        &self,
        page: u32,
        limit: u32,
        name: &str,
    ) -> Result<FranchiseListPage, ApiError>;

    /// `POST /api/franchise`
    async fn create_franchise(&self, franchise: &NewFranchise) -> Result<Franchise, ApiError>;

    /// `DELETE /api/franchise/<id>`
    async fn close_franchise(&self, id: FranchiseId) -> Result<(), ApiError>;

    /// `POST /api/franchise/<id>/store`
    async fn create_store(&self, franchise_id: FranchiseId, store: &NewStore) -> Result<Store, ApiError>;

    /// `DELETE /api/franchise/<id>/store/<storeId>`
    async fn close_store(&self, franchise_id: FranchiseId, store_id: StoreId) -> Result<(), ApiError>;
}
