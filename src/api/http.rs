use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{ApiError, Login, PizzaGateway, PizzaService};
use crate::models::{
    Franchise, FranchiseId, FranchiseListPage, NewFranchise, NewStore, Store, StoreId, User, UserId,
    UserListPage,
};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    user: User,
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Map non-2xx statuses to [`ApiError`]; the backend reports failures as `{ "message": ... }`.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.message)
        .unwrap_or(text);
    Err(ApiError::Status { status: status.as_u16(), message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = check(response).await?.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Unauthenticated entry point to the backend.
#[derive(Debug, Clone)]
pub struct HttpPizzaGateway {
    client: Client,
    base_url: String,
}

impl HttpPizzaGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into();
        info!("[PizzaGateway] Using pizza backend at {base_url}");
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl PizzaGateway for HttpPizzaGateway {
    async fn login(&self, email: &str, password: &str) -> Result<Login, ApiError> {
        let response = self
            .client
            .put(endpoint(&self.base_url, "/api/auth"))
            .json(&Credentials { email, password })
            .send()
            .await?;
        let auth: AuthResponse = decode(response).await?;
        debug!("[PizzaGateway] Logged in user {}", auth.user.id);

        let service = HttpPizzaService {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: auth.token,
        };
        Ok(Login { user: auth.user, service: Arc::new(service) })
    }
}

/// Backend client bound to one caller's bearer token.
#[derive(Clone)]
pub struct HttpPizzaService {
    client: Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for HttpPizzaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPizzaService")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpPizzaService {
    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.bearer_auth(&self.token)
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    fn page_query(page: u32, limit: u32, name: &str) -> [(&'static str, String); 3] {
        [
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("name", name.to_string()),
        ]
    }
}

#[async_trait]
impl PizzaService for HttpPizzaService {
    async fn logout(&self) -> Result<(), ApiError> {
        let response = self.request(self.client.delete(self.url("/api/auth"))).send().await?;
        check(response).await.map(|_| ())
    }

    async fn list_users(&self, page: u32, limit: u32, name: &str) -> Result<UserListPage, ApiError> {
        let response = self
            .request(self.client.get(self.url("/api/user")))
            .query(&Self::page_query(page, limit, name))
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let response = self
            .request(self.client.delete(self.url(&format!("/api/user/{id}"))))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    async fn get_franchises(
        &self,
        page: u32,
        limit: u32,
        name: &str,
    ) -> Result<FranchiseListPage, ApiError> {
        let response = self
            .request(self.client.get(self.url("/api/franchise")))
            .query(&Self::page_query(page, limit, name))
            .send()
            .await?;
        decode(response).await
    }

    async fn create_franchise(&self, franchise: &NewFranchise) -> Result<Franchise, ApiError> {
        let response = self
            .request(self.client.post(self.url("/api/franchise")))
            .json(franchise)
            .send()
            .await?;
        decode(response).await
    }

    async fn close_franchise(&self, id: FranchiseId) -> Result<(), ApiError> {
        let response = self
            .request(self.client.delete(self.url(&format!("/api/franchise/{id}"))))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    async fn create_store(&self, franchise_id: FranchiseId, store: &NewStore) -> Result<Store, ApiError> {
        let response = self
            .request(self.client.post(self.url(&format!("/api/franchise/{franchise_id}/store"))))
            .json(store)
            .send()
            .await?;
        decode(response).await
    }

    async fn close_store(&self, franchise_id: FranchiseId, store_id: StoreId) -> Result<(), ApiError> {
        let path = format!("/api/franchise/{franchise_id}/store/{store_id}");
        let response = self.request(self.client.delete(self.url(&path))).send().await?;
        check(response).await.map(|_| ())
    }
}
