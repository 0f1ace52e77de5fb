use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};
use thiserror::Error;

use super::ticket::{LoadOutcome, TicketBook};
use crate::api::{ApiError, PizzaService};
use crate::models::{User, UserId, UserListPage};

pub const FIRST_USER_PAGE: u32 = 1;
pub const MATCH_ALL: &str = "*";

/// Trim the filter; blank input means "all users".
pub fn normalize_filter(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        MATCH_ALL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Failure of [`UserListController::delete_user`], split by which step failed.
#[derive(Debug, Error)]
pub enum DeleteUserError {
    /// The backend refused the delete; the user still exists.
    #[error("{0}")]
    Delete(ApiError),
    /// The user was deleted but the page could not be reloaded.
    #[error("{0}")]
    Reload(ApiError),
}

/// Rendering snapshot of the user list.
#[derive(Debug, Clone, PartialEq)]
pub struct UserListView {
    pub page: u32,
    pub filter: String,
    pub list: UserListPage,
}

impl UserListView {
    pub fn can_prev(&self) -> bool {
        self.page > FIRST_USER_PAGE
    }

    pub fn can_next(&self) -> bool {
        self.list.more
    }
}

#[derive(Debug)]
struct State {
    page: u32,
    filter: String,
    list: UserListPage,
    loaded: bool,
    tickets: TicketBook,
}

/// Paged, filterable user list backed by `GET /api/user`.
///
/// `page` and `filter` are committed only when a fetch succeeds, so the
/// visible list always matches the cursor it is rendered with.
pub struct UserListController {
    api: Arc<dyn PizzaService>,
    page_size: u32,
    state: Mutex<State>,
}

impl std::fmt::Debug for UserListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserListController")
            .field("page_size", &self.page_size)
            .field("state", &*self.lock())
            .finish()
    }
}

impl UserListController {
    pub fn new(api: Arc<dyn PizzaService>, page_size: u32) -> Self {
        Self {
            api,
            page_size,
            state: Mutex::new(State {
                page: FIRST_USER_PAGE,
                filter: MATCH_ALL.to_string(),
                list: UserListPage::default(),
                loaded: false,
                tickets: TicketBook::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn view(&self) -> UserListView {
        let state = self.lock();
        UserListView {
            page: state.page,
            filter: state.filter.clone(),
            list: state.list.clone(),
        }
    }

    /// Fetch `page` of users matching `filter` and replace the list.
    ///
    /// On error nothing changes. A response that settles after a newer load was
    /// issued is dropped, error included.
    pub async fn load_users(&self, page: u32, filter: &str) -> Result<LoadOutcome, ApiError> {
        let page = page.max(FIRST_USER_PAGE);
        let name = normalize_filter(filter);
        let ticket = self.lock().tickets.issue();

        let result = self.api.list_users(page, self.page_size, &name).await;

        let mut state = self.lock();
        if !state.tickets.is_current(ticket) {
            debug!("[UserList] Dropping stale response for page {page} ({name})");
            return Ok(LoadOutcome::Superseded);
        }
        let list = result?;
        debug!("[UserList] Page {page} ({name}): {} users, more={}", list.users.len(), list.more);
        state.page = page;
        state.filter = name;
        state.list = list;
        state.loaded = true;
        Ok(LoadOutcome::Applied)
    }

    pub async fn search(&self, filter: &str) -> Result<LoadOutcome, ApiError> {
        self.load_users(FIRST_USER_PAGE, filter).await
    }

    /// The view disables this when `more` is false; no guard here.
    pub async fn next_page(&self) -> Result<LoadOutcome, ApiError> {
        let (page, filter) = self.cursor();
        self.load_users(page.saturating_add(1), &filter).await
    }

    pub async fn prev_page(&self) -> Result<LoadOutcome, ApiError> {
        let (page, filter) = self.cursor();
        self.load_users(page.saturating_sub(1).max(FIRST_USER_PAGE), &filter).await
    }

    pub async fn refresh(&self) -> Result<LoadOutcome, ApiError> {
        let (page, filter) = self.cursor();
        self.load_users(page, &filter).await
    }

    /// Delete `user`, then reload the current page. An emptied page is left as is.
    pub async fn delete_user(&self, user: &User) -> Result<LoadOutcome, DeleteUserError> {
        self.api.delete_user(user.id).await.map_err(DeleteUserError::Delete)?;
        info!("[UserList] Deleted user {} ({})", user.id, user.email);
        self.refresh().await.map_err(DeleteUserError::Reload)
    }

    /// Look up a user on the currently displayed page.
    pub fn find(&self, id: UserId) -> Option<User> {
        self.lock().list.users.iter().find(|u| u.id == id).cloned()
    }

    fn cursor(&self) -> (u32, String) {
        let state = self.lock();
        (state.page, state.filter.clone())
    }
}
