use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use super::navigation::Navigation;
use super::ticket::{LoadOutcome, TicketBook};
use crate::api::{ApiError, PizzaService};
use crate::models::{Franchise, FranchiseId, FranchiseListPage, Store};

pub const FIRST_FRANCHISE_PAGE: u32 = 0;
pub const MATCH_ALL: &str = "*";

/// Wrap raw search text for a "contains" match. Blank input yields `**`.
pub fn contains_filter(raw: &str) -> String {
    format!("*{raw}*")
}

/// Rendering snapshot of the franchise list.
#[derive(Debug, Clone, PartialEq)]
pub struct FranchiseListView {
    pub page: u32,
    pub filter: String,
    pub page_size: u32,
    pub list: FranchiseListPage,
}

impl FranchiseListView {
    pub fn can_prev(&self) -> bool {
        self.page > FIRST_FRANCHISE_PAGE
    }

    pub fn can_next(&self) -> bool {
        self.list.more
    }
}

#[derive(Debug)]
struct State {
    page: u32,
    filter: String,
    page_size: u32,
    list: FranchiseListPage,
    stale: bool,
    tickets: TicketBook,
}

/// Paged franchise list backed by `GET /api/franchise`.
///
/// Unlike the user list, the filter is sent verbatim and the page size is
/// always supplied by the caller; the last-used pair drives paging.
pub struct FranchiseListController {
    api: Arc<dyn PizzaService>,
    background_page_size: u32,
    state: Mutex<State>,
}

impl std::fmt::Debug for FranchiseListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FranchiseListController")
            .field("background_page_size", &self.background_page_size)
            .field("state", &*self.lock())
            .finish()
    }
}

impl FranchiseListController {
    pub fn new(api: Arc<dyn PizzaService>, background_page_size: u32) -> Self {
        Self {
            api,
            background_page_size,
            state: Mutex::new(State {
                page: FIRST_FRANCHISE_PAGE,
                filter: MATCH_ALL.to_string(),
                page_size: background_page_size,
                list: FranchiseListPage::default(),
                stale: true,
                tickets: TicketBook::default(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn needs_reload(&self) -> bool {
        self.lock().stale
    }

    /// Mark the list out of date after a delegated flow changed the backend.
    pub fn invalidate(&self) {
        self.lock().stale = true;
    }

    pub fn view(&self) -> FranchiseListView {
        let state = self.lock();
        FranchiseListView {
            page: state.page,
            filter: state.filter.clone(),
            page_size: state.page_size,
            list: state.list.clone(),
        }
    }

    pub async fn load_franchises(
        &self,
        page: u32,
        filter: &str,
        page_size: u32,
    ) -> Result<LoadOutcome, ApiError> {
        let ticket = self.lock().tickets.issue();

        let result = self.api.get_franchises(page, page_size, filter).await;

        let mut state = self.lock();
        if !state.tickets.is_current(ticket) {
            debug!("[FranchiseList] Dropping stale response for page {page} ({filter})");
            return Ok(LoadOutcome::Superseded);
        }
        let list = result?;
        debug!(
            "[FranchiseList] Page {page} ({filter}, limit {page_size}): {} franchises, more={}",
            list.franchises.len(),
            list.more
        );
        state.page = page;
        state.filter = filter.to_string();
        state.page_size = page_size;
        state.list = list;
        state.stale = false;
        Ok(LoadOutcome::Applied)
    }

    /// Match-all load at the current cursor with the background page size.
    pub async fn background_load(&self) -> Result<LoadOutcome, ApiError> {
        let page = self.lock().page;
        self.load_franchises(page, MATCH_ALL, self.background_page_size).await
    }

    /// Search at the current cursor; the cursor is deliberately not reset.
    pub async fn search(&self, raw: &str, page_size: u32) -> Result<LoadOutcome, ApiError> {
        let page = self.lock().page;
        self.load_franchises(page, &contains_filter(raw), page_size).await
    }

    pub async fn next_page(&self) -> Result<LoadOutcome, ApiError> {
        let (page, filter, page_size) = self.cursor();
        self.load_franchises(page.saturating_add(1), &filter, page_size).await
    }

    pub async fn prev_page(&self) -> Result<LoadOutcome, ApiError> {
        let (page, filter, page_size) = self.cursor();
        self.load_franchises(page.saturating_sub(1), &filter, page_size).await
    }

    pub fn find(&self, id: FranchiseId) -> Option<Franchise> {
        self.lock().list.franchises.iter().find(|f| f.id == id).cloned()
    }

    pub fn request_create_franchise(&self) -> Navigation {
        Navigation::CreateFranchise
    }

    pub fn request_close_franchise(&self, franchise: &Franchise) -> Navigation {
        Navigation::CloseFranchise { franchise: franchise.clone() }
    }

    pub fn request_close_store(&self, franchise: &Franchise, store: &Store) -> Navigation {
        Navigation::CloseStore { franchise: franchise.clone(), store: store.clone() }
    }

    pub fn request_create_store(&self, franchise: &Franchise) -> Navigation {
        Navigation::CreateStore { franchise: franchise.clone() }
    }

    fn cursor(&self) -> (u32, String, u32) {
        let state = self.lock();
        (state.page, state.filter.clone(), state.page_size)
    }
}
