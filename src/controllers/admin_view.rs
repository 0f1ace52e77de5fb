use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use super::franchise_list::FranchiseListController;
use super::navigation::Navigation;
use super::user_list::UserListController;
use crate::api::{ApiError, PizzaService};
use crate::config::ListSettings;
use crate::models::{User, UserId, has_role, role};

/// Whether a caller may see the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authorized,
    Unauthorized,
}

impl Access {
    /// Only the `admin` tag matters; scope is ignored.
    pub fn for_caller(caller: Option<&User>) -> Self {
        if has_role(caller, role::ADMIN) {
            Access::Authorized
        } else {
            Access::Unauthorized
        }
    }
}

/// Caller each list was last loaded for, plus the pending hand-off.
#[derive(Debug, Default)]
struct Observed {
    users_for: Option<UserId>,
    franchises_for: Option<UserId>,
    handoff: Option<Navigation>,
}

/// The admin dashboard: user list plus franchise list behind an admin gate.
pub struct AdminView {
    api: Arc<dyn PizzaService>,
    pub users: UserListController,
    pub franchises: FranchiseListController,
    franchise_search_page_size: u32,
    observed: Mutex<Observed>,
}

impl std::fmt::Debug for AdminView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminView")
            .field("users", &self.users)
            .field("franchises", &self.franchises)
            .field("observed", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl AdminView {
    pub fn new(api: Arc<dyn PizzaService>, settings: &ListSettings) -> Self {
        Self {
            users: UserListController::new(api.clone(), settings.user_page_size),
            franchises: FranchiseListController::new(api.clone(), settings.franchise_page_size),
            api,
            franchise_search_page_size: settings.franchise_search_page_size,
            observed: Mutex::new(Observed::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Observed> {
        self.observed.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Backend handle for the delegated flows.
    pub fn service(&self) -> &Arc<dyn PizzaService> {
        &self.api
    }

    pub fn franchise_search_page_size(&self) -> u32 {
        self.franchise_search_page_size
    }

    /// Re-run the background loads whose inputs changed.
    ///
    /// Unauthorized callers get `Unauthorized` back before any fetch is issued.
    /// For an admin, each list reloads when it was last loaded for someone else,
    /// never loaded, or was invalidated.
    pub async fn sync(&self, caller: Option<&User>) -> Result<Access, ApiError> {
        let Some(caller) = caller else {
            return Ok(Access::Unauthorized);
        };
        if Access::for_caller(Some(caller)) == Access::Unauthorized {
            return Ok(Access::Unauthorized);
        }

        let (users_for, franchises_for) = {
            let observed = self.lock();
            (observed.users_for, observed.franchises_for)
        };
        if users_for != Some(caller.id) && franchises_for != Some(caller.id) {
            info!("[AdminView] Loading dashboard for user {}", caller.id);
        }
        let reload_users = users_for != Some(caller.id) || !self.users.is_loaded();
        let reload_franchises = franchises_for != Some(caller.id) || self.franchises.needs_reload();
        debug!("[AdminView] sync: users={reload_users} franchises={reload_franchises}");

        let users = async {
            if reload_users {
                self.users.refresh().await?;
                self.lock().users_for = Some(caller.id);
            }
            Ok::<_, ApiError>(())
        };
        let franchises = async {
            if reload_franchises {
                self.franchises.background_load().await?;
                self.lock().franchises_for = Some(caller.id);
            }
            Ok::<_, ApiError>(())
        };
        // Both loads run to completion; one failing does not cancel the other.
        let (users, franchises) = tokio::join!(users, franchises);
        users?;
        franchises?;

        Ok(Access::Authorized)
    }

    /// Park a navigation payload for the delegated flow page to pick up.
    pub fn hand_off(&self, navigation: Navigation) -> &'static str {
        let location = navigation.location();
        self.lock().handoff = Some(navigation);
        location
    }

    pub fn handoff(&self) -> Option<Navigation> {
        self.lock().handoff.clone()
    }

    /// Finish a delegated flow: drop the payload and reload franchises on next sync.
    pub fn complete_handoff(&self) {
        self.lock().handoff = None;
        self.franchises.invalidate();
    }

    pub fn cancel_handoff(&self) {
        self.lock().handoff = None;
    }
}
