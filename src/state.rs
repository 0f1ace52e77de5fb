use std::sync::Arc;

use crate::api::PizzaGateway;
use crate::auth::rate_limit::LoginThrottle;
use crate::config::ListSettings;
use crate::controllers::ViewRegistry;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PizzaGateway>,
    pub views: ViewRegistry,
    pub lists: ListSettings,
    pub throttle: LoginThrottle,
    pub app_title: String,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("views", &self.views.len())
            .field("lists", &self.lists)
            .field("app_title", &self.app_title)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(gateway: Arc<dyn PizzaGateway>, lists: ListSettings, app_title: impl Into<String>) -> Self {
        Self {
            gateway,
            views: ViewRegistry::default(),
            lists,
            throttle: LoginThrottle::default(),
            app_title: app_title.into(),
        }
    }
}
