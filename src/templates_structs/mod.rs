// Template context structures for Askama templates, organized by page.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{current_user, take_flash};
use crate::state::AppState;

/// Common context shared by all logged-in pages.
/// Templates access these as `ctx.username`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub username: String,
    pub app_title: String,
    pub csrf_token: String,
    pub flash: Option<String>,
}

impl PageContext {
    pub fn build(session: &Session, state: &AppState) -> Self {
        let username = current_user(session).map(|u| u.name).unwrap_or_default();
        Self {
            username,
            app_title: state.app_title.clone(),
            csrf_token: csrf::get_or_create_token(session),
            flash: take_flash(session),
        }
    }

    /// Show an error inline on this render in addition to any pending flash.
    pub fn with_error(mut self, message: String) -> Self {
        self.flash = Some(match self.flash.take() {
            Some(flash) => format!("{flash} {message}"),
            None => message,
        });
        self
    }
}

mod admin;
mod common;

pub use self::admin::{
    AdminDashboardTemplate, CloseFranchiseTemplate, CloseStoreTemplate, CreateFranchiseTemplate,
    CreateStoreTemplate, FranchiseRow, StoreRow, UserRow,
};
pub use self::common::{LoginTemplate, NotFoundTemplate};
