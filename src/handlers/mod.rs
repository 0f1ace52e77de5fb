pub mod admin_handlers;
pub mod auth_handlers;
pub mod flow_handlers;

use std::sync::Arc;

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api::ApiError;
use crate::auth::session::{current_user, set_flash, view_id};
use crate::controllers::navigation::DASHBOARD;
use crate::controllers::{Access, AdminView};
use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location.to_string()))
        .finish()
}

/// An admin caller together with their dashboard state.
pub(crate) struct AdminSession {
    pub user: User,
    pub view: Arc<AdminView>,
}

/// Gate for every `/admin-dashboard` route. Non-admin and anonymous callers
/// get the not-found fallback; no backend call has been made at that point.
pub(crate) fn require_admin(session: &Session, state: &AppState) -> Result<AdminSession, AppError> {
    let user = current_user(session);
    if Access::for_caller(user.as_ref()) == Access::Unauthorized {
        return Err(AppError::AuthorizationDenied);
    }
    let user = user.ok_or(AppError::AuthorizationDenied)?;
    match view_id(session).and_then(|id| state.views.get(&id)) {
        Some(view) => Ok(AdminSession { user, view }),
        None => {
            log::info!("Session for user {} has no server-side view; asking to log in again", user.id);
            session.purge();
            Err(AppError::LoginRequired)
        }
    }
}

/// Turn the outcome of a dashboard action into a redirect back to the dashboard.
///
/// Fetch failures become an inline flash message and leave list state alone.
/// A rejected token ends the session instead.
pub(crate) fn after_action(
    session: &Session,
    state: &AppState,
    action: &str,
    result: Result<(), ApiError>,
) -> HttpResponse {
    match result {
        Ok(()) => see_other(DASHBOARD),
        Err(ApiError::Unauthorized) => {
            log::info!("Backend rejected the session token during '{action}'");
            auth_handlers::end_session(session, state);
            see_other("/login")
        }
        Err(e) => {
            log::warn!("Dashboard action '{action}' failed: {e}");
            set_flash(session, format!("Could not {action}: {e}"));
            see_other(DASHBOARD)
        }
    }
}

/// Fallback for every unmatched route.
pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}

/// Route table for the whole app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(|| async { see_other(DASHBOARD) }))
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/logout", web::post().to(auth_handlers::logout))
        .service(
            web::scope(DASHBOARD)
                .route("", web::get().to(admin_handlers::dashboard))
                // Users
                .route("/users/search", web::post().to(admin_handlers::search_users))
                .route("/users/next", web::post().to(admin_handlers::next_users))
                .route("/users/prev", web::post().to(admin_handlers::prev_users))
                .route("/users/{id}/delete", web::post().to(admin_handlers::delete_user))
                // Franchises
                .route("/franchises/search", web::post().to(admin_handlers::search_franchises))
                .route("/franchises/next", web::post().to(admin_handlers::next_franchises))
                .route("/franchises/prev", web::post().to(admin_handlers::prev_franchises))
                .route("/franchises/create", web::post().to(admin_handlers::request_create_franchise))
                .route("/franchises/{id}/close", web::post().to(admin_handlers::request_close_franchise))
                .route("/franchises/{id}/stores/new", web::post().to(admin_handlers::request_create_store))
                .route(
                    "/franchises/{id}/stores/{store_id}/close",
                    web::post().to(admin_handlers::request_close_store),
                )
                // Delegated flows
                .route("/create-franchise", web::get().to(flow_handlers::create_franchise_form))
                .route("/create-franchise", web::post().to(flow_handlers::create_franchise))
                .route("/close-franchise", web::get().to(flow_handlers::close_franchise_form))
                .route("/close-franchise", web::post().to(flow_handlers::close_franchise))
                .route("/close-store", web::get().to(flow_handlers::close_store_form))
                .route("/close-store", web::post().to(flow_handlers::close_store))
                .route("/create-store", web::get().to(flow_handlers::create_store_form))
                .route("/create-store", web::post().to(flow_handlers::create_store)),
        );
}
