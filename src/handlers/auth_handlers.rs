use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use super::{CsrfOnly, see_other};
use crate::api::ApiError;
use crate::auth::{csrf, session as auth_session};
use crate::controllers::{Access, AdminView};
use crate::controllers::navigation::DASHBOARD;
use crate::errors::{AppError, render};
use crate::state::AppState;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

fn login_template(session: &Session, state: &AppState, email: &str, error: Option<String>) -> LoginTemplate {
    LoginTemplate {
        error,
        app_title: state.app_title.clone(),
        csrf_token: csrf::get_or_create_token(session),
        email: email.to_string(),
    }
}

/// Drop the server-side view for this session and clear the cookie.
pub(crate) fn end_session(session: &Session, state: &AppState) {
    if let Some(id) = auth_session::view_id(session) {
        state.views.remove(&id);
    }
    session.purge();
}

pub async fn login_page(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let has_view = auth_session::view_id(&session)
        .and_then(|id| state.views.get(&id))
        .is_some();
    if has_view && auth_session::current_user(&session).is_some() {
        return Ok(see_other(DASHBOARD));
    }

    render(login_template(&session, &state, "", None))
}

pub async fn login_submit(
    req: HttpRequest,
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if state.throttle.is_blocked(ip) {
        let error = "Too many failed login attempts. Please try again later.".to_string();
        return render(login_template(&session, &state, &form.email, Some(error)));
    }

    match state.gateway.login(form.email.trim(), &form.password).await {
        Ok(login) => {
            state.throttle.clear(ip);
            if let Some(old) = auth_session::view_id(&session) {
                state.views.remove(&old);
            }

            let view_id = match Access::for_caller(Some(&login.user)) {
                Access::Authorized => Some(state.views.insert(AdminView::new(login.service, &state.lists))),
                Access::Unauthorized => None,
            };
            auth_session::start(&session, &login.user, view_id.as_deref()).map_err(AppError::Session)?;
            log::info!("User {} logged in", login.user.id);
            Ok(see_other(DASHBOARD))
        }
        Err(ApiError::Unauthorized | ApiError::Status { status: 404, .. }) => {
            state.throttle.record_failure(ip);
            let error = "Invalid email or password".to_string();
            render(login_template(&session, &state, &form.email, Some(error)))
        }
        Err(e) => {
            log::warn!("Login against the pizza service failed: {e}");
            let error = "The pizza service is unavailable. Please try again.".to_string();
            render(login_template(&session, &state, &form.email, Some(error)))
        }
    }
}

pub async fn logout(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if let Some(view) = auth_session::view_id(&session).and_then(|id| state.views.get(&id)) {
        if let Err(e) = view.service().logout().await {
            log::warn!("Backend logout failed: {e}");
        }
    }
    end_session(&session, &state);
    Ok(see_other("/login"))
}
