use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::{CsrfOnly, after_action, require_admin, see_other};
use crate::auth::csrf;
use crate::auth::session::set_flash;
use crate::controllers::{Access, DeleteUserError};
use crate::controllers::navigation::DASHBOARD;
use crate::errors::{AppError, render};
use crate::models::{FranchiseId, StoreId, UserId};
use crate::state::AppState;
use crate::templates_structs::{AdminDashboardTemplate, PageContext};

#[derive(Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub filter: String,
    pub csrf_token: String,
}

/// GET /admin-dashboard
pub async fn dashboard(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    let mut ctx = PageContext::build(&session, &state);

    match admin.view.sync(Some(&admin.user)).await {
        Ok(Access::Authorized) => {}
        Ok(Access::Unauthorized) => return Err(AppError::AuthorizationDenied),
        Err(crate::api::ApiError::Unauthorized) => {
            super::auth_handlers::end_session(&session, &state);
            return Ok(see_other("/login"));
        }
        Err(e) => {
            log::warn!("Dashboard load failed: {e}");
            ctx = ctx.with_error(format!("Could not load the dashboard: {e}"));
        }
    }

    let tmpl = AdminDashboardTemplate::new(ctx, &admin.view.users.view(), &admin.view.franchises.view());
    render(tmpl)
}

/// POST /admin-dashboard/users/search
pub async fn search_users(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<FilterForm>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let result = admin.view.users.search(&form.filter).await.map(|_| ());
    Ok(after_action(&session, &state, "search users", result))
}

/// POST /admin-dashboard/users/next
pub async fn next_users(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let result = admin.view.users.next_page().await.map(|_| ());
    Ok(after_action(&session, &state, "load the next page of users", result))
}

/// POST /admin-dashboard/users/prev
pub async fn prev_users(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let result = admin.view.users.prev_page().await.map(|_| ());
    Ok(after_action(&session, &state, "load the previous page of users", result))
}

/// POST /admin-dashboard/users/{id}/delete
pub async fn delete_user(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let Some(user) = admin.view.users.find(id) else {
        set_flash(&session, "That user is no longer on this page");
        return Ok(see_other(DASHBOARD));
    };

    let response = match admin.view.users.delete_user(&user).await {
        Ok(_) => see_other(DASHBOARD),
        Err(DeleteUserError::Delete(e)) => {
            after_action(&session, &state, &format!("delete {}", user.name), Err(e))
        }
        Err(DeleteUserError::Reload(e)) => {
            let action = format!("reload users after deleting {}", user.name);
            after_action(&session, &state, &action, Err(e))
        }
    };
    Ok(response)
}

/// POST /admin-dashboard/franchises/search
pub async fn search_franchises(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<FilterForm>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let page_size = admin.view.franchise_search_page_size();
    let result = admin.view.franchises.search(&form.filter, page_size).await.map(|_| ());
    Ok(after_action(&session, &state, "search franchises", result))
}

/// POST /admin-dashboard/franchises/next
pub async fn next_franchises(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let result = admin.view.franchises.next_page().await.map(|_| ());
    Ok(after_action(&session, &state, "load more franchises", result))
}

/// POST /admin-dashboard/franchises/prev
pub async fn prev_franchises(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let result = admin.view.franchises.prev_page().await.map(|_| ());
    Ok(after_action(&session, &state, "load earlier franchises", result))
}

/// POST /admin-dashboard/franchises/create
pub async fn request_create_franchise(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let navigation = admin.view.franchises.request_create_franchise();
    Ok(see_other(admin.view.hand_off(navigation)))
}

/// POST /admin-dashboard/franchises/{id}/close
pub async fn request_close_franchise(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<FranchiseId>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let Some(franchise) = admin.view.franchises.find(path.into_inner()) else {
        set_flash(&session, "That franchise is no longer on this page");
        return Ok(see_other(DASHBOARD));
    };
    let navigation = admin.view.franchises.request_close_franchise(&franchise);
    Ok(see_other(admin.view.hand_off(navigation)))
}

/// POST /admin-dashboard/franchises/{id}/stores/{store_id}/close
pub async fn request_close_store(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<(FranchiseId, StoreId)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let (franchise_id, store_id) = path.into_inner();
    let selected = admin
        .view
        .franchises
        .find(franchise_id)
        .and_then(|f| f.store(store_id).cloned().map(|s| (f, s)));
    let Some((franchise, store)) = selected else {
        set_flash(&session, "That store is no longer on this page");
        return Ok(see_other(DASHBOARD));
    };
    let navigation = admin.view.franchises.request_close_store(&franchise, &store);
    Ok(see_other(admin.view.hand_off(navigation)))
}

/// POST /admin-dashboard/franchises/{id}/stores/new
pub async fn request_create_store(
    session: Session,
    state: web::Data<AppState>,
    path: web::Path<FranchiseId>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let Some(franchise) = admin.view.franchises.find(path.into_inner()) else {
        set_flash(&session, "That franchise is no longer on this page");
        return Ok(see_other(DASHBOARD));
    };
    let navigation = admin.view.franchises.request_create_store(&franchise);
    Ok(see_other(admin.view.hand_off(navigation)))
}
