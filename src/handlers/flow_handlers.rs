//! Delegated franchise/store flows.
//!
//! The dashboard hands off the selected entities through [`Navigation`]; each
//! flow confirms with the admin, performs the backend call, and then marks the
//! franchise list for reload.

use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::{AdminSession, require_admin, see_other};
use crate::api::ApiError;
use crate::auth::csrf;
use crate::auth::session::set_flash;
use crate::controllers::Navigation;
use crate::controllers::navigation::DASHBOARD;
use crate::errors::{AppError, render};
use crate::models::franchise::AdminRef;
use crate::models::{NewFranchise, NewStore};
use crate::state::AppState;
use crate::templates_structs::{
    CloseFranchiseTemplate, CloseStoreTemplate, CreateFranchiseTemplate, CreateStoreTemplate, PageContext,
};

#[derive(Deserialize)]
pub struct DecisionForm {
    pub csrf_token: String,
    #[serde(default)]
    pub decision: String,
}

impl DecisionForm {
    fn confirmed(&self) -> bool {
        self.decision == "confirm"
    }
}

#[derive(Deserialize)]
pub struct CreateFranchiseForm {
    pub csrf_token: String,
    #[serde(default)]
    pub decision: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub admin_email: String,
}

#[derive(Deserialize)]
pub struct CreateStoreForm {
    pub csrf_token: String,
    #[serde(default)]
    pub decision: String,
    #[serde(default)]
    pub name: String,
}

/// Back to the dashboard without touching the backend.
fn cancel(admin: &AdminSession) -> HttpResponse {
    admin.view.cancel_handoff();
    see_other(DASHBOARD)
}

/// Finish a flow whose backend call succeeded.
fn complete(session: &Session, admin: &AdminSession, message: String) -> HttpResponse {
    admin.view.complete_handoff();
    set_flash(session, message);
    see_other(DASHBOARD)
}

fn failure_message(e: &ApiError) -> String {
    match e {
        ApiError::Status { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// GET /admin-dashboard/create-franchise
pub async fn create_franchise_form(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_admin(&session, &state)?;
    render(CreateFranchiseTemplate {
        ctx: PageContext::build(&session, &state),
        name: String::new(),
        admin_email: String::new(),
    })
}

/// POST /admin-dashboard/create-franchise
pub async fn create_franchise(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CreateFranchiseForm>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    if form.decision != "confirm" {
        return Ok(cancel(&admin));
    }

    let new_franchise = NewFranchise {
        name: form.name.trim().to_string(),
        admins: vec![AdminRef { email: form.admin_email.trim().to_string() }],
    };
    match admin.view.service().create_franchise(&new_franchise).await {
        Ok(created) => {
            log::info!("Created franchise {} ({})", created.id, created.name);
            Ok(complete(&session, &admin, format!("Created franchise {}", created.name)))
        }
        Err(e) => {
            log::warn!("Create franchise failed: {e}");
            let ctx = PageContext::build(&session, &state)
                .with_error(format!("Could not create franchise: {}", failure_message(&e)));
            render(CreateFranchiseTemplate {
                ctx,
                name: form.name.clone(),
                admin_email: form.admin_email.clone(),
            })
        }
    }
}

/// GET /admin-dashboard/close-franchise
pub async fn close_franchise_form(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    let Some(Navigation::CloseFranchise { franchise }) = admin.view.handoff() else {
        return Ok(see_other(DASHBOARD));
    };
    render(CloseFranchiseTemplate {
        ctx: PageContext::build(&session, &state),
        franchise_name: franchise.name,
    })
}

/// POST /admin-dashboard/close-franchise
pub async fn close_franchise(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<DecisionForm>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let Some(Navigation::CloseFranchise { franchise }) = admin.view.handoff() else {
        return Ok(see_other(DASHBOARD));
    };
    if !form.confirmed() {
        return Ok(cancel(&admin));
    }

    match admin.view.service().close_franchise(franchise.id).await {
        Ok(()) => {
            log::info!("Closed franchise {} ({})", franchise.id, franchise.name);
            Ok(complete(&session, &admin, format!("Closed franchise {}", franchise.name)))
        }
        Err(e) => {
            log::warn!("Close franchise {} failed: {e}", franchise.id);
            let ctx = PageContext::build(&session, &state)
                .with_error(format!("Could not close franchise: {}", failure_message(&e)));
            render(CloseFranchiseTemplate { ctx, franchise_name: franchise.name })
        }
    }
}

/// GET /admin-dashboard/close-store
pub async fn close_store_form(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    let Some(Navigation::CloseStore { franchise, store }) = admin.view.handoff() else {
        return Ok(see_other(DASHBOARD));
    };
    render(CloseStoreTemplate {
        ctx: PageContext::build(&session, &state),
        franchise_name: franchise.name,
        store_name: store.name,
    })
}

/// POST /admin-dashboard/close-store
pub async fn close_store(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<DecisionForm>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let Some(Navigation::CloseStore { franchise, store }) = admin.view.handoff() else {
        return Ok(see_other(DASHBOARD));
    };
    if !form.confirmed() {
        return Ok(cancel(&admin));
    }

    match admin.view.service().close_store(franchise.id, store.id).await {
        Ok(()) => {
            log::info!("Closed store {} of franchise {}", store.id, franchise.id);
            Ok(complete(&session, &admin, format!("Closed store {}", store.name)))
        }
        Err(e) => {
            log::warn!("Close store {} failed: {e}", store.id);
            let ctx = PageContext::build(&session, &state)
                .with_error(format!("Could not close store: {}", failure_message(&e)));
            render(CloseStoreTemplate {
                ctx,
                franchise_name: franchise.name,
                store_name: store.name,
            })
        }
    }
}

/// GET /admin-dashboard/create-store
pub async fn create_store_form(
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    let Some(Navigation::CreateStore { franchise }) = admin.view.handoff() else {
        return Ok(see_other(DASHBOARD));
    };
    render(CreateStoreTemplate {
        ctx: PageContext::build(&session, &state),
        franchise_name: franchise.name,
        name: String::new(),
    })
}

/// POST /admin-dashboard/create-store
pub async fn create_store(
    session: Session,
    state: web::Data<AppState>,
    form: web::Form<CreateStoreForm>,
) -> Result<HttpResponse, AppError> {
    let admin = require_admin(&session, &state)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let Some(Navigation::CreateStore { franchise }) = admin.view.handoff() else {
        return Ok(see_other(DASHBOARD));
    };
    if form.decision != "confirm" {
        return Ok(cancel(&admin));
    }

    let new_store = NewStore { name: form.name.trim().to_string() };
    match admin.view.service().create_store(franchise.id, &new_store).await {
        Ok(store) => {
            log::info!("Created store {} in franchise {}", store.id, franchise.id);
            Ok(complete(&session, &admin, format!("Created store {}", store.name)))
        }
        Err(e) => {
            log::warn!("Create store in franchise {} failed: {e}", franchise.id);
            let ctx = PageContext::build(&session, &state)
                .with_error(format!("Could not create store: {}", failure_message(&e)));
            render(CreateStoreTemplate {
                ctx,
                franchise_name: franchise.name,
                name: form.name.clone(),
            })
        }
    }
}
