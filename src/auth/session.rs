use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::Key;

use crate::models::User;

pub const COOKIE_NAME: &str = "pizza-admin";

const USER_KEY: &str = "user";
const VIEW_KEY: &str = "view_id";
const FLASH_KEY: &str = "flash";

/// Encrypted cookie session; the cookie carries the caller and an opaque view id.
pub fn session_middleware(key: Key, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(COOKIE_NAME.to_string())
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_secure(secure)
        .cookie_http_only(true)
        .build()
}

/// The caller identity for this request, if logged in.
pub fn current_user(session: &Session) -> Option<User> {
    session.get::<User>(USER_KEY).unwrap_or(None)
}

pub fn view_id(session: &Session) -> Option<String> {
    session.get::<String>(VIEW_KEY).unwrap_or(None)
}

/// Begin a logged-in session. Callers without dashboard access carry no view id.
pub fn start(session: &Session, user: &User, view_id: Option<&str>) -> Result<(), String> {
    session.renew();
    session.insert(USER_KEY, user).map_err(|e| e.to_string())?;
    if let Some(view_id) = view_id {
        session.insert(VIEW_KEY, view_id).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    let _ = session.insert(FLASH_KEY, message.into());
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}
