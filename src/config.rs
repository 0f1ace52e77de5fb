use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;

/// Page sizes used by the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    pub user_page_size: u32,
    pub franchise_page_size: u32,
    pub franchise_search_page_size: u32,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            user_page_size: 2,
            franchise_page_size: 3,
            franchise_search_page_size: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub api_base_url: String,
    pub session_key: Option<String>,
    pub secure_cookies: bool,
    pub api_timeout: Duration,
    pub view_idle_timeout: Duration,
    pub app_title: String,
    pub lists: ListSettings,
}

impl Config {
    /// Load `.env` (if present), then read the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("Ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = ListSettings::default();
        let lists = ListSettings {
            user_page_size: page_size(&lookup, "USER_PAGE_SIZE", defaults.user_page_size)?,
            franchise_page_size: page_size(&lookup, "FRANCHISE_PAGE_SIZE", defaults.franchise_page_size)?,
            franchise_search_page_size: page_size(
                &lookup,
                "FRANCHISE_SEARCH_PAGE_SIZE",
                defaults.franchise_search_page_size,
            )?,
        };

        Ok(Self {
            bind_addr: lookup("PIZZA_ADMIN_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            api_base_url: lookup("PIZZA_API_URL").unwrap_or_else(|| "http://localhost:3000".to_string()),
            session_key: lookup("SESSION_KEY"),
            secure_cookies: parse(&lookup, "SECURE_COOKIES", false)?,
            api_timeout: Duration::from_secs(parse(&lookup, "API_TIMEOUT_SECS", 30)?),
            view_idle_timeout: Duration::from_secs(parse(&lookup, "SESSION_IDLE_SECS", 7200)?),
            app_title: lookup("APP_TITLE").unwrap_or_else(|| "Mama Ricci's kitchen".to_string()),
            lists,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw:?}"))),
        None => Ok(default),
    }
}

fn page_size(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> Result<u32, AppError> {
    match parse(lookup, key, default)? {
        0 => Err(AppError::Config(format!("{key} must be at least 1"))),
        n => Ok(n),
    }
}
