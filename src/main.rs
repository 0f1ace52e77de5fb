use std::sync::Arc;

use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use pizza_admin::api::HttpPizzaGateway;
use pizza_admin::auth::session::session_middleware;
use pizza_admin::config::Config;
use pizza_admin::controllers::ViewRegistry;
use pizza_admin::handlers;
use pizza_admin::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = Config::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;

    // Session encryption key: set SESSION_KEY for sessions that survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+); generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set; generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let gateway = HttpPizzaGateway::new(config.api_base_url.clone(), config.api_timeout)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let mut state = AppState::new(Arc::new(gateway), config.lists, config.app_title.clone());
    state.views = ViewRegistry::new(config.view_idle_timeout);
    let state = web::Data::new(state);

    log::info!("Starting server at http://{}", config.bind_addr);

    let secure_cookies = config.secure_cookies;
    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(secret_key.clone(), secure_cookies))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(actix_files::Files::new("/static", "./static"))
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
