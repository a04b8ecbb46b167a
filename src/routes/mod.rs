use actix_cors::Cors;
use actix_web::web;

use crate::error::json_error_handler;

pub mod app_state;
pub mod chat_routes;
pub mod mail_routes;

/// Registers every endpoint plus the JSON body error policy. Bodies are parsed
/// as JSON whether or not the client sends a `Content-Type`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .content_type_required(false)
            .error_handler(json_error_handler),
    )
    .configure(chat_routes::init_routes)
    .configure(mail_routes::init_routes);
}

/// Browser access policy for the website widget: any origin, method and
/// header, with credentials allowed.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}
