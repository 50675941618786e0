pub mod auth;
pub mod health;
pub mod task_items;
pub mod users;

use actix_web::web;

use crate::{auth::AuthMiddleware, error::AppError};

/// Reports unreadable or incomplete JSON bodies as `AppError::BadRequest`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Registers every route. The caller provides `web::Data<SqlitePool>` and
/// `web::Data<TokenService>`.
///
/// Users routes sit behind `AuthMiddleware`; task item routes are open.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::health)
        .service(
            web::scope("/api")
                .service(web::scope("/auth").service(auth::login))
                .service(
                    web::scope("/users")
                        .wrap(AuthMiddleware)
                        .service(users::list_users)
                        .service(users::create_user)
                        .service(users::get_user)
                        .service(users::replace_user)
                        .service(users::delete_user),
                )
                .service(
                    web::scope("/taskitems")
                        .service(task_items::list_task_items)
                        .service(task_items::create_task_item)
                        .service(task_items::get_task_item)
                        .service(task_items::replace_task_item)
                        .service(task_items::delete_task_item),
                ),
        );
}
