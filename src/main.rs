use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use usertasks::{auth::TokenService, db, routes, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(to_io_error)?;
    if config.uses_default_secret() {
        log::warn!("JWT_SECRET not set; using the insecure development default");
    }

    let pool = db::connect_and_init(&config).await.map_err(to_io_error)?;
    let pool = web::Data::new(pool);
    let tokens = web::Data::new(TokenService::from_config(&config));

    log::info!("Starting usertasks server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(tokens.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

fn to_io_error(err: usertasks::AppError) -> std::io::Error {
    log::error!("Startup failed: {}", err);
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}
