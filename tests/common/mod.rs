#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, web, App,
};
use serde_json::json;
use sqlx::SqlitePool;
use usertasks::{auth::AuthResponse, auth::TokenService, db, routes, Config};

/// A fresh seeded in-memory store and a token service, private to one test.
pub struct TestContext {
    pub pool: SqlitePool,
    pub tokens: TokenService,
}

pub async fn context() -> TestContext {
    let config = Config::in_memory();
    let pool = db::connect_and_init(&config)
        .await
        .expect("Failed to initialise in-memory database");
    TestContext {
        pool,
        tokens: TokenService::from_config(&config),
    }
}

pub async fn init_app(
    ctx: &TestContext,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.pool.clone()))
            .app_data(web::Data::new(ctx.tokens.clone()))
            .configure(routes::config),
    )
    .await
}

/// Logs in through `POST /api/auth/login` and returns the token.
pub async fn login<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "Login as {} failed", username);

    let body: AuthResponse = test::read_body_json(resp).await;
    body.token
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
