#![doc = "The `usertasks` library crate."]
#![doc = ""]
#![doc = "A REST API over users and the task items they own, stored in SQLite, with a"]
#![doc = "token-issuing login stub guarding the users routes. The binary (`main.rs`) reads"]
#![doc = "`Config`, opens and initialises the pool, and mounts `routes::config`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
