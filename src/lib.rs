pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod store;
pub mod templates_structs;
