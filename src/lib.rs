//! Library entrypoint for roomwatch.
//!
//! This file exists mainly to make controller tests easy (integration tests
//! under `tests/` can import the app state, routers, engines, services).

pub mod config;
pub mod engine;
pub mod models;

pub mod services;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub watches: services::watch_manager::WatchManager,
    pub events_tx: tokio::sync::broadcast::Sender<String>,
}
