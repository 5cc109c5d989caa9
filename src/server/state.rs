use crate::config::Config;
use crate::http::handlers;
use crate::http::router::Router;
use crate::http::static_files::StaticFiles;

/// Everything a connection needs to answer requests.
///
/// Built once before the listener starts and shared behind an `Arc`; never
/// mutated afterwards.
#[derive(Debug)]
pub struct AppState {
    pub router: Router,
    pub static_files: StaticFiles,
}

impl AppState {
    pub fn new(router: Router, static_files: StaticFiles) -> Self {
        Self { router, static_files }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            handlers::default_routes(),
            StaticFiles::from_config(&cfg.static_files),
        )
    }
}
