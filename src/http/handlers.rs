//! Built-in API handlers.

use crate::http::request::Method;
use crate::http::response::Response;
use crate::http::router::{RequestContext, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub const HELLO_PATH: &str = "/api/hello";

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: String,
    pub timestamp: String,
}

/// Greets whoever is named after the route path, or the world.
pub async fn hello(ctx: RequestContext) -> anyhow::Result<Response> {
    let name = ctx
        .path
        .strip_prefix(HELLO_PATH)
        .unwrap_or_default()
        .trim_matches('/');
    let name = if name.is_empty() { "world" } else { name };

    let greeting = Greeting {
        message: format!("Hello, {} from your API!", name),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    Ok(Response::json(&greeting)?)
}

/// The route table the server starts with.
pub fn default_routes() -> Router {
    let mut router = Router::new();
    router.register(Method::GET, HELLO_PATH, hello);
    router
}
