use crate::http::request::{Method, Request};
use crate::http::response::Response;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Response>> + Send>>;

/// The part of a request a route handler gets to see.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub version: String,
    pub headers: HashMap<String, String>,
}

impl From<&Request> for RequestContext {
    fn from(req: &Request) -> Self {
        Self {
            method: req.method.clone(),
            path: req.path.clone(),
            version: req.version.clone(),
            headers: req.headers.clone(),
        }
    }
}

/// An API endpoint.
///
/// An `Err` is not turned into a 500: the connection is dropped without a
/// response.
pub trait Handler: Send + Sync {
    fn call(&self, ctx: RequestContext) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Response>> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> HandlerFuture {
        Box::pin(self(ctx))
    }
}

/// Exact-match route table keyed by `(method, path)`.
///
/// No patterns, no trailing-slash folding and no query stripping:
/// `/api/hello?x=1` does not match `/api/hello`.
#[derive(Default, Clone)]
pub struct Router {
    routes: HashMap<(String, String), Arc<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`, replacing any handler already at that key.
    pub fn register<H>(&mut self, method: Method, path: impl Into<String>, handler: H)
    where
        H: Handler + 'static,
    {
        let key = (method.as_str().to_string(), path.into());
        if self.routes.insert(key.clone(), Arc::new(handler)).is_some() {
            tracing::debug!(method = %key.0, path = %key.1, "Route replaced");
        }
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Option<Arc<dyn Handler>> {
        self.routes
            .get(&(method.as_str().to_string(), path.to_string()))
            .cloned()
    }

    /// Runs the matching handler, if any.
    ///
    /// `Ok(None)` means no route matched and the caller should fall back to
    /// static files.
    pub async fn dispatch(&self, req: &Request) -> anyhow::Result<Option<Response>> {
        let Some(handler) = self.resolve(&req.method, &req.path) else {
            return Ok(None);
        };

        let response = handler.call(RequestContext::from(req)).await?;
        Ok(Some(response))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .finish()
    }
}
