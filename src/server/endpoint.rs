use std::future::Future;

use async_trait::async_trait;

use crate::{http::Request, http::Response, trie::PathVariables};

/// What an endpoint gets to work with for one request.
#[derive(Debug)]
pub struct Env {
    pub request: Request,
    pub path: PathVariables,
}

/// Request handler registered on a route.
///
/// Implemented for async closures taking an [`Env`].
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn call(&self, env: Env) -> Response;

    /// Label shown in the route tree dump.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<F, Fut> Endpoint for F
where
    F: Fn(Env) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send + 'static,
{
    async fn call(&self, env: Env) -> Response {
        self(env).await
    }
}
