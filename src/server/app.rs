use anyhow::{Context, Result};
use essentials::{debug, info};
use http::Method;
use std::net::{IpAddr, SocketAddr};

use crate::http::server::Server as HttpServer;
use crate::trie::{RouteMethod, RouterBuilder};

use super::{Dispatcher, Endpoint};

/// Create a new server builder whose routes are mounted under `prefix`.
pub fn builder(prefix: impl Into<String>) -> ServerBuilder {
    ServerBuilder::new(prefix.into())
}

/// A builder for a server.
pub struct ServerBuilder {
    routes: RouterBuilder<Box<dyn Endpoint>>,
    host: IpAddr,
    app_port: u16,
}

impl ServerBuilder {
    fn new(prefix: String) -> Self {
        Self {
            routes: RouterBuilder::with_prefix(prefix),
            host: IpAddr::from([127, 0, 0, 1]), // Default host (localhost)
            app_port: 80,
        }
    }

    /// Register an endpoint for the given method and path pattern.
    /// Errors in the route table are reported by [`build`](Self::build).
    pub fn route(
        mut self,
        method: impl Into<RouteMethod>,
        path: &str,
        endpoint: impl Endpoint + 'static,
    ) -> Self {
        self.routes = self.routes.route(method, path, Box::new(endpoint));
        self
    }

    pub fn get(self, path: &str, endpoint: impl Endpoint + 'static) -> Self {
        self.route(Method::GET, path, endpoint)
    }

    pub fn post(self, path: &str, endpoint: impl Endpoint + 'static) -> Self {
        self.route(Method::POST, path, endpoint)
    }

    pub fn put(self, path: &str, endpoint: impl Endpoint + 'static) -> Self {
        self.route(Method::PUT, path, endpoint)
    }

    pub fn delete(self, path: &str, endpoint: impl Endpoint + 'static) -> Self {
        self.route(Method::DELETE, path, endpoint)
    }

    pub fn patch(self, path: &str, endpoint: impl Endpoint + 'static) -> Self {
        self.route(Method::PATCH, path, endpoint)
    }

    /// Register an endpoint answering every method not registered explicitly on `path`.
    pub fn any(self, path: &str, endpoint: impl Endpoint + 'static) -> Self {
        self.route(RouteMethod::Any, path, endpoint)
    }

    /// Set the host for the application service.
    /// The default host is 127.0.0.1
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Set the port for the application service.
    /// The default port is 80, 0 picks a free port.
    pub fn with_app_port(mut self, port: u16) -> Self {
        self.app_port = port;
        self
    }

    /// Freeze the route table and bind the listener.
    pub async fn build(self) -> Result<Server> {
        let router = self.routes.build().context("Invalid route table")?;
        debug!(
            "Route table:\n{}",
            router.tree_with(|endpoint| endpoint.name().to_string())
        );
        let app = HttpServer::bind(
            SocketAddr::new(self.host, self.app_port),
            Dispatcher::new(router),
        )
        .await?;
        Ok(Server { app })
    }
}

pub struct Server {
    app: HttpServer<Dispatcher>,
}

impl Server {
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.app.local_addr()
    }

    /// Start the server.
    pub async fn run(self) -> Result<()> {
        info!("Serving on {}", self.local_addr()?);
        self.app.run().await
    }
}
