use std::{panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use essentials::{debug, error, info, warn};
use futures::FutureExt;
use http::{header, StatusCode};
use tokio::{
    io::{self, AsyncWriteExt, BufReader},
    net::{
        tcp::{OwnedReadHalf, OwnedWriteHalf},
        TcpStream,
    },
};

use crate::{
    http::{server::ConnectionHandler, HeaderMapExt, ReadRequest, Request, Response, WriteResponse},
    trie::{Resolved, Router},
};

use super::{Endpoint, Env};

pub type Routes = Router<Box<dyn Endpoint>>;

/// Turns router lookups into responses: 404 when no route matches, 405 when
/// the path matches but the method does not, otherwise the endpoint's reply.
pub struct Dispatcher {
    router: Arc<Routes>,
}

impl Dispatcher {
    pub fn new(router: Routes) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    pub async fn dispatch(&self, request: Request) -> Response {
        match self.router.resolve(&request.method, &request.path) {
            Resolved::NotFound => {
                debug!(method = ?request.method, path = request.path.as_str(), "No route");
                Response::plain(StatusCode::NOT_FOUND)
            }
            Resolved::MethodNotAllowed { allowed } => {
                debug!(method = ?request.method, path = request.path.as_str(), "Method not allowed");
                let allowed = allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut response = Response::plain(StatusCode::METHOD_NOT_ALLOWED);
                response.insert_header(header::ALLOW, allowed);
                response
            }
            Resolved::Found { handler, variables } => {
                debug!(endpoint = handler.name(), path = request.path.as_str(), "-->");
                let env = Env {
                    request,
                    path: variables,
                };
                match AssertUnwindSafe(handler.call(env)).catch_unwind().await {
                    Ok(response) => response,
                    Err(_) => {
                        error!(endpoint = handler.name(), "Endpoint panicked");
                        Response::plain(StatusCode::INTERNAL_SERVER_ERROR)
                    }
                }
            }
        }
    }

    async fn serve(&self, rx: OwnedReadHalf, tx: &mut OwnedWriteHalf) -> io::Result<()> {
        let request = BufReader::new(rx).read_request().await?;
        debug!(data = ?request, "Parsed request");
        let mut response = self.dispatch(request).await;
        response.insert_header(header::CONNECTION, "close");
        tx.write_response(&response).await?;
        debug!(status = ?response.status, "Wrote response");
        Ok(())
    }
}

#[async_trait]
impl ConnectionHandler for Dispatcher {
    async fn handle(&self, stream: TcpStream) {
        let ip = stream.peer_addr().ok();
        info!(ip = ?ip, "Connection received");
        let (rx, mut tx) = stream.into_split();
        match self.serve(rx, &mut tx).await {
            Ok(_) => {
                info!(ip = ?ip, "Connection closed");
            }
            Err(err) => {
                warn!(ip = ?ip, "Failed to serve request: {}", err);
                if let Err(err) = tx
                    .write_all(
                        b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                    )
                    .await
                {
                    warn!(ip = ?ip, "Failed to write response: {}", err);
                }
            }
        }
    }
}
