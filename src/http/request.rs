use crate::io::error::{error, Headers, RequestStatusLine};

use super::{
    headers::{read_body, HeaderMapExt},
    ReadHeaders, WriteHeaders,
};
use async_trait::async_trait;
use http::{HeaderMap, Method};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug)]
pub struct Request {
    pub method: Method,
    /// Request target without the query string.
    pub path: String,
    pub query: Option<String>,
    pub version: String,
    headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = split_target(target);
        Self {
            method,
            path,
            query,
            version: "HTTP/1.1".to_string(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

fn split_target(target: &str) -> (String, Option<String>) {
    match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    }
}

impl HeaderMapExt for Request {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

#[async_trait]
pub trait WriteRequest {
    async fn write_request(&mut self, request: &Request) -> io::Result<()>;
}

#[async_trait]
impl<R> WriteRequest for R
where
    R: AsyncWrite + ?Sized + Unpin + Send,
{
    async fn write_request(&mut self, request: &Request) -> io::Result<()> {
        self.write_all(request.method.as_str().as_bytes()).await?;
        self.write_all(b" ").await?;
        self.write_all(request.target().as_bytes()).await?;
        self.write_all(b" ").await?;
        self.write_all(request.version.as_bytes()).await?;
        self.write_all(b"\r\n").await?;
        self.write_headers(&request.headers).await?;
        self.write_all(b"\r\n").await?;
        self.write_all(&request.body).await?;
        Ok(())
    }
}

#[async_trait]
pub trait ReadRequest {
    async fn read_request(&mut self) -> io::Result<Request>;
}

#[async_trait]
impl<R> ReadRequest for R
where
    R: AsyncBufRead + ?Sized + Unpin + Send,
{
    async fn read_request(&mut self) -> io::Result<Request> {
        let status_line = self
            .lines()
            .next_line()
            .await?
            .ok_or(error(RequestStatusLine::MissingStatusLine))?;
        let (method, target, version) = {
            let mut parts = status_line.split_whitespace();
            (
                parts
                    .next()
                    .ok_or(error(RequestStatusLine::MissingMethod))?
                    .parse::<Method>()
                    .map_err(|_| error(RequestStatusLine::InvalidMethod))?,
                parts
                    .next()
                    .ok_or(error(RequestStatusLine::MissingPath))?
                    .to_string(),
                parts
                    .next()
                    .ok_or(error(RequestStatusLine::MissingVersion))?
                    .to_string(),
            )
        };
        let (path, query) = split_target(&target);
        let mut request = Request {
            method,
            path,
            query,
            version,
            headers: self.read_headers().await?,
            body: Vec::new(),
        };
        if request.get_header(http::header::CONTENT_LENGTH).is_some() {
            let length = request
                .get_content_length()
                .ok_or(error(Headers::InvalidContentLength))?;
            request.body = read_body(self, length).await?;
        }
        Ok(request)
    }
}
