use super::{
    headers::{read_body, HeaderMapExt},
    ReadHeaders, WriteHeaders,
};
use crate::io::error::{error, Headers, ResponseStatusLine};
use async_trait::async_trait;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug)]
pub struct Response {
    pub version: String,
    pub status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status,
            headers: vec![(header::CONTENT_LENGTH, HeaderValue::from_static("0"))]
                .into_iter()
                .collect(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Plain text response with the canonical reason as body.
    pub fn plain(status: StatusCode) -> Self {
        Self::new(status).with_text(status.canonical_reason().unwrap_or_default())
    }

    pub fn with_text(mut self, body: impl Into<String>) -> Self {
        self.insert_header(header::CONTENT_TYPE, "text/plain; charset=utf-8");
        self.set_body(body.into().into_bytes());
        self
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.insert_header(header::CONTENT_LENGTH, body.len());
        self.body = body;
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl HeaderMapExt for Response {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

#[async_trait]
pub trait WriteResponse {
    async fn write_response(&mut self, response: &Response) -> io::Result<()>;
}

#[async_trait]
impl<R> WriteResponse for R
where
    R: AsyncWrite + ?Sized + Unpin + Send,
{
    async fn write_response(&mut self, response: &Response) -> io::Result<()> {
        self.write_all(response.version.as_bytes()).await?;
        self.write_all(b" ").await?;
        self.write_all(response.status.as_str().as_bytes()).await?;
        self.write_all(b" ").await?;
        if let Some(reason) = response.status.canonical_reason() {
            self.write_all(reason.as_bytes()).await?;
        }
        self.write_all(b"\r\n").await?;
        self.write_headers(&response.headers).await?;
        self.write_all(b"\r\n").await?;
        self.write_all(&response.body).await?;
        self.flush().await?;
        Ok(())
    }
}

#[async_trait]
pub trait ReadResponse {
    async fn read_response(&mut self) -> io::Result<Response>;
}

#[async_trait]
impl<R> ReadResponse for R
where
    R: AsyncBufRead + ?Sized + Unpin + Send,
{
    async fn read_response(&mut self) -> io::Result<Response> {
        let mut status_line = String::new();
        if self.read_line(&mut status_line).await? == 0 {
            return Err(error(ResponseStatusLine::MissingStatusLine));
        }
        let (version, status) = {
            let mut parts = status_line.split_whitespace();
            (
                parts
                    .next()
                    .ok_or(error(ResponseStatusLine::MissingVersion))?
                    .to_string(),
                parts
                    .next()
                    .ok_or(error(ResponseStatusLine::MissingStatus))?
                    .to_string(),
            )
        };
        let mut response = Response {
            version,
            status: status
                .parse()
                .map_err(|_| error(ResponseStatusLine::InvalidStatus))?,
            headers: self.read_headers().await?,
            body: Vec::new(),
        };
        let length = response
            .get_content_length()
            .ok_or(error(Headers::InvalidContentLength))?;
        response.body = read_body(self, length).await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let mut response = Response::plain(StatusCode::NOT_FOUND);
        response.insert_header(header::CONNECTION, "close");
        let mut output = Vec::new();
        output.write_response(&response).await.unwrap();
        let text = String::from_utf8(output.clone()).unwrap();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.ends_with("\r\n\r\nNot Found"));

        let mut input = output.as_slice();
        let parsed = input.read_response().await.unwrap();
        assert_eq!(parsed.status, StatusCode::NOT_FOUND);
        assert_eq!(parsed.get_header(header::CONNECTION), Some("close"));
        assert_eq!(parsed.get_content_length(), Some(9));
        assert_eq!(parsed.text(), "Not Found");
    }

    #[test]
    fn test_empty_response_has_zero_length() {
        let response = Response::ok();
        assert_eq!(response.get_content_length(), Some(0));
        assert!(response.body().is_empty());
    }
}
