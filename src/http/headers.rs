use async_trait::async_trait;
use http::{header, header::IntoHeaderName, HeaderMap, HeaderName, HeaderValue};
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt,
};

use crate::io::error::{error, Headers};

pub trait HeaderMapExt {
    fn headers(&self) -> &HeaderMap;

    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn get_header<K: header::AsHeaderName>(&self, key: K) -> Option<&str> {
        self.headers()
            .get(key)
            .and_then(|value| value.to_str().ok())
    }

    /// Silently skips values that are not valid header values.
    fn insert_header<K, V>(&mut self, key: K, value: V)
    where
        K: IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        if let Ok(value) = value.try_into() {
            self.headers_mut().insert(key, value);
        }
    }

    fn get_content_length(&self) -> Option<usize> {
        self.get_header(header::CONTENT_LENGTH)
            .and_then(|value| value.parse().ok())
    }
}

/// Largest body accepted from a `Content-Length` header.
pub const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Reads exactly `length` body bytes, refusing lengths over [`MAX_BODY_SIZE`]
/// before anything is allocated.
pub(crate) async fn read_body<R>(reader: &mut R, length: usize) -> io::Result<Vec<u8>>
where
    R: AsyncRead + ?Sized + Unpin + Send,
{
    if length > MAX_BODY_SIZE {
        return Err(error(Headers::BodyTooLarge(length)));
    }
    let mut body = Vec::with_capacity(length);
    (&mut *reader).take(length as u64).read_to_end(&mut body).await?;
    if body.len() != length {
        return Err(error(Headers::UnexpectedEof));
    }
    Ok(body)
}

#[async_trait]
pub trait WriteHeaders {
    async fn write_headers(&mut self, headers: &HeaderMap) -> io::Result<()>;
}

#[async_trait]
impl<R> WriteHeaders for R
where
    R: AsyncWrite + ?Sized + Unpin + Send,
{
    async fn write_headers(&mut self, headers: &HeaderMap) -> io::Result<()> {
        for (key, value) in headers {
            self.write_all(key.as_str().as_bytes()).await?;
            self.write_all(b": ").await?;
            self.write_all(value.as_bytes()).await?;
            self.write_all(b"\r\n").await?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait ReadHeaders {
    async fn read_headers(&mut self) -> io::Result<HeaderMap>;
}

#[async_trait]
impl<R> ReadHeaders for R
where
    R: AsyncBufRead + ?Sized + Unpin + Send,
{
    async fn read_headers(&mut self) -> io::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        loop {
            let mut line = String::new();
            if self.read_line(&mut line).await? == 0 {
                return Err(error(Headers::UnexpectedEof));
            }
            if line.trim_end().is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.append(
                    HeaderName::from_bytes(key.trim().as_bytes())
                        .map_err(Headers::InvalidName)
                        .map_err(error)?,
                    HeaderValue::from_str(value.trim())
                        .map_err(Headers::InvalidValue)
                        .map_err(error)?,
                );
            }
        }
        Ok(headers)
    }
}
