//! # Transport Client
//!
//! This module defines the transport seam every resource fetch goes through.
//!
//! A [`Client`] performs `GET uri` and hands back a [`Response`] whose [`Body`]
//! the caller owns. Ownership is the release mechanism: whoever holds the body
//! drops it when done, on success and failure alike.

use crate::error::TransportError;
use async_trait::async_trait;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Shared, non-owning handle to the client a resource was fetched with.
///
/// Cloning the handle only bumps a reference count.
pub type ClientHandle = Arc<dyn Client>;

/// Trait implemented by every transport able to fetch Redfish resources.
///
/// Implementations must report non-success HTTP statuses as
/// [`TransportError::Status`], so a returned [`Response`] always carries a
/// body worth decoding.
///
/// # Example
///
/// ```rust
/// use redfish_framework::{Body, Client, Response, TransportError};
/// use async_trait::async_trait;
///
/// struct Static;
///
/// #[async_trait]
/// impl Client for Static {
///     async fn get(&self, _uri: &str) -> Result<Response, TransportError> {
///         Ok(Response::new(200, Body::from_bytes(br#"{"Id": "1"}"#.to_vec())))
///     }
/// }
/// ```
#[async_trait]
pub trait Client: Send + Sync {
    /// Fetch `uri`. The caller is responsible for the returned body.
    async fn get(&self, uri: &str) -> Result<Response, TransportError>;
}

/// A successful response: status code plus an owned body stream.
pub struct Response {
    status: u16,
    body: Body,
}

impl Response {
    pub fn new(status: u16, body: Body) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn into_body(self) -> Body {
        self.body
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Owned response body stream.
///
/// The underlying reader is released when the `Body` is dropped or
/// [closed](Body::close).
pub struct Body {
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl Body {
    pub fn new(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Cursor::new(bytes.into()))
    }

    /// Drain the stream. `uri` only labels the error.
    pub async fn read_all(&mut self, uri: &str) -> Result<Vec<u8>, TransportError> {
        let mut buf = Vec::new();
        self.reader
            .read_to_end(&mut buf)
            .await
            .map_err(|e| TransportError::Body {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;
        Ok(buf)
    }

    /// Release the stream explicitly.
    pub fn close(self) {
        drop(self);
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Body { .. }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_body_reads_all_bytes() {
        let mut body = Body::from_bytes(b"hello".to_vec());
        let bytes = body.read_all("/x").await.unwrap();
        assert_eq!(bytes, b"hello");

        // A drained stream yields nothing more.
        assert!(body.read_all("/x").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_handle_dispatches() {
        struct Fixed;

        #[async_trait]
        impl Client for Fixed {
            async fn get(&self, uri: &str) -> Result<Response, TransportError> {
                Ok(Response::new(200, Body::from_bytes(uri.as_bytes().to_vec())))
            }
        }

        let handle: ClientHandle = Arc::new(Fixed);
        let response = handle.get("/redfish/v1").await.unwrap();
        assert_eq!(response.status(), 200);
        let mut body = response.into_body();
        assert_eq!(body.read_all("/redfish/v1").await.unwrap(), b"/redfish/v1");
    }
}
