//! L2 HTTP client.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use jsonrpsee::{
    core::{
        client::{BatchResponse, ClientT, Error},
        params::BatchRequestBuilder,
        traits::ToRpcParams,
    },
    http_client::{HttpClient, HttpClientBuilder},
};
use serde::de::DeserializeOwned;

pub use self::mock::{Handler, MockClient, MockClientBuilder};

mod mock;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy)]
enum CallOrigin<'a> {
    Notification(&'a str),
    Request(&'a str),
    BatchRequest(&'a [String]),
}

impl fmt::Display for CallOrigin<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notification(name) => write!(formatter, "notification `{name}`"),
            Self::Request(name) => write!(formatter, "request `{name}`"),
            Self::BatchRequest(method_names) => write!(formatter, "batch request {method_names:?}"),
        }
    }
}

/// Trait encapsulating requirements for the L2 client base.
pub trait L2ClientBase: ClientT + Clone + fmt::Debug + Send + Sync + 'static {}

impl<T: ClientT + Clone + fmt::Debug + Send + Sync + 'static> L2ClientBase for T {}

/// JSON-RPC client for an L2 node.
///
/// Wraps a transport-level client (`HttpClient` by default) and logs every failed call,
/// tagged with the component that issued it.
#[derive(Debug, Clone)]
pub struct L2Client<C = HttpClient> {
    inner: C,
    component_name: &'static str,
}

impl L2Client {
    /// Creates an HTTP-backed L2 client.
    pub fn http(url: &str) -> anyhow::Result<L2ClientBuilder> {
        L2ClientBuilder::http(url, None)
    }
}

impl<C: L2ClientBase> L2Client<C> {
    /// Sets the component operating this client. This is used in logging etc.
    pub fn for_component(mut self, component_name: &'static str) -> Self {
        self.component_name = component_name;
        self
    }

    fn inspect_call_result<T>(
        &self,
        origin: CallOrigin<'_>,
        call_result: Result<T, Error>,
    ) -> Result<T, Error> {
        match &call_result {
            Ok(_) => tracing::trace!(component = self.component_name, %origin, "call succeeded"),
            Err(err) => tracing::warn!(
                component = self.component_name,
                %origin,
                "Error returned by {origin} called by component `{}`: {err}",
                self.component_name
            ),
        }
        call_result
    }
}

#[async_trait]
impl<C: L2ClientBase> ClientT for L2Client<C> {
    async fn notification<Params>(&self, method: &str, params: Params) -> Result<(), Error>
    where
        Params: ToRpcParams + Send,
    {
        let origin = CallOrigin::Notification(method);
        self.inspect_call_result(origin, self.inner.notification(method, params).await)
    }

    async fn request<R, Params>(&self, method: &str, params: Params) -> Result<R, Error>
    where
        R: DeserializeOwned,
        Params: ToRpcParams + Send,
    {
        let origin = CallOrigin::Request(method);
        tracing::trace!(component = self.component_name, %origin, "sending request");
        self.inspect_call_result(origin, self.inner.request(method, params).await)
    }

    async fn batch_request<'a, R>(
        &self,
        batch: BatchRequestBuilder<'a>,
    ) -> Result<BatchResponse<'a, R>, Error>
    where
        R: DeserializeOwned + fmt::Debug + 'a,
    {
        let method_names: Vec<_> = batch.iter().map(|(name, _)| name.to_owned()).collect();
        let origin = CallOrigin::BatchRequest(&method_names);
        tracing::trace!(component = self.component_name, %origin, "sending batch request");
        self.inspect_call_result(origin, self.inner.batch_request(batch).await)
    }
}

/// Builder for the [`L2Client`].
#[derive(Debug)]
pub struct L2ClientBuilder<C = HttpClient> {
    client: C,
}

impl L2ClientBuilder {
    /// Builds an HTTP transport for `url`, optionally limiting the duration of every request.
    pub fn http(url: &str, request_timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = HttpClientBuilder::default();
        if let Some(timeout) = request_timeout {
            builder = builder.request_timeout(timeout);
        }
        let client = builder.build(url)?;
        Ok(Self::new(client))
    }
}

impl<C: L2ClientBase> L2ClientBuilder<C> {
    /// Wraps the provided client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Builds the client.
    pub fn build(self) -> L2Client<C> {
        tracing::info!(
            "Creating JSON-RPC client with inner client: {:?}",
            self.client
        );
        L2Client {
            inner: self.client,
            component_name: "",
        }
    }
}
