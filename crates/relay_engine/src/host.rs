use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::{HostError, HostFailureKind};

/// Ports that well-known competitive-programming tools listen on.
pub const DEFAULT_HOST_PORTS: [u16; 7] = [1327, 4244, 6174, 10042, 10043, 10045, 27121];

/// One reachable host. Sends fail independently of every other channel.
#[async_trait::async_trait]
pub trait HostChannel: Send + Sync {
    /// Human-readable identity for logs.
    fn name(&self) -> &str;

    async fn send(&self, content: &str) -> Result<(), HostError>;
}

/// Yields the hosts reachable right now. Called once per broadcast.
#[async_trait::async_trait]
pub trait HostProvider: Send + Sync {
    async fn hosts(&self) -> Vec<Arc<dyn HostChannel>>;
}

/// A fixed host set.
#[derive(Clone, Default)]
pub struct StaticHostProvider {
    hosts: Vec<Arc<dyn HostChannel>>,
}

impl StaticHostProvider {
    pub fn new(hosts: Vec<Arc<dyn HostChannel>>) -> Self {
        Self { hosts }
    }
}

#[async_trait::async_trait]
impl HostProvider for StaticHostProvider {
    async fn hosts(&self) -> Vec<Arc<dyn HostChannel>> {
        self.hosts.clone()
    }
}

#[derive(Debug, Clone)]
pub struct HostSettings {
    pub address: String,
    pub ports: Vec<u16>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            address: "localhost".to_string(),
            ports: DEFAULT_HOST_PORTS.to_vec(),
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Host listening for task JSON on a local HTTP port.
#[derive(Debug, Clone)]
pub struct HttpHost {
    name: String,
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpHost {
    pub fn new(client: reqwest::Client, address: &str, port: u16) -> Result<Self, HostError> {
        let endpoint = Url::parse(&format!("http://{address}:{port}/"))
            .map_err(|err| HostError::new(HostFailureKind::InvalidEndpoint, err.to_string()))?;
        Ok(Self {
            name: endpoint.to_string(),
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl HostChannel for HttpHost {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, content: &str) -> Result<(), HostError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(content.to_owned())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(HostError::new(
                HostFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(())
    }
}

/// One [`HttpHost`] per configured port, all sharing a client.
pub struct PortHostProvider {
    hosts: Vec<Arc<dyn HostChannel>>,
}

impl PortHostProvider {
    pub fn new(settings: &HostSettings) -> Result<Self, HostError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| HostError::new(HostFailureKind::Network, err.to_string()))?;

        let mut ports: Vec<u16> = Vec::with_capacity(settings.ports.len());
        for port in &settings.ports {
            if !ports.contains(port) {
                ports.push(*port);
            }
        }

        let hosts = ports
            .into_iter()
            .map(|port| {
                HttpHost::new(client.clone(), &settings.address, port)
                    .map(|host| Arc::new(host) as Arc<dyn HostChannel>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { hosts })
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[async_trait::async_trait]
impl HostProvider for PortHostProvider {
    async fn hosts(&self) -> Vec<Arc<dyn HostChannel>> {
        self.hosts.clone()
    }
}

fn map_reqwest_error(err: reqwest::Error) -> HostError {
    if err.is_timeout() {
        return HostError::new(HostFailureKind::Timeout, err.to_string());
    }
    HostError::new(HostFailureKind::Network, err.to_string())
}
