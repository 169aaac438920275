use async_trait::async_trait;
use log::debug;
use reqwest::Url;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::timeout;

/// Answers "is there a usable network right now?"
#[async_trait]
pub trait Connectivity: Send + Sync {
    async fn has_internet_connection(&self) -> bool;
}

/// Fixed answer, for embedders that track connectivity themselves
/// (a mobile shell) or for running against the cache only.
#[derive(Debug, Clone, Copy)]
pub struct StaticConnectivity(pub bool);

#[async_trait]
impl Connectivity for StaticConnectivity {
    async fn has_internet_connection(&self) -> bool {
        self.0
    }
}

/// Probes the API host with a TCP connect and publishes the outcome.
///
/// Subscribers see every availability change through a watch channel.
pub struct NetworkListener {
    host: String,
    port: u16,
    probe_timeout: Duration,
    available: watch::Sender<bool>,
}

impl NetworkListener {
    /// Listener for the host of `base_url`. Returns `None` if the URL has no host.
    pub fn for_base_url(base_url: &str, probe_timeout: Duration) -> Option<Self> {
        let url = Url::parse(base_url).ok()?;
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        Some(Self::new(host, port, probe_timeout))
    }

    pub fn new(host: impl Into<String>, port: u16, probe_timeout: Duration) -> Self {
        let (available, _) = watch::channel(false);
        Self {
            host: host.into(),
            port,
            probe_timeout,
            available,
        }
    }

    /// Probe once and return a receiver tracking availability
    pub async fn check_network_availability(&self) -> watch::Receiver<bool> {
        let online = self.probe().await;
        self.available.send_replace(online);
        self.available.subscribe()
    }

    pub fn on_available(&self) {
        self.available.send_replace(true);
    }

    pub fn on_lost(&self) {
        self.available.send_replace(false);
    }

    async fn probe(&self) -> bool {
        let addr = (self.host.as_str(), self.port);
        match timeout(self.probe_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("{}:{} unreachable: {}", self.host, self.port, e);
                false
            }
            Err(_) => {
                debug!("{}:{} probe timed out", self.host, self.port);
                false
            }
        }
    }
}

#[async_trait]
impl Connectivity for NetworkListener {
    async fn has_internet_connection(&self) -> bool {
        let online = self.probe().await;
        self.available.send_replace(online);
        online
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_static_connectivity() {
        assert!(StaticConnectivity(true).has_internet_connection().await);
        assert!(!StaticConnectivity(false).has_internet_connection().await);
    }

    #[test]
    fn test_for_base_url_uses_default_port() {
        let listener =
            NetworkListener::for_base_url("https://api.spoonacular.com", Duration::from_secs(1))
                .unwrap();
        assert_eq!(listener.host, "api.spoonacular.com");
        assert_eq!(listener.port, 443);

        assert!(NetworkListener::for_base_url("not a url", Duration::from_secs(1)).is_none());
    }

    #[tokio::test]
    async fn test_probe_reachable_host() {
        let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let listener = NetworkListener::new("127.0.0.1", port, Duration::from_secs(2));
        let receiver = listener.check_network_availability().await;
        assert!(*receiver.borrow());
        assert!(listener.has_internet_connection().await);
    }

    #[tokio::test]
    async fn test_probe_unreachable_host() {
        // Bind then drop to get a port nobody listens on
        let port = {
            let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
            server.local_addr().unwrap().port()
        };

        let listener = NetworkListener::new("127.0.0.1", port, Duration::from_secs(2));
        assert!(!listener.has_internet_connection().await);
    }

    #[tokio::test]
    async fn test_callbacks_update_receivers() {
        let listener = NetworkListener::new("127.0.0.1", 9, Duration::from_millis(10));
        let mut receiver = listener.available.subscribe();

        listener.on_available();
        receiver.changed().await.unwrap();
        assert!(*receiver.borrow());

        listener.on_lost();
        receiver.changed().await.unwrap();
        assert!(!*receiver.borrow());
    }
}
