//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::net::TcpListener;
use travel_relay::upstream::{ObjectStore, StoredObject, UpstreamError};
use travel_relay::{HttpServer, RelayConfig, Shutdown, Upstreams};

pub const SERPAPI_KEY: &str = "serp-secret";
pub const MAPS_KEY: &str = "maps-secret";
pub const OPENAI_KEY: &str = "openai-secret";

/// Configuration with every provider pointed at `mock_uri`.
pub fn test_config(mock_uri: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.providers.serpapi.api_key = SERPAPI_KEY.into();
    config.providers.serpapi.base_url = mock_uri.into();
    config.providers.google_maps.api_key = MAPS_KEY.into();
    config.providers.google_maps.base_url = mock_uri.into();
    config.providers.openai.api_key = OPENAI_KEY.into();
    config.providers.openai.base_url = mock_uri.into();
    config
}

/// Object store that keeps every write in memory.
#[derive(Default)]
pub struct RecordingStore {
    pub puts: Mutex<Vec<StoredObject>>,
}

impl RecordingStore {
    pub fn puts(&self) -> Vec<StoredObject> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put(&self, object: StoredObject) -> Result<String, UpstreamError> {
        let url = format!("https://test-bucket.s3.us-east-1.amazonaws.com/{}", object.key);
        self.puts.lock().unwrap().push(object);
        Ok(url)
    }
}

/// A started relay.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestRelay {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the relay on an ephemeral port.
pub async fn start_relay(config: RelayConfig, store: Option<Arc<dyn ObjectStore>>) -> TestRelay {
    let upstreams = Upstreams::new(&config, store).unwrap();
    let server = HttpServer::new(config, upstreams);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestRelay { addr, shutdown }
}

/// Client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
