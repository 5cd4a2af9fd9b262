//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::net::TcpListener;

use consultation_server::config::ServerConfig;
use consultation_server::http::HttpServer;
use consultation_server::lifecycle::Shutdown;
use consultation_server::mail::{MailError, MailTransport};
use consultation_server::submission::Submission;

/// Transport fake that records every dispatch instead of sending.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Submission>>,
    failure: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A transport whose every send fails with the given diagnostic.
    #[allow(dead_code)]
    pub fn failing(detail: &str) -> Arc<Self> {
        let transport = Self::default();
        *transport.failure.lock().unwrap() = Some(detail.to_string());
        Arc::new(transport)
    }

    /// Everything dispatched so far, in order.
    pub fn sent(&self) -> Vec<Submission> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, submission: &Submission) -> Result<(), MailError> {
        if let Some(detail) = self.failure.lock().unwrap().clone() {
            return Err(MailError::Send(detail));
        }
        self.sent.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

/// Spawn a server on an ephemeral port with the given transport.
pub async fn spawn_server(
    config: ServerConfig,
    transport: Arc<dyn MailTransport>,
) -> (SocketAddr, Shutdown) {
    spawn(HttpServer::with_transport(config, transport)).await
}

/// Spawn a server that dispatches through the real SMTP mailer.
///
/// With missing or malformed credentials the mailer fails before any
/// connection is opened, so these tests never touch the network.
#[allow(dead_code)]
pub async fn spawn_server_with_real_mailer(config: ServerConfig) -> (SocketAddr, Shutdown) {
    spawn(HttpServer::new(config)).await
}

async fn spawn(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}

/// A complete, valid consultation payload.
#[allow(dead_code)]
pub fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+974 5512 3456"
    })
}

/// HTTP client that ignores any proxy configured in the environment.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// URL of the consultation endpoint on a spawned server.
#[allow(dead_code)]
pub fn api_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/consultation")
}
