//! Local fake WHOIS server for transport tests.
//!
//! One listener on `0.0.0.0` answers for every loopback address, so tests can
//! model distinct registries as `127.0.0.1`, `127.0.0.2`, ... on one port.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use whois_orchestrator_transport::TransportConfig;

/// What the fake server does with one query.
pub enum Reply {
    Text(String),
    /// Accept, read the query, never answer.
    Hang,
}

pub fn text(s: &str) -> Reply {
    Reply::Text(s.to_string())
}

pub struct FakeWhoisServer {
    pub port: u16,
    queries: Arc<Mutex<Vec<(IpAddr, String)>>>,
}

impl FakeWhoisServer {
    /// Start a server; `handler` receives the local address the client dialed and the query line.
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(IpAddr, &str) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("0.0.0.0:0")
            .await
            .expect("bind fake whois server");
        let port = listener.local_addr().expect("local addr").port();
        let queries = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let log = Arc::clone(&queries);
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let handler = Arc::clone(&handler);
                let log = Arc::clone(&log);
                tokio::spawn(async move {
                    let local = socket.local_addr().expect("local addr").ip();
                    let mut reader = BufReader::new(socket);
                    let mut line = String::new();
                    if reader.read_line(&mut line).await.is_err() {
                        return;
                    }
                    let query = line.trim_end_matches(['\r', '\n']).to_string();
                    log.lock().unwrap().push((local, query.clone()));

                    match handler(local, &query) {
                        Reply::Text(body) => {
                            let mut socket = reader.into_inner();
                            let _ = socket.write_all(body.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        Reply::Hang => {
                            tokio::time::sleep(Duration::from_secs(3600)).await;
                        }
                    }
                });
            }
        });

        Self { port, queries }
    }

    /// Transport configuration pointing the root server at `127.0.0.1` on this port.
    pub fn config(&self) -> TransportConfig {
        TransportConfig {
            root_server: "127.0.0.1".to_string(),
            port: self.port,
            ..TransportConfig::default()
        }
    }

    /// Queries received so far, as `(dialed address, query line)`.
    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(ip, q)| (ip.to_string(), q.clone()))
            .collect()
    }
}
