//! Local JWKS endpoint and key fixtures for provider tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jwtv::{EcCurve, EcPrivateKey, Header, Jwk, Jwt, KeyMaterial, Payload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

/// Minimal HTTP/1.1 server answering every request with the configured reply
pub struct JwksServer {
    url: String,
    reply: Arc<Mutex<Reply>>,
    hits: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl JwksServer {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("http://{}/.well-known/jwks.json", listener.local_addr().expect("addr"));
        let reply = Arc::new(Mutex::new(Reply {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }));
        let hits = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn({
            let reply = reply.clone();
            let hits = hits.clone();
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    hits.fetch_add(1, Ordering::SeqCst);
                    let reply = reply.lock().expect("reply lock").clone();
                    tokio::spawn(respond(stream, reply));
                }
            }
        });
        Self { url, reply, hits, task }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn set(&self, status: u16, body: impl Into<String>) {
        let mut reply = self.reply.lock().expect("reply lock");
        reply.status = status;
        reply.body = body.into();
    }

    pub fn set_delay(&self, delay: Duration) {
        self.reply.lock().expect("reply lock").delay = delay;
    }
}

impl Drop for JwksServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn respond(mut stream: TcpStream, reply: Reply) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    tokio::time::sleep(reply.delay).await;
    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Deterministic P-256 signing key derived from `seed`
pub fn ec_key(seed: u8) -> KeyMaterial {
    let scalar = [seed; 32];
    KeyMaterial::EcPrivate(EcPrivateKey::from_scalar(EcCurve::P256, &scalar).expect("valid scalar"))
}

/// Public JWK of `key` under `kid`
pub fn public_jwk(key: &KeyMaterial, kid: &str) -> Jwk {
    let mut jwk = Jwk::from_key_material(&key.to_public(), &[]).expect("encodes");
    jwk.kid = (!kid.is_empty()).then(|| kid.to_string());
    jwk.alg = Some("ES256".into());
    jwk
}

/// JWKS document holding `jwks`
pub fn jwks_document(jwks: &[Jwk]) -> String {
    serde_json::json!({ "keys": jwks }).to_string()
}

/// ES256 token signed by `key` naming `kid`
pub fn token(key: &KeyMaterial, kid: &str) -> Jwt {
    let mut header = Header::new("ES256");
    header.add("kid", kid);
    let mut payload = Payload::new();
    payload.add("sub", "provider-test");
    let mut token = Jwt::from_segments(header, payload);
    token.sign(key).expect("signs");
    token
}
