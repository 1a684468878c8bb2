//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::primitives::{keccak256, Bytes, U256};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Hardhat/Anvil account #0.
#[allow(dead_code)]
pub const OPERATOR_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[allow(dead_code)]
pub const TOKEN_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Chain state served by [`MockNode`].
#[derive(Debug)]
pub struct NodeState {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub balance: U256,
    /// Methods that answer with a JSON-RPC error.
    pub failing: Vec<&'static str>,
    pub raw_transactions: Vec<Bytes>,
    pub calls: Vec<Bytes>,
}

impl Default for NodeState {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            nonce: 0,
            gas_price: 20_000_000_000,
            balance: U256::ZERO,
            failing: Vec::new(),
            raw_transactions: Vec::new(),
            calls: Vec::new(),
        }
    }
}

/// A minimal JSON-RPC node over HTTP/1.1.
///
/// Accepted raw transactions bump the pending nonce, like a real node.
#[derive(Clone)]
pub struct MockNode {
    pub addr: SocketAddr,
    state: Arc<Mutex<NodeState>>,
}

#[allow(dead_code)]
impl MockNode {
    pub async fn start(state: NodeState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(state));

        let shared = state.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((socket, _)) => {
                        let state = shared.clone();
                        tokio::spawn(async move {
                            let _ = serve(socket, state).await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn raw_transactions(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().raw_transactions.clone()
    }

    pub fn calls(&self) -> Vec<Bytes> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn nonce(&self) -> u64 {
        self.state.lock().unwrap().nonce
    }
}

async fn serve(mut socket: TcpStream, state: Arc<Mutex<NodeState>>) -> std::io::Result<()> {
    let body = read_request(&mut socket).await?;
    let request: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let response = handle(&request, &state).to_string();

    let response_str = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.len(),
        response
    );
    socket.write_all(response_str.as_bytes()).await?;
    socket.shutdown().await
}

/// Read one request and return its body.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Vec::new());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(buf[header_end..].to_vec())
}

fn handle(request: &Value, state: &Mutex<NodeState>) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default();
    let params = request.get("params").cloned().unwrap_or(Value::Null);

    let mut state = state.lock().unwrap();
    if state.failing.iter().any(|failing| *failing == method) {
        return json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": format!("{} unavailable", method) }
        });
    }

    let result = match method {
        "eth_chainId" => json!(format!("{:#x}", state.chain_id)),
        "eth_getTransactionCount" => json!(format!("{:#x}", state.nonce)),
        "eth_gasPrice" => json!(format!("{:#x}", state.gas_price)),
        "eth_call" => {
            let input = params[0]
                .get("input")
                .or_else(|| params[0].get("data"))
                .and_then(Value::as_str)
                .unwrap_or("0x");
            state.calls.push(decode_hex(input));
            json!(alloy::hex::encode_prefixed(state.balance.to_be_bytes::<32>()))
        }
        "eth_sendRawTransaction" => {
            let raw = decode_hex(params[0].as_str().unwrap_or("0x"));
            let hash = keccak256(&raw);
            state.raw_transactions.push(raw);
            state.nonce += 1;
            json!(hash)
        }
        other => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method not found: {}", other) }
            })
        }
    };

    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn decode_hex(s: &str) -> Bytes {
    Bytes::from(alloy::hex::decode(s).unwrap_or_default())
}
