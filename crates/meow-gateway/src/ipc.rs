//! MRPC transport to the backend process.

use std::{result::Result as StdResult, sync::Arc, time::Duration};

use async_trait::async_trait;
use meow_protocol::{BackendEvent, Method};
use mrpc::{Client as MrpcClient, Connection as MrpcConnection, RpcError, RpcSender, Value};
use serde_json::Value as JsonValue;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    time::{sleep, timeout},
};
use tracing::{debug, error, info, trace, warn};

use crate::{Backend, Error};

// Connection timing constants
const CONNECT_TIMEOUT_SECS: u64 = 5;
const CONNECT_MAX_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY_MS: u64 = 200;

/// Receiver for events pushed by the backend.
pub type EventRx = UnboundedReceiver<BackendEvent>;

/// Backend reached over msgpack-RPC on a unix socket.
///
/// Request arguments and replies travel as a single msgpack binary param,
/// encoded from/to JSON values.
pub struct MrpcBackend {
    /// MRPC client. Requests carry their own msgid, so concurrent calls
    /// share the connection without waiting on one another.
    client: MrpcClient<ClientHandler>,
}

impl MrpcBackend {
    /// Connect once and return the backend plus its event stream.
    pub async fn connect_unix(socket_path: &str) -> Result<(Self, EventRx), Error> {
        debug!("Connecting to MRPC backend at: {}", socket_path);

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let handler = ClientHandler {
            event_tx: Arc::new(event_tx),
        };

        let client = MrpcClient::connect_unix(socket_path, handler)
            .await
            .map_err(|e| Error::Ipc(format!("Failed to connect: {}", e)))?;

        info!("backend connected");
        Ok((
            Self { client },
            event_rx,
        ))
    }

    /// Connect with a bounded number of attempts, each under a timeout.
    pub async fn connect_with_retries(socket_path: &str) -> Result<(Self, EventRx), Error> {
        let mut last_error = None;
        for attempt in 1..=CONNECT_MAX_ATTEMPTS {
            debug!("Connection attempt {}/{}", attempt, CONNECT_MAX_ATTEMPTS);
            let res = timeout(
                Duration::from_secs(CONNECT_TIMEOUT_SECS),
                Self::connect_unix(socket_path),
            )
            .await;
            match res {
                Ok(Ok(conn)) => return Ok(conn),
                Ok(Err(e)) => {
                    warn!("Connection attempt {} failed: {}", attempt, e);
                    last_error = Some(e);
                }
                Err(_) => {
                    warn!("Connection attempt {} timed out", attempt);
                    last_error = Some(Error::Ipc(format!(
                        "Connection timeout after {:?}",
                        Duration::from_secs(CONNECT_TIMEOUT_SECS)
                    )));
                }
            }
            if attempt < CONNECT_MAX_ATTEMPTS {
                sleep(Duration::from_millis(CONNECT_RETRY_DELAY_MS)).await;
            }
        }
        Err(last_error
            .unwrap_or_else(|| Error::Ipc("Failed to connect after all retry attempts".into())))
    }
}

#[async_trait]
impl Backend for MrpcBackend {
    async fn invoke(&self, method: Method, args: JsonValue) -> StdResult<JsonValue, String> {
        let param = enc_args(&args).map_err(|e| e.to_string())?;
        let reply = self
            .client
            .send_request(method.as_str(), &[param])
            .await
            .map_err(|e| format!("{} request failed: {}", method.as_str(), e))?;
        dec_reply(reply).map_err(|e| e.to_string())
    }
}

/// Client-side connection handler for receiving backend events.
#[derive(Clone)]
struct ClientHandler {
    /// Sink for decoded backend events.
    event_tx: Arc<UnboundedSender<BackendEvent>>,
}

#[async_trait]
impl MrpcConnection for ClientHandler {
    async fn connected(&self, _client: RpcSender) -> StdResult<(), RpcError> {
        trace!("Client handler connected");
        Ok(())
    }

    async fn handle_request(
        &self,
        _client: RpcSender,
        method: &str,
        _params: Vec<Value>,
    ) -> StdResult<Value, RpcError> {
        error!("Unexpected request from backend: {}", method);
        Err(RpcError::Service(mrpc::ServiceError {
            name: "not_implemented".into(),
            value: Value::String("Client doesn't handle requests".into()),
        }))
    }

    async fn handle_notification(
        &self,
        _client: RpcSender,
        method: &str,
        params: Vec<Value>,
    ) -> StdResult<(), RpcError> {
        trace!("Received notification: {}", method);

        let payload = match params.first() {
            Some(Value::String(s)) => s.as_str().unwrap_or_default().to_string(),
            Some(other) => {
                error!("Unexpected payload for {}: {:?}", method, other);
                return Ok(());
            }
            None => String::new(),
        };

        match BackendEvent::from_wire(method, payload) {
            Some(event) => {
                if let Err(err) = self.event_tx.send(event) {
                    if self.event_tx.is_closed() {
                        debug!("Dropping event: receiver already closed");
                    } else {
                        error!("Failed to send event to channel: {}", err);
                    }
                }
            }
            None => debug!("Ignoring unknown backend event: {}", method),
        }
        Ok(())
    }
}

/// Encode request args as msgpack binary.
pub(crate) fn enc_args(args: &JsonValue) -> Result<Value, Error> {
    let bytes = rmp_serde::to_vec_named(args)?;
    Ok(Value::Binary(bytes))
}

/// Decode a reply value into JSON.
pub(crate) fn dec_reply(v: Value) -> Result<JsonValue, Error> {
    match v {
        Value::Binary(bytes) => Ok(rmp_serde::from_slice::<JsonValue>(&bytes)?),
        Value::Nil => Ok(JsonValue::Null),
        Value::Boolean(b) => Ok(JsonValue::Bool(b)),
        other => Err(Error::Ipc(format!("Unexpected reply: {:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use mrpc::Server as MrpcServer;
    use serde_json::json;

    use super::*;

    fn sock_path(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("meow-gateway-test-{}", std::process::id()));
        let _ = fs::create_dir_all(&p);
        p.push(name);
        let _ = fs::remove_file(&p);
        p
    }

    /// Answers `search_memes` slowly and everything else at once.
    #[derive(Clone)]
    struct SlowSearch;

    #[async_trait]
    impl MrpcConnection for SlowSearch {
        async fn handle_request(
            &self,
            _client: RpcSender,
            method: &str,
            _params: Vec<Value>,
        ) -> StdResult<Value, RpcError> {
            if method == Method::SearchMemes.as_str() {
                sleep(Duration::from_millis(1500)).await;
                return Ok(enc_args(&json!([])).expect("encode"));
            }
            Ok(enc_args(&json!({ "copy_to_clipboard": true })).expect("encode"))
        }
    }

    #[tokio::test]
    async fn slow_request_does_not_delay_others() {
        let path = sock_path("slow.sock");
        let server = MrpcServer::from_fn(|| SlowSearch)
            .unix(&path)
            .await
            .expect("bind");
        let server_task = tokio::spawn(server.run());

        let (backend, _events) = MrpcBackend::connect_with_retries(path.to_str().expect("utf8"))
            .await
            .expect("connect");
        let backend = Arc::new(backend);

        let slow = {
            let backend = backend.clone();
            tokio::spawn(async move {
                backend
                    .invoke(Method::SearchMemes, json!({ "keyword": "cat" }))
                    .await
            })
        };
        sleep(Duration::from_millis(100)).await;

        let fast = timeout(
            Duration::from_millis(500),
            backend.invoke(Method::GetUserPreferences, JsonValue::Null),
        )
        .await
        .expect("fast request waited behind the slow one")
        .expect("reply");
        assert_eq!(fast, json!({ "copy_to_clipboard": true }));
        assert!(!slow.is_finished());

        assert_eq!(slow.await.expect("join").expect("reply"), json!([]));
        server_task.abort();
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn args_roundtrip_through_msgpack() {
        let args = json!({ "shortcuts": { "toggle_app": { "modifiers": ["ctrl"], "key": "v" } } });
        let encoded = enc_args(&args).expect("encode");
        assert_eq!(dec_reply(encoded).expect("decode"), args);
    }

    #[test]
    fn ack_replies() {
        assert_eq!(dec_reply(Value::Nil).expect("nil"), JsonValue::Null);
        assert_eq!(
            dec_reply(Value::Boolean(true)).expect("bool"),
            JsonValue::Bool(true)
        );
        assert!(dec_reply(Value::F64(1.5)).is_err());
    }
}
