use std::result::Result as StdResult;

use async_trait::async_trait;
use meow_protocol::Method;
use serde_json::Value;

/// Transport used by the [`Gateway`](crate::Gateway) to reach the backend.
///
/// Implementations perform exactly one remote call per `invoke` and report the
/// backend's failure text verbatim; timeouts are the gateway's concern.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Invoke `method` with JSON `args` and return the JSON result.
    async fn invoke(&self, method: Method, args: Value) -> StdResult<Value, String>;
}
