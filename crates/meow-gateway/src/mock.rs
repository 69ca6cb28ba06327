//! Scripted in-process backend for tests.

use std::{
    collections::{HashMap, VecDeque},
    result::Result as StdResult,
    time::Duration,
};

use async_trait::async_trait;
use meow_protocol::Method;
use parking_lot::Mutex;
use serde_json::Value;

use crate::Backend;

/// Scripted outcome of one invocation.
#[derive(Clone, Debug)]
pub enum Reply {
    /// Succeed with the given payload.
    Ok(Value),
    /// Fail with the given backend message.
    Err(String),
}

/// A reply plus the simulated backend latency.
#[derive(Clone, Debug)]
struct Script {
    /// Outcome.
    reply: Reply,
    /// Delay before the outcome is produced.
    delay: Duration,
}

/// In-process [`Backend`] with per-method scripted replies.
///
/// One-shot replies queued with [`reply_once`](Self::reply_once) are consumed
/// first, then the sticky reply set with [`reply`](Self::reply); unscripted
/// methods succeed with `null`.
#[derive(Default)]
pub struct MockBackend {
    /// Sticky replies.
    sticky: Mutex<HashMap<Method, Script>>,
    /// Queued one-shot replies.
    once: Mutex<HashMap<Method, VecDeque<Script>>>,
    /// Every invocation in arrival order.
    calls: Mutex<Vec<(Method, Value)>>,
    /// Invocations that ran to completion (including replies nobody awaited).
    completed: Mutex<Vec<Method>>,
}

impl MockBackend {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `method` with `reply`.
    pub fn reply(&self, method: Method, reply: Reply) -> &Self {
        self.reply_after(method, reply, Duration::ZERO)
    }

    /// Always answer `method` with `reply` after `delay`.
    pub fn reply_after(&self, method: Method, reply: Reply, delay: Duration) -> &Self {
        self.sticky.lock().insert(method, Script { reply, delay });
        self
    }

    /// Answer the next call to `method` with `reply`.
    pub fn reply_once(&self, method: Method, reply: Reply) -> &Self {
        self.once
            .lock()
            .entry(method)
            .or_default()
            .push_back(Script {
                reply,
                delay: Duration::ZERO,
            });
        self
    }

    /// Shorthand for a sticky failure.
    pub fn fail(&self, method: Method, cause: &str) -> &Self {
        self.reply(method, Reply::Err(cause.to_string()))
    }

    /// Snapshot of every invocation so far.
    pub fn calls(&self) -> Vec<(Method, Value)> {
        self.calls.lock().clone()
    }

    /// Arguments of every invocation of `method`.
    pub fn calls_to(&self, method: Method) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|(m, _)| *m == method)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Number of invocations of `method`.
    pub fn count(&self, method: Method) -> usize {
        self.calls.lock().iter().filter(|(m, _)| *m == method).count()
    }

    /// Number of invocations of `method` that produced their reply.
    pub fn completed(&self, method: Method) -> usize {
        self.completed.lock().iter().filter(|m| **m == method).count()
    }

    /// Pick the script for the next call to `method`.
    fn next_script(&self, method: Method) -> Script {
        if let Some(s) = self.once.lock().get_mut(&method).and_then(VecDeque::pop_front) {
            return s;
        }
        self.sticky
            .lock()
            .get(&method)
            .cloned()
            .unwrap_or(Script {
                reply: Reply::Ok(Value::Null),
                delay: Duration::ZERO,
            })
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn invoke(&self, method: Method, args: Value) -> StdResult<Value, String> {
        self.calls.lock().push((method, args));
        let script = self.next_script(method);
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        self.completed.lock().push(method);
        match script.reply {
            Reply::Ok(v) => Ok(v),
            Reply::Err(e) => Err(e),
        }
    }
}
