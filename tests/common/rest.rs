//! In-process REST fake. Records outbound calls for assertions.

use async_trait::async_trait;
use driftwire::error::RestError;
use driftwire::rest::RestApi;
use driftwire::{Account, Id};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub struct FakeRest {
    /// When set, `login` rejects every token.
    pub reject_login: AtomicBool,
    /// Number of gateway address resolutions.
    pub gateway_calls: AtomicUsize,
    /// Every message posted through `send_message`.
    pub sent: Mutex<Vec<(Id, String)>>,
    /// Whether `close` was called.
    pub closed: AtomicBool,
}

impl FakeRest {
    pub fn new() -> Self {
        FakeRest {
            reject_login: AtomicBool::new(false),
            gateway_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    #[allow(dead_code)]
    pub fn sent_messages(&self) -> Vec<(Id, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl RestApi for FakeRest {
    async fn login(&self, _token: &str) -> Result<Account, RestError> {
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(RestError::Auth("invalid token".to_string()));
        }
        Ok(Account {
            id: Id(1),
            username: "driftbot".to_string(),
            bot: true,
        })
    }

    async fn gateway_url(&self) -> Result<String, RestError> {
        self.gateway_calls.fetch_add(1, Ordering::SeqCst);
        Ok("fake://gateway".to_string())
    }

    async fn send_message(&self, channel: Id, content: &str) -> Result<(), RestError> {
        self.sent.lock().push((channel, content.to_string()));
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
