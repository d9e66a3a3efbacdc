//! Scripted gateway fake. Each connection attempt consumes one script.

use async_trait::async_trait;
use driftwire::error::GatewayError;
use driftwire::gateway::{Connector, Session};
use driftwire::{Envelope, Intents};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// What one connection attempt should do.
pub enum SessionScript {
    /// Fail the attempt outright.
    #[allow(dead_code)]
    Refuse,
    /// Deliver these envelopes, then end the session cleanly.
    #[allow(dead_code)]
    Deliver(Vec<Envelope>),
    /// Deliver these envelopes, then stay open until the client closes.
    #[allow(dead_code)]
    Hold(Vec<Envelope>),
    /// Deliver these envelopes, then break with a session error.
    #[allow(dead_code)]
    Fail(Vec<Envelope>),
}

pub struct FakeConnector {
    scripts: Mutex<VecDeque<SessionScript>>,
    attempts: AtomicUsize,
    session_closes: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn new(scripts: Vec<SessionScript>) -> Self {
        FakeConnector {
            scripts: Mutex::new(scripts.into_iter().collect()),
            attempts: AtomicUsize::new(0),
            session_closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Connection attempts observed so far.
    #[allow(dead_code)]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// `Session::close` calls observed across all handed-out sessions.
    #[allow(dead_code)]
    pub fn session_closes(&self) -> usize {
        self.session_closes.load(Ordering::SeqCst)
    }

    fn session(&self, frames: Vec<Envelope>, end: SessionEnd) -> Box<dyn Session> {
        Box::new(FakeSession {
            frames: frames.into(),
            end,
            closes: self.session_closes.clone(),
        })
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(
        &self,
        _url: &str,
        _token: &str,
        _intents: Intents,
    ) -> Result<Box<dyn Session>, GatewayError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.scripts.lock().pop_front() {
            Some(SessionScript::Deliver(frames)) => Ok(self.session(frames, SessionEnd::Clean)),
            Some(SessionScript::Hold(frames)) => Ok(self.session(frames, SessionEnd::Hold)),
            Some(SessionScript::Fail(frames)) => Ok(self.session(frames, SessionEnd::Error)),
            Some(SessionScript::Refuse) | None => {
                Err(GatewayError::Connect("scripted refusal".to_string()))
            }
        }
    }
}

enum SessionEnd {
    Clean,
    Hold,
    Error,
}

struct FakeSession {
    frames: VecDeque<Envelope>,
    end: SessionEnd,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl Session for FakeSession {
    async fn next_envelope(&mut self) -> Result<Option<Envelope>, GatewayError> {
        if let Some(frame) = self.frames.pop_front() {
            // Yield first so handlers spawned for the previous envelope run.
            tokio::task::yield_now().await;
            return Ok(Some(frame));
        }
        match self.end {
            SessionEnd::Clean => Ok(None),
            SessionEnd::Error => Err(GatewayError::Protocol("scripted breakage".to_string())),
            SessionEnd::Hold => {
                std::future::pending::<()>().await;
                Ok(None)
            }
        }
    }

    async fn close(&mut self) -> Result<(), GatewayError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.frames.clear();
        Ok(())
    }
}
