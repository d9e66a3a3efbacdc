//! The connection supervisor.
//!
//! [`Client`] owns authentication, one outer reconnect loop, and an inner
//! receive loop, and routes every inbound envelope to the dispatcher. The
//! split models the platform's own behaviour: sessions get invalidated
//! periodically, so the outer loop's job is "keep obtaining a session" and
//! the inner loop's job is "keep draining the one we have". A fresh
//! session is constructed per attempt; none is ever reused.

use crate::cache::EntityCache;
use crate::commands::help::help_command;
use crate::commands::{Command, CommandParser, CommandRegistry, CommandRouter};
use crate::config::ClientConfig;
use crate::convert::{DataConverter, JsonConverter};
use crate::error::{ClientError, CommandError, EventFailure, RegistryError, RestError};
use crate::events::{
    Dispatcher, ErrorLogger, EVENT_ERROR, EventHandler, ListenerTable, MESSAGE_CREATE,
};
use crate::gateway::{Connector, Session, WsConnector};
use crate::intents::Intents;
use crate::rest::{HttpRest, RestApi};
use driftwire_model::{Account, Guild, Id, User};
use parking_lot::{Mutex as SyncMutex, RwLock};
use rand::Rng;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::timeout;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Default REST endpoint of the hosted platform.
const DEFAULT_API_BASE: &str = "https://api.driftwire.dev/v1";

/// Capacity of the handler-failure report channel.
const FAILURE_CHANNEL_SIZE: usize = 256;

pub(crate) struct ClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) rest: Arc<dyn RestApi>,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) listeners: Arc<ListenerTable>,
    pub(crate) commands: Arc<CommandRegistry>,
    pub(crate) parser: CommandParser,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) cache: Arc<EntityCache>,
    token: RwLock<Option<Zeroizing<String>>>,
    account: RwLock<Option<Account>>,
    /// Login and session establishment are serialized through this lock
    /// so concurrent attempts cannot interleave.
    gate: Mutex<()>,
    closed: watch::Sender<bool>,
    /// Taken exactly once by the failure-drain task.
    failures: SyncMutex<Option<mpsc::Receiver<EventFailure>>>,
}

impl ClientInner {
    pub(crate) fn handle(inner: &Arc<ClientInner>) -> ClientHandle {
        ClientHandle {
            inner: Arc::downgrade(inner),
        }
    }
}

/// The client runtime: listener and command registries plus the
/// connection supervisor.
///
/// Multiple clients can coexist in one process; every registry is
/// instance-owned, never process-wide.
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Create a client with the default collaborators: reqwest REST,
    /// websocket gateway, serde converter.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(HttpRest::new(DEFAULT_API_BASE)),
            Arc::new(WsConnector),
            Arc::new(JsonConverter),
        )
    }

    /// Create a client over explicit collaborators. This is the seam
    /// integration tests and embedders use to substitute transports.
    pub fn with_collaborators(
        config: ClientConfig,
        rest: Arc<dyn RestApi>,
        connector: Arc<dyn Connector>,
        converter: Arc<dyn DataConverter>,
    ) -> Self {
        let listeners = Arc::new(ListenerTable::new());
        let commands = Arc::new(CommandRegistry::new(config.command.case_insensitive));
        let parser = CommandParser::new(config.command.prefix.clone());
        let cache = Arc::new(EntityCache::new());
        let (failure_tx, failure_rx) = mpsc::channel(FAILURE_CHANNEL_SIZE);
        let dispatcher = Dispatcher::new(
            listeners.clone(),
            converter,
            cache.clone(),
            failure_tx,
        );
        let (closed, _) = watch::channel(false);
        let install_help = config.command.help;

        let inner = Arc::new(ClientInner {
            config,
            rest,
            connector,
            listeners,
            commands,
            parser,
            dispatcher,
            cache,
            token: RwLock::new(None),
            account: RwLock::new(None),
            gate: Mutex::new(()),
            closed,
            failures: SyncMutex::new(Some(failure_rx)),
        });

        // Built-in defaults for the reserved events. Both are Async
        // handlers registered into empty sequences; registration cannot
        // fail here.
        let router = Arc::new(CommandRouter::new(Arc::downgrade(&inner)));
        inner
            .listeners
            .register(Some(MESSAGE_CREATE), router, false, false)
            .expect("built-in message_create handler is async");
        inner
            .listeners
            .register(Some(EVENT_ERROR), Arc::new(ErrorLogger), false, false)
            .expect("built-in event_error handler is async");

        if install_help {
            if let Ok(help) = help_command() {
                // First registration into an empty registry.
                inner
                    .commands
                    .register(help)
                    .expect("help command registers into an empty registry");
            }
        }

        Client { inner }
    }

    // ------------------------------------------------------------------
    // Registration surface
    // ------------------------------------------------------------------

    /// Register a persistent event handler. `event` defaults to the
    /// handler's declared identity; `overwrite` replaces the existing
    /// sequence (use it to supplant the built-in `message_create` or
    /// `event_error` behaviour).
    pub fn on(
        &self,
        event: Option<&str>,
        overwrite: bool,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), RegistryError> {
        self.inner.listeners.register(event, handler, false, overwrite)
    }

    /// Register a one-shot handler, delivered at most once.
    pub fn once(
        &self,
        event: Option<&str>,
        overwrite: bool,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), RegistryError> {
        self.inner.listeners.register(event, handler, true, overwrite)
    }

    /// Register a command. Duplicate plain names are a hard error.
    pub fn add_command(&self, command: Command) -> Result<Arc<Command>, CommandError> {
        self.inner.commands.register(command)
    }

    /// Remove a command by name; absent names are an error.
    pub fn remove_command(&self, name: &str) -> Result<Arc<Command>, CommandError> {
        self.inner.commands.unregister(name)
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// The authenticated account, once `login` has succeeded.
    pub fn account(&self) -> Option<Account> {
        self.inner.account.read().clone()
    }

    /// A user previously observed on the event stream.
    pub fn get_user(&self, id: Id) -> Option<User> {
        self.inner.cache.user(id)
    }

    /// A guild previously observed on the event stream.
    pub fn get_guild(&self, id: Id) -> Option<Guild> {
        self.inner.cache.guild(id)
    }

    /// A weak handle for use inside handlers and command bodies.
    pub fn handle(&self) -> ClientHandle {
        ClientInner::handle(&self.inner)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Authenticate against the REST layer and store the account info.
    /// Holds the exclusive gate so a concurrent `connect` cannot
    /// interleave with authentication.
    pub async fn login(&self, token: &str) -> Result<(), ClientError> {
        let _gate = self.inner.gate.lock().await;
        let account = self.inner.rest.login(token).await.map_err(|e| match e {
            RestError::Auth(_) => ClientError::Auth(e),
            other => ClientError::Rest(other),
        })?;
        info!(account = %account.username, "authenticated");
        *self.inner.token.write() = Some(Zeroizing::new(token.to_string()));
        *self.inner.account.write() = Some(account);
        Ok(())
    }

    /// Run the reconnect loop until `close` is called.
    ///
    /// Each iteration resolves the gateway address and opens a brand-new
    /// session under the exclusive gate, bounded by the configured
    /// connect timeout; failures are logged and retried after a backoff.
    /// A live session is drained by the inner receive loop until it
    /// ends, then the outer loop takes over again.
    pub async fn connect(&self) -> Result<(), ClientError> {
        // Validate capability flags before any network I/O: a malformed
        // set would otherwise fail silently deep in the protocol.
        let intents = Intents::from_bits(self.inner.config.intents)
            .ok_or(ClientError::InvalidIntents(self.inner.config.intents))?;
        let token = self
            .inner
            .token
            .read()
            .clone()
            .ok_or(ClientError::NotAuthenticated)?;

        self.spawn_failure_drain();

        let mut closed_rx = self.inner.closed.subscribe();
        while !*closed_rx.borrow() {
            let session = {
                let _gate = self.inner.gate.lock().await;
                let url = match self.inner.rest.gateway_url().await {
                    Ok(url) => url,
                    Err(e) => {
                        warn!(error = %e, "gateway resolution failed");
                        self.backoff(&mut closed_rx).await;
                        continue;
                    }
                };
                let attempt = self.inner.connector.connect(&url, &token, intents);
                let timeout_secs = self.inner.config.connection.connect_timeout_secs;
                match timeout(Duration::from_secs(timeout_secs), attempt).await {
                    Ok(Ok(session)) => session,
                    Ok(Err(e)) => {
                        warn!(error = %e, "connection attempt failed");
                        self.backoff(&mut closed_rx).await;
                        continue;
                    }
                    Err(_) => {
                        warn!(
                            timeout_secs,
                            "connection attempt timed out; abandoning session"
                        );
                        self.backoff(&mut closed_rx).await;
                        continue;
                    }
                }
            };

            info!("session established");
            self.receive_loop(session, &mut closed_rx).await;
        }
        Ok(())
    }

    /// Login then connect, closing on the way out. The usual entry point.
    pub async fn run(&self, token: &str) -> Result<(), ClientError> {
        self.login(token).await?;
        let result = self.connect().await;
        self.close().await;
        result
    }

    /// Set the terminal flag, close the REST layer, and let the loops
    /// exit at their next checkpoint. Already-scheduled handler tasks
    /// run to completion; nothing is force-cancelled.
    pub async fn close(&self) {
        if self.inner.closed.send_replace(true) {
            return; // already closed
        }
        self.inner.rest.close().await;
        info!("client closed");
    }

    /// Inner receive loop: drain one session until it ends or the client
    /// closes. The session is closed and dropped either way; reconnection
    /// is the outer loop's business.
    async fn receive_loop(
        &self,
        mut session: Box<dyn Session>,
        closed_rx: &mut watch::Receiver<bool>,
    ) {
        loop {
            let received = tokio::select! {
                _ = closed_rx.changed() => break,
                received = session.next_envelope() => received,
            };
            match received {
                Ok(Some(envelope)) => {
                    if let Err(e) = self.inner.dispatcher.dispatch(envelope) {
                        // Malformed payload: drop this event, keep the session.
                        warn!(error = %e, "payload conversion failed; event dropped");
                    }
                }
                Ok(None) => {
                    // Remote already closed the stream.
                    info!("session ended");
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "session error; dropping session");
                    break;
                }
            }
        }
        if let Err(e) = session.close().await {
            warn!(error = %e, "session close failed");
        }
    }

    /// Start the failure-drain task on first connect: handler failures
    /// arrive on the channel and are re-dispatched as `event_error`.
    ///
    /// There is deliberately no recursion guard: an `event_error` handler
    /// that itself fails is reported through the same channel, exactly as
    /// the dispatch contract documents.
    fn spawn_failure_drain(&self) {
        let Some(mut rx) = self.inner.failures.lock().take() else {
            return; // already running
        };
        let weak: Weak<ClientInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            while let Some(failure) = rx.recv().await {
                match weak.upgrade() {
                    Some(inner) => inner.dispatcher.dispatch_failure(Arc::new(failure)),
                    None => break,
                }
            }
        });
    }

    /// Sleep between reconnect attempts, with jitter, unless the client
    /// closes first.
    async fn backoff(&self, closed_rx: &mut watch::Receiver<bool>) {
        let conn = &self.inner.config.connection;
        let jitter = if conn.reconnect_jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..conn.reconnect_jitter_ms)
        };
        let delay = Duration::from_millis(conn.reconnect_delay_ms + jitter);
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = closed_rx.changed() => {}
        }
    }
}

/// Weak back-reference to a [`Client`], cheap to clone into handlers and
/// command contexts. Calls fail with [`ClientError::Closed`] once the
/// client is gone.
#[derive(Clone)]
pub struct ClientHandle {
    inner: Weak<ClientInner>,
}

impl ClientHandle {
    fn upgrade(&self) -> Result<Arc<ClientInner>, ClientError> {
        self.inner.upgrade().ok_or(ClientError::Closed)
    }

    /// Post a message to a channel through the REST layer.
    pub async fn send_message(&self, channel: Id, content: &str) -> Result<(), ClientError> {
        let inner = self.upgrade()?;
        inner
            .rest
            .send_message(channel, content)
            .await
            .map_err(ClientError::Rest)
    }

    /// The authenticated account, if available.
    pub fn account(&self) -> Option<Account> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.account.read().clone())
    }

    /// A user previously observed on the event stream.
    pub fn get_user(&self, id: Id) -> Option<User> {
        self.inner.upgrade().and_then(|inner| inner.cache.user(id))
    }

    /// A guild previously observed on the event stream.
    pub fn get_guild(&self, id: Id) -> Option<Guild> {
        self.inner.upgrade().and_then(|inner| inner.cache.guild(id))
    }

    /// All registered commands, for help listings.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.inner
            .upgrade()
            .map(|inner| inner.commands.all())
            .unwrap_or_default()
    }
}
