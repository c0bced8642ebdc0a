//! `MatchroomServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → registry.

use std::sync::Arc;
use std::time::Duration;

use matchroom_protocol::{Codec, JsonCodec};
use matchroom_room::{IdGenerator, NoSessions, RoomRegistry, SessionCreator};
use matchroom_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{MatchroomError, ServerConfig};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<S: SessionCreator, C: Codec> {
    pub(crate) registry: Arc<RoomRegistry<S>>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a Matchroom server.
///
/// # Example
///
/// ```rust,no_run
/// use matchroom::prelude::*;
///
/// # async fn run() -> Result<(), MatchroomError> {
/// let server = MatchroomServerBuilder::new()
///     .bind("127.0.0.1:9090")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct MatchroomServerBuilder<S: SessionCreator = NoSessions> {
    bind_addr: String,
    idle_timeout: Duration,
    registry: RoomRegistry<S>,
    generator: Option<Box<dyn IdGenerator>>,
}

impl MatchroomServerBuilder<NoSessions> {
    /// Creates a new builder with default settings and a registry that
    /// has no session backend.
    pub fn new() -> Self {
        let defaults = ServerConfig::default();
        Self {
            bind_addr: defaults.bind_addr,
            idle_timeout: defaults.idle_timeout,
            registry: RoomRegistry::new(),
            generator: None,
        }
    }
}

impl Default for MatchroomServerBuilder<NoSessions> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SessionCreator> MatchroomServerBuilder<S> {
    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets how long a silent client connection is kept open.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Applies the listener settings from a [`ServerConfig`].
    ///
    /// The session backend is not part of this; wire it up with
    /// [`session_creator`](Self::session_creator).
    pub fn config(self, config: &ServerConfig) -> Self {
        self.bind(&config.bind_addr).idle_timeout(config.idle_timeout)
    }

    /// Serves requests from `registry`.
    ///
    /// A generator set with [`id_generator`](Self::id_generator) still
    /// replaces the registry's own at build time.
    pub fn registry<T: SessionCreator>(
        self,
        registry: RoomRegistry<T>,
    ) -> MatchroomServerBuilder<T> {
        MatchroomServerBuilder {
            bind_addr: self.bind_addr,
            idle_timeout: self.idle_timeout,
            registry,
            generator: self.generator,
        }
    }

    /// Starts from a fresh registry that hands filled rooms to `creator`.
    pub fn session_creator<T: SessionCreator>(
        self,
        creator: T,
    ) -> MatchroomServerBuilder<T> {
        self.registry(RoomRegistry::with_session_creator(creator))
    }

    /// Sets the room id generator the registry will use.
    pub fn id_generator(mut self, generator: impl IdGenerator) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Binds the listener.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<MatchroomServer<S, JsonCodec>, MatchroomError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let registry = match self.generator {
            Some(generator) => self.registry.with_generator(generator),
            None => self.registry,
        };
        let state = Arc::new(ServerState {
            registry: Arc::new(registry),
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
        });

        Ok(MatchroomServer { transport, state })
    }
}

/// A bound Matchroom server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct MatchroomServer<S: SessionCreator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<S, C>>,
}

impl MatchroomServer<NoSessions, JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> MatchroomServerBuilder {
        MatchroomServerBuilder::new()
    }
}

impl<S, C> MatchroomServer<S, C>
where
    S: SessionCreator,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns the registry this server dispatches into.
    pub fn registry(&self) -> Arc<RoomRegistry<S>> {
        Arc::clone(&self.state.registry)
    }

    /// Runs the accept loop until the process is terminated.
    ///
    /// Every accepted connection gets its own task; requests from
    /// different connections reach the registry in parallel.
    pub async fn run(mut self) -> Result<(), MatchroomError> {
        tracing::info!(
            addr = ?self.transport.local_addr().ok(),
            sessions = self.state.registry.has_session_creator(),
            "Matchroom server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
