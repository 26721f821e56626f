//! The connection-level interceptor.

use std::sync::Arc;

use crate::{
    handler::{AuthResponse, Challenge, NetworkHandler},
    report::Reporter,
    Config, Connection, InvalidConfig,
};

/// The policy enforcement wrapper around a backend [`NetworkHandler`].
///
/// It takes no decision of its own: authentication, handshake and
/// disconnect events are forwarded untouched, and a successful handshake
/// yields a [`Connection`] enforcing the shared [`Config`] on the
/// authenticated backend connection.
#[derive(Debug)]
pub struct Network<B, R = ()> {
    config: Arc<Config>,
    backend: B,
    reporter: R,
}

impl<B> Network<B> {
    /// Create a [`Network`] enforcing `config` in front of `backend`,
    /// failing right away when the configuration is invalid.
    pub fn new(config: Config, backend: B) -> Result<Self, InvalidConfig> {
        config.validate()?;

        Ok(Self {
            config: Arc::new(config),
            backend,
            reporter: (),
        })
    }
}

impl<B, R> Network<B, R> {
    /// Set the observability sink receiving policy [`Event`](crate::report::Event)s.
    pub fn reporter(self, reporter: impl Reporter + Clone) -> Network<B, impl Reporter + Clone> {
        let Self {
            config,
            backend,
            reporter: _,
        } = self;

        Network {
            config,
            backend,
            reporter,
        }
    }
}

impl<B: NetworkHandler, R: Reporter + Clone> NetworkHandler for Network<B, R> {
    type Connection = Connection<B::Connection, R>;
    type Err = B::Err;

    fn on_auth_password(
        &mut self,
        username: &str,
        password: &[u8],
    ) -> Result<AuthResponse, Self::Err> {
        self.backend.on_auth_password(username, password)
    }

    fn on_auth_publickey(
        &mut self,
        username: &str,
        public_key: &str,
    ) -> Result<AuthResponse, Self::Err> {
        self.backend.on_auth_publickey(username, public_key)
    }

    fn on_auth_keyboard_interactive(
        &mut self,
        username: &str,
        challenge: Challenge<'_>,
    ) -> Result<AuthResponse, Self::Err> {
        self.backend.on_auth_keyboard_interactive(username, challenge)
    }

    fn on_handshake_failed(&mut self, error: &(dyn std::error::Error + Send + Sync)) {
        self.backend.on_handshake_failed(error)
    }

    fn on_handshake_success(&mut self, username: &str) -> Result<Self::Connection, Self::Err> {
        let backend = self.backend.on_handshake_success(username)?;

        Ok(Connection::new(
            self.config.clone(),
            backend,
            self.reporter.clone(),
        ))
    }

    fn on_disconnect(&mut self) {
        self.backend.on_disconnect()
    }

    fn on_shutdown(&mut self) {
        self.backend.on_shutdown()
    }
}
