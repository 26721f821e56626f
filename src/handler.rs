//! The backend capability surface wrapped by the interceptors.
//!
//! The three traits mirror the connection → session → request structure of
//! an SSH server backend. The enforcement layer implements each of them by
//! delegating to an inner implementation, so a wrapped backend remains
//! usable wherever the bare backend was.

use crate::{OpenRejection, Rejection};

/// The response to an authentication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResponse {
    /// _Accept_ the authentication attempt.
    Accept,

    /// _Reject_ the authentication attempt.
    Reject,
}

/// A single prompt of a keyboard-interactive challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// The text presented to the user.
    pub text: String,

    /// Whether the user's answer should be echoed back while typing.
    pub echo: bool,
}

/// The callback interrogating the peer during keyboard-interactive
/// authentication, answering `None` when the client fails the challenge.
pub type Challenge<'c> = &'c mut dyn FnMut(&str, &[Prompt]) -> Option<Vec<String>>;

/// A handler for the events of a single network connection.
pub trait NetworkHandler: Send {
    /// The handler taking over once the handshake succeeded.
    type Connection: ConnectionHandler;

    /// The errorneous outcome of the handler.
    type Err;

    /// An authentication attempt using the `password` method.
    fn on_auth_password(
        &mut self,
        username: &str,
        password: &[u8],
    ) -> Result<AuthResponse, Self::Err>;

    /// An authentication attempt using the `publickey` method.
    fn on_auth_publickey(
        &mut self,
        username: &str,
        public_key: &str,
    ) -> Result<AuthResponse, Self::Err>;

    /// An authentication attempt using the `keyboard-interactive` method.
    fn on_auth_keyboard_interactive(
        &mut self,
        username: &str,
        challenge: Challenge<'_>,
    ) -> Result<AuthResponse, Self::Err>;

    /// The handshake failed before any connection handler was created.
    fn on_handshake_failed(&mut self, error: &(dyn std::error::Error + Send + Sync));

    /// The handshake succeeded for `username`, yielding the handler for the
    /// authenticated connection.
    fn on_handshake_success(&mut self, username: &str) -> Result<Self::Connection, Self::Err>;

    /// The peer disconnected.
    fn on_disconnect(&mut self);

    /// The enclosing server is shutting down.
    fn on_shutdown(&mut self);
}

/// A handler for the channel open requests of one authenticated connection.
///
/// Methods take `&self`: the protocol engine may open several channels of
/// the same connection concurrently, so implementations keep their state
/// behind interior mutability.
pub trait ConnectionHandler: Send + Sync {
    /// The handler taking over an admitted session channel.
    type Session: SessionHandler;

    /// The errorneous outcome of the handler.
    type Err: From<OpenRejection>;

    /// A session channel open request, yielding the handler for the channel
    /// when admitted.
    fn on_session_channel(
        &self,
        channel_id: u32,
        extra_data: &[u8],
    ) -> Result<Self::Session, Self::Err>;

    /// A global request of an unsupported type.
    fn on_unsupported_global_request(&self, request_id: u64, request_type: &str, payload: &[u8]);

    /// A channel open request of an unsupported type.
    fn on_unsupported_channel(&self, channel_id: u32, channel_type: &str, extra_data: &[u8]);

    /// The enclosing server is shutting down.
    fn on_shutdown(&self);
}

/// A handler for the requests of one open session channel.
pub trait SessionHandler: Send {
    /// The errorneous outcome of the handler.
    type Err: From<Rejection>;

    /// A request to set an environment variable for the session.
    fn on_env_request(&mut self, request_id: u64, name: &str, value: &str)
        -> Result<(), Self::Err>;

    /// A request to allocate a pseudo-terminal for the session.
    #[allow(clippy::too_many_arguments)]
    fn on_pty_request(
        &mut self,
        request_id: u64,
        term: &str,
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
        modes: &[u8],
    ) -> Result<(), Self::Err>;

    /// A request to execute `program` in the session.
    fn on_exec_request(&mut self, request_id: u64, program: &str) -> Result<(), Self::Err>;

    /// A request to start the user's shell in the session.
    fn on_shell(&mut self, request_id: u64) -> Result<(), Self::Err>;

    /// A request to start the named subsystem in the session.
    fn on_subsystem(&mut self, request_id: u64, subsystem: &str) -> Result<(), Self::Err>;

    /// A request to deliver the named signal to the session.
    fn on_signal(&mut self, request_id: u64, signal: &str) -> Result<(), Self::Err>;

    /// A notification that the client's window dimensions changed.
    fn on_window_change(
        &mut self,
        request_id: u64,
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
    ) -> Result<(), Self::Err>;

    /// A channel request of an unsupported type.
    fn on_unsupported_request(&mut self, request_id: u64, request_type: &str, payload: &[u8]);

    /// A channel request that could not be decoded.
    fn on_failed_decode(
        &mut self,
        request_id: u64,
        request_type: &str,
        payload: &[u8],
        error: &(dyn std::error::Error + Send + Sync),
    );

    /// The session channel has been closed.
    fn on_close(&mut self);

    /// The enclosing server is shutting down.
    fn on_shutdown(&mut self);
}
