//! A recording backend double shared by the integration tests.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use ssh_warden::{
    handler::{AuthResponse, Challenge, ConnectionHandler, NetworkHandler, SessionHandler},
    Config, Network, OpenRejection, Rejection, Session,
};

/// One call observed by the [`Recorder`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AuthPassword(String),
    AuthPublickey(String),
    AuthKeyboardInteractive(String),
    HandshakeFailed,
    HandshakeSuccess(String),
    Disconnect,
    SessionChannel(u32),
    UnsupportedGlobalRequest(String),
    UnsupportedChannel(String),
    Env { name: String, value: String },
    Pty { term: String },
    Exec { program: String },
    Shell,
    Subsystem { name: String },
    Signal { name: String },
    WindowChange,
    UnsupportedRequest(String),
    FailedDecode(String),
    Close,
    Shutdown,
}

/// The error type surfaced by the [`Recorder`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// A rejection raised by the enforcement layer on a channel request.
    Policy(Rejection),
    /// A rejection raised by the enforcement layer at admission.
    Admission(OpenRejection),
    /// A failure of the backend itself.
    Internal,
}

impl From<Rejection> for BackendError {
    fn from(rejection: Rejection) -> Self {
        Self::Policy(rejection)
    }
}

impl From<OpenRejection> for BackendError {
    fn from(rejection: OpenRejection) -> Self {
        Self::Admission(rejection)
    }
}

/// A backend double recording every call it receives, optionally failing
/// environment requests or channel opens on demand.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_env: Arc<AtomicBool>,
    fail_open: Arc<AtomicBool>,
}

impl Recorder {
    /// The calls recorded so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("poisoned").clone()
    }

    /// Forget the calls recorded so far.
    pub fn clear(&self) {
        self.calls.lock().expect("poisoned").clear();
    }

    /// Make subsequent environment requests fail.
    pub fn fail_env(&self, fail: bool) {
        self.fail_env.store(fail, Ordering::Relaxed);
    }

    /// Make subsequent channel opens fail.
    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::Relaxed);
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("poisoned").push(call);
    }
}

impl NetworkHandler for Recorder {
    type Connection = Recorder;
    type Err = BackendError;

    fn on_auth_password(
        &mut self,
        username: &str,
        _password: &[u8],
    ) -> Result<AuthResponse, Self::Err> {
        self.record(Call::AuthPassword(username.into()));

        Ok(AuthResponse::Accept)
    }

    fn on_auth_publickey(
        &mut self,
        username: &str,
        _public_key: &str,
    ) -> Result<AuthResponse, Self::Err> {
        self.record(Call::AuthPublickey(username.into()));

        Ok(AuthResponse::Accept)
    }

    fn on_auth_keyboard_interactive(
        &mut self,
        username: &str,
        challenge: Challenge<'_>,
    ) -> Result<AuthResponse, Self::Err> {
        self.record(Call::AuthKeyboardInteractive(username.into()));

        Ok(match challenge("", &[]) {
            Some(_) => AuthResponse::Accept,
            None => AuthResponse::Reject,
        })
    }

    fn on_handshake_failed(&mut self, _error: &(dyn std::error::Error + Send + Sync)) {
        self.record(Call::HandshakeFailed);
    }

    fn on_handshake_success(&mut self, username: &str) -> Result<Self::Connection, Self::Err> {
        self.record(Call::HandshakeSuccess(username.into()));

        Ok(self.clone())
    }

    fn on_disconnect(&mut self) {
        self.record(Call::Disconnect);
    }

    fn on_shutdown(&mut self) {
        self.record(Call::Shutdown);
    }
}

impl ConnectionHandler for Recorder {
    type Session = Recorder;
    type Err = BackendError;

    fn on_session_channel(
        &self,
        channel_id: u32,
        _extra_data: &[u8],
    ) -> Result<Self::Session, Self::Err> {
        if self.fail_open.load(Ordering::Relaxed) {
            return Err(BackendError::Internal);
        }

        self.record(Call::SessionChannel(channel_id));

        Ok(self.clone())
    }

    fn on_unsupported_global_request(&self, _request_id: u64, request_type: &str, _payload: &[u8]) {
        self.record(Call::UnsupportedGlobalRequest(request_type.into()));
    }

    fn on_unsupported_channel(&self, _channel_id: u32, channel_type: &str, _extra_data: &[u8]) {
        self.record(Call::UnsupportedChannel(channel_type.into()));
    }

    fn on_shutdown(&self) {
        self.record(Call::Shutdown);
    }
}

impl SessionHandler for Recorder {
    type Err = BackendError;

    fn on_env_request(
        &mut self,
        _request_id: u64,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Err> {
        if self.fail_env.load(Ordering::Relaxed) {
            return Err(BackendError::Internal);
        }

        self.record(Call::Env {
            name: name.into(),
            value: value.into(),
        });

        Ok(())
    }

    fn on_pty_request(
        &mut self,
        _request_id: u64,
        term: &str,
        _columns: u32,
        _rows: u32,
        _width: u32,
        _height: u32,
        _modes: &[u8],
    ) -> Result<(), Self::Err> {
        self.record(Call::Pty { term: term.into() });

        Ok(())
    }

    fn on_exec_request(&mut self, _request_id: u64, program: &str) -> Result<(), Self::Err> {
        self.record(Call::Exec {
            program: program.into(),
        });

        Ok(())
    }

    fn on_shell(&mut self, _request_id: u64) -> Result<(), Self::Err> {
        self.record(Call::Shell);

        Ok(())
    }

    fn on_subsystem(&mut self, _request_id: u64, subsystem: &str) -> Result<(), Self::Err> {
        self.record(Call::Subsystem {
            name: subsystem.into(),
        });

        Ok(())
    }

    fn on_signal(&mut self, _request_id: u64, signal: &str) -> Result<(), Self::Err> {
        self.record(Call::Signal {
            name: signal.into(),
        });

        Ok(())
    }

    fn on_window_change(
        &mut self,
        _request_id: u64,
        _columns: u32,
        _rows: u32,
        _width: u32,
        _height: u32,
    ) -> Result<(), Self::Err> {
        self.record(Call::WindowChange);

        Ok(())
    }

    fn on_unsupported_request(&mut self, _request_id: u64, request_type: &str, _payload: &[u8]) {
        self.record(Call::UnsupportedRequest(request_type.into()));
    }

    fn on_failed_decode(
        &mut self,
        _request_id: u64,
        request_type: &str,
        _payload: &[u8],
        _error: &(dyn std::error::Error + Send + Sync),
    ) {
        self.record(Call::FailedDecode(request_type.into()));
    }

    fn on_close(&mut self) {
        self.record(Call::Close);
    }

    fn on_shutdown(&mut self) {
        self.record(Call::Shutdown);
    }
}

/// Run `config` through the whole interceptor chain, yielding the recorder
/// and a policy-enforcing session handler wrapping it.
///
/// The handshake and channel open calls of the setup are cleared from the
/// recorder, leaving only the request traffic of the test itself.
pub fn session(config: Config) -> (Recorder, Session<Recorder>) {
    let recorder = Recorder::default();

    let mut network = Network::new(config, recorder.clone()).expect("configuration is valid");
    let connection = network
        .on_handshake_success("user")
        .expect("handshake is forwarded");
    let session = connection
        .on_session_channel(0, b"")
        .expect("first session is admitted");

    recorder.clear();

    (recorder, session)
}
