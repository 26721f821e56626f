//! The session-admission interceptor.

use std::sync::{Arc, Mutex};

use crate::{
    handler::ConnectionHandler,
    report::{Event, Reporter},
    Config, OpenRejection, Session,
};

/// The policy enforcement wrapper around a backend [`ConnectionHandler`].
///
/// It bounds the number of session channels admitted over the lifetime of
/// the connection; the counter is never decremented when a channel closes,
/// so the cap reads as _sessions per connection_, not _concurrent
/// sessions_. Admitted channels are handed to a [`Session`] enforcing the
/// shared [`Config`] on the backend's channel handler.
#[derive(Debug)]
pub struct Connection<B, R = ()> {
    config: Arc<Config>,
    backend: B,
    reporter: R,
    sessions: Mutex<u32>,
}

impl<B, R> Connection<B, R> {
    pub(crate) fn new(config: Arc<Config>, backend: B, reporter: R) -> Self {
        Self {
            config,
            backend,
            reporter,
            sessions: Mutex::new(0),
        }
    }
}

impl<B: ConnectionHandler, R: Reporter + Clone> ConnectionHandler for Connection<B, R> {
    type Session = Session<B::Session, R>;
    type Err = B::Err;

    fn on_session_channel(
        &self,
        channel_id: u32,
        extra_data: &[u8],
    ) -> Result<Self::Session, Self::Err> {
        // The lock spans the whole check-delegate-increment sequence, so
        // interleaved open requests cannot overshoot the cap.
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(max_sessions) = self.config.max_sessions {
            if *sessions >= max_sessions {
                let rejection = OpenRejection::TooManySessions;

                tracing::debug!(
                    code = rejection.code(),
                    channel_id,
                    sessions = *sessions,
                    "Channel open request rejected: {rejection}",
                );
                self.reporter.report(Event::ChannelRejected(rejection.clone()));

                return Err(rejection.into());
            }
        }

        let backend = self.backend.on_session_channel(channel_id, extra_data)?;
        *sessions += 1;

        Ok(Session::new(
            self.config.clone(),
            backend,
            self.reporter.clone(),
        ))
    }

    fn on_unsupported_global_request(&self, request_id: u64, request_type: &str, payload: &[u8]) {
        self.backend
            .on_unsupported_global_request(request_id, request_type, payload)
    }

    fn on_unsupported_channel(&self, channel_id: u32, channel_type: &str, extra_data: &[u8]) {
        self.backend
            .on_unsupported_channel(channel_id, channel_type, extra_data)
    }

    fn on_shutdown(&self) {
        self.backend.on_shutdown()
    }
}
