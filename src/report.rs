//! Structured notifications emitted on policy decisions.

use crate::{OpenRejection, Rejection};

/// A notification emitted by the enforcement layer, once per decision.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A channel request has been rejected by the policy.
    RequestRejected(Rejection),

    /// A channel open request has been rejected by the admission control.
    ChannelRejected(OpenRejection),

    /// The requested execution is being replaced by the forced command,
    /// `original` being `None` for shell requests which carry no command
    /// string of their own.
    CommandForced {
        /// The program or subsystem the client originally requested.
        original: Option<String>,

        /// The command forwarded to the backend in its place.
        command: String,
    },
}

impl Event {
    /// The stable machine-readable code for the event.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RequestRejected(rejection) => rejection.code(),
            Self::ChannelRejected(rejection) => rejection.code(),
            Self::CommandForced { .. } => "SECURITY_EXEC_FORCING_COMMAND",
        }
    }
}

/// An interface to the observability sink receiving policy [`Event`]s.
pub trait Reporter: Send + Sync {
    /// Process a notification emitted by the enforcement layer.
    fn report(&self, event: Event);
}

impl<T: Fn(Event) + Send + Sync> Reporter for T {
    fn report(&self, event: Event) {
        (self)(event)
    }
}

/// A default implementation of the sink that discards all notifications.
impl Reporter for () {
    fn report(&self, _: Event) {}
}
