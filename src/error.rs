use ssh_packet::connect::ChannelOpenFailureReason;
use thiserror::Error;

/// The rejection of a configuration at validation time.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidConfig {
    /// The force command is set, but empty.
    #[error("The force command must not be empty when set")]
    EmptyForceCommand,

    /// An allow or deny list contains an empty entry.
    #[error("The `{rule}` rule contains an empty list entry")]
    EmptyListEntry {
        /// The name of the offending rule.
        rule: &'static str,
    },
}

/// The rejection of a single channel request by the policy.
///
/// Each variant carries the offending value where the request had one, and
/// maps to a stable machine-readable [`code`](Self::code) for audit trails.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    /// The environment variable did not pass the `env` rule.
    #[error("Environment variable rejected")]
    Env {
        /// The name of the rejected variable.
        name: String,
    },

    /// The pseudo-terminal allocation did not pass the `tty` rule.
    #[error("TTY request rejected")]
    Tty,

    /// The program did not pass the `command` rule.
    #[error("Command execution rejected")]
    Exec {
        /// The rejected program.
        program: String,
    },

    /// The shell request did not pass the `shell` rule.
    #[error("Shell execution rejected")]
    Shell,

    /// The subsystem did not pass the `subsystem` rule.
    #[error("Subsystem execution rejected")]
    Subsystem {
        /// The name of the rejected subsystem.
        name: String,
    },

    /// The signal did not pass the `signal` rule.
    #[error("Signal rejected")]
    Signal {
        /// The name of the rejected signal.
        name: String,
    },

    /// The backend refused the injection of the original command into the
    /// execution environment, aborting the forced command.
    #[error("Failed to execute command")]
    EnvInjection,
}

impl Rejection {
    /// The stable machine-readable code for the rejection.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Env { .. } => "SECURITY_ENV_REJECTED",
            Self::Tty => "SECURITY_TTY_REJECTED",
            Self::Exec { .. } => "SECURITY_EXEC_REJECTED",
            Self::Shell => "SECURITY_SHELL_REJECTED",
            Self::Subsystem { .. } => "SECURITY_SUBSYSTEM_REJECTED",
            Self::Signal { .. } => "SECURITY_SIGNAL_REJECTED",
            Self::EnvInjection => "SECURITY_EXEC_FAILED_SETENV",
        }
    }

    /// A message intended for the administrator, as opposed to the
    /// [`Display`](std::fmt::Display) message shown to the user.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::Env { .. } => {
                "The user tried to set an environment variable the policy does not allow."
            }
            Self::Tty => "The user requested a pseudo-terminal the policy does not allow.",
            Self::Exec { .. } => "The user tried to execute a program the policy does not allow.",
            Self::Shell => "The user requested a shell the policy does not allow.",
            Self::Subsystem { .. } => {
                "The user requested a subsystem the policy does not allow."
            }
            Self::Signal { .. } => "The user tried to deliver a signal the policy does not allow.",
            Self::EnvInjection => {
                "The original command could not be exposed to the forced command because the backend rejected the environment variable."
            }
        }
    }

    /// The value the request carried, when the rejection relates to one.
    pub fn item(&self) -> Option<&str> {
        match self {
            Self::Env { name } | Self::Subsystem { name } | Self::Signal { name } => Some(name),
            Self::Exec { program } => Some(program),
            Self::Tty | Self::Shell | Self::EnvInjection => None,
        }
    }
}

/// The rejection of a channel open request at admission time.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OpenRejection {
    /// Too many sessions were opened on the same connection.
    #[error("Too many sessions.")]
    TooManySessions,
}

impl OpenRejection {
    /// The stable machine-readable code for the rejection.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooManySessions => "SECURITY_MAX_SESSIONS",
        }
    }

    /// A message intended for the administrator.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::TooManySessions => "The user has opened too many sessions.",
        }
    }

    /// The wire-level classification the protocol layer should use when
    /// rejecting the channel open request.
    pub fn reason(&self) -> ChannelOpenFailureReason {
        match self {
            Self::TooManySessions => ChannelOpenFailureReason::ResourceShortage,
        }
    }
}

/// A handy [`std::result::Result`] type alias bounding the [`enum@Rejection`] struct as `E`.
pub type Result<T, E = Rejection> = std::result::Result<T, E>;
