//! Policy configuration for the enforcement layer.

use crate::InvalidConfig;

/// The policy mode applied to one operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Defer to the default mode, or to [`Mode::Enable`] if that is unset too.
    #[default]
    Unconfigured,

    /// Allow by default, rejecting values present in the deny list.
    Enable,

    /// Deny by default, allowing only values present in the allow list.
    Filter,

    /// Reject every request of the operation.
    Disable,
}

impl Mode {
    /// Resolve the effective mode: the explicit mode when set, else the
    /// `fallback` when set, else [`Mode::Enable`].
    ///
    /// Pure with regard to the configuration; never returns
    /// [`Mode::Unconfigured`].
    pub fn resolve(self, fallback: Self) -> Self {
        match (self, fallback) {
            (Self::Unconfigured, Self::Unconfigured) => Self::Enable,
            (Self::Unconfigured, fallback) => fallback,
            (mode, _) => mode,
        }
    }
}

/// The policy rule for one operation.
///
/// The `allow` list is only consulted under [`Mode::Filter`], the `deny`
/// list only under [`Mode::Enable`]; [`Mode::Disable`] consults neither.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Rule {
    /// The mode of the rule, [`Mode::Unconfigured`] deferring to
    /// [`Config::default_mode`].
    pub mode: Mode,

    /// The values accepted under [`Mode::Filter`].
    pub allow: Vec<String>,

    /// The values rejected under [`Mode::Enable`].
    pub deny: Vec<String>,
}

impl Rule {
    pub(crate) fn allows(&self, item: &str) -> bool {
        self.allow.iter().any(|entry| entry == item)
    }

    pub(crate) fn denies(&self, item: &str) -> bool {
        self.deny.iter().any(|entry| entry == item)
    }
}

/// The policy configuration shared by every interceptor of a connection.
///
/// Immutable once handed to [`Network::new`](crate::Network::new).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// The fallback mode for rules left [`Mode::Unconfigured`].
    pub default_mode: Mode,

    /// The rule for environment variable requests, keyed by variable name.
    pub env: Rule,

    /// The rule for pseudo-terminal allocation; list contents are ignored,
    /// as [`Mode::Filter`] rejects the allocation outright.
    pub tty: Rule,

    /// The rule for command execution, keyed by program.
    pub command: Rule,

    /// The rule for shell requests; list contents are ignored, as
    /// [`Mode::Filter`] rejects the shell outright.
    pub shell: Rule,

    /// The rule for subsystem requests, keyed by subsystem name.
    pub subsystem: Rule,

    /// The rule for signal delivery, keyed by signal name.
    pub signal: Rule,

    /// The command substituted for whatever execution the client requested,
    /// the original request being exposed through
    /// [`ORIGINAL_COMMAND_VARIABLE`](crate::ORIGINAL_COMMAND_VARIABLE).
    pub force_command: Option<String>,

    /// The number of session channels admitted over the lifetime of one
    /// connection, `None` meaning unlimited.
    pub max_sessions: Option<u32>,
}

impl Config {
    /// Validate the configuration, as done by
    /// [`Network::new`](crate::Network::new) before any enforcement starts.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if matches!(self.force_command.as_deref(), Some("")) {
            return Err(InvalidConfig::EmptyForceCommand);
        }

        let rules = [
            ("env", &self.env),
            ("tty", &self.tty),
            ("command", &self.command),
            ("shell", &self.shell),
            ("subsystem", &self.subsystem),
            ("signal", &self.signal),
        ];
        for (name, rule) in rules {
            if rule.allow.iter().chain(&rule.deny).any(String::is_empty) {
                return Err(InvalidConfig::EmptyListEntry { rule: name });
            }
        }

        Ok(())
    }
}
