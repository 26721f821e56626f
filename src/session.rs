//! The request-policy interceptor.

use std::sync::Arc;

use crate::{
    handler::SessionHandler,
    report::{Event, Reporter},
    Config, Mode, Rejection, ORIGINAL_COMMAND_VARIABLE,
};

/// The policy enforcement wrapper around a backend [`SessionHandler`].
///
/// Every channel request is resolved against the operation's rule before it
/// reaches the backend; execution requests additionally go through
/// forced-command substitution when one is configured. Window resizes and
/// close/shutdown notifications pass through untouched.
#[derive(Debug)]
pub struct Session<B, R = ()> {
    config: Arc<Config>,
    backend: B,
    reporter: R,
}

impl<B, R> Session<B, R> {
    pub(crate) fn new(config: Arc<Config>, backend: B, reporter: R) -> Self {
        Self {
            config,
            backend,
            reporter,
        }
    }
}

impl<B: SessionHandler, R: Reporter + Clone> Session<B, R> {
    /// Report the rejection once and convert it into the backend's error.
    fn reject(&self, rejection: Rejection) -> B::Err {
        tracing::debug!(
            code = rejection.code(),
            item = rejection.item(),
            "Channel request rejected: {rejection}",
        );
        self.reporter.report(Event::RequestRejected(rejection.clone()));

        rejection.into()
    }

    /// Report the substitution of the forced `command` for the request.
    fn forced(&self, original: Option<&str>, command: &str) {
        tracing::debug!(
            code = "SECURITY_EXEC_FORCING_COMMAND",
            original,
            command,
            "Substituting the forced command for the requested execution",
        );
        self.reporter.report(Event::CommandForced {
            original: original.map(Into::into),
            command: command.into(),
        });
    }

    /// Expose the originally requested `program` to the forced command,
    /// aborting the whole request when the backend refuses the variable.
    fn inject_original(&mut self, request_id: u64, program: &str) -> Result<(), B::Err> {
        self.backend
            .on_env_request(request_id, ORIGINAL_COMMAND_VARIABLE, program)
            .map_err(|_| self.reject(Rejection::EnvInjection))
    }
}

impl<B: SessionHandler, R: Reporter + Clone> SessionHandler for Session<B, R> {
    type Err = B::Err;

    fn on_env_request(
        &mut self,
        request_id: u64,
        name: &str,
        value: &str,
    ) -> Result<(), Self::Err> {
        let rule = &self.config.env;
        let allowed = match rule.mode.resolve(self.config.default_mode) {
            Mode::Disable => false,
            Mode::Filter => rule.allows(name),
            Mode::Enable | Mode::Unconfigured => !rule.denies(name),
        };

        if allowed {
            self.backend.on_env_request(request_id, name, value)
        } else {
            Err(self.reject(Rejection::Env { name: name.into() }))
        }
    }

    fn on_pty_request(
        &mut self,
        request_id: u64,
        term: &str,
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
        modes: &[u8],
    ) -> Result<(), Self::Err> {
        // A pseudo-terminal has no meaningful allow-list, `filter` rejects
        // the allocation like `disable` does.
        let allowed = matches!(
            self.config.tty.mode.resolve(self.config.default_mode),
            Mode::Enable | Mode::Unconfigured
        );

        if allowed {
            self.backend
                .on_pty_request(request_id, term, columns, rows, width, height, modes)
        } else {
            Err(self.reject(Rejection::Tty))
        }
    }

    fn on_exec_request(&mut self, request_id: u64, program: &str) -> Result<(), Self::Err> {
        let rule = &self.config.command;
        let allowed = match rule.mode.resolve(self.config.default_mode) {
            Mode::Disable => false,
            Mode::Filter => rule.allows(program),
            // No deny-list under `enable`, execution is forwarded as-is.
            Mode::Enable | Mode::Unconfigured => true,
        };

        if !allowed {
            return Err(self.reject(Rejection::Exec {
                program: program.into(),
            }));
        }

        match self.config.force_command.clone() {
            None => self.backend.on_exec_request(request_id, program),
            Some(command) => {
                self.inject_original(request_id, program)?;
                self.forced(Some(program), &command);

                self.backend.on_exec_request(request_id, &command)
            }
        }
    }

    fn on_shell(&mut self, request_id: u64) -> Result<(), Self::Err> {
        // A bare shell has no meaningful allow-list either.
        let allowed = matches!(
            self.config.shell.mode.resolve(self.config.default_mode),
            Mode::Enable | Mode::Unconfigured
        );

        if !allowed {
            return Err(self.reject(Rejection::Shell));
        }

        match self.config.force_command.clone() {
            None => self.backend.on_shell(request_id),
            Some(command) => {
                // The client supplied no command string, so nothing is
                // exposed through the environment.
                self.forced(None, &command);

                self.backend.on_exec_request(request_id, &command)
            }
        }
    }

    fn on_subsystem(&mut self, request_id: u64, subsystem: &str) -> Result<(), Self::Err> {
        let rule = &self.config.subsystem;
        let allowed = match rule.mode.resolve(self.config.default_mode) {
            Mode::Disable => false,
            Mode::Filter => rule.allows(subsystem),
            Mode::Enable | Mode::Unconfigured => !rule.denies(subsystem),
        };

        if !allowed {
            return Err(self.reject(Rejection::Subsystem {
                name: subsystem.into(),
            }));
        }

        match self.config.force_command.clone() {
            None => self.backend.on_subsystem(request_id, subsystem),
            Some(command) => {
                self.inject_original(request_id, subsystem)?;
                self.forced(Some(subsystem), &command);

                self.backend.on_exec_request(request_id, &command)
            }
        }
    }

    fn on_signal(&mut self, request_id: u64, signal: &str) -> Result<(), Self::Err> {
        let rule = &self.config.signal;
        let allowed = match rule.mode.resolve(self.config.default_mode) {
            Mode::Disable => false,
            Mode::Filter => rule.allows(signal),
            Mode::Enable | Mode::Unconfigured => !rule.denies(signal),
        };

        if allowed {
            self.backend.on_signal(request_id, signal)
        } else {
            Err(self.reject(Rejection::Signal {
                name: signal.into(),
            }))
        }
    }

    fn on_window_change(
        &mut self,
        request_id: u64,
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
    ) -> Result<(), Self::Err> {
        self.backend
            .on_window_change(request_id, columns, rows, width, height)
    }

    fn on_unsupported_request(&mut self, request_id: u64, request_type: &str, payload: &[u8]) {
        self.backend
            .on_unsupported_request(request_id, request_type, payload)
    }

    fn on_failed_decode(
        &mut self,
        request_id: u64,
        request_type: &str,
        payload: &[u8],
        error: &(dyn std::error::Error + Send + Sync),
    ) {
        self.backend
            .on_failed_decode(request_id, request_type, payload, error)
    }

    fn on_close(&mut self) {
        self.backend.on_close()
    }

    fn on_shutdown(&mut self) {
        self.backend.on_shutdown()
    }
}
