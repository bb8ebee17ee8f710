//! VPN session controller
//!
//! Mediates between the presentation layer and the external tool. The
//! controller is stateless apart from logging: it never assumes connection
//! state and always re-queries before acting. Success of a state-changing
//! command is defined by a subsequent status read, not by the command's exit
//! code alone.

use crate::config::AppConfig;
use crate::error::{ConfigError, HstrayError, SessionError};
use crate::types::{Credentials, Location};
use crate::vpn::parser::{self, StatusKind};
use crate::vpn::probe::{HttpProbe, ReachabilityProbe};
use crate::vpn::runner::{CommandRunner, RunnerError, SystemRunner};
use crate::vpn::state::ConnectionState;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeouts and settle delays for external invocations
///
/// The 2 s / 3 s settle asymmetry is preserved from the upstream tool as a
/// tunable, not a law.
#[derive(Debug, Clone)]
pub struct Tuning {
    pub status_timeout: Duration,
    pub connect_timeout: Duration,
    pub disconnect_timeout: Duration,
    pub login_timeout: Duration,
    pub locations_timeout: Duration,
    pub connect_settle: Duration,
    pub location_settle: Duration,
    pub disconnect_settle: Duration,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            status_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(60),
            disconnect_timeout: Duration::from_secs(30),
            login_timeout: Duration::from_secs(30),
            locations_timeout: Duration::from_secs(10),
            connect_settle: Duration::from_secs(2),
            location_settle: Duration::from_secs(3),
            disconnect_settle: Duration::from_secs(2),
        }
    }
}

impl Tuning {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            status_timeout: Duration::from_secs(config.status_timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            disconnect_timeout: Duration::from_secs(config.disconnect_timeout_secs),
            login_timeout: Duration::from_secs(config.login_timeout_secs),
            locations_timeout: Duration::from_secs(config.locations_timeout_secs),
            connect_settle: Duration::from_secs(config.connect_settle_secs),
            location_settle: Duration::from_secs(config.location_settle_secs),
            disconnect_settle: Duration::from_secs(config.disconnect_settle_secs),
        }
    }
}

/// Wraps every external-tool invocation behind a typed operation
pub struct SessionController<R, P> {
    runner: R,
    probe: P,
    tuning: Tuning,
}

impl SessionController<SystemRunner, HttpProbe> {
    /// Build the production controller from application settings
    pub fn from_config(config: &AppConfig) -> Result<Self, HstrayError> {
        let probe = HttpProbe::new(
            config.probe_url.clone(),
            Duration::from_secs(config.probe_timeout_secs),
        )
        .map_err(|e| {
            HstrayError::Config(ConfigError::ValidationError {
                message: e.to_string(),
            })
        })?;

        Ok(Self::new(
            SystemRunner::new(&config.command),
            probe,
            Tuning::from_config(config),
        ))
    }
}

impl<R: CommandRunner, P: ReachabilityProbe> SessionController<R, P> {
    pub fn new(runner: R, probe: P, tuning: Tuning) -> Self {
        Self {
            runner,
            probe,
            tuning,
        }
    }

    /// Access the underlying command runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Single bounded reachability probe, used before every connect attempt
    pub async fn check_network(&self) -> bool {
        self.probe.is_reachable().await
    }

    /// Query the current connection state from the external tool
    ///
    /// Unexpected output is logged and treated as disconnected; it is not an
    /// error, but it is not trusted as connected either.
    pub async fn status(&self) -> Result<ConnectionState, SessionError> {
        let out = self
            .runner
            .run(&["status"], self.tuning.status_timeout)
            .await
            .map_err(runner_to_session)?;

        match parser::classify_status(&out.stdout) {
            StatusKind::Connected => Ok(ConnectionState::Connected),
            StatusKind::NotConnected => Ok(ConnectionState::Disconnected),
            StatusKind::Unrecognized => {
                warn!(output = %out.stdout.trim(), "unexpected status output, treating as disconnected");
                Ok(ConnectionState::Disconnected)
            }
        }
    }

    /// Connect, optionally to a named location
    ///
    /// Gated on the reachability probe. A plain connect while already
    /// connected is a success no-op; a location connect tears down the
    /// current tunnel first.
    pub async fn connect(&self, location: Option<&str>) -> Result<(), SessionError> {
        if !self.check_network().await {
            warn!("reachability probe failed, refusing connect attempt");
            return Err(SessionError::NoNetwork);
        }

        if self.status().await? == ConnectionState::Connected {
            match location {
                None => {
                    info!("already connected, skipping connection attempt");
                    return Ok(());
                }
                Some(loc) => {
                    info!(location = loc, "connected elsewhere, disconnecting first");
                    self.disconnect().await?;
                }
            }
        }

        let mut args = vec!["connect"];
        if let Some(loc) = location {
            args.push(loc);
        }

        let out = self
            .runner
            .run(&args, self.tuning.connect_timeout)
            .await
            .map_err(runner_to_session)?;

        if parser::mentions_not_signed_in(&out.stderr)
            || parser::mentions_not_signed_in(&out.stdout)
        {
            info!("external tool reports no account session");
            return Err(SessionError::NotSignedIn);
        }

        if !out.success {
            warn!(code = ?out.code, stderr = %out.stderr.trim(), "connect command failed");
            return Err(SessionError::ConnectFailed);
        }

        // Exit code zero is necessary but not sufficient; give the tool's
        // asynchronous connection process time to settle, then re-query
        let settle = if location.is_some() {
            self.tuning.location_settle
        } else {
            self.tuning.connect_settle
        };
        tokio::time::sleep(settle).await;

        match self.status().await? {
            ConnectionState::Connected => {
                info!(?location, "connection established");
                Ok(())
            }
            _ => {
                warn!(?location, "connect command succeeded but status never reached connected");
                Err(SessionError::ConnectFailed)
            }
        }
    }

    /// Disconnect the current tunnel
    ///
    /// A disconnect while already disconnected is a success no-op. Both a
    /// command timeout and a still-connected re-query report as
    /// `DisconnectFailed`.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        if self.status().await? == ConnectionState::Disconnected {
            info!("already disconnected, skipping disconnection attempt");
            return Ok(());
        }

        match self
            .runner
            .run(&["disconnect"], self.tuning.disconnect_timeout)
            .await
        {
            Ok(_) => {}
            Err(RunnerError::Timeout { seconds }) => {
                warn!(seconds, "disconnect command timed out");
                return Err(SessionError::DisconnectFailed);
            }
            Err(e) => return Err(runner_to_session(e)),
        }

        tokio::time::sleep(self.tuning.disconnect_settle).await;

        match self.status().await? {
            ConnectionState::Connected => {
                warn!("disconnect command executed but VPN is still connected");
                Err(SessionError::DisconnectFailed)
            }
            _ => {
                info!("disconnected");
                Ok(())
            }
        }
    }

    /// List the available locations
    ///
    /// Never empty: on failure or an empty listing a single sentinel
    /// placeholder entry is returned so the presentation layer always has
    /// something to render.
    pub async fn locations(&self) -> Vec<Location> {
        let entries = match self
            .runner
            .run(&["locations"], self.tuning.locations_timeout)
            .await
        {
            Ok(out) if out.success => parser::parse_locations(&out.stdout),
            Ok(out) => {
                warn!(code = ?out.code, stderr = %out.stderr.trim(), "locations command failed");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "locations command did not run");
                Vec::new()
            }
        };

        if entries.is_empty() {
            warn!("no locations available, substituting placeholder");
            vec![Location::placeholder()]
        } else {
            debug!(count = entries.len(), "loaded locations");
            entries
        }
    }

    /// Sign in to the external tool's account
    ///
    /// Force-signs-out any existing session first (best effort), feeds the
    /// credentials to the interactive sign-in, then verifies via a separate
    /// account-status query: success iff the username appears in its output.
    pub async fn login(&self, credentials: &Credentials) -> bool {
        if let Err(e) = self
            .runner
            .run(&["account", "signout"], self.tuning.login_timeout)
            .await
        {
            debug!(error = %e, "best-effort signout before login failed");
        }

        let input = format!("{}\n{}\n", credentials.username(), credentials.password());
        match self
            .runner
            .run_with_input(&["account", "signin"], &input, self.tuning.login_timeout)
            .await
        {
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "sign-in command failed");
                return false;
            }
        }

        match self
            .runner
            .run(&["account", "status"], self.tuning.status_timeout)
            .await
        {
            Ok(out) => {
                let ok = parser::contains_username(&out.stdout, credentials.username());
                if ok {
                    info!(username = credentials.username(), "login successful");
                } else {
                    warn!(
                        username = credentials.username(),
                        "login failed, username absent from account status"
                    );
                }
                ok
            }
            Err(e) => {
                warn!(error = %e, "account status query after sign-in failed");
                false
            }
        }
    }

    /// Sign out of the external tool's account
    pub async fn logout(&self) -> bool {
        match self
            .runner
            .run(&["account", "signout"], self.tuning.login_timeout)
            .await
        {
            Ok(out) if out.success => {
                info!("signed out");
                true
            }
            Ok(out) => {
                warn!(code = ?out.code, stderr = %out.stderr.trim(), "signout command failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "signout command did not run");
                false
            }
        }
    }
}

fn runner_to_session(e: RunnerError) -> SessionError {
    match e {
        RunnerError::Timeout { seconds } => SessionError::Timeout { seconds },
        RunnerError::Spawn { reason } | RunnerError::Io { reason } => {
            warn!(%reason, "external command failed unexpectedly");
            SessionError::Unexpected { reason }
        }
    }
}
