//! Position acquisition seam.
//!
//! The portal this tool replaces asked the browser for a single
//! high-accuracy fix; a terminal has no such capability built in, so the
//! request goes through the `LocationProvider` trait instead. Production
//! use points `gps_command` at any helper that prints a JSON fix
//! (CoreLocation shims, gpsd wrappers, termux-location); fixed coordinates
//! serve desks without a receiver and the test suite.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::Coordinate;
use serde::Deserialize;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Acquisition failures, kept distinct because the user guidance differs:
/// permission problems need a settings change, the rest need a retry.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error(
        "no positioning capability is available: set 'gps_command' or fixed coordinates in the configuration, or pass --lat/--lon"
    )]
    Unsupported,

    #[error("location permission denied: {0}")]
    PermissionDenied(String),

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("timed out waiting for a position fix ({0} s)")]
    Timeout(u64),
}

/// Constraints for one position request. Defaults follow the clock-in/out
/// contract: high-accuracy mode, 10 second wait, no cached fix.
#[derive(Debug, Clone, Copy)]
pub struct GeoRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_age: Duration,
}

impl Default for GeoRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

pub trait LocationProvider {
    fn current_position(&self, req: &GeoRequest) -> Result<Coordinate, GeoError>;
}

// ---------------------------------------------------------------
// External command provider
// ---------------------------------------------------------------

/// Payload expected on the helper command's stdout.
#[derive(Deserialize)]
struct RawFix {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    accuracy: Option<f64>,
}

/// Runs a configured shell command that prints a JSON fix.
///
/// The request parameters are exported as GEOCLOCK_HIGH_ACCURACY,
/// GEOCLOCK_TIMEOUT_SECS and GEOCLOCK_MAX_AGE_SECS so the helper can pass
/// them through. Exit code 2 means permission denied, 3 means no fix;
/// anything else non-zero is treated as position unavailable.
pub struct CommandProvider {
    command: String,
}

impl CommandProvider {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn spawn(&self, req: &GeoRequest) -> Result<std::process::Child, GeoError> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.command);
            c
        };

        cmd.env(
            "GEOCLOCK_HIGH_ACCURACY",
            if req.high_accuracy { "1" } else { "0" },
        )
        .env("GEOCLOCK_TIMEOUT_SECS", req.timeout.as_secs().to_string())
        .env("GEOCLOCK_MAX_AGE_SECS", req.max_age.as_secs().to_string())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null());

        cmd.spawn()
            .map_err(|e| GeoError::PositionUnavailable(format!("cannot run gps_command: {}", e)))
    }
}

impl LocationProvider for CommandProvider {
    fn current_position(&self, req: &GeoRequest) -> Result<Coordinate, GeoError> {
        let mut child = self.spawn(req)?;

        // Enforce the request timeout ourselves: poll the child and kill it
        // once the deadline passes.
        let deadline = Instant::now() + req.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(GeoError::Timeout(req.timeout.as_secs()));
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }
                Err(e) => {
                    return Err(GeoError::PositionUnavailable(format!(
                        "gps_command failed: {}",
                        e
                    )));
                }
            }
        };

        let mut stdout = String::new();
        if let Some(mut out) = child.stdout.take() {
            out.read_to_string(&mut stdout).ok();
        }
        let mut stderr = String::new();
        if let Some(mut err) = child.stderr.take() {
            err.read_to_string(&mut stderr).ok();
        }

        if !status.success() {
            let detail = if stderr.trim().is_empty() {
                format!("gps_command exited with {}", status)
            } else {
                stderr.trim().to_string()
            };

            return match status.code() {
                Some(2) => Err(GeoError::PermissionDenied(detail)),
                Some(3) => Err(GeoError::PositionUnavailable(detail)),
                _ => Err(GeoError::PositionUnavailable(detail)),
            };
        }

        let raw: RawFix = serde_json::from_str(stdout.trim()).map_err(|e| {
            GeoError::PositionUnavailable(format!("gps_command output is not a valid fix: {}", e))
        })?;

        Coordinate::with_accuracy(raw.latitude, raw.longitude, raw.accuracy)
            .map_err(|e| GeoError::PositionUnavailable(e.to_string()))
    }
}

// ---------------------------------------------------------------
// Fixed provider
// ---------------------------------------------------------------

/// Always returns the same coordinates. A pinned position is never stale,
/// so the max-age constraint holds trivially.
pub struct FixedProvider {
    fix: Coordinate,
}

impl FixedProvider {
    pub fn new(fix: Coordinate) -> Self {
        Self { fix }
    }
}

impl LocationProvider for FixedProvider {
    fn current_position(&self, _req: &GeoRequest) -> Result<Coordinate, GeoError> {
        Ok(self.fix)
    }
}

// ---------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------

/// Pick the provider for a user action: a CLI `--lat/--lon` override wins,
/// then the configured command, then configured fixed coordinates. With
/// none of those the platform simply has no positioning capability.
pub fn resolve_provider(
    override_fix: Option<Coordinate>,
    cfg: &Config,
) -> AppResult<Box<dyn LocationProvider>> {
    if let Some(fix) = override_fix {
        return Ok(Box::new(FixedProvider::new(fix)));
    }

    if let Some(command) = &cfg.gps_command {
        return Ok(Box::new(CommandProvider::new(command.clone())));
    }

    if let (Some(lat), Some(lon)) = (cfg.fixed_latitude, cfg.fixed_longitude) {
        let fix = Coordinate::new(lat, lon)
            .map_err(|e| AppError::Config(format!("fixed coordinates: {}", e)))?;
        return Ok(Box::new(FixedProvider::new(fix)));
    }

    Err(GeoError::Unsupported.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_matches_contract() {
        let req = GeoRequest::default();
        assert!(req.high_accuracy);
        assert_eq!(req.timeout, Duration::from_secs(10));
        assert_eq!(req.max_age, Duration::ZERO);
    }

    #[test]
    fn fixed_provider_returns_its_fix() {
        let fix = Coordinate::new(52.0907, 5.1214).unwrap();
        let p = FixedProvider::new(fix);
        let got = p.current_position(&GeoRequest::default()).unwrap();
        assert_eq!(got, fix);
    }

    #[cfg(unix)]
    #[test]
    fn command_provider_parses_json_fix() {
        let p = CommandProvider::new(
            r#"echo '{"latitude": 52.0907, "longitude": 5.1214, "accuracy": 8.0}'"#,
        );
        let got = p.current_position(&GeoRequest::default()).unwrap();
        assert_eq!(got.latitude, 52.0907);
        assert_eq!(got.accuracy, Some(8.0));
    }

    #[cfg(unix)]
    #[test]
    fn command_provider_maps_permission_exit_code() {
        let p = CommandProvider::new("echo 'location access is off' >&2; exit 2");
        match p.current_position(&GeoRequest::default()) {
            Err(GeoError::PermissionDenied(msg)) => assert!(msg.contains("location access")),
            other => panic!("expected PermissionDenied, got {:?}", other.err()),
        }
    }

    #[cfg(unix)]
    #[test]
    fn command_provider_times_out() {
        let p = CommandProvider::new("sleep 5");
        let req = GeoRequest {
            timeout: Duration::from_millis(100),
            ..GeoRequest::default()
        };
        match p.current_position(&req) {
            Err(GeoError::Timeout(_)) => {}
            other => panic!("expected Timeout, got {:?}", other.err()),
        }
    }

    #[cfg(unix)]
    #[test]
    fn command_provider_rejects_garbage_output() {
        let p = CommandProvider::new("echo 'not json'");
        assert!(matches!(
            p.current_position(&GeoRequest::default()),
            Err(GeoError::PositionUnavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn command_provider_rejects_out_of_range_fix() {
        let p = CommandProvider::new(r#"echo '{"latitude": 123.0, "longitude": 5.0}'"#);
        assert!(matches!(
            p.current_position(&GeoRequest::default()),
            Err(GeoError::PositionUnavailable(_))
        ));
    }
}
