use std::env::VarError;
use std::net::{Ipv4Addr, SocketAddr};

use dotenvy::dotenv;

use crate::callback::CALLBACK_PREFIX;
use crate::error::CallbackError;
use crate::port::{resolve_port, PortProbe};

pub const PORT_ENV_KEY: &str = "OAUTH2_CALLBACK_PORT";
pub const LOG_ENV_KEY: &str = "OAUTH2_CALLBACK_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Parses user supplied port text. Accepts decimal integers in 1..=65535.
pub fn parse_port(raw: &str) -> Result<u16, CallbackError> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port >= 1 => Ok(port),
        _ => Err(CallbackError::invalid_port()),
    }
}

/// Loads `.env` from the working directory or its parents. Variables already
/// set in the process environment win.
pub fn load_dotenv() {
    let _ = dotenv();
}

/// Port to request: the command line flag, else `OAUTH2_CALLBACK_PORT`.
pub fn requested_port(flag: Option<u16>) -> Result<Option<u16>, CallbackError> {
    load_dotenv();
    requested_port_from(flag, std::env::var(PORT_ENV_KEY))
}

fn requested_port_from(
    flag: Option<u16>,
    env_value: Result<String, VarError>,
) -> Result<Option<u16>, CallbackError> {
    if flag.is_some() {
        return Ok(flag);
    }

    match env_value {
        Ok(value) if !value.trim().is_empty() => parse_port(&value).map(Some),
        Ok(_) => Ok(None),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(CallbackError::InvalidArgument(format!(
            "environment variable {} contains invalid unicode",
            PORT_ENV_KEY
        ))),
    }
}

pub fn log_level_from_env() -> String {
    load_dotenv();
    log_level_from(std::env::var(LOG_ENV_KEY))
}

fn log_level_from(env_value: Result<String, VarError>) -> String {
    env_value
        .ok()
        .filter(|level| !level.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Port settings fixed at startup. Only [`ServerConfig::resolve`] builds one.
///
/// ```compile_fail
/// let config = oauth2_callback_server::ServerConfig {
///     requested_port: None,
///     resolved_port: 0,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    requested_port: Option<u16>,
    resolved_port: u16,
}

impl ServerConfig {
    pub fn resolve<P>(requested_port: Option<u16>, probe: &P) -> Result<Self, CallbackError>
    where
        P: PortProbe + ?Sized,
    {
        let resolved_port = resolve_port(requested_port, probe)?;
        Ok(Self {
            requested_port,
            resolved_port,
        })
    }

    pub fn requested_port(&self) -> Option<u16> {
        self.requested_port
    }

    pub fn resolved_port(&self) -> u16 {
        self.resolved_port
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(Ipv4Addr::LOCALHOST.into(), self.resolved_port)
    }

    pub fn callback_url(&self) -> String {
        format!("http://{}{}", self.bind_addr(), CALLBACK_PREFIX)
    }
}
