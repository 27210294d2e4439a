//! Credential discovery for the osu! API

use std::io::{IsTerminal, Write};
use std::sync::Mutex;

use osu_collect_core::{CredentialProvider, Credentials, Error, Result};

const CLIENT_ID_VAR: &str = "OSU_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "OSU_CLIENT_SECRET";

/// Resolves client credentials from the environment, falling back to an
/// interactive prompt when attached to a terminal.
///
/// The first successful resolution is cached so token refreshes never
/// prompt again.
pub struct EnvCredentials {
    cached: Mutex<Option<Credentials>>,
}

impl EnvCredentials {
    pub fn new() -> Self {
        Self {
            cached: Mutex::new(None),
        }
    }

    fn from_env() -> Option<Credentials> {
        let client_id = std::env::var(CLIENT_ID_VAR).ok()?;
        let client_secret = std::env::var(CLIENT_SECRET_VAR).ok()?;
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return None;
        }
        Some(Credentials {
            client_id,
            client_secret,
        })
    }

    fn prompt() -> Result<Credentials> {
        if !std::io::stdin().is_terminal() {
            return Err(Error::MissingCredentials);
        }
        eprintln!("osu! API credentials required (https://osu.ppy.sh/home/account/edit#oauth)");
        let client_id = Self::read_line("Client ID: ")?;
        let client_secret = Self::read_line("Client secret: ")?;
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(Error::MissingCredentials);
        }
        Ok(Credentials {
            client_id,
            client_secret,
        })
    }

    fn read_line(prompt: &str) -> Result<String> {
        eprint!("{}", prompt);
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(credentials) = cached.as_ref() {
            return Ok(credentials.clone());
        }
        let credentials = match Self::from_env() {
            Some(credentials) => credentials,
            None => Self::prompt()?,
        };
        *cached = Some(credentials.clone());
        Ok(credentials)
    }
}
