use crate::error::{KpiError, Result};
use std::path::Path;
use tracing::debug;

/// Environment variable consulted when no token file is present.
pub const TOKEN_ENV_VAR: &str = "GHUB_API_TOKEN";

/// Default token file name, looked up in the working directory.
pub const DEFAULT_TOKEN_FILE: &str = "secret_key";

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(***)"),
            Credentials::Basic { username, .. } => {
                write!(f, "Basic {{ username: {username:?}, password: *** }}")
            }
        }
    }
}

/// Where the resolved credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    TokenFile,
    Environment,
    Fallback,
}

/// Resolve credentials once, before any forge call is made.
///
/// Order: first word of `token_file` if it exists, then the `env_token`
/// value (normally `GHUB_API_TOKEN`), then `fallback`.
pub fn resolve_credentials<F>(
    token_file: &Path,
    env_token: Option<String>,
    fallback: F,
) -> Result<(Credentials, CredentialSource)>
where
    F: FnOnce() -> Result<Credentials>,
{
    if token_file.is_file() {
        let contents = std::fs::read_to_string(token_file)?;
        let token = contents.split_whitespace().next().ok_or_else(|| {
            KpiError::Credentials(format!("token file {} is empty", token_file.display()))
        })?;
        debug!(path = %token_file.display(), "using token file");
        return Ok((Credentials::Token(token.to_string()), CredentialSource::TokenFile));
    }

    if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
        debug!(var = TOKEN_ENV_VAR, "using token from environment");
        return Ok((Credentials::Token(token.trim().to_string()), CredentialSource::Environment));
    }

    debug!("no token found, using fallback credentials");
    Ok((fallback()?, CredentialSource::Fallback))
}

/// Ask for a username and password on the terminal.
pub fn prompt_basic_credentials() -> Result<Credentials> {
    let term = console::Term::stderr();
    if !term.features().is_attended() {
        return Err(KpiError::Credentials(format!(
            "no token file and {TOKEN_ENV_VAR} is unset; cannot prompt without a terminal"
        )));
    }
    term.write_str("Username to access github with: ")?;
    let username = term.read_line()?.trim().to_string();
    if username.is_empty() {
        return Err(KpiError::Credentials("username must not be empty".to_string()));
    }
    term.write_str(&format!("Ghub pswd {username}: "))?;
    let password = term.read_secure_line()?;
    Ok(Credentials::Basic { username, password })
}
