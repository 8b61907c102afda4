//! Access token commands: `token set`, `token clear`, `token validate`.

use anyhow::Result;

/// Store a token in the local store and probe it against the remote.
pub fn set(token: &str) -> Result<()> {
    let app = super::open()?;

    if !app.sync.tokens().save(token) {
        anyhow::bail!("Failed to write the token to the local store.");
    }
    println!("Token stored.");

    if app.sync.validate_token(Some(token)) {
        app.store.set_authenticated(true);
        println!("Token accepted by the remote.");
    } else {
        println!("Warning: the remote did not accept the token (or is unreachable).");
    }

    Ok(())
}

/// Remove the stored token after confirmation.
pub fn clear(yes: bool) -> Result<()> {
    if !yes && !super::confirm("Clear the stored token?")? {
        println!("Aborted.");
        return Ok(());
    }

    let app = super::open()?;
    app.sync.tokens().clear();
    app.store.set_authenticated(false);
    println!("Token cleared.");
    Ok(())
}

/// Check that the effective token (env var or stored) is accepted.
pub fn validate() -> Result<()> {
    let app = super::open()?;

    if app.sync.tokens().resolve().is_none() {
        anyhow::bail!(
            "No token configured. Set one with `lifelog token set` or export {}.",
            crate::constants::TOKEN_ENV_VAR
        );
    }

    if app.sync.validate_token(None) {
        app.store.set_authenticated(true);
        println!("Token is valid.");
        Ok(())
    } else {
        app.store.set_authenticated(false);
        anyhow::bail!("Token was rejected by the remote.")
    }
}
