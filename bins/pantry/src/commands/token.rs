//! Token command - issue admin session tokens

use super::Context;
use anyhow::Result;
use owo_colors::OwoColorize;
use pantry_cli::output::Status;
use pantry_core::session::{SessionPolicy, SessionStore};
use pantry_core::Error;

/// Issue a token for `identity` using the configured session policy
///
/// The store lives for this process only, so the token is printed for use
/// by an embedding service rather than stored.
pub fn issue(ctx: &Context, identity: String) -> Result<()> {
    let identity = identity.trim().to_string();
    if identity.is_empty() {
        return Err(Error::invalid_input("Identity must not be empty").into());
    }

    let store = SessionStore::new(SessionPolicy::from(&ctx.config.schema.session));
    let session = store.issue(identity);
    let session = store.validate(&session.token).map_err(Error::from)?;

    if ctx.json {
        return ctx.print_json(&session);
    }

    Status::success(&format!("Issued token for {}", session.identity.bold()));
    println!("  {}", session.token);
    println!("  {} {}", "expires".dimmed(), session.expires_at.to_rfc3339());
    Ok(())
}
