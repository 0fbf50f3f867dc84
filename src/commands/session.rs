use projects_client::cache::Cache;
use projects_client::error::Result;
use projects_client::FileTokenStore;

use crate::output;

pub fn login(tokens: &FileTokenStore, token: &str) -> Result<()> {
    tokens.save(token)?;
    output::print_message(&format!("Token saved to {}", tokens.path().display()));
    Ok(())
}

pub fn logout(tokens: &FileTokenStore, cache: &mut Cache) -> Result<()> {
    tokens.clear()?;
    cache.set_current(None);
    cache.save();
    output::print_message("Logged out");
    Ok(())
}
