//! `coldvault check`: validate a candidate prefix or suffix.

use crate::cli::output;
use crate::errors::Result;
use crate::vanity::SearchRequest;

/// Execute the `check` command.
pub fn execute(text: &str) -> Result<()> {
    let request = SearchRequest::parse(text, "")?;
    output::success(&format!("'{text}' only uses address characters"));
    output::tip(&format!(
        "As a prefix it needs about {:.0} attempts on average.",
        request.estimated_attempts()
    ));

    Ok(())
}
