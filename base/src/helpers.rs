use std::error::Error;

/// Formats an error with its full chain of causes.
///
/// Useful for logging errors whose `Display` hides the underlying reason.
pub fn format_error_chain(err: &(dyn Error + 'static)) -> String {
    let mut s = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        s.push_str(&format!("\nCaused by: {cause}"));
        source = cause.source();
    }
    s
}
