//! Command-wrapper classification.
//!
//! Operators invoked the query helper as `gagpt -m '<payload>'`. Two
//! accepted spellings: with or without one leading space. The strip uses
//! the same fixed offsets the historical runs used - ten (or eleven)
//! characters off the front, one off the back - with no validation of the
//! text in between.

/// The helper command that marks a line as a forwarded query.
pub const WRAPPER_COMMAND: &str = "gagpt";

/// Recover the natural-language payload from a resolved command, or `None`
/// when the line is not a query invocation at all.
pub fn extract_payload(command: &str) -> Option<String> {
    let skip = if command.starts_with(WRAPPER_COMMAND) {
        10
    } else if command.starts_with(" gagpt") {
        11
    } else {
        return None;
    };

    let mut payload: Vec<char> = command.chars().skip(skip).collect();
    payload.pop();
    Some(payload.into_iter().collect())
}
