//! Error reply classification
//!
//! Maps the text of an error reply to an [`ErrorKind`]. The text itself is
//! never rewritten; callers always see the server's message verbatim.

use crate::error::{ErrorKind, RedwireError};

/// Classify the text of an error reply
pub fn classify(message: &str) -> ErrorKind {
    let (code, rest) = message.split_once(' ').unwrap_or((message, ""));

    match code {
        "WRONGTYPE" => ErrorKind::WrongType,
        "ERR" => classify_generic(rest),
        _ => ErrorKind::ServerError,
    }
}

/// Classify the remainder of an `ERR` reply
fn classify_generic(rest: &str) -> ErrorKind {
    if rest.starts_with("value is not an integer") {
        return ErrorKind::NotAnInteger;
    }
    if rest.starts_with("value is not a valid float") {
        return ErrorKind::NotAFloat;
    }
    if let Some(command) = rest.strip_prefix("invalid expire time in ") {
        // "in setex" and, on newer servers, "in 'setex' command"
        let command = command.trim_end_matches(" command").trim_matches('\'');
        return if command.eq_ignore_ascii_case("setex") || command.eq_ignore_ascii_case("psetex")
        {
            ErrorKind::InvalidExpireTimeFixed
        } else {
            ErrorKind::InvalidExpireTime
        };
    }
    ErrorKind::ServerError
}

/// Build the caller-facing error for an error reply
pub fn into_error(message: String) -> RedwireError {
    RedwireError::Server {
        kind: classify(&message),
        message,
    }
}
