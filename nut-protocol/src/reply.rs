//! Single-line reply decoding
//!
//! A simple reply is either `OK ...`, `ERR <token> ...`, or the operation's
//! own success line (e.g. `UPSDESC <ups> "<desc>"`).

use nut_core::{Command, NutError, NutResult};

/// Error token that marks an authentication failure
pub const ACCESS_DENIED: &str = "ACCESS-DENIED";

/// Decode one raw reply line
///
/// # Arguments
/// * `command` - The command this line answers, used in error messages (redacted)
/// * `raw` - The line as read from the stream, terminator included
/// * `expected_prefix` - Prefix the reply must start with, if any
///
/// # Returns
/// The reply text without its line terminator
///
/// # Errors
/// - `ConnectionClosed` if `raw` is empty (the peer closed the stream)
/// - `InvalidData` if the line is not valid UTF-8
/// - `Login` / `Command` for an `ERR` reply, see [`classify_err`]
/// - `Protocol` if the reply does not start with `expected_prefix`
pub fn decode_line(command: &Command, raw: &[u8], expected_prefix: Option<&str>) -> NutResult<String> {
    if raw.is_empty() {
        return Err(NutError::ConnectionClosed(format!(
            "server closed the connection while waiting for reply to {}",
            command
        )));
    }

    let line = std::str::from_utf8(raw)
        .map_err(|e| NutError::InvalidData(format!("reply to {} is not UTF-8: {}", command, e)))?
        .trim_end_matches(['\r', '\n']);

    if is_err_line(line) {
        return Err(classify_err(command, line));
    }

    if let Some(prefix) = expected_prefix {
        if !line.starts_with(prefix) {
            return Err(NutError::Protocol(format!(
                "unexpected reply to {}: {:?}",
                command, line
            )));
        }
    }

    Ok(line.to_string())
}

/// Whether a reply line is an `ERR` reply
pub fn is_err_line(line: &str) -> bool {
    line == "ERR" || line.starts_with("ERR ")
}

/// Turn an `ERR` line into a typed error
///
/// `ERR ACCESS-DENIED` is a login failure whichever command it answers;
/// every other token is a command rejection.
pub fn classify_err(command: &Command, line: &str) -> NutError {
    let token = line.split_whitespace().nth(1).unwrap_or_default();
    if token == ACCESS_DENIED {
        NutError::Login(format!("{}: {}", command, line))
    } else {
        NutError::Command(format!("{}: {}", command, line))
    }
}

/// Strip a single pair of surrounding double quotes
pub fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

/// Extract the description from an `UPSDESC <ups> "<desc>"` reply
pub fn parse_description(command: &Command, line: &str) -> NutResult<String> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(_), Some(description)) => Ok(unquote(description.trim()).to_string()),
        _ => Err(NutError::Protocol(format!(
            "unexpected reply to {}: {:?}",
            command, line
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nut_core::ErrorKind;

    #[test]
    fn test_decode_ok() {
        let command = Command::instant_command("test", "valid", None);
        assert_eq!(decode_line(&command, b"OK\n", None).unwrap(), "OK");
        assert_eq!(decode_line(&command, b"OK\r\n", Some("OK")).unwrap(), "OK");
    }

    #[test]
    fn test_decode_empty_is_connection_closed() {
        let err = decode_line(&Command::list_ups(), b"", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionClosed);
    }

    #[test]
    fn test_decode_err_is_command_error() {
        let command = Command::instant_command("test", "invalid", None);
        let err = decode_line(&command, b"ERR UNKNOWN-COMMAND\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Command);
        let message = err.to_string();
        assert!(message.contains("UNKNOWN-COMMAND"));
        assert!(message.contains("INSTCMD test invalid"));
    }

    #[test]
    fn test_access_denied_is_login_error() {
        let err = decode_line(&Command::list_ups(), b"ERR ACCESS-DENIED\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Login);
        assert!(err.to_string().contains("LIST"));

        let err = decode_line(&Command::password("pw"), b"ERR ACCESS-DENIED\n", Some("OK"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Login);
        assert!(err.to_string().contains("PASSWORD"));
        assert!(!err.to_string().contains("pw:"));
    }

    #[test]
    fn test_unexpected_prefix_is_protocol_error() {
        let command = Command::get_description("test");
        let err = decode_line(&command, b"VAR test x \"y\"\n", Some("UPSDESC")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert!(err.to_string().contains("VAR test x"));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = decode_line(&Command::list_ups(), b"\xff\xfe\n", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_err_prefix_must_be_a_word() {
        assert!(is_err_line("ERR"));
        assert!(is_err_line("ERR DATA-STALE"));
        assert!(!is_err_line("ERRATA"));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"demo ups\""), "demo ups");
        assert_eq!(unquote("bare"), "bare");
        assert_eq!(unquote("\"\"quoted\"\""), "\"quoted\"");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn test_parse_description() {
        let command = Command::get_description("test");
        assert_eq!(
            parse_description(&command, "UPSDESC test \"demo ups\"").unwrap(),
            "demo ups"
        );
        assert!(parse_description(&command, "UPSDESC").is_err());
    }
}
