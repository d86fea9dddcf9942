//! Utils module.

/// Strips line breaks from caller-supplied values before they are written to logs or error
/// messages, so a value cannot forge extra log lines.
pub fn sanitize_log(value: &str) -> String {
    value.replace(['\n', '\r'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_log() {
        assert_eq!(sanitize_log("did:example:a"), "did:example:a");
        assert_eq!(
            sanitize_log("did:example:a\nERROR forged entry\r\n"),
            "did:example:aERROR forged entry"
        );
    }
}
