//! Command codec - network line format to device line format
//!
//! Clients send newline-delimited text, one command per line:
//!
//! ```text
//! <actuator>,<angle>
//! ```
//!
//! The device expects the same pair space-separated:
//!
//! ```text
//! <actuator> <angle>\n
//! ```
//!
//! The angle is opaque text, forwarded verbatim. The firmware's accepted
//! range/units are not specified by the upstream producer, so no numeric
//! validation is applied here.

/// A validated actuator command extracted from one client input line
///
/// Immutable once constructed; created by [`decode_line`], consumed once
/// by the serial writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Actuator id (e.g., a named finger)
    pub actuator: String,
    /// Target angle, opaque text
    pub angle: String,
}

/// Parse one client input line into a command
///
/// Requires exactly one comma separating two non-empty trimmed fields.
/// Returns `None` for anything else; the caller logs and drops the line.
pub fn decode_line(raw: &str) -> Option<Command> {
    let line = raw.trim();
    let (actuator, angle) = line.split_once(',')?;

    // A second comma means too many fields
    if angle.contains(',') {
        return None;
    }

    let actuator = actuator.trim();
    let angle = angle.trim();
    if actuator.is_empty() || angle.is_empty() {
        return None;
    }

    Some(Command {
        actuator: actuator.to_string(),
        angle: angle.to_string(),
    })
}

/// Render a command in the device wire format
///
/// Exactly `"<actuator> <angle>\n"`: one space between fields, one
/// trailing newline, nothing else.
pub fn encode(cmd: &Command) -> String {
    format!("{} {}\n", cmd.actuator, cmd.angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_valid_line() {
        let cmd = decode_line("finger1,90").unwrap();
        assert_eq!(cmd.actuator, "finger1");
        assert_eq!(cmd.angle, "90");
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let cmd = decode_line("  thumb , 45 \r").unwrap();
        assert_eq!(cmd.actuator, "thumb");
        assert_eq!(cmd.angle, "45");
    }

    #[test]
    fn test_decode_no_separator() {
        assert_eq!(decode_line("badline"), None);
        assert_eq!(decode_line(""), None);
    }

    #[test]
    fn test_decode_too_many_fields() {
        assert_eq!(decode_line("finger1,90,extra"), None);
    }

    #[test]
    fn test_decode_empty_fields() {
        assert_eq!(decode_line(",90"), None);
        assert_eq!(decode_line("finger1,"), None);
        assert_eq!(decode_line(" , "), None);
        assert_eq!(decode_line(","), None);
    }

    #[test]
    fn test_decode_angle_is_opaque() {
        // Non-numeric angles are accepted by contract
        let cmd = decode_line("finger1,wide-open").unwrap();
        assert_eq!(cmd.angle, "wide-open");
    }

    #[test]
    fn test_encode_wire_format() {
        let cmd = Command {
            actuator: "finger2".into(),
            angle: "45".into(),
        };
        assert_eq!(encode(&cmd), "finger2 45\n");
    }

    proptest! {
        #[test]
        fn prop_decode_encode_roundtrip(
            actuator in "[a-zA-Z0-9_]{1,16}",
            angle in "[a-zA-Z0-9_.-]{1,8}",
        ) {
            let line = format!("{},{}", actuator, angle);
            let cmd = decode_line(&line).unwrap();
            prop_assert_eq!(&cmd.actuator, &actuator);
            prop_assert_eq!(&cmd.angle, &angle);

            // Re-splitting the wire line on the space recovers the pair
            let wire = encode(&cmd);
            prop_assert_eq!(wire.as_str(), format!("{} {}\n", actuator, angle));
            let trimmed = wire.trim_end();
            let (a, b) = trimmed.split_once(' ').unwrap();
            prop_assert_eq!(a, actuator);
            prop_assert_eq!(b, angle);
        }

        #[test]
        fn prop_decode_rejects_wrong_field_count(
            fields in prop::collection::vec("[a-z0-9]{1,6}", 3..6),
        ) {
            let line = fields.join(",");
            prop_assert_eq!(decode_line(&line), None);
        }
    }
}
