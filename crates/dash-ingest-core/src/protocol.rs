//! Text wire format: one tag character followed by the payload.

use crate::{Payload, PayloadKind, TelemetryMessage, TelemetryTag};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("empty datagram")]
    EmptyDatagram,
    #[error("unknown tag {0:?}")]
    UnknownTag(char),
    #[error("malformed payload {payload:?} for {tag:?}")]
    MalformedPayload { tag: TelemetryTag, payload: String },
}

/// Decodes a raw datagram. Bytes outside ASCII are replaced with `?` before parsing.
pub fn decode_datagram(bytes: &[u8]) -> Result<TelemetryMessage, DecodeError> {
    let text: String = bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect();
    decode(&text)
}

pub fn decode(text: &str) -> Result<TelemetryMessage, DecodeError> {
    let mut chars = text.chars();
    let c = chars.next().ok_or(DecodeError::EmptyDatagram)?;
    let tag = TelemetryTag::from_char(c).ok_or(DecodeError::UnknownTag(c))?;
    let raw = chars.as_str();

    let payload = match tag.payload_kind() {
        PayloadKind::Text => Payload::Text(raw.to_string()),
        // sign and surrounding whitespace (vertical tab included) are accepted,
        // anything else is malformed
        PayloadKind::Int => raw
            .trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b')
            .parse::<i32>()
            .map(Payload::Int)
            .map_err(|_| DecodeError::MalformedPayload { tag, payload: raw.to_string() })?,
    };
    Ok(TelemetryMessage { tag, payload })
}

/// Inverse of [`decode`] for canonical payloads. Used by test senders.
pub fn encode(msg: &TelemetryMessage) -> String {
    format!("{}{}", msg.tag.as_char(), msg.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_numeric_tags() {
        assert_eq!(decode("17250").unwrap(), TelemetryMessage::int(TelemetryTag::Rpm, 7250));
        assert_eq!(decode("2-12").unwrap(), TelemetryMessage::int(TelemetryTag::OilTemp, -12));
        assert_eq!(decode("a350").unwrap(), TelemetryMessage::int(TelemetryTag::LfTireTemp, 350));
        assert_eq!(
            decode("82147483647").unwrap(),
            TelemetryMessage::int(TelemetryTag::MaxLaps, i32::MAX)
        );
    }

    #[test]
    fn numeric_payload_tolerates_sign_and_whitespace() {
        assert_eq!(decode("5 8000\r\n").unwrap(), TelemetryMessage::int(TelemetryTag::MaxRpm, 8000));
        assert_eq!(decode("7+3").unwrap(), TelemetryMessage::int(TelemetryTag::LapNumber, 3));
    }

    #[test]
    fn vertical_tab_counts_as_whitespace() {
        assert_eq!(decode("5\x0b8000\x0b").unwrap(), TelemetryMessage::int(TelemetryTag::MaxRpm, 8000));
        assert_eq!(decode("3\t\x0b-4 \x0c").unwrap(), TelemetryMessage::int(TelemetryTag::WaterTemp, -4));
    }

    #[test]
    fn gear_payload_is_opaque_text() {
        assert_eq!(decode("6-1").unwrap(), TelemetryMessage::text(TelemetryTag::Gear, "-1"));
        assert_eq!(decode("6N").unwrap(), TelemetryMessage::text(TelemetryTag::Gear, "N"));
        assert_eq!(decode("6").unwrap(), TelemetryMessage::text(TelemetryTag::Gear, ""));
    }

    #[test]
    fn lap_time_is_accepted_but_not_parsed() {
        assert_eq!(decode("983.412").unwrap(), TelemetryMessage::text(TelemetryTag::LapTime, "83.412"));
    }

    #[test]
    fn rejects_unknown_tags() {
        assert_eq!(decode("z100"), Err(DecodeError::UnknownTag('z')));
        assert_eq!(decode("0100"), Err(DecodeError::UnknownTag('0')));
        assert_eq!(decode("A350"), Err(DecodeError::UnknownTag('A')));
        assert_eq!(decode(""), Err(DecodeError::EmptyDatagram));
    }

    #[test]
    fn rejects_malformed_numeric_payloads() {
        for bad in ["1", "1abc", "112.5", "1 1 2", "199999999999", "2--4"] {
            match decode(bad) {
                Err(DecodeError::MalformedPayload { tag, payload }) => {
                    assert_eq!(tag.as_char(), bad.chars().next().unwrap());
                    assert_eq!(payload, &bad[1..]);
                }
                other => panic!("{:?} decoded as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn non_ascii_bytes_become_question_marks() {
        assert_eq!(
            decode_datagram(b"6\xc3\xa9").unwrap(),
            TelemetryMessage::text(TelemetryTag::Gear, "??")
        );
        assert!(matches!(
            decode_datagram(b"1\xff12"),
            Err(DecodeError::MalformedPayload { .. })
        ));
        assert_eq!(decode_datagram(b"\xe2100"), Err(DecodeError::UnknownTag('?')));
    }

    #[test]
    fn encode_reconstructs_datagram_text() {
        for text in ["16500", "3-4", "6r", "6-1", "82147483647", "h1021", "9"] {
            assert_eq!(encode(&decode(text).unwrap()), text);
        }
    }
}
