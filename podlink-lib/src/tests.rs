use crate::command::{AdvancedCommand, BUTTON_RELEASE, CommandSet, Mode, SWITCH_TO_ADVANCED, SimpleCommand};
use crate::error::{DecodeError, EncodeError};
use crate::packet::{Packet, checksum, encode, length_field_size};
use bytes::Bytes;

#[test]
fn test_play_pause_encoding() {
    let packet = SimpleCommand::PlayPause
        .template()
        .packet(None)
        .expect("Failed to build packet");

    assert_eq!(
        packet.encode().as_ref(),
        hex::decode("ff5503020001fa").unwrap().as_slice(),
        "Play/pause frame does not match the reference bytes"
    );
    assert_eq!(packet.checksum(), 0xFA);
}

#[test]
fn test_fixed_session_packets() {
    let switch = SWITCH_TO_ADVANCED.packet(None).unwrap();
    assert_eq!(hex::encode(switch.encode()), "ff5503000104f8");

    let release = BUTTON_RELEASE.packet(None).unwrap();
    assert_eq!(hex::encode(release.encode()), "ff5503020000fb");
}

#[test]
fn test_checksum_formula() {
    // (0x100 - (length + mode + command + payload)) & 0xFF
    assert_eq!(checksum(3, 0x02, &[0x00, 0x01], None), 0xFA);
    assert_eq!(checksum(4, 0x04, &[0x00, 0x18], Some(&[0x05])), 0xDB);

    // Sums past 0x100 wrap
    assert_eq!(checksum(4, 0x80, &[0x80, 0x80], Some(&[0x01])), 0x7B);
}

#[test]
fn test_checksum_ignores_absent_versus_empty_payload() {
    assert_eq!(
        checksum(3, 0x02, &[0x00, 0x01], None),
        checksum(3, 0x02, &[0x00, 0x01], Some(&[]))
    );
}

#[test]
fn test_checksum_is_deterministic_and_sensitive_to_payload() {
    let payload = [0x05, 0x00, 0x00, 0x00, 0x10];
    let first = checksum(8, 0x04, &[0x00, 0x17], Some(&payload));
    let second = checksum(8, 0x04, &[0x00, 0x17], Some(&payload));
    assert_eq!(first, second);

    for i in 0..payload.len() {
        let mut changed = payload;
        changed[i] = changed[i].wrapping_add(1);
        assert_ne!(
            checksum(8, 0x04, &[0x00, 0x17], Some(&changed)),
            first,
            "Changing payload byte {} did not change the checksum",
            i
        );
    }
}

#[test]
fn test_encode_decode_roundtrip() {
    let cases: Vec<(u8, Vec<u8>, Option<Vec<u8>>)> = vec![
        (0x02, vec![0x00, 0x01], None),
        (0x00, vec![0x01, 0x04], None),
        (0x04, vec![0x00, 0x18], Some(vec![0x05])),
        (0x04, vec![0x00, 0x1A], Some(vec![0x05, 0, 0, 0, 0, 0, 0, 0, 3])),
        (0x04, vec![0x00, 0x1B], Some(b"\x00\x00\x00\x01Song Two\x00".to_vec())),
    ];

    for (mode, command, payload) in cases {
        let bytes = encode(mode, &command, payload.as_deref()).expect("Failed to encode");
        let packet = Packet::decode(&bytes).expect("Failed to decode");
        assert_eq!(packet.mode(), mode);
        assert_eq!(packet.command(), command.as_slice());
        assert_eq!(packet.payload(), payload.as_deref());
        assert_eq!(packet.encode(), bytes, "Re-encoding changed the frame");
    }
}

#[test]
fn test_decode_response_fields() {
    let bytes = hex::decode("ff55070400190000002ab2").unwrap();
    let packet = Packet::decode(&bytes).expect("Failed to decode");

    assert_eq!(packet.mode(), u8::from(Mode::Advanced));
    assert_eq!(packet.command(), &[0x00, 0x19]);
    assert_eq!(packet.payload(), Some(&[0x00, 0x00, 0x00, 0x2A][..]));
    assert_eq!(packet.length(), 7);
}

#[test]
fn test_decode_empty_payload_is_none() {
    let bytes = hex::decode("ff5503000003fa").unwrap();
    let packet = Packet::decode(&bytes).expect("Failed to decode");
    assert_eq!(packet.payload(), None);
    assert!(packet.payload_bytes().is_empty());
}

#[test]
fn test_decode_bad_header() {
    let result = Packet::decode(&[0xFF, 0x56, 0x03, 0x02, 0x00, 0x01, 0xFA]);
    assert_eq!(result, Err(DecodeError::BadHeader { found: [0xFF, 0x56] }));

    let result = Packet::decode(&[0x55, 0xFF, 0x03]);
    assert!(matches!(result, Err(DecodeError::BadHeader { .. })));
}

#[test]
fn test_decode_truncated() {
    let full = hex::decode("ff55070400190000002ab2").unwrap();

    for len in 0..full.len() {
        match Packet::decode(&full[..len]) {
            Err(DecodeError::Truncated { actual, .. }) => assert_eq!(actual, len),
            other => panic!("{} bytes: expected Truncated, got {:?}", len, other),
        }
    }

    assert_eq!(
        Packet::decode(&full[..6]),
        Err(DecodeError::Truncated {
            expected: full.len(),
            actual: 6
        })
    );
}

#[test]
fn test_decode_checksum_mismatch() {
    let mut bytes = hex::decode("ff55070400190000002ab2").unwrap();
    *bytes.last_mut().unwrap() = 0xB3;

    assert_eq!(
        Packet::decode(&bytes),
        Err(DecodeError::ChecksumMismatch {
            expected: 0xB2,
            actual: 0xB3
        })
    );
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let bytes = hex::decode("ff5503020001fa0000").unwrap();
    let packet = Packet::decode(&bytes).expect("Failed to decode");
    assert_eq!(packet.command(), &[0x00, 0x01]);
    assert_eq!(packet.payload(), None);
}

#[test]
fn test_decode_with_explicit_command_len() {
    let bytes = encode(0x02, &[0x00, 0x00, 0x00, 0x40], None).unwrap();

    let packet = Packet::decode_with_command_len(&bytes, 4).unwrap();
    assert_eq!(packet.command(), &[0x00, 0x00, 0x00, 0x40]);
    assert_eq!(packet.payload(), None);

    // The default response width splits the same body differently
    let packet = Packet::decode(&bytes).unwrap();
    assert_eq!(packet.command(), &[0x00, 0x00]);
    assert_eq!(packet.payload(), Some(&[0x00, 0x40][..]));
}

#[test]
fn test_length_boundary() {
    // mode + 2-byte command + 251 payload bytes = 254
    let short = Packet::new(0x04, Bytes::from_static(&[0x00, 0x1B]), Some(Bytes::from(vec![0x41u8; 251]))).unwrap();
    assert_eq!(short.length(), 254);
    let encoded = short.encode();
    assert_eq!(encoded[2], 254);
    assert_eq!(encoded.len(), 2 + 1 + 254 + 1);
    assert_eq!(length_field_size(254), 1);

    // One more byte switches to 0x00 <hi> <lo>
    let long = Packet::new(0x04, Bytes::from_static(&[0x00, 0x1B]), Some(Bytes::from(vec![0x41u8; 252]))).unwrap();
    assert_eq!(long.length(), 255);
    let encoded = long.encode();
    assert_eq!(&encoded[2..5], &[0x00, 0x00, 0xFF]);
    assert_eq!(encoded.len(), 2 + 3 + 255 + 1);
    assert_eq!(length_field_size(255), 3);

    let decoded = Packet::decode(&encoded).expect("Failed to decode extended frame");
    assert_eq!(decoded, long);
}

#[test]
fn test_new_rejects_invalid_packets() {
    assert_eq!(Packet::new(0x02, Bytes::new(), None), Err(EncodeError::EmptyCommand));

    let huge = Bytes::from(vec![0u8; u16::MAX as usize]);
    assert_eq!(
        Packet::new(0x04, Bytes::from_static(&[0x00, 0x1B]), Some(huge)),
        Err(EncodeError::TooLong {
            length: u16::MAX as usize + 3
        })
    );
}

#[test]
fn test_command_tables() {
    assert_eq!(SimpleCommand::lookup("play_pause"), Some(SimpleCommand::PlayPause.template()));
    assert_eq!(
        SimpleCommand::lookup("scroll_down").map(|t| t.command),
        Some(&[0x00, 0x00, 0x00, 0x00, 0x02][..])
    );
    assert_eq!(SimpleCommand::lookup("get_screen_size"), None);

    let template = AdvancedCommand::lookup("get_amount_of_type").expect("Missing command");
    assert_eq!(template.mode, Mode::Advanced);
    assert_eq!(template.command, &[0x00, 0x18]);
    assert_eq!(template.code(), 0x0018);

    assert_eq!(SimpleCommand::names().len(), 21);
    assert_eq!(AdvancedCommand::names().len(), 20);
    assert!(AdvancedCommand::names().contains(&"get_names_for_items"));
}

#[test]
fn test_every_template_is_non_empty_and_unique() {
    let simple: Vec<_> = SimpleCommand::names()
        .into_iter()
        .filter_map(SimpleCommand::lookup)
        .collect();
    assert_eq!(simple.len(), SimpleCommand::names().len());
    for (i, a) in simple.iter().enumerate() {
        assert!(!a.command.is_empty());
        assert_eq!(a.mode, Mode::Simple);
        for b in &simple[i + 1..] {
            assert_ne!(a.command, b.command);
        }
    }
}

#[test]
fn test_mode_from_byte() {
    use num_enum::FromPrimitive;
    assert_eq!(Mode::from_primitive(0x04), Mode::Advanced);
    assert_eq!(Mode::from_primitive(0x02), Mode::Simple);
    assert_eq!(Mode::from_primitive(0x07), Mode::Unknown(0x07));
}
