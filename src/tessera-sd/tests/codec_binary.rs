use chrono::{TimeZone, Utc};
use tessera_sd::{
    codec::{DecodeErrorKind, BINARY_HEADER, MAX_RECURSION_LIMIT},
    decode, encode,
    types::Uuid,
    Array, Codec, CodecOptions, DecodeError, Kind, Map, Uri, Value,
};

const SCENARIO: &[u8] = b"{\x03\x00\x00\x00\
k\x02\x00\x00\x00ok1\
k\x05\x00\x00\x00counti\x03\x00\x00\x00\
k\x05\x00\x00\x00items[\x02\x00\x00\x00s\x01\x00\x00\x00as\x01\x00\x00\x00b]\
}";

fn scenario() -> Value {
    let mut items = Array::new();
    items.push_str("a");
    items.push_str("b");

    let mut map = Map::new();
    map.insert("ok", true);
    map.insert("count", 3);
    map.insert("items", items);
    Value::Map(map)
}

fn every_kind() -> Array {
    let mut array = Array::new();
    array.push(Value::Unknown);
    array.push(true);
    array.push(false);
    array.push(i32::MIN);
    array.push(-0.125);
    array.push(Value::from_string("embedded\0zero"));
    array.push(Uuid::random());
    array.push(Utc.timestamp_opt(-86_399, 123_456_789).single());
    array.push(Uri::parse("https://example.com/caps?id=7"));
    array.push(Uri::parse("relative/path"));
    array.push(Value::from_binary([0u8, 1, 2, 0xff]));
    array.push(Map::new());
    array.push(Array::new());
    array
}

fn assert_error(result: Result<Value, DecodeError>, offset: usize, kind: DecodeErrorKind) {
    match result {
        Ok(value) => panic!("decoded {value:?}, expected {kind} at offset {offset}"),
        Err(e) => assert_eq!(e, DecodeError { offset, kind }),
    }
}

#[test]
fn scenario_bytes() -> Result<(), DecodeError> {
    let bytes = encode(&scenario());
    assert_eq!(bytes, SCENARIO);

    let decoded = decode(&bytes)?;
    assert_eq!(decoded["count"].as_integer(), 3);
    assert_eq!(decoded["items"][1].as_string(), "b");
    assert_eq!(decoded["missing"].kind(), Kind::Unknown);
    assert!(decoded["ok"].as_boolean());
    assert_eq!(decoded, scenario());

    Ok(())
}

#[test]
fn scalar_bytes() {
    assert_eq!(encode(&Value::Unknown), b"!");
    assert_eq!(encode(&Value::from_integer(-2)), b"i\xfe\xff\xff\xff");
    assert_eq!(
        encode(&Value::from_real(1.0)),
        b"r\x00\x00\x00\x00\x00\x00\xf0\x3f"
    );
    assert_eq!(
        encode(&Value::from_binary(*b"\x00z")),
        b"b\x02\x00\x00\x00\x00z"
    );
    assert_eq!(
        encode(&Value::from_date(Utc.timestamp_opt(1, 2).unwrap())),
        b"d\x01\x00\x00\x00\x00\x00\x00\x00\x02\x00\x00\x00"
    );

    let id: Uuid = "11f8aa9c-b071-4242-836b-13b7abe0d489".parse().unwrap();
    assert_eq!(
        encode(&Value::from_uuid(id)),
        b"u\x11\xf8\xaa\x9c\xb0\x71\x42\x42\x83\x6b\x13\xb7\xab\xe0\xd4\x89"
    );
}

#[test]
fn round_trips_every_kind() -> Result<(), DecodeError> {
    let value = Value::Array(every_kind());
    assert_eq!(decode(&encode(&value))?, value);

    Ok(())
}

#[test]
fn round_trips_nested_containers() -> Result<(), DecodeError> {
    let mut value = Value::Array(every_kind());
    for depth in 0..5 {
        let mut map = Map::new();
        map.insert(format!("level{depth}"), value);
        map.insert("siblings", every_kind());
        map.insert("", Value::from_string("empty key"));
        value = Value::Map(map);
    }

    let decoded = decode(&encode(&value))?;
    assert_eq!(decoded, value);
    assert_eq!(
        decoded["level4"]["level3"]["level2"]["siblings"][5].as_string(),
        "embedded\0zero"
    );

    Ok(())
}

#[test]
fn header_is_optional() -> Result<(), DecodeError> {
    let codec = Codec::new(CodecOptions {
        binary_header: true,
        ..Default::default()
    });

    let bytes = codec.encode(&scenario());
    assert!(bytes.starts_with(BINARY_HEADER));
    assert_eq!(&bytes[BINARY_HEADER.len()..], SCENARIO);

    assert_eq!(decode(&bytes)?, scenario());
    assert_eq!(codec.decode(SCENARIO)?, scenario());

    Ok(())
}

#[test]
fn write_matches_encode() -> std::io::Result<()> {
    let mut out = Vec::new();
    Codec::default().write(&scenario(), &mut out)?;
    assert_eq!(out, SCENARIO);

    Ok(())
}

#[test]
fn duplicate_keys_keep_last() -> Result<(), DecodeError> {
    let bytes = b"{\x02\x00\x00\x00k\x01\x00\x00\x00ai\x01\x00\x00\x00k\x01\x00\x00\x00ai\x02\x00\x00\x00}";
    let decoded = decode(bytes)?;

    assert_eq!(decoded.as_map().map(|m| m.len()), Some(1));
    assert_eq!(decoded["a"].as_integer(), 2);

    Ok(())
}

#[test]
fn truncated_input() {
    assert_error(decode(b""), 0, DecodeErrorKind::UnexpectedEof { need: 1 });
    assert_error(
        decode(b"i\x01\x00"),
        1,
        DecodeErrorKind::UnexpectedEof { need: 2 },
    );
    assert_error(
        decode(b"s\x05\x00\x00\x00abc"),
        5,
        DecodeErrorKind::UnexpectedEof { need: 2 },
    );
    assert_error(
        decode(&SCENARIO[..SCENARIO.len() - 1]),
        SCENARIO.len() - 1,
        DecodeErrorKind::UnexpectedEof { need: 1 },
    );
}

#[test]
fn oversized_counts_fail_without_allocating() {
    assert_error(
        decode(b"[\xff\xff\xff\xff"),
        5,
        DecodeErrorKind::UnexpectedEof { need: 1 },
    );
    assert_error(
        decode(b"{\xff\xff\xff\xff"),
        5,
        DecodeErrorKind::UnexpectedEof { need: 1 },
    );
}

#[test]
fn malformed_input() {
    assert_error(decode(b"x"), 0, DecodeErrorKind::UnknownTag(b'x'));
    assert_error(
        decode(b"[\x01\x00\x00\x00?]"),
        5,
        DecodeErrorKind::UnknownTag(b'?'),
    );
    assert_error(
        decode(b"{\x01\x00\x00\x00s\x01\x00\x00\x00a!}"),
        5,
        DecodeErrorKind::ExpectedKey(b's'),
    );
    assert_error(
        decode(b"[\x00\x00\x00\x00}"),
        5,
        DecodeErrorKind::MissingTerminator {
            expected: b']',
            found: b'}',
        },
    );
    assert_error(
        decode(b"s\x03\x00\x00\x00a\xffb"),
        6,
        DecodeErrorKind::InvalidUtf8,
    );
    assert_error(decode(b"!!"), 1, DecodeErrorKind::TrailingBytes);
}

#[test]
fn recursion_limit() -> Result<(), DecodeError> {
    let nested = b"[\x01\x00\x00\x00[\x01\x00\x00\x00[\x00\x00\x00\x00]]]";

    let shallow = Codec::new(CodecOptions {
        recursion_limit: 2,
        ..Default::default()
    });
    assert_error(shallow.decode(nested), 11, DecodeErrorKind::Recursion);

    let value = decode(nested)?;
    assert_eq!(value[0][0], Value::Array(Array::new()));

    Ok(())
}

#[test]
fn deep_trees_encode_but_do_not_decode() {
    let mut value = Value::Unknown;
    for _ in 0..10_000 {
        let mut array = Array::new();
        array.push(value);
        value = Value::Array(array);
    }

    let bytes = encode(&value);
    assert_eq!(bytes.len(), 10_000 * 6 + 1);

    let error = decode(&bytes).map(|_| ()).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::Recursion);
    assert_eq!(error.offset, 256 * 5 + 1);
}

#[test]
fn recursion_limit_is_clamped() {
    let mut value = Value::Unknown;
    for _ in 0..(MAX_RECURSION_LIMIT as usize + 100) {
        let mut array = Array::new();
        array.push(value);
        value = Value::Array(array);
    }

    let options = CodecOptions {
        recursion_limit: u16::MAX,
        ..Default::default()
    };
    assert_eq!(options.effective_recursion_limit(), MAX_RECURSION_LIMIT);

    let codec = Codec::new(options);
    let error = codec.decode(&codec.encode(&value)).map(|_| ()).unwrap_err();
    assert_eq!(error.kind, DecodeErrorKind::Recursion);
    assert_eq!(error.offset, MAX_RECURSION_LIMIT as usize * 5 + 1);
}

#[test]
fn error_display() {
    let error = decode(b"x").map(|_| ()).unwrap_err();
    assert_eq!(error.to_string(), "unknown type tag 0x78 at offset 0");
}
