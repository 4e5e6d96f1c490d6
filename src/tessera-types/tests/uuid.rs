use tessera_types::{Endian, FixedLayout, ParseUuidError, Uuid};

const TEXT: &str = "11f8aa9c-b071-4242-836b-13b7abe0d489";
const WIRE: [u8; 16] = [
    0x11, 0xf8, 0xaa, 0x9c, 0xb0, 0x71, 0x42, 0x42, 0x83, 0x6b, 0x13, 0xb7, 0xab, 0xe0, 0xd4, 0x89,
];

#[test]
fn text_and_layout_agree() -> Result<(), ParseUuidError> {
    let id: Uuid = TEXT.parse()?;

    assert_eq!(id.to_string(), TEXT);
    assert_eq!(id.to_bytes_as(Endian::Little), WIRE);
    assert_eq!(id.to_bytes_as(Endian::Big), WIRE);
    assert_eq!(Uuid::decode_as(&WIRE, Endian::Big), id);

    Ok(())
}

#[test]
fn accepted_spellings() -> Result<(), ParseUuidError> {
    let id = Uuid::from_bytes(WIRE);

    for text in [
        "11F8AA9C-B071-4242-836B-13B7ABE0D489",
        "11f8aa9cb0714242836b13b7abe0d489",
        "{11f8aa9c-b071-4242-836b-13b7abe0d489}",
        "(11f8aa9c-b071-4242-836b-13b7abe0d489)",
        "  11f8aa9c-b071-4242-836b-13b7abe0d489\n",
    ] {
        assert_eq!(Uuid::parse(text)?, id, "{text}");
    }

    Ok(())
}

#[test]
fn rejected_spellings() {
    assert_eq!(Uuid::parse("11f8aa9c"), Err(ParseUuidError::Length(8)));
    assert_eq!(
        Uuid::parse("11f8aa9cb-071-4242-836b-13b7abe0d489"),
        Err(ParseUuidError::Separator)
    );
    assert_eq!(
        Uuid::parse("11f8aa9c-b071-4242-836b-13b7abe0d48g"),
        Err(ParseUuidError::Character('g'))
    );
}

#[test]
fn guid_layout_swaps_leading_groups() {
    let id = Uuid::from_bytes(WIRE);
    let guid = id.to_guid_bytes();

    assert_eq!(&guid[..8], &[0x9c, 0xaa, 0xf8, 0x11, 0x71, 0xb0, 0x42, 0x42]);
    assert_eq!(&guid[8..], &WIRE[8..]);
    assert_eq!(Uuid::from_guid_bytes(guid), id);
}

#[test]
fn combine_is_ordered_md5() -> Result<(), ParseUuidError> {
    let id = Uuid::from_bytes(WIRE);

    assert_eq!(
        Uuid::combine(id, Uuid::ZERO),
        "0a7a60eb-9115-6341-5994-7d519ee99928".parse()?
    );
    assert_eq!(
        Uuid::combine(Uuid::ZERO, id),
        "c0cf0e85-2d91-37bc-7d61-634c904e1d78".parse()?
    );
    assert_eq!(Uuid::combine(id, Uuid::ZERO), Uuid::combine(id, Uuid::ZERO));

    Ok(())
}

#[test]
fn crc_xor_and_random() {
    let id = Uuid::from_bytes(WIRE);

    assert_eq!(id.crc(), 0x1fd5_b5ef);
    assert_eq!(Uuid::ZERO.crc(), 0);
    assert!((id ^ id).is_zero());
    assert_eq!(id ^ Uuid::ZERO, id);

    let random = Uuid::random();
    assert_eq!(random.as_bytes()[6] >> 4, 4);
    assert_eq!(random.as_bytes()[8] & 0xC0, 0x80);
    assert_ne!(random, Uuid::random());
}
