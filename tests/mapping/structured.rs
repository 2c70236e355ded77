//! Structured fields stored as JSON text.

use crate::common::Address;
use rowmap::prelude::*;
use rowmap::{decode, encode};
use std::collections::BTreeMap;

record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        id: i64,
        home: Address,
        work: Option<Address>,
        labels: Json<BTreeMap<String, i64>>,
    }
}

fn profile() -> Profile {
    Profile {
        id: 3,
        home: Address {
            street: "12 Elm".into(),
            city: "Oslo".into(),
            zip: Some("0150".into()),
        },
        work: None,
        labels: Json(BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)])),
    }
}

fn encoded_row() -> ValueRow {
    ValueRow::from_assignments(&encode(&profile()).unwrap())
}

#[test]
fn test_stored_as_json_text() {
    let row = encoded_row();
    assert_eq!(
        row.value("home").unwrap(),
        ColumnValue::Text(r#"{"street":"12 Elm","city":"Oslo","zip":"0150"}"#.into())
    );
    assert_eq!(row.value("work").unwrap(), ColumnValue::Null);
    assert_eq!(
        row.value("labels").unwrap(),
        ColumnValue::Text(r#"{"a":1,"b":2}"#.into())
    );
}

#[test]
fn test_round_trip() {
    let back: Profile = decode(&encoded_row()).unwrap();
    assert_eq!(back, profile());
}

#[test]
fn test_unparseable_text_is_corrupt() {
    let row = encoded_row().with("home", "{not json");
    let err = decode::<Profile, _>(&row).unwrap_err();
    assert!(matches!(err, MappingError::CorruptData { ref field, .. } if field == "home"));
}

#[test]
fn test_wrong_shape_is_corrupt() {
    let row = encoded_row().with("home", r#"{"street": 5}"#);
    let err = decode::<Profile, _>(&row).unwrap_err();
    assert!(matches!(err, MappingError::CorruptData { ref field, .. } if field == "home"));
}

#[test]
fn test_non_text_cell_is_mismatch() {
    let row = encoded_row().with("labels", vec![1_u8, 2]);
    let err = decode::<Profile, _>(&row).unwrap_err();
    assert_eq!(
        err,
        MappingError::TypeMismatch {
            field: "labels".into(),
            found: "blob".into(),
        }
    );
}

#[test]
fn test_non_string_map_keys_fail_serialization() {
    record! {
        #[derive(Debug)]
        struct Weird {
            by_pair: Json<BTreeMap<(i64, i64), i64>>,
        }
    }

    let weird = Weird {
        by_pair: Json(BTreeMap::from([((1, 2), 3)])),
    };
    let err = encode(&weird).unwrap_err();
    assert!(matches!(
        err,
        MappingError::SerializationError { ref field, .. } if field == "by_pair"
    ));
}
