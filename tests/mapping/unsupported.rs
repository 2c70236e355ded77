//! Integer widths the bridge refuses in both directions.

use rowmap::prelude::*;
use rowmap::{decode, encode};

record! {
    #[derive(Debug)]
    struct Counter {
        id: i64,
        hits: u32,
    }
}

record! {
    #[derive(Debug)]
    struct Buffer {
        bytes: usize,
    }
}

#[test]
fn test_encode_rejects_u32() {
    let err = encode(&Counter { id: 1, hits: 3 }).unwrap_err();
    assert_eq!(
        err,
        MappingError::UnsupportedType {
            field: "hits".into(),
            type_name: "u32",
            width: 32,
        }
    );
    assert!(err.is_unsupported());
}

#[test]
fn test_decode_rejects_u32_when_column_present() {
    let row = ValueRow::new().with("id", 1_i64).with("hits", 3_i64);
    let err = decode::<Counter, _>(&row).unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(err.field(), "hits");
}

#[test]
fn test_decode_rejects_u32_before_reading_row() {
    // Absent and NULL cells would otherwise report MissingColumn / UnexpectedNull
    let absent = ValueRow::new().with("id", 1_i64);
    assert!(decode::<Counter, _>(&absent).unwrap_err().is_unsupported());

    let null = ValueRow::new().with("id", 1_i64).with("hits", ColumnValue::Null);
    assert!(decode::<Counter, _>(&null).unwrap_err().is_unsupported());
}

#[test]
fn test_platform_width_reported() {
    let err = encode(&Buffer { bytes: 0 }).unwrap_err();
    assert_eq!(
        err,
        MappingError::UnsupportedType {
            field: "bytes".into(),
            type_name: "usize",
            width: usize::BITS,
        }
    );
}

#[test]
fn test_schema_marks_unsupported() {
    let schema = <Counter as Record>::schema().unwrap();
    assert!(matches!(
        schema.field("hits").unwrap().kind,
        rowmap::FieldKind::Unsupported { width: 32, .. }
    ));
}

#[test]
fn test_optional_unsupported_fails_even_when_none() {
    record! {
        #[derive(Debug)]
        struct Sparse {
            small: Option<i16>,
        }
    }

    let err = encode(&Sparse { small: None }).unwrap_err();
    assert_eq!(
        err,
        MappingError::UnsupportedType {
            field: "small".into(),
            type_name: "i16",
            width: 16,
        }
    );
    assert!(decode::<Sparse, _>(&ValueRow::new()).unwrap_err().is_unsupported());
}
