//! Raw-representable fields: stored as their scalar, rebuilt through the
//! failable constructor.

use crate::common::{sample_task, Color, Priority, Task};
use rowmap::prelude::*;
use rowmap::{decode, encode, FieldKind, FieldType};

/// Declares several kinds; the highest-precedence one must be used.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Level(i64);

impl RawRepresentable for Level {
    const RAW_KINDS: &'static [RawKind] = &[RawKind::String, RawKind::Double, RawKind::Int];

    fn to_raw(&self, kind: RawKind) -> Option<RawValue> {
        match kind {
            RawKind::Int => Some(RawValue::Int(self.0)),
            RawKind::Double => Some(RawValue::Double(self.0 as f64)),
            RawKind::String => Some(RawValue::String(format!("L{}", self.0))),
            _ => None,
        }
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::Int(n) if (0..=5).contains(&n) => Some(Level(n)),
            _ => None,
        }
    }
}

raw_field!(Level);

/// Declares bool ahead of string.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Switch {
    Off,
    On,
}

impl RawRepresentable for Switch {
    const RAW_KINDS: &'static [RawKind] = &[RawKind::String, RawKind::Bool];

    fn to_raw(&self, kind: RawKind) -> Option<RawValue> {
        match kind {
            RawKind::Bool => Some(RawValue::Bool(*self == Switch::On)),
            RawKind::String => Some(RawValue::String(format!("{self:?}"))),
            _ => None,
        }
    }

    fn from_raw(raw: RawValue) -> Option<Self> {
        match raw {
            RawValue::Bool(true) => Some(Switch::On),
            RawValue::Bool(false) => Some(Switch::Off),
            _ => None,
        }
    }
}

raw_field!(Switch);

record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Device {
        level: Level,
        power: Switch,
        spare: Option<Level>,
    }
}

// =============================================================================
// Kind resolution
// =============================================================================

#[test]
fn test_resolved_kinds() {
    assert_eq!(<Level as FieldType>::KIND, FieldKind::Raw(RawKind::Int));
    assert_eq!(<Switch as FieldType>::KIND, FieldKind::Raw(RawKind::Bool));
    assert_eq!(<Priority as FieldType>::KIND, FieldKind::Raw(RawKind::Int));
    assert_eq!(<Color as FieldType>::KIND, FieldKind::Raw(RawKind::String));
}

#[test]
fn test_precedence_drives_storage() {
    let device = Device {
        level: Level(4),
        power: Switch::On,
        spare: None,
    };
    let assignments = encode(&device).unwrap();
    assert_eq!(
        assignments,
        vec![
            Assignment::new("level", 4_i64),
            Assignment::new("power", 1_i64),
            Assignment::null("spare"),
        ]
    );
    let back: Device = decode(&ValueRow::from_assignments(&assignments)).unwrap();
    assert_eq!(back, device);
}

// =============================================================================
// Failable construction
// =============================================================================

#[test]
fn test_rejected_raw_value_is_mismatch() {
    let row = ValueRow::new().with("level", 42_i64).with("power", 0_i64);
    let err = decode::<Device, _>(&row).unwrap_err();
    assert_eq!(
        err,
        MappingError::TypeMismatch {
            field: "level".into(),
            found: "int(42)".into(),
        }
    );
}

#[test]
fn test_unknown_name_is_mismatch() {
    let mut row = ValueRow::from_assignments(&encode(&sample_task(1)).unwrap());
    row.set("color", "purple");
    let err = decode::<Task, _>(&row).unwrap_err();
    assert_eq!(
        err,
        MappingError::TypeMismatch {
            field: "color".into(),
            found: "string(\"purple\")".into(),
        }
    );
}

#[test]
fn test_wrong_storage_class_is_mismatch() {
    let mut row = ValueRow::from_assignments(&encode(&sample_task(1)).unwrap());
    row.set("priority", "urgent");
    let err = decode::<Task, _>(&row).unwrap_err();
    assert_eq!(
        err,
        MappingError::TypeMismatch {
            field: "priority".into(),
            found: "text".into(),
        }
    );
}
