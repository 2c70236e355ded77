//! Record declarations
//!
//! A [`Record`] knows its shape and how to walk its own fields through a
//! [`RecordEncoder`] or [`RowDecoder`]. The [`record!`](crate::record) macro
//! declares a struct and generates the impl, using each field's name as its
//! column name.

use crate::decode::RowDecoder;
use crate::encode::RecordEncoder;
use crate::row::RowReader;
use rowmap_core::{MappingError, Schema};

/// A struct mapped to one table row
pub trait Record: Sized {
    /// Field shape in declaration order
    fn schema() -> Result<Schema, MappingError>;

    /// Emit one assignment per field, in declaration order
    fn encode_fields(&self, encoder: &mut RecordEncoder<'_>) -> Result<(), MappingError>;

    /// Rebuild from a row
    fn decode_fields<R: RowReader + ?Sized>(
        decoder: &RowDecoder<'_, R>,
    ) -> Result<Self, MappingError>;
}

/// Declare a struct and implement [`Record`] for it
///
/// ```
/// use rowmap_codec::{decode, encode, record, ValueRow};
///
/// record! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub struct User {
///         pub id: i64,
///         pub name: String,
///         pub nickname: Option<String>,
///     }
/// }
///
/// let user = User { id: 1, name: "Ada".into(), nickname: None };
/// let assignments = encode(&user).unwrap();
/// assert_eq!(assignments.len(), 3);
///
/// let row = ValueRow::from_assignments(&assignments);
/// let back: User = decode(&row).unwrap();
/// assert_eq!(back, user);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            fn schema() -> ::std::result::Result<$crate::Schema, $crate::MappingError> {
                $crate::Schema::new(::std::vec![
                    $( $crate::FieldDescriptor::of::<$ty>(::std::stringify!($field)), )*
                ])
            }

            fn encode_fields(
                &self,
                encoder: &mut $crate::RecordEncoder<'_>,
            ) -> ::std::result::Result<(), $crate::MappingError> {
                $( encoder.field(::std::stringify!($field), &self.$field)?; )*
                ::std::result::Result::Ok(())
            }

            fn decode_fields<R: $crate::RowReader + ?Sized>(
                decoder: &$crate::RowDecoder<'_, R>,
            ) -> ::std::result::Result<Self, $crate::MappingError> {
                ::std::result::Result::Ok(Self {
                    $( $field: decoder.field::<$ty>(::std::stringify!($field))?, )*
                })
            }
        }
    };
}
