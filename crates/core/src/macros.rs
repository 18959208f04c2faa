//! Helper for numeric code enums that travel as integers on the wire.

/// Code ID type matching the integer enums the Entity Store serializes.
pub type CodeId = i16;

/// Define a `#[repr(i16)]` enum whose discriminants are the wire codes,
/// with a human-readable label per variant.
macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($entity:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "i16", into = "i16")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Every variant in code order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the wire code.
            pub fn id(self) -> $crate::macros::CodeId {
                self as $crate::macros::CodeId
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl From<$name> for $crate::macros::CodeId {
            fn from(value: $name) -> Self {
                value as $crate::macros::CodeId
            }
        }

        impl TryFrom<$crate::macros::CodeId> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: $crate::macros::CodeId) -> Result<Self, Self::Error> {
                match value {
                    $( $val => Ok($name::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} code {other}",
                        $entity
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}
