//! Serde model of the layout documents returned by the case-management API.
//!
//! Discriminator strings (`control.type`, `groupFormat`, `action`, ...) are decoded
//! into closed enums with a catch-all variant, so an unknown kind from a newer
//! server never fails deserialization.

/// Declares a string-tagged enum with a catch-all variant holding the unknown tag.
///
/// Each known variant lists its canonical wire tag first, followed by any aliases.
macro_rules! tagged_kind {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal $(| $alias:literal)* ),* $(,)?
        }
        fallback $fallback:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(from = "String", into = "String")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
            $fallback(String),
        }

        impl $name {
            /// The wire tag for this kind.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $tag, )*
                    $name::$fallback(tag) => tag.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(tag: String) -> Self {
                match tag.as_str() {
                    $( $tag $(| $alias)* => $name::$variant, )*
                    _ => $name::$fallback(tag),
                }
            }
        }

        impl From<&str> for $name {
            fn from(tag: &str) -> Self {
                $name::from(tag.to_string())
            }
        }

        impl From<$name> for String {
            fn from(kind: $name) -> String {
                kind.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

pub mod action;
pub mod field;
pub mod validation;
pub mod view;

pub use action::*;
pub use field::*;
pub use validation::*;
pub use view::*;

pub(crate) fn default_visible() -> bool {
    true
}

/// Decodes an explicit JSON `null` the same way as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Option::unwrap_or_default)
}
