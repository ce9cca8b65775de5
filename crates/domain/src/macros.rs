//! Macro for implementing Display and FromStr for configuration enums
//!
//! Configuration enums are read from TOML/JSON files through serde and from
//! environment variables through `FromStr`. This macro keeps both spellings
//! in one place.
//!
//! # Example
//!
//! ```rust
//! use studentportal_domain::impl_config_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Stable,
//!     Beta,
//! }
//!
//! impl_config_enum_conversions!(Channel {
//!     Stable => "stable",
//!     Beta => "beta",
//! });
//!
//! assert_eq!("BETA".parse::<Channel>().unwrap(), Channel::Beta);
//! ```

/// Implements Display and FromStr traits for configuration enums
///
/// - Display: the lowercase spelling given in the mapping
/// - FromStr: case-insensitive, surrounding whitespace ignored
#[macro_export]
macro_rules! impl_config_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
