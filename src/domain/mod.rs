// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the configuration aggregate and its registries.
//!
//! This module contains the core domain types of the configuration compiler. It is
//! independent of any document format or resource location and defines the
//! aggregate the build pipeline populates.

/// Declares a keyword enum whose variants are spelled exactly as given.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                #[doc = concat!("`", $text, "`")]
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Returns the keyword spelling.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::setting_value::UnknownKeyword;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::domain::setting_value::UnknownKeyword(other.to_string())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::domain::setting_value::Keyword for $name {
            const NAMES: &'static [&'static str] = &[$($text),+];
        }
    };
}

pub mod aliases;
pub mod column_type;
pub mod configuration;
pub mod environment;
pub mod errors;
pub mod mappers;
pub mod node;
pub mod session;
pub mod setting_value;
pub mod settings;
pub mod type_handlers;
pub mod type_ref;
pub mod variables;

// Re-export commonly used types
pub use aliases::TypeAliasRegistry;
pub use column_type::ColumnType;
pub use configuration::{Configuration, Installed};
pub use environment::Environment;
pub use errors::{ConfigError, Result};
pub use mappers::{MappedStatement, MapperRegistry, StatementKind};
pub use node::{Element, Node};
pub use session::SessionFactory;
pub use settings::Settings;
pub use type_handlers::TypeHandlerRegistry;
pub use type_ref::TypeRef;
pub use variables::Properties;
