//! Parameter Enumeration Macro Module
//!
//! This module provides the `parameter_enum` macro that turns a table of
//! `Variant => "canonical_name" = literature_value` rows into a closed enumeration
//! of parameter keys.
//!
//! # Generated Items
//!
//! - The enum itself, serialized by its canonical name (e.g. `"HXK_Vmax"`)
//! - An implementation of [`ParameterKey`](crate::parameters::ParameterKey)
//! - `Display` printing the canonical name
//! - `FromStr` parsing the canonical name, rejecting anything else

#[macro_export]
/// `parameter_enum` generates a closed set of parameter keys together with their
/// canonical names and literature values.
macro_rules! parameter_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $key:literal = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $crate::parameters::ParameterKey for $name {
            // Declaration order, which is also the dense storage order
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            fn literature_value(self) -> f64 {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            fn index(self) -> usize {
                self as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::parameters::ParameterKey::name(*self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::parameters::ParameterError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    _ => Err($crate::parameters::ParameterError::UnknownParameter(
                        s.to_string(),
                    )),
                }
            }
        }
    };
}
