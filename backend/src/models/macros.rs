/// Defines a newtype ID wrapper around an integer-like scalar (typically `i64`)
/// and generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)
/// - `Display`
/// - `From<$inner> for $name` and `From<$name> for $inner`
///
/// Usage:
///   define_id_type!(i64, SettingId);
#[macro_export]
macro_rules! define_id_type {
    ($inner:ty, $name:ident) => {
        #[derive(
            Debug,
            Copy,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(pub $inner);

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::convert::From<$inner> for $name {
            fn from(v: $inner) -> Self {
                $name(v)
            }
        }

        impl ::std::convert::From<$name> for $inner {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl $name {
            pub fn new(value: $inner) -> Self {
                $name(value)
            }

            pub fn value(&self) -> $inner {
                self.0
            }
        }
    };
}

/// Defines the closed subject catalog: a fieldless enum whose variants map to
/// a wire code and a display title, and generates:
/// - derives (Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)
/// - `ALL` in declaration order, `as_str()`, `title()`
/// - `Display`, `FromStr` (error: `UnknownSubjectCode`)
/// - string-based `Serialize`/`Deserialize`, so the enum works as a JSON map key
///
/// Usage:
///   define_subject_catalog! { Math101 => ("MATH101", "Mathematics I"), }
#[macro_export]
macro_rules! define_subject_catalog {
    ($($variant:ident => ($code:literal, $title:literal)),+ $(,)?) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum SubjectCode {
            $($variant),+
        }

        impl SubjectCode {
            /// Every catalog entry, in catalog order.
            pub const ALL: &'static [SubjectCode] = &[$(SubjectCode::$variant),+];

            /// Wire representation (e.g. `"MATH101"`).
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(SubjectCode::$variant => $code),+
                }
            }

            /// Human-readable subject name.
            pub fn title(&self) -> &'static str {
                match self {
                    $(SubjectCode::$variant => $title),+
                }
            }
        }

        impl ::std::fmt::Display for SubjectCode {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for SubjectCode {
            type Err = UnknownSubjectCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($code => Ok(SubjectCode::$variant),)+
                    other => Err(UnknownSubjectCode(other.to_string())),
                }
            }
        }

        impl serde::Serialize for SubjectCode {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for SubjectCode {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
