//! Macros for defining typed reference types.

/// Macro to define a typed reference with a specific resource kind.
///
/// This generates a newtype wrapper around a validated name with:
/// - A `KIND` constant
/// - `new()` to construct from a name, validating it
/// - `parse()` to parse the canonical `{kind}/{name}` form
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations
/// - `Ord`, `Hash`, and other standard traits
///
/// # Example
///
/// ```ignore
/// define_ref!(NetworkRef, "net");
/// define_ref!(ServiceRef, "svc");
///
/// let net = NetworkRef::new("edge")?;
/// let parsed: ServiceRef = "svc/web".parse()?;
/// ```
#[macro_export]
macro_rules! define_ref {
    ($name:ident, $kind:literal) => {
        /// A typed reference to a declared resource of this kind.
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// The resource kind prefix for this reference type.
            pub const KIND: &'static str = $kind;

            /// Creates a reference from a resource name, validating it.
            pub fn new(name: impl Into<String>) -> Result<Self, $crate::RefError> {
                let name = name.into();
                $crate::validate_name(&name)?;
                Ok(Self(name))
            }

            /// Returns the resource name (without the kind prefix).
            #[must_use]
            pub fn name(&self) -> &str {
                &self.0
            }

            /// Parses a reference from its canonical `{kind}/{name}` form.
            pub fn parse(s: &str) -> Result<Self, $crate::RefError> {
                if s.is_empty() {
                    return Err($crate::RefError::Empty);
                }

                let Some((kind, name)) = s.split_once('/') else {
                    return Err($crate::RefError::MissingSeparator);
                };

                if kind != Self::KIND {
                    return Err($crate::RefError::InvalidKind {
                        expected: Self::KIND,
                        actual: kind.to_string(),
                    });
                }

                Self::new(name)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}/{}", Self::KIND, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::RefError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}
