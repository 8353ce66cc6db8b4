//! Macros for defining IDs with a prefix fixed at compile time.

/// Declares a newtype around [`PrefixedId`](crate::PrefixedId) whose
/// prefix is a constant of the type.
///
/// Because every value shares one prefix, the generated type has a total
/// order and implements `Ord`. It also gets:
/// - A `PREFIX` constant
/// - `parse()`, `FromStr` and `Display`
/// - `Serialize` and `Deserialize` as the prefixed string
/// - `as_id()` / `into_inner()` and a `From` conversion to the inner ID
///
/// Passing `generated` as a fourth argument (for schemes implementing
/// [`Generate`](crate::Generate)) adds `new()`, `Default` and `cycle()`.
///
/// # Example
///
/// ```ignore
/// define_prefixed_id!(CustomerId, CuidScheme, "cus_", generated);
/// define_prefixed_id!(DeviceTag, CharScheme, "dev_");
///
/// let customer = CustomerId::new();
/// let parsed: CustomerId = "cus_ckodhg53j000001labr7zezao".parse()?;
/// ```
#[macro_export]
macro_rules! define_prefixed_id {
    ($name:ident, $scheme:ty, $prefix:literal) => {
        /// A prefixed ID for this resource type.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name($crate::PrefixedId<$scheme>);

        impl $name {
            /// The prefix for this ID type.
            pub const PREFIX: &'static str = $prefix;

            /// Parses an ID from its prefixed string form.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                $crate::PrefixedId::<$scheme>::parse(s, Self::PREFIX).map(Self)
            }

            /// The identifier without its prefix.
            pub fn bare(&self) -> &str {
                self.0.bare()
            }

            /// Borrows the underlying runtime-prefixed ID.
            pub fn as_id(&self) -> &$crate::PrefixedId<$scheme> {
                &self.0
            }

            /// Unwraps into the underlying runtime-prefixed ID.
            pub fn into_inner(self) -> $crate::PrefixedId<$scheme> {
                self.0
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.0.bare().cmp(other.0.bare())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_str(&self.0)
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

        impl From<$name> for $crate::PrefixedId<$scheme> {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<$crate::PrefixedId<$scheme>> for $name {
            fn as_ref(&self) -> &$crate::PrefixedId<$scheme> {
                &self.0
            }
        }
    };

    ($name:ident, $scheme:ty, $prefix:literal, generated) => {
        $crate::define_prefixed_id!($name, $scheme, $prefix);

        impl $name {
            /// Creates a new ID with a freshly generated bare value.
            #[must_use]
            pub fn new() -> Self {
                Self($crate::PrefixedId::<$scheme>::generate(Self::PREFIX))
            }

            /// Replaces the bare value with a freshly generated one.
            pub fn cycle(&mut self) {
                self.0.cycle();
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}
