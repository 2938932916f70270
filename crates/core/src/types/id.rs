//! Newtype IDs for type-safe entity references.
//!
//! The backend owns every entity and hands out opaque string identifiers
//! (document ids). Use the `define_id!` macro to create wrappers that prevent
//! accidentally passing a user id where a movie id is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, and `From<String>`/`From<&str>`
///
/// # Example
///
/// ```rust
/// # use streamflix_core::define_id;
/// define_id!(UserId);
/// define_id!(MovieId);
///
/// let user_id = UserId::new("64f0c2");
/// let movie_id = MovieId::new("64f0c2");
///
/// // These are different types, so this won't compile:
/// // let _: UserId = movie_id;
/// assert_eq!(user_id.as_str(), movie_id.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }
    };
}

define_id!(UserId);
define_id!(MovieId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_as_str() {
        let id = MovieId::new("6501f2a9c3");
        assert_eq!(id.to_string(), "6501f2a9c3");
        assert_eq!(id.as_str(), "6501f2a9c3");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = UserId::from("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");

        let parsed: UserId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(parsed, id);
    }
}
