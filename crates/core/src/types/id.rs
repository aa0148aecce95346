//! Newtype IDs for type-safe entity references.
//!
//! The target API keys users and products by 64-bit integers. Wrapping them
//! keeps a product ID from being passed where a user ID is expected.

/// Macro to define a type-safe ID wrapper around `i64`.
///
/// The generated type is `Copy`, serializes transparently as a JSON number,
/// displays as the bare integer, and converts to and from `i64`.
///
/// # Example
///
/// ```rust
/// # use shop_probe_core::define_id;
/// define_id!(OrderId);
///
/// let order_id = OrderId::new(7);
/// assert_eq!(order_id.as_i64(), 7);
/// assert_eq!(order_id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ProductId::new(101)).unwrap();
        assert_eq!(json, "101");
    }

    #[test]
    fn test_display_in_path() {
        assert_eq!(format!("/api/cart/{}", ProductId::new(101)), "/api/cart/101");
    }
}
