//! Default-on-missing Decoding
//!
//! Field wrapper that decodes a missing or `null` value as a provider's
//! default instead of failing.
//!
//! ```rust,ignore
//! #[derive(Deserialize)]
//! struct Flags {
//!     #[serde(default)]
//!     enabled: DefaultFalse,
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

/// Supplies the value used when a field is missing or `null`.
pub trait DefaultValueProvider {
    type Value;

    fn default_value() -> Self::Value;
}

/// `false`.
pub struct False;

impl DefaultValueProvider for False {
    type Value = bool;

    fn default_value() -> bool {
        false
    }
}

/// `0`.
pub struct Zero;

impl DefaultValueProvider for Zero {
    type Value = i64;

    fn default_value() -> i64 {
        0
    }
}

/// The empty value of `A` (`String::new()`, `Vec::new()`, ...).
pub struct EmptyValue<A>(PhantomData<A>);

impl<A: Default> DefaultValueProvider for EmptyValue<A> {
    type Value = A;

    fn default_value() -> A {
        A::default()
    }
}

/// Value that falls back to `P::default_value()` when absent or `null`.
///
/// Missing keys need `#[serde(default)]` on the field; `null` is handled by
/// the wrapper itself.
pub struct DefaultCodable<P: DefaultValueProvider> {
    pub value: P::Value,
}

pub type DefaultFalse = DefaultCodable<False>;
pub type DefaultZero = DefaultCodable<Zero>;
pub type DefaultEmpty<A> = DefaultCodable<EmptyValue<A>>;

impl<P: DefaultValueProvider> DefaultCodable<P> {
    pub fn new(value: P::Value) -> Self {
        Self { value }
    }

    pub fn into_inner(self) -> P::Value {
        self.value
    }
}

impl<P: DefaultValueProvider> Default for DefaultCodable<P> {
    fn default() -> Self {
        Self {
            value: P::default_value(),
        }
    }
}

impl<P: DefaultValueProvider> Deref for DefaultCodable<P> {
    type Target = P::Value;

    fn deref(&self) -> &P::Value {
        &self.value
    }
}

impl<P: DefaultValueProvider> Clone for DefaultCodable<P>
where
    P::Value: Clone,
{
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<P: DefaultValueProvider> fmt::Debug for DefaultCodable<P>
where
    P::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<P: DefaultValueProvider> PartialEq for DefaultCodable<P>
where
    P::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<'de, P> Deserialize<'de> for DefaultCodable<P>
where
    P: DefaultValueProvider,
    P::Value: DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<P::Value>::deserialize(deserializer)?;
        Ok(Self {
            value: value.unwrap_or_else(P::default_value),
        })
    }
}

impl<P> Serialize for DefaultCodable<P>
where
    P: DefaultValueProvider,
    P::Value: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize)]
    struct Profile {
        #[serde(default)]
        verified: DefaultFalse,
        #[serde(default)]
        nickname: DefaultEmpty<String>,
        #[serde(default)]
        shares: DefaultZero,
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let profile: Profile = serde_json::from_value(json!({})).unwrap();
        assert!(!*profile.verified);
        assert_eq!(*profile.nickname, "");
        assert_eq!(*profile.shares, 0);
    }

    #[test]
    fn test_null_fields_use_defaults() {
        let profile: Profile =
            serde_json::from_str(r#"{"verified":null,"nickname":null,"shares":null}"#).unwrap();
        assert!(!*profile.verified);
        assert_eq!(*profile.nickname, "");
        assert_eq!(*profile.shares, 0);
    }

    #[test]
    fn test_present_values_kept() {
        let profile: Profile =
            serde_json::from_value(json!({"verified": true, "nickname": "jo", "shares": 3}))
                .unwrap();
        assert!(*profile.verified);
        assert_eq!(profile.nickname.value, "jo");
        assert_eq!(profile.shares.into_inner(), 3);
    }

    #[test]
    fn test_wrong_type_still_fails() {
        let result: Result<Profile, _> = serde_json::from_value(json!({"verified": "yes"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_transparently() {
        let profile = Profile {
            verified: DefaultFalse::new(true),
            nickname: DefaultEmpty::default(),
            shares: DefaultZero::new(2),
        };
        assert_eq!(
            serde_json::to_value(&profile).unwrap(),
            json!({"verified": true, "nickname": "", "shares": 2})
        );
    }
}
