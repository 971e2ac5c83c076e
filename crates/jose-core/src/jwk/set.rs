use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Class, Jwk};
use crate::{error::JoseError, jwa::Algorithm, util::Header};

/// A set of JSON Web Keys.
///
/// This type is defined in [RFC7517 Section 5].
///
/// [RFC7517 Section 5]: https://datatracker.ietf.org/doc/html/rfc7517#section-5
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// The keys in the set.
    keys: Vec<Jwk>,
}

impl JwkSet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    pub fn from_json(json: &str) -> Result<Self, JoseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, JoseError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn keys(&self) -> &[Jwk] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Jwk> {
        self.keys.iter()
    }

    /// The first key with the given key identifier.
    pub fn get(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid() == Some(kid))
    }

    /// Returns a new set with `key` appended.
    pub fn with_key(&self, key: Jwk) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key);
        Self { keys }
    }

    /// Returns a new set without the keys identified by `kid`.
    pub fn without_key(&self, kid: &str) -> Self {
        Self {
            keys: self.keys.iter().filter(|key| key.kid() != Some(kid)).cloned().collect(),
        }
    }

    /// Selects the first key, in insertion order, usable for `usage`.
    ///
    /// A key without `use` (and without `key_ops`) matches any usage. When an
    /// algorithm is given, the key type must be allowed by it and a declared
    /// `alg` must be equal to its name. Every criterion must equal the key
    /// parameter of the same name.
    pub fn select_key<A>(&self, usage: Class, algorithm: Option<&A>, criteria: &Header) -> Option<&Jwk>
    where
        A: Algorithm + ?Sized,
    {
        self.keys.iter().find(|key| {
            usage_matches(key, usage)
                && algorithm.map_or(true, |alg| algorithm_matches(key, alg))
                && criteria_match(key, criteria)
        })
    }
}

impl<'a> IntoIterator for &'a JwkSet {
    type Item = &'a Jwk;
    type IntoIter = std::slice::Iter<'a, Jwk>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl From<Vec<Jwk>> for JwkSet {
    fn from(keys: Vec<Jwk>) -> Self {
        Self::new(keys)
    }
}

fn usage_matches(key: &Jwk, usage: Class) -> bool {
    match (&key.prm().cls, &key.prm().ops) {
        (Some(cls), _) => *cls == usage,
        (None, Some(ops)) => ops.iter().any(|op| op.class() == usage),
        (None, None) => true,
    }
}

fn algorithm_matches<A: Algorithm + ?Sized>(key: &Jwk, algorithm: &A) -> bool {
    key.alg().map_or(true, |alg| alg == algorithm.name()) && algorithm.allowed_key_types().contains(&key.kty())
}

fn criteria_match(key: &Jwk, criteria: &Header) -> bool {
    if criteria.is_empty() {
        return true;
    }
    let Ok(Value::Object(parameters)) = serde_json::to_value(key) else {
        return false;
    };
    criteria
        .iter()
        .all(|(name, expected)| parameters.get(name).is_some_and(|value| value == expected))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        jwa::{signature::Hmac, Algorithm},
        jwk::{Operations, Parameters},
    };

    fn oct(prm: Parameters) -> Jwk {
        Jwk::from_oct(vec![3u8; 32], prm).unwrap()
    }

    fn criteria(value: Value) -> Header {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_select_key_by_use_and_kid() {
        let set = JwkSet::new(vec![
            oct(Parameters::default().with_kid("k1").with_use(Class::Signing)),
            oct(Parameters::default().with_kid("k2").with_use(Class::Signing)),
            oct(Parameters::default().with_kid("k3").with_use(Class::Signing)),
        ]);

        let selected = set.select_key::<dyn Algorithm>(Class::Signing, None, &criteria(json!({"kid": "k2"})));
        assert_eq!(selected.and_then(Jwk::kid), Some("k2"));
        assert!(set.select_key::<dyn Algorithm>(Class::Encryption, None, &Header::new()).is_none());
        assert!(set
            .select_key::<dyn Algorithm>(Class::Signing, None, &criteria(json!({"kid": "k4"})))
            .is_none());
    }

    #[test]
    fn test_select_key_first_match_wins() {
        let set = JwkSet::new(vec![
            oct(Parameters::default().with_kid("a")),
            oct(Parameters::default().with_kid("b")),
        ]);
        let selected = set.select_key::<dyn Algorithm>(Class::Encryption, None, &Header::new());
        assert_eq!(selected.and_then(Jwk::kid), Some("a"));
    }

    #[test]
    fn test_select_key_with_algorithm() {
        let hs256 = Hmac::hs256();
        let set = JwkSet::new(vec![
            oct(Parameters::default().with_kid("wrong-alg").with_alg("HS512")),
            oct(Parameters::default().with_kid("ops").with_ops([Operations::Sign])),
        ]);
        let selected = set.select_key(Class::Signing, Some(&hs256), &Header::new());
        assert_eq!(selected.and_then(Jwk::kid), Some("ops"));
        assert!(set
            .select_key(Class::Encryption, Some(&hs256), &Header::new())
            .is_none());
    }

    #[test]
    fn test_set_edits_return_new_sets() {
        let set = JwkSet::default().with_key(oct(Parameters::default().with_kid("k1")));
        let bigger = set.with_key(oct(Parameters::default().with_kid("k2")));
        assert_eq!(set.len(), 1);
        assert_eq!(bigger.len(), 2);
        assert!(bigger.get("k2").is_some());

        let smaller = bigger.without_key("k1");
        assert_eq!(smaller.len(), 1);
        assert!(smaller.get("k1").is_none());
    }

    #[test]
    fn test_set_json_shape() {
        let set = JwkSet::new(vec![oct(Parameters::default().with_kid("k1"))]);
        let json: Value = serde_json::from_str(&set.to_json().unwrap()).unwrap();
        assert_eq!(json["keys"][0]["kty"], "oct");
        assert_eq!(json["keys"][0]["kid"], "k1");
        assert_eq!(JwkSet::from_json(&set.to_json().unwrap()).unwrap(), set);
    }
}
