use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Bytes;

/// JWK parameters unrelated to the key implementation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// The algorithm intended for use with this key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alg: Option<String>,

    /// The key identifier.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kid: Option<String>,

    /// The key class (called `use` in the RFC).
    #[serde(skip_serializing_if = "Option::is_none", default, rename = "use")]
    pub cls: Option<Class>,

    /// The key operations (called `key_ops` in the RFC).
    #[serde(skip_serializing_if = "Option::is_none", default, rename = "key_ops")]
    pub ops: Option<BTreeSet<Operations>>,

    /// The URL of the X.509 certificate associated with this key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5u: Option<String>,

    /// The X.509 certificate chain, standard base64 DER (not base64url).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5c: Option<Vec<String>>,

    /// An X.509 thumbprint (SHA-1).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub x5t: Option<Bytes>,

    /// An X.509 thumbprint (SHA-2 256).
    #[serde(skip_serializing_if = "Option::is_none", rename = "x5t#S256", default)]
    pub x5t_s256: Option<Bytes>,
}

impl Parameters {
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }

    pub fn with_use(mut self, cls: Class) -> Self {
        self.cls = Some(cls);
        self
    }

    pub fn with_ops(mut self, ops: impl IntoIterator<Item = Operations>) -> Self {
        self.ops = Some(ops.into_iter().collect());
        self
    }
}

/// Key Class (i.e. `use` in the RFC)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    #[serde(rename = "enc")]
    Encryption,

    #[serde(rename = "sig")]
    Signing,
}

/// Key operations (i.e. `key_ops` in the RFC)
// NOTE: Keep in lexicographical order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operations {
    Decrypt,
    DeriveBits,
    DeriveKey,
    Encrypt,
    Sign,
    UnwrapKey,
    Verify,
    WrapKey,
}

impl Operations {
    /// The key class an operation belongs to.
    pub fn class(&self) -> Class {
        match self {
            Operations::Sign | Operations::Verify => Class::Signing,
            _ => Class::Encryption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names() {
        let prm = Parameters::default()
            .with_kid("k1")
            .with_alg("ES256")
            .with_use(Class::Signing)
            .with_ops([Operations::Verify, Operations::Sign]);

        let json = serde_json::to_value(&prm).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"alg": "ES256", "kid": "k1", "use": "sig", "key_ops": ["sign", "verify"]})
        );
        assert_eq!(serde_json::from_value::<Parameters>(json).unwrap(), prm);
    }

    #[test]
    fn test_operations_class() {
        assert_eq!(Operations::Verify.class(), Class::Signing);
        assert_eq!(Operations::UnwrapKey.class(), Class::Encryption);
    }
}
