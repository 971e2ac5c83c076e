//! Policy values for the engines.
//!
//! These types only describe configuration; reading them from files or the
//! environment is up to the application.

use serde::{Deserialize, Serialize};

use crate::{
    error::JoseError,
    jwa::{
        registry::{compression_methods, content_encryption_algorithms, key_encryption_algorithms, signature_algorithms},
        Registries,
    },
};

/// PBES2 salt and iteration count policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pbes2Config {
    /// Length in bytes of the random `p2s` salt.
    pub salt_size: usize,
    /// The `p2c` value used when wrapping.
    pub iterations: u32,
    /// Lowest `p2c` accepted when wrapping or unwrapping.
    pub min_iterations: u32,
    /// Highest `p2c` accepted when unwrapping.
    pub max_iterations: u32,
}

impl Default for Pbes2Config {
    fn default() -> Self {
        Self {
            salt_size: 64,
            iterations: 4096,
            min_iterations: 1000,
            max_iterations: 1_000_000,
        }
    }
}

/// Algorithm names enabled for each family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoseConfig {
    pub signature_algorithms: Vec<String>,
    pub key_encryption_algorithms: Vec<String>,
    pub content_encryption_algorithms: Vec<String>,
    pub compression_methods: Vec<String>,
    pub pbes2: Pbes2Config,
}

fn owned(names: Vec<&'static str>) -> Vec<String> {
    names.into_iter().map(str::to_owned).collect()
}

impl Default for JoseConfig {
    /// Every built-in algorithm.
    fn default() -> Self {
        let pbes2 = Pbes2Config::default();
        Self {
            signature_algorithms: owned(signature_algorithms().names()),
            key_encryption_algorithms: owned(key_encryption_algorithms(pbes2.clone()).names()),
            content_encryption_algorithms: owned(content_encryption_algorithms().names()),
            compression_methods: owned(compression_methods().names()),
            pbes2,
        }
    }
}

impl JoseConfig {
    /// Builds the registries holding the configured algorithms.
    pub fn registries(&self) -> Result<Registries, JoseError> {
        let all = Registries::with_pbes2(self.pbes2.clone());
        Ok(Registries {
            signature: all.signature.subset(self.signature_algorithms.as_slice())?,
            key_encryption: all.key_encryption.subset(self.key_encryption_algorithms.as_slice())?,
            content_encryption: all.content_encryption.subset(self.content_encryption_algorithms.as_slice())?,
            compression: all.compression.subset(self.compression_methods.as_slice())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let registries = JoseConfig::default().registries().unwrap();
        assert_eq!(registries.signature.len(), 14);
        assert_eq!(registries.key_encryption.len(), 18);
        assert_eq!(registries.content_encryption.len(), 6);
        assert_eq!(registries.compression.len(), 1);
    }

    #[test]
    fn test_partial_config() {
        let config: JoseConfig = serde_json::from_str(
            r#"{"signature_algorithms": ["ES256"], "key_encryption_algorithms": [], "pbes2": {"iterations": 2000}}"#,
        )
        .unwrap();
        assert_eq!(config.pbes2.iterations, 2000);
        assert_eq!(config.pbes2.min_iterations, 1000);

        let registries = config.registries().unwrap();
        assert_eq!(registries.signature.names(), vec!["ES256"]);
        assert!(registries.key_encryption.is_empty());
        assert_eq!(registries.content_encryption.len(), 6);
    }

    #[test]
    fn test_unknown_algorithm_name() {
        let config = JoseConfig {
            content_encryption_algorithms: vec!["A128GCM".into(), "A128CTR".into()],
            ..Default::default()
        };
        assert!(matches!(config.registries(), Err(JoseError::UnsupportedAlgorithm(name)) if name == "A128CTR"));
    }
}
