use serde::{Deserialize, Serialize};

use super::Secret;
use crate::error::JoseError;

/// A symmetric octet key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oct {
    /// The symmetric key.
    pub k: Secret,
}

impl Oct {
    pub(crate) fn validate(&self) -> Result<(), JoseError> {
        if self.k.is_empty() {
            return Err(JoseError::invalid_key("empty symmetric key"));
        }
        Ok(())
    }
}
