//! AWS credential handling shared by the node and controller services.
//!
//! Credentials arrive in the `secrets` map of a CSI request under the two
//! well-known keys below. They are handed to the mount helper through
//! environment variables (never argv, which is visible in process
//! listings), and the secret key is redacted from all `Debug` output.

use std::collections::HashMap;
use std::fmt;

/// Secrets-map key carrying the access key id.
pub const SECRETS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Secrets-map key carrying the secret access key.
pub const SECRETS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Environment variable the s3fs helper reads the access key id from.
pub const ENV_ACCESS_KEY_ID: &str = "AWSACCESSKEYID";
/// Environment variable the s3fs helper reads the secret key from.
pub const ENV_SECRET_ACCESS_KEY: &str = "AWSSECRETACCESSKEY";

/// A pair of AWS credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Extract credentials from a CSI `secrets` map.
    ///
    /// Returns `None` when either well-known key is absent; the caller is
    /// expected to surface that as an input-validation failure.
    pub fn from_secrets(secrets: &HashMap<String, String>) -> Option<Self> {
        let key = secrets.get(SECRETS_ACCESS_KEY_ID)?;
        let secret = secrets.get(SECRETS_SECRET_ACCESS_KEY)?;
        Some(Self::new(key.clone(), secret.clone()))
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// The `KEY=VALUE` environment pairs handed to the mount helper.
    pub fn env_pairs(&self) -> [(String, String); 2] {
        [
            (ENV_ACCESS_KEY_ID.to_string(), self.access_key_id.clone()),
            (
                ENV_SECRET_ACCESS_KEY.to_string(),
                self.secret_access_key.clone(),
            ),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}
