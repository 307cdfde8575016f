// RSA Decryption Implementation
// Ciphertext container and character-wise decryption

use std::str::FromStr;

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::encrypt::{validate_key, Cipher};
use super::numtheory::mod_pow;
use crate::error::{Error, Result};

/// Encrypted message: one value per input character, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ciphertext(Vec<u64>);

impl Ciphertext {
    pub fn new(values: Vec<u64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u64> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.0.iter()
    }

    /// Parse a ciphertext from untyped JSON.
    ///
    /// The value must be an array whose elements are all non-negative integers.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let elements = value.as_array().ok_or(Error::InvalidCiphertext)?;
        elements
            .iter()
            .map(|element| element.as_u64().ok_or(Error::InvalidCiphertext))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl From<Vec<u64>> for Ciphertext {
    fn from(values: Vec<u64>) -> Self {
        Self(values)
    }
}

impl FromStr for Ciphertext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|_| Error::InvalidCiphertext)?;
        Self::from_json(&value)
    }
}

impl<'a> IntoIterator for &'a Ciphertext {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Cipher {
    /// Decrypt a ciphertext with `private_key`
    pub fn decrypt<K: ToPrimitive>(&self, ciphertext: &Ciphertext, private_key: K) -> Result<String> {
        let key = validate_key(&private_key)?;

        ciphertext
            .iter()
            .map(|&value| {
                let code_point = mod_pow(value, key, self.modulus());
                u32::try_from(code_point)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(Error::InvalidCiphertext)
            })
            .collect()
    }
}
