// RSA Encryption Implementation
// Character-wise textbook RSA over the key manager's modulus

use num_traits::ToPrimitive;
use serde::Serialize;

use super::decrypt::Ciphertext;
use super::numtheory::{mod_pow, to_whole};
use crate::error::{Error, Result};

/// Anything that can be encrypted.
///
/// Each variant has one conversion to text: integers and floats use their
/// decimal spelling, records use canonical (sorted-key, compact) JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Integer(i128),
    Float(f64),
    Record(serde_json::Value),
}

impl Message {
    /// Build a record message from any serializable value
    pub fn record<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Message::Record(serde_json::to_value(value)?))
    }

    /// Text form that gets encrypted character by character
    pub fn to_text(&self) -> Result<String> {
        match self {
            Message::Text(text) => Ok(text.clone()),
            Message::Integer(n) => Ok(n.to_string()),
            Message::Float(f) => Ok(float_to_text(*f)),
            Message::Record(value) => Ok(serde_json::to_string(value)?),
        }
    }
}

fn float_to_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        let spelled = if f > 0.0 { "Infinity" } else { "-Infinity" };
        spelled.to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else {
        // Display already drops the trailing ".0" of whole values
        f.to_string()
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Message::Text(text.clone())
    }
}

macro_rules! integer_message {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Message {
                fn from(n: $t) -> Self {
                    Message::Integer(i128::from(n))
                }
            }
        )*
    };
}

integer_message!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

/// Widened to `f64` first, so the text is the `f64` spelling of the value
impl From<f32> for Message {
    fn from(f: f32) -> Self {
        Message::Float(f64::from(f))
    }
}

impl From<f64> for Message {
    fn from(f: f64) -> Self {
        Message::Float(f)
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Message::Text(text),
            other => Message::Record(other),
        }
    }
}

/// Encrypts and decrypts against a fixed modulus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cipher {
    modulus: u64,
}

impl Cipher {
    /// Cipher over an explicit modulus; zero is rejected
    pub fn new(modulus: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(Error::InvalidArgument("modulus must be non-zero".to_string()));
        }
        Ok(Self::from_modulus(modulus))
    }

    pub(crate) fn from_modulus(modulus: u64) -> Self {
        Self { modulus }
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Encrypt every character of the message with `public_key`.
    ///
    /// Characters whose code point is not below the modulus cannot be
    /// recovered by `decrypt`; choosing large enough primes is up to the caller.
    pub fn encrypt<M, K>(&self, message: M, public_key: K) -> Result<Ciphertext>
    where
        M: Into<Message>,
        K: ToPrimitive,
    {
        let key = validate_key(&public_key)?;
        let text = message.into().to_text()?;

        let values = text
            .chars()
            .map(|c| mod_pow(u64::from(u32::from(c)), key, self.modulus))
            .collect();

        Ok(Ciphertext::new(values))
    }
}

/// Keys must be positive whole numbers
pub(crate) fn validate_key<K: ToPrimitive>(key: &K) -> Result<u64> {
    match to_whole(key) {
        Some(key) if key > 0 => Ok(key),
        _ => Err(Error::InvalidKey),
    }
}
