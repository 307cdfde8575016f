//! # utilkit
//!
//! Small, independent helpers:
//!
//! - [`rsa`]: textbook RSA over small primes (key manager, cipher, number theory)
//! - [`util::format`]: string case conversion, slugs, email obfuscation
//! - [`util::color`]: RGB/RGBA ⇄ HEX conversion and light/dark classification
//! - [`logger`]: leveled structured logging over one shared backend
//! - [`preload`]: awaitable wrapper around a callback-based image loader
//!
//! ## Example
//!
//! ```rust
//! use utilkit::rsa::KeyManager;
//!
//! let manager = KeyManager::new();
//! let keys = manager.generate_key_pair().expect("default primes have candidates");
//! let ciphertext = manager.encrypt("Hello World", keys.public_key).unwrap();
//! assert_eq!(manager.decrypt(&ciphertext, keys.private_key).unwrap(), "Hello World");
//! ```

pub mod error;
pub mod logger;
pub mod preload;
pub mod rsa;
pub mod util;

pub use error::{Error, Result};
pub use logger::{LogEvent, LogLevel, Logger};
pub use rsa::{Cipher, Ciphertext, KeyManager, KeyPair, Message};
