// RSA Module - Main module file
// Textbook RSA over small primes: number theory, key manager, cipher

pub mod numtheory;
pub mod keygen;
pub mod encrypt;
pub mod decrypt;

pub use numtheory::{are_relatively_prime, is_prime, mod_inverse, mod_pow, modular_exponentiation};
pub use keygen::{KeyManager, KeyPair, MAX_KEYGEN_ATTEMPTS};
pub use encrypt::{Cipher, Message};
pub use decrypt::Ciphertext;
