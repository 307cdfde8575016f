// RSA Key Generation
// Holds the two primes, derives modulus and totient, and draws key pairs

use num_traits::ToPrimitive;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::decrypt::Ciphertext;
use super::encrypt::{Cipher, Message};
use super::numtheory::{are_relatively_prime, is_prime, mod_inverse, to_whole};
use crate::error::{Error, Result};

/// Default first prime
pub const DEFAULT_PRIME_P: u64 = 17;
/// Default second prime
pub const DEFAULT_PRIME_Q: u64 = 19;

/// Upper bound on key draws before giving up on a totient whose
/// candidates are all self-inverse.
pub const MAX_KEYGEN_ATTEMPTS: usize = 64;

/// RSA Key Pair
///
/// `private_key` is the exponent drawn from the coprime candidates and
/// `public_key` is its inverse modulo the totient. This is the reverse of the
/// usual RSA naming and is kept for compatibility with existing ciphertexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub public_key: u64,
    pub private_key: u64,
}

/// Which of the two primes a setter is updating
#[derive(Debug, Clone, Copy)]
enum Slot {
    P,
    Q,
}

/// Owns the prime parameters of the toy RSA system.
///
/// Modulus and totient are recomputed on every successful prime update, so
/// they are always consistent with the current primes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyManager {
    prime_p: u64,
    prime_q: u64,
    modulus: u64,
    totient: u64,
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::from_primes(DEFAULT_PRIME_P, DEFAULT_PRIME_Q)
    }
}

impl KeyManager {
    /// Key manager with the default primes (17, 19)
    pub fn new() -> Self {
        Self::default()
    }

    /// Key manager with caller-supplied primes
    pub fn with_primes<P: ToPrimitive, Q: ToPrimitive>(p: P, q: Q) -> Result<Self> {
        let mut manager = Self::default();
        manager.set_prime_p(p)?;
        manager.set_prime_q(q)?;
        Ok(manager)
    }

    fn from_primes(prime_p: u64, prime_q: u64) -> Self {
        Self {
            prime_p,
            prime_q,
            modulus: prime_p * prime_q,
            totient: (prime_p - 1) * (prime_q - 1),
        }
    }

    pub fn prime_p(&self) -> u64 {
        self.prime_p
    }

    pub fn prime_q(&self) -> u64 {
        self.prime_q
    }

    /// n = p * q
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// φ(n) = (p - 1)(q - 1)
    pub fn totient(&self) -> u64 {
        self.totient
    }

    /// Replace the first prime
    pub fn set_prime_p<N: ToPrimitive>(&mut self, p: N) -> Result<()> {
        self.set_prime(Slot::P, p)
    }

    /// Replace the second prime
    pub fn set_prime_q<N: ToPrimitive>(&mut self, q: N) -> Result<()> {
        self.set_prime(Slot::Q, q)
    }

    fn set_prime<N: ToPrimitive>(&mut self, slot: Slot, value: N) -> Result<()> {
        let value = validate_prime(&value)?;
        *self = match slot {
            Slot::P => Self::from_primes(value, self.prime_q),
            Slot::Q => Self::from_primes(self.prime_p, value),
        };
        Ok(())
    }

    /// Every e in (1, φ(n)) with gcd(e, φ(n)) == 1.
    ///
    /// Materializes the whole set, so it is meant for inspecting small
    /// parameters. Key generation samples from the same set without it.
    pub fn public_exponent_candidates(&self) -> Vec<u64> {
        (2..self.totient)
            .filter(|&e| are_relatively_prime(e, self.totient))
            .collect()
    }

    /// Generate a key pair using the thread-local RNG
    pub fn generate_key_pair(&self) -> Result<KeyPair> {
        self.generate_key_pair_with(&mut rand::thread_rng())
    }

    /// Generate a key pair from the given RNG.
    ///
    /// The exponent is drawn uniformly from the coprime candidates by
    /// rejection sampling, so memory use does not grow with the totient.
    pub fn generate_key_pair_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<KeyPair> {
        let no_candidates = Error::NoCandidatesFound {
            totient: self.totient,
        };
        // (1, φ) is empty for φ <= 2; otherwise φ - 1 is always a candidate
        if self.totient <= 2 {
            return Err(no_candidates);
        }

        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let drawn = self.draw_candidate(rng);
            let inverse = mod_inverse(drawn, self.totient)?;

            // Self-inverse exponents would make both keys equal; draw again
            if inverse == drawn {
                continue;
            }

            return Ok(KeyPair {
                public_key: inverse,
                private_key: drawn,
            });
        }

        Err(no_candidates)
    }

    fn draw_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        loop {
            let e = rng.gen_range(2..self.totient);
            if are_relatively_prime(e, self.totient) {
                return e;
            }
        }
    }

    /// Cipher bound to the current modulus
    pub fn cipher(&self) -> Cipher {
        Cipher::from_modulus(self.modulus)
    }

    /// Encrypt a message under the current modulus
    pub fn encrypt<M, K>(&self, message: M, public_key: K) -> Result<Ciphertext>
    where
        M: Into<Message>,
        K: ToPrimitive,
    {
        self.cipher().encrypt(message, public_key)
    }

    /// Decrypt a ciphertext under the current modulus
    pub fn decrypt<K: ToPrimitive>(&self, ciphertext: &Ciphertext, private_key: K) -> Result<String> {
        self.cipher().decrypt(ciphertext, private_key)
    }
}

fn validate_prime<N: ToPrimitive>(value: &N) -> Result<u64> {
    let value = to_whole(value)
        .ok_or_else(|| Error::InvalidArgument("prime must be a whole number".to_string()))?;
    if value == 0 {
        return Err(Error::InvalidArgument("prime must be non-zero".to_string()));
    }
    if value > u64::from(u32::MAX) {
        return Err(Error::InvalidArgument(format!(
            "prime {} exceeds the supported range",
            value
        )));
    }
    if !is_prime(value) {
        return Err(Error::NotPrime(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_parameters() {
        let manager = KeyManager::new();
        assert_eq!(manager.prime_p(), 17);
        assert_eq!(manager.prime_q(), 19);
        assert_eq!(manager.modulus(), 323);
        assert_eq!(manager.totient(), 288);
    }

    #[test]
    fn test_setters_recompute_modulus() {
        let mut manager = KeyManager::new();
        manager.set_prime_p(61).unwrap();
        assert_eq!(manager.modulus(), 61 * 19);
        assert_eq!(manager.totient(), 60 * 18);

        manager.set_prime_q(53u32).unwrap();
        assert_eq!(manager.modulus(), 3233);
        assert_eq!(manager.totient(), 3120);
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut manager = KeyManager::new();

        assert!(matches!(manager.set_prime_p(0), Err(Error::InvalidArgument(_))));
        assert!(matches!(manager.set_prime_p(f64::NAN), Err(Error::InvalidArgument(_))));
        assert!(matches!(manager.set_prime_q(-7i32), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            manager.set_prime_q(4_294_967_311u64),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(manager.set_prime_p(21), Err(Error::NotPrime(21)));
        assert_eq!(manager.set_prime_q(1), Err(Error::NotPrime(1)));

        // Failed updates leave the state untouched
        assert_eq!(manager, KeyManager::new());
    }

    #[test]
    fn test_key_generation() {
        let manager = KeyManager::new();
        for _ in 0..50 {
            let keys = manager.generate_key_pair().unwrap();
            assert_ne!(keys.public_key, keys.private_key);
            assert!(keys.public_key > 1 && keys.public_key < 288);
            assert!(keys.private_key > 1 && keys.private_key < 288);
            assert_eq!((keys.public_key * keys.private_key) % 288, 1);
        }
    }

    #[test]
    fn test_key_generation_is_seedable() {
        let manager = KeyManager::new();
        let a = manager.generate_key_pair_with(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = manager.generate_key_pair_with(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_drawn_candidate_is_private_key() {
        let manager = KeyManager::new();
        let candidates = manager.public_exponent_candidates();
        let keys = manager.generate_key_pair().unwrap();
        assert!(candidates.contains(&keys.private_key));
        assert_eq!(mod_inverse(keys.private_key, 288), Ok(keys.public_key));
    }

    #[test]
    fn test_candidates() {
        let manager = KeyManager::new();
        let candidates = manager.public_exponent_candidates();
        // φ(288) = 96 units, minus the unit 1
        assert_eq!(candidates.len(), 95);
        assert!(candidates.iter().all(|&e| are_relatively_prime(e, 288)));
        assert!(!candidates.contains(&1));
    }

    #[test]
    fn test_no_candidates() {
        // φ = (2 - 1)(3 - 1) = 2 leaves nothing in (1, 2)
        let manager = KeyManager::with_primes(2, 3).unwrap();
        assert_eq!(
            manager.generate_key_pair(),
            Err(Error::NoCandidatesFound { totient: 2 })
        );
    }

    #[test]
    fn test_only_self_inverse_candidates() {
        // φ = 8: every unit mod 8 is its own inverse
        let manager = KeyManager::with_primes(3, 5).unwrap();
        assert_eq!(manager.public_exponent_candidates(), vec![3, 5, 7]);
        assert_eq!(
            manager.generate_key_pair(),
            Err(Error::NoCandidatesFound { totient: 8 })
        );
    }

    #[test]
    fn test_key_generation_with_large_primes() {
        // φ = 65520 * 65536, far too many candidates to enumerate
        let manager = KeyManager::with_primes(65521, 65537).unwrap();
        assert_eq!(manager.totient(), 4_293_918_720);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let keys = manager.generate_key_pair_with(&mut rng).unwrap();
            assert!(are_relatively_prime(keys.private_key, manager.totient()));
            let product = u128::from(keys.public_key) * u128::from(keys.private_key);
            assert_eq!(product % u128::from(manager.totient()), 1);
        }

        let keys = manager.generate_key_pair().unwrap();
        let ciphertext = manager.encrypt("Grüße, 世界", keys.public_key).unwrap();
        assert_eq!(manager.decrypt(&ciphertext, keys.private_key).unwrap(), "Grüße, 世界");
    }

    #[test]
    fn test_key_generation_at_upper_prime_bound() {
        // Largest prime below 2^32
        let manager = KeyManager::with_primes(4_294_967_291u64, 4_294_967_279u64).unwrap();
        let keys = manager.generate_key_pair_with(&mut StdRng::seed_from_u64(3)).unwrap();
        let product = u128::from(keys.public_key) * u128::from(keys.private_key);
        assert_eq!(product % u128::from(manager.totient()), 1);
    }

    #[test]
    fn test_key_pair_json_field_names() {
        let keys = KeyPair {
            public_key: 173,
            private_key: 5,
        };
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"{"publicKey":173,"privateKey":5}"#);
    }
}
