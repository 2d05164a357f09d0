use std::fmt::{self, Debug, Formatter};

use asn1::Integer;
use num_bigint::BigUint;
use pkcs::pkcs1::{RSAPrivateKey, RSAPublicKey};
use pkcs::raw::{RawRSAPrivateKey, RawRSAPublicKey};

// Only called on integers the decoders already checked to be positive.
fn magnitude(int: &Integer) -> BigUint {
    int.to_biguint().unwrap_or_default()
}

fn byte_len(n: &BigUint) -> usize {
    n.bits().div_ceil(8) as usize
}

/// RSA public key `(n, e)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RsaPublicKey {
    n: BigUint,
    e: BigUint,
}

impl RsaPublicKey {
    /// Modulus.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Public exponent.
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        byte_len(&self.n)
    }
}

/// RSA private key.
///
/// `primes` holds at least two primes; multi-prime keys carry more. CRT
/// values stored in the file are not kept. `Debug` prints only the public
/// half.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    n: BigUint,
    e: BigUint,
    d: BigUint,
    primes: Vec<BigUint>,
}

impl RsaPrivateKey {
    /// Modulus.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Public exponent.
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// Private exponent.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    pub fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    /// Bit length of the modulus.
    pub fn bits(&self) -> u64 {
        self.n.bits()
    }

    /// Modulus size in bytes.
    pub fn size(&self) -> usize {
        byte_len(&self.n)
    }

    pub fn to_public_key(&self) -> RsaPublicKey {
        RsaPublicKey::from(self)
    }

    pub fn into_public_key(self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n,
            e: self.e,
        }
    }
}

impl Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &self.n)
            .field("e", &self.e)
            .finish_non_exhaustive()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(key: &RsaPrivateKey) -> Self {
        RsaPublicKey {
            n: key.n.clone(),
            e: key.e.clone(),
        }
    }
}

impl From<&RSAPrivateKey> for RsaPrivateKey {
    fn from(key: &RSAPrivateKey) -> Self {
        RsaPrivateKey {
            n: magnitude(&key.modulus),
            e: magnitude(&key.public_exponent),
            d: magnitude(&key.private_exponent),
            primes: key.primes().map(magnitude).collect(),
        }
    }
}

impl From<&RawRSAPrivateKey> for RsaPrivateKey {
    fn from(key: &RawRSAPrivateKey) -> Self {
        RsaPrivateKey {
            n: magnitude(&key.modulus),
            e: magnitude(&key.public_exponent),
            d: magnitude(&key.private_exponent),
            primes: key.primes.iter().map(magnitude).collect(),
        }
    }
}

impl From<&RSAPublicKey> for RsaPublicKey {
    fn from(key: &RSAPublicKey) -> Self {
        RsaPublicKey {
            n: magnitude(&key.modulus),
            e: magnitude(&key.public_exponent),
        }
    }
}

impl From<&RawRSAPublicKey> for RsaPublicKey {
    fn from(key: &RawRSAPublicKey) -> Self {
        RsaPublicKey {
            n: magnitude(&key.modulus),
            e: magnitude(&key.public_exponent),
        }
    }
}
