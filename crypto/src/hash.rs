//! Digest functions for payload hashing and transaction ids.

use blake2::digest::consts::{U32, U64};
use blake2::Blake2b;
use sha2::{Digest, Sha256, Sha384, Sha512};
use strand_types::HashAlgorithm;

type Blake2b256 = Blake2b<U32>;
type Blake2b512 = Blake2b<U64>;

/// Compute a 256-bit SHA-2 hash.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// SHA-256 applied twice; the signing digest for every key family.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute a 256-bit Blake2b hash.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Hash `data` with the selected algorithm, returning the raw digest.
pub fn hash_data(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        HashAlgorithm::Blake2b256 => blake2b_256(data).to_vec(),
        HashAlgorithm::Blake2b512 => {
            let mut hasher = Blake2b512::new();
            hasher.update(data);
            hasher.finalize().to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_lengths_match_algorithm() {
        for alg in [
            HashAlgorithm::Sha256,
            HashAlgorithm::Sha384,
            HashAlgorithm::Sha512,
            HashAlgorithm::Blake2b256,
            HashAlgorithm::Blake2b512,
        ] {
            assert_eq!(hash_data(alg, b"strand").len(), alg.digest_len());
        }
    }

    #[test]
    fn sha256_single_zero_byte() {
        // Known vector: SHA-256 of 0x00.
        assert_eq!(
            hex::encode(sha256(&[0u8])),
            "6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d"
        );
    }

    #[test]
    fn blake2b_256_single_zero_byte() {
        // Known vector: Blake2b-256 of 0x00.
        assert_eq!(
            hex::encode(blake2b_256(&[0u8])),
            "03170a2e7597b7b7e3d84c05391d139a62b157e78786d8c082f29dcf4c111314"
        );
    }

    #[test]
    fn double_sha256_differs_from_single() {
        assert_ne!(double_sha256(b"x"), sha256(b"x"));
        assert_eq!(double_sha256(b"x"), sha256(&sha256(b"x")));
    }

    #[test]
    fn multi_equivalent_to_concatenation() {
        assert_eq!(blake2b_256(b"helloworld"), blake2b_256_multi(&[b"hello", b"world"]));
    }
}
