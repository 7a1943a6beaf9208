use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Deterministic random source keyed by a string seed.
pub fn rng_from_seed(seed: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(hash_seed(seed))
}

/// FNV-1a hash of the seed string.
pub fn hash_seed(seed: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in seed.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Seed recorded for worksheets that were not given one.
pub fn fresh_seed() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
