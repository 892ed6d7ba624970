use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Create a deterministic RNG from a seed.
pub fn create_rng(seed: u64) -> ChaCha12Rng {
    ChaCha12Rng::seed_from_u64(seed)
}

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive the seed of an independent sub-stream (one per worker or particle).
///
/// Non-linear in both arguments, so nested derivations (a per-particle fork
/// of a per-worker stream) do not land on a sibling's seed.
pub fn derive_stream_seed(base_seed: u64, stream: u64) -> u64 {
    let key = stream
        .wrapping_add(1)
        .wrapping_mul(crate::constants::RNG_DERIVATION_PRIME);
    mix64(base_seed ^ mix64(key))
}
