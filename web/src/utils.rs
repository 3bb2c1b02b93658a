use std::sync::OnceLock;

static FORCED_SEED: OnceLock<u64> = OnceLock::new();

/// Makes every new game use `seed`, for reproducing a board.
pub(crate) fn force_seed(seed: u64) {
    if FORCED_SEED.set(seed).is_err() {
        log::warn!("seed already forced, ignoring {}", seed);
    }
}

/// Seed for the next game: the forced one if any, otherwise from JavaScript's Math.random.
pub(crate) fn next_seed() -> u64 {
    FORCED_SEED.get().copied().unwrap_or_else(js_random_seed)
}

fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}
