//! Benchmark profiles for the sparse-life engine.
//!
//! Provides pre-built engines for benchmarking and scaling tests:
//!
//! - [`scaling_profile`]: a fixed 64x64 soup centred in a clipped square
//!   grid of any extent, so step cost can be compared across extents
//! - [`glider_fleet_profile`]: `n` gliders on an unbounded plane
//! - [`reference_soup`]: the seeded soup both profiles build on

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sparse_life_core::Pattern;
use sparse_life_engine::{SimulationConfig, SimulationEngine};
use sparse_life_space::BoundaryPolicy;

/// Side length of the soup placed by [`scaling_profile`].
pub const SOUP_SIDE: u32 = 64;

/// Density of the reference soup.
pub const SOUP_DENSITY: f64 = 0.35;

/// The seeded `SOUP_SIDE` x `SOUP_SIDE` soup, anchored at the origin.
pub fn reference_soup(seed: u64) -> Pattern {
    Pattern::random_soup(SOUP_SIDE, SOUP_SIDE, SOUP_DENSITY, seed).unwrap()
}

/// A clipped `extent` x `extent` engine holding the reference soup in
/// its centre.
///
/// The live count is independent of `extent`; only the grid grows.
/// Panics if `extent < SOUP_SIDE`.
pub fn scaling_profile(extent: u32, seed: u64) -> SimulationEngine {
    assert!(extent >= SOUP_SIDE, "extent {extent} smaller than the soup");
    let mut engine = SimulationEngine::new(BoundaryPolicy::clip(extent, extent).unwrap()).unwrap();
    let corner = ((extent - SOUP_SIDE) / 2) as i32;
    engine
        .apply_pattern(&reference_soup(seed).offset(corner, corner))
        .unwrap();
    engine
}

/// `n` gliders spaced 10 cells apart along the x axis, unbounded.
pub fn glider_fleet_profile(n: usize) -> SimulationEngine {
    let mut engine = SimulationEngine::new(BoundaryPolicy::Unbounded).unwrap();
    let glider = Pattern::glider();
    for i in 0..n {
        engine
            .apply_pattern(&glider.offset(i as i32 * 10, 0))
            .unwrap();
    }
    engine
}

/// Controller config for unpaced runs: unbounded, no auto-pause.
pub fn batch_config() -> SimulationConfig {
    SimulationConfig {
        boundary: BoundaryPolicy::Unbounded,
        auto_pause_on_stable: false,
        ..SimulationConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_profile_live_count_is_extent_independent() {
        let small = scaling_profile(100, 42);
        let large = scaling_profile(10_000, 42);
        assert!(small.live_count() > 0);
        assert_eq!(small.live_count(), large.live_count());
    }

    #[test]
    fn scaling_profile_is_centred() {
        let engine = scaling_profile(1000, 7);
        let (min, max) = engine.bounding_box().unwrap();
        assert!(min.x >= 468 && min.y >= 468);
        assert!(max.x < 532 && max.y < 532);
    }

    #[test]
    fn glider_fleet_has_five_cells_each() {
        assert_eq!(glider_fleet_profile(12).live_count(), 60);
    }

    #[test]
    fn batch_config_validates() {
        batch_config().validate().unwrap();
    }
}
