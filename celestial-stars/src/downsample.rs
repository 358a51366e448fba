//! Brightest-first catalog reduction.
//!
//! Stars are ranked by absolute magnitude (brightest first) with ties broken
//! by ascending HIP id, so the selection never depends on hash map order.

use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::catalog::Catalog;
use crate::record::StarRecord;

/// Ranking used for downsampling: `abs_mag` ascending, then `hip_id` ascending.
pub fn brightness_order(a: &StarRecord, b: &StarRecord) -> Ordering {
    a.abs_mag
        .cmp(&b.abs_mag)
        .then_with(|| a.hip_id.cmp(&b.hip_id))
}

/// Keep the `n` brightest stars of `catalog` in a new catalog.
///
/// `n >= catalog.num_stars()` returns a copy of the whole catalog. Name
/// indices are filtered to the surviving stars and magnitude bounds are
/// recomputed. `catalog` itself is not modified.
pub fn downsample(catalog: &Catalog, n: usize) -> Catalog {
    let total = catalog.num_stars();
    if n >= total {
        return catalog.clone();
    }

    let mut ranked: Vec<&StarRecord> = catalog.stars().collect();
    if n > 0 {
        ranked.select_nth_unstable_by(n - 1, |a, b| brightness_order(a, b));
    }
    ranked.truncate(n);

    let stars_by_hip: HashMap<u32, StarRecord> =
        ranked.into_iter().map(|s| (s.hip_id, *s)).collect();

    let hip_by_name: HashMap<String, u32> = catalog
        .hip_by_name_map()
        .iter()
        .filter(|(_, hip)| stars_by_hip.contains_key(hip))
        .map(|(name, &hip)| (name.clone(), hip))
        .collect();

    let names_by_hip: HashMap<u32, Vec<String>> = catalog
        .names_by_hip()
        .iter()
        .filter(|(hip, _)| stars_by_hip.contains_key(hip))
        .map(|(&hip, names)| (hip, names.clone()))
        .collect();

    debug!(kept = n, discarded = total - n, "Downsampled star catalog");

    Catalog::from_indices(stars_by_hip, hip_by_name, names_by_hip)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random catalog with plenty of magnitude ties.
    fn synthetic_catalog(count: u32) -> Catalog {
        let mut state: u32 = 0x2545_f491;
        let stars: Vec<StarRecord> = (0..count)
            .map(|i| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let mag = ((state >> 16) % 64) as i16 * 64 - 1024;
                let hip = i.wrapping_mul(7919) % 100_003;
                StarRecord::new(hip, [i as f32, 0.0, 0.0], mag, 0x0426)
            })
            .collect();
        let names: Vec<(String, u32)> = stars
            .iter()
            .step_by(3)
            .map(|s| (format!("Star {}", s.hip_id), s.hip_id))
            .collect();
        Catalog::from_parts(stars, names)
    }

    fn check_invariants(catalog: &Catalog) {
        assert_eq!(catalog.num_stars(), catalog.stars().count());
        for hip in catalog.hip_by_name_map().values() {
            assert!(catalog.star(*hip).is_some(), "dangling name for {}", hip);
        }
        for hip in catalog.names_by_hip().keys() {
            assert!(catalog.star(*hip).is_some(), "dangling aliases for {}", hip);
        }
        for star in catalog.stars() {
            assert!(catalog.min_mag().unwrap() <= star.abs_mag);
            assert!(star.abs_mag <= catalog.max_mag().unwrap());
        }
    }

    #[test]
    fn test_keeps_brightest() {
        let full = synthetic_catalog(2000);
        let reduced = downsample(&full, 150);
        assert_eq!(reduced.num_stars(), 150);

        let mut all: Vec<&StarRecord> = full.stars().collect();
        all.sort_by(|a, b| brightness_order(a, b));
        let expected: Vec<u32> = all[..150].iter().map(|s| s.hip_id).collect();

        let mut kept: Vec<&StarRecord> = reduced.stars().collect();
        kept.sort_by(|a, b| brightness_order(a, b));
        let kept: Vec<u32> = kept.iter().map(|s| s.hip_id).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_kept_never_fainter_than_discarded() {
        let full = synthetic_catalog(1000);
        let reduced = downsample(&full, 333);
        for discarded in full.stars().filter(|s| reduced.star(s.hip_id).is_none()) {
            for kept in reduced.stars() {
                assert!(kept.abs_mag <= discarded.abs_mag);
                if kept.abs_mag == discarded.abs_mag {
                    assert!(kept.hip_id < discarded.hip_id);
                }
            }
        }
    }

    #[test]
    fn test_tie_break_by_hip_id() {
        let stars = vec![
            StarRecord::new(30, [0.0; 3], 100, 0),
            StarRecord::new(10, [0.0; 3], 100, 0),
            StarRecord::new(20, [0.0; 3], 100, 0),
            StarRecord::new(5, [0.0; 3], 900, 0),
        ];
        let reduced = Catalog::from_parts(stars, Vec::<(String, u32)>::new()).downsample(2);
        assert!(reduced.star(10).is_some());
        assert!(reduced.star(20).is_some());
        assert!(reduced.star(30).is_none());
        assert!(reduced.star(5).is_none());
    }

    #[test]
    fn test_n_at_least_total_returns_equal_catalog() {
        let full = synthetic_catalog(50);
        assert_eq!(downsample(&full, 50), full);
        assert_eq!(downsample(&full, 5000), full);
    }

    #[test]
    fn test_zero_yields_empty_catalog() {
        let reduced = downsample(&synthetic_catalog(20), 0);
        assert!(reduced.is_empty());
        assert_eq!(reduced.min_mag(), None);
        assert_eq!(reduced.max_mag(), None);
        assert_eq!(reduced.name_count(), 0);
    }

    #[test]
    fn test_input_is_unchanged() {
        let full = synthetic_catalog(400);
        let before = full.clone();
        let _ = downsample(&full, 10);
        assert_eq!(full, before);
    }

    #[test]
    fn test_idempotent() {
        let full = synthetic_catalog(800);
        let once = downsample(&full, 120);
        assert_eq!(downsample(&once, 120), once);
        assert_eq!(downsample(&once, 500), once);
    }

    #[test]
    fn test_invariants_hold() {
        let full = synthetic_catalog(900);
        check_invariants(&full);
        for n in [1, 7, 100, 899] {
            check_invariants(&downsample(&full, n));
        }
    }

    #[test]
    fn test_names_follow_survivors() {
        let stars = vec![
            StarRecord::new(1, [0.0; 3], -500, 0),
            StarRecord::new(2, [0.0; 3], 2000, 0),
        ];
        let names = vec![("Bright", 1), ("Faint", 2), ("Also Bright", 1)];
        let reduced = Catalog::from_parts(stars, names).downsample(1);
        assert_eq!(reduced.hip_by_name("Bright"), Some(1));
        assert_eq!(reduced.hip_by_name("Also Bright"), Some(1));
        assert_eq!(reduced.hip_by_name("Faint"), None);
        assert_eq!(reduced.names(1), ["Bright", "Also Bright"]);
        assert!(reduced.names(2).is_empty());
    }

    #[test]
    fn test_bounds_recomputed() {
        let stars = vec![
            StarRecord::new(1, [0.0; 3], -500, 0),
            StarRecord::new(2, [0.0; 3], 40, 0),
            StarRecord::new(3, [0.0; 3], 2000, 0),
        ];
        let full = Catalog::from_parts(stars, Vec::<(String, u32)>::new());
        assert_eq!(full.max_mag(), Some(2000));
        let reduced = full.downsample(2);
        assert_eq!(reduced.min_mag(), Some(-500));
        assert_eq!(reduced.max_mag(), Some(40));
    }
}
