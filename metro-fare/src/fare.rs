//! Distance-based fare banding.
//!
//! Fares are integer currency units. The banding curve is applied to the
//! traveled distance minus the network's free distance:
//!
//! | chargeable distance | fare |
//! |---------------------|------|
//! | up to 6 km          | 3    |
//! | up to 12 km         | 4    |
//! | up to 22 km         | 5    |
//! | up to 32 km         | 6    |
//! | beyond 32 km        | 7, plus 1 per further 20 km |

/// Fare charged for the shortest journeys.
pub const BASE_FARE: u32 = 3;

/// Upper bound (inclusive, meters) and fare of each fixed tier above the base.
const TIERS: [(i64, u32); 4] = [(6_000, 3), (12_000, 4), (22_000, 5), (32_000, 6)];

/// Fare of the first open-ended tier.
const LONG_DISTANCE_FARE: u32 = 7;

/// Length of each open-ended tier beyond 32 km, in meters.
const LONG_DISTANCE_STEP: i64 = 20_000;

/// Compute the fare for a journey of `distance_m` meters.
///
/// # Examples
///
/// ```
/// use metro_fare::fare::fare;
///
/// assert_eq!(fare(0, 0), 3);
/// assert_eq!(fare(6_001, 0), 4);
/// assert_eq!(fare(52_000, 0), 8);
/// ```
pub fn fare(distance_m: u64, free_distance_m: i64) -> u32 {
    let d = i64::try_from(distance_m)
        .unwrap_or(i64::MAX)
        .saturating_sub(free_distance_m);

    if d <= free_distance_m {
        return BASE_FARE;
    }

    for (upper, fare) in TIERS {
        if d <= upper {
            return fare;
        }
    }

    let (last_upper, _) = TIERS[TIERS.len() - 1];
    let steps = (d - last_upper) / LONG_DISTANCE_STEP;
    LONG_DISTANCE_FARE.saturating_add(u32::try_from(steps).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        let cases = [
            (0, 3),
            (3_000, 3),
            (6_000, 3),
            (6_001, 4),
            (12_000, 4),
            (12_001, 5),
            (22_000, 5),
            (22_001, 6),
            (32_000, 6),
            (32_001, 7),
            (51_999, 7),
            (52_000, 8),
            (52_001, 8),
            (72_000, 9),
        ];

        for (distance, expected) in cases {
            assert_eq!(fare(distance, 0), expected, "distance {distance}m");
        }
    }

    #[test]
    fn free_distance_shifts_curve() {
        // 7 km traveled with 1 km free is charged as 6 km.
        assert_eq!(fare(7_000, 1_000), 3);
        assert_eq!(fare(7_001, 1_000), 4);
        assert_eq!(fare(33_000, 1_000), 6);
        assert_eq!(fare(33_001, 1_000), 7);
    }

    #[test]
    fn large_free_distance_widens_base_tier() {
        // Chargeable distance up to the free distance itself stays at base.
        assert_eq!(fare(20_000, 10_000), 3);
        assert_eq!(fare(20_001, 10_000), 4);
        assert_eq!(fare(50_000, 25_000), 3);
        assert_eq!(fare(50_001, 25_000), 6);
    }

    #[test]
    fn negative_free_distance() {
        assert_eq!(fare(5_000, -1_000), 3);
        assert_eq!(fare(5_001, -1_000), 4);
    }

    #[test]
    fn extreme_distance_saturates() {
        assert!(fare(u64::MAX, 0) > LONG_DISTANCE_FARE);
        assert!(fare(u64::MAX, i64::MIN) >= LONG_DISTANCE_FARE);
    }
}
