/// Aggregations over the loaded rainfall records.
///
/// Submodules:
/// - `groupings`    : filters plus sums, means and flood counts per key
/// - `rolling`      : trailing rolling mean (window 5 for trend lines)
/// - `overview`     : dataset, national and state headline numbers
/// - `patterns`     : yearly totals, trend and monthly distribution for a range
/// - `district_map` : per-district annual risk and annotated boundaries
/// - `diagnostics`  : admin-only dataset statistics
///
/// Nothing here mutates records or performs I/O.

pub mod diagnostics;
pub mod district_map;
pub mod groupings;
pub mod overview;
pub mod patterns;
pub mod rolling;

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2443.75, 1), 2443.8);
        assert_eq!(round_to(312.345, 0), 312.0);
        assert_eq!(round_to(-1.25, 1), -1.3);
    }
}
