/// Flood risk thresholds for rainfall magnitudes.
///
/// Two scales are in use depending on granularity: a monthly scale applied to
/// single-month rainfall (historical or predicted), and an annual scale
/// applied to yearly totals. Every band is closed on its lower bound, so a
/// value sitting exactly on a threshold belongs to the higher tier.

use serde::Serialize;

use crate::model::RiskTier;

// ---------------------------------------------------------------------------
// Threshold constants
// ---------------------------------------------------------------------------

/// Monthly rainfall (mm) at or above which risk is High.
pub const MONTHLY_HIGH_MM: f64 = 350.0;
/// Monthly rainfall (mm) at or above which risk is Medium.
pub const MONTHLY_MEDIUM_MM: f64 = 250.0;

/// Annual rainfall (mm) at or above which risk is High.
pub const ANNUAL_HIGH_MM: f64 = 3000.0;
/// Annual rainfall (mm) at or above which risk is Medium.
pub const ANNUAL_MEDIUM_MM: f64 = 2500.0;

// ---------------------------------------------------------------------------
// Scales
// ---------------------------------------------------------------------------

/// Which magnitude granularity a value is measured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskScale {
    Monthly,
    Annual,
}

/// A shaded risk zone on a rainfall chart, `lower <= value < upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskBand {
    pub tier: RiskTier,
    pub lower: f64,
    pub upper: f64,
}

impl RiskScale {
    /// (medium, high) lower bounds for this scale.
    fn cutoffs(&self) -> (f64, f64) {
        match self {
            RiskScale::Monthly => (MONTHLY_MEDIUM_MM, MONTHLY_HIGH_MM),
            RiskScale::Annual => (ANNUAL_MEDIUM_MM, ANNUAL_HIGH_MM),
        }
    }

    /// Upper edge of the High band when drawn on a chart axis.
    fn chart_ceiling(&self) -> f64 {
        match self {
            RiskScale::Monthly => 800.0,
            RiskScale::Annual => 4000.0,
        }
    }

    /// Classifies a rainfall magnitude on this scale.
    pub fn classify(&self, value: f64) -> RiskTier {
        let (medium, high) = self.cutoffs();
        if value >= high {
            RiskTier::High
        } else if value >= medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Chart zones for this scale, highest tier first.
    pub fn bands(&self) -> [RiskBand; 3] {
        let (medium, high) = self.cutoffs();
        [
            RiskBand { tier: RiskTier::High, lower: high, upper: self.chart_ceiling() },
            RiskBand { tier: RiskTier::Medium, lower: medium, upper: high },
            RiskBand { tier: RiskTier::Low, lower: 0.0, upper: medium },
        ]
    }

    /// Legend entries matching `bands()`, e.g. "High Risk (≥350 mm)".
    pub fn legend(&self) -> [String; 3] {
        let (medium, high) = self.cutoffs();
        [
            format!("High Risk (≥{} mm)", high),
            format!("Medium Risk ({}–{} mm)", medium, high - 1.0),
            format!("Low Risk (<{} mm)", medium),
        ]
    }
}

/// Classifies a single month's rainfall.
pub fn classify_monthly(value_mm: f64) -> RiskTier {
    RiskScale::Monthly.classify(value_mm)
}

/// Classifies a yearly rainfall total.
pub fn classify_annual(value_mm: f64) -> RiskTier {
    RiskScale::Annual.classify(value_mm)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- Monthly scale -------------------------------------------------------

    #[test]
    fn test_monthly_lower_bounds_are_closed() {
        assert_eq!(classify_monthly(350.0), RiskTier::High);
        assert_eq!(classify_monthly(250.0), RiskTier::Medium);
        assert_eq!(classify_monthly(249.999), RiskTier::Low);
        assert_eq!(classify_monthly(349.999), RiskTier::Medium);
    }

    #[test]
    fn test_monthly_extremes() {
        assert_eq!(classify_monthly(0.0), RiskTier::Low);
        assert_eq!(classify_monthly(5_000.0), RiskTier::High);
    }

    #[test]
    fn test_constant_300_is_medium() {
        assert_eq!(classify_monthly(300.0).label(), "Medium Risk");
    }

    // --- Annual scale --------------------------------------------------------

    #[test]
    fn test_annual_boundaries() {
        assert_eq!(classify_annual(2999.0), RiskTier::Medium);
        assert_eq!(classify_annual(3000.0), RiskTier::High);
        assert_eq!(classify_annual(2500.0), RiskTier::Medium);
        assert_eq!(classify_annual(2499.5), RiskTier::Low);
    }

    // --- Monotonicity --------------------------------------------------------

    #[test]
    fn test_classification_never_decreases_with_magnitude() {
        for scale in [RiskScale::Monthly, RiskScale::Annual] {
            let mut previous = RiskTier::Low;
            let mut value = 0.0;
            while value < 5_000.0 {
                let tier = scale.classify(value);
                assert!(
                    tier >= previous,
                    "{:?}: tier dropped from {:?} to {:?} at {}",
                    scale,
                    previous,
                    tier,
                    value
                );
                previous = tier;
                value += 0.5;
            }
        }
    }

    // --- Bands ---------------------------------------------------------------

    #[test]
    fn test_bands_agree_with_classification() {
        for scale in [RiskScale::Monthly, RiskScale::Annual] {
            for band in scale.bands() {
                assert_eq!(scale.classify(band.lower), band.tier);
                assert!(band.lower < band.upper);
            }
        }
    }

    #[test]
    fn test_monthly_legend_text() {
        let legend = RiskScale::Monthly.legend();
        assert_eq!(legend[0], "High Risk (≥350 mm)");
        assert_eq!(legend[1], "Medium Risk (250–349 mm)");
        assert_eq!(legend[2], "Low Risk (<250 mm)");
    }

    #[test]
    fn test_annual_legend_text() {
        let legend = RiskScale::Annual.legend();
        assert_eq!(legend[0], "High Risk (≥3000 mm)");
        assert_eq!(legend[1], "Medium Risk (2500–2999 mm)");
    }
}
