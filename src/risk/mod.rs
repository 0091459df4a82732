/// Flood risk evaluation.
///
/// Submodules:
/// - `thresholds`: static monthly/annual rainfall thresholds and tier bands.

pub mod thresholds;
