//! Cleaning policy for the merged dataset.

/// Island and autonomous-city provinces outside the analytical scope.
pub const EXCLUDED_PROVINCES: [&str; 5] = [
    "Santa Cruz de Tenerife",
    "Las Palmas",
    "Illes Balears",
    "Ceuta",
    "Melilla",
];

/// Sentinel values some sources write instead of leaving the field blank.
pub const SENTINEL_PROVINCES: [&str; 2] = ["Desconocido", "Error"];

/// Thresholds and bounds applied by the dataset cleaner.
#[derive(Debug, Clone)]
pub struct CleanConfig {
    /// Rows with a missing province are dropped only while their fraction of
    /// the table stays strictly below this value. At or above it the drop is
    /// skipped and a warning is emitted instead, since a high missing rate
    /// points at an upstream join failure rather than stray bad rows.
    pub null_province_threshold: f64,
    /// Provinces removed unconditionally.
    pub excluded_provinces: Vec<String>,
    /// Placeholder values removed unconditionally.
    pub sentinel_provinces: Vec<String>,
    /// First calendar year kept, inclusive.
    pub year_min: i32,
    /// Last calendar year kept, inclusive.
    pub year_max: i32,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            null_province_threshold: 0.05,
            excluded_provinces: EXCLUDED_PROVINCES.iter().map(|s| (*s).to_string()).collect(),
            sentinel_provinces: SENTINEL_PROVINCES.iter().map(|s| (*s).to_string()).collect(),
            year_min: 2000,
            year_max: 2022,
        }
    }
}

impl CleanConfig {
    pub fn year_in_range(&self, year: i32) -> bool {
        year >= self.year_min && year <= self.year_max
    }
}
