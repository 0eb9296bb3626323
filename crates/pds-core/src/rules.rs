//! Air quality severity classification rules.
//!
//! Boundaries follow the national air quality index bands per pollutant, in
//! µg/m3. Buckets are lower-bound inclusive and upper-bound exclusive, with
//! the final bucket unbounded above.

/// Ordered severity labels, best to worst.
pub const SEVERITY_LABELS: [&str; 6] = [
    "BUENA",
    "RAZONABLEMENTE BUENA",
    "REGULAR",
    "DESFAVORABLE",
    "MUY DESFAVORABLE",
    "EXTREMADAMENTE DESFAVORABLE",
];

/// Label for readings of pollutants without a registered threshold table.
pub const SEVERITY_UNCLASSIFIED: &str = "UNKNOWN";

/// Bucket boundaries for a pollutant, lowercased name.
pub fn severity_boundaries(pollutant: &str) -> Option<&'static [f64; 7]> {
    match pollutant {
        "so2" => Some(&[0.0, 100.0, 200.0, 350.0, 500.0, 750.0, f64::INFINITY]),
        "pm2.5" => Some(&[0.0, 10.0, 20.0, 25.0, 50.0, 75.0, f64::INFINITY]),
        "pm10" => Some(&[0.0, 20.0, 40.0, 50.0, 100.0, 150.0, f64::INFINITY]),
        "o3" => Some(&[0.0, 50.0, 100.0, 130.0, 240.0, 380.0, f64::INFINITY]),
        "no2" => Some(&[0.0, 40.0, 90.0, 120.0, 230.0, 340.0, f64::INFINITY]),
        _ => None,
    }
}

/// Classify one reading. Pure function over (pollutant, value).
///
/// Unregistered pollutants and missing or out-of-range values yield the
/// explicit unclassified label instead of failing the row.
pub fn classify_level(pollutant: &str, value: Option<f64>) -> &'static str {
    let Some(bounds) = severity_boundaries(pollutant) else {
        return SEVERITY_UNCLASSIFIED;
    };
    let Some(value) = value else {
        return SEVERITY_UNCLASSIFIED;
    };
    for (idx, label) in SEVERITY_LABELS.iter().copied().enumerate() {
        if value >= bounds[idx] && value < bounds[idx + 1] {
            return label;
        }
    }
    SEVERITY_UNCLASSIFIED
}
