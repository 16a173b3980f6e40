// SPDX-License-Identifier: MIT

//! Fallback carbon-footprint estimator.
//!
//! A fixed linear-weight formula used when the external prediction service
//! is unavailable. Unknown categories fall back to default factors rather
//! than failing; the estimator never errors.

/// Lifestyle inputs for a footprint estimate.
///
/// Field names match the external prediction service's wire format so the
/// same struct doubles as the request body for `PredictionClient`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LifestyleInput {
    pub transport_mode: String,
    pub km_per_day: f64,
    pub diet_type: String,
    #[serde(rename = "electricity_kWh_per_day")]
    pub electricity_kwh_per_day: f64,
    pub waste_kg_per_day: f64,
}

/// Per-km transport emission factors (kg CO2 per km).
const TRANSPORT_FACTORS: &[(&str, f64)] = &[
    ("car", 0.21),
    ("bus", 0.089),
    ("train", 0.041),
    ("bike", 0.0),
];

/// Applied when the transport mode is not recognized.
const DEFAULT_TRANSPORT_FACTOR: f64 = 0.15;

/// Per-day diet emission constants (kg CO2 per day).
const DIET_CONSTANTS: &[(&str, f64)] = &[("vegan", 2.9), ("vegetarian", 3.8), ("mixed", 7.19)];

/// Applied when the diet type is not recognized.
const DEFAULT_DIET_CONSTANT: f64 = 5.0;

/// kg CO2 per kWh of electricity (average grid factor).
const ELECTRICITY_FACTOR: f64 = 0.5;

/// kg CO2 per kg of waste.
const WASTE_FACTOR: f64 = 0.5;

fn lookup(table: &[(&str, f64)], key: &str, default: f64) -> f64 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, factor)| *factor)
        .unwrap_or(default)
}

/// Estimate a daily carbon footprint in kg CO2, rounded to two decimals.
pub fn estimate(input: &LifestyleInput) -> f64 {
    let footprint = lookup(
        TRANSPORT_FACTORS,
        &input.transport_mode,
        DEFAULT_TRANSPORT_FACTOR,
    ) * input.km_per_day
        + lookup(DIET_CONSTANTS, &input.diet_type, DEFAULT_DIET_CONSTANT)
        + ELECTRICITY_FACTOR * input.electricity_kwh_per_day
        + WASTE_FACTOR * input.waste_kg_per_day;

    (footprint * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(transport: &str, km: f64, diet: &str, kwh: f64, waste: f64) -> LifestyleInput {
        LifestyleInput {
            transport_mode: transport.to_string(),
            km_per_day: km,
            diet_type: diet.to_string(),
            electricity_kwh_per_day: kwh,
            waste_kg_per_day: waste,
        }
    }

    #[test]
    fn test_zero_distance_yields_diet_constant() {
        assert_eq!(estimate(&input("bike", 0.0, "vegan", 0.0, 0.0)), 2.9);
        assert_eq!(estimate(&input("bike", 0.0, "vegetarian", 0.0, 0.0)), 3.8);
        assert_eq!(estimate(&input("bike", 0.0, "mixed", 0.0, 0.0)), 7.19);
    }

    #[test]
    fn test_transport_factors() {
        // 100 km isolates the per-km factor on top of the vegan constant
        assert_eq!(estimate(&input("car", 100.0, "vegan", 0.0, 0.0)), 23.9);
        assert_eq!(estimate(&input("bus", 100.0, "vegan", 0.0, 0.0)), 11.8);
        assert_eq!(estimate(&input("train", 100.0, "vegan", 0.0, 0.0)), 7.0);
        assert_eq!(estimate(&input("bike", 100.0, "vegan", 0.0, 0.0)), 2.9);
    }

    #[test]
    fn test_unknown_categories_use_defaults() {
        // Unknown transport: 0.15 * 10 + vegan 2.9
        assert_eq!(estimate(&input("rocket", 10.0, "vegan", 0.0, 0.0)), 4.4);
        // Unknown diet: default 5.0, never zero
        assert_eq!(estimate(&input("bike", 0.0, "carnivore", 0.0, 0.0)), 5.0);
    }

    #[test]
    fn test_electricity_and_waste_weights() {
        // 0.5 * 12.5 + 0.5 * 1.8 on top of mixed 7.19
        assert_eq!(estimate(&input("bike", 0.0, "mixed", 12.5, 1.8)), 14.34);
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let value = estimate(&input("car", 3.333, "mixed", 0.7, 0.3));
        assert_eq!((value * 100.0).round() / 100.0, value);
    }

    #[test]
    fn test_wire_format_field_names() {
        let json = serde_json::to_value(input("car", 25.0, "mixed", 12.5, 1.8)).unwrap();
        // The prediction service expects the capital-W kWh spelling
        assert!(json.get("electricity_kWh_per_day").is_some());
        assert!(json.get("transport_mode").is_some());
    }
}
