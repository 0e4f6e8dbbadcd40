//! Electrical parameters of grid elements.
//!
//! All sources share one set of source values, all cables one set of cable
//! values and all loads one load resistance. Names keep the external keys
//! (`R_source`, `L_cabel`, ...) so parameter files stay interchangeable with
//! other tooling built on the same conventions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Keys every parameter mapping must provide.
pub const PARAMETER_KEYS: [&str; 6] = [
    "R_source", "L_source", "C_source", "R_cabel", "L_cabel", "R_load",
];

/// Scalar constants for sources, cables and loads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Source series resistance (ohm)
    #[serde(rename = "R_source")]
    pub r_source: f64,
    /// Source filter inductance (henry)
    #[serde(rename = "L_source")]
    pub l_source: f64,
    /// Source filter capacitance (farad)
    #[serde(rename = "C_source")]
    pub c_source: f64,
    /// Cable resistance (ohm)
    #[serde(rename = "R_cabel")]
    pub r_cabel: f64,
    /// Cable inductance (henry)
    #[serde(rename = "L_cabel")]
    pub l_cabel: f64,
    /// Load resistance (ohm)
    #[serde(rename = "R_load")]
    pub r_load: f64,
}

impl Parameters {
    /// Build parameters from a key/value mapping.
    ///
    /// Every key in [`PARAMETER_KEYS`] is required; extra keys are ignored.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self> {
        let get = |name: &'static str| {
            map.get(name)
                .copied()
                .ok_or(GridError::MissingParameter { name })
        };

        let params = Self {
            r_source: get("R_source")?,
            l_source: get("L_source")?,
            c_source: get("C_source")?,
            r_cabel: get("R_cabel")?,
            l_cabel: get("L_cabel")?,
            r_load: get("R_load")?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parse parameters from a JSON object of numbers.
    pub fn from_json(text: &str) -> Result<Self> {
        let map: HashMap<String, f64> =
            serde_json::from_str(text).map_err(|source| GridError::ParameterFormat { source })?;
        Self::from_map(&map)
    }

    /// Read a JSON parameter file.
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GridError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Check that every value is a positive finite number.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in PARAMETER_KEYS.into_iter().zip(self.values()) {
            if !(value.is_finite() && value > 0.0) {
                return Err(GridError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Values in [`PARAMETER_KEYS`] order.
    fn values(&self) -> [f64; 6] {
        [
            self.r_source,
            self.l_source,
            self.c_source,
            self.r_cabel,
            self.l_cabel,
            self.r_load,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map() -> HashMap<String, f64> {
        PARAMETER_KEYS
            .iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), (i + 1) as f64))
            .collect()
    }

    #[test]
    fn test_from_map() {
        let params = Parameters::from_map(&full_map()).unwrap();
        assert_eq!(params.r_source, 1.0);
        assert_eq!(params.c_source, 3.0);
        assert_eq!(params.r_load, 6.0);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let mut map = full_map();
        map.remove("L_cabel");
        let err = Parameters::from_map(&map).unwrap_err();
        assert!(matches!(err, GridError::MissingParameter { name: "L_cabel" }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_non_positive_value_rejected() {
        let mut map = full_map();
        map.insert("C_source".to_string(), 0.0);
        let err = Parameters::from_map(&map).unwrap_err();
        assert!(matches!(err, GridError::InvalidParameter { name: "C_source", .. }));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"R_source": 0.4, "L_source": 2.3e-3, "C_source": 10e-6,
                       "R_cabel": 0.722, "L_cabel": 0.264e-3, "R_load": 14, "extra": 1}"#;
        let params = Parameters::from_json(json).unwrap();
        assert_eq!(params.r_load, 14.0);
        assert_eq!(params.l_cabel, 0.264e-3);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Parameters::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, GridError::ParameterFormat { .. }));
    }
}
