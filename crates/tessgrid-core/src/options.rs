//! Configuration options for the displacement pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options controlling how displacements are computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Which triangles are considered for each point.
    pub locality: Locality,

    /// What to do with a triangle that has no well-defined plane.
    pub degenerate_policy: FailurePolicy,

    /// What to do with a primitive that falls outside the grid domain.
    pub out_of_domain_policy: FailurePolicy,
}

impl PipelineOptions {
    /// Parses options from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&text)?;
        log::debug!("loaded pipeline options from {}: {options:?}", path.display());
        Ok(options)
    }

    /// Serializes the options as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Candidate triangle set for a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locality {
    /// Only triangles in the point's own cell; the last one visited wins.
    #[default]
    SameCell,
    /// Triangles in the point's cell and its 26 neighbours; the nearest plane wins.
    Neighborhood,
    /// Every triangle in the grid; the nearest plane wins.
    Global,
}

/// Reaction to a primitive the pipeline cannot process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop and return the error.
    #[default]
    Abort,
    /// Log a warning, count it, and continue.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.locality, Locality::SameCell);
        assert_eq!(opts.degenerate_policy, FailurePolicy::Abort);
        assert_eq!(opts.out_of_domain_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts = PipelineOptions::from_json_str(r#"{ "locality": "neighborhood" }"#).unwrap();
        assert_eq!(opts.locality, Locality::Neighborhood);
        assert_eq!(opts.degenerate_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_json_round_trip() {
        let opts = PipelineOptions {
            locality: Locality::Neighborhood,
            degenerate_policy: FailurePolicy::Skip,
            out_of_domain_policy: FailurePolicy::Skip,
        };
        let json = opts.to_json_string().unwrap();
        assert!(json.contains("\"skip\""));
        assert_eq!(PipelineOptions::from_json_str(&json).unwrap(), opts);
    }

    #[test]
    fn test_locality_names() {
        let opts = PipelineOptions::from_json_str(r#"{ "locality": "global" }"#).unwrap();
        assert_eq!(opts.locality, Locality::Global);
        let opts = PipelineOptions::from_json_str(r#"{ "locality": "same_cell" }"#).unwrap();
        assert_eq!(opts.locality, Locality::SameCell);
    }

    #[test]
    fn test_invalid_json() {
        assert!(PipelineOptions::from_json_str(r#"{ "locality": "everywhere" }"#).is_err());
    }
}
