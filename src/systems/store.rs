use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::types::SystemId;
use crate::systems::pam::{PamError, PamPattern};

#[derive(Error, Debug)]
pub enum SystemsError {
    #[error("Failed to read systems catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse systems catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid PAM for system '{system}': {source}")]
    InvalidPam {
        system: String,
        #[source]
        source: PamError,
    },

    #[error("System '{0}' must have a positive guide length")]
    InvalidGuideLength(String),
}

/// Systems catalog version for compatibility checking
pub const SYSTEMS_VERSION: &str = "1.0.0";

/// A CRISPR nuclease and the guide layout it requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisprSystem {
    /// PAM in IUPAC codes, located 3' of the guide
    pub pam_sequence: String,

    /// Number of bases in the spacer/guide
    pub guide_length: usize,

    pub description: String,
}

impl CrisprSystem {
    /// Compile the PAM pattern.
    ///
    /// # Errors
    ///
    /// Returns `PamError` if the PAM is empty or contains a non-IUPAC code.
    pub fn pam_pattern(&self) -> Result<PamPattern, PamError> {
        PamPattern::parse(&self.pam_sequence)
    }
}

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemsData {
    pub version: String,
    pub systems: BTreeMap<String, CrisprSystem>,
}

/// The set of CRISPR systems available for analysis, ordered by name
#[derive(Debug, Clone, Default)]
pub struct SystemCatalog {
    systems: BTreeMap<SystemId, CrisprSystem>,
}

impl SystemCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded default catalog.
    ///
    /// # Errors
    ///
    /// Returns `SystemsError` if the embedded JSON is invalid (checked by build.rs).
    pub fn load_embedded() -> Result<Self, SystemsError> {
        // Validated at compile time via build.rs
        const EMBEDDED_SYSTEMS: &str = include_str!("../../systems/crispr_systems.json");
        Self::from_json(EMBEDDED_SYSTEMS)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `SystemsError` if the file cannot be read or is not a valid catalog.
    pub fn load_from_file(path: &Path) -> Result<Self, SystemsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a catalog from a JSON string, validating every system.
    ///
    /// # Errors
    ///
    /// Returns `SystemsError` for malformed JSON, an invalid PAM or a zero guide length.
    pub fn from_json(json: &str) -> Result<Self, SystemsError> {
        let data: SystemsData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != SYSTEMS_VERSION {
            warn!(
                "Systems catalog version mismatch (expected {}, found {})",
                SYSTEMS_VERSION, data.version
            );
        }

        let mut catalog = Self::new();
        for (name, system) in data.systems {
            catalog.add_system(name, system)?;
        }

        Ok(catalog)
    }

    /// Add or replace a system after validating it.
    ///
    /// # Errors
    ///
    /// Returns `SystemsError` for an invalid PAM or a zero guide length.
    pub fn add_system(
        &mut self,
        name: impl Into<String>,
        system: CrisprSystem,
    ) -> Result<(), SystemsError> {
        let name = name.into();

        system
            .pam_pattern()
            .map_err(|source| SystemsError::InvalidPam {
                system: name.clone(),
                source,
            })?;
        if system.guide_length == 0 {
            return Err(SystemsError::InvalidGuideLength(name));
        }

        self.systems.insert(SystemId::new(name), system);
        Ok(())
    }

    /// Get a system by name (case-sensitive)
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CrisprSystem> {
        self.systems.get(name)
    }

    /// Iterate systems in name order
    pub fn iter(&self) -> impl Iterator<Item = (&SystemId, &CrisprSystem)> {
        self.systems.iter()
    }

    /// Names of all systems, in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.systems.keys().map(SystemId::as_str).collect()
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns `SystemsError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, SystemsError> {
        let data = SystemsData {
            version: SYSTEMS_VERSION.to_string(),
            systems: self
                .systems
                .iter()
                .map(|(id, system)| (id.0.clone(), system.clone()))
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of systems in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}
