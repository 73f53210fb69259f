//! # Schema Registry
//!
//! Static mapping from the closed set of [`SchemaKey`]s to the location of
//! the JSON Schema document generated for each key.
//!
//! The set of valid keys is exactly the set of enum variants: adding a new
//! supported document type means adding one variant and one arm in
//! [`SchemaKey::file_name`]. No I/O happens here.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// Identifier selecting which structural contract to validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaKey {
    /// Digital Waste Passport.
    DigitalWastePassport,
    /// Digital Waste Passport, MARPOL (ship-generated waste) profile.
    DigitalMarpolWastePassport,
    /// Digital Product Passport.
    DigitalProductPassport,
    /// Recycler organisation profile.
    RecyclerOrganisation,
}

impl SchemaKey {
    /// Every supported key, in declaration order.
    pub const ALL: [SchemaKey; 4] = [
        SchemaKey::DigitalWastePassport,
        SchemaKey::DigitalMarpolWastePassport,
        SchemaKey::DigitalProductPassport,
        SchemaKey::RecyclerOrganisation,
    ];

    /// The stable string form used on the command line and in serialized results.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DigitalWastePassport => "digital-waste-passport",
            Self::DigitalMarpolWastePassport => "digital-marpol-waste-passport",
            Self::DigitalProductPassport => "digital-product-passport",
            Self::RecyclerOrganisation => "recycler-organisation",
        }
    }

    /// File name of the generated schema document, relative to the schema directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::DigitalWastePassport => "digitalWastePassport.schema.json",
            Self::DigitalMarpolWastePassport => "digitalMarpolWastePassport.schema.json",
            Self::DigitalProductPassport => "digitalProductPassport.schema.json",
            Self::RecyclerOrganisation => "recyclerOrganisation.schema.json",
        }
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SchemaKey {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ContractError::UnknownSchemaKey(s.to_string()))
    }
}

/// Resolves schema keys to document locations under one schema directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    schema_dir: PathBuf,
}

impl SchemaRegistry {
    /// Create a registry rooted at `schema_dir` (e.g. `build/v0.1`).
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
        }
    }

    /// Directory holding the generated schema documents.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Location of the schema document for `key`.
    pub fn location(&self, key: SchemaKey) -> PathBuf {
        self.schema_dir.join(key.file_name())
    }

    /// All `(key, location)` pairs, in [`SchemaKey::ALL`] order.
    pub fn entries(&self) -> impl Iterator<Item = (SchemaKey, PathBuf)> + '_ {
        SchemaKey::ALL
            .into_iter()
            .map(move |key| (key, self.location(key)))
    }
}
