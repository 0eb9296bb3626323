//! Canonical province identifiers and alias resolution.
//!
//! The alias mapping is a JSON object with exactly 52 keys, one per official
//! Spanish province (50 provinces plus the autonomous cities of Ceuta and
//! Melilla). Each value is an ordered list of accepted surface-form spellings
//! as they appear in the raw sources. The table is built once, validated at
//! load, and passed by reference into every stage that resolves names; it is
//! never mutated after construction.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use crate::error::{AliasTableError, Result};

/// Number of canonical provinces the mapping must contain.
pub const EXPECTED_PROVINCE_COUNT: usize = 52;

/// Default mapping shipped with the crate.
const EMBEDDED_MAPPING: &str = include_str!("../assets/province_aliases.json");

/// Outcome of resolving a single surface-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The string is a known alias; the canonical province that owns it.
    Canonical(&'a str),
    /// The string is not present in any alias list.
    Unresolved,
}

/// Result of resolving a whole column of surface forms.
#[derive(Debug, Clone, Default)]
pub struct ColumnResolution {
    /// One output value per input value, order preserved. Resolved entries
    /// carry the canonical name; unresolved entries pass through unchanged.
    pub values: Vec<String>,
    /// Distinct strings that failed to resolve, reported once per batch.
    pub unresolved: BTreeSet<String>,
}

impl ColumnResolution {
    pub fn fully_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Immutable alias table mapping surface forms to canonical provinces.
#[derive(Debug, Clone)]
pub struct AliasTable {
    canonical: Vec<String>,
    flat: BTreeMap<String, String>,
}

impl AliasTable {
    /// Build the table from a JSON reader, validating cardinality and alias
    /// disjointness.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_reader(reader)?;
        Self::from_entries(raw)
    }

    /// Build the table from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AliasTableError::NotFound(path.to_path_buf()));
        }
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Build the table from the mapping embedded in this crate.
    pub fn embedded() -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(EMBEDDED_MAPPING)?;
        Self::from_entries(raw)
    }

    fn from_entries(raw: BTreeMap<String, Vec<String>>) -> Result<Self> {
        if raw.len() != EXPECTED_PROVINCE_COUNT {
            return Err(AliasTableError::WrongCardinality {
                expected: EXPECTED_PROVINCE_COUNT,
                found: raw.len(),
            });
        }
        let mut flat: BTreeMap<String, String> = BTreeMap::new();
        let mut canonical: Vec<String> = Vec::with_capacity(raw.len());
        for (province, aliases) in raw {
            for alias in aliases {
                if let Some(existing) = flat.get(&alias) {
                    if existing != &province {
                        return Err(AliasTableError::DuplicateAlias {
                            alias,
                            first: existing.clone(),
                            second: province,
                        });
                    }
                    continue;
                }
                flat.insert(alias, province.clone());
            }
            // The canonical name always resolves to itself.
            flat.entry(province.clone()).or_insert_with(|| province.clone());
            canonical.push(province);
        }
        Ok(Self { canonical, flat })
    }

    /// Canonical province names in sorted order.
    pub fn canonical_names(&self) -> &[String] {
        &self.canonical
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        self.canonical.iter().any(|province| province == name)
    }

    /// Surface forms that resolve to the given canonical province, in
    /// sorted order.
    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        self.flat
            .iter()
            .filter(|(_, province)| province.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
            .collect()
    }

    /// Resolve one surface form. Exact, case-sensitive match; no fuzzing.
    pub fn resolve(&self, alias: &str) -> Resolution<'_> {
        match self.flat.get(alias) {
            Some(province) => Resolution::Canonical(province),
            None => Resolution::Unresolved,
        }
    }

    /// Resolve a column of surface forms element by element.
    ///
    /// Order-preserving and element-independent: each input resolves on its
    /// own, unresolved inputs are kept verbatim, and the distinct unresolved
    /// strings are collected for a single batch-level report.
    pub fn resolve_column<I, S>(&self, values: I) -> ColumnResolution
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolution = ColumnResolution::default();
        for value in values {
            let value = value.as_ref();
            match self.resolve(value) {
                Resolution::Canonical(province) => {
                    resolution.values.push(province.to_string());
                }
                Resolution::Unresolved => {
                    if !value.is_empty() {
                        resolution.unresolved.insert(value.to_string());
                    }
                    resolution.values.push(value.to_string());
                }
            }
        }
        resolution
    }
}
