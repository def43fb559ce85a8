//! Serde data file structs for catalog content.
//!
//! These structs define the on-disk format for resources, blueprints and
//! catalog settings. They are deserialized from RON, JSON, or TOML data files
//! and then resolved into crafting trees by the catalog.

use kitbash_core::grade::Grade;
use kitbash_core::metadata::{ComponentType, Expiration};
use kitbash_core::tree::TraversalConfig;
use serde::Deserialize;

// ===========================================================================
// Resources
// ===========================================================================

/// A raw resource definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceData {
    pub name: String,
    #[serde(default)]
    pub expiration: Expiration,
}

// ===========================================================================
// Blueprints
// ===========================================================================

/// A resource requirement of a blueprint grade, supporting both the short
/// tuple form and the full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResourceEntryData {
    /// Short form: `("resource_name", quantity)`.
    Short(String, u32),
    /// Full form with explicit fields.
    Full { resource: String, quantity: u32 },
}

impl ResourceEntryData {
    pub fn resource(&self) -> &str {
        match self {
            ResourceEntryData::Short(name, _) => name,
            ResourceEntryData::Full { resource, .. } => resource,
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            ResourceEntryData::Short(_, quantity) => *quantity,
            ResourceEntryData::Full { quantity, .. } => *quantity,
        }
    }
}

/// A sub-assembly requirement: another blueprint at a specific grade.
#[derive(Debug, Clone, Deserialize)]
pub struct SubAssemblyData {
    pub blueprint: String,
    pub grade: Grade,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// One grade of a blueprint: its own costs plus what it consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeData {
    pub grade: Grade,
    /// Display label, e.g. "Proficient Mechanical Engine".
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_mind")]
    pub mind: u32,
    #[serde(default = "default_time")]
    pub time: u32,
    #[serde(default)]
    pub resources: Vec<ResourceEntryData>,
    #[serde(default)]
    pub sub_assemblies: Vec<SubAssemblyData>,
}

fn default_mind() -> u32 {
    5
}

fn default_time() -> u32 {
    20
}

/// A craftable item with one record per grade it can be built at.
#[derive(Debug, Clone, Deserialize)]
pub struct BlueprintData {
    pub name: String,
    #[serde(default)]
    pub item_type: ComponentType,
    #[serde(default)]
    pub expiration: Expiration,
    pub grades: Vec<GradeData>,
}

impl BlueprintData {
    pub fn grade(&self, grade: Grade) -> Option<&GradeData> {
        self.grades.iter().find(|g| g.grade == grade)
    }
}

// ===========================================================================
// Settings
// ===========================================================================

/// Optional per-catalog settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SettingsData {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Reject zero quantities and blank names while materializing.
    #[serde(default)]
    pub strict: bool,
}

fn default_max_depth() -> usize {
    TraversalConfig::default().max_depth
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict: false,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
