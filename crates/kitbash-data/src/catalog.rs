//! Catalog loading and materialization of blueprints into crafting trees.
//!
//! [`load_catalog`] reads `resources.*`, `blueprints.*` and the optional
//! `settings.*` from a directory, validates every reference, and rejects
//! sub-assembly loops up front. A loaded [`Catalog`] can then build the
//! component tree of any blueprint grade.

use crate::loader::{
    check_duplicate, deserialize_file, deserialize_list, find_data_file, require_data_file,
    resolve_name, DataLoadError,
};
use crate::schema::{BlueprintData, GradeData, ResourceData, SettingsData, SubAssemblyData};
use kitbash_core::component::ComponentDef;
use kitbash_core::grade::Grade;
use kitbash_core::id::ComponentId;
use kitbash_core::tree::{CostTotals, CraftError, CraftingTree, ResourceMap, TraversalConfig};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

// ===========================================================================
// Catalog
// ===========================================================================

/// The resolved set of resources and blueprints of one data directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    resources: HashMap<String, ResourceData>,
    blueprints: HashMap<String, BlueprintData>,
    settings: SettingsData,
    blueprints_file: PathBuf,
}

/// Load and validate the catalog in `dir`.
pub fn load_catalog(dir: &Path) -> Result<Catalog, DataLoadError> {
    let resources_file = require_data_file(dir, "resources")?;
    let blueprints_file = require_data_file(dir, "blueprints")?;
    let settings = match find_data_file(dir, "settings")? {
        Some(path) => deserialize_file::<SettingsData>(&path)?,
        None => SettingsData::default(),
    };

    let mut resources = HashMap::new();
    for resource in deserialize_list::<ResourceData>(&resources_file, "resources")? {
        check_duplicate(&resources, &resource.name, &resources_file)?;
        resources.insert(resource.name.clone(), resource);
    }

    let mut blueprints = HashMap::new();
    for blueprint in deserialize_list::<BlueprintData>(&blueprints_file, "blueprints")? {
        check_duplicate(&blueprints, &blueprint.name, &blueprints_file)?;
        check_duplicate_grades(&blueprint, &blueprints_file)?;
        check_duplicate_children(&blueprint, &blueprints_file)?;
        blueprints.insert(blueprint.name.clone(), blueprint);
    }

    resolve_references(&resources, &blueprints, &blueprints_file)?;
    check_cycles(&blueprints, &blueprints_file)?;

    tracing::debug!(
        dir = %dir.display(),
        resources = resources.len(),
        blueprints = blueprints.len(),
        "loaded catalog"
    );

    Ok(Catalog {
        resources,
        blueprints,
        settings,
        blueprints_file,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_duplicate_grades(blueprint: &BlueprintData, file: &Path) -> Result<(), DataLoadError> {
    for (i, grade) in blueprint.grades.iter().enumerate() {
        if blueprint.grades[..i].iter().any(|g| g.grade == grade.grade) {
            return Err(DataLoadError::DuplicateGrade {
                file: file.to_path_buf(),
                blueprint: blueprint.name.clone(),
                grade: grade.grade,
            });
        }
    }
    Ok(())
}

/// Resource entries and sub-assemblies of one grade become children of the
/// same node, so their names must be distinct.
fn check_duplicate_children(blueprint: &BlueprintData, file: &Path) -> Result<(), DataLoadError> {
    for grade in &blueprint.grades {
        let mut seen = HashSet::new();
        let names = grade
            .resources
            .iter()
            .map(|entry| entry.resource())
            .chain(grade.sub_assemblies.iter().map(|sub| sub.blueprint.as_str()));
        for name in names {
            if !seen.insert(name) {
                return Err(DataLoadError::DuplicateChild {
                    file: file.to_path_buf(),
                    blueprint: blueprint.name.clone(),
                    grade: grade.grade,
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Every resource entry must name a known resource, and every sub-assembly
/// a known blueprint at a grade it defines.
fn resolve_references(
    resources: &HashMap<String, ResourceData>,
    blueprints: &HashMap<String, BlueprintData>,
    file: &Path,
) -> Result<(), DataLoadError> {
    for blueprint in blueprints.values() {
        for grade in &blueprint.grades {
            for entry in &grade.resources {
                resolve_name(resources, entry.resource(), file, "resource")?;
            }
            for sub in &grade.sub_assemblies {
                let target = resolve_name(blueprints, &sub.blueprint, file, "blueprint")?;
                if target.grade(sub.grade).is_none() {
                    return Err(DataLoadError::UnresolvedRef {
                        file: file.to_path_buf(),
                        name: format!("{} ({})", sub.blueprint, sub.grade),
                        expected_kind: "blueprint grade",
                    });
                }
            }
        }
    }
    Ok(())
}

fn sub_assemblies<'a>(
    blueprints: &'a HashMap<String, BlueprintData>,
    (name, grade): (&str, Grade),
) -> &'a [SubAssemblyData] {
    blueprints
        .get(name)
        .and_then(|bp| bp.grade(grade))
        .map(|g| g.sub_assemblies.as_slice())
        .unwrap_or(&[])
}

/// Depth-first search over (blueprint, grade) pairs with an explicit stack.
fn check_cycles(
    blueprints: &HashMap<String, BlueprintData>,
    file: &Path,
) -> Result<(), DataLoadError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Visiting,
        Done,
    }

    let mut roots: Vec<(&str, Grade)> = blueprints
        .values()
        .flat_map(|bp| bp.grades.iter().map(move |g| (bp.name.as_str(), g.grade)))
        .collect();
    roots.sort();

    let mut marks: HashMap<(&str, Grade), Mark> = HashMap::new();
    for root in roots {
        if marks.contains_key(&root) {
            continue;
        }
        marks.insert(root, Mark::Visiting);
        let mut stack: Vec<((&str, Grade), usize)> = vec![(root, 0)];

        while let Some(&(key, index)) = stack.last() {
            let Some(sub) = sub_assemblies(blueprints, key).get(index) else {
                marks.insert(key, Mark::Done);
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            let child = (sub.blueprint.as_str(), sub.grade);
            match marks.get(&child) {
                Some(Mark::Visiting) => {
                    return Err(DataLoadError::CyclicReference {
                        file: file.to_path_buf(),
                        blueprint: sub.blueprint.clone(),
                        grade: sub.grade,
                    });
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(child, Mark::Visiting);
                    stack.push((child, 0));
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Queries and materialization
// ---------------------------------------------------------------------------

impl Catalog {
    /// Blueprint names in sorted order.
    pub fn blueprint_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.blueprints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Grades a blueprint defines, in ordinal order.
    pub fn grades_of(&self, blueprint: &str) -> Option<Vec<Grade>> {
        let bp = self.blueprints.get(blueprint)?;
        let mut grades: Vec<Grade> = bp.grades.iter().map(|g| g.grade).collect();
        grades.sort();
        Some(grades)
    }

    pub fn blueprint(&self, name: &str) -> Option<&BlueprintData> {
        self.blueprints.get(name)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceData> {
        self.resources.get(name)
    }

    pub fn settings(&self) -> SettingsData {
        self.settings
    }

    /// Override the traversal depth limit from the settings file.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.settings.max_depth = max_depth;
    }

    pub fn traversal_config(&self) -> TraversalConfig {
        TraversalConfig {
            max_depth: self.settings.max_depth,
        }
    }

    /// A fresh tree using this catalog's traversal limits.
    pub fn new_tree(&self) -> CraftingTree {
        CraftingTree::with_config(self.traversal_config())
    }

    fn grade_data(&self, blueprint: &str, grade: Grade) -> Result<&GradeData, DataLoadError> {
        let bp = resolve_name(&self.blueprints, blueprint, &self.blueprints_file, "blueprint")?;
        bp.grade(grade).ok_or_else(|| DataLoadError::UnresolvedRef {
            file: self.blueprints_file.clone(),
            name: format!("{blueprint} ({grade})"),
            expected_kind: "blueprint grade",
        })
    }

    /// Build the component tree of `blueprint` at `grade` into `tree`.
    ///
    /// The root is a composite named after the blueprint carrying the grade's
    /// mind and time costs, with one leaf per resource entry and a freshly
    /// built subtree per sub-assembly entry. Nothing is shared between
    /// sub-assemblies, even when they name the same blueprint grade.
    pub fn materialize(
        &self,
        tree: &mut CraftingTree,
        blueprint: &str,
        grade: Grade,
        quantity: u32,
    ) -> Result<ComponentId, DataLoadError> {
        tracing::debug!(blueprint, %grade, quantity, "materializing");
        self.materialize_at(tree, blueprint, grade, quantity, 0)
    }

    fn materialize_at(
        &self,
        tree: &mut CraftingTree,
        blueprint: &str,
        grade: Grade,
        quantity: u32,
        depth: usize,
    ) -> Result<ComponentId, DataLoadError> {
        let limit = tree.config().max_depth;
        if depth > limit {
            return Err(CraftError::DepthExceeded { limit }.into());
        }
        let data = self.grade_data(blueprint, grade)?;

        let root = self.create(
            tree,
            ComponentDef::new(blueprint)
                .quantity(quantity)
                .grade(grade)
                .mind_cost(data.mind)
                .time_cost(data.time),
        )?;
        for entry in &data.resources {
            let leaf = self.create(tree, ComponentDef::leaf(entry.resource(), entry.quantity()))?;
            tree.add(root, leaf)?;
        }
        for sub in &data.sub_assemblies {
            let child =
                self.materialize_at(tree, &sub.blueprint, sub.grade, sub.quantity, depth + 1)?;
            tree.add(root, child)?;
        }
        Ok(root)
    }

    fn create(&self, tree: &mut CraftingTree, def: ComponentDef) -> Result<ComponentId, CraftError> {
        if self.settings.strict {
            tree.try_create(def)
        } else {
            Ok(tree.create(def))
        }
    }

    /// Collapse `blueprint` at `grade` to its raw resource totals.
    pub fn flatten(&self, blueprint: &str, grade: Grade) -> Result<ResourceMap, DataLoadError> {
        let mut tree = self.new_tree();
        let root = self.materialize(&mut tree, blueprint, grade, 1)?;
        Ok(tree.collapse(root)?)
    }

    /// Total mind and time of `blueprint` at `grade`.
    pub fn totals(&self, blueprint: &str, grade: Grade) -> Result<CostTotals, DataLoadError> {
        let mut tree = self.new_tree();
        let root = self.materialize(&mut tree, blueprint, grade, 1)?;
        Ok(tree.totals(root)?)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
