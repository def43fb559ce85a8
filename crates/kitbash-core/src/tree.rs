use crate::component::{Component, ComponentDef};
use crate::id::ComponentId;
use crate::merge::{accumulate, merge_into};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::{BTreeMap, HashSet};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while building or aggregating a crafting tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CraftError {
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: String,
    },
    #[error("component not found: {0:?}")]
    ComponentNotFound(ComponentId),
    #[error("cyclic structure: '{name}' is its own descendant")]
    CyclicStructure { name: String },
    #[error("crafting tree deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

// ---------------------------------------------------------------------------
// Configuration and results
// ---------------------------------------------------------------------------

/// Limits applied to every traversal of a [`CraftingTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Deepest level a traversal may reach below its starting node.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    256
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Leaf resource name -> total quantity required.
pub type ResourceMap = BTreeMap<String, u64>;

/// Summed production costs of a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTotals {
    pub mind: u64,
    pub time: u64,
}

impl CostTotals {
    fn of(node: &Component) -> Self {
        Self {
            mind: node.mind_cost.into(),
            time: node.time_cost.into(),
        }
    }

    fn absorb(&mut self, other: CostTotals) {
        self.mind = self.mind.saturating_add(other.mind);
        self.time = self.time.saturating_add(other.time);
    }
}

// ---------------------------------------------------------------------------
// CraftingTree
// ---------------------------------------------------------------------------

/// Arena holding every component of one or more crafting trees.
///
/// Children are stored as [`ComponentId`] handles, so one subtree may be
/// attached under several parents and changes to it are seen through all of
/// them. Components are never removed.
///
/// All aggregations walk the tree with an explicit stack. A node met again
/// while it is still on the current path yields
/// [`CraftError::CyclicStructure`]; a path longer than
/// [`TraversalConfig::max_depth`] yields [`CraftError::DepthExceeded`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CraftingTree {
    components: SlotMap<ComponentId, Component>,
    #[serde(default)]
    config: TraversalConfig,
}

/// One level of an in-progress traversal.
struct Frame<'a, A> {
    id: ComponentId,
    node: &'a Component,
    pending: Vec<ComponentId>,
    acc: A,
}

impl CraftingTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TraversalConfig) -> Self {
        Self {
            components: SlotMap::with_key(),
            config,
        }
    }

    pub fn config(&self) -> TraversalConfig {
        self.config
    }

    // -- Construction --

    /// Allocate a new childless component.
    pub fn create(&mut self, def: ComponentDef) -> ComponentId {
        self.components.insert(def.into_component())
    }

    /// Like [`create`](Self::create), but rejects a zero quantity or a blank
    /// name.
    pub fn try_create(&mut self, def: ComponentDef) -> Result<ComponentId, CraftError> {
        if def.name.trim().is_empty() {
            return Err(CraftError::InvalidArgument {
                field: "name",
                reason: "must not be blank".to_string(),
            });
        }
        if def.quantity == 0 {
            return Err(CraftError::InvalidArgument {
                field: "quantity",
                reason: format!("'{}' must require at least one unit", def.name),
            });
        }
        Ok(self.create(def))
    }

    /// Attach `child` under `parent`, keyed by the child's name.
    ///
    /// Returns the handle previously attached under that name, if any. The
    /// replaced subtree stays in the arena. No cycle check is made here.
    pub fn add(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
    ) -> Result<Option<ComponentId>, CraftError> {
        let name = self.node(child)?.name.clone();
        let parent_node = self
            .components
            .get_mut(parent)
            .ok_or(CraftError::ComponentNotFound(parent))?;

        let replaced = parent_node.children.insert(name.clone(), child);
        if let Some(old) = replaced
            && old != child
        {
            tracing::warn!(
                parent = %parent_node.name,
                child = %name,
                "replaced existing child with the same name"
            );
        }
        Ok(replaced)
    }

    // -- Queries --

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn is_leaf(&self, id: ComponentId) -> Result<bool, CraftError> {
        Ok(self.node(id)?.is_leaf())
    }

    /// Direct children of `id` as `(name, handle)` pairs, ordered by name.
    pub fn children(&self, id: ComponentId) -> Result<Vec<(&str, ComponentId)>, CraftError> {
        Ok(self
            .node(id)?
            .children
            .iter()
            .map(|(name, &child)| (name.as_str(), child))
            .collect())
    }

    pub fn child(&self, id: ComponentId, name: &str) -> Result<Option<ComponentId>, CraftError> {
        Ok(self.node(id)?.child(name))
    }

    fn node(&self, id: ComponentId) -> Result<&Component, CraftError> {
        self.components
            .get(id)
            .ok_or(CraftError::ComponentNotFound(id))
    }

    // -- Aggregation --

    /// Own mind cost plus the total mind cost of every child, recursively.
    /// Quantities are not multiplied in.
    pub fn total_mind(&self, id: ComponentId) -> Result<u64, CraftError> {
        self.totals(id).map(|t| t.mind)
    }

    /// Own time cost plus the total time cost of every child, recursively.
    /// Quantities are not multiplied in.
    pub fn total_time(&self, id: ComponentId) -> Result<u64, CraftError> {
        self.totals(id).map(|t| t.time)
    }

    /// Mind and time totals computed in a single walk.
    pub fn totals(&self, id: ComponentId) -> Result<CostTotals, CraftError> {
        self.fold(id, CostTotals::of, |acc, _child, child_totals| {
            acc.absorb(child_totals)
        })
    }

    /// Reduce the subtree under `id` to leaf resource name -> quantity.
    ///
    /// Only descendants are counted: a leaf collapses to an empty map, and
    /// composite names never appear. Each leaf contributes its own quantity
    /// once per place it occurs; ancestor quantities are not multiplied in.
    pub fn collapse(&self, id: ComponentId) -> Result<ResourceMap, CraftError> {
        self.fold(id, |_| ResourceMap::new(), absorb_collapsed)
    }

    /// Post-order fold over every path below `root`.
    ///
    /// `enter` seeds the accumulator of each visited node; `absorb` folds a
    /// finished child's accumulator into its parent's.
    fn fold<A>(
        &self,
        root: ComponentId,
        enter: impl FnMut(&Component) -> A,
        absorb: impl FnMut(&mut A, &Component, A),
    ) -> Result<A, CraftError> {
        self.fold_below(&[], root, enter, absorb)
    }

    /// [`fold`](Self::fold) for a `root` reached through `ancestors`. The
    /// ancestors count toward cycle detection and the depth limit.
    fn fold_below<A>(
        &self,
        ancestors: &[ComponentId],
        root: ComponentId,
        mut enter: impl FnMut(&Component) -> A,
        mut absorb: impl FnMut(&mut A, &Component, A),
    ) -> Result<A, CraftError> {
        let root_node = self.node(root)?;
        let mut root_frame = Frame {
            id: root,
            node: root_node,
            pending: root_node.children.values().copied().collect(),
            acc: enter(root_node),
        };
        let mut on_path: HashSet<ComponentId> = ancestors.iter().copied().collect();
        on_path.insert(root);
        let mut stack: Vec<Frame<'_, A>> = Vec::new();

        loop {
            let frame = stack.last_mut().unwrap_or(&mut root_frame);
            let Some(child_id) = frame.pending.pop() else {
                let Some(done) = stack.pop() else {
                    return Ok(root_frame.acc);
                };
                on_path.remove(&done.id);
                let parent = stack.last_mut().unwrap_or(&mut root_frame);
                absorb(&mut parent.acc, done.node, done.acc);
                continue;
            };

            let child = self.node(child_id)?;
            if on_path.contains(&child_id) {
                return Err(CraftError::CyclicStructure {
                    name: child.name.clone(),
                });
            }
            let depth = ancestors.len() + stack.len() + 1;
            self.check_depth(depth)?;

            tracing::trace!(component = %child.name, depth, "enter");
            on_path.insert(child_id);
            stack.push(Frame {
                id: child_id,
                node: child,
                pending: child.children.values().copied().collect(),
                acc: enter(child),
            });
        }
    }

    fn check_depth(&self, depth: usize) -> Result<(), CraftError> {
        if depth > self.config.max_depth {
            return Err(CraftError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        Ok(())
    }

    /// [`collapse`](Self::collapse), with the direct children of `id`
    /// collapsed on the rayon pool. Each child subtree is walked with the
    /// same explicit stack as the sequential version.
    #[cfg(feature = "parallel")]
    pub fn collapse_parallel(&self, id: ComponentId) -> Result<ResourceMap, CraftError> {
        use rayon::prelude::*;

        let children: Vec<ComponentId> = self.node(id)?.children.values().copied().collect();
        children
            .par_iter()
            .map(|&child_id| {
                let child = self.node(child_id)?;
                if child_id == id {
                    return Err(CraftError::CyclicStructure {
                        name: child.name.clone(),
                    });
                }
                self.check_depth(1)?;
                if child.is_leaf() {
                    return Ok(ResourceMap::from([(
                        child.name.clone(),
                        u64::from(child.quantity),
                    )]));
                }
                self.fold_below(&[id], child_id, |_| ResourceMap::new(), absorb_collapsed)
            })
            .try_reduce(ResourceMap::new, |mut acc, map| {
                merge_into(&mut acc, &map);
                Ok(acc)
            })
    }
}

/// Leaves count their own quantity; composites pass up their collapsed map.
fn absorb_collapsed(acc: &mut ResourceMap, child: &Component, child_map: ResourceMap) {
    if child.is_leaf() {
        accumulate(acc, child.name.clone(), u64::from(child.quantity));
    } else {
        merge_into(acc, &child_map);
    }
}
