use crate::grade::Grade;
use crate::id::ComponentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A node in a crafting tree: a raw resource (leaf) or an assembly built
/// from other components (composite).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Aggregation key at leaf level and key in the parent's child map.
    pub name: String,
    /// Units of this component the parent requires.
    pub quantity: u32,
    /// Production effort spent crafting one unit at this node.
    pub mind_cost: u32,
    /// Production duration spent crafting one unit at this node.
    pub time_cost: u32,
    pub grade: Grade,
    /// Direct children keyed by name. A handle may also appear under other
    /// parents.
    pub(crate) children: BTreeMap<String, ComponentId>,
}

impl Component {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn children(&self) -> &BTreeMap<String, ComponentId> {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<ComponentId> {
        self.children.get(name).copied()
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Construction arguments for [`CraftingTree::create`](crate::tree::CraftingTree::create).
///
/// Defaults: `name = "New"`, `quantity = 1`, `grade = Ungraded`, both costs 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDef {
    pub name: String,
    pub quantity: u32,
    pub grade: Grade,
    pub mind_cost: u32,
    pub time_cost: u32,
}

impl Default for ComponentDef {
    fn default() -> Self {
        Self {
            name: "New".to_string(),
            quantity: 1,
            grade: Grade::Ungraded,
            mind_cost: 0,
            time_cost: 0,
        }
    }
}

impl ComponentDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A raw resource requirement: `quantity` units of `name`.
    pub fn leaf(name: impl Into<String>, quantity: u32) -> Self {
        Self::new(name).quantity(quantity)
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn grade(mut self, grade: Grade) -> Self {
        self.grade = grade;
        self
    }

    pub fn mind_cost(mut self, mind_cost: u32) -> Self {
        self.mind_cost = mind_cost;
        self
    }

    pub fn time_cost(mut self, time_cost: u32) -> Self {
        self.time_cost = time_cost;
        self
    }

    pub(crate) fn into_component(self) -> Component {
        Component {
            name: self.name,
            quantity: self.quantity,
            mind_cost: self.mind_cost,
            time_cost: self.time_cost,
            grade: self.grade,
            children: BTreeMap::new(),
        }
    }
}
