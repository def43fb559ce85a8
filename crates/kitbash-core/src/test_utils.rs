//! Shared scenario builders for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. Every builder
//! allocates fresh nodes, so calling one twice never shares subtrees.

use crate::component::ComponentDef;
use crate::grade::Grade;
use crate::id::ComponentId;
use crate::tree::CraftingTree;

// ===========================================================================
// Resource and assembly names
// ===========================================================================

pub const ALLOY_METAL: &str = "Alloy Metal";
pub const MACHINED_COMPONENTS: &str = "Machined Components";
pub const MECHANICAL_COMPONENTS: &str = "Mechanical Components";
pub const HARD_METAL: &str = "Hard Metal";
pub const RECOVERED_ELECTRONICS: &str = "Recovered Electronics";

pub const BASIC_SCRAP: &str = "Basic Scrap";
pub const UNCOMMON_SCRAP: &str = "Uncommon Scrap";
pub const RARE_SCRAP: &str = "Rare Scrap";

pub const MECHANICAL_AUTO_FRAME: &str = "Mechanical Auto Frame";
pub const MECHANICAL_ENGINE: &str = "Mechanical Engine";
pub const MECHANICAL_GEAR_SYSTEM: &str = "Mechanical Gear System";
pub const RAIDER_RIDE: &str = "Glitter Gulch Raider Ride";

/// Mind cost charged per grade tier by every reference assembly.
pub fn tier_mind(grade: Grade) -> u32 {
    match grade {
        Grade::Ungraded => 0,
        Grade::Basic => 5,
        Grade::Proficient => 10,
        Grade::Master => 15,
    }
}

// ===========================================================================
// Generic builders
// ===========================================================================

/// Create a leaf and attach it under `parent`.
pub fn attach_leaf(tree: &mut CraftingTree, parent: ComponentId, name: &str, quantity: u32) {
    let leaf = tree.create(ComponentDef::leaf(name, quantity));
    tree.add(parent, leaf).expect("parent exists");
}

/// Build an assembly with the reference tier costs (`tier_mind`, 20 time),
/// the given raw resources, and extra pre-built children.
pub fn assembly(
    tree: &mut CraftingTree,
    name: &str,
    grade: Grade,
    resources: &[(&str, u32)],
    parts: &[ComponentId],
) -> ComponentId {
    let id = tree.create(
        ComponentDef::new(name)
            .grade(grade)
            .mind_cost(tier_mind(grade))
            .time_cost(20),
    );
    for &(resource, quantity) in resources {
        attach_leaf(tree, id, resource, quantity);
    }
    for &part in parts {
        tree.add(id, part).expect("part exists");
    }
    id
}

/// Linear chain of `depth` composites ending in one leaf; returns the root.
pub fn build_chain(tree: &mut CraftingTree, depth: usize) -> ComponentId {
    let root = tree.create(ComponentDef::new("chain_0").mind_cost(1).time_cost(1));
    let mut parent = root;
    for level in 1..depth {
        let next = tree.create(
            ComponentDef::new(format!("chain_{level}"))
                .mind_cost(1)
                .time_cost(1),
        );
        tree.add(parent, next).expect("parent exists");
        parent = next;
    }
    attach_leaf(tree, parent, "Ore", 1);
    root
}

/// Full tree of `depth` levels with `fanout` children per composite. Leaves
/// cycle through `distinct_leaves` resource names (at least `fanout`, so
/// sibling leaves never share a name).
pub fn build_wide(
    tree: &mut CraftingTree,
    depth: usize,
    fanout: usize,
    distinct_leaves: usize,
) -> ComponentId {
    let mut counter = 0usize;
    let distinct = distinct_leaves.max(fanout).max(1);
    build_wide_level(tree, depth, fanout, distinct, &mut counter)
}

fn build_wide_level(
    tree: &mut CraftingTree,
    depth: usize,
    fanout: usize,
    distinct_leaves: usize,
    counter: &mut usize,
) -> ComponentId {
    *counter += 1;
    if depth == 0 {
        let name = format!("resource_{}", *counter % distinct_leaves);
        return tree.create(ComponentDef::leaf(name, 1));
    }
    let id = tree.create(ComponentDef::new(format!("assembly_{}", *counter)).mind_cost(1));
    for _ in 0..fanout {
        let child = build_wide_level(tree, depth - 1, fanout, distinct_leaves, counter);
        tree.add(id, child).expect("parent exists");
    }
    id
}

// ===========================================================================
// Reference assemblies
// ===========================================================================

pub fn basic_frame(tree: &mut CraftingTree) -> ComponentId {
    assembly(
        tree,
        MECHANICAL_AUTO_FRAME,
        Grade::Basic,
        &[(ALLOY_METAL, 3), (MACHINED_COMPONENTS, 2), (RECOVERED_ELECTRONICS, 2)],
        &[],
    )
}

pub fn proficient_frame(tree: &mut CraftingTree) -> ComponentId {
    let lower = basic_frame(tree);
    assembly(
        tree,
        MECHANICAL_AUTO_FRAME,
        Grade::Proficient,
        &[(ALLOY_METAL, 1), (MACHINED_COMPONENTS, 1), (RECOVERED_ELECTRONICS, 1)],
        &[lower],
    )
}

pub fn master_frame(tree: &mut CraftingTree) -> ComponentId {
    let lower = proficient_frame(tree);
    assembly(
        tree,
        MECHANICAL_AUTO_FRAME,
        Grade::Master,
        &[(ALLOY_METAL, 1), (MACHINED_COMPONENTS, 1), (RECOVERED_ELECTRONICS, 1)],
        &[lower],
    )
}

pub fn basic_engine(tree: &mut CraftingTree) -> ComponentId {
    assembly(
        tree,
        MECHANICAL_ENGINE,
        Grade::Basic,
        &[(HARD_METAL, 3), (MACHINED_COMPONENTS, 1), (MECHANICAL_COMPONENTS, 1)],
        &[],
    )
}

pub fn proficient_engine(tree: &mut CraftingTree) -> ComponentId {
    let lower = basic_engine(tree);
    assembly(
        tree,
        MECHANICAL_ENGINE,
        Grade::Proficient,
        &[(HARD_METAL, 2), (MACHINED_COMPONENTS, 1), (MECHANICAL_COMPONENTS, 1)],
        &[lower],
    )
}

pub fn master_engine(tree: &mut CraftingTree) -> ComponentId {
    let lower = proficient_engine(tree);
    assembly(
        tree,
        MECHANICAL_ENGINE,
        Grade::Master,
        &[(HARD_METAL, 2), (MACHINED_COMPONENTS, 1), (MECHANICAL_COMPONENTS, 1)],
        &[lower],
    )
}

pub fn basic_gears(tree: &mut CraftingTree) -> ComponentId {
    assembly(
        tree,
        MECHANICAL_GEAR_SYSTEM,
        Grade::Basic,
        &[(MACHINED_COMPONENTS, 3), (ALLOY_METAL, 1), (HARD_METAL, 1)],
        &[],
    )
}

pub fn proficient_gears(tree: &mut CraftingTree) -> ComponentId {
    let lower = basic_gears(tree);
    assembly(
        tree,
        MECHANICAL_GEAR_SYSTEM,
        Grade::Proficient,
        &[(MACHINED_COMPONENTS, 2), (ALLOY_METAL, 1), (HARD_METAL, 1)],
        &[lower],
    )
}

pub fn master_gears(tree: &mut CraftingTree) -> ComponentId {
    let lower = proficient_gears(tree);
    assembly(
        tree,
        MECHANICAL_GEAR_SYSTEM,
        Grade::Master,
        &[(MACHINED_COMPONENTS, 2), (ALLOY_METAL, 1), (HARD_METAL, 1)],
        &[lower],
    )
}

pub fn basic_raider_ride(tree: &mut CraftingTree) -> ComponentId {
    let parts = [basic_frame(tree), basic_engine(tree), basic_gears(tree)];
    assembly(tree, RAIDER_RIDE, Grade::Basic, &[(BASIC_SCRAP, 5)], &parts)
}

pub fn proficient_raider_ride(tree: &mut CraftingTree) -> ComponentId {
    let parts = [
        proficient_frame(tree),
        proficient_engine(tree),
        proficient_gears(tree),
        basic_raider_ride(tree),
    ];
    assembly(tree, RAIDER_RIDE, Grade::Proficient, &[(UNCOMMON_SCRAP, 5)], &parts)
}

pub fn master_raider_ride(tree: &mut CraftingTree) -> ComponentId {
    let parts = [
        master_frame(tree),
        master_engine(tree),
        master_gears(tree),
        proficient_raider_ride(tree),
    ];
    assembly(tree, RAIDER_RIDE, Grade::Master, &[(RARE_SCRAP, 5)], &parts)
}
