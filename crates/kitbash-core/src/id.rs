use slotmap::new_key_type;

new_key_type! {
    /// Identifies a component (raw resource or assembly) in a crafting tree.
    ///
    /// Handles are cheap to copy, so the same subtree can be attached under
    /// several parents.
    pub struct ComponentId;
}
