use crate::domain::entities::specification::{ComponentType, Item};

/// Transient holding area tied to one open add-dialog session.
///
/// Created when the dialog opens, discarded when it closes, whether by commit
/// or cancel. Never persisted.
#[derive(Debug, Clone)]
pub struct StagingSet {
    pub category: ComponentType,
    pub candidates: Vec<Item>,
    pub staged: Vec<Item>,
    pub stage_confirmed: bool,
}

impl StagingSet {
    pub fn new(category: ComponentType) -> Self {
        StagingSet {
            category,
            candidates: Vec::new(),
            staged: Vec::new(),
            stage_confirmed: false,
        }
    }

    /// Appends `item` to the staged rows unless an identical item is already
    /// staged. Duplicate staging within one session is a no-op.
    pub fn stage(&mut self, item: Item) -> bool {
        if self.staged.contains(&item) {
            return false;
        }
        self.staged.push(item);
        true
    }
}
