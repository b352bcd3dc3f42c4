use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::domain::entities::specification::{ColumnLayout, ComponentType, Item, Specification};
use crate::usecase::ports::driver::{DialogDriver, DriverError, RawRow, RowSource};
use crate::usecase::services::edit_service::merge_item;
use crate::usecase::services::parser::parse;

/// In-memory stand-in for the live specification editor page.
///
/// Holds the persisted table, the currently rendered (working) table and a
/// searchable component catalog, and realizes dialog actions against them
/// with the same merge semantics the real surface applies server-side. Can
/// defer search results a configured number of times to exercise the
/// bounded-retry contract.
pub struct PageSurface {
    state: Mutex<SurfaceState>,
}

struct SurfaceState {
    persisted: Vec<RawRow>,
    working: Vec<RawRow>,
    catalog: HashMap<ComponentType, Vec<Item>>,
    dialog: Option<DialogState>,
    defer_search_results: u32,
    layout: ColumnLayout,
}

struct DialogState {
    category: ComponentType,
    selected: Vec<Item>,
    pending: Vec<Item>,
}

impl PageSurface {
    pub fn new(rows: Vec<RawRow>) -> Self {
        PageSurface {
            state: Mutex::new(SurfaceState {
                persisted: rows.clone(),
                working: rows,
                catalog: HashMap::new(),
                dialog: None,
                defer_search_results: 0,
                layout: ColumnLayout::default(),
            }),
        }
    }

    pub fn with_layout(self, layout: ColumnLayout) -> Self {
        self.lock().layout = layout;
        self
    }

    /// Registers catalog rows offered as candidates for `category`.
    pub fn with_catalog(self, category: ComponentType, items: Vec<Item>) -> Self {
        self.lock().catalog.insert(category, items);
        self
    }

    /// Makes the next `count` searches report candidates as not yet rendered.
    pub fn defer_search_results(&self, count: u32) {
        self.lock().defer_search_results = count;
    }

    /// The persisted rows, as a later page load would see them.
    pub fn persisted_rows(&self) -> Vec<RawRow> {
        self.lock().persisted.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SurfaceState {
    fn working_spec(&self) -> Result<Specification, DriverError> {
        parse(&self.working).map_err(|err| DriverError::Rejected(err.to_string()))
    }

    fn render(&mut self, spec: &Specification) {
        self.working = render_rows(spec);
    }
}

/// Renders a specification back into the grouped row sequence the table
/// scraper would produce.
fn render_rows(spec: &Specification) -> Vec<RawRow> {
    let mut rows = Vec::new();
    for group in &spec.groups {
        rows.push(RawRow::GroupHeader {
            name: group.name.clone(),
        });
        for item in &group.items {
            rows.push(RawRow::Data {
                cells: item.cells.clone(),
            });
        }
    }
    rows
}

impl RowSource for PageSurface {
    fn read_rows(&self, table_id: &str) -> Result<Vec<RawRow>, DriverError> {
        debug!(table_id, "reading rendered rows");
        Ok(self.lock().working.clone())
    }
}

impl DialogDriver for PageSurface {
    fn open(&self, category: ComponentType) -> Result<(), DriverError> {
        let mut state = self.lock();
        if state.dialog.is_some() {
            return Err(DriverError::Rejected("a dialog is already open".to_string()));
        }
        state.dialog = Some(DialogState {
            category,
            selected: Vec::new(),
            pending: Vec::new(),
        });
        Ok(())
    }

    fn search(&self, term: &str) -> Result<Vec<Item>, DriverError> {
        let mut state = self.lock();
        if state.defer_search_results > 0 {
            state.defer_search_results -= 1;
            return Err(DriverError::CandidatesUnavailable);
        }
        let layout = state.layout;
        let dialog = state
            .dialog
            .as_ref()
            .ok_or_else(|| DriverError::Rejected("no dialog open".to_string()))?;
        let candidates = state
            .catalog
            .get(&dialog.category)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| {
                        item.name(&layout)
                            .is_some_and(|name| name.contains(term.trim()))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(candidates)
    }

    fn select(&self, candidate: &Item) -> Result<(), DriverError> {
        let mut state = self.lock();
        let dialog = state
            .dialog
            .as_mut()
            .ok_or_else(|| DriverError::Rejected("no dialog open".to_string()))?;
        if !dialog.selected.contains(candidate) {
            dialog.selected.push(candidate.clone());
        }
        Ok(())
    }

    fn confirm_stage(&self) -> Result<(), DriverError> {
        let mut state = self.lock();
        let dialog = state
            .dialog
            .as_mut()
            .ok_or_else(|| DriverError::Rejected("no dialog open".to_string()))?;
        if dialog.selected.is_empty() {
            return Err(DriverError::Rejected("no rows selected".to_string()));
        }
        dialog.pending = dialog.selected.clone();
        Ok(())
    }

    fn confirm_main(&self) -> Result<(), DriverError> {
        let mut state = self.lock();
        let layout = state.layout;
        let dialog = state
            .dialog
            .take()
            .ok_or_else(|| DriverError::Rejected("no dialog open".to_string()))?;
        if dialog.pending.is_empty() {
            return Err(DriverError::Rejected("pending table is empty".to_string()));
        }

        let mut spec = state.working_spec()?;
        let group_name = dialog.category.group_name();
        if spec.group(group_name).is_none() {
            spec.groups
                .push(crate::domain::entities::specification::Group::new(group_name));
        }
        let group = spec
            .group_mut(group_name)
            .ok_or_else(|| DriverError::Rejected("category group missing".to_string()))?;
        for item in &dialog.pending {
            merge_item(group, item, &layout)
                .map_err(|err| DriverError::Rejected(err.to_string()))?;
        }
        state.render(&spec);
        Ok(())
    }

    fn close(&self) -> Result<(), DriverError> {
        self.lock().dialog = None;
        Ok(())
    }

    fn remove(&self, category: ComponentType, item_name: &str) -> Result<(), DriverError> {
        let mut state = self.lock();
        if state.dialog.is_some() {
            return Err(DriverError::Rejected("a dialog is already open".to_string()));
        }
        let layout = state.layout;
        let mut spec = state.working_spec()?;
        let wanted = item_name.trim();

        let group = spec
            .group_mut(category.group_name())
            .ok_or_else(|| DriverError::Rejected(format!("no group {category}")))?;
        let idx = group
            .items
            .iter()
            .position(|item| item.name(&layout) == Some(wanted))
            .ok_or_else(|| {
                DriverError::Rejected(format!("item '{wanted}' not present in {category}"))
            })?;
        group.items.remove(idx);
        state.render(&spec);
        Ok(())
    }

    fn save(&self) -> Result<(), DriverError> {
        let mut state = self.lock();
        state.persisted = state.working.clone();
        debug!(rows = state.persisted.len(), "working table persisted");
        Ok(())
    }

    fn reload(&self) -> Result<(), DriverError> {
        let mut state = self.lock();
        state.working = state.persisted.clone();
        state.dialog = None;
        debug!(rows = state.working.len(), "page reloaded from persisted table");
        Ok(())
    }
}
