use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::specification::{
    ColumnLayout, ComponentType, Group, Item, Specification,
};
use crate::domain::entities::staging::StagingSet;
use crate::error::{Error, Result};
use crate::usecase::ports::driver::{DialogDriver, DriverError, RowSource};
use crate::usecase::services::parser::parse;

/// Caller-supplied knobs for an edit session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub layout: ColumnLayout,
    /// Upper bound on search attempts when the collaborator has not rendered
    /// candidates yet. The core never waits beyond this.
    pub search_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            layout: ColumnLayout::default(),
            search_attempts: 3,
        }
    }
}

/// Staged add-then-commit-then-save editing workflow over one specification.
///
/// All state lives in the session; there is no ambient shared state. One
/// staging set may be open at a time, and every operation is atomic with
/// respect to the in-memory model: on failure the working specification is
/// left exactly as it was.
pub struct EditSession {
    rows: Arc<dyn RowSource>,
    driver: Arc<dyn DialogDriver>,
    table_id: String,
    config: SessionConfig,
    working: Specification,
    staging: Option<StagingSet>,
}

impl EditSession {
    /// Opens a session by parsing the collaborator's rendered table.
    pub fn open(
        rows: Arc<dyn RowSource>,
        driver: Arc<dyn DialogDriver>,
        table_id: impl Into<String>,
        config: SessionConfig,
    ) -> Result<Self> {
        let table_id = table_id.into();
        let raw = rows.read_rows(&table_id)?;
        let working = parse(&raw)?;
        debug!(
            table_id = %table_id,
            groups = working.groups.len(),
            "edit session opened"
        );
        Ok(EditSession {
            rows,
            driver,
            table_id,
            config,
            working,
            staging: None,
        })
    }

    /// The working specification as currently modeled. Read-only.
    pub fn current(&self) -> &Specification {
        &self.working
    }

    pub fn open_add_dialog(&mut self, category: ComponentType) -> Result<()> {
        self.ensure_idle(format!("open {category} dialog"))?;
        self.driver.open(category)?;
        self.staging = Some(StagingSet::new(category));
        debug!(%category, "add dialog opened");
        Ok(())
    }

    /// Queries the dialog for candidate rows matching `term` and replaces the
    /// staging set's candidate list. Repeating the same term yields the same
    /// candidates. A collaborator that has not rendered candidates yet is
    /// retried up to the configured attempt bound, then surfaced.
    pub fn search(&mut self, term: &str) -> Result<usize> {
        let attempts = self.config.search_attempts.max(1);
        let staging = self
            .staging
            .as_mut()
            .ok_or(Error::DialogNotOpen { operation: "search" })?;

        for attempt in 1..=attempts {
            match self.driver.search(term) {
                Ok(candidates) => {
                    debug!(term, count = candidates.len(), "search returned candidates");
                    staging.candidates = candidates;
                    return Ok(staging.candidates.len());
                }
                Err(DriverError::CandidatesUnavailable) if attempt < attempts => {
                    debug!(term, attempt, "candidates not yet available, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(DriverError::CandidatesUnavailable.into())
    }

    /// Selects the candidate named `item_name` and appends it to the staged
    /// rows. Staging an identical item twice within one session is a no-op.
    pub fn select(&mut self, item_name: &str) -> Result<()> {
        let layout = self.config.layout;
        let staging = self
            .staging
            .as_mut()
            .ok_or(Error::DialogNotOpen { operation: "select" })?;
        let wanted = item_name.trim();

        let candidate = staging
            .candidates
            .iter()
            .find(|item| item.name(&layout) == Some(wanted))
            .cloned()
            .ok_or_else(|| Error::ItemNotFound {
                group: format!("candidates for {}", staging.category),
                item: wanted.to_string(),
            })?;

        if staging.staged.contains(&candidate) {
            debug!(item = wanted, "already staged, select is a no-op");
            return Ok(());
        }

        self.driver.select(&candidate)?;
        staging.stage(candidate);
        debug!(item = wanted, staged = staging.staged.len(), "candidate staged");
        Ok(())
    }

    /// Confirms the staged rows into the dialog's pending table. The working
    /// specification is not touched by this transition.
    pub fn confirm_stage(&mut self) -> Result<()> {
        let staging = self.staging.as_mut().ok_or(Error::DialogNotOpen {
            operation: "confirm_stage",
        })?;

        let all_blank = |item: &Item| item.cells.iter().all(|cell| cell.trim().is_empty());
        if staging.staged.is_empty() || staging.staged.iter().any(all_blank) {
            return Err(Error::NothingStaged);
        }

        self.driver.confirm_stage()?;
        staging.stage_confirmed = true;
        debug!(staged = staging.staged.len(), "staged rows confirmed to pending table");
        Ok(())
    }

    /// Merges the pending rows into the working specification's group for the
    /// dialog's category and returns to idle. Same-name rows have their
    /// quantities summed in place; new names are appended. The staging set is
    /// discarded either way.
    pub fn confirm_main(&mut self) -> Result<()> {
        let layout = self.config.layout;
        let staging = self.staging.as_ref().ok_or(Error::DialogNotOpen {
            operation: "confirm_main",
        })?;
        if !staging.stage_confirmed || staging.staged.is_empty() {
            return Err(Error::NothingStaged);
        }

        let group_name = staging.category.group_name();
        // Validate every merge before mutating anything, so a bad staged row
        // cannot leave a half-merged specification behind. The rendered table
        // has one fixed width; a staged row that does not match it would
        // corrupt the next parse.
        let mut expected_width = table_width(&self.working);
        for (row_idx, item) in staging.staged.iter().enumerate() {
            let width = *expected_width.get_or_insert(item.cells.len());
            if item.cells.len() != width {
                return Err(Error::MalformedTable {
                    row_idx,
                    expected: width,
                    found: item.cells.len(),
                });
            }
        }
        if let Some(group) = self.working.group(group_name) {
            for item in &staging.staged {
                plan_merge(group, item, &layout)?;
            }
        }

        self.driver.confirm_main()?;

        let staging = self.staging.take().expect("staging checked above");
        if self.working.group(group_name).is_none() {
            self.working.groups.push(Group::new(group_name));
        }
        let group = self
            .working
            .group_mut(group_name)
            .expect("group ensured above");
        for item in &staging.staged {
            merge_item(group, item, &layout)?;
        }

        info!(
            category = %staging.category,
            merged = staging.staged.len(),
            "staged rows committed to working specification"
        );
        Ok(())
    }

    /// Closes an open dialog without committing. The staging set is discarded
    /// and the working specification is untouched, regardless of how far the
    /// dialog had progressed. Closing with no dialog open is a no-op.
    pub fn close_dialog(&mut self) -> Result<()> {
        if self.staging.is_none() {
            return Ok(());
        }
        self.driver.close()?;
        let staging = self.staging.take().expect("dialog checked open");
        debug!(
            category = %staging.category,
            discarded = staging.staged.len(),
            "dialog closed, staging discarded"
        );
        Ok(())
    }

    /// Removes the item named `item_name` from the category's group.
    ///
    /// Atomic from the caller's perspective: when the item is absent the
    /// whole removal fails with `ItemNotFound` and the working specification
    /// is unchanged; a collaborator failure likewise leaves it unchanged.
    pub fn remove_item(&mut self, category: ComponentType, item_name: &str) -> Result<()> {
        self.ensure_idle(format!("remove '{item_name}' from {category}"))?;
        let layout = self.config.layout;
        let group_name = category.group_name();
        let wanted = item_name.trim();

        let not_found = || Error::ItemNotFound {
            group: format!("group '{group_name}'"),
            item: wanted.to_string(),
        };
        let group_idx = self
            .working
            .groups
            .iter()
            .position(|group| group.name == group_name)
            .ok_or_else(not_found)?;
        let item_idx = self.working.groups[group_idx]
            .items
            .iter()
            .position(|item| item.name(&layout) == Some(wanted))
            .ok_or_else(not_found)?;

        self.driver.remove(category, wanted)?;
        self.working.groups[group_idx].items.remove(item_idx);
        info!(%category, item = wanted, "item removed from working specification");
        Ok(())
    }

    /// Persists the working specification. The only transition that makes
    /// edits durable.
    pub fn save(&mut self) -> Result<()> {
        self.ensure_idle("save".to_string())?;
        self.driver.save()?;
        info!(table_id = %self.table_id, "working specification saved");
        Ok(())
    }

    /// Discards the working model and re-parses from the collaborator's
    /// persisted state. Edits since the last save are lost by design, as is
    /// any open staging set, the way a page reload would drop an open dialog.
    pub fn reload(&mut self) -> Result<()> {
        self.driver.reload()?;
        self.staging = None;
        let raw = self.rows.read_rows(&self.table_id)?;
        self.working = parse(&raw)?;
        info!(
            table_id = %self.table_id,
            groups = self.working.groups.len(),
            "working specification reloaded from persisted state"
        );
        Ok(())
    }

    fn ensure_idle(&self, operation: String) -> Result<()> {
        match &self.staging {
            Some(staging) => Err(Error::DialogAlreadyOpen {
                open: staging.category,
                operation,
            }),
            None => Ok(()),
        }
    }
}

/// The fixed column count of the table, or `None` while it has no items.
fn table_width(spec: &Specification) -> Option<usize> {
    spec.groups
        .iter()
        .flat_map(|group| group.items.iter())
        .map(|item| item.cells.len())
        .next()
}

/// Checks that merging `item` into `group` would succeed, without mutating.
fn plan_merge(group: &Group, item: &Item, layout: &ColumnLayout) -> Result<()> {
    let Some(name) = item.name(layout) else {
        return Ok(());
    };
    let Some(existing) = group
        .items
        .iter()
        .find(|row| row.name(layout) == Some(name))
    else {
        return Ok(());
    };
    let current = parse_quantity(group, existing, layout)?;
    let added = parse_quantity(group, item, layout)?;
    if current.checked_add(added).is_none() {
        return Err(Error::QuantityParse {
            group: group.name.clone(),
            item: name.to_string(),
            raw: format!("{current}+{added}"),
        });
    }
    Ok(())
}

/// Merge-by-name-sum: a staged item whose name already exists in the group
/// adds its quantity to the existing row; otherwise the item is appended.
pub fn merge_item(group: &mut Group, item: &Item, layout: &ColumnLayout) -> Result<()> {
    let name = item.name(layout).map(str::to_string);
    let existing_idx = name.as_deref().and_then(|wanted| {
        group
            .items
            .iter()
            .position(|row| row.name(layout) == Some(wanted))
    });

    match existing_idx {
        Some(idx) => {
            let added = parse_quantity(group, item, layout)?;
            let current = parse_quantity(group, &group.items[idx], layout)?;
            let sum = current.checked_add(added).ok_or_else(|| Error::QuantityParse {
                group: group.name.clone(),
                item: name.as_deref().unwrap_or("").to_string(),
                raw: format!("{current}+{added}"),
            })?;
            let cell = group.items[idx]
                .cells
                .get_mut(layout.quantity_col)
                .expect("quantity parsed from this cell");
            *cell = sum.to_string();
        }
        None => group.items.push(item.clone()),
    }
    Ok(())
}

fn parse_quantity(group: &Group, item: &Item, layout: &ColumnLayout) -> Result<i64> {
    let raw = item.quantity_raw(layout).unwrap_or("");
    raw.parse::<i64>().map_err(|_| Error::QuantityParse {
        group: group.name.clone(),
        item: item.name(layout).unwrap_or("").to_string(),
        raw: raw.to_string(),
    })
}
