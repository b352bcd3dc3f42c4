use std::fmt;

/// Component categories of a specification, in the order they appear in the
/// rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Сборочная единица (СБ).
    Assembly,
    /// Деталь (Д).
    Detail,
    /// Стандартное/покупное изделие (ПД).
    StandardPart,
    /// Расходный материал (РМ).
    Consumable,
}

impl ComponentType {
    /// The section title the editor renders for this category.
    pub fn group_name(&self) -> &'static str {
        match self {
            ComponentType::Assembly => "СБ",
            ComponentType::Detail => "Д",
            ComponentType::StandardPart => "ПД",
            ComponentType::Consumable => "РМ",
        }
    }

    pub fn from_group_name(name: &str) -> Option<Self> {
        match name.trim() {
            "СБ" => Some(ComponentType::Assembly),
            "Д" => Some(ComponentType::Detail),
            "ПД" => Some(ComponentType::StandardPart),
            "РМ" => Some(ComponentType::Consumable),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_name())
    }
}

/// Designates which positional columns carry the item name and quantity.
///
/// Column semantics are positional, mirroring the physical table; the raw
/// cells are never renamed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name_col: usize,
    pub quantity_col: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout {
            name_col: 0,
            quantity_col: 2,
        }
    }
}

/// One table row: an ordered sequence of cell strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub cells: Vec<String>,
}

impl Item {
    pub fn new(cells: Vec<String>) -> Self {
        Item { cells }
    }

    /// The cell at `idx`, or `None` when the row is narrower than that.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }

    pub fn name<'a>(&'a self, layout: &ColumnLayout) -> Option<&'a str> {
        self.cell(layout.name_col).map(str::trim)
    }

    pub fn quantity_raw<'a>(&'a self, layout: &ColumnLayout) -> Option<&'a str> {
        self.cell(layout.quantity_col).map(str::trim)
    }
}

impl From<Vec<&str>> for Item {
    fn from(cells: Vec<&str>) -> Self {
        Item::new(cells.into_iter().map(str::to_string).collect())
    }
}

/// A named section of the table and the rows accumulated under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub items: Vec<Item>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Group {
            name: name.into(),
            items: Vec::new(),
        }
    }
}

/// The parsed specification tree: an ordered sequence of groups.
///
/// Order is not semantically free; comparison and display both depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specification {
    pub groups: Vec<Group>,
}

impl Specification {
    pub fn new(groups: Vec<Group>) -> Self {
        Specification { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|group| group.items.is_empty())
    }

    /// Flattens all groups into a single row sequence, document order.
    pub fn flatten(&self) -> Vec<Vec<String>> {
        self.groups
            .iter()
            .flat_map(|group| group.items.iter().map(|item| item.cells.clone()))
            .collect()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|group| group.name == name)
    }
}
