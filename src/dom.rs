use std::collections::VecDeque;

/// Identity key for a table in a [`Document`].
///
/// Ids are copyable, non-owning handles: holding one never keeps the table
/// alive, and an id whose table has been removed simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text: String,
    pub header: bool,
}

impl Cell {
    pub fn data(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            header: false,
        }
    }

    pub fn header(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            header: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn from_texts(texts: &[&str]) -> Self {
        Self {
            cells: texts.iter().map(|t| Cell::data(*t)).collect(),
        }
    }
}

/// A table as the page owns it: data rows plus at most one footer row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub body: Vec<Row>,
    pub footer: Option<Row>,
}

impl Table {
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self {
            body: rows.iter().map(|r| Row::from_texts(r)).collect(),
            footer: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    CharacterData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    Root,
    Table(TableId),
}

/// One change notification, the analog of a mutation-observer record.
#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    pub target: MutationTarget,
    pub kind: MutationKind,
}

/// In-memory stand-in for the page.
///
/// Every structural or text change is recorded in a drainable queue so the
/// runtime can deliver it to whoever subscribed, including changes caused
/// by the engine's own footer writes. Removed tables leave a vacant slot
/// behind; their ids become inert.
#[derive(Debug, Default)]
pub struct Document {
    tables: Vec<Option<Table>>,
    mutations: VecDeque<Mutation>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, table: Table) -> TableId {
        let id = TableId(self.tables.len());
        self.tables.push(Some(table));
        self.record(MutationTarget::Root, MutationKind::ChildList);
        id
    }

    pub fn remove_table(&mut self, id: TableId) {
        if let Some(slot) = self.tables.get_mut(id.0) {
            if slot.take().is_some() {
                self.record(MutationTarget::Root, MutationKind::ChildList);
            }
        }
    }

    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Live tables in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = (TableId, &Table)> {
        self.tables
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|t| (TableId(i), t)))
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables()
            .map(|(id, _)| id)
            .collect()
    }

    pub fn set_cell_text(&mut self, id: TableId, row: usize, col: usize, text: &str) {
        if let Some(cell) = self
            .table_mut(id)
            .and_then(|t| t.body.get_mut(row))
            .and_then(|r| r.cells.get_mut(col))
        {
            cell.text = text.to_string();
            self.record(MutationTarget::Table(id), MutationKind::CharacterData);
        }
    }

    pub fn push_row(&mut self, id: TableId, row: Row) {
        if let Some(table) = self.table_mut(id) {
            table.body.push(row);
            self.record(MutationTarget::Table(id), MutationKind::ChildList);
        }
    }

    pub fn remove_row(&mut self, id: TableId, row: usize) {
        if let Some(table) = self.table_mut(id) {
            if row < table.body.len() {
                table.body.remove(row);
                self.record(MutationTarget::Table(id), MutationKind::ChildList);
            }
        }
    }

    /// Destructively replace the footer row.
    ///
    /// Writing a footer identical to the one already present is a no-op and
    /// records no mutation; this is what lets the engine's own rewrites
    /// settle instead of feeding back forever.
    pub fn set_footer(&mut self, id: TableId, footer: Row) {
        if let Some(table) = self.table_mut(id) {
            if table.footer.as_ref() == Some(&footer) {
                return;
            }
            table.footer = Some(footer);
            self.record(MutationTarget::Table(id), MutationKind::ChildList);
        }
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        self.mutations.drain(..).collect()
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }

    fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    fn record(&mut self, target: MutationTarget, kind: MutationKind) {
        self.mutations.push_back(Mutation { target, kind });
    }
}
