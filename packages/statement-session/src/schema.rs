//! The user's column schema.
//!
//! A [`Schema`] is an immutable snapshot: every edit returns a new one, so the
//! session always holds a single authoritative value.

use statement_client::{ColumnDefinition, ColumnId};

use crate::error::SchemaError;

/// Edit intents emitted by a schema editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaEdit {
    Add(String),
    Remove(ColumnId),
}

/// Ordered column definitions. Order is display order only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<ColumnDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column with a fresh id.
    ///
    /// Duplicate names are allowed. Rows are keyed by name, so two columns
    /// sharing a name show the same cell.
    pub fn with_column(&self, name: &str) -> Result<Schema, SchemaError> {
        self.with_definition(ColumnDefinition::new(name))
    }

    /// Append a fully specified column. The name is trimmed; a colliding id
    /// is replaced with a fresh one.
    pub fn with_definition(&self, mut column: ColumnDefinition) -> Result<Schema, SchemaError> {
        let name = column.name.trim();
        if name.is_empty() {
            return Err(SchemaError::InvalidInput);
        }
        column.name = name.to_string();

        if self.get(&column.id).is_some() {
            column.id = ColumnId::generate();
        }

        let mut columns = self.columns.clone();
        columns.push(column);
        Ok(Schema { columns })
    }

    /// Remove a column by id. Unknown ids leave the schema unchanged.
    pub fn without_column(&self, id: &ColumnId) -> Schema {
        Schema {
            columns: self
                .columns
                .iter()
                .filter(|column| &column.id != id)
                .cloned()
                .collect(),
        }
    }

    pub fn apply(&self, edit: SchemaEdit) -> Result<Schema, SchemaError> {
        match edit {
            SchemaEdit::Add(name) => self.with_column(&name),
            SchemaEdit::Remove(id) => Ok(self.without_column(&id)),
        }
    }

    pub fn get(&self, id: &ColumnId) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| &column.id == id)
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Column names in display order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_names_are_rejected() {
        let schema = Schema::new().with_column("Date").unwrap();

        for blank in ["", "   ", "\t\n"] {
            assert_eq!(schema.with_column(blank), Err(SchemaError::InvalidInput));
        }
        assert_eq!(schema.column_names(), vec!["Date"]);
    }

    #[test]
    fn test_add_trims_and_generates_unique_ids() {
        let schema = Schema::new()
            .with_column("  Date ")
            .unwrap()
            .with_column("Amount")
            .unwrap()
            .with_column("Amount")
            .unwrap();

        assert_eq!(schema.column_names(), vec!["Date", "Amount", "Amount"]);
        let ids: std::collections::HashSet<_> = schema.columns().iter().map(|c| &c.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_edits_do_not_mutate_previous_snapshot() {
        let before = Schema::new().with_column("Date").unwrap();
        let after = before.with_column("Amount").unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn test_remove_by_id_and_unknown_id() {
        let schema = Schema::new()
            .with_column("Date")
            .unwrap()
            .with_column("Amount")
            .unwrap();
        let date_id = schema.columns()[0].id.clone();

        let removed = schema.without_column(&date_id);
        assert_eq!(removed.column_names(), vec!["Amount"]);

        let unchanged = removed.without_column(&ColumnId::from("missing"));
        assert_eq!(unchanged, removed);
    }

    #[test]
    fn test_colliding_definition_id_is_replaced() {
        let first = ColumnDefinition::new("Date");
        let mut second = ColumnDefinition::new("Amount").with_description("signed amount");
        second.id = first.id.clone();

        let schema = Schema::new()
            .with_definition(first)
            .unwrap()
            .with_definition(second)
            .unwrap();

        assert_ne!(schema.columns()[0].id, schema.columns()[1].id);
        assert_eq!(
            schema.columns()[1].description.as_deref(),
            Some("signed amount")
        );
    }

    #[test]
    fn test_apply_edits() {
        let schema = Schema::new().apply(SchemaEdit::Add("Balance".into())).unwrap();
        let id = schema.columns()[0].id.clone();

        assert!(schema.apply(SchemaEdit::Remove(id)).unwrap().is_empty());
        assert_eq!(
            schema.apply(SchemaEdit::Add(" ".into())),
            Err(SchemaError::InvalidInput)
        );
    }
}
