use std::collections::HashMap;
use std::sync::Arc;

use crate::types::RowValues;

/// A row from a database query result
///
/// Column names and the name-to-index cache are shared across all rows in a
/// result set, so a row only owns its values.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    column_index: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index.get(column_name) {
            return Some(idx);
        }

        // Fall back to linear search
        self.column_names.iter().position(|col| col == column_name)
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }
}

/// A column-labeled in-memory snapshot of a query result.
///
/// Row order follows whatever order the server streamed; no uniqueness is
/// enforced beyond what the SQL itself returns.
#[derive(Debug, Clone)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set for the given columns, preallocating
    /// `capacity` rows. The name-to-index cache is built once here and shared
    /// by every row added later.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, capacity: usize) -> ResultSet {
        let column_index = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );

        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names,
            column_index,
        }
    }

    /// The column names shared by all rows.
    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Add a row to the result set
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.results.push(CustomDbRow {
            column_names: Arc::clone(&self.column_names),
            rows: row_values,
            column_index: Arc::clone(&self.column_index),
        });
    }

    /// (row count, column count), the tool's printed output.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.results.len(), self.column_names.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn track_columns() -> Arc<Vec<String>> {
        Arc::new(vec![
            "track_id".to_string(),
            "track_name".to_string(),
            "popularity".to_string(),
        ])
    }

    #[test]
    fn shape_reports_rows_and_columns() {
        let mut set = ResultSet::new(track_columns(), 4);
        assert_eq!(set.shape(), (0, 3));
        assert!(set.is_empty());

        set.add_row_values(vec![
            RowValues::Int(1),
            RowValues::Text("Bohemian Rhapsody".to_string()),
            RowValues::Int(87),
        ]);
        set.add_row_values(vec![
            RowValues::Int(2),
            RowValues::Text("Hotel California".to_string()),
            RowValues::Int(83),
        ]);

        assert_eq!(set.shape(), (2, 3));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn rows_resolve_values_by_name_and_index() {
        let mut set = ResultSet::new(track_columns(), 1);
        set.add_row_values(vec![
            RowValues::Int(1),
            RowValues::Text("Bohemian Rhapsody".to_string()),
            RowValues::Null,
        ]);

        let row = &set.results[0];
        assert_eq!(row.get_column_index("track_name"), Some(1));
        assert_eq!(
            row.get("track_name").and_then(RowValues::as_text),
            Some("Bohemian Rhapsody")
        );
        assert_eq!(row.get_by_index(0), Some(&RowValues::Int(1)));
        assert!(row.get("popularity").is_some_and(RowValues::is_null));
        assert_eq!(row.get("no_such_column"), None);
    }

    #[test]
    fn rows_share_the_column_name_allocation() {
        let mut set = ResultSet::new(track_columns(), 2);
        set.add_row_values(vec![RowValues::Int(1), RowValues::Null, RowValues::Null]);
        set.add_row_values(vec![RowValues::Int(2), RowValues::Null, RowValues::Null]);

        assert!(Arc::ptr_eq(
            &set.results[0].column_names,
            &set.results[1].column_names
        ));
    }
}
