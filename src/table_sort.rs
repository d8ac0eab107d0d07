use crate::compare::{compare_values, CellValue, SortDirection};
use crate::config::SortableTableConfig;
use crate::services::{WidgetError, WidgetResult};

/// One body row: its cell texts in column order plus the persistence id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub id: Option<String>,
    pub cells: Vec<String>,
}

impl Row {
    pub fn new<I, S>(id: Option<&str>, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.map(str::to_string),
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    pub fn cell(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableSortState {
    config: SortableTableConfig,
    active: Option<(usize, SortDirection)>,
}

impl TableSortState {
    pub fn new(config: SortableTableConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    pub fn active_column(&self) -> Option<usize> {
        self.active.map(|(column, _)| column)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.map(|(_, direction)| direction)
    }

    pub fn is_sortable(&self, column: usize) -> bool {
        self.config.sortable_columns.contains(&column)
    }

    /// Header indicator for `column`; only the active column carries one.
    pub fn indicator(&self, column: usize) -> Option<SortDirection> {
        match self.active {
            Some((active, direction)) if active == column => Some(direction),
            _ => None,
        }
    }

    /// Advances the toggle state for a header click and returns the
    /// direction to sort with.
    pub fn select(&mut self, column: usize) -> WidgetResult<SortDirection> {
        if !self.is_sortable(column) {
            return Err(WidgetError::ValidationFailure(format!(
                "column {} is not sortable",
                column + 1
            )));
        }
        let direction = match self.active {
            Some((active, direction)) if active == column => direction.toggled(),
            _ => SortDirection::Ascending,
        };
        self.active = Some((column, direction));
        Ok(direction)
    }

    /// Handles a header click: returns the row permutation to apply, as
    /// indices into `rows`.
    pub fn sort_by_column(&mut self, rows: &[Row], column: usize) -> WidgetResult<Vec<usize>> {
        let direction = self.select(column)?;
        Ok(sorted_order(rows, column, direction))
    }
}

/// Stable ordering of `rows` by `column`.
pub fn sorted_order(rows: &[Row], column: usize, direction: SortDirection) -> Vec<usize> {
    let keys: Vec<CellValue> = rows
        .iter()
        .map(|row| CellValue::parse(row.cell(column)))
        .collect();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|a, b| compare_values(&keys[*a], &keys[*b], direction));
    order
}

pub fn apply_order<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().filter_map(|index| items.get(*index).cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> Vec<Row> {
        vec![
            Row::new(Some("1"), ["Intro", "10", "2024-03-01"]),
            Row::new(Some("2"), ["About", "9", "2023-11-20"]),
            Row::new(Some("3"), ["Contact", "abc", "2024-01-05"]),
        ]
    }

    fn state() -> TableSortState {
        TableSortState::new(SortableTableConfig {
            sortable_columns: vec![0, 1, 2],
        })
    }

    fn ids(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|row| row.id.clone().unwrap_or_default()).collect()
    }

    #[test]
    fn first_click_sorts_ascending() {
        let rows = table();
        let mut state = state();
        let order = state.sort_by_column(&rows, 1).unwrap();
        let sorted = apply_order(&rows, &order);
        let cells: Vec<&str> = sorted.iter().map(|row| row.cell(1)).collect();
        assert_eq!(cells, vec!["9", "10", "abc"]);
        assert_eq!(state.indicator(1), Some(SortDirection::Ascending));
        assert_eq!(state.indicator(0), None);
    }

    #[test]
    fn second_click_reverses_rows() {
        let rows = table();
        let mut state = state();
        let ascending = apply_order(&rows, &state.sort_by_column(&rows, 0).unwrap());
        let descending = apply_order(&ascending, &state.sort_by_column(&ascending, 0).unwrap());
        let mut reversed = ids(&ascending);
        reversed.reverse();
        assert_eq!(ids(&descending), reversed);
        assert_eq!(state.direction(), Some(SortDirection::Descending));
    }

    #[test]
    fn resorting_sorted_rows_is_identity() {
        let rows = table();
        let sorted = apply_order(&rows, &sorted_order(&rows, 2, SortDirection::Ascending));
        let again = sorted_order(&sorted, 2, SortDirection::Ascending);
        assert_eq!(again, vec![0, 1, 2]);
    }

    #[test]
    fn switching_columns_resets_to_ascending() {
        let rows = table();
        let mut state = state();
        state.sort_by_column(&rows, 0).unwrap();
        state.sort_by_column(&rows, 0).unwrap();
        state.sort_by_column(&rows, 2).unwrap();
        assert_eq!(state.active_column(), Some(2));
        assert_eq!(state.direction(), Some(SortDirection::Ascending));
        let indicators: Vec<_> = (0..3).map(|column| state.indicator(column)).collect();
        assert_eq!(indicators, vec![None, None, Some(SortDirection::Ascending)]);
    }

    #[test]
    fn ties_keep_their_original_order() {
        let rows = vec![
            Row::new(Some("a"), ["draft"]),
            Row::new(Some("b"), ["published"]),
            Row::new(Some("c"), ["draft"]),
        ];
        let order = sorted_order(&rows, 0, SortDirection::Ascending);
        assert_eq!(ids(&apply_order(&rows, &order)), vec!["a", "c", "b"]);
    }

    #[test]
    fn missing_cells_sort_as_empty_text() {
        let rows = vec![Row::new(Some("a"), ["b"]), Row::new(Some("b"), Vec::<String>::new())];
        let order = sorted_order(&rows, 0, SortDirection::Ascending);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn unsortable_column_leaves_state_untouched() {
        let rows = table();
        let mut state = TableSortState::new(SortableTableConfig {
            sortable_columns: vec![0],
        });
        state.sort_by_column(&rows, 0).unwrap();
        let err = state.sort_by_column(&rows, 1).unwrap_err();
        assert!(matches!(err, WidgetError::ValidationFailure(_)));
        assert_eq!(state.active_column(), Some(0));
        assert_eq!(state.direction(), Some(SortDirection::Ascending));
    }
}
