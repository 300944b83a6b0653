//! Generic sortable, filterable list projection.
//!
//! A [`ListView`] never owns or changes records. It holds the column set and
//! the current sort and filter choices, and projects a slice of rows into the
//! order and subset to display.

use super::ViewError;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A record that can appear in a list view.
pub trait Row {
    /// Stable identity used for selection.
    fn row_key(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

pub type Comparator<T> = fn(&T, &T) -> Ordering;
pub type Derive<T> = fn(&T) -> String;

/// A choice offered by a column filter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Where a filter's options come from.
#[derive(Debug, Clone)]
pub enum FilterOptions {
    /// Distinct derived values of the current rows, case-insensitively sorted.
    Derived,
    Fixed(Vec<FilterOption>),
}

pub struct ColumnFilter<T> {
    /// Value compared against the selected set.
    pub value: Derive<T>,
    pub options: FilterOptions,
}

pub struct Column<T> {
    pub key: &'static str,
    pub title: &'static str,
    pub sorter: Option<Comparator<T>>,
    pub default_sort: Option<SortOrder>,
    pub filter: Option<ColumnFilter<T>>,
}

impl<T> Column<T> {
    pub fn new(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            sorter: None,
            default_sort: None,
            filter: None,
        }
    }

    pub fn sortable(mut self, sorter: Comparator<T>) -> Self {
        self.sorter = Some(sorter);
        self
    }

    pub fn default_sort(mut self, order: SortOrder) -> Self {
        self.default_sort = Some(order);
        self
    }

    pub fn filterable(mut self, value: Derive<T>, options: FilterOptions) -> Self {
        self.filter = Some(ColumnFilter { value, options });
        self
    }
}

/// One page of a projection.
#[derive(Debug)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// Zero-based.
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

pub struct ListView<T> {
    columns: Vec<Column<T>>,
    sort: Option<(usize, SortOrder)>,
    filters: HashMap<&'static str, Vec<String>>,
    page_size: Option<usize>,
}

impl<T: Row> ListView<T> {
    /// Create a view; the first column with a default order sorts initially.
    pub fn new(columns: Vec<Column<T>>) -> Self {
        let sort = columns
            .iter()
            .enumerate()
            .find_map(|(i, c)| match (c.sorter, c.default_sort) {
                (Some(_), Some(order)) => Some((i, order)),
                _ => None,
            });

        Self {
            columns,
            sort,
            filters: HashMap::new(),
            page_size: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Current sort column key and direction.
    pub fn sort(&self) -> Option<(&'static str, SortOrder)> {
        self.sort.map(|(i, order)| (self.columns[i].key, order))
    }

    fn column_index(&self, key: &str) -> Result<usize, ViewError> {
        self.columns
            .iter()
            .position(|c| c.key == key)
            .ok_or_else(|| ViewError::UnknownColumn(key.to_string()))
    }

    pub fn sort_by(&mut self, key: &str, order: SortOrder) -> Result<(), ViewError> {
        let index = self.column_index(key)?;
        if self.columns[index].sorter.is_none() {
            return Err(ViewError::NotSortable(key.to_string()));
        }
        self.sort = Some((index, order));
        Ok(())
    }

    /// Show rows in their original order.
    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Restrict `key` to rows whose derived value is one of `values`.
    /// An empty set removes the filter.
    pub fn set_filter(&mut self, key: &str, values: Vec<String>) -> Result<(), ViewError> {
        let index = self.column_index(key)?;
        let column = &self.columns[index];
        if column.filter.is_none() {
            return Err(ViewError::NotFilterable(key.to_string()));
        }
        if values.is_empty() {
            self.filters.remove(column.key);
        } else {
            self.filters.insert(column.key, values);
        }
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Options a user could pick for the filter on `key`, given `rows`.
    pub fn filter_options(&self, key: &str, rows: &[T]) -> Result<Vec<FilterOption>, ViewError> {
        let index = self.column_index(key)?;
        let filter = self.columns[index]
            .filter
            .as_ref()
            .ok_or_else(|| ViewError::NotFilterable(key.to_string()))?;

        match &filter.options {
            FilterOptions::Fixed(options) => Ok(options.clone()),
            FilterOptions::Derived => {
                let mut values: Vec<String> = Vec::new();
                for row in rows {
                    let value = (filter.value)(row);
                    if !values.contains(&value) {
                        values.push(value);
                    }
                }
                values.sort_by_key(|v| v.to_uppercase());
                Ok(values
                    .into_iter()
                    .map(|v| FilterOption::new(v.clone(), v))
                    .collect())
            }
        }
    }

    fn matches(&self, row: &T) -> bool {
        self.filters.iter().all(|(key, selected)| {
            self.columns
                .iter()
                .find(|c| c.key == *key)
                .and_then(|c| c.filter.as_ref())
                .map(|f| selected.contains(&(f.value)(row)))
                .unwrap_or(true)
        })
    }

    /// Filter, then stably sort. Ties keep their input order in both
    /// directions.
    pub fn project<'a>(&self, rows: &'a [T]) -> Vec<&'a T> {
        let mut items: Vec<&T> = rows.iter().filter(|r| self.matches(r)).collect();

        if let Some((index, order)) = self.sort {
            if let Some(sorter) = self.columns[index].sorter {
                match order {
                    SortOrder::Ascending => items.sort_by(|a, b| sorter(a, b)),
                    SortOrder::Descending => items.sort_by(|a, b| sorter(b, a)),
                }
            }
        }
        items
    }

    /// One page (zero-based) of the projection. Without a page size the
    /// whole projection is page 0.
    pub fn page<'a>(&self, rows: &'a [T], page: usize) -> Result<Page<'a, T>, ViewError> {
        let items = self.project(rows);
        let total = items.len();
        let size = self.page_size.unwrap_or(total.max(1));
        let page_count = total.div_ceil(size).max(1);

        if page >= page_count {
            return Err(ViewError::PageOutOfRange {
                page,
                pages: page_count,
            });
        }

        let items = items.into_iter().skip(page * size).take(size).collect();
        Ok(Page {
            items,
            page,
            page_count,
            total,
        })
    }

    pub fn row_keys(&self, rows: &[T]) -> Vec<String> {
        self.project(rows).iter().map(|r| r.row_key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        name: &'static str,
        score: u32,
    }

    impl Row for Item {
        fn row_key(&self) -> String {
            self.id.to_string()
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: 1, name: "bob", score: 2 },
            Item { id: 2, name: "Ann", score: 1 },
            Item { id: 3, name: "cy", score: 2 },
            Item { id: 4, name: "ann", score: 3 },
            Item { id: 5, name: "bob", score: 1 },
        ]
    }

    fn view() -> ListView<Item> {
        ListView::new(vec![
            Column::new("id", "#"),
            Column::new("name", "Name")
                .sortable(|a: &Item, b: &Item| a.name.cmp(b.name))
                .filterable(|i: &Item| i.name.to_string(), FilterOptions::Derived),
            Column::new("score", "Score")
                .sortable(|a: &Item, b: &Item| a.score.cmp(&b.score))
                .default_sort(SortOrder::Descending),
        ])
    }

    fn ids(rows: &[&Item]) -> Vec<u32> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_default_sort_applies() {
        let rows = items();
        let view = view();
        assert_eq!(view.sort(), Some(("score", SortOrder::Descending)));
        assert_eq!(ids(&view.project(&rows)), vec![4, 1, 3, 2, 5]);
    }

    #[test]
    fn test_ties_keep_input_order_both_ways() {
        let rows = items();
        let mut view = view();
        view.sort_by("score", SortOrder::Ascending).unwrap();
        assert_eq!(ids(&view.project(&rows)), vec![2, 5, 1, 3, 4]);
    }

    #[test]
    fn test_filter_exact_match_on_derived_value() {
        let rows = items();
        let mut view = view();
        view.set_filter("name", vec!["bob".to_string(), "ann".to_string()])
            .unwrap();
        assert_eq!(ids(&view.project(&rows)), vec![4, 1, 5]);

        view.set_filter("name", vec![]).unwrap();
        assert_eq!(view.project(&rows).len(), 5);
    }

    #[test]
    fn test_derived_options_distinct_and_case_insensitive() {
        let rows = items();
        let options = view().filter_options("name", &rows).unwrap();
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["Ann", "ann", "bob", "cy"]);
    }

    #[test]
    fn test_unknown_and_unsupported_columns() {
        let mut view = view();
        assert_eq!(
            view.sort_by("colour", SortOrder::Ascending),
            Err(ViewError::UnknownColumn("colour".to_string()))
        );
        assert_eq!(
            view.sort_by("id", SortOrder::Ascending),
            Err(ViewError::NotSortable("id".to_string()))
        );
        assert_eq!(
            view.set_filter("score", vec!["1".to_string()]),
            Err(ViewError::NotFilterable("score".to_string()))
        );
    }

    #[test]
    fn test_pagination() {
        let rows = items();
        let view = view().with_page_size(2);

        let first = view.page(&rows, 0).unwrap();
        assert_eq!(first.page_count, 3);
        assert_eq!(first.total, 5);
        assert_eq!(ids(&first.items), vec![4, 1]);

        let last = view.page(&rows, 2).unwrap();
        assert_eq!(ids(&last.items), vec![5]);

        assert!(matches!(
            view.page(&rows, 3),
            Err(ViewError::PageOutOfRange { page: 3, pages: 3 })
        ));
    }

    #[test]
    fn test_empty_rows_have_one_empty_page() {
        let rows: Vec<Item> = Vec::new();
        let page = view().with_page_size(20).page(&rows, 0).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page_count, 1);
    }

    #[test]
    fn test_row_keys_follow_projection() {
        let rows = items();
        assert_eq!(view().row_keys(&rows), vec!["4", "1", "3", "2", "5"]);
    }
}
