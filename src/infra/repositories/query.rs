//! Query building blocks for the generic repository.
//!
//! Typed stand-ins for keyword filters and column assignments.

use std::fmt;

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, IdenStatic, Order, Value};

/// Equality filters combined with AND, e.g. `name = 'Widget'`.
///
/// `Display` renders `name=Widget, owner=alice` for not-found messages.
pub struct FilterBy<E: EntityTrait> {
    pairs: Vec<(E::Column, Value, String)>,
}

impl<E: EntityTrait> FilterBy<E> {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Require `column = value`.
    pub fn eq<V>(mut self, column: E::Column, value: V) -> Self
    where
        V: Into<Value> + fmt::Display,
    {
        let shown = value.to_string();
        self.pairs.push((column, value.into(), shown));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn condition(&self) -> Condition {
        self.pairs
            .iter()
            .fold(Condition::all(), |cond, (column, value, _)| {
                cond.add(column.eq(value.clone()))
            })
    }
}

impl<E: EntityTrait> Default for FilterBy<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> fmt::Display for FilterBy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (column, _, shown)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", column.as_str(), shown)?;
        }
        Ok(())
    }
}

struct Assignment<C> {
    column: C,
    value: Value,
    is_null: bool,
}

/// Ordered column assignments for `update` and `patch`.
pub struct Changes<E: EntityTrait> {
    assignments: Vec<Assignment<E::Column>>,
}

impl<E: EntityTrait> Changes<E> {
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    /// Assign a value.
    pub fn set<V: Into<Value>>(mut self, column: E::Column, value: V) -> Self {
        self.assignments.push(Assignment {
            column,
            value: value.into(),
            is_null: false,
        });
        self
    }

    /// Assign an optional value; `None` writes NULL on update and is skipped on patch.
    pub fn set_opt<V>(mut self, column: E::Column, value: Option<V>) -> Self
    where
        Option<V>: Into<Value>,
    {
        let is_null = value.is_none();
        self.assignments.push(Assignment {
            column,
            value: value.into(),
            is_null,
        });
        self
    }

    /// Drop every assignment whose value is `None`.
    pub fn without_nulls(mut self) -> Self {
        self.assignments.retain(|a| !a.is_null);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Column names in assignment order.
    pub fn columns(&self) -> Vec<&str> {
        self.assignments.iter().map(|a| a.column.as_str()).collect()
    }

    pub(crate) fn into_exprs(self) -> impl Iterator<Item = (E::Column, SimpleExpr)> {
        self.assignments
            .into_iter()
            .map(|a| (a.column, Expr::value(a.value)))
    }
}

impl<E: EntityTrait> Default for Changes<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [`super::BaseRepository::find`].
pub struct FindOptions<E: EntityTrait> {
    pub filters: Option<Condition>,
    pub order_by: Option<(E::Column, Order)>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl<E: EntityTrait> FindOptions<E> {
    pub fn new() -> Self {
        Self {
            filters: None,
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filters = Some(condition);
        self
    }

    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.order_by = Some((column, order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

impl<E: EntityTrait> Default for FindOptions<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::entities::item;

    #[test]
    fn filter_by_renders_pairs_in_order() {
        let filter = FilterBy::<item::Entity>::new()
            .eq(item::Column::Name, "Widget")
            .eq(item::Column::Description, "small");
        assert_eq!(filter.to_string(), "name=Widget, description=small");
    }

    #[test]
    fn empty_filter_renders_nothing() {
        let filter = FilterBy::<item::Entity>::new();
        assert!(filter.is_empty());
        assert_eq!(filter.to_string(), "");
    }

    #[test]
    fn without_nulls_drops_only_missing_values() {
        let changes = Changes::<item::Entity>::new()
            .set(item::Column::Name, "Widget")
            .set_opt(item::Column::Description, None::<String>);
        assert_eq!(changes.len(), 2);

        let patched = changes.without_nulls();
        assert_eq!(patched.columns(), vec!["name"]);
    }

    #[test]
    fn set_opt_with_value_is_kept() {
        let changes = Changes::<item::Entity>::new()
            .set_opt(item::Column::Description, Some("text".to_string()))
            .without_nulls();
        assert_eq!(changes.columns(), vec!["description"]);
    }
}
