//! An immutable step of a `Path`.

use crate::database::DatabaseGraph;
use crate::direction::Direction;
use crate::link::Link;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::BTreeMap;
use vista_core::{Error, FieldId, Result, TableId};

/// One hop between two tables, crossing one or more foreign keys that all
/// connect the same pair of tables.
///
/// Every field carries a resolved direction. Two steps are equal when they
/// start from the same table and cross the same fields the same way; `to`
/// follows from those and takes no part in equality.
#[derive(Clone, Debug)]
pub struct Step {
    from: TableId,
    to: TableId,
    fields: BTreeMap<FieldId, Direction>,
}

impl Step {
    /// Creates a step crossing `field` from `start`.
    ///
    /// `direction` may be `Unresolved` to infer it, which is only possible
    /// when the field connects two distinct tables.
    ///
    /// # Errors
    ///
    /// Fails if `field` is not a foreign key, if neither of its ends is
    /// `start`, if the field references its own table and `direction` is
    /// `Unresolved`, or if `direction` contradicts the link.
    pub fn from_field(
        graph: &DatabaseGraph,
        start: TableId,
        field: FieldId,
        direction: Direction,
    ) -> Result<Self> {
        let link = graph.foreign_link(field).ok_or_else(|| Error::NotForeign {
            field: graph.field_name(field),
        })?;
        let end = link.opposite(start).ok_or_else(|| Error::NotConnected {
            table: graph.table_name(start),
            field: graph.field_name(field),
        })?;

        let computed = if start == end {
            Direction::Unresolved
        } else {
            Direction::from_foreign(link.source() == start)
        };

        if !computed.is_resolved() && !direction.is_resolved() {
            return Err(Error::AmbiguousDirection {
                field: graph.field_name(field),
            });
        }
        if direction.is_resolved() && computed.is_resolved() && direction != computed {
            return Err(Error::DirectionConflict {
                field: graph.field_name(field),
                requested: direction.to_string(),
                actual: computed.to_string(),
            });
        }
        let resolved = if direction.is_resolved() {
            direction
        } else {
            computed
        };
        debug_assert!(resolved.is_resolved());

        Ok(Self::single(start, field, resolved, end))
    }

    /// Creates a step bundling every field between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Fails if no field connects the tables, or if they are the same table
    /// since directions can't be inferred then.
    pub fn between(graph: &DatabaseGraph, start: TableId, end: TableId) -> Result<Self> {
        let fields = graph.fields_between(start, end);
        if fields.is_empty() {
            return Err(Error::BrokenPath {
                from: graph.table_name(start),
                to: graph.table_name(end),
            });
        }
        Self::bundle(graph, start, fields, end)
    }

    /// Creates a step from `start` over `links`.
    ///
    /// # Errors
    ///
    /// Fails if `links` is empty, if one of them does not touch `start`, or
    /// if they do not all lead to the same table.
    pub fn from_links(graph: &DatabaseGraph, start: TableId, links: &[Link]) -> Result<Self> {
        let first = links.first().ok_or(Error::EmptyFields)?;
        let opposite = |link: &Link| {
            link.opposite(start).ok_or_else(|| Error::NotConnected {
                table: graph.table_name(start),
                field: graph.field_name(link.field()),
            })
        };
        let end = opposite(first)?;
        for link in links {
            if opposite(link)? != end {
                return Err(Error::MixedEndpoints {
                    start: graph.table_name(start),
                });
            }
        }
        Self::bundle(graph, start, links.iter().map(Link::field), end)
    }

    /// Creates a step from `start` over foreign key `fields`.
    ///
    /// # Errors
    ///
    /// Same as [`Step::from_links`], plus any field that is not a foreign key.
    pub fn from_fields(graph: &DatabaseGraph, start: TableId, fields: &[FieldId]) -> Result<Self> {
        let links = fields
            .iter()
            .map(|f| {
                graph.foreign_link(*f).copied().ok_or_else(|| Error::NotForeign {
                    field: graph.field_name(*f),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_links(graph, start, &links)
    }

    // fields must all be between start and end
    fn bundle(
        graph: &DatabaseGraph,
        start: TableId,
        fields: impl IntoIterator<Item = FieldId>,
        end: TableId,
    ) -> Result<Self> {
        if start == end {
            return Err(Error::SelfReference {
                table: graph.table_name(start),
            });
        }
        let fields: BTreeMap<FieldId, Direction> = fields
            .into_iter()
            .map(|f| (f, Direction::from_foreign(f.table == start)))
            .collect();
        if fields.is_empty() {
            return Err(Error::EmptyFields);
        }
        Ok(Self {
            from: start,
            to: end,
            fields,
        })
    }

    fn single(start: TableId, field: FieldId, direction: Direction, end: TableId) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field, direction);
        Self {
            from: start,
            to: end,
            fields,
        }
    }

    /// Returns the same step walked from `to` back to `from`.
    pub fn reverse(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
            fields: self
                .fields
                .iter()
                .map(|(f, d)| (*f, d.reverse()))
                .collect(),
        }
    }

    /// Returns the start table.
    #[inline]
    pub fn from(&self) -> TableId {
        self.from
    }

    /// Returns the end table.
    #[inline]
    pub fn to(&self) -> TableId {
        self.to
    }

    /// Returns the crossed fields, in ascending order.
    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.keys().copied()
    }

    /// Returns the crossed fields with their directions.
    #[inline]
    pub fn field_directions(&self) -> &BTreeMap<FieldId, Direction> {
        &self.fields
    }

    /// Returns the number of crossed fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: a step crosses at least one field.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the field if this step crosses exactly one.
    pub fn single_field(&self) -> Option<FieldId> {
        if self.fields.len() == 1 {
            self.fields.keys().next().copied()
        } else {
            None
        }
    }

    /// Splits this step into one step per field, each keeping its direction.
    pub fn single_steps(&self) -> Vec<Step> {
        if self.fields.len() == 1 {
            return vec![self.clone()];
        }
        self.fields
            .iter()
            .map(|(f, d)| Self::single(self.from, *f, *d, self.to))
            .collect()
    }

    /// How `field` is crossed, `None` if it is not part of this step.
    pub fn field_direction(&self, field: FieldId) -> Option<Direction> {
        self.fields.get(&field).copied()
    }

    /// Whether `field` is crossed toward its reference (e.g. going from SITE
    /// to CONTACT with ID_CONTACT_CHEF), `None` if it is not part of this step.
    pub fn is_foreign_field(&self, field: FieldId) -> Option<bool> {
        self.field_direction(field).and_then(Direction::is_foreign)
    }

    /// The direction shared by every field, `Unresolved` if they are mixed.
    pub fn direction(&self) -> Direction {
        let mut dirs = self.fields.values().copied();
        let first = dirs.next().unwrap_or(Direction::Unresolved);
        if dirs.all(|d| d == first) {
            first
        } else {
            Direction::Unresolved
        }
    }

    /// Whether every field is crossed toward its reference, `None` if mixed.
    pub fn is_foreign(&self) -> Option<bool> {
        self.direction().is_foreign()
    }
}

impl PartialEq for Step {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.fields == other.fields
    }
}

impl Eq for Step {}

impl Hash for Step {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.fields.hash(state);
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step from: #{} to: #{} {{", self.from, self.to)?;
        for (i, (field, dir)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", field, dir)?;
        }
        f.write_str("}")
    }
}
