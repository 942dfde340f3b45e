//! A chain of steps starting at a given table.

use crate::database::DatabaseGraph;
use crate::step::Step;
use core::fmt;
use core::ops::Range;
use vista_core::{Error, Result, TableId};

/// An immutable sequence of steps where each step starts where the previous
/// one ended.
///
/// The empty path designates its start table itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    from: TableId,
    steps: Vec<Step>,
}

impl Path {
    /// Creates the empty path at `from`.
    pub fn new(from: TableId) -> Self {
        Self {
            from,
            steps: Vec::new(),
        }
    }

    /// Creates a path from `from` through `steps`.
    ///
    /// # Errors
    ///
    /// Fails with `BrokenPath` if two consecutive steps do not chain.
    pub fn from_steps(from: TableId, steps: impl IntoIterator<Item = Step>) -> Result<Self> {
        let mut path = Self::new(from);
        for step in steps {
            path.push(step)?;
        }
        Ok(path)
    }

    /// Creates a path through the tables in `tables`, each hop bundling every
    /// field between two consecutive tables.
    ///
    /// # Errors
    ///
    /// Fails with `EmptyPath` if `tables` is empty, or with the error of the
    /// first hop that can't be built.
    pub fn between(graph: &DatabaseGraph, tables: &[TableId]) -> Result<Self> {
        let (&first, rest) = tables.split_first().ok_or(Error::EmptyPath)?;
        let mut path = Self::new(first);
        let mut current = first;
        for &next in rest {
            path.push(Step::between(graph, current, next)?)?;
            current = next;
        }
        Ok(path)
    }

    /// Appends `step` to this path.
    pub fn push(&mut self, step: Step) -> Result<()> {
        if step.from() != self.to() {
            return Err(broken(self.to(), step.from()));
        }
        self.steps.push(step);
        Ok(())
    }

    /// Returns a new path extended by `step`.
    pub fn with_step(&self, step: Step) -> Result<Self> {
        let mut path = self.clone();
        path.push(step)?;
        Ok(path)
    }

    /// Returns this path followed by `other`.
    pub fn append(&self, other: &Path) -> Result<Self> {
        if other.from != self.to() {
            return Err(broken(self.to(), other.from));
        }
        let mut path = self.clone();
        path.steps.extend(other.steps.iter().cloned());
        Ok(path)
    }

    /// Returns the same path walked from its end back to its start.
    pub fn reverse(&self) -> Self {
        Self {
            from: self.to(),
            steps: self.steps.iter().rev().map(Step::reverse).collect(),
        }
    }

    /// Returns the start table.
    #[inline]
    pub fn from(&self) -> TableId {
        self.from
    }

    /// Returns the end table.
    pub fn to(&self) -> TableId {
        self.steps.last().map(Step::to).unwrap_or(self.from)
    }

    /// Returns the steps.
    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Returns the step at `index`.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Returns the last step.
    pub fn last_step(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Returns the number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if this path has no step.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns every table visited, start and end included.
    pub fn tables(&self) -> Vec<TableId> {
        core::iter::once(self.from)
            .chain(self.steps.iter().map(Step::to))
            .collect()
    }

    /// Whether `prefix` is the beginning of this path.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.from == prefix.from && self.steps.starts_with(&prefix.steps)
    }

    /// Returns the path made of the steps in `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn sub_path(&self, range: Range<usize>) -> Self {
        let from = if range.start == 0 {
            self.from
        } else {
            self.steps[range.start - 1].to()
        };
        Self {
            from,
            steps: self.steps[range].to_vec(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path #{}", self.from)?;
        for step in &self.steps {
            write!(f, " -> #{}", step.to())?;
        }
        Ok(())
    }
}

fn broken(from: TableId, to: TableId) -> Error {
    Error::BrokenPath {
        from: format!("#{}", from),
        to: format!("#{}", to),
    }
}
