use std::fmt::{self, Display, Formatter};

/// A single operation that takes the left-hand [Tree][crate::Tree] towards the right-hand one.
///
/// Names follow the `OPERATION` lines of the command-line tool rather than the effect on the
/// left-hand tree: an [Edit::Insert] names a left-hand node that has no counterpart.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Edit<'t, L> {
    /// A node of the left-hand tree is dropped.
    Insert(&'t L),

    /// A node of the right-hand tree is added.
    Delete(&'t L),

    /// A node of the left-hand tree is relabeled as its counterpart in the right-hand tree.
    ///
    /// Only emitted when the labels differ.
    Replace(&'t L, &'t L),
}

impl<'t, L> Edit<'t, L> {
    /// The name of this operation, as rendered in `OPERATION` lines.
    pub fn name(&self) -> &'static str {
        match self {
            Edit::Insert(_) => "INSERT",
            Edit::Delete(_) => "DELETE",
            Edit::Replace(..) => "REPLACE",
        }
    }

    /// The label on the left-hand side, if any.
    pub fn left(&self) -> Option<&'t L> {
        match *self {
            Edit::Insert(l) | Edit::Replace(l, _) => Some(l),
            Edit::Delete(_) => None,
        }
    }

    /// The label on the right-hand side, if any.
    pub fn right(&self) -> Option<&'t L> {
        match *self {
            Edit::Delete(r) | Edit::Replace(_, r) => Some(r),
            Edit::Insert(_) => None,
        }
    }
}

struct Label<'a, L>(Option<&'a L>);

impl<L: Display> Display for Label<'_, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(l) => l.fmt(f),
            None => f.write_str("NULL"),
        }
    }
}

/// Renders `<name>\t<left>\t<right>`, with `NULL` standing in for a missing side.
impl<L: Display> Display for Edit<'_, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.name(),
            Label(self.left()),
            Label(self.right())
        )
    }
}
