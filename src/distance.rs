use crate::{Cost, Tree};
use pathfinding::matrix::Matrix;
use tracing::trace;

/// Distances between whole subtrees, indexed by node id.
///
/// Each cell is written once, by the key-root pair whose forest window aligns both subtrees in
/// full, and is only read afterwards.
#[derive(Debug, Clone)]
pub(crate) struct TreeDistance(Matrix<Option<Cost>>);

impl TreeDistance {
    pub(crate) fn new(rows: usize, columns: usize) -> Self {
        TreeDistance(Matrix::new(rows, columns, None))
    }

    /// # Panics
    ///
    /// If the distance between `i` and `j` has not been computed yet.
    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> Cost {
        match self.0[(i, j)] {
            Some(c) => c,
            None => panic!("distance between subtrees {i} and {j} read before it was computed"),
        }
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, c: Cost) {
        let old = self.0[(i, j)].replace(c);
        debug_assert!(
            old.map_or(true, |o| o == c),
            "distance between subtrees {i} and {j} rewritten from {old:?} to {c}"
        );
    }
}

/// The forest distances computed for a single pair of key-roots.
///
/// Row `a` and column `b` hold the distance between the first `a` nodes of the left-hand window
/// and the first `b` nodes of the right-hand one, counting in postorder from the key-roots'
/// leftmost leaves.
#[derive(Debug, Clone)]
pub(crate) struct ForestDistance {
    offsets: (usize, usize),
    table: Matrix<Cost>,
}

impl ForestDistance {
    /// The postorder ranks of the leftmost leaves that open both windows.
    #[inline]
    pub(crate) fn offsets(&self) -> (usize, usize) {
        self.offsets
    }

    /// The number of nodes in each window.
    #[inline]
    pub(crate) fn size(&self) -> (usize, usize) {
        (self.table.rows - 1, self.table.columns - 1)
    }

    #[inline]
    pub(crate) fn cells(&self) -> usize {
        self.table.rows * self.table.columns
    }

    #[inline]
    pub(crate) fn get(&self, a: usize, b: usize) -> Cost {
        self.table[(a, b)]
    }
}

/// Runs the forest-distance program for the subtrees rooted at `k1` of `t1` and `k2` of `t2`.
///
/// Distances between subtrees that the window aligns in full are recorded in `tree_dist`, every
/// other subtree pair must have been recorded by a key-root pair of smaller postorder rank. Once
/// `tree_dist` is complete, any pair of nodes may be passed in, not just key-roots.
pub(crate) fn forest_distance<L: PartialEq>(
    t1: &Tree<L>,
    t2: &Tree<L>,
    k1: usize,
    k2: usize,
    tree_dist: &mut TreeDistance,
) -> ForestDistance {
    let l1 = t1.leftmost_leaf(k1).id;
    let l2 = t2.leftmost_leaf(k2).id;
    let (lo1, lo2) = (t1.rank(l1), t2.rank(l2));
    let m = t1.rank(k1) - lo1 + 1;
    let n = t2.rank(k2) - lo2 + 1;

    trace!(k1, k2, m, n, "forest distance");

    let mut f = Matrix::new(m + 1, n + 1, Cost::ZERO);

    for a in 1..=m {
        f[(a, 0)] = f[(a - 1, 0)] + Cost::UNIT;
    }

    for b in 1..=n {
        f[(0, b)] = f[(0, b - 1)] + Cost::UNIT;
    }

    for a in 1..=m {
        let x = t1.at_rank(lo1 + a - 1);
        let lx = t1.leftmost_leaf(x.id).id;

        for b in 1..=n {
            let y = t2.at_rank(lo2 + b - 1);
            let ly = t2.leftmost_leaf(y.id).id;

            let insert = f[(a - 1, b)] + Cost::UNIT;
            let delete = f[(a, b - 1)] + Cost::UNIT;

            f[(a, b)] = if lx == l1 && ly == l2 {
                let replace = f[(a - 1, b - 1)] + Cost::relabel(x.label, y.label);
                let d = insert.min(delete).min(replace);
                tree_dist.set(x.id, y.id, d);
                d
            } else {
                let (p, q) = (t1.rank(lx) - lo1, t2.rank(ly) - lo2);
                let replace = f[(p, q)] + tree_dist.get(x.id, y.id);
                insert.min(delete).min(replace)
            };
        }
    }

    ForestDistance {
        offsets: (lo1, lo2),
        table: f,
    }
}
