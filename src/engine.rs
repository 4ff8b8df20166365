use crate::backtrack::Backtracker;
use crate::distance::{forest_distance, TreeDistance};
use crate::{Cost, Edit, Tree};
use tracing::debug;

/// Computes the edit distance between two [Tree]s along with the [Edit]s that realize it.
///
/// The left-hand tree is the source and the right-hand tree the target, which only matters for
/// how [Edit]s are named; the distance itself is symmetric.
#[derive(Debug)]
pub struct Engine<'t, L> {
    t1: &'t Tree<L>,
    t2: &'t Tree<L>,
    tree_dist: TreeDistance,
}

impl<'t, L: PartialEq> Engine<'t, L> {
    /// Binds an [Engine] to a pair of [Tree]s.
    pub fn new(t1: &'t Tree<L>, t2: &'t Tree<L>) -> Self {
        Engine {
            t1,
            t2,
            tree_dist: TreeDistance::new(t1.len(), t2.len()),
        }
    }

    /// Fills the distance tables for every pair of key-roots, then backtracks from the roots.
    ///
    /// Memory stays within the subtree distance matrix plus one forest table per pair of
    /// subtrees the backtracking is nested in.
    ///
    /// The [Edit]s are listed in the order the backtracking finds them, that is from the roots
    /// towards the leaves and from right to left, the reverse of a left-to-right edit script.
    /// Relabeling a node with an equal label is free and not listed.
    pub fn calc(mut self) -> (Cost, Box<[Edit<'t, L>]>) {
        let (t1, t2) = (self.t1, self.t2);

        debug!(
            left = t1.len(),
            right = t2.len(),
            left_key_roots = t1.key_roots().count(),
            right_key_roots = t2.key_roots().count(),
            "tree edit distance"
        );

        // Key-roots come in increasing postorder rank, so every subtree distance a window relies
        // on has been recorded by an earlier pair. Only the subtree distances outlive the loop.
        for k1 in t1.key_roots() {
            for k2 in t2.key_roots() {
                forest_distance(t1, t2, k1.id, k2.id, &mut self.tree_dist);
            }
        }

        let distance = self.tree_dist.get(t1.root().id, t2.root().id);

        let mut backtracker = Backtracker::new(t1, t2, &mut self.tree_dist);
        let edits = backtracker.run();
        let (frames, cells) = backtracker.peak();

        debug_assert_eq!(Cost::from(edits.len()), distance);
        debug!(%distance, edits = edits.len(), frames, cells, "done");

        (distance, edits.into())
    }
}

/// Finds the edit distance between two [Tree]s and a lowest cost sequence of [Edit]s that
/// transforms the left-hand side into the right-hand side.
///
/// See [Engine::calc] for the order in which [Edit]s are listed.
pub fn compute<'t, L: PartialEq>(t1: &'t Tree<L>, t2: &'t Tree<L>) -> (Cost, Box<[Edit<'t, L>]>) {
    Engine::new(t1, t2).calc()
}
