use crate::distance::{forest_distance, ForestDistance, TreeDistance};
use crate::{Cost, Edit, Tree};
use arrayvec::ArrayVec;
use itertools::Itertools;
use tracing::trace;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Step {
    Insert,
    Delete,
    Replace,
}

/// The alignment of a pair of subtrees, consumed from the right.
#[derive(Debug)]
struct Frame {
    roots: (usize, usize),
    a: usize,
    b: usize,
    forest: ForestDistance,
}

/// Recovers a sequence of [Edit]s consistent with a completed [TreeDistance].
///
/// Forest tables are not kept around after the distance is known. Each frame of the walk
/// recomputes the one table it needs and drops it once its subtrees are aligned.
pub(crate) struct Backtracker<'e, 't, L> {
    t1: &'t Tree<L>,
    t2: &'t Tree<L>,
    tree_dist: &'e mut TreeDistance,
    peak: (usize, usize),
}

impl<'e, 't, L: PartialEq> Backtracker<'e, 't, L> {
    pub(crate) fn new(t1: &'t Tree<L>, t2: &'t Tree<L>, tree_dist: &'e mut TreeDistance) -> Self {
        Backtracker {
            t1,
            t2,
            tree_dist,
            peak: (0, 0),
        }
    }

    /// The most frames the last walk held at once, and the most forest cells they held.
    pub(crate) fn peak(&self) -> (usize, usize) {
        self.peak
    }

    fn frame(&mut self, i: usize, j: usize) -> Frame {
        let forest = forest_distance(self.t1, self.t2, i, j, self.tree_dist);
        let (a, b) = forest.size();
        Frame {
            roots: (i, j),
            a,
            b,
            forest,
        }
    }

    /// Walks back from the roots of both trees.
    ///
    /// Edits come out in the order they are found, from the roots towards the leaves and from
    /// right to left.
    pub(crate) fn run(&mut self) -> Vec<Edit<'t, L>> {
        let mut edits = Vec::new();
        let root = self.frame(self.t1.root().id, self.t2.root().id);
        let mut cells = root.forest.cells();
        let mut stack = vec![root];
        self.peak = (1, cells);

        while let Some(frame) = stack.last_mut() {
            let (roots, a, b) = (frame.roots, frame.a, frame.b);

            if a == 0 && b == 0 {
                cells -= frame.forest.cells();
                stack.pop();
                continue;
            }

            let f = &frame.forest;
            let (lo1, lo2) = f.offsets();
            let (l1, l2) = (
                self.t1.leftmost_leaf(roots.0).id,
                self.t2.leftmost_leaf(roots.1).id,
            );

            let mut candidates = ArrayVec::<_, 3>::new();

            if a > 0 {
                candidates.push((Step::Insert, f.get(a - 1, b) + Cost::UNIT));
            }

            if b > 0 {
                candidates.push((Step::Delete, f.get(a, b - 1) + Cost::UNIT));
            }

            // Set when both nodes are whole subtrees nested inside the current window.
            let mut nested = None;

            if a > 0 && b > 0 {
                let x = self.t1.at_rank(lo1 + a - 1);
                let y = self.t2.at_rank(lo2 + b - 1);
                let lx = self.t1.leftmost_leaf(x.id).id;
                let ly = self.t2.leftmost_leaf(y.id).id;

                let cost = if lx == l1 && ly == l2 {
                    f.get(a - 1, b - 1) + Cost::relabel(x.label, y.label)
                } else {
                    let (p, q) = (self.t1.rank(lx) - lo1, self.t2.rank(ly) - lo2);
                    nested = Some((x.id, y.id, p, q));
                    f.get(p, q) + self.tree_dist.get(x.id, y.id)
                };

                candidates.push((Step::Replace, cost));
            }

            // Ties go to the earliest candidate.
            let (step, cost) = match candidates.iter().position_min_by_key(|&&(_, c)| c) {
                Some(k) => candidates[k],
                None => unreachable!("a frame with nothing left to align"),
            };

            debug_assert_eq!(cost, f.get(a, b));
            trace!(?step, a, b, %cost, "backtrack");

            match step {
                Step::Insert => {
                    edits.push(Edit::Insert(self.t1.at_rank(lo1 + a - 1).label));
                    frame.a -= 1;
                }

                Step::Delete => {
                    edits.push(Edit::Delete(self.t2.at_rank(lo2 + b - 1).label));
                    frame.b -= 1;
                }

                Step::Replace => match nested {
                    None => {
                        let x = self.t1.at_rank(lo1 + a - 1);
                        let y = self.t2.at_rank(lo2 + b - 1);
                        if x.label != y.label {
                            edits.push(Edit::Replace(x.label, y.label));
                        }
                        frame.a -= 1;
                        frame.b -= 1;
                    }

                    Some((i, j, p, q)) => {
                        frame.a = p;
                        frame.b = q;
                        let inner = self.frame(i, j);
                        cells += inner.forest.cells();
                        stack.push(inner);
                        self.peak = (self.peak.0.max(stack.len()), self.peak.1.max(cells));
                    }
                },
            }
        }

        edits
    }
}
