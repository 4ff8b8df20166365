use thiserror::Error;

/// Reasons why a parent array fails to encode a single tree.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum TreeError {
    /// The parent and label arrays disagree on the number of nodes.
    #[error("{parents} parent ids but {labels} labels")]
    DimensionMismatch {
        /// Length of the parent array.
        parents: usize,
        /// Length of the label array.
        labels: usize,
    },

    /// No node lacks a parent.
    #[error("no root node")]
    MissingRoot,

    /// More than one node lacks a parent.
    #[error("nodes {first} and {second} are both roots")]
    MultipleRoots {
        /// The first root found.
        first: usize,
        /// The second root found.
        second: usize,
    },

    /// A node names a parent that does not exist.
    #[error("node {node} has parent {parent}, which is out of range")]
    DanglingParent {
        /// The offending node.
        node: usize,
        /// The parent id it names.
        parent: usize,
    },

    /// A node cannot be reached from the root, which happens when it sits on a cycle.
    #[error("node {node} is not reachable from the root")]
    Disconnected {
        /// The first unreachable node.
        node: usize,
    },
}

/// A borrowed view of a single node of a [Tree].
#[derive(Debug, Eq, PartialEq, Hash)]
pub struct Node<'t, L> {
    /// Index of this node in the arrays the [Tree] was built from.
    pub id: usize,

    /// The id of this node's parent, unless it's the root.
    pub parent: Option<usize>,

    /// This node's label.
    pub label: &'t L,
}

impl<L> Clone for Node<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L> Copy for Node<'_, L> {}

/// An immutable ordered tree, as produced by a dependency parser.
///
/// Nodes are identified by their index in the arrays the tree was built from. Children are
/// ordered by id, so the _leftmost_ child of a node is the one that appears first in the input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tree<L> {
    labels: Box<[L]>,
    parents: Box<[Option<usize>]>,
    children: Box<[Vec<usize>]>,
    root: usize,
    postorder: Box<[usize]>,
    ranks: Box<[usize]>,
    leftmost: Box<[usize]>,
}

impl<L> Tree<L> {
    /// Builds a [Tree] from a parent array and a parallel label array.
    ///
    /// `parents[i]` is the id of node `i`'s parent, or `None` for the root. Exactly one root is
    /// expected and every other node must be reachable from it.
    pub fn build(parents: &[Option<usize>], labels: Vec<L>) -> Result<Self, TreeError> {
        let n = parents.len();
        if labels.len() != n {
            return Err(TreeError::DimensionMismatch {
                parents: n,
                labels: labels.len(),
            });
        }

        let mut children = vec![Vec::new(); n];
        let mut root = None;

        for (node, &parent) in parents.iter().enumerate() {
            match (parent, root) {
                (Some(parent), _) if parent >= n => {
                    return Err(TreeError::DanglingParent { node, parent })
                }
                (Some(parent), _) => children[parent].push(node),
                (None, None) => root = Some(node),
                (None, Some(first)) => {
                    return Err(TreeError::MultipleRoots {
                        first,
                        second: node,
                    })
                }
            }
        }

        let root = root.ok_or(TreeError::MissingRoot)?;
        let postorder = postorder(root, &children);

        if postorder.len() != n {
            let mut seen = vec![false; n];
            postorder.iter().for_each(|&i| seen[i] = true);
            let node = seen.iter().position(|&s| !s).unwrap_or(root);
            return Err(TreeError::Disconnected { node });
        }

        let mut ranks = vec![0; n];
        let mut leftmost = vec![0; n];
        for (rank, &node) in postorder.iter().enumerate() {
            ranks[node] = rank;
            // Children are ranked before their parent, so the first child is already resolved.
            leftmost[node] = children[node].first().map_or(node, |&c| leftmost[c]);
        }

        Ok(Tree {
            labels: labels.into(),
            parents: parents.into(),
            children: children.into(),
            root,
            postorder: postorder.into(),
            ranks: ranks.into(),
            leftmost: leftmost.into(),
        })
    }

    /// The number of nodes in this [Tree], which is never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false`, a [Tree] has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// If `id` is out of range.
    #[inline]
    pub fn node(&self, id: usize) -> Node<'_, L> {
        Node {
            id,
            parent: self.parents[id],
            label: &self.labels[id],
        }
    }

    /// Iterates over all nodes by id.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_, L>> + '_ {
        (0..self.len()).map(move |id| self.node(id))
    }

    /// The only node without a parent.
    #[inline]
    pub fn root(&self) -> Node<'_, L> {
        self.node(self.root)
    }

    /// The ids of the children of `id`, in order.
    #[inline]
    pub fn children(&self, id: usize) -> &[usize] {
        &self.children[id]
    }

    /// Node ids in left-to-right postorder, i.e. `postorder()[k]` is the node ranked `k`.
    #[inline]
    pub fn postorder(&self) -> &[usize] {
        &self.postorder
    }

    /// The postorder rank of `id`.
    #[inline]
    pub fn rank(&self, id: usize) -> usize {
        self.ranks[id]
    }

    /// The node ranked `rank` in postorder.
    #[inline]
    pub fn at_rank(&self, rank: usize) -> Node<'_, L> {
        self.node(self.postorder[rank])
    }

    /// The leaf reached from `id` by repeatedly descending into the first child.
    #[inline]
    pub fn leftmost_leaf(&self, id: usize) -> Node<'_, L> {
        self.node(self.leftmost[id])
    }

    /// The _key-roots_ of this [Tree] in increasing postorder rank.
    ///
    /// A key-root is either the root or a node whose leftmost leaf differs from its parent's.
    pub fn key_roots(&self) -> impl Iterator<Item = Node<'_, L>> + '_ {
        self.postorder
            .iter()
            .map(move |&id| self.node(id))
            .filter(move |n| match n.parent {
                None => true,
                Some(p) => self.leftmost[n.id] != self.leftmost[p],
            })
    }
}

/// Left-to-right postorder from `root`, without recursion.
fn postorder(root: usize, children: &[Vec<usize>]) -> Vec<usize> {
    let mut order = Vec::with_capacity(children.len());
    let mut stack = vec![(root, 0)];

    while let Some((node, next)) = stack.pop() {
        match children[node].get(next) {
            Some(&child) => {
                stack.push((node, next + 1));
                stack.push((child, 0));
            }
            None => order.push(node),
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::{collection::vec, prelude::*, sample::Index};
    use test_strategy::{proptest, Arbitrary};

    /// A label drawn from a tiny alphabet, so that equal labels are common.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Arbitrary)]
    pub(crate) enum Label {
        A,
        B,
        C,
    }

    /// The maximum number of nodes of an arbitrary [Tree].
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct Size(pub usize);

    impl Default for Size {
        fn default() -> Self {
            Size(12)
        }
    }

    /// Converts a parent array that uses `-1` for the root.
    pub(crate) fn parents(p: &[isize]) -> Vec<Option<usize>> {
        p.iter().map(|&p| usize::try_from(p).ok()).collect()
    }

    fn tree<L: 'static + Arbitrary>(Size(max): Size) -> impl Strategy<Value = Tree<L>> {
        (1..=max).prop_flat_map(|n| {
            let attach = vec(any::<Index>(), n - 1);
            let ids = Just((0..n).collect::<Vec<_>>()).prop_shuffle();
            (attach, ids, vec(any::<L>(), n)).prop_map(move |(attach, ids, labels)| {
                // The k-th generated node hangs off one of the nodes generated before it, ids are
                // shuffled so that the root is not always node 0.
                let mut parents = vec![None; n];
                for (k, a) in attach.iter().enumerate() {
                    parents[ids[k + 1]] = Some(ids[a.index(k + 1)]);
                }
                Tree::build(&parents, labels).unwrap()
            })
        })
    }

    impl<L: 'static + Arbitrary> Arbitrary for Tree<L> {
        type Parameters = Size;
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(size: Size) -> Self::Strategy {
            tree(size).boxed()
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn ids<'t, L: 't>(nodes: impl Iterator<Item = Node<'t, L>>) -> Vec<usize> {
        nodes.map(|n| n.id).collect()
    }

    #[test]
    fn postorder_visits_children_left_to_right_before_parents() {
        let t = Tree::build(&parents(&[3, 3, 5, 2, 5, -1]), chars("abcdef")).unwrap();
        assert_eq!(t.postorder(), &[0, 1, 3, 2, 4, 5]);
        assert_eq!(t.rank(3), 2);
        assert_eq!(t.at_rank(3).label, &'c');
    }

    #[test]
    fn leftmost_leaf_descends_through_first_children() {
        let t = Tree::build(&parents(&[3, 2, 3, 5, 5, -1]), chars("abcdef")).unwrap();
        assert_eq!(t.leftmost_leaf(5).id, 0);
        assert_eq!(t.leftmost_leaf(2).id, 1);
        assert_eq!(t.leftmost_leaf(4).id, 4);
    }

    #[test]
    fn key_roots_are_listed_in_postorder() {
        let t = Tree::build(&parents(&[3, 2, 3, 5, 5, -1]), chars("abcdef")).unwrap();
        assert_eq!(ids(t.key_roots()), [2, 4, 5]);

        let u = Tree::build(&parents(&[3, 3, 5, 2, 5, -1]), chars("abcdef")).unwrap();
        assert_eq!(ids(u.key_roots()), [1, 4, 5]);
    }

    #[test]
    fn a_chain_has_a_single_key_root() {
        let t = Tree::build(&parents(&[-1, 0, 1, 2]), chars("abcd")).unwrap();
        assert_eq!(ids(t.key_roots()), [0]);
        assert_eq!(t.leftmost_leaf(0).id, 3);
    }

    #[test]
    fn a_star_has_a_key_root_per_leaf_but_the_first() {
        let t = Tree::build(&parents(&[1, -1, 1, 1]), chars("abcd")).unwrap();
        assert_eq!(ids(t.key_roots()), [2, 3, 1]);
    }

    #[test]
    fn deep_chains_do_not_exhaust_the_stack() {
        let n: usize = 200_000;
        let p: Vec<_> = (0..n).map(|i| i.checked_sub(1)).collect();
        let t = Tree::build(&p, vec![(); n]).unwrap();
        assert_eq!(t.postorder().first(), Some(&(n - 1)));
        assert_eq!(t.root().id, 0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        assert_matches!(
            Tree::build(&parents(&[-1, 0]), chars("a")),
            Err(TreeError::DimensionMismatch { parents: 2, labels: 1 })
        );
    }

    #[test]
    fn exactly_one_root_is_required() {
        assert_matches!(
            Tree::<char>::build(&[], vec![]),
            Err(TreeError::MissingRoot)
        );
        assert_matches!(
            Tree::build(&parents(&[1, 0]), chars("ab")),
            Err(TreeError::MissingRoot)
        );
        assert_matches!(
            Tree::build(&parents(&[-1, 0, -1]), chars("abc")),
            Err(TreeError::MultipleRoots { first: 0, second: 2 })
        );
    }

    #[test]
    fn parents_must_exist() {
        assert_matches!(
            Tree::build(&parents(&[-1, 7]), chars("ab")),
            Err(TreeError::DanglingParent { node: 1, parent: 7 })
        );
    }

    #[test]
    fn cycles_are_rejected() {
        assert_matches!(
            Tree::build(&parents(&[-1, 2, 1, 0]), chars("abcd")),
            Err(TreeError::Disconnected { node: 1 })
        );
        assert_matches!(
            Tree::build(&parents(&[-1, 1]), chars("ab")),
            Err(TreeError::Disconnected { node: 1 })
        );
    }

    #[proptest]
    fn postorder_is_a_permutation_ending_at_the_root(t: Tree<Label>) {
        let mut sorted = t.postorder().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..t.len()).collect::<Vec<_>>());
        assert_eq!(t.rank(t.root().id), t.len() - 1);
        for (rank, &id) in t.postorder().iter().enumerate() {
            assert_eq!(t.rank(id), rank);
        }
    }

    #[proptest]
    fn descendants_are_ranked_before_their_ancestors(t: Tree<Label>) {
        for n in t.nodes() {
            if let Some(p) = n.parent {
                assert!(t.rank(n.id) < t.rank(p));
            }
        }
    }

    fn is_descendant<L>(t: &Tree<L>, mut d: usize, n: usize) -> bool {
        loop {
            if d == n {
                return true;
            }
            match t.node(d).parent {
                Some(p) => d = p,
                None => return false,
            }
        }
    }

    #[proptest]
    fn subtrees_are_contiguous_in_postorder(t: Tree<Label>) {
        for n in t.nodes() {
            let first = t.rank(t.leftmost_leaf(n.id).id);
            let size = t.nodes().filter(|d| is_descendant(&t, d.id, n.id)).count();
            assert_eq!(t.rank(n.id) - first + 1, size);
            for r in first..=t.rank(n.id) {
                assert!(is_descendant(&t, t.postorder()[r], n.id));
            }
        }
    }

    #[proptest]
    fn leftmost_leaves_are_leaves(t: Tree<Label>) {
        for n in t.nodes() {
            assert!(t.children(t.leftmost_leaf(n.id).id).is_empty());
        }
    }

    #[proptest]
    fn the_root_is_the_last_key_root(t: Tree<Label>) {
        assert_eq!(t.key_roots().last().map(|n| n.id), Some(t.root().id));
    }

    #[proptest]
    fn key_roots_have_distinct_leftmost_leaves(t: Tree<Label>) {
        let mut leaves: Vec<_> = t.key_roots().map(|n| t.leftmost_leaf(n.id).id).collect();
        let leaf_count = t.nodes().filter(|n| t.children(n.id).is_empty()).count();
        leaves.sort_unstable();
        leaves.dedup();
        assert_eq!(leaves.len(), t.key_roots().count());
        assert_eq!(leaves.len(), leaf_count);
    }
}

#[cfg(test)]
pub(crate) use tests::{parents, Label, Size};
