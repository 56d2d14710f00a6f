//! The binomial forest backing [`PHeap`](super::PHeap).
//!
//! A binomial tree of rank `r` holds exactly `2^r` entries: its root has
//! `r` children of ranks `r-1, r-2, …, 0`, kept as a first-child /
//! next-sibling chain in decreasing rank order:
//!
//! ```text
//!       A           A
//!     / | \        /
//!   B   F  H      B--F--H
//!  / \  |        /   |
//! C   D G       C--D G
//! |             |
//! E             E
//! ```
//!
//! The forest is a linked list of `(rank, tree)` entries in strictly
//! increasing rank, so pushing a tree carries like binary addition and a
//! heap of `n` entries keeps O(log n) trees.
//!
//! Everything here is persistent: nodes are shared through [`Rc`], and
//! rebuilding a root clones only its key and value while the subtrees stay
//! shared. The ordering polarity is threaded through as a type parameter.

use std::rc::Rc;

use super::Polarity;

pub(crate) struct Tree<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) child: Option<Rc<Tree<K, V>>>,
    pub(crate) sibling: Option<Rc<Tree<K, V>>>,
}

pub(crate) struct Forest<K, V> {
    pub(crate) order: usize,
    pub(crate) tree: Rc<Tree<K, V>>,
    pub(crate) next: Option<Rc<Forest<K, V>>>,
}

/// A rank-0 tree holding a single entry.
pub(crate) fn singleton<K, V>(key: K, value: V) -> Rc<Tree<K, V>> {
    Rc::new(Tree {
        key,
        value,
        child: None,
        sibling: None,
    })
}

/// Links two trees of equal rank: the root whose key wins under `P`
/// becomes the parent and the other root becomes its first (highest-rank)
/// child. Either root may win a tie.
fn merge_trees<K, V, P>(a: &Rc<Tree<K, V>>, b: &Rc<Tree<K, V>>) -> Rc<Tree<K, V>>
where
    K: Ord + Clone,
    V: Clone,
    P: Polarity,
{
    let (winner, loser) = if P::wins(&b.key, &a.key) { (b, a) } else { (a, b) };
    let demoted = Rc::new(Tree {
        key: loser.key.clone(),
        value: loser.value.clone(),
        child: loser.child.clone(),
        sibling: winner.child.clone(),
    });
    Rc::new(Tree {
        key: winner.key.clone(),
        value: winner.value.clone(),
        child: Some(demoted),
        sibling: None,
    })
}

/// Inserts a `(rank, tree)` entry into a rank-sorted forest. A rank
/// collision merges the two trees and carries the result one rank up, so
/// the strictly-increasing-rank invariant is restored on the way out.
pub(crate) fn push<K, V, P>(
    forest: &Option<Rc<Forest<K, V>>>,
    order: usize,
    tree: Rc<Tree<K, V>>,
) -> Rc<Forest<K, V>>
where
    K: Ord + Clone,
    V: Clone,
    P: Polarity,
{
    match forest {
        None => Rc::new(Forest {
            order,
            tree,
            next: None,
        }),
        Some(head) => {
            if order < head.order {
                Rc::new(Forest {
                    order,
                    tree,
                    next: Some(head.clone()),
                })
            } else if order > head.order {
                Rc::new(Forest {
                    order: head.order,
                    tree: head.tree.clone(),
                    next: Some(push::<K, V, P>(&head.next, order, tree)),
                })
            } else {
                push::<K, V, P>(
                    &head.next,
                    order + 1,
                    merge_trees::<K, V, P>(&head.tree, &tree),
                )
            }
        }
    }
}

/// Merges two rank-sorted forests like binary addition with carry.
pub(crate) fn merge<K, V, P>(
    a: &Option<Rc<Forest<K, V>>>,
    b: &Option<Rc<Forest<K, V>>>,
) -> Option<Rc<Forest<K, V>>>
where
    K: Ord + Clone,
    V: Clone,
    P: Polarity,
{
    match (a, b) {
        (None, _) => b.clone(),
        (_, None) => a.clone(),
        (Some(x), Some(y)) => {
            if x.order < y.order {
                Some(Rc::new(Forest {
                    order: x.order,
                    tree: x.tree.clone(),
                    next: merge::<K, V, P>(&x.next, b),
                }))
            } else if x.order > y.order {
                Some(Rc::new(Forest {
                    order: y.order,
                    tree: y.tree.clone(),
                    next: merge::<K, V, P>(&y.next, a),
                }))
            } else {
                let rest = merge::<K, V, P>(&x.next, &y.next);
                Some(push::<K, V, P>(
                    &rest,
                    x.order + 1,
                    merge_trees::<K, V, P>(&x.tree, &y.tree),
                ))
            }
        }
    }
}

/// Removes the winning root from the forest. Returns that root's key and
/// value, the not-yet-repushed tail of its child chain as `(rank, chain)`,
/// and the forest without the removed entry. Children of rank at or above
/// the removed entry's position in the list are already pushed back;
/// [`pop`] unwinds the rest.
fn pop_branch<K, V, P>(
    forest: &Rc<Forest<K, V>>,
) -> (
    isize,
    Option<Rc<Tree<K, V>>>,
    K,
    V,
    Option<Rc<Forest<K, V>>>,
)
where
    K: Ord + Clone,
    V: Clone,
    P: Polarity,
{
    let root = &forest.tree;
    match &forest.next {
        None => (
            forest.order as isize - 1,
            root.child.clone(),
            root.key.clone(),
            root.value.clone(),
            None,
        ),
        Some(next) => {
            let (mut order, mut branch, key, value, mut rest) = pop_branch::<K, V, P>(next);
            if P::wins(&root.key, &key) {
                return (
                    forest.order as isize - 1,
                    root.child.clone(),
                    root.key.clone(),
                    root.value.clone(),
                    forest.next.clone(),
                );
            }
            while order >= forest.order as isize {
                let node = branch.expect("invariant violated: binomial child chain too short");
                let tree = Rc::new(Tree {
                    key: node.key.clone(),
                    value: node.value.clone(),
                    child: node.child.clone(),
                    sibling: None,
                });
                rest = Some(push::<K, V, P>(&rest, order as usize, tree));
                branch = node.sibling.clone();
                order -= 1;
            }
            (
                order,
                branch,
                key,
                value,
                Some(push::<K, V, P>(&rest, forest.order, root.clone())),
            )
        }
    }
}

/// Removes the winning root under `P` and merges its children back in.
pub(crate) fn pop<K, V, P>(forest: &Rc<Forest<K, V>>) -> (K, V, Option<Rc<Forest<K, V>>>)
where
    K: Ord + Clone,
    V: Clone,
    P: Polarity,
{
    let (mut order, mut branch, key, value, mut rest) = pop_branch::<K, V, P>(forest);
    while let Some(node) = branch {
        let tree = Rc::new(Tree {
            key: node.key.clone(),
            value: node.value.clone(),
            child: node.child.clone(),
            sibling: None,
        });
        rest = Some(push::<K, V, P>(&rest, order as usize, tree));
        branch = node.sibling.clone();
        order -= 1;
    }
    (key, value, rest)
}

/// Panics unless the forest invariants hold: strictly increasing ranks, a
/// well-formed binomial shape for every tree, and the heap property under
/// `P` on every edge. Returns the total entry count.
pub(crate) fn check<K, V, P>(forest: &Option<Rc<Forest<K, V>>>) -> usize
where
    K: Ord,
    P: Polarity,
{
    let mut count = 0;
    let mut last_order: Option<usize> = None;
    let mut cursor = forest;
    while let Some(entry) = cursor {
        if let Some(last) = last_order {
            assert!(entry.order > last, "forest ranks must strictly increase");
        }
        assert!(
            entry.tree.sibling.is_none(),
            "a forest root must not have siblings"
        );
        count += check_tree::<K, V, P>(&entry.tree, entry.order);
        last_order = Some(entry.order);
        cursor = &entry.next;
    }
    count
}

fn check_tree<K, V, P>(tree: &Rc<Tree<K, V>>, order: usize) -> usize
where
    K: Ord,
    P: Polarity,
{
    let mut expected = order as isize - 1;
    let mut cursor = &tree.child;
    let mut count = 1;
    while let Some(child) = cursor {
        assert!(expected >= 0, "binomial child chain too long");
        assert!(
            !P::wins(&child.key, &tree.key),
            "heap property violated between parent and child"
        );
        count += check_tree::<K, V, P>(child, expected as usize);
        expected -= 1;
        cursor = &child.sibling;
    }
    assert_eq!(expected, -1, "binomial child chain too short");
    assert_eq!(count, 1usize << order, "binomial tree has the wrong size");
    count
}
