//! Self-referential variants through `#[recursive]` alternatives.

use std::cell::Cell;
use std::mem;

use sumvar::{Recursive, Variant, Visit, VisitMut, Visitor};

thread_local! {
    static LIVE: Cell<isize> = Cell::new(0);
}

fn live() -> isize {
    LIVE.with(Cell::get)
}

/// Tracks how many tree parts exist.
#[derive(Debug)]
struct Live;

impl Live {
    fn new() -> Self {
        LIVE.with(|n| n.set(n.get() + 1));
        Live
    }
}

impl Clone for Live {
    fn clone(&self) -> Self {
        Live::new()
    }
}

impl Drop for Live {
    fn drop(&mut self) {
        LIVE.with(|n| n.set(n.get() - 1));
    }
}

#[derive(Debug, Clone)]
struct Leaf {
    value: i64,
    _live: Live,
}

#[derive(Debug, Clone)]
struct Node {
    children: Vec<Tree>,
    _live: Live,
}

type Tree = Variant![Leaf, #[recursive] Node];

fn leaf(value: i64) -> Tree {
    Tree::new(Leaf {
        value,
        _live: Live::new(),
    })
}

fn node(children: Vec<Tree>) -> Tree {
    Tree::new(Node {
        children,
        _live: Live::new(),
    })
}

/// `[1, [2, 3], [[4]]]`: four leaves, four nodes.
fn sample() -> Tree {
    node(vec![
        leaf(1),
        node(vec![leaf(2), leaf(3)]),
        node(vec![node(vec![leaf(4)])]),
    ])
}

struct Sum;

impl Visitor for Sum {
    type Output = i64;
}

impl Visit<Leaf> for Sum {
    fn visit(&mut self, leaf: &Leaf) -> i64 {
        leaf.value
    }
}

impl Visit<Node> for Sum {
    fn visit(&mut self, node: &Node) -> i64 {
        node.children.iter().map(|child| child.visit(&mut *self)).sum()
    }
}

struct Double;

impl Visitor for Double {
    type Output = ();
}

impl VisitMut<Leaf> for Double {
    fn visit_mut(&mut self, leaf: &mut Leaf) {
        leaf.value *= 2;
    }
}

impl VisitMut<Node> for Double {
    fn visit_mut(&mut self, node: &mut Node) {
        for child in &mut node.children {
            child.visit_mut(&mut *self);
        }
    }
}

#[test]
fn test_recursive_alternative_is_one_pointer() {
    assert_eq!(
        mem::size_of::<Recursive<Node>>(),
        mem::size_of::<usize>()
    );
    assert!(mem::size_of::<Tree>() <= mem::size_of::<Leaf>() + mem::size_of::<usize>());
}

#[test]
fn test_tree_copy_is_deep_and_independent() {
    let original = sample();
    assert_eq!(live(), 8);
    assert_eq!(original.visit(Sum), 10);

    let mut copy = original.clone();
    assert_eq!(live(), 16);

    copy.visit_mut(Double);
    assert_eq!(copy.visit(Sum), 20);
    assert_eq!(original.visit(Sum), 10);

    drop(copy);
    assert_eq!(live(), 8);
    drop(original);
    assert_eq!(live(), 0);
}

#[test]
fn test_accessors_present_the_unboxed_alternative() {
    let mut tree = sample();
    let root: &Node = tree.get::<Node, _>().unwrap();
    assert_eq!(root.children.len(), 3);
    assert!(root.children[0].is::<Leaf, _>());

    tree.get_mut::<Node, _>().unwrap().children.push(leaf(5));
    assert_eq!(tree.visit(Sum), 15);

    let owned: Node = tree.into_inner::<Node, _>().unwrap();
    assert_eq!(owned.children.len(), 4);
    drop(owned);
    assert_eq!(live(), 0);
}

#[test]
fn test_replacing_a_subtree_releases_it() {
    let mut tree = sample();
    assert_eq!(live(), 8);

    // `[[4]]` holds two nodes and a leaf.
    let root = tree.get_mut::<Node, _>().unwrap();
    root.children[2].set(Leaf {
        value: 40,
        _live: Live::new(),
    });
    assert_eq!(live(), 6);
    assert_eq!(tree.visit(Sum), 46);

    tree.assign_variant(&leaf(0));
    assert_eq!(live(), 1);
    drop(tree);
    assert_eq!(live(), 0);
}

#[test]
fn test_swapping_subtrees() {
    let mut tree = sample();
    let root = tree.get_mut::<Node, _>().unwrap();
    let (first, rest) = root.children.split_at_mut(1);
    first[0].swap(&mut rest[0]);

    assert!(root.children[0].is::<Node, _>());
    assert_eq!(root.children[1].get::<Leaf, _>().map(|l| l.value), Some(1));
    assert_eq!(tree.visit(Sum), 10);
    drop(tree);
    assert_eq!(live(), 0);
}

#[test]
fn test_consuming_visit_unwraps_the_box() {
    struct Count;

    impl Visitor for Count {
        type Output = usize;
    }

    impl sumvar::VisitOnce<Leaf> for Count {
        fn visit_once(self, _: Leaf) -> usize {
            1
        }
    }

    impl sumvar::VisitOnce<Node> for Count {
        fn visit_once(self, node: Node) -> usize {
            node.children.into_iter().map(|child| child.into_visit(Count)).sum()
        }
    }

    assert_eq!(sample().into_visit(Count), 4);
    assert_eq!(live(), 0);
}
