//! Visitor dispatch over every alternative of a set.

use std::fmt::Debug;

use sumvar::{Variant, Visit, VisitMut, VisitOnce, Visitor};

type Shape = Variant![u8, #[backup] String, Vec<i32>, #[recursive] Box<u64>];

/// Records which `visit` implementation ran.
#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
}

impl Visitor for Recorder {
    type Output = usize;
}

impl Visit<u8> for Recorder {
    fn visit(&mut self, _: &u8) -> usize {
        self.calls.push("u8");
        0
    }
}

impl Visit<String> for Recorder {
    fn visit(&mut self, _: &String) -> usize {
        self.calls.push("String");
        1
    }
}

impl Visit<Vec<i32>> for Recorder {
    fn visit(&mut self, _: &Vec<i32>) -> usize {
        self.calls.push("Vec");
        2
    }
}

impl Visit<Box<u64>> for Recorder {
    fn visit(&mut self, _: &Box<u64>) -> usize {
        self.calls.push("Box");
        3
    }
}

/// Works for any alternative through one generic impl.
struct Render;

impl Visitor for Render {
    type Output = String;
}

impl<T: Debug> Visit<T> for Render {
    fn visit(&mut self, value: &T) -> String {
        format!("{value:?}")
    }
}

/// Clears whatever alternative is active.
struct Reset;

impl Visitor for Reset {
    type Output = ();
}

impl<T: Default> VisitMut<T> for Reset {
    fn visit_mut(&mut self, value: &mut T) {
        *value = T::default();
    }
}

struct IntoDebug;

impl Visitor for IntoDebug {
    type Output = String;
}

impl<T: Debug> VisitOnce<T> for IntoDebug {
    fn visit_once(self, value: T) -> String {
        format!("owned {value:?}")
    }
}

fn every_shape() -> Vec<Shape> {
    vec![
        Shape::new(7u8),
        Shape::new(String::from("s")),
        Shape::new(vec![1i32, 2]),
        Shape::new(Box::new(9u64)),
    ]
}

#[test]
fn test_exactly_one_implementation_runs() {
    for (index, shape) in every_shape().iter().enumerate() {
        let mut recorder = Recorder::default();
        let returned = shape.visit(&mut recorder);

        assert_eq!(returned, index);
        assert_eq!(recorder.calls.len(), 1);
        assert_eq!(returned, shape.which());
    }
}

#[test]
fn test_dispatch_follows_reassignment() {
    let mut recorder = Recorder::default();
    let mut shape = Shape::new(1u8);

    shape.visit(&mut recorder);
    shape.set(String::from("again"));
    shape.visit(&mut recorder);
    shape.set(String::from("backup slot"));
    shape.visit(&mut recorder);
    shape.set(Box::new(3u64));
    shape.visit(&mut recorder);

    assert_eq!(recorder.calls, ["u8", "String", "String", "Box"]);
}

#[test]
fn test_generic_visitor_renders_the_real_type() {
    let rendered: Vec<String> = every_shape().iter().map(|shape| shape.visit(Render)).collect();
    assert_eq!(rendered, ["7", "\"s\"", "[1, 2]", "9"]);
}

#[test]
fn test_mutable_visit_writes_through() {
    let mut shapes = every_shape();
    for shape in &mut shapes {
        shape.visit_mut(Reset);
    }

    assert_eq!(shapes[0].get::<u8, _>(), Some(&0));
    assert_eq!(shapes[1].get::<String, _>().map(String::len), Some(0));
    assert_eq!(shapes[2].get::<Vec<i32>, _>().map(Vec::len), Some(0));
    assert_eq!(shapes[3].get::<Box<u64>, _>().map(|b| **b), Some(0));
}

#[test]
fn test_consuming_visit_takes_ownership() {
    let owned: Vec<String> = every_shape()
        .into_iter()
        .map(|shape| shape.into_visit(IntoDebug))
        .collect();
    assert_eq!(owned, ["owned 7", "owned \"s\"", "owned [1, 2]", "owned 9"]);
}

#[test]
fn test_visitor_with_borrowed_state() {
    let prefix = String::from(">");

    struct Prefixed<'a>(&'a str);

    impl Visitor for Prefixed<'_> {
        type Output = String;
    }

    impl<T: Debug> Visit<T> for Prefixed<'_> {
        fn visit(&mut self, value: &T) -> String {
            format!("{}{value:?}", self.0)
        }
    }

    let shape = Shape::new(vec![3i32]);
    assert_eq!(shape.visit(Prefixed(&prefix)), ">[3]");
}
