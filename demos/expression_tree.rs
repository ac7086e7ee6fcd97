//! Builds, prints, rewrites and evaluates a small arithmetic expression tree.
//!
//! Run with `cargo run --example expression_tree`.

use anyhow::{bail, Context, Result};
use sumvar::{Variant, Visit, VisitMut, Visitor};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone)]
struct Binary {
    op: Op,
    lhs: Expr,
    rhs: Expr,
}

#[derive(Debug, Clone)]
struct Negate {
    operand: Expr,
}

type Expr = Variant![f64, #[backup] String, #[recursive] Binary, #[recursive] Negate];

fn num(value: f64) -> Expr {
    Expr::new(value)
}

fn var(name: &str) -> Expr {
    Expr::new(name.to_owned())
}

fn binary(op: Op, lhs: Expr, rhs: Expr) -> Expr {
    Expr::new(Binary { op, lhs, rhs })
}

fn negate(operand: Expr) -> Expr {
    Expr::new(Negate { operand })
}

/// Renders with full parenthesisation.
struct Print;

impl Visitor for Print {
    type Output = String;
}

impl Visit<f64> for Print {
    fn visit(&mut self, value: &f64) -> String {
        value.to_string()
    }
}

impl Visit<String> for Print {
    fn visit(&mut self, name: &String) -> String {
        name.clone()
    }
}

impl Visit<Binary> for Print {
    fn visit(&mut self, node: &Binary) -> String {
        let op = match node.op {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
        };
        format!("({} {op} {})", node.lhs.visit(&mut *self), node.rhs.visit(&mut *self))
    }
}

impl Visit<Negate> for Print {
    fn visit(&mut self, node: &Negate) -> String {
        format!("-{}", node.operand.visit(&mut *self))
    }
}

/// Evaluates under a variable binding.
struct Eval<'a> {
    bindings: &'a [(&'a str, f64)],
}

impl Visitor for Eval<'_> {
    type Output = Result<f64>;
}

impl Visit<f64> for Eval<'_> {
    fn visit(&mut self, value: &f64) -> Result<f64> {
        Ok(*value)
    }
}

impl Visit<String> for Eval<'_> {
    fn visit(&mut self, name: &String) -> Result<f64> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| *value)
            .with_context(|| format!("unbound variable `{name}`"))
    }
}

impl Visit<Binary> for Eval<'_> {
    fn visit(&mut self, node: &Binary) -> Result<f64> {
        let lhs = node.lhs.visit(&mut *self)?;
        let rhs = node.rhs.visit(&mut *self)?;
        Ok(match node.op {
            Op::Add => lhs + rhs,
            Op::Sub => lhs - rhs,
            Op::Mul => lhs * rhs,
            Op::Div => {
                if rhs == 0.0 {
                    bail!("division by zero");
                }
                lhs / rhs
            }
        })
    }
}

impl Visit<Negate> for Eval<'_> {
    fn visit(&mut self, node: &Negate) -> Result<f64> {
        Ok(-node.operand.visit(&mut *self)?)
    }
}

/// Replaces every variable with its binding, in place.
struct Substitute<'a> {
    bindings: &'a [(&'a str, f64)],
}

impl Visitor for Substitute<'_> {
    type Output = ();
}

impl VisitMut<f64> for Substitute<'_> {
    fn visit_mut(&mut self, _: &mut f64) {}
}

impl VisitMut<String> for Substitute<'_> {
    fn visit_mut(&mut self, _: &mut String) {}
}

impl VisitMut<Binary> for Substitute<'_> {
    fn visit_mut(&mut self, node: &mut Binary) {
        self.rewrite(&mut node.lhs);
        self.rewrite(&mut node.rhs);
    }
}

impl VisitMut<Negate> for Substitute<'_> {
    fn visit_mut(&mut self, node: &mut Negate) {
        self.rewrite(&mut node.operand);
    }
}

impl Substitute<'_> {
    fn rewrite(&mut self, expr: &mut Expr) {
        let bound = expr.get::<String, _>().and_then(|name| {
            self.bindings
                .iter()
                .find(|(bound, _)| bound == name)
                .map(|(_, value)| *value)
        });
        match bound {
            Some(value) => expr.set(value),
            None => expr.visit_mut(&mut *self),
        }
    }
}

fn main() -> Result<()> {
    // (x * 2) + -(y / 4)
    let mut expr = binary(
        Op::Add,
        binary(Op::Mul, var("x"), num(2.0)),
        negate(binary(Op::Div, var("y"), num(4.0))),
    );
    println!("expression: {}", expr.visit(Print));

    let bindings = [("x", 3.0), ("y", 8.0)];
    let value = expr.visit(Eval { bindings: &bindings })?;
    println!("value with x = 3, y = 8: {value}");

    let copy = expr.clone();
    Substitute { bindings: &bindings[..1] }.rewrite(&mut expr);
    println!("after substituting x: {}", expr.visit(Print));
    println!("copy is untouched: {}", copy.visit(Print));

    match expr.visit(Eval { bindings: &[] }) {
        Ok(value) => println!("unexpected value {value}"),
        Err(error) => println!("evaluation without y fails: {error:#}"),
    }

    // A failed rewrite leaves the tree exactly as it was.
    let parsed = expr.try_assign_with::<f64, _, _, _>(|| {
        "not a number".parse::<f64>().context("replacement is not numeric")
    });
    if let Err(error) = parsed {
        println!("rejected replacement ({error:#}); still {}", expr.visit(Print));
    }

    let zero = binary(Op::Div, num(1.0), num(0.0));
    let error = zero.visit(Eval { bindings: &[] }).unwrap_err();
    println!("{}: {error}", zero.visit(Print));

    Ok(())
}
