//! Traversal over syntax trees.

use super::Expr;

/// Callbacks invoked by [`walk`].
pub trait Visitor<'a> {
    /// Called before the children of `expr` are visited. Returning `false`
    /// skips the children.
    fn visit_topdown(&mut self, expr: &Expr<'a>) -> bool {
        let _ = expr;
        true
    }

    /// Called after the children of `expr` are visited, or skipped.
    fn visit_bottomup(&mut self, expr: &Expr<'a>) {
        let _ = expr;
    }
}

/// Visit `expr` and its descendants depth-first, in source order.
pub fn walk<'a, V>(visitor: &mut V, expr: &Expr<'a>)
where
    V: Visitor<'a> + ?Sized,
{
    if visitor.visit_topdown(expr) {
        for child in expr.children() {
            walk(visitor, child);
        }
    }
    visitor.visit_bottomup(expr);
}
