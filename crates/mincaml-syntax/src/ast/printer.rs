//! Tree dump of a parsed program.

use super::{Expr, AST};
use std::fmt;

impl<'a> AST<'a> {
    /// Render the tree, one node per line, indented by depth and annotated
    /// with the span of each node.
    ///
    /// ```text
    /// Let (x) (1:1-1:15)
    ///   Int (1:9-1:10)
    ///   VarRef (x) (1:14-1:15)
    /// ```
    pub fn display(&self) -> Printer<'_, 'a> {
        Printer { ast: self }
    }
}

pub struct Printer<'t, 'a> {
    ast: &'t AST<'a>,
}

impl fmt::Display for Printer<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, &self.ast.root, 0)
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr<'_>, depth: usize) -> fmt::Result {
    writeln!(
        f,
        "{:indent$}{} ({})",
        "",
        expr.name(),
        expr.span(),
        indent = depth * 2
    )?;
    for child in expr.children() {
        write_expr(f, child, depth + 1)?;
    }
    Ok(())
}
