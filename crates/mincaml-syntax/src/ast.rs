//! Syntax tree of MinCaml programs.
//!
//! Nodes do not store their spans. [`Expr::pos`] and [`Expr::end`] derive
//! them from the tokens a node keeps and from its children.

pub mod printer;
mod symbol;
pub mod visit;

pub use self::symbol::{Symbol, SymbolID};

use crate::token::{Position, Source, Span, Token};
use std::{borrow::Cow, sync::Arc};

/// A parsed program together with the source it came from.
#[derive(Debug)]
pub struct AST<'a> {
    pub root: Expr<'a>,
    pub file: &'a Source,
}

impl AST<'_> {
    pub fn span(&self) -> Span {
        self.root.span()
    }
}

/// A recursive function bound by `let rec`.
///
/// `params` is never empty in a well-formed tree.
#[derive(Debug)]
pub struct FuncDef<'a> {
    pub symbol: Arc<Symbol>,
    pub params: Vec<Arc<Symbol>>,
    pub body: Box<Expr<'a>>,
}

#[derive(Debug)]
pub enum Expr<'a> {
    Unit {
        lparen: &'a Token<'a>,
        rparen: &'a Token<'a>,
    },
    Bool {
        token: &'a Token<'a>,
        value: bool,
    },
    Int {
        token: &'a Token<'a>,
        value: i64,
    },
    Float {
        token: &'a Token<'a>,
        value: f64,
    },
    /// `op_token` is the token the negation starts at. It is the `not`
    /// keyword, or the first token of a desugared `<>`/`>=` comparison.
    Not {
        op_token: &'a Token<'a>,
        child: Box<Self>,
    },
    Neg {
        minus_token: &'a Token<'a>,
        child: Box<Self>,
    },
    Add {
        left: Box<Self>,
        right: Box<Self>,
    },
    Sub {
        left: Box<Self>,
        right: Box<Self>,
    },
    FNeg {
        minus_token: &'a Token<'a>,
        child: Box<Self>,
    },
    FAdd {
        left: Box<Self>,
        right: Box<Self>,
    },
    FSub {
        left: Box<Self>,
        right: Box<Self>,
    },
    FMul {
        left: Box<Self>,
        right: Box<Self>,
    },
    FDiv {
        left: Box<Self>,
        right: Box<Self>,
    },
    Eq {
        left: Box<Self>,
        right: Box<Self>,
    },
    Less {
        left: Box<Self>,
        right: Box<Self>,
    },
    If {
        if_token: &'a Token<'a>,
        cond: Box<Self>,
        then: Box<Self>,
        else_: Box<Self>,
    },
    /// `let_token` is the `let` keyword, or the first token of `e1` for a
    /// sequence `e1; e2`.
    Let {
        let_token: &'a Token<'a>,
        symbol: Arc<Symbol>,
        bound: Box<Self>,
        body: Box<Self>,
    },
    VarRef {
        token: &'a Token<'a>,
        symbol: Arc<Symbol>,
    },
    LetRec {
        let_token: &'a Token<'a>,
        func: FuncDef<'a>,
        body: Box<Self>,
    },
    Apply {
        callee: Box<Self>,
        args: Vec<Self>,
    },
    Tuple {
        elems: Vec<Self>,
    },
    LetTuple {
        let_token: &'a Token<'a>,
        symbols: Vec<Arc<Symbol>>,
        bound: Box<Self>,
        body: Box<Self>,
    },
    ArrayCreate {
        array_token: &'a Token<'a>,
        size: Box<Self>,
        elem: Box<Self>,
    },
    Get {
        array: Box<Self>,
        index: Box<Self>,
    },
    Put {
        array: Box<Self>,
        index: Box<Self>,
        assignee: Box<Self>,
    },
}

impl<'a> Expr<'a> {
    /// The position of the first token of this node.
    pub fn pos(&self) -> Position {
        self.assert_well_formed();
        match self {
            Self::Unit { lparen, .. } => lparen.start,
            Self::Bool { token, .. }
            | Self::Int { token, .. }
            | Self::Float { token, .. }
            | Self::VarRef { token, .. } => token.start,
            Self::Not { op_token, .. } => op_token.start,
            Self::Neg { minus_token, .. } | Self::FNeg { minus_token, .. } => minus_token.start,
            Self::Add { left, .. }
            | Self::Sub { left, .. }
            | Self::FAdd { left, .. }
            | Self::FSub { left, .. }
            | Self::FMul { left, .. }
            | Self::FDiv { left, .. }
            | Self::Eq { left, .. }
            | Self::Less { left, .. } => left.pos(),
            Self::If { if_token, .. } => if_token.start,
            Self::Let { let_token, .. }
            | Self::LetRec { let_token, .. }
            | Self::LetTuple { let_token, .. } => let_token.start,
            Self::Apply { callee, .. } => callee.pos(),
            Self::Tuple { elems } => elems[0].pos(),
            Self::ArrayCreate { array_token, .. } => array_token.start,
            Self::Get { array, .. } | Self::Put { array, .. } => array.pos(),
        }
    }

    /// The position just past the last token of this node.
    pub fn end(&self) -> Position {
        self.assert_well_formed();
        match self {
            Self::Unit { rparen, .. } => rparen.end,
            Self::Bool { token, .. }
            | Self::Int { token, .. }
            | Self::Float { token, .. }
            | Self::VarRef { token, .. } => token.end,
            Self::Not { child, .. } | Self::Neg { child, .. } | Self::FNeg { child, .. } => {
                child.end()
            }
            Self::Add { right, .. }
            | Self::Sub { right, .. }
            | Self::FAdd { right, .. }
            | Self::FSub { right, .. }
            | Self::FMul { right, .. }
            | Self::FDiv { right, .. }
            | Self::Eq { right, .. }
            | Self::Less { right, .. } => right.end(),
            Self::If { else_, .. } => else_.end(),
            Self::Let { body, .. } | Self::LetRec { body, .. } | Self::LetTuple { body, .. } => {
                body.end()
            }
            Self::Apply { callee, args } => match args.last() {
                Some(arg) => arg.end(),
                None => callee.end(),
            },
            Self::Tuple { elems } => elems[elems.len() - 1].end(),
            Self::ArrayCreate { elem, .. } => elem.end(),
            Self::Get { index, .. } => index.end(),
            Self::Put { assignee, .. } => assignee.end(),
        }
    }

    pub fn span(&self) -> Span {
        Span {
            start: self.pos(),
            end: self.end(),
        }
    }

    /// A short label of this node for tracing and diagnostics.
    pub fn name(&self) -> Cow<'static, str> {
        self.assert_well_formed();
        match self {
            Self::Unit { .. } => "Unit".into(),
            Self::Bool { .. } => "Bool".into(),
            Self::Int { .. } => "Int".into(),
            Self::Float { .. } => "Float".into(),
            Self::Not { .. } => "Not".into(),
            Self::Neg { .. } => "Neg".into(),
            Self::Add { .. } => "Add".into(),
            Self::Sub { .. } => "Sub".into(),
            Self::FNeg { .. } => "FNeg".into(),
            Self::FAdd { .. } => "FAdd".into(),
            Self::FSub { .. } => "FSub".into(),
            Self::FMul { .. } => "FMul".into(),
            Self::FDiv { .. } => "FDiv".into(),
            Self::Eq { .. } => "Eq".into(),
            Self::Less { .. } => "Less".into(),
            Self::If { .. } => "If".into(),
            Self::Let { symbol, .. } => format!("Let ({})", symbol.display_name).into(),
            Self::VarRef { symbol, .. } => format!("VarRef ({})", symbol.display_name).into(),
            Self::LetRec { func, .. } => format!(
                "LetRec (fun {} {})",
                func.symbol.display_name,
                join_display_names(&func.params)
            )
            .into(),
            Self::Apply { .. } => "Apply".into(),
            Self::Tuple { .. } => "Tuple".into(),
            Self::LetTuple { symbols, .. } => {
                format!("LetTuple ({})", join_display_names(symbols)).into()
            }
            Self::ArrayCreate { .. } => "ArrayCreate".into(),
            Self::Get { .. } => "Get".into(),
            Self::Put { .. } => "Put".into(),
        }
    }

    /// The direct children of this node, in source order.
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Unit { .. }
            | Self::Bool { .. }
            | Self::Int { .. }
            | Self::Float { .. }
            | Self::VarRef { .. } => vec![],
            Self::Not { child, .. } | Self::Neg { child, .. } | Self::FNeg { child, .. } => {
                vec![&**child]
            }
            Self::Add { left, right }
            | Self::Sub { left, right }
            | Self::FAdd { left, right }
            | Self::FSub { left, right }
            | Self::FMul { left, right }
            | Self::FDiv { left, right }
            | Self::Eq { left, right }
            | Self::Less { left, right } => vec![&**left, &**right],
            Self::If {
                cond, then, else_, ..
            } => vec![&**cond, &**then, &**else_],
            Self::Let { bound, body, .. } | Self::LetTuple { bound, body, .. } => {
                vec![&**bound, &**body]
            }
            Self::LetRec { func, body, .. } => vec![&*func.body, &**body],
            Self::Apply { callee, args } => {
                let mut children = Vec::with_capacity(args.len() + 1);
                children.push(&**callee);
                children.extend(args);
                children
            }
            Self::Tuple { elems } => elems.iter().collect(),
            Self::ArrayCreate { size, elem, .. } => vec![&**size, &**elem],
            Self::Get { array, index } => vec![&**array, &**index],
            Self::Put {
                array,
                index,
                assignee,
            } => vec![&**array, &**index, &**assignee],
        }
    }

    // Shapes a correct parser never builds.
    fn assert_well_formed(&self) {
        match self {
            Self::LetRec { func, .. } => assert!(
                !func.params.is_empty(),
                "LetRec: parameters of function `{}' must not be empty",
                func.symbol.display_name
            ),
            Self::LetTuple { symbols, .. } => {
                assert!(!symbols.is_empty(), "LetTuple: symbols must not be empty")
            }
            Self::Tuple { elems } => {
                assert!(!elems.is_empty(), "Tuple: elements must not be empty")
            }
            _ => (),
        }
    }
}

fn join_display_names(symbols: &[Arc<Symbol>]) -> String {
    symbols
        .iter()
        .map(|s| &*s.display_name)
        .collect::<Vec<_>>()
        .join(", ")
}
