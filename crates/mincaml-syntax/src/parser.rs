//! Parser for MinCaml programs.
//!
//! Operator precedences, loosest first:
//!
//! | construct                         | associativity |
//! |-----------------------------------|---------------|
//! | `let ... in`, `;`                 | right         |
//! | `if ... then ... else`            | right         |
//! | `<-`                              | right         |
//! | `,`                               | -             |
//! | `=`, `<>`, `<`, `>=`              | left          |
//! | `+`, `-`, `+.`, `-.`              | left          |
//! | `*.`, `/.`                        | left          |
//! | unary `-`, `-.`                   | right         |
//! | application, `not`, `Array.create`| left          |
//! | `.( )`                            | left          |
//!
//! Identifiers are resolved to the innermost enclosing binder while parsing.
//! Identifiers without a binder refer to external functions and share one
//! fresh symbol per name.

use crate::{
    ast::{Expr, FuncDef, Symbol, AST},
    lexer::TokenKind,
    token::{Position, Source, Token},
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{pos}: expected {expected}, found {found} `{text}'")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        text: String,
        pos: Position,
    },

    #[error("{pos}: expected {expected}, found end of input")]
    UnexpectedEOI {
        expected: &'static str,
        pos: Position,
    },

    #[error("{pos}: invalid literal `{text}': {msg}")]
    InvalidLiteral {
        text: String,
        msg: String,
        pos: Position,
    },

    /// `>` and `<=` could only be desugared by swapping their operands,
    /// which would put the tree out of source order.
    #[error("{pos}: operator `{text}' is not supported since its desugaring reorders the operands, write `b {rewrite} a' for `a {text} b'")]
    UnsupportedOperator {
        text: String,
        rewrite: &'static str,
        pos: Position,
    },
}

/// Parse the tokens of `file` into a syntax tree.
pub fn parse<'a>(file: &'a Source, tokens: &'a [Token<'a>]) -> Result<AST<'a>, ParseError> {
    let span = tracing::trace_span!("parse", file = file.name());
    let _entered = span.enter();

    let mut parser = Parser {
        file,
        tokens,
        cursor: 0,
        scopes: vec![],
        externals: FxHashMap::default(),
    };
    let root = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(unexpected(token, "end of input"));
    }
    tracing::trace!("accepted");

    Ok(AST { root, file })
}

type ParseResult<'a> = Result<Expr<'a>, ParseError>;

struct Parser<'a> {
    file: &'a Source,
    tokens: &'a [Token<'a>],
    cursor: usize,
    scopes: Vec<Arc<Symbol>>,
    externals: FxHashMap<&'a str, Arc<Symbol>>,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token<'a>> {
        let tokens = self.tokens;
        tokens.get(self.cursor)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn token_at(&self, index: usize) -> &'a Token<'a> {
        let tokens = self.tokens;
        &tokens[index]
    }

    fn eat(&mut self, kind: TokenKind) -> Option<&'a Token<'a>> {
        let token = self.peek().filter(|token| token.kind == kind)?;
        self.cursor += 1;
        Some(token)
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<&'a Token<'a>, ParseError> {
        match self.eat(kind) {
            Some(token) => Ok(token),
            None => Err(self.error_here(expected)),
        }
    }

    fn error_here(&self, expected: &'static str) -> ParseError {
        match self.peek() {
            Some(token) => unexpected(token, expected),
            None => ParseError::UnexpectedEOI {
                expected,
                pos: self.file.end_position(),
            },
        }
    }

    fn reduced(&self, expr: Expr<'a>) -> Expr<'a> {
        tracing::trace!("reduce: {} ({})", expr.name(), expr.span());
        expr
    }

    fn resolve(&mut self, name: &'a str) -> Arc<Symbol> {
        if let Some(symbol) = self.scopes.iter().rev().find(|s| s.display_name == name) {
            return Arc::clone(symbol);
        }
        let symbol = self.externals.entry(name).or_insert_with(|| {
            tracing::trace!("external symbol `{}'", name);
            Symbol::new(name)
        });
        Arc::clone(symbol)
    }

    // expr := stmt (';' stmt)*
    //
    // Folded from the right in a loop. The stack depth must not grow with
    // the length of a sequence.
    fn expr(&mut self) -> ParseResult<'a> {
        let mut start = self.cursor;
        let mut last = self.stmt()?;
        let mut init = vec![];
        while self.eat(TokenKind::Semicolon).is_some() {
            let next_start = self.cursor;
            let next = self.stmt()?;
            init.push((start, std::mem::replace(&mut last, next)));
            start = next_start;
        }

        let mut body = last;
        for (start, bound) in init.into_iter().rev() {
            body = self.reduced(Expr::Let {
                let_token: self.token_at(start),
                symbol: Symbol::new("_"),
                bound: Box::new(bound),
                body: Box::new(body),
            });
        }
        Ok(body)
    }

    fn stmt(&mut self) -> ParseResult<'a> {
        match self.peek_kind() {
            Some(TokenKind::Let) => self.let_expr(),
            Some(TokenKind::If) => self.if_expr(),
            _ => self.tuple(),
        }
    }

    // `let` and `if` extend as far to the right as possible, wherever they
    // appear as an operand.
    fn operand(&mut self, level: fn(&mut Self) -> ParseResult<'a>) -> ParseResult<'a> {
        match self.peek_kind() {
            Some(TokenKind::Let) => self.let_expr(),
            Some(TokenKind::If) => self.if_expr(),
            _ => level(self),
        }
    }

    fn let_expr(&mut self) -> ParseResult<'a> {
        let let_token = self.expect(TokenKind::Let, "`let'")?;
        if self.eat(TokenKind::Rec).is_some() {
            return self.let_rec(let_token);
        }
        if self.eat(TokenKind::LParen).is_some() {
            return self.let_tuple(let_token);
        }

        let ident = self.expect(TokenKind::Ident, "identifier")?;
        self.expect(TokenKind::Equal, "`='")?;
        let bound = self.expr()?;
        self.expect(TokenKind::In, "`in'")?;

        let symbol = Symbol::new(ident.text);
        let depth = self.scopes.len();
        self.scopes.push(Arc::clone(&symbol));
        let body = self.expr()?;
        self.scopes.truncate(depth);

        Ok(self.reduced(Expr::Let {
            let_token,
            symbol,
            bound: Box::new(bound),
            body: Box::new(body),
        }))
    }

    // let rec f x y ... = e in e
    fn let_rec(&mut self, let_token: &'a Token<'a>) -> ParseResult<'a> {
        let name = self.expect(TokenKind::Ident, "function name")?;
        let mut params = vec![];
        while let Some(param) = self.eat(TokenKind::Ident) {
            params.push(Symbol::new(param.text));
        }
        if params.is_empty() {
            return Err(self.error_here("parameter name"));
        }
        self.expect(TokenKind::Equal, "`='")?;

        let symbol = Symbol::new(name.text);
        let depth = self.scopes.len();
        self.scopes.push(Arc::clone(&symbol));
        self.scopes.extend(params.iter().cloned());
        let func_body = self.expr()?;
        self.scopes.truncate(depth + 1);
        self.expect(TokenKind::In, "`in'")?;
        let body = self.expr()?;
        self.scopes.truncate(depth);

        Ok(self.reduced(Expr::LetRec {
            let_token,
            func: FuncDef {
                symbol,
                params,
                body: Box::new(func_body),
            },
            body: Box::new(body),
        }))
    }

    // let (x, y, ...) = e in e
    fn let_tuple(&mut self, let_token: &'a Token<'a>) -> ParseResult<'a> {
        let first = self.expect(TokenKind::Ident, "identifier")?;
        let mut symbols = vec![Symbol::new(first.text)];
        self.expect(TokenKind::Comma, "`,'")?;
        loop {
            let ident = self.expect(TokenKind::Ident, "identifier")?;
            symbols.push(Symbol::new(ident.text));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)'")?;
        self.expect(TokenKind::Equal, "`='")?;
        let bound = self.expr()?;
        self.expect(TokenKind::In, "`in'")?;

        let depth = self.scopes.len();
        self.scopes.extend(symbols.iter().cloned());
        let body = self.expr()?;
        self.scopes.truncate(depth);

        Ok(self.reduced(Expr::LetTuple {
            let_token,
            symbols,
            bound: Box::new(bound),
            body: Box::new(body),
        }))
    }

    fn if_expr(&mut self) -> ParseResult<'a> {
        let if_token = self.expect(TokenKind::If, "`if'")?;
        let cond = self.expr()?;
        self.expect(TokenKind::Then, "`then'")?;
        let then = self.expr()?;
        self.expect(TokenKind::Else, "`else'")?;
        let else_ = self.stmt()?;
        Ok(self.reduced(Expr::If {
            if_token,
            cond: Box::new(cond),
            then: Box::new(then),
            else_: Box::new(else_),
        }))
    }

    // tuple := assign (',' assign)*
    fn tuple(&mut self) -> ParseResult<'a> {
        let first = self.assignment()?;
        if self.peek_kind() != Some(TokenKind::Comma) {
            return Ok(first);
        }

        // The assignee of a `Put` swallows the remaining elements, so the
        // loop ends after one.
        let mut elems = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            elems.push(self.operand(Self::assignment)?);
        }
        Ok(self.reduced(Expr::Tuple { elems }))
    }

    // assign := simple '.(' expr ')' '<-' stmt
    //         | cmp
    fn assignment(&mut self) -> ParseResult<'a> {
        match (self.comparison()?, self.peek_kind()) {
            (Expr::Get { array, index }, Some(TokenKind::LessMinus)) => {
                self.cursor += 1;
                let assignee = self.stmt()?;
                Ok(self.reduced(Expr::Put {
                    array,
                    index,
                    assignee: Box::new(assignee),
                }))
            }
            (expr, _) => Ok(expr),
        }
    }

    fn comparison(&mut self) -> ParseResult<'a> {
        let start = self.cursor;
        let mut lhs = self.additive()?;
        while let Some(op) = self.peek() {
            match op.kind {
                TokenKind::Equal
                | TokenKind::LessGreater
                | TokenKind::Less
                | TokenKind::GreaterEqual => (),
                TokenKind::Greater | TokenKind::LessEqual => {
                    return Err(ParseError::UnsupportedOperator {
                        text: op.text.to_owned(),
                        rewrite: if op.kind == TokenKind::Greater {
                            "<"
                        } else {
                            ">="
                        },
                        pos: op.start,
                    });
                }
                _ => break,
            }
            self.cursor += 1;
            let left = Box::new(lhs);
            let right = Box::new(self.operand(Self::additive)?);
            lhs = match op.kind {
                TokenKind::Equal => Expr::Eq { left, right },
                TokenKind::Less => Expr::Less { left, right },
                TokenKind::LessGreater => Expr::Not {
                    op_token: self.token_at(start),
                    child: Box::new(Expr::Eq { left, right }),
                },
                _ => Expr::Not {
                    op_token: self.token_at(start),
                    child: Box::new(Expr::Less { left, right }),
                },
            };
            lhs = self.reduced(lhs);
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> ParseResult<'a> {
        let mut lhs = self.multiplicative()?;
        while let Some(op) = self.peek() {
            if !matches!(
                op.kind,
                TokenKind::Plus | TokenKind::Minus | TokenKind::PlusDot | TokenKind::MinusDot
            ) {
                break;
            }
            self.cursor += 1;
            let left = Box::new(lhs);
            let right = Box::new(self.operand(Self::multiplicative)?);
            lhs = self.reduced(match op.kind {
                TokenKind::Plus => Expr::Add { left, right },
                TokenKind::Minus => Expr::Sub { left, right },
                TokenKind::PlusDot => Expr::FAdd { left, right },
                _ => Expr::FSub { left, right },
            });
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> ParseResult<'a> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek() {
            if !matches!(op.kind, TokenKind::StarDot | TokenKind::SlashDot) {
                break;
            }
            self.cursor += 1;
            let left = Box::new(lhs);
            let right = Box::new(self.operand(Self::unary)?);
            lhs = self.reduced(match op.kind {
                TokenKind::StarDot => Expr::FMul { left, right },
                _ => Expr::FDiv { left, right },
            });
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> ParseResult<'a> {
        if let Some(minus_token) = self.eat(TokenKind::Minus) {
            let child = Box::new(self.operand(Self::unary)?);
            // `-1.5` negates a float.
            let expr = if matches!(*child, Expr::Float { .. }) {
                Expr::FNeg { minus_token, child }
            } else {
                Expr::Neg { minus_token, child }
            };
            return Ok(self.reduced(expr));
        }
        if let Some(minus_token) = self.eat(TokenKind::MinusDot) {
            let child = Box::new(self.operand(Self::unary)?);
            return Ok(self.reduced(Expr::FNeg { minus_token, child }));
        }
        self.application()
    }

    fn application(&mut self) -> ParseResult<'a> {
        if let Some(op_token) = self.eat(TokenKind::Not) {
            let child = Box::new(self.operand(Self::application)?);
            return Ok(self.reduced(Expr::Not { op_token, child }));
        }
        if let Some(array_token) = self.eat(TokenKind::ArrayCreate) {
            let size = Box::new(self.simple()?);
            let elem = Box::new(self.simple()?);
            return Ok(self.reduced(Expr::ArrayCreate {
                array_token,
                size,
                elem,
            }));
        }

        let callee = self.simple()?;
        let mut args = vec![];
        while self.starts_simple() {
            args.push(self.simple()?);
        }
        if args.is_empty() {
            return Ok(callee);
        }
        Ok(self.reduced(Expr::Apply {
            callee: Box::new(callee),
            args,
        }))
    }

    fn starts_simple(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(
                TokenKind::LParen
                    | TokenKind::True
                    | TokenKind::False
                    | TokenKind::Int
                    | TokenKind::Float
                    | TokenKind::Ident
            )
        )
    }

    // simple := atom ('.(' expr ')')*
    fn simple(&mut self) -> ParseResult<'a> {
        let mut expr = self.atom()?;
        while self.eat(TokenKind::Dot).is_some() {
            self.expect(TokenKind::LParen, "`('")?;
            let index = self.expr()?;
            self.expect(TokenKind::RParen, "`)'")?;
            expr = self.reduced(Expr::Get {
                array: Box::new(expr),
                index: Box::new(index),
            });
        }
        Ok(expr)
    }

    fn atom(&mut self) -> ParseResult<'a> {
        let token = match self.peek() {
            Some(token) => token,
            None => return Err(self.error_here("expression")),
        };
        let expr = match token.kind {
            TokenKind::LParen => {
                self.cursor += 1;
                if let Some(rparen) = self.eat(TokenKind::RParen) {
                    return Ok(self.reduced(Expr::Unit {
                        lparen: token,
                        rparen,
                    }));
                }
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "`)'")?;
                return Ok(inner);
            }
            TokenKind::True => Expr::Bool { token, value: true },
            TokenKind::False => Expr::Bool {
                token,
                value: false,
            },
            TokenKind::Int => Expr::Int {
                token,
                value: token.text.parse().map_err(|e| invalid_literal(token, e))?,
            },
            TokenKind::Float => Expr::Float {
                token,
                value: token.text.parse().map_err(|e| invalid_literal(token, e))?,
            },
            TokenKind::Ident => Expr::VarRef {
                token,
                symbol: self.resolve(token.text),
            },
            _ => return Err(unexpected(token, "expression")),
        };
        self.cursor += 1;
        Ok(self.reduced(expr))
    }
}

fn unexpected(token: &Token<'_>, expected: &'static str) -> ParseError {
    ParseError::UnexpectedToken {
        expected,
        found: token.kind,
        text: token.text.to_owned(),
        pos: token.start,
    }
}

fn invalid_literal(token: &Token<'_>, err: impl std::fmt::Display) -> ParseError {
    ParseError::InvalidLiteral {
        text: token.text.to_owned(),
        msg: err.to_string(),
        pos: token.start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use tracing::Level;

    fn with_ast<F>(input: &str, f: F)
    where
        F: FnOnce(&Source, &Expr<'_>),
    {
        let source = Source::new("test.ml", input);
        let tokens = tokenize(&source).unwrap();
        let ast = parse(&source, &tokens).unwrap();
        f(&source, &ast.root);
    }

    fn parse_err(input: &str) -> ParseError {
        let source = Source::new("test.ml", input);
        let tokens = tokenize(&source).unwrap();
        match parse(&source, &tokens) {
            Ok(ast) => panic!("unexpectedly parsed: {:?}", ast.root),
            Err(err) => err,
        }
    }

    fn text<'s>(source: &'s Source, expr: &Expr<'_>) -> &'s str {
        source.snippet(expr.pos(), expr.end())
    }

    #[test]
    fn smoketest() {
        let _ = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .try_init();

        let input = "\
let rec fib n =
  if n < 2 then n else
  fib (n - 1) + fib (n - 2) in
print_int (fib 30)
";
        with_ast(input, |source, root| {
            assert_eq!(root.name(), "LetRec (fun fib n)");
            assert_eq!(text(source, root), input.trim_end());
            let Expr::LetRec { func, body, .. } = root else {
                panic!("expected LetRec: {:?}", root)
            };
            assert!(matches!(&*func.body, Expr::If { .. }));
            assert_eq!(
                text(source, &func.body),
                "if n < 2 then n else\n  fib (n - 1) + fib (n - 2)"
            );
            assert_eq!(text(source, body), "print_int (fib 30)");
        });
    }

    #[test]
    fn precedence() {
        with_ast("1 + 2 - 3 = 4", |source, root| {
            let Expr::Eq { left, right } = root else {
                panic!("expected Eq: {:?}", root)
            };
            assert!(matches!(&**right, Expr::Int { value: 4, .. }));
            let Expr::Sub { left: sum, .. } = &**left else {
                panic!("expected Sub: {:?}", left)
            };
            assert!(matches!(&**sum, Expr::Add { .. }));
            assert_eq!(text(source, left), "1 + 2 - 3");
        });

        with_ast("a +. b *. c /. d", |source, root| {
            let Expr::FAdd { right, .. } = root else {
                panic!("expected FAdd: {:?}", root)
            };
            assert!(matches!(
                &**right,
                Expr::FDiv { left, .. } if matches!(&**left, Expr::FMul { .. })
            ));
            assert_eq!(text(source, right), "b *. c /. d");
        });

        with_ast("not f x = y", |source, root| {
            let Expr::Eq { left, .. } = root else {
                panic!("expected Eq: {:?}", root)
            };
            assert!(matches!(
                &**left,
                Expr::Not { child, .. } if matches!(&**child, Expr::Apply { .. })
            ));
            assert_eq!(text(source, left), "not f x");
        });
    }

    #[test]
    fn unary_minus() {
        with_ast("- x - -. y", |source, root| {
            let Expr::Sub { left, right } = root else {
                panic!("expected Sub: {:?}", root)
            };
            assert!(matches!(&**left, Expr::Neg { .. }));
            assert!(matches!(&**right, Expr::FNeg { .. }));
            assert_eq!(text(source, right), "-. y");
        });
        with_ast("-1.5", |_, root| {
            assert!(matches!(
                root,
                Expr::FNeg { child, .. } if matches!(&**child, Expr::Float { .. })
            ));
        });
    }

    #[test]
    fn desugared_comparisons_cover_the_whole_comparison() {
        with_ast("(a + 1) <> b", |source, root| {
            assert!(matches!(
                root,
                Expr::Not { child, .. } if matches!(&**child, Expr::Eq { .. })
            ));
            assert_eq!(text(source, root), "(a + 1) <> b");
        });
        with_ast("a >= b", |source, root| {
            assert!(matches!(
                root,
                Expr::Not { child, .. } if matches!(&**child, Expr::Less { .. })
            ));
            assert_eq!(text(source, root), "a >= b");
        });
    }

    #[test]
    fn unsupported_operators() {
        assert!(matches!(
            parse_err("a > b"),
            ParseError::UnsupportedOperator { text, rewrite: "<", pos }
                if text == ">" && pos == Position::new(2, 1, 3)
        ));
        assert!(matches!(
            parse_err("a <= b"),
            ParseError::UnsupportedOperator { text, rewrite: ">=", .. } if text == "<="
        ));
        assert_eq!(
            parse_err("x <= y").to_string(),
            "1:3: operator `<=' is not supported since its desugaring reorders the operands, \
             write `b >= a' for `a <= b'"
        );
    }

    #[test]
    fn sequence() {
        with_ast("f x; g y; z", |source, root| {
            let Expr::Let { symbol, bound, body, .. } = root else {
                panic!("expected Let: {:?}", root)
            };
            assert_eq!(symbol.display_name, "_");
            assert_eq!(text(source, bound), "f x");
            assert!(matches!(&**body, Expr::Let { .. }));
            assert_eq!(text(source, root), "f x; g y; z");
            assert_eq!(text(source, body), "g y; z");
        });

        with_ast("if c then a else b; d", |_, root| {
            let Expr::Let { bound, .. } = root else {
                panic!("expected Let: {:?}", root)
            };
            assert!(matches!(&**bound, Expr::If { .. }));
        });
    }

    #[test]
    fn tuples() {
        with_ast("let (a, b, c) = 1, 2, 3 in b", |source, root| {
            assert_eq!(root.name(), "LetTuple (a, b, c)");
            let Expr::LetTuple { symbols, bound, body, .. } = root else {
                panic!("expected LetTuple: {:?}", root)
            };
            assert!(matches!(&**bound, Expr::Tuple { elems } if elems.len() == 3));
            assert_eq!(text(source, bound), "1, 2, 3");
            assert!(matches!(&**body, Expr::VarRef { symbol, .. } if *symbol == symbols[1]));
        });

        with_ast("1, if c then 2 else 3, 4", |_, root| {
            let Expr::Tuple { elems } = root else {
                panic!("expected Tuple: {:?}", root)
            };
            assert_eq!(elems.len(), 2);
            assert!(matches!(
                &elems[1],
                Expr::If { else_, .. } if matches!(&**else_, Expr::Tuple { .. })
            ));
        });
    }

    #[test]
    fn arrays() {
        with_ast("let a = Array.make 10 0.0 in a.(i + 1) <- a.(i).(j); a", |source, root| {
            let Expr::Let { bound, body, .. } = root else {
                panic!("expected Let: {:?}", root)
            };
            assert!(matches!(&**bound, Expr::ArrayCreate { .. }));
            assert_eq!(text(source, bound), "Array.make 10 0.0");

            let Expr::Let { bound: put, .. } = &**body else {
                panic!("expected sequence: {:?}", body)
            };
            let Expr::Put { index, assignee, .. } = &**put else {
                panic!("expected Put: {:?}", put)
            };
            assert_eq!(text(source, index), "i + 1");
            assert!(matches!(
                &**assignee,
                Expr::Get { array, .. } if matches!(&**array, Expr::Get { .. })
            ));
            assert_eq!(text(source, put), "a.(i + 1) <- a.(i).(j)");
        });

        with_ast("1, a.(0) <- 2, 3", |source, root| {
            let Expr::Tuple { elems } = root else {
                panic!("expected Tuple: {:?}", root)
            };
            assert_eq!(elems.len(), 2);
            let Expr::Put { assignee, .. } = &elems[1] else {
                panic!("expected Put: {:?}", elems[1])
            };
            assert!(matches!(&**assignee, Expr::Tuple { elems } if elems.len() == 2));
            assert_eq!(text(source, &elems[1]), "a.(0) <- 2, 3");
        });
    }

    #[test]
    fn unit_and_literals() {
        with_ast("f () true false 42 2.5", |source, root| {
            let Expr::Apply { args, .. } = root else {
                panic!("expected Apply: {:?}", root)
            };
            assert!(matches!(
                &args[..],
                [
                    Expr::Unit { .. },
                    Expr::Bool { value: true, .. },
                    Expr::Bool { value: false, .. },
                    Expr::Int { value: 42, .. },
                    Expr::Float { .. },
                ]
            ));
            assert_eq!(text(source, &args[0]), "()");
            assert!(matches!(args[4], Expr::Float { value, .. } if value == 2.5));
        });
    }

    #[test]
    fn shadowing_resolves_to_innermost_binder() {
        with_ast("let x = 1 in let x = x + 1 in x", |_, root| {
            let Expr::Let { symbol: outer, body, .. } = root else {
                panic!("expected Let: {:?}", root)
            };
            let Expr::Let { symbol: inner, bound, body, .. } = &**body else {
                panic!("expected Let: {:?}", body)
            };
            assert_ne!(outer, inner);
            assert_eq!(outer.display_name, inner.display_name);

            let Expr::Add { left, .. } = &**bound else {
                panic!("expected Add: {:?}", bound)
            };
            assert!(matches!(&**left, Expr::VarRef { symbol, .. } if Arc::ptr_eq(symbol, outer)));
            assert!(matches!(&**body, Expr::VarRef { symbol, .. } if Arc::ptr_eq(symbol, inner)));
        });
    }

    #[test]
    fn let_rec_scoping() {
        with_ast("let rec f x = f x in f x", |_, root| {
            let Expr::LetRec { func, body, .. } = root else {
                panic!("expected LetRec: {:?}", root)
            };
            let Expr::Apply { callee, args } = &*func.body else {
                panic!("expected Apply: {:?}", func.body)
            };
            assert!(matches!(&**callee, Expr::VarRef { symbol, .. } if *symbol == func.symbol));
            assert!(matches!(&args[0], Expr::VarRef { symbol, .. } if *symbol == func.params[0]));

            // the parameter is out of scope in the body
            let Expr::Apply { callee, args } = &**body else {
                panic!("expected Apply: {:?}", body)
            };
            assert!(matches!(&**callee, Expr::VarRef { symbol, .. } if *symbol == func.symbol));
            assert!(matches!(&args[0], Expr::VarRef { symbol, .. } if *symbol != func.params[0]));
        });
    }

    #[test]
    fn externals_share_a_symbol() {
        with_ast("print_int 1; print_int 2", |_, root| {
            let mut symbols = vec![];
            for child in root.children() {
                if let Expr::Apply { callee, .. } = child {
                    if let Expr::VarRef { symbol, .. } = &**callee {
                        symbols.push(Arc::clone(symbol));
                    }
                }
            }
            assert_eq!(symbols.len(), 2);
            assert!(Arc::ptr_eq(&symbols[0], &symbols[1]));
        });
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_err("let x = 1"),
            ParseError::UnexpectedEOI { expected: "`in'", pos } if pos == Position::new(9, 1, 10)
        ));
        assert!(matches!(
            parse_err("let rec f = 1 in f"),
            ParseError::UnexpectedToken { expected: "parameter name", found: TokenKind::Equal, .. }
        ));
        assert!(matches!(
            parse_err("let (a) = t in a"),
            ParseError::UnexpectedToken { expected: "`,'", found: TokenKind::RParen, .. }
        ));
        assert!(matches!(
            parse_err("f x )"),
            ParseError::UnexpectedToken { expected: "end of input", found: TokenKind::RParen, .. }
        ));
        assert!(matches!(
            parse_err("1 + in"),
            ParseError::UnexpectedToken { expected: "expression", found: TokenKind::In, .. }
        ));
        assert!(matches!(
            parse_err(""),
            ParseError::UnexpectedEOI { expected: "expression", .. }
        ));
        assert!(matches!(
            parse_err("99999999999999999999"),
            ParseError::InvalidLiteral { text, .. } if text == "99999999999999999999"
        ));
        assert_eq!(
            parse_err("if a then b").to_string(),
            "1:12: expected `else', found end of input"
        );
    }
}
