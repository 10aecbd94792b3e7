//! Syntax tree, spans and symbols of MinCaml programs.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;
