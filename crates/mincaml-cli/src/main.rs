use anyhow::Context as _;
use clap::Parser;
use mincaml_syntax::{lexer::tokenize, parser::parse, token::Source};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Print the tokens instead of the syntax tree.
    #[arg(long)]
    tokens: bool,

    /// The path of the source file. Read from stdin if omitted.
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::trace!("CLI args = {:?}", args);

    let source = match &args.input {
        Some(path) => Source::from_file(path)?,
        None => Source::from_stdin()?,
    };

    let tokens = tokenize(&source).context("lex error")?;
    if args.tokens {
        for token in &tokens {
            println!("{} {:?} {:?}", token.span(), token.kind, token.text);
        }
        return Ok(());
    }

    let ast = parse(&source, &tokens)
        .with_context(|| anyhow::anyhow!("failed to parse {}", source.name()))?;
    print!("{}", ast.display());

    Ok(())
}
