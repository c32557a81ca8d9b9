//! Runa CLI - Command line interface
//!
//! Drives the rune source, the lexing automaton or the parsing automaton
//! over a file (or stdin) with one of the built-in grammars.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use runa_config::{LogLevel, RunaConfig};
use runa_core::grammars::{self, DemoKind, Grammar};
use runa_core::lexer::LexState;
use runa_core::parser::ParseState;
use runa_core::RuneSource;
use tracing::{debug, info};

mod config;
mod error;
mod logging;
mod platform;

use crate::config::Overrides;
use crate::error::CliError;
use crate::logging::LogFormat;
use crate::platform::print_error_with_source;

const TARGET: &str = "runa::cli";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Print every decoded rune
    Runes,
    /// Run a lexing grammar and print its tokens
    Tokens,
    /// Run a parsing grammar and print the element tree
    Tree,
}

impl Mode {
    fn as_str(&self) -> &'static str {
        match self {
            Mode::Runes => "runes",
            Mode::Tokens => "tokens",
            Mode::Tree => "tree",
        }
    }

    fn default_grammar(&self) -> GrammarName {
        match self {
            Mode::Runes | Mode::Tokens => GrammarName::Pairs,
            Mode::Tree => GrammarName::Arith,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum GrammarName {
    /// `A -> (A) | ε` (lexer)
    Pairs,
    /// Any balanced parentheses (lexer)
    Parens,
    /// Parentheses assembled into nested groups (parser)
    Groups,
    /// `line -> expr EOF`, `expr -> a ('+' expr)?` (parser)
    Arith,
}

impl GrammarName {
    fn as_str(&self) -> &'static str {
        match self {
            GrammarName::Pairs => "pairs",
            GrammarName::Parens => "parens",
            GrammarName::Groups => "groups",
            GrammarName::Arith => "arith",
        }
    }
}

#[derive(Parser)]
#[command(
    name = "runa",
    about = "Runa - table-driven lexing and parsing automata",
    version
)]
struct Cli {
    /// Input file (reads stdin when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// What to print
    #[arg(long, value_enum, default_value_t = Mode::Tree)]
    mode: Mode,

    /// Built-in grammar (default: pairs for tokens, arith for tree)
    #[arg(long, value_enum)]
    grammar: Option<GrammarName>,

    /// Source buffer capacity in bytes
    #[arg(long)]
    capacity: Option<usize>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: "silent", "error", "warn", "info", "debug", "trace"
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    LogLevel::parse(s).ok_or_else(|| format!("unknown log level '{s}'"))
}

fn main() {
    let cli = Cli::parse();

    let overrides = Overrides {
        capacity: cli.capacity,
        log_level: cli.log_level,
    };
    let config = match config::load(cli.config.as_deref())
        .and_then(|config| config::resolve(config, &overrides))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = logging::init_with_file(&config.log, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("error: {e}");
        process::exit(1);
    }

    let input = match read_input(cli.input.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = execute(&cli, &config, &input, &mut stdout) {
        print_error_with_source(&e, &String::from_utf8_lossy(&input));
        process::exit(1);
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, CliError> {
    match path {
        Some(path) => {
            info!(target: TARGET, path = %path.display(), "reading input file");
            std::fs::read(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            info!(target: TARGET, "reading standard input");
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(CliError::Stdin)?;
            Ok(buf)
        }
    }
}

/// 按模式与文法运行，结果写入 `out`
fn execute(
    cli: &Cli,
    config: &RunaConfig,
    input: &[u8],
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let source = RuneSource::from_config(Cursor::new(input), &config.source).map_err(|source| {
        CliError::Source {
            source,
            position: Default::default(),
        }
    })?;
    let grammar = cli.grammar.unwrap_or_else(|| cli.mode.default_grammar());
    debug!(target: TARGET, mode = cli.mode.as_str(), grammar = grammar.as_str(), capacity = config.source.capacity, "executing");

    match (cli.mode, grammar) {
        (Mode::Runes, _) => print_runes(source, out),
        (Mode::Tokens, GrammarName::Pairs) => print_tokens(&grammars::pairs('(', ')')?, source, out),
        (Mode::Tokens, GrammarName::Parens) => print_tokens(&grammars::parens()?, source, out),
        (Mode::Tree, GrammarName::Groups) => print_tree(&grammars::groups()?, source, out),
        (Mode::Tree, GrammarName::Arith) => print_tree(&grammars::arith()?, source, out),
        (mode, grammar) => Err(CliError::GrammarMode {
            grammar: grammar.as_str(),
            mode: mode.as_str(),
        }),
    }
}

fn print_runes<R: Read>(mut source: RuneSource<R>, out: &mut impl io::Write) -> Result<(), CliError> {
    loop {
        let rune = source.next().map_err(|e| CliError::Source {
            position: source.position(),
            source: e,
        })?;
        if rune.is_eof() {
            return Ok(());
        }
        write_line(out, format_args!("rune: {rune}"))?;
    }
}

fn print_tokens<R: Read>(
    grammar: &Grammar<LexState<DemoKind>>,
    source: RuneSource<R>,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let mut machine = grammar.lexer(source).map_err(|source| CliError::Lex {
        source,
        position: Default::default(),
    })?;

    loop {
        let token = machine.next_token().map_err(|source| CliError::Lex {
            position: machine.position(),
            source,
        })?;
        if token.is_end_of_lexing() {
            break;
        }
        let kind = token.user_kind().map_or("-".to_string(), DemoKind::to_string);
        write_line(out, format_args!("{}\t{}\t{}", token.span.start, kind, token))?;
    }

    if machine.is_matched() {
        write_line(out, format_args!("matcher: matched"))?;
        Ok(())
    } else {
        let depth = machine.matcher().depth();
        write_line(out, format_args!("matcher: unmatched ({depth} open)"))?;
        Err(CliError::Unmatched {
            depth,
            position: machine.position(),
        })
    }
}

fn print_tree<R: Read>(
    grammar: &Grammar<ParseState<DemoKind>>,
    source: RuneSource<R>,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let mut machine = grammar.parser(source);
    let outcome = machine.run().map(|_| ());
    if let Err(source) = outcome {
        return Err(CliError::Parse {
            position: machine.position(),
            source,
        });
    }
    let tree = machine.into_tree().map_err(|source| CliError::Parse {
        source,
        position: Default::default(),
    })?;
    info!(target: TARGET, nodes = tree.size(), depth = tree.depth(), "parsed element tree");
    write_line(out, format_args!("{}", tree.to_string().trim_end()))
}

fn write_line(out: &mut impl io::Write, args: fmt::Arguments<'_>) -> Result<(), CliError> {
    writeln!(out, "{args}").map_err(CliError::Write)
}
