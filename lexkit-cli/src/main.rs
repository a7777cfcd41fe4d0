//! Command-line interface for lexkit
//! This binary runs the built-in demo grammars over files and prints the errors, the
//! parsed value or the lossless parse tree.
//!
//! Usage:
//!   lexkit `<grammar>` `<path|->` [--mode validate|parse|tree] [--format treeviz|json|yaml]
//!   lexkit --list-grammars
//!
//! Exit status: 0 when the input parsed (possibly after recovering from errors), 1 on a
//! fatal parse error, 2 on usage, configuration or I/O problems.

mod grammars;

use clap::{builder::PossibleValuesParser, value_parser, Arg, ArgAction, ArgMatches, Command};
use grammars::{GrammarName, Mode, Outcome};
use lexkit_config::{LexkitConfig, LoadError, Loader, OutputFormat};
use lexkit_parser::lexkit::tree::{format_snapshot, to_json, to_yaml, TreevizOptions};
use lexkit_parser::lexkit::{Ascii, Counting, Encoding, EncodingKind, LineIndex, Status, Utf16, Utf32, Utf8};
use serde::Serialize;
use std::fmt;
use std::io::Read;
use std::process::ExitCode;

/// Anything that stops the CLI before a parse result exists.
#[derive(Debug)]
enum CliError {
    Config(LoadError),
    Io { path: String, source: std::io::Error },
    Input(String),
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Config(err) => write!(f, "Configuration error: {}", err),
            CliError::Io { path, source } => write!(f, "Cannot read {}: {}", path, source),
            CliError::Input(message) => write!(f, "Invalid input: {}", message),
            CliError::Output(message) => write!(f, "Cannot format output: {}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        CliError::Config(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(err.to_string())
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Output(err.to_string())
    }
}

fn build_cli() -> Command {
    let grammar_names: Vec<&'static str> = GrammarName::ALL.iter().map(|grammar| grammar.name()).collect();
    Command::new("lexkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs the lexkit demo grammars over a file")
        .arg_required_else_help(true)
        .arg(
            Arg::new("grammar")
                .help("Grammar to run (see --list-grammars)")
                .value_parser(PossibleValuesParser::new(grammar_names))
                .required_unless_present("list-grammars")
                .index(1),
        )
        .arg(
            Arg::new("path")
                .help("Input file, or '-' for stdin")
                .required_unless_present("list-grammars")
                .index(2),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("What to produce: validation errors, the parsed value or the parse tree")
                .value_parser(PossibleValuesParser::new(Mode::NAMES))
                .default_value("validate"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from config: treeviz)")
                .value_parser(["treeviz", "json", "yaml"]),
        )
        .arg(
            Arg::new("encoding")
                .long("encoding")
                .short('e')
                .help("Encoding of the input; UTF-16 and UTF-32 are read little-endian")
                .value_parser(["ascii", "utf8", "utf16", "utf32"]),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Deepest allowed production nesting, 0 for no limit")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("hide-whitespace")
                .long("hide-whitespace")
                .help("Leave whitespace tokens out of treeviz output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-grammars")
                .long("list-grammars")
                .help("List the built-in grammars")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();

    if matches.get_flag("list-grammars") {
        handle_list_grammars_command();
        return ExitCode::SUCCESS;
    }

    match handle_run_command(&matches) {
        Ok(Status::FatalError) => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
    }
}

/// Layers the config file and command-line flags over the defaults.
fn load_config(matches: &ArgMatches) -> Result<LexkitConfig, LoadError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("inspect.format", format.as_str())?;
    }
    if let Some(encoding) = matches.get_one::<String>("encoding") {
        loader = loader.set_override("input.encoding", encoding.as_str())?;
    }
    if let Some(depth) = matches.get_one::<u32>("max-depth") {
        loader = loader.set_override("parsing.max_recursion_depth", i64::from(*depth))?;
    }
    if matches.get_flag("hide-whitespace") {
        loader = loader.set_override("inspect.show_whitespace", false)?;
    }
    loader.build()
}

fn read_input(path: &str) -> Result<Vec<u8>, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_string(),
        source,
    };
    if path == "-" {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).map_err(io_error)?;
        Ok(bytes)
    } else {
        std::fs::read(path).map_err(io_error)
    }
}

/// Handle running a grammar over a file
fn handle_run_command(matches: &ArgMatches) -> Result<Status, CliError> {
    let grammar = matches
        .get_one::<String>("grammar")
        .and_then(|name| GrammarName::from_name(name))
        .ok_or_else(|| CliError::Input("no grammar given".to_string()))?;
    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| CliError::Input("no input path given".to_string()))?;
    let mode = matches
        .get_one::<String>("mode")
        .and_then(|name| Mode::from_name(name))
        .unwrap_or(Mode::Validate);

    let config = load_config(matches)?;
    log::debug!("running {} in {:?} mode with {:?}", grammar.name(), mode, config);
    let bytes = read_input(path)?;

    match config.input.encoding {
        EncodingKind::Ascii => run_units::<Ascii>(grammar, mode, path, &bytes, &config),
        EncodingKind::Utf8 => run_units::<Utf8>(grammar, mode, path, &bytes, &config),
        EncodingKind::Utf16 => {
            let units = decode_units(&bytes, EncodingKind::Utf16, u16::from_le_bytes)?;
            run_units::<Utf16>(grammar, mode, path, &units, &config)
        }
        EncodingKind::Utf32 => {
            let units = decode_units(&bytes, EncodingKind::Utf32, u32::from_le_bytes)?;
            run_units::<Utf32>(grammar, mode, path, &units, &config)
        }
    }
}

/// Splits little-endian bytes into code units of `N` bytes.
fn decode_units<const N: usize, U>(
    bytes: &[u8],
    kind: EncodingKind,
    from_bytes: impl Fn([u8; N]) -> U,
) -> Result<Vec<U>, CliError> {
    if bytes.len() % N != 0 {
        return Err(CliError::Input(format!(
            "{} input must be a multiple of {} bytes, got {}",
            kind,
            N,
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut unit = [0u8; N];
            unit.copy_from_slice(chunk);
            from_bytes(unit)
        })
        .collect())
}

/// One reported error with its line and column.
#[derive(Debug, Serialize)]
struct Diagnostic {
    line: usize,
    column: usize,
    #[serde(flatten)]
    error: lexkit_parser::lexkit::ParseError,
}

#[derive(Debug, Serialize)]
struct ValidationReport<'a> {
    status: Status,
    errors: &'a [Diagnostic],
}

fn run_units<E: Encoding>(
    grammar: GrammarName,
    mode: Mode,
    path: &str,
    units: &[E::Unit],
    config: &LexkitConfig,
) -> Result<Status, CliError> {
    let outcome = grammar.run::<E>(mode, units, config.parsing.parse_options())?;

    let lines = LineIndex::<E>::new(units);
    let diagnostics: Vec<Diagnostic> = outcome
        .result
        .errors
        .iter()
        .map(|error| {
            let location = lines.location(error.position(), Counting::CodePoints);
            Diagnostic {
                line: location.line_nr,
                column: location.column_nr,
                error: error.clone(),
            }
        })
        .collect();
    for diagnostic in &diagnostics {
        eprintln!("{}:{}:{}: {}", path, diagnostic.line, diagnostic.column, diagnostic.error);
    }

    let status = outcome.result.status;
    let formatted = format_outcome(mode, &outcome, &diagnostics, config)?;
    print!("{}", formatted);
    Ok(status)
}

fn status_name(status: Status) -> &'static str {
    match status {
        Status::Success => "success",
        Status::RecoveredError => "recovered_error",
        Status::FatalError => "fatal_error",
    }
}

fn format_outcome(
    mode: Mode,
    outcome: &Outcome,
    diagnostics: &[Diagnostic],
    config: &LexkitConfig,
) -> Result<String, CliError> {
    let format = config.inspect.format;
    let formatted = match mode {
        Mode::Validate => match format {
            OutputFormat::Treeviz => format!("{}\n", status_name(outcome.result.status)),
            OutputFormat::Json => {
                let report = ValidationReport {
                    status: outcome.result.status,
                    errors: diagnostics,
                };
                format!("{}\n", serde_json::to_string_pretty(&report)?)
            }
            OutputFormat::Yaml => serde_yaml::to_string(&ValidationReport {
                status: outcome.result.status,
                errors: diagnostics,
            })?,
        },
        // Values have no tree shape; treeviz falls back to JSON.
        Mode::Parse => match (&outcome.value, format) {
            (None, _) => String::new(),
            (Some(value), OutputFormat::Yaml) => serde_yaml::to_string(value)?,
            (Some(value), _) => format!("{}\n", serde_json::to_string_pretty(value)?),
        },
        Mode::Tree => match (&outcome.tree, format) {
            (None, _) => String::new(),
            (Some(snapshot), OutputFormat::Treeviz) => {
                let options = TreevizOptions {
                    show_whitespace: config.inspect.show_whitespace,
                };
                format_snapshot(snapshot, &options)
            }
            (Some(snapshot), OutputFormat::Json) => format!("{}\n", to_json(snapshot)?),
            (Some(snapshot), OutputFormat::Yaml) => to_yaml(snapshot)?,
        },
    };
    Ok(formatted)
}

/// Handle the list-grammars command
fn handle_list_grammars_command() {
    println!("Available grammars:\n");

    for grammar in GrammarName::ALL {
        println!("  {}", grammar.name());
        println!("    {}", grammar.description());
        println!();
    }
}
