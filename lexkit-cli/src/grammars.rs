//! Built-in demo grammars
//!
//! Every grammar is generic over the encoding so the same productions run over ASCII,
//! UTF-8, UTF-16 and UTF-32 input.
//!
//!   - `int-list`: comma separated integers. A malformed item is reported and replaced
//!     by `0`, so only a broken list structure is fatal.
//!   - `shell`: one builtin command per line (or `;`), followed by words, quoted strings
//!     and `$variables`.

use lexkit_parser::lexkit::callback::{as_list, callback, AsList, Callback, FnCallback};
use lexkit_parser::lexkit::event::TokenKind;
use lexkit_parser::lexkit::grammar::{ProductionValue, RuleOutput};
use lexkit_parser::lexkit::rules::{
    ascii, branch, capture, code_point, digits, eof, identifier, integer, lit, list, newline, p, seq, symbol, token,
    try_, ws, AsciiClass, Branched, Capture, Choice, CodePointToken, Eof, Identifier, Integer, Literal, Newline,
    OptList, ProductionRef, Seq, SepList, SymbolIdentifier, TokenOf, Try, Ws,
};
use lexkit_parser::lexkit::symbol::SymbolTable;
use lexkit_parser::lexkit::tree::TreeSnapshot;
use lexkit_parser::lexkit::{
    Action, CodePoint, Encoding, Lexeme, NoWhitespace, ParseOptions, ParseTree, Production, RangeInput,
    ValidateResult,
};
use lexkit_parser::{choice, seq};
use once_cell::sync::Lazy;
use serde::Serialize;

/// What to do with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Validate,
    Parse,
    Tree,
}

impl Mode {
    pub const NAMES: [&'static str; 3] = ["validate", "parse", "tree"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "validate" => Some(Mode::Validate),
            "parse" => Some(Mode::Parse),
            "tree" => Some(Mode::Tree),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarName {
    IntList,
    Shell,
}

impl GrammarName {
    pub const ALL: [GrammarName; 2] = [GrammarName::IntList, GrammarName::Shell];

    pub fn name(self) -> &'static str {
        match self {
            GrammarName::IntList => "int-list",
            GrammarName::Shell => "shell",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GrammarName::IntList => "Comma separated unsigned integers, e.g. `1, 2, 3`",
            GrammarName::Shell => "Builtin commands with words, \"quoted strings\" and $variables",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|grammar| grammar.name() == name)
    }

    /// Runs the grammar over `units`.
    pub fn run<E: Encoding>(
        self,
        mode: Mode,
        units: &[E::Unit],
        options: ParseOptions,
    ) -> Result<Outcome, serde_json::Error> {
        match self {
            GrammarName::IntList => run_production::<E, IntList>(mode, units, options, present_int_list),
            GrammarName::Shell => run_production::<E, Script>(mode, units, options, present_script::<E>),
        }
    }
}

/// Result of one run, in a shape the output formats can serialize.
#[derive(Debug)]
pub struct Outcome {
    pub result: ValidateResult,
    /// The parsed value in `parse` mode.
    pub value: Option<serde_json::Value>,
    /// The parse tree in `tree` mode.
    pub tree: Option<TreeSnapshot>,
}

fn run_production<E, P>(
    mode: Mode,
    units: &[E::Unit],
    options: ParseOptions,
    present: fn(ProductionValue<E, P>, &[E::Unit]) -> serde_json::Result<serde_json::Value>,
) -> Result<Outcome, serde_json::Error>
where
    E: Encoding,
    P: Production<E>,
    P::Value: Callback<RuleOutput<E, P>>,
{
    let input = RangeInput::<E>::new(units);
    let action = Action::new(&input).options(options);
    let outcome = match mode {
        Mode::Validate => Outcome {
            result: action.validate::<P>(),
            value: None,
            tree: None,
        },
        Mode::Parse => {
            let parsed = action.parse::<P>();
            let value = match parsed.value {
                Some(value) => Some(present(value, units)?),
                None => None,
            };
            Outcome {
                result: ValidateResult {
                    status: parsed.status,
                    errors: parsed.errors,
                },
                value,
                tree: None,
            }
        }
        Mode::Tree => {
            let mut tree = ParseTree::new();
            let result = action.parse_as_tree::<P>(&mut tree);
            Outcome {
                result,
                value: None,
                tree: tree.snapshot_units::<E>(units),
            }
        }
    };
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// int-list
// ---------------------------------------------------------------------------

pub struct IntList;

impl<E: Encoding> Production<E> for IntList {
    const NAME: &'static str = "int-list";
    type Rule = Seq<Ws, Seq<SepList<Try<Integer<u64>>, Literal>, Eof>>;
    type Whitespace = AsciiClass;
    type Value = AsList<Vec<u64>>;

    fn rule() -> Self::Rule {
        seq!(ws(), list(try_(integer::<u64>(digits()))).sep(lit(",")), eof())
    }

    fn whitespace() -> Option<AsciiClass> {
        Some(ascii::space())
    }

    fn value() -> Self::Value {
        as_list::<Vec<u64>>()
    }
}

fn present_int_list<U>(values: Vec<u64>, _units: &[U]) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(values)
}

// ---------------------------------------------------------------------------
// shell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    Cd,
    Echo,
    Exit,
    Export,
    Ls,
    Pwd,
}

static BUILTINS: Lazy<SymbolTable<Builtin>> = Lazy::new(|| {
    SymbolTable::new()
        .map("cd", Builtin::Cd)
        .map("echo", Builtin::Echo)
        .map("exit", Builtin::Exit)
        .map("export", Builtin::Export)
        .map("ls", Builtin::Ls)
        .map("pwd", Builtin::Pwd)
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    Word(Lexeme),
    Quoted(Lexeme),
    Variable(Lexeme),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub builtin: Builtin,
    pub args: Vec<Arg>,
}

fn command(builtin: Builtin, args: Vec<Arg>) -> Command {
    Command { builtin, args }
}

fn is_word_char(cp: CodePoint) -> bool {
    match cp.to_char() {
        Some(c) => !c.is_whitespace() && !c.is_control() && !matches!(c, '"' | '$' | ';'),
        None => false,
    }
}

fn is_string_char(cp: CodePoint) -> bool {
    !matches!(cp.to_char(), Some('"' | '\n') | None)
}

/// `command*` separated by line breaks; blank lines are whitespace.
pub struct Script;

impl<E: Encoding> Production<E> for Script {
    const NAME: &'static str = "script";
    type Rule = Seq<Ws, Seq<OptList<ProductionRef<Statement>>, Eof>>;
    type Whitespace = AsciiClass;
    type Value = AsList<Vec<Command>>;

    fn rule() -> Self::Rule {
        seq!(ws(), list(p::<Statement>()).or_empty(), eof())
    }

    fn whitespace() -> Option<AsciiClass> {
        Some(ascii::space())
    }

    fn value() -> Self::Value {
        as_list::<Vec<Command>>()
    }
}

type BuiltinName = SymbolIdentifier<Builtin, AsciiClass, AsciiClass>;
type Terminator = Choice<Literal, Choice<Newline, Eof>>;

/// `builtin argument* (";" | newline | EOF)`
pub struct Statement;

impl<E: Encoding> Production<E> for Statement {
    const NAME: &'static str = "command";
    type Rule = Branched<BuiltinName, Seq<ProductionRef<Arguments>, Terminator>>;
    type Whitespace = AsciiClass;
    type Value = FnCallback<fn(Builtin, Vec<Arg>) -> Command>;

    fn rule() -> Self::Rule {
        let name = symbol(&*BUILTINS).identifier(identifier(ascii::alpha(), ascii::alnum_underscore()));
        branch(name, seq(p::<Arguments>(), choice!(lit(";"), newline(), eof())))
    }

    // Line breaks end a command, so only blanks are skipped inside one.
    fn whitespace() -> Option<AsciiClass> {
        Some(ascii::blank())
    }

    fn value() -> Self::Value {
        callback(command as fn(Builtin, Vec<Arg>) -> Command)
    }
}

type ArgumentRule = Choice<ProductionRef<Quoted>, Choice<ProductionRef<Variable>, ProductionRef<Word>>>;

pub struct Arguments;

impl<E: Encoding> Production<E> for Arguments {
    const NAME: &'static str = "arguments";
    type Rule = OptList<ArgumentRule>;
    type Whitespace = NoWhitespace;
    type Value = AsList<Vec<Arg>>;

    fn rule() -> Self::Rule {
        list(choice!(p::<Quoted>(), p::<Variable>(), p::<Word>())).or_empty()
    }

    fn value() -> Self::Value {
        as_list::<Vec<Arg>>()
    }
}

/// `"..."` on a single line, without escapes.
pub struct Quoted;

impl<E: Encoding> Production<E> for Quoted {
    const NAME: &'static str = "quoted";
    const IS_TOKEN: bool = true;
    type Rule = Branched<Literal, Seq<Capture<TokenOf<OptList<CodePointToken>>>, Literal>>;
    type Whitespace = NoWhitespace;
    type Value = FnCallback<fn(Lexeme) -> Arg>;

    fn rule() -> Self::Rule {
        let body = list(code_point().if_("string character", is_string_char)).or_empty();
        branch(
            lit("\""),
            seq(capture(token(body).with_kind(TokenKind::Custom("string"))), lit("\"")),
        )
    }

    fn value() -> Self::Value {
        callback(Arg::Quoted as fn(Lexeme) -> Arg)
    }
}

/// `$name`
pub struct Variable;

impl<E: Encoding> Production<E> for Variable {
    const NAME: &'static str = "variable";
    const IS_TOKEN: bool = true;
    type Rule = Branched<Literal, Capture<Identifier<AsciiClass, AsciiClass>>>;
    type Whitespace = NoWhitespace;
    type Value = FnCallback<fn(Lexeme) -> Arg>;

    fn rule() -> Self::Rule {
        branch(
            lit("$"),
            capture(identifier(ascii::alpha_underscore(), ascii::alnum_underscore())),
        )
    }

    fn value() -> Self::Value {
        callback(Arg::Variable as fn(Lexeme) -> Arg)
    }
}

pub struct Word;

impl<E: Encoding> Production<E> for Word {
    const NAME: &'static str = "word";
    type Rule = Capture<Identifier<CodePointToken, CodePointToken>>;
    type Whitespace = NoWhitespace;
    type Value = FnCallback<fn(Lexeme) -> Arg>;

    fn rule() -> Self::Rule {
        let word_char = code_point().if_("word character", is_word_char);
        capture(identifier(word_char, word_char))
    }

    fn value() -> Self::Value {
        callback(Arg::Word as fn(Lexeme) -> Arg)
    }
}

#[derive(Debug, Serialize)]
struct CommandView {
    command: Builtin,
    args: Vec<ArgView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum ArgView {
    Word(String),
    Quoted(String),
    Variable(String),
}

fn present_script<E: Encoding>(commands: Vec<Command>, units: &[E::Unit]) -> serde_json::Result<serde_json::Value> {
    let text = |lexeme: Lexeme| E::to_display(lexeme.units(units));
    let views: Vec<CommandView> = commands
        .into_iter()
        .map(|command| CommandView {
            command: command.builtin,
            args: command
                .args
                .into_iter()
                .map(|arg| match arg {
                    Arg::Word(lexeme) => ArgView::Word(text(lexeme)),
                    Arg::Quoted(lexeme) => ArgView::Quoted(text(lexeme)),
                    Arg::Variable(lexeme) => ArgView::Variable(text(lexeme)),
                })
                .collect(),
        })
        .collect();
    serde_json::to_value(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexkit_parser::lexkit::input::string_input;
    use lexkit_parser::lexkit::tree::to_treeviz;
    use lexkit_parser::lexkit::{parse, parse_as_tree, validate, ErrorKind, Status, Utf16, Utf8};

    fn words<'a>(text: &'a str, args: &[Arg]) -> Vec<&'a str> {
        args.iter()
            .map(|arg| match arg {
                Arg::Word(lexeme) | Arg::Quoted(lexeme) | Arg::Variable(lexeme) => lexeme.text(text),
            })
            .collect()
    }

    #[test]
    fn test_int_list_recovers_bad_items() {
        let result = parse::<IntList, _>(&string_input(" 1,,3"));
        assert_eq!(result.status, Status::RecoveredError);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.into_value(), Some(vec![1, 0, 3]));
    }

    #[test]
    fn test_int_list_trailing_garbage_is_fatal() {
        let result = validate::<IntList, _>(&string_input("1,x"));
        assert!(result.is_fatal());
    }

    #[test]
    fn test_shell_commands() {
        let text = "echo hi \"a b\" $HOME\n\ncd /tmp; pwd\n";
        let commands = parse::<Script, _>(&string_input(text)).into_value().unwrap();
        let builtins: Vec<Builtin> = commands.iter().map(|command| command.builtin).collect();
        assert_eq!(builtins, vec![Builtin::Echo, Builtin::Cd, Builtin::Pwd]);
        assert_eq!(words(text, &commands[0].args), vec!["hi", "a b", "HOME"]);
        assert!(matches!(commands[0].args[1], Arg::Quoted(_)));
        assert!(matches!(commands[0].args[2], Arg::Variable(_)));
        assert_eq!(words(text, &commands[1].args), vec!["/tmp"]);
        assert!(commands[2].args.is_empty());
    }

    #[test]
    fn test_shell_empty_script() {
        let result = parse::<Script, _>(&string_input("  \n"));
        assert!(result.is_success());
        assert_eq!(result.into_value(), Some(vec![]));
    }

    #[test]
    fn test_shell_unknown_command_ends_script() {
        // "frob" is no builtin, so the script has to end before it
        let result = validate::<Script, _>(&string_input("echo 1\nfrob x"));
        assert!(result.is_fatal());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::ExpectedCharClass { name: "EOF" });
        assert_eq!(result.errors[0].range, 7..7);
        assert_eq!(result.errors[0].production, "script");
    }

    #[test]
    fn test_shell_unterminated_string() {
        let result = validate::<Script, _>(&string_input("echo \"open"));
        assert!(result.is_fatal());
        assert_eq!(result.errors[0].production, "quoted");
    }

    #[test]
    fn test_shell_tree() {
        let text = "ls \"\"";
        let mut tree = ParseTree::new();
        assert!(parse_as_tree::<Script, _>(&mut tree, &string_input(text)).is_success());
        insta::assert_snapshot!(to_treeviz::<Utf8>(&tree, text.as_bytes()), @r###"
        script 0..5
        ├─ command 0..5
        │ ├─ identifier "ls"
        │ ├─ whitespace " "
        │ ├─ arguments 3..5
        │ │ └─ quoted 3..5
        │ │   ├─ literal "\""
        │ │   ├─ string ""
        │ │   └─ literal "\""
        │ └─ eof ""
        └─ eof ""
        "###);
    }

    #[test]
    fn test_present_script_over_utf16() {
        let units = Utf16::encode_str("export $PATH");
        let outcome = GrammarName::Shell
            .run::<Utf16>(Mode::Parse, &units, ParseOptions::default())
            .unwrap();
        assert!(outcome.result.is_success());
        assert_eq!(
            outcome.value,
            Some(serde_json::json!([{ "command": "export", "args": [{ "variable": "PATH" }] }]))
        );
    }

    #[test]
    fn test_grammar_names() {
        assert_eq!(GrammarName::from_name("shell"), Some(GrammarName::Shell));
        assert_eq!(GrammarName::from_name("json"), None);
        assert_eq!(Mode::from_name("tree"), Some(Mode::Tree));
    }
}
