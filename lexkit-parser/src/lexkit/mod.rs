//! Main module for lexkit library functionality

pub mod action;
pub mod callback;
pub mod code_point;
pub mod encoding;
pub mod error;
pub mod event;
pub mod grammar;
pub mod input;
pub mod location;
pub mod rules;
pub mod symbol;
pub mod testing;
pub mod tree;

pub use action::{matches, parse, parse_as_tree, validate, Action, ParseResult, Status, ValidateResult};
pub use code_point::{CodePoint, CodePointStatus, DecodeResult};
pub use encoding::{Ascii, Encoding, EncodingKind, Utf16, Utf32, Utf8};
pub use error::{ErrorKind, ParseError};
pub use grammar::{Context, NoWhitespace, ParseOptions, Production};
pub use input::{Buffer, Input, Lexeme, RangeInput, Reader};
pub use location::{input_location, Counting, InputLocation, LineIndex};
pub use tree::ParseTree;
