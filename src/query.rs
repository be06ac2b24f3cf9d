//! The single entry point: query text and schema in, predicate and
//! diagnostics out.

use std::fmt;

use tracing::debug;

use crate::{
    ast::{Node, Predicate},
    binder::{BindError, Binder},
    lexer::{LexError, Position, tokenize_with},
    options::ParseOptions,
    parser::{ParseError, Parser},
    schema::Schema,
    stream::TokenStream,
};

/// Outcome of [`parse_query`]. Never an `Err`: malformed input is described
/// by the three error lists.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// `Some` only when every error list is empty.
    pub value: Option<Predicate>,
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
    pub bind_errors: Vec<BindError>,
}

impl QueryResult {
    pub fn is_ok(&self) -> bool {
        self.value.is_some()
    }

    pub fn error_count(&self) -> usize {
        self.lex_errors.len() + self.parse_errors.len() + self.bind_errors.len()
    }

    /// All errors, lexical first, then syntactic, then semantic.
    pub fn diagnostics(&self) -> impl Iterator<Item = Diagnostic<'_>> {
        self.lex_errors
            .iter()
            .map(Diagnostic::Lex)
            .chain(self.parse_errors.iter().map(Diagnostic::Parse))
            .chain(self.bind_errors.iter().map(Diagnostic::Bind))
    }

    pub fn into_result(self) -> Result<Predicate, QueryError> {
        match self.value {
            Some(predicate) => Ok(predicate),
            None => Err(QueryError {
                lex_errors: self.lex_errors,
                parse_errors: self.parse_errors,
                bind_errors: self.bind_errors,
            }),
        }
    }
}

/// A borrowed error from any stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Diagnostic<'a> {
    Lex(&'a LexError),
    Parse(&'a ParseError),
    Bind(&'a BindError),
}

impl Diagnostic<'_> {
    /// `"lex"`, `"syntax"` or `"semantic"`.
    pub fn stage(&self) -> &'static str {
        match self {
            Diagnostic::Lex(_) => "lex",
            Diagnostic::Parse(_) => "syntax",
            Diagnostic::Bind(_) => "semantic",
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Diagnostic::Lex(e) => e.position(),
            Diagnostic::Parse(e) => e.position(),
            Diagnostic::Bind(e) => e.position(),
        }
    }
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Lex(e) => write!(f, "lex error: {e}"),
            Diagnostic::Parse(e) => write!(f, "syntax error: {e}"),
            Diagnostic::Bind(e) => write!(f, "semantic error: {e}"),
        }
    }
}

/// The error lists of a failed [`QueryResult`], for `?`-style callers.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
    pub bind_errors: Vec<BindError>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.lex_errors.len() + self.parse_errors.len() + self.bind_errors.len();
        write!(f, "invalid query ({count} error(s))")?;

        let first = self
            .lex_errors
            .iter()
            .map(ToString::to_string)
            .chain(self.parse_errors.iter().map(ToString::to_string))
            .chain(self.bind_errors.iter().map(ToString::to_string))
            .next();
        if let Some(first) = first {
            write!(f, ": {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {}

/// Syntax tree and errors of the first two stages.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxResult {
    pub ast: Option<Node>,
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
}

impl SyntaxResult {
    pub fn is_ok(&self) -> bool {
        self.ast.is_some() && self.lex_errors.is_empty() && self.parse_errors.is_empty()
    }
}

/// Lex and parse `text` without binding it.
pub fn parse_syntax(text: &str, options: &ParseOptions) -> SyntaxResult {
    let lexed = tokenize_with(text, options);

    if matches!(lexed.errors.first(), Some(LexError::InputTooLong { .. })) {
        return SyntaxResult {
            ast: None,
            lex_errors: lexed.errors,
            parse_errors: Vec::new(),
        };
    }

    let parsed = Parser::new(TokenStream::new(&lexed.tokens, lexed.end))
        .with_max_depth(options.max_depth)
        .parse();

    debug!(
        tokens = lexed.tokens.len(),
        lex_errors = lexed.errors.len(),
        parse_errors = parsed.errors.len(),
        "parsed query"
    );

    SyntaxResult {
        ast: parsed.ast,
        lex_errors: lexed.errors,
        parse_errors: parsed.errors,
    }
}

/// Parse `text` and bind it to `schema` with the default limits.
///
/// # Examples
///
/// ```
/// use callq::{FieldDescriptor, FieldType, Schema, Value, parse_query};
///
/// let schema = Schema::new().with_field("age", FieldDescriptor::new(FieldType::Number));
/// let result = parse_query("eq(age, 30)", &schema);
///
/// let predicate = result.value.expect("valid query");
/// assert_eq!(predicate.value(), Some(&Value::Integer(30)));
/// ```
pub fn parse_query(text: &str, schema: &Schema) -> QueryResult {
    parse_query_with(text, schema, &ParseOptions::default())
}

/// Parse `text` and bind it to `schema`.
///
/// Binding runs on whatever tree the parser managed to build, even when
/// earlier stages reported errors, so one call surfaces as many problems as
/// possible.
pub fn parse_query_with(text: &str, schema: &Schema, options: &ParseOptions) -> QueryResult {
    let syntax = parse_syntax(text, options);

    let (predicate, bind_errors) = match &syntax.ast {
        Some(ast) => {
            let bound = Binder::new(schema).bind(ast);
            (bound.predicate, bound.errors)
        }
        None => (None, Vec::new()),
    };

    let clean =
        syntax.lex_errors.is_empty() && syntax.parse_errors.is_empty() && bind_errors.is_empty();
    let value = predicate.filter(|_| clean);

    debug!(
        ok = value.is_some(),
        bind_errors = bind_errors.len(),
        "bound query"
    );

    QueryResult {
        value,
        lex_errors: syntax.lex_errors,
        parse_errors: syntax.parse_errors,
        bind_errors,
    }
}
