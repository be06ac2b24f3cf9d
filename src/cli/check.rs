//! Check callq queries against a schema

use super::CliError;
use crate::{
    ParseOptions, Schema,
    output::{diagnostics_to_json, to_json},
    query::{parse_query_with, parse_syntax},
};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The query to check
    pub query: String,
    /// Schema as JSON text
    pub schema: Option<String>,
    /// Only validate syntax, don't bind
    pub syntax_only: bool,
    pub limits: ParseOptions,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid,
    /// Query bound successfully; the predicate as JSON
    Success(serde_json::Value),
    /// Query rejected, with one message per diagnostic and the JSON form
    Invalid {
        messages: Vec<String>,
        json: serde_json::Value,
    },
}

/// Execute a callq check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        let syntax = parse_syntax(&options.query, &options.limits);
        if syntax.is_ok() {
            return Ok(CheckResult::SyntaxValid);
        }

        let messages = syntax
            .lex_errors
            .iter()
            .map(|e| format!("lex error: {e}"))
            .chain(syntax.parse_errors.iter().map(|e| format!("syntax error: {e}")))
            .collect();
        return Ok(CheckResult::Invalid {
            messages,
            json: serde_json::Value::Null,
        });
    }

    let schema_json = options.schema.as_deref().ok_or(CliError::NoSchema)?;
    let schema = Schema::from_json_str(schema_json)?;

    let result = parse_query_with(&options.query, &schema, &options.limits);
    match &result.value {
        Some(predicate) => Ok(CheckResult::Success(to_json(predicate))),
        None => Ok(CheckResult::Invalid {
            messages: result.diagnostics().map(|d| d.to_string()).collect(),
            json: diagnostics_to_json(&result),
        }),
    }
}
