//! Resource limits applied while parsing untrusted query text.

/// Default maximum nesting depth of operator calls.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Hard ceiling on `max_depth`; larger settings are clamped to it so the
/// recursive parser stays well inside a thread's stack.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// Default maximum query length in bytes.
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024;

/// Limits for a single parse.
///
/// # Examples
///
/// ```
/// use callq::ParseOptions;
///
/// let options = ParseOptions { max_depth: 8, ..ParseOptions::default() };
/// assert_eq!(options.max_input_len, 64 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Calls nested deeper than this are rejected with a `NestingTooDeep` error.
    /// Clamped to [`MAX_DEPTH_CEILING`].
    pub max_depth: usize,
    /// Longer input is rejected before lexing.
    pub max_input_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: DEFAULT_MAX_INPUT_LEN,
        }
    }
}
