//! Contract with the external syntax parser.
//!
//! The editor never parses markdown itself. A parser is injected at
//! construction; after each edit the editor hands it the text of every line
//! that changed and stores the returned spans on the document. Without a
//! parser, lines simply carry no tokens.

use scribe_buffer::TokenSpan;

/// Produces highlight spans for one line of text.
///
/// `Send + Sync` so a parser chosen at startup can be shared freely.
pub trait SyntaxParser: Send + Sync {
    /// Returns spans with char columns relative to the start of `line`.
    fn tokenize_line(&self, line: &str) -> Vec<TokenSpan>;
}
