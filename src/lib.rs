mod block;
pub mod config;
mod error;
mod inline;
mod node;
mod parser;
pub mod site;

pub use block::{BlockKind, Span};
pub use config::Config;
pub use error::{MarkdownError, SiteError};
pub use inline::text_to_spans;
pub use node::HtmlNode;
pub use parser::{classify, extract_title, markdown_to_html_node, split_into_blocks};

/// Convert a Markdown document straight to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> Result<String, MarkdownError> {
    Ok(markdown_to_html_node(markdown)?.to_html())
}
