use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::block::Span;
use crate::error::MarkdownError;
use crate::node::HtmlNode;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\[\]]*)\]\(([^\(\)]*)\)").unwrap());

// The regex crate has no look-behind, so a leading `!` is matched here and
// rejected in `split_links`.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\[\]]*)\]\(([^\(\)]*)\)").unwrap());

/// Split one block's text into typed inline spans.
///
/// Passes run in a fixed order and each one only re-splits spans that are
/// still plain text: code, bold, italic, images, then links.
pub fn text_to_spans(text: &str) -> Result<Vec<Span>, MarkdownError> {
    let spans = vec![Span::Text(text.to_string())];
    let spans = split_delimiter(spans, "`", Span::Code)?;
    let spans = split_delimiter(spans, "**", Span::Bold)?;
    let spans = split_delimiter(spans, "_", Span::Italic)?;
    let spans = split_images(spans);
    Ok(split_links(spans))
}

/// Convert inline Markdown straight to leaf nodes.
///
/// Always yields at least one node so that the enclosing container has
/// something to render.
pub fn text_to_children(text: &str) -> Result<Vec<HtmlNode>, MarkdownError> {
    let children: Vec<HtmlNode> = text_to_spans(text)?.into_iter().map(span_to_node).collect();
    if children.is_empty() {
        return Ok(vec![HtmlNode::text("")]);
    }
    Ok(children)
}

pub fn span_to_node(span: Span) -> HtmlNode {
    match span {
        Span::Text(text) => HtmlNode::text(text),
        Span::Bold(text) => HtmlNode::leaf("b", text),
        Span::Italic(text) => HtmlNode::leaf("i", text),
        Span::Code(text) => HtmlNode::leaf("code", text),
        Span::Link { text, url } => HtmlNode::leaf("a", text).with_attribute("href", quoted(&url)),
        Span::Image { alt, url } => HtmlNode::leaf("img", "")
            .with_attribute("alt", quoted(&alt))
            .with_attribute("src", quoted(&url)),
    }
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

/// Pieces between delimiters alternate plain, styled, plain, ... so a
/// balanced text always splits into an odd number of pieces.
fn split_delimiter(
    spans: Vec<Span>,
    delimiter: &'static str,
    styled: fn(String) -> Span,
) -> Result<Vec<Span>, MarkdownError> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let Span::Text(text) = span else {
            out.push(span);
            continue;
        };

        let pieces: Vec<&str> = text.split(delimiter).collect();
        if pieces.len() % 2 == 0 {
            return Err(MarkdownError::UnclosedDelimiter { delimiter });
        }

        for (i, piece) in pieces.into_iter().enumerate() {
            if piece.is_empty() {
                continue;
            }
            if i % 2 == 0 {
                out.push(Span::Text(piece.to_string()));
            } else {
                out.push(styled(piece.to_string()));
            }
        }
    }

    Ok(out)
}

fn split_images(spans: Vec<Span>) -> Vec<Span> {
    split_pattern(spans, &IMAGE_RE, |caps| {
        Some(Span::Image {
            alt: caps[1].to_string(),
            url: caps[2].to_string(),
        })
    })
}

fn split_links(spans: Vec<Span>) -> Vec<Span> {
    split_pattern(spans, &LINK_RE, |caps| {
        if caps[0].starts_with('!') {
            return None;
        }
        Some(Span::Link {
            text: caps[1].to_string(),
            url: caps[2].to_string(),
        })
    })
}

/// Replace every non-overlapping match in plain spans with the span built by
/// `make`. Matches for which `make` returns `None` stay plain text.
fn split_pattern(
    spans: Vec<Span>,
    pattern: &Regex,
    make: impl Fn(&Captures) -> Option<Span>,
) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let Span::Text(text) = span else {
            out.push(span);
            continue;
        };

        let mut cursor = 0;
        for caps in pattern.captures_iter(&text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let Some(typed) = make(&caps) else {
                continue;
            };
            if whole.start() > cursor {
                out.push(Span::Text(text[cursor..whole.start()].to_string()));
            }
            out.push(typed);
            cursor = whole.end();
        }

        if cursor == 0 {
            out.push(Span::Text(text));
        } else if cursor < text.len() {
            out.push(Span::Text(text[cursor..].to_string()));
        }
    }

    out
}
