use std::sync::LazyLock;

use regex::Regex;

use crate::block::BlockKind;
use crate::error::MarkdownError;
use crate::inline::text_to_children;
use crate::node::HtmlNode;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6} ").unwrap());
static ORDERED_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+)\. ").unwrap());

const FENCE: &str = "```";

/// Split a document into blocks separated by blank lines.
///
/// Blocks are trimmed and whitespace-only blocks are dropped; single
/// newlines inside a block are kept.
pub fn split_into_blocks(markdown: &str) -> Vec<&str> {
    markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// Classify a block. The first matching rule wins and anything unrecognized
/// is a paragraph.
pub fn classify(block: &str) -> BlockKind {
    let lines: Vec<&str> = block.split('\n').collect();
    let first = lines.first().copied().unwrap_or_default();
    let last = lines.last().copied().unwrap_or_default();

    if HEADING_RE.is_match(first) {
        let level = first.bytes().take_while(|&b| b == b'#').count();
        return BlockKind::Heading(level as u8);
    }

    if first.starts_with(FENCE) && last.ends_with(FENCE) {
        return BlockKind::Code;
    }

    if lines.iter().all(|line| line.starts_with('>')) {
        return BlockKind::Quote;
    }

    if lines.iter().all(|line| line.starts_with("- ")) {
        return BlockKind::UnorderedList;
    }

    if is_ordered_list(&lines) {
        return BlockKind::OrderedList;
    }

    BlockKind::Paragraph
}

/// Every line must be numbered, counting up from 1 without gaps.
fn is_ordered_list(lines: &[&str]) -> bool {
    lines.iter().enumerate().all(|(i, line)| {
        ORDERED_ITEM_RE
            .captures(line)
            .and_then(|caps| caps[1].parse::<usize>().ok())
            .is_some_and(|n| n == i + 1)
    })
}

/// Convert a whole Markdown document into one `div` holding a node per block.
pub fn markdown_to_html_node(markdown: &str) -> Result<HtmlNode, MarkdownError> {
    let mut children = Vec::new();
    for block in split_into_blocks(markdown) {
        children.push(block_to_node(block, classify(block))?);
    }

    // An empty document still renders as an empty container.
    if children.is_empty() {
        children.push(HtmlNode::text(""));
    }

    Ok(HtmlNode::parent("div", children))
}

fn block_to_node(block: &str, kind: BlockKind) -> Result<HtmlNode, MarkdownError> {
    match kind {
        BlockKind::Paragraph => paragraph_to_node(block),
        BlockKind::Heading(level) => heading_to_node(block, usize::from(level)),
        BlockKind::Code => code_to_node(block),
        BlockKind::Quote => quote_to_node(block),
        BlockKind::UnorderedList => unordered_list_to_node(block),
        BlockKind::OrderedList => ordered_list_to_node(block),
    }
}

fn paragraph_to_node(block: &str) -> Result<HtmlNode, MarkdownError> {
    let text = block.split('\n').collect::<Vec<_>>().join(" ");
    Ok(HtmlNode::parent("p", text_to_children(&text)?))
}

fn heading_to_node(block: &str, level: usize) -> Result<HtmlNode, MarkdownError> {
    if level + 1 >= block.len() {
        return Err(MarkdownError::InvalidHeading { level });
    }

    let text = &block[level + 1..];
    Ok(HtmlNode::parent(format!("h{level}"), text_to_children(text)?))
}

/// The body of a code block is never inline-parsed.
fn code_to_node(block: &str) -> Result<HtmlNode, MarkdownError> {
    if !block.starts_with(FENCE) || !block.ends_with(FENCE) {
        return Err(MarkdownError::InvalidCodeBlock);
    }

    // The opening line, including any info string, is not part of the body.
    let end = block.len() - FENCE.len();
    let content = match block.split_once('\n') {
        Some((opening, _)) => &block[opening.len() + 1..end],
        None if block.len() >= 2 * FENCE.len() => &block[FENCE.len()..end],
        None => "",
    };

    let code = HtmlNode::parent("code", vec![HtmlNode::text(content)]);
    Ok(HtmlNode::parent("pre", vec![code]))
}

fn quote_to_node(block: &str) -> Result<HtmlNode, MarkdownError> {
    let mut lines = Vec::new();
    for line in block.split('\n') {
        if !line.starts_with('>') {
            return Err(MarkdownError::InvalidQuoteBlock);
        }
        lines.push(line.trim_start_matches('>').trim());
    }

    let text = lines.join(" ");
    Ok(HtmlNode::parent("blockquote", text_to_children(&text)?))
}

fn unordered_list_to_node(block: &str) -> Result<HtmlNode, MarkdownError> {
    let items = block
        .split('\n')
        .map(|line| list_item(line.strip_prefix("- ").unwrap_or(line)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HtmlNode::parent("ul", items))
}

fn ordered_list_to_node(block: &str) -> Result<HtmlNode, MarkdownError> {
    let items = block
        .split('\n')
        .map(|line| list_item(&ORDERED_ITEM_RE.replace(line, "")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HtmlNode::parent("ol", items))
}

fn list_item(text: &str) -> Result<HtmlNode, MarkdownError> {
    Ok(HtmlNode::parent("li", text_to_children(text)?))
}

/// Text of the first `# ` heading line in the document.
///
/// Lines are trimmed before matching, so indented headings count; `##` and
/// deeper do not.
pub fn extract_title(markdown: &str) -> Result<String, MarkdownError> {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .ok_or(MarkdownError::MissingTitle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn to_html(markdown: &str) -> String {
        markdown_to_html_node(markdown).unwrap().to_html()
    }

    #[test]
    fn blocks_split_on_blank_lines() {
        let md = "This is **bolded** paragraph\n\n\
                  This is another paragraph with _italic_ text and `code` here\n\
                  This is the same paragraph on a new line\n\n\
                  - This is a list\n- with items";
        assert_eq!(
            split_into_blocks(md),
            vec![
                "This is **bolded** paragraph",
                "This is another paragraph with _italic_ text and `code` here\n\
                 This is the same paragraph on a new line",
                "- This is a list\n- with items",
            ]
        );
    }

    #[rstest]
    #[case("", vec![])]
    #[case("   \n   \n", vec![])]
    #[case("Para one\n\n\n\nPara two", vec!["Para one", "Para two"])]
    #[case("\n\nFirst block\n\nSecond block\n\n", vec!["First block", "Second block"])]
    #[case("Line with indent\n    Still indented", vec!["Line with indent\n    Still indented"])]
    fn split_edge_cases(#[case] md: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_into_blocks(md), expected);
    }

    #[test]
    fn blocks_are_never_blank() {
        let md = "\n\n  \n\na\n\n \t \n\nb\n\n\n";
        let blocks = split_into_blocks(md);
        assert_eq!(blocks, vec!["a", "b"]);
        assert!(blocks.iter().all(|b| !b.trim().is_empty()));
    }

    #[rstest]
    #[case("This is a normal paragraph with text.", BlockKind::Paragraph)]
    #[case("# heading", BlockKind::Heading(1))]
    #[case("### Subheading level 3", BlockKind::Heading(3))]
    #[case("###### six", BlockKind::Heading(6))]
    #[case("####### seven", BlockKind::Paragraph)]
    #[case("#nospace", BlockKind::Paragraph)]
    #[case("```\nprint('Hello')\n```", BlockKind::Code)]
    #[case("``````", BlockKind::Code)]
    #[case("```\nNot a real code block", BlockKind::Paragraph)]
    #[case("> This is a quote\n> continued on next line", BlockKind::Quote)]
    #[case("> Quote line\n- Not a list", BlockKind::Paragraph)]
    #[case("- item 1\n- item 2\n- item 3", BlockKind::UnorderedList)]
    #[case("-item", BlockKind::Paragraph)]
    #[case("1. First item\n2. Second item\n3. Third item", BlockKind::OrderedList)]
    #[case("1. a\n3. b", BlockKind::Paragraph)]
    #[case("2. a\n3. b", BlockKind::Paragraph)]
    #[case("1. a\n2.b", BlockKind::Paragraph)]
    fn classification(#[case] block: &str, #[case] expected: BlockKind) {
        assert_eq!(classify(block), expected);
    }

    #[test]
    fn classification_is_deterministic() {
        let block = "1. one\n2. two";
        assert_eq!(classify(block), classify(block));
    }

    #[test]
    fn heading_round_trip() {
        assert_eq!(to_html("# Title"), "<div><h1>Title</h1></div>");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(
            to_html("## Two\n\n###### Six **bold**"),
            "<div><h2>Two</h2><h6>Six <b>bold</b></h6></div>"
        );
    }

    #[test]
    fn heading_without_text_is_rejected() {
        assert_eq!(
            heading_to_node("# ", 1),
            Err(MarkdownError::InvalidHeading { level: 1 })
        );
        assert_eq!(
            heading_to_node("### ", 3),
            Err(MarkdownError::InvalidHeading { level: 3 })
        );
    }

    #[test]
    fn paragraphs() {
        let md = "\nThis is **bolded** paragraph\ntext in a p\ntag here\n\n\
                  This is another paragraph with _italic_ text and `code` here\n\n    ";
        assert_eq!(
            to_html(md),
            "<div><p>This is <b>bolded</b> paragraph text in a p tag here</p>\
             <p>This is another paragraph with <i>italic</i> text \
             and <code>code</code> here</p></div>"
        );
    }

    #[test]
    fn code_block_is_not_inline_parsed() {
        let md = "```\nThis is text that _should_ remain\nthe **same** even with inline stuff\n```";
        assert_eq!(
            to_html(md),
            "<div><pre><code>This is text that _should_ remain\n\
             the **same** even with inline stuff\n</code></pre></div>"
        );
    }

    #[test]
    fn code_block_keeps_delimiters_verbatim() {
        let html = to_html("```\n_a_ **b**\n```");
        assert!(html.contains("_a_"));
        assert!(html.contains("**b**"));
        assert!(!html.contains("<i>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn code_block_info_string_is_dropped() {
        assert_eq!(
            to_html("```rust\nlet x = 1;\n```"),
            "<div><pre><code>let x = 1;\n</code></pre></div>"
        );
    }

    #[test]
    fn heading_level_comes_from_classification() {
        let block = "#### Four";
        let BlockKind::Heading(level) = classify(block) else {
            panic!("expected a heading");
        };
        assert_eq!(
            block_to_node(block, classify(block)).unwrap(),
            heading_to_node(block, usize::from(level)).unwrap()
        );
        assert_eq!(
            block_to_node(block, classify(block)).unwrap().to_html(),
            "<h4>Four</h4>"
        );
    }

    #[test]
    fn single_line_code_blocks() {
        assert_eq!(to_html("``````"), "<div><pre><code></code></pre></div>");
        assert_eq!(to_html("```a `b` c```"), "<div><pre><code>a `b` c</code></pre></div>");
    }

    #[test]
    fn unfenced_code_is_rejected() {
        assert_eq!(code_to_node("```\nopen"), Err(MarkdownError::InvalidCodeBlock));
    }

    #[test]
    fn quote_lines_are_joined() {
        assert_eq!(
            to_html("> This is a\n> blockquote block\n>> with _emphasis_"),
            "<div><blockquote>This is a blockquote block with <i>emphasis</i></blockquote></div>"
        );
    }

    #[test]
    fn quote_requires_marker_on_every_line() {
        assert_eq!(
            quote_to_node("> one\ntwo"),
            Err(MarkdownError::InvalidQuoteBlock)
        );
    }

    #[test]
    fn unordered_list() {
        assert_eq!(
            to_html("- one\n- two"),
            "<div><ul><li>one</li><li>two</li></ul></div>"
        );
    }

    #[test]
    fn ordered_list() {
        assert_eq!(
            to_html("1. first\n2. `second`\n3. [third](/3)"),
            "<div><ol><li>first</li><li><code>second</code></li>\
             <li><a href=\"/3\">third</a></li></ol></div>"
        );
    }

    #[test]
    fn out_of_sequence_list_is_a_paragraph() {
        assert_eq!(to_html("1. a\n3. b"), "<div><p>1. a 3. b</p></div>");
    }

    #[test]
    fn mixed_document() {
        let md = "# Tolkien Fan Club\n\n\
                  ![JRR Tolkien sitting](/images/tolkien.png)\n\n\
                  > All that is gold does not glitter\n\n\
                  - Gandalf\n- Bilbo";
        assert_eq!(
            to_html(md),
            "<div><h1>Tolkien Fan Club</h1>\
             <p><img alt=\"JRR Tolkien sitting\" src=\"/images/tolkien.png\"></img></p>\
             <blockquote>All that is gold does not glitter</blockquote>\
             <ul><li>Gandalf</li><li>Bilbo</li></ul></div>"
        );
    }

    #[test]
    fn empty_document_is_an_empty_div() {
        assert_eq!(to_html("\n\n"), "<div></div>");
    }

    #[test]
    fn content_error_aborts_document() {
        assert_eq!(
            markdown_to_html_node("# Fine\n\nbroken **bold"),
            Err(MarkdownError::UnclosedDelimiter { delimiter: "**" })
        );
    }

    #[rstest]
    #[case("# Hello", "Hello")]
    #[case("  #   Hello World   ", "Hello World")]
    #[case("# First Title\n## Subheading\n# Another Title", "First Title")]
    #[case("# First\n# Second", "First")]
    #[case("Intro\n\n## Sub\n\n# Late title", "Late title")]
    fn titles(#[case] md: &str, #[case] expected: &str) {
        assert_eq!(extract_title(md).unwrap(), expected);
    }

    #[rstest]
    #[case("## Sub\nNo h1 here")]
    #[case("")]
    #[case("#NoSpace")]
    fn missing_titles(#[case] md: &str) {
        assert_eq!(extract_title(md), Err(MarkdownError::MissingTitle));
    }
}
