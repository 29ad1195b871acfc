/// A node of the generated HTML tree.
///
/// Leaf nodes carry a `value` and no children; container nodes carry
/// children and no value. A node without a tag renders its value as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlNode {
    pub tag: Option<String>,
    pub value: Option<String>,
    pub children: Vec<HtmlNode>,
    /// Rendered in insertion order as ` name=value`. Values are emitted
    /// verbatim, so callers supply their own quotes.
    pub attributes: Vec<(String, String)>,
}

impl HtmlNode {
    /// Untagged raw text.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        Self {
            tag: Some(tag.into()),
            children,
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    /// Serialize into `out`.
    ///
    /// # Panics
    ///
    /// Panics if a tagged node has neither a value nor children. Builders
    /// never produce such a node, so hitting this is a bug in the caller.
    pub fn write_html(&self, out: &mut String) {
        let Some(tag) = &self.tag else {
            if let Some(value) = &self.value {
                out.push_str(value);
            } else {
                write_children(&self.children, out);
            }
            return;
        };

        if self.value.is_none() && self.children.is_empty() {
            panic!("<{tag}> node has neither a value nor children");
        }

        out.push('<');
        out.push_str(tag);
        self.write_attributes(out);
        out.push('>');
        match &self.value {
            Some(value) => out.push_str(value),
            None => write_children(&self.children, out),
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }

    fn write_attributes(&self, out: &mut String) {
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push('=');
            out.push_str(value);
        }
    }
}

fn write_children(children: &[HtmlNode], out: &mut String) {
    for child in children {
        child.write_html(out);
    }
}
