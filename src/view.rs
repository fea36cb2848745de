// src/view.rs
//
// Render tree shared by every component. Components never touch markup
// directly: they build a `Node` from their state, the routes ship it as JSON
// (for the browser shell) or as HTML through maud.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use maud::{Escaper, Render};
use serde::Serialize;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        id: None,
        classes: Vec::new(),
        attrs: BTreeMap::new(),
        children: Vec::new(),
    }
}

impl Element {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn class_if(self, cond: bool, class: impl Into<String>) -> Self {
        if cond { self.class(class) } else { self }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn attr_if(self, cond: bool, name: impl Into<String>, value: impl Into<String>) -> Self {
        if cond { self.attr(name, value) } else { self }
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    #[cfg(test)]
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /* -------------------------
       Queries
    --------------------------*/

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find_by_id(id))
    }

    /// Depth-first, document order.
    #[cfg(test)]
    pub fn find_all_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.collect_by_class(class, &mut out);
        out
    }

    #[cfg(test)]
    fn collect_by_class<'a>(&'a self, class: &str, out: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            out.push(self);
        }
        for c in self.child_elements() {
            c.collect_by_class(class, out);
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for c in &self.children {
            match c {
                Node::Text(t) => out.push_str(t),
                Node::Element(e) => out.push_str(&e.text_content()),
            }
        }
        out
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn to_html(&self) -> String {
        self.render().into_string()
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

/* -------------------------
   HTML output
--------------------------*/

impl Render for Element {
    fn render_to(&self, buffer: &mut String) {
        buffer.push('<');
        buffer.push_str(self.tag);
        if let Some(id) = &self.id {
            buffer.push_str(" id=\"");
            Escaper::new(buffer).write_str(id).ok(); // infallible
            buffer.push('"');
        }
        if !self.classes.is_empty() {
            buffer.push_str(" class=\"");
            Escaper::new(buffer).write_str(&self.classes.join(" ")).ok();
            buffer.push('"');
        }
        for (name, value) in &self.attrs {
            buffer.push(' ');
            buffer.push_str(name);
            buffer.push_str("=\"");
            Escaper::new(buffer).write_str(value).ok();
            buffer.push('"');
        }
        buffer.push('>');

        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for c in &self.children {
            c.render_to(buffer);
        }
        buffer.push_str("</");
        buffer.push_str(self.tag);
        buffer.push('>');
    }
}

impl Render for Node {
    fn render_to(&self, buffer: &mut String) {
        match self {
            Node::Element(e) => e.render_to(buffer),
            Node::Text(t) => t.render_to(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_markup_with_escaping() {
        let tree = el("div")
            .id("box")
            .class("a")
            .class_if(false, "never")
            .attr("data-x", "1 < 2")
            .child(el("span").text("Tom & Jerry"))
            .child(el("br"));

        assert_eq!(
            tree.to_html(),
            r#"<div id="box" class="a" data-x="1 &lt; 2"><span>Tom &amp; Jerry</span><br></div>"#
        );
    }

    #[test]
    fn queries_walk_the_whole_tree() {
        let tree = el("ul").children((0..3).map(|i| {
            el("li")
                .class("row")
                .class_if(i == 1, "selected")
                .id(format!("row-{i}"))
                .text(format!("item {i}"))
        }));

        assert_eq!(tree.find_all_by_class("row").len(), 3);
        assert_eq!(tree.find_all_by_class("selected").len(), 1);
        assert_eq!(tree.find_by_id("row-2").map(|e| e.text_content()), Some("item 2".into()));
        assert_eq!(tree.text_content(), "item 0item 1item 2");
    }

    #[test]
    fn serialises_text_children_as_plain_strings() {
        let tree = el("p").class("muted").text("hello");
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["tag"], "p");
        assert_eq!(json["children"][0], "hello");
        assert!(json.get("attrs").is_none());
    }
}
