//! An HTML document provider backed by `scraper`.
use quarry_traits::MarkupParser;
use quarry_types::{DocumentNode, Move, NodeRef};
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::rc::Rc;

/// A parsed HTML document together with the URL it was loaded from.
pub struct HtmlDocument {
    html: Html,
    url: String,
}

impl HtmlDocument {
    /// Parses a full HTML document.
    pub fn parse(markup: &str, url: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            html: Html::parse_document(markup),
            url: url.into(),
        })
    }

    /// Parses a fragment; the fragment's nodes hang below a synthetic root.
    pub fn parse_fragment(markup: &str, url: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            html: Html::parse_fragment(markup),
            url: url.into(),
        })
    }

    /// The document's root element as a navigable node.
    pub fn root(self: &Rc<Self>) -> HtmlNode {
        HtmlNode::from_element(self, self.html.root_element())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument").field("url", &self.url).finish()
    }
}

/// An element of an [`HtmlDocument`].
///
/// Stored as the child-index path from the tree root so the handle owns no
/// borrow of the document.
#[derive(Clone)]
pub struct HtmlNode {
    doc: Rc<HtmlDocument>,
    path: Vec<usize>,
}

impl HtmlNode {
    fn from_element(doc: &Rc<HtmlDocument>, element: ElementRef<'_>) -> Self {
        let mut path = Vec::new();
        let mut current = *element;
        while let Some(parent) = current.parent() {
            path.push(current.prev_siblings().count());
            current = parent;
        }
        path.reverse();
        Self {
            doc: Rc::clone(doc),
            path,
        }
    }

    fn element(&self) -> Option<ElementRef<'_>> {
        let mut current = self.doc.html.tree.root();
        for &index in &self.path {
            current = current.children().nth(index)?;
        }
        ElementRef::wrap(current)
    }

    fn share(&self, element: ElementRef<'_>) -> NodeRef {
        Rc::new(HtmlNode::from_element(&self.doc, element))
    }

    fn raw_text(&self) -> String {
        self.element()
            .map(|e| e.text().collect::<String>())
            .unwrap_or_default()
    }
}

impl fmt::Debug for HtmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.element().map(|e| e.value().name().to_string());
        f.debug_struct("HtmlNode")
            .field("url", &self.doc.url)
            .field("element", &name)
            .field("path", &self.path)
            .finish()
    }
}

impl DocumentNode for HtmlNode {
    fn attribute(&self, name: &str) -> Option<String> {
        self.element()?.value().attr(name).map(str::to_string)
    }

    fn text(&self) -> String {
        self.raw_text()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn inner_html(&self) -> String {
        self.element().map(|e| e.inner_html()).unwrap_or_default()
    }

    fn outer_html(&self) -> String {
        self.element().map(|e| e.html()).unwrap_or_default()
    }

    fn class_names(&self) -> Vec<String> {
        self.element()
            .map(|e| e.value().classes().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn navigate(&self, step: Move) -> Option<NodeRef> {
        let element = self.element()?;
        let target = match step {
            Move::Prev => element.prev_siblings().find_map(ElementRef::wrap),
            Move::Next => element.next_siblings().find_map(ElementRef::wrap),
            Move::Parent => element.parent().and_then(ElementRef::wrap),
            Move::Root => Some(self.doc.html.root_element()),
        }?;
        Some(self.share(target))
    }

    fn query_all(&self, css: &str) -> Vec<NodeRef> {
        let selector = match Selector::parse(css) {
            Ok(selector) => selector,
            Err(e) => {
                log::warn!("Invalid CSS selector '{}': {:?}", css, e);
                return vec![];
            }
        };
        match self.element() {
            Some(element) => element
                .select(&selector)
                .map(|found| self.share(found))
                .collect(),
            None => vec![],
        }
    }

    fn json_at(&self) -> Option<serde_json::Value> {
        serde_json::from_str(self.raw_text().trim()).ok()
    }

    fn source_url(&self) -> String {
        self.doc.url.clone()
    }
}

/// A [`MarkupParser`] that parses strings as HTML fragments.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFragmentParser;

impl MarkupParser for HtmlFragmentParser {
    fn parse_fragment(&self, markup: &str, url: &str) -> Option<NodeRef> {
        let doc = HtmlDocument::parse_fragment(markup, url);
        Some(Rc::new(doc.root()))
    }
}
