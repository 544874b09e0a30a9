//! Document model adapter
//!
//! The analysis code only needs a handful of node queries: attributes,
//! nearest ancestor by tag, first descendant by tag, and lazy text-node walks
//! in document order. [`DocumentNode`] captures those, and is implemented for
//! scraper's [`ElementRef`].

use scraper::node::{Element, Text};
use scraper::ElementRef;

/// A single text node together with the tag of the element that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFragment<'a> {
    pub text: &'a str,
    /// `None` only for text hanging directly off the document root.
    pub parent_tag: Option<&'a str>,
}

impl<'a> TextFragment<'a> {
    fn from_parts(text: Option<&'a Text>, parent: Option<&'a Element>) -> Option<Self> {
        let text: &'a str = text?;
        Some(Self {
            text,
            parent_tag: parent.map(|el| el.name()),
        })
    }
}

/// Node queries used by the role classifier and context extractor.
pub trait DocumentNode<'a>: Copy {
    fn attr(&self, name: &str) -> Option<&'a str>;

    /// Nearest ancestor whose tag name is one of `tags`.
    fn closest(&self, tags: &[&str]) -> Option<Self>;

    /// First descendant element (document order) named `tag`.
    fn find_descendant(&self, tag: &str) -> Option<Self>;

    /// All descendant text concatenated, then trimmed.
    fn text_content(&self) -> String;

    /// Text nodes strictly before this node, nearest first.
    fn text_before(&self) -> impl Iterator<Item = TextFragment<'a>> + 'a;

    /// Text nodes strictly after this node's start tag, in document order.
    fn text_after(&self) -> impl Iterator<Item = TextFragment<'a>> + 'a;
}

impl<'a> DocumentNode<'a> for ElementRef<'a> {
    fn attr(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name)
    }

    fn closest(&self, tags: &[&str]) -> Option<Self> {
        self.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| tags.contains(&el.value().name()))
    }

    fn find_descendant(&self, tag: &str) -> Option<Self> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == tag)
    }

    fn text_content(&self) -> String {
        self.text().collect::<String>().trim().to_string()
    }

    fn text_before(&self) -> impl Iterator<Item = TextFragment<'a>> + 'a {
        // Reverse document order: step to the deepest last descendant of the
        // previous sibling, or up to the parent when there is none.
        std::iter::successors(Some(**self), |n| match n.prev_sibling() {
            Some(mut last) => {
                while let Some(child) = last.last_child() {
                    last = child;
                }
                Some(last)
            }
            None => n.parent(),
        })
        .skip(1)
        .filter_map(|n| {
            TextFragment::from_parts(
                n.value().as_text(),
                n.parent().and_then(|p| p.value().as_element()),
            )
        })
    }

    fn text_after(&self) -> impl Iterator<Item = TextFragment<'a>> + 'a {
        let node = **self;

        let following = std::iter::once(node)
            .chain(node.ancestors())
            .flat_map(|n| n.next_siblings())
            .flat_map(|sibling| sibling.descendants());

        node.descendants()
            .skip(1)
            .chain(following)
            .filter_map(|n| {
                TextFragment::from_parts(
                    n.value().as_text(),
                    n.parent().and_then(|p| p.value().as_element()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_text_walks_document_order() {
        let html = r#"
        <body>
            <p>one <b>two</b></p>
            <div><span>three</span><img src="a.png"><em>four</em></div>
            <p>five</p>
        </body>
        "#;
        let document = Html::parse_document(html);
        let img = first(&document, "img");

        let before: Vec<&str> = img
            .text_before()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(before, vec!["three", "two", "one"]);

        let after: Vec<&str> = img
            .text_after()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(after, vec!["four", "five"]);
    }

    #[test]
    fn test_text_before_nested_reverse_order() {
        let html = r#"
        <body>
            <div>a<p>b<b>c<i>d</i>e</b>f</p>
                <section><span>g</span><div><em>h</em><img src="a.png"></div></section>
            </div>
        </body>
        "#;
        let document = Html::parse_document(html);
        let img = first(&document, "img");

        let before: Vec<&str> = img
            .text_before()
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect();
        assert_eq!(before, vec!["h", "g", "f", "e", "d", "c", "b", "a"]);

        let nearest = img.text_before().find(|f| !f.text.trim().is_empty()).unwrap();
        assert_eq!(nearest.text, "h");
        assert_eq!(nearest.parent_tag, Some("em"));
    }

    #[test]
    fn test_fragment_parent_tag() {
        let html = r#"<div><script>var x = 1;</script><img src="a.png"></div>"#;
        let document = Html::parse_document(html);
        let img = first(&document, "img");

        let fragment = img.text_before().next().unwrap();
        assert_eq!(fragment.parent_tag, Some("script"));
        assert_eq!(fragment.text, "var x = 1;");
    }

    #[test]
    fn test_closest_and_descendant() {
        let html = r#"
        <figure id="fig">
            <section><img src="a.png"></section>
            <figcaption> A caption </figcaption>
        </figure>
        "#;
        let document = Html::parse_document(html);
        let img = first(&document, "img");

        let figure = img.closest(&["figure"]).unwrap();
        assert_eq!(figure.attr("id"), Some("fig"));
        assert_eq!(img.closest(&["article", "section"]).unwrap().value().name(), "section");
        assert!(img.closest(&["a"]).is_none());

        let caption = figure.find_descendant("figcaption").unwrap();
        assert_eq!(caption.text_content(), "A caption");
    }
}
