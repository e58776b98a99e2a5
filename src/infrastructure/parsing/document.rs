//! Optional-returning accessors over a parsed document
//!
//! Every lookup yields `Option`, so extraction steps chain with `?` inside
//! small `Option`-returning helpers and absence never becomes an error.

use scraper::{ElementRef, Html, Selector};

/// Descendant lookups shared by whole documents and single elements
pub trait Lookup<'a> {
    /// All matching descendants in document order
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;

    /// First matching descendant
    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.find_all(selector).into_iter().next()
    }

    /// First matching descendant whose complete text equals `text`
    fn find_with_text(&self, selector: &Selector, text: &str) -> Option<ElementRef<'a>> {
        self.find_all(selector)
            .into_iter()
            .find(|element| element.full_text() == text)
    }
}

impl<'a> Lookup<'a> for &'a Html {
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }

    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }
}

impl<'a> Lookup<'a> for ElementRef<'a> {
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }

    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }
}

/// Text and navigation helpers for a single element
pub trait ElementExt<'a> {
    /// Concatenated text of all descendants, untouched
    fn full_text(&self) -> String;

    /// `full_text` with surrounding whitespace removed
    fn trimmed_text(&self) -> String {
        self.full_text().trim().to_string()
    }

    /// Each text fragment trimmed, blanks dropped, then joined without separator
    fn stripped_text(&self) -> String;

    fn parent_element(&self) -> Option<ElementRef<'a>>;

    /// Text node directly after this element, if the next sibling is text
    fn following_text(&self) -> Option<String>;

    fn attr_value(&self, name: &str) -> Option<String>;
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn full_text(&self) -> String {
        self.text().collect()
    }

    fn stripped_text(&self) -> String {
        self.text()
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .collect()
    }

    fn parent_element(&self) -> Option<ElementRef<'a>> {
        self.parent().and_then(ElementRef::wrap)
    }

    fn following_text(&self) -> Option<String> {
        let sibling = self.next_sibling()?;
        let text = sibling.value().as_text()?;
        let fragment: &str = &text.text;
        Some(fragment.to_owned())
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(ToString::to_string)
    }
}
