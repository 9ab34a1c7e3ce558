//! Lazily-resolved element references.
//!
//! An `ElementRef` is a path of `(locator, index)` steps from `document`. It
//! holds no browser-side handle: each use re-resolves the path, so a reference
//! is only meaningful while the page that produced it is still loaded.

use crate::browser::locator::Locator;
use std::fmt;

/// JS predicate matching WebDriver's notion of a displayed element.
pub(crate) const IS_DISPLAYED_FN: &str = "function(el) { if (!el || !el.isConnected) return false; const st = window.getComputedStyle(el); if (st.display === 'none' || st.visibility === 'hidden' || parseFloat(st.opacity) === 0) return false; const r = el.getBoundingClientRect(); return r.width > 0 && r.height > 0; }";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    locator: Locator,
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    steps: Vec<Step>,
}

impl ElementRef {
    /// The `index`-th match of `locator` in the whole document.
    pub fn root(locator: Locator, index: usize) -> Self {
        Self {
            steps: vec![Step { locator, index }],
        }
    }

    /// The `index`-th match of `locator` inside this element.
    pub fn child(&self, locator: Locator, index: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step { locator, index });
        Self { steps }
    }

    /// JS expression evaluating to the element, or `null` if the path no longer resolves.
    pub fn resolve_js(&self) -> String {
        let mut js = String::from("(function() { let node = document; ");
        for step in &self.steps {
            js.push_str(&format!(
                "node = ({})[{}]; if (!node) return null; ",
                step.locator.find_all_js("node"),
                step.index
            ));
        }
        js.push_str("return node; })()");
        js
    }

    /// JS expression running `body` with `el` bound to the element.
    ///
    /// Evaluates to `{found: false}` when the element is gone, otherwise to
    /// `{found: true, value: <body result>}`.
    pub fn with_element_js(&self, body: &str) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return {{found: false}}; return {{found: true, value: (function(el) {{ {} }})(el)}}; }})()",
            self.resolve_js(),
            body
        )
    }

    /// JS expression counting matches of `locator` inside this element.
    pub fn count_js(&self, locator: &Locator) -> String {
        format!(
            "(function() {{ const el = {}; if (!el) return 0; return ({}).length; }})()",
            self.resolve_js(),
            locator.find_all_js("el")
        )
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " > ")?;
            }
            write!(f, "{}[{}]", step.locator, step.index)?;
        }
        Ok(())
    }
}

/// JS expression counting matches of `locator` in the whole document.
pub fn document_count_js(locator: &Locator) -> String {
    format!("({}).length", locator.find_all_js("document"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_js_walks_every_step() {
        let row = ElementRef::root(Locator::class_name("row-cart-product"), 2);
        let remove = row.child(Locator::class_name("btn-cart-remove"), 0);
        let js = remove.resolve_js();

        assert!(js.starts_with("(function() { let node = document; "));
        assert_eq!(js.matches("if (!node) return null;").count(), 2);
        assert!(js.contains(")[2];"));
        assert!(js.contains(")[0];"));
        assert!(js.contains(r#"CSS.escape("btn-cart-remove")"#));
    }

    #[test]
    fn test_child_does_not_modify_parent() {
        let card = ElementRef::root(Locator::class_name("single-product"), 0);
        let link = card.child(Locator::css(".product-img a"), 0);
        assert_eq!(card.to_string(), ".single-product[0]");
        assert_eq!(link.to_string(), ".single-product[0] > .product-img a[0]");
    }

    #[test]
    fn test_with_element_js_wraps_body() {
        let js = ElementRef::root(Locator::id("content"), 0).with_element_js("return el.innerText;");
        assert!(js.contains("return {found: false};"));
        assert!(js.contains("(function(el) { return el.innerText; })(el)"));
    }

    #[test]
    fn test_document_count_js() {
        assert_eq!(
            document_count_js(&Locator::css("a")),
            r#"(Array.from((document).querySelectorAll("a"))).length"#
        );
    }
}
