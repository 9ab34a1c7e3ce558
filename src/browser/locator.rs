//! Element locators and their JavaScript form.
//!
//! Every locator compiles to a JS expression that evaluates to an array of
//! elements found under a root node, in document order.

use std::fmt;

/// How to find elements, mirroring the WebDriver `By` strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id(String),
    Name(String),
    ClassName(String),
    TagName(String),
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }

    pub fn tag_name(value: impl Into<String>) -> Self {
        Locator::TagName(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    /// Elements containing `text` in one of their own text nodes.
    pub fn containing_text(text: &str) -> Self {
        let quoted = if text.contains('\'') {
            format!("\"{}\"", text)
        } else {
            format!("'{}'", text)
        };
        Locator::XPath(format!("//*[contains(text(), {})]", quoted))
    }

    /// JS expression yielding an `Array` of matches under `root`.
    ///
    /// `root` must be a JS expression evaluating to a `Document` or `Element`.
    pub fn find_all_js(&self, root: &str) -> String {
        match self {
            Locator::Id(v) => query_all(root, &format!("'#' + CSS.escape({})", js_string(v))),
            Locator::Name(v) => query_all(
                root,
                &format!("'[name=\"' + CSS.escape({}) + '\"]'", js_string(v)),
            ),
            Locator::ClassName(v) => {
                query_all(root, &format!("'.' + CSS.escape({})", js_string(v)))
            }
            Locator::TagName(v) | Locator::Css(v) => query_all(root, &js_string(v)),
            Locator::XPath(v) => format!(
                "(function(r) {{ const s = document.evaluate({}, r, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; for (let i = 0; i < s.snapshotLength; i++) {{ out.push(s.snapshotItem(i)); }} return out; }})({})",
                js_string(v),
                root
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "#{}", v),
            Locator::Name(v) => write!(f, "[name={}]", v),
            Locator::ClassName(v) => write!(f, ".{}", v),
            Locator::TagName(v) | Locator::Css(v) => write!(f, "{}", v),
            Locator::XPath(v) => write!(f, "xpath:{}", v),
        }
    }
}

fn query_all(root: &str, selector_js: &str) -> String {
    format!("Array.from(({}).querySelectorAll({}))", root, selector_js)
}

/// Quote a Rust string as a JS string literal.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("it's \"quoted\""), r#""it's \"quoted\"""#);
    }

    #[test]
    fn test_id_locator_js() {
        let js = Locator::id("button-login").find_all_js("document");
        assert_eq!(
            js,
            r#"Array.from((document).querySelectorAll('#' + CSS.escape("button-login")))"#
        );
    }

    #[test]
    fn test_class_and_name_locator_js() {
        let js = Locator::class_name("row-cart-product").find_all_js("el");
        assert!(js.starts_with("Array.from((el).querySelectorAll('.' + CSS.escape("));
        let js = Locator::name("email").find_all_js("document");
        assert!(js.contains(r#"CSS.escape("email")"#));
        assert!(js.contains("[name="));
    }

    #[test]
    fn test_xpath_locator_uses_root_as_context() {
        let js = Locator::xpath("//head//link").find_all_js("document");
        assert!(js.contains(r#"document.evaluate("//head//link", r,"#));
        assert!(js.ends_with("})(document)"));
    }

    #[test]
    fn test_containing_text_picks_quote_style() {
        assert_eq!(
            Locator::containing_text("Your shopping cart is empty"),
            Locator::XPath("//*[contains(text(), 'Your shopping cart is empty')]".to_string())
        );
        assert_eq!(
            Locator::containing_text("You're logged out"),
            Locator::XPath("//*[contains(text(), \"You're logged out\")]".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Locator::id("warning").to_string(), "#warning");
        assert_eq!(Locator::class_name("preloader").to_string(), ".preloader");
    }
}
