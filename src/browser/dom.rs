//! Element queries and interactions on top of `Runtime.evaluate`.

use crate::browser::cdp::CDPClient;
use crate::browser::element::{document_count_js, ElementRef, IS_DISPLAYED_FN};
use crate::browser::locator::{js_string, Locator};
use crate::error::{Result, SuiteError};
use serde_json::Value;

impl CDPClient {
    /// Number of elements matching `locator`, in the document or inside `scope`.
    pub async fn count(&self, scope: Option<&ElementRef>, locator: &Locator) -> Result<usize> {
        let js = match scope {
            Some(el) => el.count_js(locator),
            None => document_count_js(locator),
        };
        Ok(self.evaluate(&js).await?.as_u64().unwrap_or(0) as usize)
    }

    /// All current matches of `locator`, in document order.
    pub async fn find_all(
        &self,
        scope: Option<&ElementRef>,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>> {
        let n = self.count(scope, locator).await?;
        Ok((0..n)
            .map(|i| match scope {
                Some(el) => el.child(locator.clone(), i),
                None => ElementRef::root(locator.clone(), i),
            })
            .collect())
    }

    /// First match of `locator`; `ElementNotFound` if there is none.
    pub async fn find(&self, scope: Option<&ElementRef>, locator: &Locator) -> Result<ElementRef> {
        self.find_all(scope, locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| match scope {
                Some(el) => SuiteError::ElementNotFound(format!("{} inside {}", locator, el)),
                None => SuiteError::ElementNotFound(locator.to_string()),
            })
    }

    /// Run `body` against a resolved element; `ElementNotFound` if it is gone.
    async fn on_element(&self, element: &ElementRef, body: &str) -> Result<Value> {
        let result = self.evaluate(&element.with_element_js(body)).await?;
        if result.get("found").and_then(Value::as_bool) != Some(true) {
            return Err(SuiteError::ElementNotFound(element.to_string()));
        }
        Ok(result.get("value").cloned().unwrap_or(Value::Null))
    }

    /// Whether the element exists and is rendered visibly. Missing elements are not displayed.
    pub async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        let js = format!(
            "(function() {{ const el = {}; return ({})(el); }})()",
            element.resolve_js(),
            IS_DISPLAYED_FN
        );
        Ok(self.evaluate(&js).await?.as_bool().unwrap_or(false))
    }

    /// Rendered text of the element.
    pub async fn text(&self, element: &ElementRef) -> Result<String> {
        let value = self
            .on_element(element, "return el.innerText || el.textContent || '';")
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Attribute value exactly as written in the markup.
    pub async fn dom_attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        let value = self
            .on_element(element, &format!("return el.getAttribute({});", js_string(name)))
            .await?;
        Ok(value.as_str().map(str::to_string))
    }

    pub async fn click(&self, element: &ElementRef) -> Result<()> {
        self.on_element(
            element,
            "el.scrollIntoView({block: 'center'}); el.click(); return true;",
        )
        .await?;
        tracing::debug!("Clicked element: {}", element);
        Ok(())
    }

    /// Append `text` to an input's value and fire the events a user would.
    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.on_element(
            element,
            &format!(
                "el.focus(); el.value = (el.value || '') + {}; el.dispatchEvent(new Event('input', {{bubbles: true}})); el.dispatchEvent(new Event('change', {{bubbles: true}})); return true;",
                js_string(text)
            ),
        )
        .await?;
        tracing::debug!("Typed {} chars into element: {}", text.chars().count(), element);
        Ok(())
    }
}
