use serde::{Deserialize, Serialize};
use std::fmt;

/// URL identifying a product across the product page and the cart.
///
/// Cart rows are matched by substring: a row belongs to this product when its
/// link contains the identifier. One product URL that is a prefix of another
/// therefore matches both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, href: &str) -> bool {
        href.contains(&self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for ProductId {
    fn from(url: String) -> Self {
        Self(url)
    }
}
