//! The cart scenarios, each a full path through the site on one session.

use crate::error::{fail, Result};
use crate::periplus::{self, ProductId};
use crate::session::Session;
use crate::suite::Suite;
use futures::FutureExt;

pub const SEARCH_TERM: &str = "haruki murakami";

/// A bundle the shop lists but cannot supply.
pub const OUT_OF_STOCK_PRODUCT_URL: &str =
    "https://www.periplus.com/p/PER_Pausbundling/whispers-of-hope-bundling-jilid-1-and-2";

pub const REMOVABLE_PRODUCT_URL: &str =
    "http://www.periplus.com/p/9780008652609/it-s-complicated-confessions-of-messy-modern-love";

pub const CASE_ADD_AVAILABLE: &str = "add_available_stock_item_to_cart";
pub const CASE_ADD_OUT_OF_STOCK: &str = "add_out_of_stock_item_to_cart";
pub const CASE_DELETE: &str = "delete_item_from_cart";

/// Product pages the fixed-URL cases run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTargets {
    pub out_of_stock_url: String,
    pub removable_url: String,
}

impl Default for CartTargets {
    fn default() -> Self {
        Self {
            out_of_stock_url: OUT_OF_STOCK_PRODUCT_URL.to_string(),
            removable_url: REMOVABLE_PRODUCT_URL.to_string(),
        }
    }
}

/// Every cart case, in the order a full run executes them.
pub const CART_CASES: [&str; 3] = [CASE_ADD_AVAILABLE, CASE_ADD_OUT_OF_STOCK, CASE_DELETE];

/// Run the three cart cases in order on the suite's session.
pub async fn run_cart_cases(suite: &mut Suite, targets: &CartTargets) {
    for name in CART_CASES {
        run_cart_case(suite, name, targets).await;
    }
}

/// Run one cart case by name. `None` if no case has that name.
pub async fn run_cart_case(suite: &mut Suite, name: &str, targets: &CartTargets) -> Option<bool> {
    let passed = match name {
        CASE_ADD_AVAILABLE => {
            suite
                .run_case(name, |s| {
                    async move { add_available_stock_item_to_cart(s).await.map(drop) }.boxed_local()
                })
                .await
        }
        CASE_ADD_OUT_OF_STOCK => {
            let url = targets.out_of_stock_url.clone();
            suite
                .run_case(name, move |s| {
                    async move { add_out_of_stock_item_to_cart(s, &url).await.map(drop) }
                        .boxed_local()
                })
                .await
        }
        CASE_DELETE => {
            let url = targets.removable_url.clone();
            suite
                .run_case(name, move |s| {
                    async move { delete_item_from_cart(s, &url).await.map(drop) }.boxed_local()
                })
                .await
        }
        _ => {
            tracing::warn!("No cart case named {:?}", name);
            return None;
        }
    };
    Some(passed)
}

/// Search, add the first hit to the cart and find it there.
pub async fn add_available_stock_item_to_cart(session: &mut Session) -> Result<ProductId> {
    periplus::login(session).await?;

    let results = periplus::search_items(session, SEARCH_TERM, 1).await?;
    let Some(first) = results.first() else {
        return fail(format!("Search for '{}' returned no results", SEARCH_TERM));
    };
    let product_url = first.product_url(session.client()).await?;

    let item = periplus::add_item_to_cart(session, &product_url, false).await?;
    periplus::check_cart_contains_item(session, &item).await?;

    periplus::logout(session).await?;
    Ok(item)
}

/// Try to add an unavailable product and make sure the cart stays clean.
pub async fn add_out_of_stock_item_to_cart(
    session: &mut Session,
    product_url: &str,
) -> Result<ProductId> {
    periplus::login(session).await?;

    let item = periplus::add_item_to_cart(session, product_url, true).await?;
    periplus::check_item_is_not_in_cart(session, &item).await?;

    periplus::logout(session).await?;
    Ok(item)
}

/// Add a product, remove it again and make sure it is gone.
pub async fn delete_item_from_cart(session: &mut Session, product_url: &str) -> Result<ProductId> {
    periplus::login(session).await?;

    let item = periplus::add_item_to_cart(session, product_url, false).await?;
    periplus::delete_item_from_cart(session, &item).await?;

    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_cases_run_in_declared_order() {
        assert_eq!(
            CART_CASES,
            ["add_available_stock_item_to_cart", "add_out_of_stock_item_to_cart", "delete_item_from_cart"]
        );
    }

    #[test]
    fn test_default_targets_point_at_periplus() {
        let targets = CartTargets::default();
        assert!(targets.out_of_stock_url.contains("periplus.com/p/PER_Pausbundling/"));
        assert!(targets.removable_url.contains("periplus.com/p/9780008652609/"));
    }
}
