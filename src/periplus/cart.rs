use crate::browser::{CDPClient, ElementRef};
use crate::error::{fail, FailOnTimeout, Result};
use crate::periplus::product::ProductId;
use crate::periplus::{
    add_to_cart_button, basket, cart_remove_button, cart_row, cart_row_link, empty_cart_notice,
    head_link, modal_text, preloader, CART_PATH,
};
use crate::session::Session;

const ADD_TO_CART_LABEL: &str = "add to cart";
const ADDED_MESSAGE: &str = "success add to cart";
const OUT_OF_STOCK_MESSAGE: &str = "your desired qty is not available";

/// Accepted readings of the add-to-cart confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartOutcome {
    Added,
    RejectedOutOfStock,
}

/// Read the dialog text against what the case expects; `None` means the case fails.
pub fn classify_dialog(text: &str, is_negative_case: bool) -> Option<AddToCartOutcome> {
    let text = text.to_lowercase();
    if !is_negative_case && text.contains(ADDED_MESSAGE) {
        Some(AddToCartOutcome::Added)
    } else if is_negative_case && text.contains(OUT_OF_STOCK_MESSAGE) {
        Some(AddToCartOutcome::RejectedOutOfStock)
    } else {
        None
    }
}

/// A row of the cart page, valid until the next navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineItem {
    pub row: ElementRef,
    pub href: String,
}

/// Open a product page, press "add to cart" and return the page's canonical link.
///
/// With `is_negative_case` the out-of-stock rejection is the expected outcome.
pub async fn add_item_to_cart(
    session: &Session,
    product_url: &str,
    is_negative_case: bool,
) -> Result<ProductId> {
    let client = session.client();
    let wait = session.wait();

    client.navigate(product_url).await?;
    let not_loaded = || format!("Couldn't load product detail page for '{}'", product_url);
    wait.until_invisible(client, &preloader())
        .await
        .fail_on_timeout(not_loaded)?;
    wait.until_visible(client, &add_to_cart_button())
        .await
        .fail_on_timeout(not_loaded)?;

    let mut clicked = false;
    for button in client.find_all(None, &add_to_cart_button()).await? {
        if client.text(&button).await?.to_lowercase().contains(ADD_TO_CART_LABEL) {
            client.click(&button).await?;
            clicked = true;
            break;
        }
    }
    if !clicked {
        return fail(format!(
            "Couldn't find an '{}' button on '{}'",
            ADD_TO_CART_LABEL, product_url
        ));
    }

    let dialog = wait.until_visible(client, &modal_text()).await?;
    let dialog_text = client.text(&dialog).await?;

    let Some(outcome) = classify_dialog(&dialog_text, is_negative_case) else {
        return fail(format!("Couldn't add product to cart; {}", dialog_text));
    };

    let link = client.find(None, &head_link()).await?;
    let Some(href) = client.dom_attribute(&link, "href").await? else {
        return fail(format!("Product page '{}' has no canonical link", product_url));
    };

    tracing::info!("Add to cart {:?}: {}", outcome, href);
    Ok(ProductId::new(href))
}

/// Href of a cart row's first link.
async fn row_href(client: &CDPClient, row: &ElementRef) -> Result<String> {
    let link = client.find(Some(row), &cart_row_link()).await?;
    Ok(client.dom_attribute(&link, "href").await?.unwrap_or_default())
}

/// Open the cart and return the first row whose link contains `id`.
pub async fn check_cart_contains_item(session: &Session, id: &ProductId) -> Result<CartLineItem> {
    let client = session.client();

    client.navigate(&session.url(CART_PATH)).await?;
    session
        .wait()
        .until_visible(client, &basket())
        .await
        .fail_on_timeout(|| "Cart is Empty".to_string())?;

    for row in client.find_all(None, &cart_row()).await? {
        let href = row_href(client, &row).await?;
        if id.matches(&href) {
            tracing::info!("Found {} in the cart", id);
            return Ok(CartLineItem { row, href });
        }
    }

    fail(format!("Product with URL {} Can't be found in the cart", id))
}

/// Open the cart and fail if any row's link contains `id`.
pub async fn check_item_is_not_in_cart(session: &Session, id: &ProductId) -> Result<()> {
    let client = session.client();

    client.navigate(&session.url(CART_PATH)).await?;
    if client.count(None, &empty_cart_notice()).await? > 0 {
        tracing::info!("Cart is empty, {} is not in it", id);
        return Ok(());
    }

    for row in client.find_all(None, &cart_row()).await? {
        if id.matches(&row_href(client, &row).await?) {
            return fail(format!("Found OUT OF STOCK item {} in the cart", id));
        }
    }

    tracing::info!("{} is not in the cart", id);
    Ok(())
}

/// Remove the item's row from the cart and verify it is gone.
pub async fn delete_item_from_cart(session: &Session, id: &ProductId) -> Result<()> {
    let item = check_cart_contains_item(session, id).await?;
    let client = session.client();

    session
        .wait()
        .until_invisible(client, &preloader())
        .await?;
    let remove = client.find(Some(&item.row), &cart_remove_button()).await?;
    client.click(&remove).await?;
    tracing::info!("Clicked remove for {}", id);

    check_item_is_not_in_cart(session, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_case_accepts_success_dialog() {
        assert_eq!(
            classify_dialog("Success add to cart", false),
            Some(AddToCartOutcome::Added)
        );
        assert_eq!(
            classify_dialog("SUCCESS ADD TO CART!\nContinue shopping", false),
            Some(AddToCartOutcome::Added)
        );
    }

    #[test]
    fn test_negative_case_accepts_out_of_stock_dialog() {
        assert_eq!(
            classify_dialog("Sorry, your desired qty is not available", true),
            Some(AddToCartOutcome::RejectedOutOfStock)
        );
    }

    #[test]
    fn test_mismatched_dialogs_fail() {
        assert_eq!(classify_dialog("Your desired qty is not available", false), None);
        assert_eq!(classify_dialog("Success add to cart", true), None);
        assert_eq!(classify_dialog("Please log in first", false), None);
        assert_eq!(classify_dialog("", true), None);
    }
}
