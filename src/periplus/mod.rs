//! Page flows for periplus.com.
//!
//! The paths and markers below are the structural contract with the site; a
//! redesign of any of these pages breaks the corresponding flow.

pub mod auth;
pub mod cart;
pub mod product;
pub mod search;

pub use auth::{login, logout, FailureProbe};
pub use cart::{
    add_item_to_cart, check_cart_contains_item, check_item_is_not_in_cart, delete_item_from_cart,
    AddToCartOutcome, CartLineItem,
};
pub use product::ProductId;
pub use search::{search_items, SearchResult};

use crate::browser::Locator;

pub const LOGIN_PATH: &str = "/account/Login";
pub const LOGOUT_PATH: &str = "/_index_/Logout";
pub const CART_PATH: &str = "/checkout/cart";

pub const LOGIN_BUTTON_ID: &str = "button-login";
pub const SEARCH_BAR_ID: &str = "filter_name";
pub const PRODUCT_CARD_CLASS: &str = "single-product";

pub(crate) fn login_button() -> Locator {
    Locator::id(LOGIN_BUTTON_ID)
}

pub(crate) fn email_field() -> Locator {
    Locator::name("email")
}

pub(crate) fn password_field() -> Locator {
    Locator::name("password")
}

pub(crate) fn search_bar() -> Locator {
    Locator::id(SEARCH_BAR_ID)
}

pub(crate) fn search_button() -> Locator {
    Locator::class_name("btnn")
}

pub(crate) fn login_warning() -> Locator {
    Locator::id("warning")
}

pub(crate) fn product_card() -> Locator {
    Locator::class_name(PRODUCT_CARD_CLASS)
}

pub(crate) fn product_card_link() -> Locator {
    Locator::css(".product-img a")
}

pub(crate) fn preloader() -> Locator {
    Locator::class_name("preloader")
}

pub(crate) fn add_to_cart_button() -> Locator {
    Locator::class_name("btn-add-to-cart")
}

pub(crate) fn modal_text() -> Locator {
    Locator::class_name("modal-text")
}

pub(crate) fn head_link() -> Locator {
    Locator::xpath("//head//link")
}

pub(crate) fn basket() -> Locator {
    Locator::id("basket")
}

pub(crate) fn cart_row() -> Locator {
    Locator::class_name("row-cart-product")
}

pub(crate) fn cart_row_link() -> Locator {
    Locator::tag_name("a")
}

pub(crate) fn cart_remove_button() -> Locator {
    Locator::class_name("btn-cart-remove")
}

pub(crate) fn empty_cart_notice() -> Locator {
    Locator::containing_text("Your shopping cart is empty")
}

pub(crate) fn logout_titles() -> [Locator; 2] {
    [
        Locator::class_name("info-title1"),
        Locator::class_name("info-title2"),
    ]
}

pub(crate) fn logout_notice() -> Locator {
    Locator::id("content")
}
