use crate::browser::{CDPClient, ElementRef};
use crate::error::{FailOnTimeout, Result, SuiteError};
use crate::periplus::{product_card, product_card_link, search_bar, search_button};
use crate::session::Session;

/// One product card on a search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub card: ElementRef,
}

impl SearchResult {
    /// Link target of the card's product image.
    pub async fn product_url(&self, client: &CDPClient) -> Result<String> {
        let link = client.find(Some(&self.card), &product_card_link()).await?;
        client
            .dom_attribute(&link, "href")
            .await?
            .ok_or_else(|| SuiteError::ElementNotFound(format!("href on {}", link)))
    }
}

/// How many results to return for a request of `desired` out of `available`.
pub fn result_count(desired: usize, available: usize) -> usize {
    desired.max(1).min(available)
}

/// Search the catalog and return up to `count` result cards in page order.
pub async fn search_items(session: &Session, query: &str, count: usize) -> Result<Vec<SearchResult>> {
    let client = session.client();

    let bar = client.find(None, &search_bar()).await?;
    let submit = client.find(None, &search_button()).await?;
    client.send_keys(&bar, query).await?;
    client.click(&submit).await?;

    session
        .wait()
        .until_visible(client, &product_card())
        .await
        .fail_on_timeout(|| {
            format!("Search Failed: Couldn't find any item matching query '{}'", query)
        })?;

    let cards = client.find_all(None, &product_card()).await?;
    let n = result_count(count, cards.len());
    tracing::info!(
        "Search for {:?} found {} cards, returning {}",
        query,
        cards.len(),
        n
    );

    Ok(cards
        .into_iter()
        .take(n)
        .map(|card| SearchResult { card })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_count_coerces_to_at_least_one() {
        assert_eq!(result_count(0, 5), 1);
        assert_eq!(result_count(1, 5), 1);
    }

    #[test]
    fn test_result_count_caps_at_available() {
        assert_eq!(result_count(3, 5), 3);
        assert_eq!(result_count(10, 4), 4);
        assert_eq!(result_count(2, 0), 0);
    }
}
