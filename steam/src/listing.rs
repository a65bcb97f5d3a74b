use crate::price::parse_price;
use crate::{Error, Result};
use scraper::{ElementRef, Html, Selector};

/// One discovered sell order. `id` stays `None` when the search page omits
/// the row id; it can be resolved later from the detail page.
#[derive(Clone, Debug)]
pub struct Listing {
    pub name: String,
    pub price: f64,
    pub id: Option<String>,
    pub url: String,
}

struct Selectors {
    row: Selector,
    name: Selector,
    // Two page variants: the price span sits either directly in the row or
    // wrapped one level deeper in a market_table_value container.
    flat_price: Selector,
    nested_price: Selector,
    row_id: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            row: Selector::parse("a.market_listing_row_link").unwrap(),
            name: Selector::parse("span.market_listing_item_name").unwrap(),
            flat_price: Selector::parse("span.market_listing_price_with_fee").unwrap(),
            nested_price: Selector::parse("span.market_table_value span.normal_price").unwrap(),
            row_id: row_id_selector(),
        }
    }
}

fn row_id_selector() -> Selector {
    Selector::parse(r#"[id^="listing_"], [id^="mylisting_"]"#).unwrap()
}

/// Parses a market search page (or fragment) into listings, in document
/// order. Malformed rows are logged and skipped; this never fails wholesale.
pub fn extract_listings(html: &str) -> Vec<Listing> {
    let document = Html::parse_document(html);
    let selectors = Selectors::new();

    let mut listings = Vec::new();
    for row in document.select(&selectors.row) {
        match parse_row(&row, &selectors) {
            Ok(listing) => listings.push(listing),
            Err(e) => log::warn!("Skipping listing entry: {e}"),
        }
    }

    listings
}

/// Pulls a listing id out of a detail page for rows that carried none inline.
pub fn resolve_listing_id(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = row_id_selector();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("id"))
        .find_map(id_digits)
}

fn parse_row(row: &ElementRef, selectors: &Selectors) -> Result<Listing> {
    let url = row
        .value()
        .attr("href")
        .map(str::to_string)
        .ok_or_else(|| Error::Listing("row without detail link".to_string()))?;

    let name = element_text(row, &selectors.name)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::Listing(format!("{url}: missing item name")))?;

    let price_text = element_text(row, &selectors.flat_price)
        .or_else(|| element_text(row, &selectors.nested_price))
        .ok_or_else(|| Error::Listing(format!("{name}: missing price element")))?;

    Ok(Listing {
        id: listing_id(row, &selectors.row_id),
        price: parse_price(&price_text),
        name,
        url,
    })
}

fn element_text(row: &ElementRef, selector: &Selector) -> Option<String> {
    row.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

fn listing_id(row: &ElementRef, selector: &Selector) -> Option<String> {
    row.value().attr("id").and_then(id_digits).or_else(|| {
        row.select(selector)
            .filter_map(|element| element.value().attr("id"))
            .find_map(id_digits)
    })
}

fn id_digits(attr: &str) -> Option<String> {
    let digits = attr
        .strip_prefix("listing_")
        .or_else(|| attr.strip_prefix("mylisting_"))?;

    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        Some(digits.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_row(id: &str, name: &str, price: &str) -> String {
        format!(
            r#"<a class="market_listing_row_link" href="https://steamcommunity.com/market/listings/730/{name}">
                 <div id="{id}" class="market_listing_row">
                   <span class="market_listing_item_name">{name}</span>
                   <span class="market_listing_price_with_fee">{price}</span>
                 </div>
               </a>"#
        )
    }

    fn nested_row(name: &str, price: &str) -> String {
        format!(
            r#"<a class="market_listing_row_link" href="https://steamcommunity.com/market/listings/730/{name}">
                 <div class="market_listing_row">
                   <span class="market_listing_item_name">{name}</span>
                   <span class="market_table_value"><span class="normal_price">{price}</span></span>
                 </div>
               </a>"#
        )
    }

    fn priceless_row(name: &str) -> String {
        format!(
            r#"<a class="market_listing_row_link" href="https://steamcommunity.com/market/listings/730/{name}">
                 <div class="market_listing_row">
                   <span class="market_listing_item_name">{name}</span>
                 </div>
               </a>"#
        )
    }

    #[test]
    fn extracts_rows_in_document_order() {
        let html = format!(
            "{}{}",
            flat_row("listing_111", "AWP | Asiimov", "$10.50"),
            flat_row("listing_222", "AK-47 | Redline", "$7.25"),
        );

        let listings = extract_listings(&html);

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "AWP | Asiimov");
        assert_eq!(listings[0].price, 10.5);
        assert_eq!(listings[0].id.as_deref(), Some("111"));
        assert_eq!(listings[1].id.as_deref(), Some("222"));
    }

    #[test]
    fn handles_the_nested_price_container_variant() {
        let listings = extract_listings(&nested_row("M4A4 | Howl", "12,34€"));

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, 12.34);
        assert_eq!(listings[0].id, None);
    }

    #[test]
    fn skips_malformed_entries_and_keeps_the_rest() {
        let html = format!(
            "{}{}{}{}{}",
            flat_row("listing_1", "One", "$1.00"),
            flat_row("listing_2", "Two", "$2.00"),
            priceless_row("Three"),
            flat_row("listing_4", "Four", "$4.00"),
            flat_row("listing_5", "Five", "$5.00"),
        );

        let listings = extract_listings(&html);

        assert_eq!(listings.len(), 4);
        assert!(listings.iter().all(|listing| listing.name != "Three"));
    }

    #[test]
    fn recognizes_the_mylisting_id_form() {
        let listings = extract_listings(&flat_row("mylisting_777", "Mine", "$3.00"));
        assert_eq!(listings[0].id.as_deref(), Some("777"));
    }

    #[test]
    fn rejects_id_attributes_without_a_digit_suffix() {
        assert_eq!(id_digits("listing_abc"), None);
        assert_eq!(id_digits("listing_"), None);
        assert_eq!(id_digits("unrelated"), None);
        assert_eq!(id_digits("listing_42").as_deref(), Some("42"));
    }

    #[test]
    fn resolves_an_id_from_a_detail_page() {
        let html = r#"<html><body>
            <div id="searchResults"></div>
            <div id="listing_987654321" class="market_listing_row"></div>
        </body></html>"#;

        assert_eq!(resolve_listing_id(html).as_deref(), Some("987654321"));
        assert_eq!(resolve_listing_id("<html></html>"), None);
    }
}
