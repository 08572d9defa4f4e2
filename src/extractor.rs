//! Pulls raw product field bags out of Amazon search-result pages.
//!
//! Amazon's markup shifts often, so every field is looked up through an
//! ordered list of selectors and a missing field only leaves that field empty.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;

use crate::data_models::{RawPrice, RawProduct};
use crate::error::SearchError;
use crate::normalizer::resolve_product_url;

fn compile(patterns: &[&str]) -> Vec<Selector> {
    patterns
        .iter()
        .map(|p| Selector::parse(p).expect("static selector must parse"))
        .collect()
}

mod selectors {
    use super::*;

    pub static RESULT: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("[data-component-type='s-search-result']").expect("static selector")
    });

    /// Used only when no primary result containers are present.
    pub static RESULT_FALLBACK: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("div[data-asin]:not([data-asin=''])").expect("static selector")
    });

    pub static TITLE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        compile(&[
            "h2 a span",
            "h2 span",
            "h2",
            "a.a-link-normal[href*='/dp/']",
        ])
    });

    pub static LINK: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        compile(&[
            "h2 a[href]",
            "a.a-link-normal[href*='/dp/']",
            "a[href*='/dp/']",
        ])
    });

    pub static IMAGE: LazyLock<Vec<Selector>> =
        LazyLock::new(|| compile(&["img.s-image", ".s-product-image-container img"]));

    pub static RATING_TEXT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        compile(&[
            "i.a-icon-star-small span.a-icon-alt",
            "i.a-icon-star span.a-icon-alt",
            "span.a-icon-alt",
        ])
    });

    pub static RATING_LABEL: LazyLock<Vec<Selector>> =
        LazyLock::new(|| compile(&["[aria-label*='out of 5 stars']"]));

    pub static REVIEWS_TEXT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        compile(&[
            "a[href*='customerReviews'] span.s-underline-text",
            "span.s-underline-text",
        ])
    });

    pub static REVIEWS_LABEL: LazyLock<Vec<Selector>> =
        LazyLock::new(|| compile(&["a[aria-label*='ratings']", "span[aria-label*='ratings']"]));

    pub static PRICE_TEXT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        compile(&[
            ".a-price:not([data-a-strike]) .a-offscreen",
            ".a-price .a-offscreen",
        ])
    });

    pub static PRICE_SYMBOL: LazyLock<Vec<Selector>> =
        LazyLock::new(|| compile(&[".a-price:not([data-a-strike]) .a-price-symbol"]));

    pub static PRICE_WHOLE: LazyLock<Vec<Selector>> =
        LazyLock::new(|| compile(&[".a-price:not([data-a-strike]) .a-price-whole"]));

    pub static PRICE_FRACTION: LazyLock<Vec<Selector>> =
        LazyLock::new(|| compile(&[".a-price:not([data-a-strike]) .a-price-fraction"]));

    pub static CAPTCHA_FORM: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse("form[action*='validateCaptcha']").expect("static selector")
    });

    pub static ANY_CONTENT: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("head *, body *").expect("static selector"));

    pub static PAGE_TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("title").expect("static selector"));

    pub static BODY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("body").expect("static selector"));
}

/// Phrases that only show up on bot-check or error pages.
const BLOCKED_PAGE_MARKERS: &[&str] = &[
    "robot check",
    "enter the characters you see",
    "type the characters you see",
    "to discuss automated access to amazon data",
    "sorry! something went wrong",
    "503 service unavailable",
    "api-services-support@amazon.com",
];

/// Extracts up to `limit` raw product bags, in page order.
///
/// Only cards with a title and a link to a product page count toward
/// `limit`. A page with no result cards is a valid empty result. Input that is not
/// markup, or is a CAPTCHA/error page, is a `ParseError`.
pub fn extract(raw: &str, limit: usize) -> Result<Vec<RawProduct>, SearchError> {
    let trimmed = raw.trim_start_matches('\u{feff}').trim_start();

    if trimmed.starts_with('{') {
        return extract_json_listing(trimmed, limit);
    }
    if !trimmed.starts_with('<') {
        return Err(SearchError::ParseError(
            "upstream response is not an HTML document".to_string(),
        ));
    }

    let document = Html::parse_document(trimmed);
    if document.select(&selectors::ANY_CONTENT).next().is_none() {
        return Err(SearchError::ParseError(
            "upstream response contains no markup".to_string(),
        ));
    }

    let mut cards: Vec<ElementRef> = document.select(&selectors::RESULT).collect();
    if cards.is_empty() {
        cards = document.select(&selectors::RESULT_FALLBACK).collect();
        if !cards.is_empty() {
            log::debug!("using fallback containers, found {}", cards.len());
        }
    }

    check_for_blocked_page(&document, cards.is_empty())?;

    let mut products = Vec::new();
    for card in cards {
        if products.len() >= limit {
            break;
        }
        let product = extract_card(card);
        if !is_listing(&product) {
            log::debug!("skipping result slot without title or product link");
            continue;
        }
        products.push(product);
    }

    log::info!("extracted {} result cards", products.len());
    Ok(products)
}

fn check_for_blocked_page(document: &Html, no_cards: bool) -> Result<(), SearchError> {
    if document.select(&selectors::CAPTCHA_FORM).next().is_some() {
        return Err(SearchError::ParseError(
            "Amazon returned a bot-check page (captcha)".to_string(),
        ));
    }

    // Result pages carry inline scripts and product titles that can contain
    // any of the phrases below, so only a page without results is checked.
    if !no_cards {
        return Ok(());
    }

    let title = document
        .select(&selectors::PAGE_TITLE)
        .next()
        .map(|t| t.text().collect::<String>().to_lowercase())
        .unwrap_or_default();
    let body = document
        .select(&selectors::BODY)
        .next()
        .map(|b| b.text().collect::<Vec<_>>().join(" ").to_lowercase())
        .unwrap_or_default();

    if let Some(marker) = BLOCKED_PAGE_MARKERS
        .iter()
        .find(|m| title.contains(*m) || body.contains(*m))
    {
        return Err(SearchError::ParseError(format!(
            "Amazon returned a blocked or error page ({marker})"
        )));
    }

    if title.contains("captcha") || body.contains("captcha") {
        return Err(SearchError::ParseError(
            "Amazon returned a bot-check page (captcha)".to_string(),
        ));
    }

    Ok(())
}

fn is_listing(product: &RawProduct) -> bool {
    product.title.is_some()
        && product
            .href
            .as_deref()
            .and_then(resolve_product_url)
            .is_some()
}

fn extract_card(card: ElementRef) -> RawProduct {
    let title = first_text(card, &selectors::TITLE)
        .or_else(|| first_attr(card, &selectors::IMAGE, "alt"));

    RawProduct {
        title,
        price: RawPrice {
            text: first_text(card, &selectors::PRICE_TEXT),
            symbol: first_text(card, &selectors::PRICE_SYMBOL),
            whole: first_text(card, &selectors::PRICE_WHOLE),
            fraction: first_text(card, &selectors::PRICE_FRACTION),
        },
        rating: first_text(card, &selectors::RATING_TEXT)
            .or_else(|| first_attr(card, &selectors::RATING_LABEL, "aria-label")),
        reviews_count: first_text(card, &selectors::REVIEWS_TEXT)
            .or_else(|| first_attr(card, &selectors::REVIEWS_LABEL, "aria-label")),
        href: first_attr(card, &selectors::LINK, "href"),
        image: first_attr(card, &selectors::IMAGE, "src"),
    }
}

/// Whitespace-collapsed text of the first element matched by the earliest
/// selector that yields non-empty text.
fn first_text(card: ElementRef, candidates: &[Selector]) -> Option<String> {
    candidates.iter().find_map(|selector| {
        card.select(selector).find_map(|el| {
            let text = el.text().collect::<String>();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            (!text.is_empty()).then_some(text)
        })
    })
}

fn first_attr(card: ElementRef, candidates: &[Selector], attr: &str) -> Option<String> {
    candidates.iter().find_map(|selector| {
        card.select(selector).find_map(|el| {
            el.value()
                .attr(attr)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
    })
}

/// Converts a JSON listing (`{"products": [...]}` or `{"items": [...]}`) as
/// returned by some unlocker API endpoints.
fn extract_json_listing(raw: &str, limit: usize) -> Result<Vec<RawProduct>, SearchError> {
    let payload: Value = serde_json::from_str(raw)
        .map_err(|e| SearchError::ParseError(format!("upstream returned invalid JSON: {e}")))?;

    let listing = payload
        .get("products")
        .or_else(|| payload.get("items"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            SearchError::ParseError("upstream JSON has no products or items array".to_string())
        })?;

    let products: Vec<RawProduct> = listing
        .iter()
        .filter(|entry| entry.is_object())
        .map(|entry| RawProduct {
            title: field(entry, &["title", "name"]),
            price: RawPrice {
                text: field(entry, &["price", "final_price"]),
                ..RawPrice::default()
            },
            rating: field(entry, &["rating"]),
            reviews_count: field(entry, &["reviews_count", "reviews"]),
            href: field(entry, &["url", "link"]),
            image: field(entry, &["image", "thumbnail"]),
        })
        .filter(is_listing)
        .take(limit)
        .collect();

    log::info!("extracted {} products from JSON listing", products.len());
    Ok(products)
}

fn field(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match entry.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
