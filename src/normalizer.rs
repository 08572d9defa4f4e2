use reqwest::Url;

use crate::config::AMAZON_ORIGIN;
use crate::data_models::{Product, RawProduct, Source};

/// Multi-character markers must come before the single symbols they contain.
const CURRENCY_MARKERS: &[(&str, &str)] = &[
    ("US$", "USD"),
    ("CA$", "CAD"),
    ("C$", "CAD"),
    ("A$", "AUD"),
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
];

const CURRENCY_CODES: &[&str] = &["USD", "EUR", "GBP", "JPY", "CAD", "AUD", "INR"];

const DEFAULT_CURRENCY: &str = "USD";

/// Turns a raw bag into a canonical product.
///
/// Returns `None` when the title is blank or the link does not resolve to a
/// product page. Unparsable optional fields become `None` instead.
pub fn normalize(raw: &RawProduct) -> Option<Product> {
    let title = raw
        .title
        .as_deref()
        .map(collapse_whitespace)
        .filter(|t| !t.is_empty())?;

    let url = match raw.href.as_deref().and_then(resolve_product_url) {
        Some(url) => url,
        None => {
            log::debug!("dropping '{title}': no usable product link ({:?})", raw.href);
            return None;
        }
    };

    let (price, currency) = match raw.price.compose().as_deref().and_then(parse_price) {
        Some((amount, currency)) => (Some(amount), Some(currency)),
        None => (None, None),
    };

    Some(Product {
        title,
        price,
        currency,
        rating: raw.rating.as_deref().and_then(parse_rating),
        reviews_count: raw.reviews_count.as_deref().and_then(parse_reviews_count),
        url,
        image: raw.image.as_deref().and_then(absolute_http_url),
        source: Source::BrightData,
    })
}

/// Parses price text such as `$1,199.00`, `EUR 89,50` or `£12`.
///
/// The currency defaults to USD when the text carries no marker.
pub fn parse_price(text: &str) -> Option<(f64, String)> {
    let amount = parse_amount(text)?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let currency = detect_currency(text).unwrap_or(DEFAULT_CURRENCY);
    Some((amount, currency.to_string()))
}

fn detect_currency(text: &str) -> Option<&'static str> {
    let upper = text.to_uppercase();
    let code = upper
        .split(|c: char| !c.is_ascii_alphabetic())
        .find_map(|word| CURRENCY_CODES.iter().copied().find(|code| *code == word));
    if code.is_some() {
        return code;
    }
    CURRENCY_MARKERS
        .iter()
        .find(|(marker, _)| upper.contains(marker))
        .map(|(_, code)| *code)
}

/// Reads the first number in `text`, working out which of `.`/`,` is the
/// decimal separator.
fn parse_amount(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let number = number.trim_end_matches(['.', ',']);

    let last_dot = number.rfind('.');
    let last_comma = number.rfind(',');
    let decimal_at = match (last_dot, last_comma) {
        (None, None) => None,
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        // A lone separator kind followed by exactly three digits groups
        // thousands: `1,199`, `1.234.567`.
        (Some(at), None) | (None, Some(at)) => (number.len() - at - 1 != 3).then_some(at),
    };

    let mut cleaned = String::with_capacity(number.len());
    for (i, c) in number.char_indices() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if Some(i) == decimal_at {
            cleaned.push('.');
        }
    }
    cleaned.parse().ok()
}

/// Reads the leading number of text like `4.5 out of 5 stars` or `4,5 von 5`.
pub fn parse_rating(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let number: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect::<String>()
        .trim_end_matches(['.', ','])
        .replace(',', ".");
    let rating: f64 = number.parse().ok()?;
    (0.0..=5.0).contains(&rating).then_some(rating)
}

/// Parses counts like `(2,345)`, `1.234 ratings` or `1.2K`.
pub fn parse_reviews_count(text: &str) -> Option<u64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let number: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let mut after = rest[number.len()..].trim_start().chars();
    let suffix = after.next().map(|c| c.to_ascii_uppercase());
    let standalone = !after.next().is_some_and(char::is_alphabetic);

    let multiplier = match suffix {
        Some('K') if standalone => 1_000.0,
        Some('M') if standalone => 1_000_000.0,
        _ => {
            let digits: String = number.chars().filter(char::is_ascii_digit).collect();
            return digits.parse().ok();
        }
    };

    let scaled: f64 = number.replace(',', ".").parse().ok()?;
    Some((scaled * multiplier).round() as u64)
}

/// Resolves `href` against the Amazon origin and keeps it only if it points
/// at a product page.
pub fn resolve_product_url(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let base = Url::parse(AMAZON_ORIGIN).ok()?;
    let url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.host_str()?;

    let path = url.path();
    let is_product = path.contains("/dp/")
        || path.contains("/gp/product/")
        || path.starts_with("/sspa/click");
    is_product.then(|| url.to_string())
}

fn absolute_http_url(src: &str) -> Option<String> {
    let url = Url::parse(src.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url.to_string()),
        _ => None,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
