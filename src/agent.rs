use crate::data_models::Product;

const TOP_TITLE_CHARS: usize = 50;

/// Builds the one-paragraph "agent answer" for a result set.
///
/// Pure and deterministic: the same products and query always give the same
/// text.
pub fn summarize(products: &[Product], query: &str) -> String {
    if products.is_empty() {
        return format!("No results found for '{query}'.");
    }

    let mut parts = vec![format!(
        "Found {} product(s) for '{}'.",
        products.len(),
        query
    )];

    parts.push(price_fragment(products));

    let ratings: Vec<f64> = products.iter().filter_map(|p| p.rating).collect();
    if !ratings.is_empty() {
        let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
        parts.push(format!("Average rating: {average:.1}/5.0."));
    }

    let reviews: Vec<u64> = products.iter().filter_map(|p| p.reviews_count).collect();
    if !reviews.is_empty() {
        let total: u64 = reviews.iter().sum();
        let average = (total as f64 / reviews.len() as f64).round() as u64;
        parts.push(format!(
            "Total reviews: {} (average: {} per product).",
            group_thousands(total),
            group_thousands(average)
        ));
    }

    if let Some(top) = top_rated(products) {
        parts.push(top_rated_fragment(top));
    }

    parts.join(" ")
}

fn price_fragment(products: &[Product]) -> String {
    let priced: Vec<(f64, Option<&str>)> = products
        .iter()
        .filter_map(|p| p.price.map(|price| (price, p.currency.as_deref())))
        .collect();

    if priced.is_empty() {
        return "Price unavailable.".to_string();
    }

    let min = priced.iter().map(|(p, _)| *p).fold(f64::INFINITY, f64::min);
    let max = priced.iter().map(|(p, _)| *p).fold(f64::NEG_INFINITY, f64::max);
    let average = priced.iter().map(|(p, _)| p).sum::<f64>() / priced.len() as f64;

    // Only label amounts when every priced item shares one currency.
    let first_currency = priced[0].1;
    let label = if priced.iter().all(|(_, c)| *c == first_currency) {
        first_currency
    } else {
        None
    };
    let money = |amount: f64| match label {
        Some(code) => format!("{code} {amount:.2}"),
        None => format!("{amount:.2}"),
    };

    format!(
        "Price range: {} - {} (average: {}).",
        money(min),
        money(max),
        money(average)
    )
}

/// Highest-rated product; the earliest one wins ties.
fn top_rated(products: &[Product]) -> Option<&Product> {
    let mut best: Option<(&Product, f64)> = None;
    for product in products {
        if let Some(rating) = product.rating {
            if best.is_none_or(|(_, top)| rating > top) {
                best = Some((product, rating));
            }
        }
    }
    best.map(|(product, _)| product)
}

fn top_rated_fragment(product: &Product) -> String {
    let title = if product.title.chars().count() > TOP_TITLE_CHARS {
        let cut: String = product.title.chars().take(TOP_TITLE_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        product.title.clone()
    };
    let rating = product.rating.unwrap_or_default();

    match product.reviews_count {
        Some(count) => format!(
            "Top rated: {title} ({rating:.1}/5.0, {} reviews).",
            group_thousands(count)
        ),
        None => format!("Top rated: {title} ({rating:.1}/5.0)."),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
