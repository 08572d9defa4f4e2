use shopscout::agent::summarize;
use shopscout::data_models::{Product, Source};
use shopscout::mock_data::mock_products;

fn product(title: &str, price: Option<f64>, rating: Option<f64>, reviews: Option<u64>) -> Product {
    Product {
        title: title.to_string(),
        price,
        currency: price.map(|_| "USD".to_string()),
        rating,
        reviews_count: reviews,
        url: "https://www.amazon.com/dp/B0TEST0001".to_string(),
        image: None,
        source: Source::BrightData,
    }
}

#[test]
fn test_empty_results_message() {
    let answer = summarize(&[], "flux capacitor");
    assert_eq!(answer, "No results found for 'flux capacitor'.");
}

#[test]
fn test_price_range_contains_boundaries() {
    let products = vec![
        product("Budget", Some(99.99), None, None),
        product("Flagship", Some(1199.00), None, None),
    ];
    let answer = summarize(&products, "phone");
    assert!(answer.starts_with("Found 2 product(s) for 'phone'."));
    assert!(answer.contains("99.99"), "{answer}");
    assert!(answer.contains("1199.00"), "{answer}");
    assert!(answer.contains("Price range: USD 99.99 - USD 1199.00"), "{answer}");
}

#[test]
fn test_price_unavailable() {
    let products = vec![product("No price", None, Some(4.0), None)];
    let answer = summarize(&products, "phone");
    assert!(answer.contains("Price unavailable."), "{answer}");
}

#[test]
fn test_mixed_currencies_are_unlabelled() {
    let mut euro = product("Euro", Some(50.0), None, None);
    euro.currency = Some("EUR".to_string());
    let products = vec![product("Dollar", Some(10.0), None, None), euro];
    let answer = summarize(&products, "phone");
    assert!(answer.contains("Price range: 10.00 - 50.00"), "{answer}");
}

#[test]
fn test_rating_and_reviews() {
    let products = vec![
        product("Good", Some(10.0), Some(4.0), Some(1_000)),
        product("Best", Some(20.0), Some(4.8), Some(2_500)),
        product("Also best", Some(30.0), Some(4.8), None),
        product("Unrated", Some(40.0), None, None),
    ];
    let answer = summarize(&products, "phone");
    assert!(answer.contains("Average rating: 4.5/5.0."), "{answer}");
    assert!(
        answer.contains("Total reviews: 3,500 (average: 1,750 per product)."),
        "{answer}"
    );
    assert!(
        answer.contains("Top rated: Best (4.8/5.0, 2,500 reviews)."),
        "{answer}"
    );
}

#[test]
fn test_long_top_title_is_truncated() {
    let title = "A".repeat(80);
    let products = vec![product(&title, None, Some(5.0), None)];
    let answer = summarize(&products, "phone");
    assert!(answer.contains(&format!("Top rated: {}... (5.0/5.0).", "A".repeat(50))));
}

#[test]
fn test_deterministic() {
    let products = mock_products();
    let first = summarize(&products, "smartphone");
    let second = summarize(&products, "smartphone");
    assert_eq!(first, second);
    assert!(first.starts_with("Found 5 product(s) for 'smartphone'."));
}
