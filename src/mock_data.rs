use std::sync::LazyLock;

use crate::data_models::{Product, Source};

static MOCK_PRODUCTS: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        mock(
            "Nova X5 Smartphone, 128GB, 6.1\" OLED Display, Midnight Black",
            699.99,
            4.6,
            12_874,
            "MOCKNOVAX5",
        ),
        mock(
            "Pulse Lite Unlocked Phone, 64GB, Dual SIM, Ocean Blue",
            99.99,
            4.1,
            3_412,
            "MOCKPULSE1",
        ),
        mock(
            "Orbit 12 Pro 5G, 256GB, Triple Camera, Graphite",
            1199.00,
            4.7,
            8_950,
            "MOCKORBIT12",
        ),
        mock(
            "Zen Mini Compact Smartphone, 128GB, Silver",
            429.50,
            4.3,
            1_206,
            "MOCKZENMINI",
        ),
        mock(
            "Volt Max Rugged Phone, 128GB, 6000mAh Battery, Olive",
            249.00,
            3.9,
            587,
            "MOCKVOLTMAX",
        ),
    ]
});

fn mock(title: &str, price: f64, rating: f64, reviews_count: u64, asin: &str) -> Product {
    Product {
        title: title.to_string(),
        price: Some(price),
        currency: Some("USD".to_string()),
        rating: Some(rating),
        reviews_count: Some(reviews_count),
        url: format!("https://www.amazon.com/dp/{asin}"),
        image: Some(format!("https://images.example.com/mock/{asin}.jpg")),
        source: Source::Mock,
    }
}

/// The fixed development dataset served when no upstream credentials exist.
pub fn mock_products() -> Vec<Product> {
    MOCK_PRODUCTS.clone()
}
