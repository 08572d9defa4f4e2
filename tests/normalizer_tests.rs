use shopscout::data_models::{Product, RawPrice, RawProduct, Source};
use shopscout::normalizer::*;

fn full_bag() -> RawProduct {
    RawProduct {
        title: Some("  Acme Phone X\n   128GB ".to_string()),
        price: RawPrice::from_text("$99.99"),
        rating: Some("4.5 out of 5 stars".to_string()),
        reviews_count: Some("1,234".to_string()),
        href: Some("/Acme-Phone/dp/B0TEST0001/ref=sr_1_1".to_string()),
        image: Some("https://m.media-amazon.com/images/I/acme.jpg".to_string()),
    }
}

/// Rebuilds a bag from an already normalized product.
fn bag_from(product: &Product) -> RawProduct {
    RawProduct {
        title: Some(product.title.clone()),
        price: match (product.price, &product.currency) {
            (Some(price), Some(currency)) => RawPrice::from_text(format!("{currency} {price}")),
            _ => RawPrice::default(),
        },
        rating: product.rating.map(|r| format!("{r} out of 5 stars")),
        reviews_count: product.reviews_count.map(|c| c.to_string()),
        href: Some(product.url.clone()),
        image: product.image.clone(),
    }
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    #[test]
    fn test_full_bag() {
        let product = normalize(&full_bag()).expect("bag should normalize");
        assert_eq!(product.title, "Acme Phone X 128GB");
        assert_eq!(product.price, Some(99.99));
        assert_eq!(product.currency.as_deref(), Some("USD"));
        assert_eq!(product.rating, Some(4.5));
        assert_eq!(product.reviews_count, Some(1234));
        assert_eq!(
            product.url,
            "https://www.amazon.com/Acme-Phone/dp/B0TEST0001/ref=sr_1_1"
        );
        assert_eq!(
            product.image.as_deref(),
            Some("https://m.media-amazon.com/images/I/acme.jpg")
        );
        assert_eq!(product.source, Source::BrightData);
    }

    #[test]
    fn test_idempotent_on_canonical_bag() {
        let first = normalize(&full_bag()).unwrap();
        let second = normalize(&bag_from(&first)).unwrap();
        assert_eq!(first, second);

        let large = RawProduct {
            price: RawPrice::from_text("$1,199.00"),
            ..full_bag()
        };
        let first = normalize(&large).unwrap();
        assert_eq!(first.price, Some(1199.0));
        assert_eq!(normalize(&bag_from(&first)).unwrap(), first);
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let bag = RawProduct {
            title: Some("   ".to_string()),
            ..full_bag()
        };
        assert!(normalize(&bag).is_none());

        let bag = RawProduct {
            title: None,
            ..full_bag()
        };
        assert!(normalize(&bag).is_none());
    }

    #[test]
    fn test_missing_or_non_product_url_is_rejected() {
        let bag = RawProduct {
            href: None,
            ..full_bag()
        };
        assert!(normalize(&bag).is_none());

        let bag = RawProduct {
            href: Some("/gp/help/customer/display.html".to_string()),
            ..full_bag()
        };
        assert!(normalize(&bag).is_none());

        let bag = RawProduct {
            href: Some("javascript:void(0)".to_string()),
            ..full_bag()
        };
        assert!(normalize(&bag).is_none());
    }

    #[test]
    fn test_malformed_optional_fields_degrade_to_null() {
        let bag = RawProduct {
            price: RawPrice::from_text("See price in cart"),
            rating: Some("Not yet rated".to_string()),
            reviews_count: Some("no reviews".to_string()),
            image: Some("data:image/gif;base64,R0lGOD".to_string()),
            ..full_bag()
        };
        let product = normalize(&bag).expect("optional fields must not reject the bag");
        assert_eq!(product.title, "Acme Phone X 128GB");
        assert_eq!(product.price, None);
        assert_eq!(product.currency, None);
        assert_eq!(product.rating, None);
        assert_eq!(product.reviews_count, None);
        assert_eq!(product.image, None);
        assert!(product.url.contains("/dp/B0TEST0001"));
    }

    #[test]
    fn test_split_price_parts() {
        let bag = RawProduct {
            price: RawPrice {
                text: None,
                symbol: Some("$".to_string()),
                whole: Some("1,199.".to_string()),
                fraction: Some("00".to_string()),
            },
            ..full_bag()
        };
        let product = normalize(&bag).unwrap();
        assert_eq!(product.price, Some(1199.0));
        assert_eq!(product.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_sponsored_redirect_is_kept() {
        let bag = RawProduct {
            href: Some("/sspa/click?ie=UTF8&spc=abc&url=%2FPhone%2Fdp%2FB0SPONSOR1".to_string()),
            ..full_bag()
        };
        let product = normalize(&bag).unwrap();
        assert!(product.url.starts_with("https://www.amazon.com/sspa/click"));
    }
}

#[cfg(test)]
mod parse_price_tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(parse_price("$99.99"), Some((99.99, "USD".to_string())));
        assert_eq!(parse_price("€89.50"), Some((89.5, "EUR".to_string())));
        assert_eq!(parse_price("£12"), Some((12.0, "GBP".to_string())));
        assert_eq!(parse_price("¥2,980"), Some((2980.0, "JPY".to_string())));
        assert_eq!(parse_price("CA$45.00"), Some((45.0, "CAD".to_string())));
    }

    #[test]
    fn test_codes() {
        assert_eq!(parse_price("USD 1199"), Some((1199.0, "USD".to_string())));
        assert_eq!(parse_price("89,50 EUR"), Some((89.5, "EUR".to_string())));
    }

    #[test]
    fn test_defaults_to_usd() {
        assert_eq!(parse_price("42.10"), Some((42.1, "USD".to_string())));
    }

    #[test]
    fn test_separators() {
        assert_eq!(parse_price("$1,199.00").map(|p| p.0), Some(1199.0));
        assert_eq!(parse_price("1.234,56 €").map(|p| p.0), Some(1234.56));
        assert_eq!(parse_price("1.234.567").map(|p| p.0), Some(1234567.0));
        assert_eq!(parse_price("$1,299").map(|p| p.0), Some(1299.0));
    }

    #[test]
    fn test_range_takes_first_amount() {
        assert_eq!(parse_price("$10.99 - $20.99").map(|p| p.0), Some(10.99));
    }

    #[test]
    fn test_unparsable() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("$"), None);
        assert_eq!(parse_price("Currently unavailable"), None);
    }
}

#[cfg(test)]
mod parse_rating_tests {
    use super::*;

    #[test]
    fn test_leading_number() {
        assert_eq!(parse_rating("4.5 out of 5 stars"), Some(4.5));
        assert_eq!(parse_rating("5.0 out of 5 stars"), Some(5.0));
        assert_eq!(parse_rating("4,3 von 5 Sternen"), Some(4.3));
        assert_eq!(parse_rating("0"), Some(0.0));
    }

    #[test]
    fn test_out_of_range_is_null() {
        assert_eq!(parse_rating("7.5 out of 5 stars"), None);
    }

    #[test]
    fn test_unparsable() {
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("Not yet rated"), None);
    }
}

#[cfg(test)]
mod parse_reviews_count_tests {
    use super::*;

    #[test]
    fn test_separators_and_noise() {
        assert_eq!(parse_reviews_count("(2,345)"), Some(2345));
        assert_eq!(parse_reviews_count("12,874 ratings"), Some(12874));
        assert_eq!(parse_reviews_count("512"), Some(512));
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(parse_reviews_count("(1.2K)"), Some(1200));
        assert_eq!(parse_reviews_count("3K"), Some(3000));
        assert_eq!(parse_reviews_count("1.5M ratings"), Some(1_500_000));
    }

    #[test]
    fn test_unparsable() {
        assert_eq!(parse_reviews_count(""), None);
        assert_eq!(parse_reviews_count("no reviews"), None);
    }
}

#[cfg(test)]
mod resolve_product_url_tests {
    use super::*;

    #[test]
    fn test_relative_and_absolute() {
        assert_eq!(
            resolve_product_url("/dp/B0TEST0001").as_deref(),
            Some("https://www.amazon.com/dp/B0TEST0001")
        );
        assert_eq!(
            resolve_product_url("https://www.amazon.com/gp/product/B0TEST0001").as_deref(),
            Some("https://www.amazon.com/gp/product/B0TEST0001")
        );
    }

    #[test]
    fn test_rejects_non_product_paths() {
        assert_eq!(resolve_product_url(""), None);
        assert_eq!(resolve_product_url("/s?k=phone"), None);
        assert_eq!(resolve_product_url("mailto:help@example.com"), None);
    }
}
