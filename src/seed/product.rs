//! Synthetic `productSet` inputs.

use rand::Rng;
use serde::Serialize;

use super::SeedGenerator;
use crate::money::Amount;

const SIZES: [&str; 5] = ["S", "M", "L", "XL", "XXL"];
const SIZE_OPTION: &str = "Size";
const TAGS: [&str; 8] = [
    "new", "sale", "summer", "winter", "bestseller", "limited", "eco", "imported",
];

/// Publication status of a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Active,
    Draft,
    Archived,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionValueInput {
    pub name: String,
}

/// A product option and its values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductOptionInput {
    pub name: String,
    pub values: Vec<OptionValueInput>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOptionValueInput {
    pub name: String,
    pub option_name: String,
}

/// One product variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub sku: String,
    /// Thirteen-digit barcode.
    pub barcode: String,
    pub price: String,
    /// Serialized as `null` when the variant is not discounted.
    pub compare_at_price: Option<String>,
    /// Always `DENY`.
    pub inventory_policy: String,
    pub option_values: Vec<VariantOptionValueInput>,
}

/// Input for the `productSet` mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSetInput {
    pub title: String,
    pub description_html: String,
    pub vendor: String,
    pub product_type: String,
    pub status: ProductStatus,
    pub tags: Vec<String>,
    pub product_options: Vec<ProductOptionInput>,
    pub variants: Vec<VariantInput>,
}

impl<R: Rng> SeedGenerator<R> {
    /// Builds one `productSet` input with a `Size` option and one to three variants.
    pub fn product_input(&mut self) -> ProductSetInput {
        let title = self.product_name();
        let status = match self.rng.gen_range(0..10) {
            0..=6 => ProductStatus::Active,
            7 | 8 => ProductStatus::Draft,
            _ => ProductStatus::Archived,
        };

        let variant_count = self.rng.gen_range(1..=3);
        let start = self.rng.gen_range(0..=SIZES.len() - variant_count);
        let sizes = &SIZES[start..start + variant_count];

        let variants = sizes
            .iter()
            .map(|size| {
                let cents: i64 = self.rng.gen_range(1000..=10_000);
                let compare_at_price = self
                    .rng
                    .gen_bool(0.3)
                    .then(|| Amount::from_cents(cents + cents / 4).to_fixed2());
                VariantInput {
                    sku: format!("{}-{size}", self.mpn(7)),
                    barcode: self.digits(13),
                    price: Amount::from_cents(cents).to_fixed2(),
                    compare_at_price,
                    inventory_policy: "DENY".to_string(),
                    option_values: vec![VariantOptionValueInput {
                        name: (*size).to_string(),
                        option_name: SIZE_OPTION.to_string(),
                    }],
                }
            })
            .collect();

        let tag_count = self.rng.gen_range(1..=3);
        let tags = rand::seq::index::sample(&mut self.rng, TAGS.len(), tag_count)
            .into_iter()
            .map(|i| TAGS[i].to_string())
            .collect();

        ProductSetInput {
            description_html: format!(
                "<strong>{title} made by hand for everyday use.</strong>"
            ),
            title,
            vendor: self.company(),
            product_type: self.department(),
            status,
            tags,
            product_options: vec![ProductOptionInput {
                name: SIZE_OPTION.to_string(),
                values: sizes
                    .iter()
                    .map(|size| OptionValueInput {
                        name: (*size).to_string(),
                    })
                    .collect(),
            }],
            variants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator(seed: u64) -> SeedGenerator<StdRng> {
        SeedGenerator::new(StdRng::seed_from_u64(seed), Vec::new(), "EUR")
    }

    #[test]
    fn test_variants_match_option_values() {
        let mut g = generator(21);
        for _ in 0..50 {
            let product = g.product_input();
            assert!((1..=3).contains(&product.variants.len()));
            let option_values: Vec<&str> = product.product_options[0]
                .values
                .iter()
                .map(|v| v.name.as_str())
                .collect();
            let variant_sizes: Vec<&str> = product
                .variants
                .iter()
                .map(|v| v.option_values[0].name.as_str())
                .collect();
            assert_eq!(option_values, variant_sizes);

            for variant in &product.variants {
                assert_eq!(variant.barcode.len(), 13);
                assert_eq!(variant.inventory_policy, "DENY");
                let price: Amount = variant.price.parse().unwrap();
                if let Some(compare) = &variant.compare_at_price {
                    assert!(compare.parse::<Amount>().unwrap() > price);
                }
            }
        }
    }

    #[test]
    fn test_tags_are_distinct() {
        let mut g = generator(22);
        let product = g.product_input();
        let mut tags = product.tags.clone();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), product.tags.len());
    }

    #[test]
    fn test_serializes_for_product_set() {
        let mut g = generator(23);
        let value = serde_json::to_value(g.product_input()).unwrap();
        assert!(value["descriptionHtml"].as_str().unwrap().starts_with("<strong>"));
        assert!(matches!(
            value["status"].as_str(),
            Some("ACTIVE" | "DRAFT" | "ARCHIVED")
        ));
        assert_eq!(value["productOptions"][0]["name"], "Size");
        assert_eq!(value["variants"][0]["optionValues"][0]["optionName"], "Size");
        assert!(value["variants"][0].get("compareAtPrice").is_some());
    }
}
