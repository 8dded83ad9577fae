//! Synthetic `orderCreate` inputs.

use rand::Rng;
use serde::Serialize;

use super::{location_gid, SeedGenerator};
use crate::money::{Amount, MoneyError};

/// A shipping method generated orders choose from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShippingOption {
    /// Title shown on the order.
    pub title: &'static str,
    /// Price in cents.
    pub price_cents: i64,
}

/// Shipping methods available to generated orders.
pub const SHIPPING_OPTIONS: [ShippingOption; 5] = [
    ShippingOption {
        title: "ACS Smartpoint Locker",
        price_cents: 149,
    },
    ShippingOption {
        title: "BOX NOW Lockers",
        price_cents: 300,
    },
    ShippingOption {
        title: "Courier",
        price_cents: 300,
    },
    ShippingOption {
        title: "Courier (free over threshold)",
        price_cents: 0,
    },
    ShippingOption {
        title: "Local Delivery",
        price_cents: 600,
    },
];

/// A payment gateway and the transaction status it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentMethod {
    /// Gateway name.
    pub gateway: &'static str,
    /// `PENDING` or `SUCCESS`.
    pub status: &'static str,
}

/// Payment gateways generated orders choose from.
pub const PAYMENT_METHODS: [PaymentMethod; 5] = [
    PaymentMethod {
        gateway: "Cash on Delivery (COD)",
        status: "PENDING",
    },
    PaymentMethod {
        gateway: "Bank Deposit",
        status: "PENDING",
    },
    PaymentMethod {
        gateway: "Pay in store",
        status: "PENDING",
    },
    PaymentMethod {
        gateway: "Viva.com Smart Checkout",
        status: "SUCCESS",
    },
    PaymentMethod {
        gateway: "Klarna",
        status: "SUCCESS",
    },
];

/// An amount in one currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as a string.
    pub amount: String,
    /// ISO 4217 code.
    pub currency_code: String,
}

/// `MoneyBagInput` with the shop currency only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyBag {
    /// Amount in the shop's currency.
    pub shop_money: Money,
}

impl MoneyBag {
    fn new(amount: String, currency: &str) -> Self {
        Self {
            shop_money: Money {
                amount,
                currency_code: currency.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddressInput {
    pub address1: String,
    pub city: String,
    pub country_code: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub zip: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentInput {
    /// Global ID of the fulfilling location.
    pub location_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLineInput {
    pub title: String,
    pub price_set: MoneyBag,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    /// Unit price.
    pub price_set: MoneyBag,
    pub quantity: u32,
    pub requires_shipping: bool,
    /// Seven-character manufacturer part number.
    pub sku: String,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// Always `SALE`.
    pub kind: String,
    pub status: String,
    pub amount_set: MoneyBag,
    pub gateway: String,
}

/// Input for the `orderCreate` mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateInput {
    pub email: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub shipping_address: MailingAddressInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment: Option<FulfillmentInput>,
    pub shipping_lines: Vec<ShippingLineInput>,
    pub line_items: Vec<LineItemInput>,
    pub transactions: Vec<TransactionInput>,
}

impl OrderCreateInput {
    /// Sum of line totals and shipping, parsed back from the input strings.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError`] if any amount is not a valid decimal.
    pub fn computed_total(&self) -> Result<Amount, MoneyError> {
        let mut total = Amount::ZERO;
        for item in &self.line_items {
            let price: Amount = item.price_set.shop_money.amount.parse()?;
            total = total + price.times(item.quantity);
        }
        for line in &self.shipping_lines {
            total = total + line.price_set.shop_money.amount.parse::<Amount>()?;
        }
        Ok(total)
    }
}

/// Renders thousandths with exactly three fraction digits.
fn millis_string(millis: i64) -> String {
    format!("{}.{:03}", millis / 1000, millis % 1000)
}

impl<R: Rng> SeedGenerator<R> {
    /// Builds one `orderCreate` input.
    ///
    /// The sale transaction's amount is the exact sum of every line total
    /// plus shipping, rounded to two decimals once.
    pub fn order_input(&mut self) -> OrderCreateInput {
        let currency = self.currency.clone();
        let location = self.location();

        let shipping = SHIPPING_OPTIONS[self.rng.gen_range(0..SHIPPING_OPTIONS.len())];
        let payment = PAYMENT_METHODS[self.rng.gen_range(0..PAYMENT_METHODS.len())];

        let mut total = Amount::from_cents(shipping.price_cents);
        let count = self.rng.gen_range(1..=5);
        let mut line_items = Vec::with_capacity(count);
        for _ in 0..count {
            let millis: i64 = self.rng.gen_range(20_000..=1_500_000);
            let quantity: u32 = self.rng.gen_range(1..=3);
            total = total + Amount::from_millis(millis).times(quantity);

            line_items.push(LineItemInput {
                price_set: MoneyBag::new(millis_string(millis), &currency),
                quantity,
                requires_shipping: self.rng.gen_bool(0.95),
                sku: self.mpn(7),
                title: self.product_name(),
            });
        }

        OrderCreateInput {
            email: self.email(),
            tags: location
                .iter()
                .map(|id| format!("anathesi:{id}"))
                .collect(),
            shipping_address: MailingAddressInput {
                address1: self.street_address(),
                city: self.city(),
                country_code: "GR".to_string(),
                first_name: self.first_name(),
                last_name: self.last_name(),
                phone: self.phone(),
                zip: self.zip(),
            },
            fulfillment: location.map(|id| FulfillmentInput {
                location_id: location_gid(&id),
            }),
            shipping_lines: vec![ShippingLineInput {
                title: shipping.title.to_string(),
                price_set: MoneyBag::new(Amount::from_cents(shipping.price_cents).to_fixed2(), &currency),
            }],
            line_items,
            transactions: vec![TransactionInput {
                kind: "SALE".to_string(),
                status: payment.status.to_string(),
                amount_set: MoneyBag::new(total.to_fixed2(), &currency),
                gateway: payment.gateway.to_string(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator(seed: u64, locations: &[&str]) -> SeedGenerator<StdRng> {
        SeedGenerator::new(
            StdRng::seed_from_u64(seed),
            locations.iter().map(ToString::to_string).collect(),
            "EUR",
        )
    }

    #[test]
    fn test_order_shape() {
        let mut g = generator(11, &[]);
        for _ in 0..50 {
            let order = g.order_input();
            assert!((1..=5).contains(&order.line_items.len()));
            assert_eq!(order.shipping_lines.len(), 1);
            assert_eq!(order.transactions.len(), 1);
            assert_eq!(order.transactions[0].kind, "SALE");
            assert_eq!(order.shipping_address.country_code, "GR");
            assert!(order.tags.is_empty());
            assert!(order.fulfillment.is_none());

            for item in &order.line_items {
                assert!((1..=3).contains(&item.quantity));
                assert_eq!(item.sku.len(), 7);
                let price: Amount = item.price_set.shop_money.amount.parse().unwrap();
                assert!(price >= Amount::from_cents(2000));
                assert!(price <= Amount::from_cents(150_000));
                assert_eq!(item.price_set.shop_money.currency_code, "EUR");
            }
        }
    }

    #[test]
    fn test_transaction_amount_is_exact_total_rounded_once() {
        let mut g = generator(12, &[]);
        for _ in 0..100 {
            let order = g.order_input();
            let expected = order.computed_total().unwrap().to_fixed2();
            assert_eq!(order.transactions[0].amount_set.shop_money.amount, expected);
        }
    }

    #[test]
    fn test_locations_tag_and_fulfil() {
        let mut g = generator(13, &["93743448396"]);
        let order = g.order_input();
        assert_eq!(order.tags, vec!["anathesi:93743448396"]);
        assert_eq!(
            order.fulfillment.unwrap().location_id,
            "gid://shopify/Location/93743448396"
        );
    }

    #[test]
    fn test_shipping_and_payment_come_from_fixed_lists() {
        let mut g = generator(14, &[]);
        let order = g.order_input();
        let shipping = &order.shipping_lines[0];
        assert!(SHIPPING_OPTIONS.iter().any(|o| o.title == shipping.title));
        let transaction = &order.transactions[0];
        assert!(PAYMENT_METHODS
            .iter()
            .any(|m| m.gateway == transaction.gateway && m.status == transaction.status));
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut g = generator(15, &["1"]);
        let value = serde_json::to_value(g.order_input()).unwrap();
        assert!(value["shippingAddress"]["countryCode"].is_string());
        assert!(value["lineItems"][0]["priceSet"]["shopMoney"]["currencyCode"].is_string());
        assert!(value["lineItems"][0]["requiresShipping"].is_boolean());
        assert!(value["transactions"][0]["amountSet"].is_object());
        assert_eq!(value["fulfillment"]["locationId"], "gid://shopify/Location/1");
    }

    #[test]
    fn test_millis_string() {
        assert_eq!(millis_string(20_000), "20.000");
        assert_eq!(millis_string(12_345), "12.345");
        assert_eq!(millis_string(1_500_000), "1500.000");
    }
}
