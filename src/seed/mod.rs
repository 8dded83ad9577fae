//! Synthetic store data.
//!
//! [`SeedGenerator`] builds ready-to-send mutation inputs for orders and
//! products from any [`Rng`]. Seed it with [`StdRng`] for reproducible
//! output:
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use shopify_data::seed::SeedGenerator;
//!
//! let mut generator = SeedGenerator::new(StdRng::seed_from_u64(7), Vec::new(), "EUR");
//! let order = generator.order_input();
//! assert!(!order.line_items.is_empty());
//! ```

mod order;
mod product;

pub use order::{
    FulfillmentInput, LineItemInput, MailingAddressInput, Money, MoneyBag, OrderCreateInput,
    PaymentMethod, ShippingLineInput, ShippingOption, TransactionInput, PAYMENT_METHODS,
    SHIPPING_OPTIONS,
};
pub use product::{
    OptionValueInput, ProductOptionInput, ProductSetInput, ProductStatus, VariantInput,
    VariantOptionValueInput,
};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const FIRST_NAMES: &[&str] = &[
    "Eleni", "Giorgos", "Maria", "Nikos", "Katerina", "Dimitris", "Sofia", "Kostas", "Anna",
    "Yannis", "Alex", "Irini",
];

const LAST_NAMES: &[&str] = &[
    "Papadopoulos", "Nikolaidis", "Georgiou", "Pappas", "Vlachos", "Oikonomou", "Karalis",
    "Dimitriou", "Ioannou", "Alexiou",
];

const CITIES: &[&str] = &[
    "Athens", "Thessaloniki", "Patras", "Heraklion", "Larissa", "Volos", "Ioannina", "Chania",
    "Kavala", "Rhodes",
];

const STREETS: &[&str] = &[
    "Ermou", "Stadiou", "Panepistimiou", "Akadimias", "Tsimiski", "Egnatia", "Kifisias",
    "Syngrou", "Patision", "Vasilissis Sofias",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.test"];

const ADJECTIVES: &[&str] = &[
    "Ergonomic", "Rustic", "Sleek", "Handcrafted", "Refined", "Practical", "Small", "Elegant",
    "Generic", "Tasty", "Gorgeous", "Licensed",
];

const MATERIALS: &[&str] = &[
    "Cotton", "Wooden", "Steel", "Granite", "Bronze", "Leather", "Ceramic", "Linen", "Marble",
    "Bamboo",
];

const NOUNS: &[&str] = &[
    "Chair", "Lamp", "Shirt", "Table", "Backpack", "Mug", "Wallet", "Towel", "Sneakers", "Bottle",
    "Notebook", "Gloves",
];

const DEPARTMENTS: &[&str] = &[
    "Home", "Garden", "Clothing", "Outdoors", "Kitchen", "Sports", "Toys", "Books",
];

const COMPANY_SUFFIXES: &[&str] = &["Group", "Trading", "Supply Co", "Workshop", "Brothers"];

const MPN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ-/";

/// Builds synthetic mutation inputs.
#[derive(Debug)]
pub struct SeedGenerator<R> {
    rng: R,
    locations: Vec<String>,
    currency: String,
}

impl SeedGenerator<StdRng> {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy(locations: Vec<String>, currency: impl Into<String>) -> Self {
        Self::new(StdRng::from_entropy(), locations, currency)
    }
}

impl<R: Rng> SeedGenerator<R> {
    /// Creates a generator.
    ///
    /// `locations` are location IDs (numeric or `gid://shopify/Location/...`)
    /// that generated orders are tagged with and fulfilled from. With no
    /// locations, orders carry neither.
    #[must_use]
    pub fn new(rng: R, locations: Vec<String>, currency: impl Into<String>) -> Self {
        Self {
            rng,
            locations,
            currency: currency.into(),
        }
    }

    /// Returns the currency code used for money fields.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn first_name(&mut self) -> String {
        self.pick(FIRST_NAMES).to_string()
    }

    fn last_name(&mut self) -> String {
        self.pick(LAST_NAMES).to_string()
    }

    fn email(&mut self) -> String {
        let first = self.pick(FIRST_NAMES).to_ascii_lowercase();
        let last = self.pick(LAST_NAMES).to_ascii_lowercase();
        let suffix: u16 = self.rng.gen_range(1..1000);
        let domain = self.pick(EMAIL_DOMAINS);
        format!("{first}.{last}{suffix}@{domain}")
    }

    fn street_address(&mut self) -> String {
        let street = self.pick(STREETS);
        let number: u16 = self.rng.gen_range(1..250);
        format!("{street} {number}")
    }

    fn city(&mut self) -> String {
        self.pick(CITIES).to_string()
    }

    fn phone(&mut self) -> String {
        let number: u32 = self.rng.gen_range(0..100_000_000);
        format!("+3069{number:08}")
    }

    fn zip(&mut self) -> String {
        let zip: u32 = self.rng.gen_range(10_000..100_000);
        zip.to_string()
    }

    fn product_name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(ADJECTIVES),
            self.pick(MATERIALS),
            self.pick(NOUNS)
        )
    }

    fn department(&mut self) -> String {
        self.pick(DEPARTMENTS).to_string()
    }

    fn company(&mut self) -> String {
        format!("{} {}", self.pick(LAST_NAMES), self.pick(COMPANY_SUFFIXES))
    }

    fn mpn(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| char::from(MPN_ALPHABET[self.rng.gen_range(0..MPN_ALPHABET.len())]))
            .collect()
    }

    fn digits(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect()
    }

    fn location(&mut self) -> Option<String> {
        self.locations.choose(&mut self.rng).cloned()
    }
}

/// Normalises a location ID to its global ID form.
#[must_use]
pub fn location_gid(id: &str) -> String {
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("gid://shopify/Location/{id}")
    }
}
