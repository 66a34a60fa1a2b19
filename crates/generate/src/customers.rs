//! Synthetic customer payloads.
//!
//! All contact details are deliberately fictional: emails use the
//! RFC 2606 reserved `example.com` domain with a random hex suffix so
//! repeated runs never collide, and phone numbers use the fictional
//! `555` exchange.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{json, Value};

const FIRST_NAMES: &[&str] = &[
    "Ava", "Noah", "Mia", "Liam", "Zoe", "Ethan", "Ruby", "Oliver", "Isla", "Mason", "Chloe",
    "Lucas", "Grace", "Henry", "Nora", "Leo", "Hazel", "Owen", "Violet", "Jack", "Stella",
    "Finn", "Iris", "Theo", "Ella", "Miles", "Josie", "Eli", "Cora", "Declan", "Maeve",
    "Rowan", "Freya", "Silas", "Elsie", "Arthur", "June", "Felix", "Margot", "Hugo",
];

const LAST_NAMES: &[&str] = &[
    "Bennett", "Calloway", "Dawson", "Ellery", "Fletcher", "Granger", "Hale", "Irving",
    "Jennings", "Kessler", "Lockwood", "Mercer", "Nash", "O'Brien", "Pemberton", "Quinn",
    "Radcliffe", "Sutton", "Thorne", "Underhill", "Vaughn", "Whitaker", "Yates", "Ziegler",
    "Abbott", "Blackwell", "Corrigan", "Delaney", "Emerson", "Fairbanks", "Goodwin",
    "Holloway", "Ingram", "Jarvis", "Kincaid", "Lonergan", "Monahan", "Norwood",
];

const STREETS: &[&str] = &[
    "Maple Street", "Oak Avenue", "Cedar Lane", "Elm Drive", "Birch Road", "Willow Way",
    "Harbor Boulevard", "Summit Court", "Prospect Place", "Orchard Terrace", "Franklin Street",
    "Lakeview Drive",
];

const CITIES: &[(&str, &str)] = &[
    ("Portland", "OR"),
    ("Austin", "TX"),
    ("Denver", "CO"),
    ("Madison", "WI"),
    ("Asheville", "NC"),
    ("Burlington", "VT"),
    ("Santa Fe", "NM"),
    ("Savannah", "GA"),
    ("Boise", "ID"),
    ("Providence", "RI"),
];

/// Produce one create-ready customer payload.
pub fn generate_customer(rng: &mut impl Rng) -> Value {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
    let (city, state) = CITIES.choose(rng).copied().unwrap_or(("Portland", "OR"));

    json!({
        "first_name": first,
        "last_name": last,
        "email": generate_email(rng, first, last),
        "phone": format!(
            "+1-555-{}-{}",
            rng.random_range(100..=999),
            rng.random_range(1000..=9999)
        ),
        "physical_address_1": format!(
            "{} {}",
            rng.random_range(1..=9999),
            STREETS.choose(rng).copied().unwrap_or("Main Street")
        ),
        "physical_city": city,
        "physical_state": state,
        "physical_postcode": format!("{:05}", rng.random_range(10000..=99999)),
        "physical_country_id": "US",
    })
}

/// Produce `count` customer payloads.
pub fn generate_customers(rng: &mut impl Rng, count: usize) -> Vec<Value> {
    (0..count).map(|_| generate_customer(rng)).collect()
}

/// `first.last.<6 hex>@example.com`, lowercased and stripped of
/// characters that are awkward in an email local part.
fn generate_email(rng: &mut impl Rng, first: &str, last: &str) -> String {
    let suffix: String = (0..6)
        .map(|_| {
            let digit = rng.random_range(0..16u32);
            char::from_digit(digit, 16).unwrap_or('0')
        })
        .collect();
    let local = format!("{first}.{last}.{suffix}")
        .to_lowercase()
        .replace([' ', '\''], "");
    format!("{local}@example.com")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn emails_use_the_reserved_domain_and_stay_unique() {
        let mut rng = StdRng::seed_from_u64(11);
        let customers = generate_customers(&mut rng, 100);

        let emails: std::collections::HashSet<_> = customers
            .iter()
            .map(|c| c["email"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(emails.len(), 100);
        for email in &emails {
            assert!(email.ends_with("@example.com"), "unsafe email {email}");
            assert!(!email.contains(' ') && !email.contains('\''));
        }
    }

    #[test]
    fn phone_numbers_are_fictional() {
        let mut rng = StdRng::seed_from_u64(2);
        for customer in generate_customers(&mut rng, 20) {
            assert!(customer["phone"].as_str().unwrap().starts_with("+1-555-"));
        }
    }

    #[test]
    fn payload_carries_a_full_us_address() {
        let mut rng = StdRng::seed_from_u64(5);
        let customer = generate_customer(&mut rng);
        assert_eq!(customer["physical_country_id"], "US");
        assert_eq!(customer["physical_postcode"].as_str().unwrap().len(), 5);
        assert_eq!(customer["physical_state"].as_str().unwrap().len(), 2);
    }
}
