use vat_engine::assistant::{RateQuery, VatAssistant};
use vat_engine::core::TaxEngine;

fn main() {
    let assistant = VatAssistant::new(TaxEngine::builtin());

    let questions = [
        ("NL", "NL", false, None),
        ("DE", "FR", true, Some("FR12345678901")),
        ("DE", "FR", true, Some("FR-not-an-id")),
        ("IT", "AT", false, None),
        ("NL", "US", false, None),
        ("AU", "NZ", true, None),
        ("NL", "ZZ", false, None),
    ];

    println!("=== Which VAT rate applies? ===\n");
    for (from, to, business, tax_id) in questions {
        let query = RateQuery {
            seller_country: from.into(),
            buyer_country: to.into(),
            buyer_is_business: business,
            buyer_tax_id: tax_id.map(Into::into),
        };
        match assistant.answer(&query) {
            Ok(answer) => println!("  {from} -> {to}: {}", answer.text),
            Err(e) => println!("  {from} -> {to}: {e}"),
        }
    }

    println!("\n=== Country profiles ===\n");
    for country in ["DE", "FI", "GB", "US", "AU"] {
        match assistant.describe_country(country) {
            Ok(answer) => println!("  {}", answer.text),
            Err(e) => println!("  {country}: {e}"),
        }
    }
}
