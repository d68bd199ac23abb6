use vat_engine::vat::validate_vat_format;
use vat_engine::vies::ViesClient;

#[tokio::main]
async fn main() {
    let ids = [
        "DE123456789",
        "ATU12345678",
        "NL123456789B01",
        "EL123456789",
        "DE12345678",  // too short
        "XX999999999", // unknown country
    ];

    // Format validation (no network required)
    println!("=== VAT ID Format Validation ===\n");
    for id in &ids {
        match validate_vat_format(id) {
            Ok(vat) => println!("  {id} => valid (prefix={}, number={})", vat.prefix, vat.number),
            Err(e) => println!("  {id} => INVALID: {e}"),
        }
    }

    // Registration lookup against the live VIES service
    println!("\n=== VIES Registration Check ===\n");
    let client = ViesClient::new();
    for id in &ids[..2] {
        match client.check(id).await {
            Ok(r) => println!(
                "  {id} => registered={}, name={}",
                r.valid,
                r.name.as_deref().unwrap_or("-")
            ),
            Err(e) => println!("  {id} => {e}"),
        }
    }
}
