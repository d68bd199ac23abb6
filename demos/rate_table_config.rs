//! Loads engine configuration from the environment, publishes a rate table
//! and swaps in an update while engines are running.
//!
//! ```sh
//! VAT_ENGINE_LOG=vat_engine=debug cargo run --example rate_table_config --features config
//! ```

use rust_decimal_macros::dec;
use tracing::info;
use vat_engine::config::{EngineConfig, parse_rate_table_yaml};
use vat_engine::core::*;

const UPDATED: &str = r#"
profiles:
  - country_code: NL
    region: EU
    standard_rate: "0.22"
    vat_scheme: VAT
  - country_code: BE
    region: EU
    standard_rate: "0.21"
    vat_scheme: VAT
"#;

fn main() -> Result<(), TaxError> {
    let config = EngineConfig::from_env()?;
    config.init_tracing()?;
    info!(?config, "configuration loaded");

    let handle = RateTableHandle::new(config.load_rate_table()?);
    let seller = PartyBuilder::business("NL").build();
    let buyer = PartyBuilder::consumer("NL").build();
    let lines = [LineItemBuilder::new("Subscription", dec!(1), dec!(100)).build()];

    let before = TaxEngine::from_handle(&handle);
    handle.publish(parse_rate_table_yaml(UPDATED)?);
    let after = TaxEngine::from_handle(&handle);

    let old = before.calculate(&seller, &buyer, &lines)?;
    let new = after.calculate(&seller, &buyer, &lines)?;
    println!("Pinned to old table: total {}", old.totals.total);
    println!("After rate update:   total {}", new.totals.total);

    let mut numbers = config.number_sequence(2026, None);
    println!("Next invoice number: {}", numbers.next_number());
    Ok(())
}
