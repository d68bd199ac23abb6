use rust_decimal_macros::dec;
use vat_engine::core::*;

fn main() {
    let engine = TaxEngine::builtin();
    let nl = PartyBuilder::business("NL").build();
    let consumer = PartyBuilder::consumer("NL").build();

    // ── 1. Builder error: missing buyer ───────────────────────────────
    println!("=== Incomplete draft ===");
    let result = InvoiceDraftBuilder::new()
        .seller(nl.clone())
        .add_line(LineItemBuilder::new("Consulting", dec!(10), dec!(150)).build())
        .build();
    if let Err(e) = result {
        println!("  Build failed: {e}");
    }

    // ── 2. Line item validation: all problems at once ─────────────────
    println!("\n=== Line item validation ===");
    let lines = [
        LineItemBuilder::new("Refund", dec!(-1), dec!(20)).build(),
        LineItemBuilder::new("Discount", dec!(1), dec!(-5)).build(),
        LineItemBuilder::new("Nothing", dec!(0), dec!(10)).build(),
    ];
    for e in validate_line_items(&lines) {
        println!("  {e}");
    }

    // ── 3. Engine errors carry a machine-readable kind ────────────────
    println!("\n=== Engine errors ===");
    let unknown = PartyBuilder::consumer("XX").build();
    let attempts = [
        engine.calculate(&nl, &consumer, &[]),
        engine.calculate(&nl, &consumer, &lines),
        engine.calculate(&nl, &unknown, &lines[..1]),
    ];
    for result in attempts {
        match result {
            Ok(calc) => println!("  unexpected success: {}", calc.totals.total),
            Err(e) => match e.kind() {
                Some(kind) => println!("  {}: {e}", kind.code()),
                None => println!("  other error: {e}"),
            },
        }
    }

    // ── 4. Forms that insist on a VAT ID ──────────────────────────────
    println!("\n=== Business customer without VAT ID ===");
    let business = PartyBuilder::business("BE").tax_id("BE12").build();
    match engine.require_well_formed_tax_id(&business) {
        Ok(()) => println!("  accepted"),
        Err(e) => println!("  rejected: {e}"),
    }

    // ── 5. Credit notes need an issued invoice ────────────────────────
    println!("\n=== Credit note on a draft ===");
    let totals = InvoiceTotals {
        subtotal: dec!(100.00),
        tax_amount: dec!(21.00),
        total: dec!(121.00),
    };
    if let Err(e) = credit_note_totals(&totals, InvoiceStatus::Draft) {
        println!("  {e}");
    }
}
