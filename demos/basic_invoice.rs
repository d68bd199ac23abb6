use rust_decimal_macros::dec;
use vat_engine::core::*;

fn main() {
    let engine = TaxEngine::builtin();

    // A Dutch shop selling to a Dutch consumer
    let draft = InvoiceDraftBuilder::new()
        .seller(PartyBuilder::business("NL").tax_id("NL123456789B01").build())
        .buyer(PartyBuilder::consumer("NL").build())
        .add_line(LineItemBuilder::new("Website design", dec!(12), dec!(85.00)).build())
        .add_line(
            LineItemBuilder::new("Hosting (monthly)", dec!(1), dec!(19.99))
                .category("services")
                .build(),
        )
        .build()
        .expect("draft should be complete");

    let calc = engine
        .calculate_draft(&draft)
        .expect("calculation should succeed");

    println!("=== Domestic invoice ===");
    print_calculation(&calc);

    // Same lines, sold to a French business with a VAT ID
    let b2b = InvoiceDraft {
        buyer: PartyBuilder::business("FR").tax_id("FR12345678901").build(),
        ..draft.clone()
    };
    let calc = engine.calculate_draft(&b2b).expect("calculation should succeed");

    println!("\n=== Intra-EU B2B invoice ===");
    print_calculation(&calc);

    // Numbering and credit notes
    let mut numbers = InvoiceNumberSequence::continue_after("INV", 2026, Some("INV-2026-000041"));
    let number = numbers.next_number();
    let credit = credit_note_totals(&calc.totals, InvoiceStatus::Paid)
        .expect("paid invoices can be credited");

    println!("\n=== Credit note for {number} ===");
    println!("  Subtotal: {}", credit.subtotal);
    println!("  Tax:      {}", credit.tax_amount);
    println!("  Total:    {}", credit.total);
}

fn print_calculation(calc: &InvoiceCalculation) {
    let d = &calc.determination;
    println!("  Rule:     {}", d.rule_applied);
    println!("  Rate:     {}%", d.rate_percent());
    println!("  Subtotal: {}", calc.totals.subtotal);
    println!("  Tax:      {}", calc.totals.tax_amount);
    println!("  Total:    {}", calc.totals.total);
    println!("  Why:      {}", calc.explanation);
    if let Some(note) = &calc.invoice_note {
        println!("  Note:     {note}");
    }
}
