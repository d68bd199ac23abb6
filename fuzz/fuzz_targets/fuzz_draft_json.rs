#![no_main]

use libfuzzer_sys::fuzz_target;
use vat_engine::core::{InvoiceDraft, TaxEngine};

fuzz_target!(|data: &[u8]| {
    let Ok(draft) = serde_json::from_slice::<InvoiceDraft>(data) else {
        return;
    };
    // Errors are fine, panics are bugs.
    if let Ok(calc) = TaxEngine::builtin().calculate_draft(&draft) {
        assert_eq!(calc.totals.total, calc.totals.subtotal + calc.totals.tax_amount);
    }
});
