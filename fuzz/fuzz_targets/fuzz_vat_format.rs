#![no_main]

use libfuzzer_sys::fuzz_target;
use vat_engine::vat::{EuVatFormat, LenientVatFormat, TaxIdValidator, validate_vat_format};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = validate_vat_format(s);
        let _ = EuVatFormat.check("DE", s);
        let _ = LenientVatFormat.check("NO", s);
    }
});
