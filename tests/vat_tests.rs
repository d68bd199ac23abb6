use vat_engine::core::*;
use vat_engine::vat::*;

// ---------------------------------------------------------------------------
// VAT Format Validation: Germany
// ---------------------------------------------------------------------------

#[test]
fn de_valid() {
    let id = validate_vat_format("DE123456789").unwrap();
    assert_eq!(id.prefix, "DE");
    assert_eq!(id.number, "123456789");
}

#[test]
fn de_leading_zero_rejected() {
    assert!(validate_vat_format("DE012345678").is_err());
}

#[test]
fn de_too_short() {
    assert!(validate_vat_format("DE12345678").is_err());
}

#[test]
fn de_too_long() {
    assert!(validate_vat_format("DE1234567890").is_err());
}

#[test]
fn de_with_letters_rejected() {
    assert!(validate_vat_format("DE12345678A").is_err());
}

// ---------------------------------------------------------------------------
// VAT Format Validation: Other EU Countries
// ---------------------------------------------------------------------------

#[test]
fn at_valid() {
    assert!(validate_vat_format("ATU12345678").is_ok());
}

#[test]
fn at_missing_u_prefix() {
    assert!(validate_vat_format("AT12345678").is_err());
}

#[test]
fn fr_valid() {
    let id = validate_vat_format("FR12345678901").unwrap();
    assert_eq!(id.prefix, "FR");
    assert_eq!(id.number, "12345678901");
}

#[test]
fn fr_alpha_key() {
    assert!(validate_vat_format("FRAB123456789").is_ok());
}

#[test]
fn nl_valid() {
    assert!(validate_vat_format("NL123456789B01").is_ok());
}

#[test]
fn nl_missing_b() {
    assert!(validate_vat_format("NL123456789A01").is_err());
}

#[test]
fn es_valid() {
    assert!(validate_vat_format("ESA12345678").is_ok());
    assert!(validate_vat_format("ESX1234567X").is_ok());
}

#[test]
fn cz_lengths() {
    assert!(validate_vat_format("CZ12345678").is_ok());
    assert!(validate_vat_format("CZ1234567890").is_ok());
    assert!(validate_vat_format("CZ1234567").is_err());
}

#[test]
fn ro_short_numbers() {
    assert!(validate_vat_format("RO12").is_ok());
    assert!(validate_vat_format("RO12345678901").is_err());
}

#[test]
fn lt_nine_or_twelve() {
    assert!(validate_vat_format("LT123456789").is_ok());
    assert!(validate_vat_format("LT123456789012").is_ok());
    assert!(validate_vat_format("LT1234567890").is_err());
}

#[test]
fn cy_trailing_letter() {
    assert!(validate_vat_format("CY12345678A").is_ok());
    assert!(validate_vat_format("CY123456789").is_err());
}

#[test]
fn el_greece_valid() {
    assert!(validate_vat_format("EL123456789").is_ok());
    assert!(validate_vat_format("GR123456789").is_err());
}

#[test]
fn every_eu_member_has_a_pattern() {
    let table = RateTable::builtin();
    for code in table.eu_members() {
        let err = validate_vat_format(&format!("{}0", vat_prefix_for(code)));
        // Too short for every grammar, but never an unknown prefix.
        assert!(
            !err.unwrap_err().reason.contains("unknown country prefix"),
            "{code} has no VAT pattern"
        );
    }
}

// ---------------------------------------------------------------------------
// Edge Cases
// ---------------------------------------------------------------------------

#[test]
fn unknown_country_rejected() {
    assert!(validate_vat_format("XX12345678").is_err());
}

#[test]
fn empty_string_rejected() {
    assert!(validate_vat_format("").is_err());
}

#[test]
fn whitespace_trimmed() {
    assert!(validate_vat_format("  DE123456789  ").is_ok());
}

#[test]
fn error_display() {
    let err = validate_vat_format("DE12").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("DE12"));
    assert!(msg.contains("invalid"));
}

// ---------------------------------------------------------------------------
// Validators plugged into the engine
// ---------------------------------------------------------------------------

#[test]
fn custom_validator_controls_reverse_charge() {
    // A registry that only knows one buyer.
    let registry = |_: &str, id: &str| {
        if normalize_vat_id(id) == "FR12345678901" {
            Ok(())
        } else {
            Err(VatFormatError {
                value: id.to_string(),
                reason: "not registered".into(),
            })
        }
    };
    let engine = TaxEngine::builtin().with_validator(registry);
    let seller = PartyBuilder::business("DE").build();

    let known = PartyBuilder::business("FR").tax_id("FR 1234 5678 901").build();
    let unknown = PartyBuilder::business("FR").tax_id("FR99999999999").build();

    assert!(engine.determine_rate(&seller, &known).unwrap().reverse_charge);
    assert_eq!(
        engine.determine_rate(&seller, &unknown).unwrap().rule_applied,
        TaxRule::EuB2cCrossBorder
    );
}

#[test]
fn business_buyer_requires_well_formed_id() {
    let engine = TaxEngine::builtin();
    let ok = PartyBuilder::business("NL").tax_id("NL123456789B01").build();
    let missing = PartyBuilder::business("NL").build();
    let malformed = PartyBuilder::business("NL").tax_id("NL123").build();
    let consumer = PartyBuilder::consumer("NL").build();

    assert!(engine.require_well_formed_tax_id(&ok).is_ok());
    assert!(engine.require_well_formed_tax_id(&consumer).is_ok());
    for party in [missing, malformed] {
        let err = engine.require_well_formed_tax_id(&party).unwrap_err();
        assert_eq!(err.kind(), Some(InvalidInputKind::MalformedTaxId));
    }
}
