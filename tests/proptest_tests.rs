//! Property-based tests for rate determination and totals.
//!
//! Run with: `cargo test --test proptest_tests`

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vat_engine::core::*;

const EU: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IE", "IT",
    "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

const NON_EU: &[&str] = &[
    "AE", "AU", "CA", "CH", "CN", "GB", "IN", "IS", "JP", "MX", "NO", "NZ", "SA", "SG", "TR", "US",
    "ZA",
];

/// A well-formed VAT ID for each EU country, keyed like `EU`.
fn valid_vat_id(country: &str) -> &'static str {
    match country {
        "AT" => "ATU12345678",
        "BE" => "BE0123456789",
        "BG" => "BG123456789",
        "CY" => "CY12345678X",
        "CZ" => "CZ12345678",
        "DE" => "DE123456789",
        "DK" => "DK12345678",
        "EE" => "EE123456789",
        "ES" => "ESX1234567X",
        "FI" => "FI12345678",
        "FR" => "FR12345678901",
        "GR" => "EL123456789",
        "HR" => "HR12345678901",
        "HU" => "HU12345678",
        "IE" => "IE1234567X",
        "IT" => "IT12345678901",
        "LT" => "LT123456789",
        "LU" => "LU12345678",
        "LV" => "LV12345678901",
        "MT" => "MT12345678",
        "NL" => "NL123456789B01",
        "PL" => "PL1234567890",
        "PT" => "PT123456789",
        "RO" => "RO1234567",
        "SE" => "SE123456789012",
        "SI" => "SI12345678",
        "SK" => "SK1234567890",
        _ => unreachable!("not an EU country: {country}"),
    }
}

// ── Strategies ──────────────────────────────────────────────────────────────

fn any_country() -> impl Strategy<Value = &'static str> {
    prop::sample::select([EU, NON_EU].concat())
}

fn eu_country() -> impl Strategy<Value = &'static str> {
    prop::sample::select(EU.to_vec())
}

fn non_eu_country() -> impl Strategy<Value = &'static str> {
    prop::sample::select(NON_EU.to_vec())
}

fn arb_party(country: &'static str) -> impl Strategy<Value = PartyInfo> {
    (any::<bool>(), prop::option::of("[A-Z]{2}[0-9A-Z]{2,12}")).prop_map(
        move |(is_business, tax_id)| PartyInfo {
            country_code: country.to_string(),
            is_business,
            tax_id,
        },
    )
}

/// 0.0001 to 999.9999
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// 0.00 to 99999.99
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(
        (arb_quantity(), arb_price()).prop_map(|(q, p)| LineItemBuilder::new("Item", q, p).build()),
        1..=20,
    )
}

fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|bp| Decimal::new(bp, 4))
}

fn determination(rate: Decimal) -> TaxDetermination {
    TaxDetermination {
        applied_rate: rate,
        rule_applied: TaxRule::SameCountry,
        reverse_charge: false,
    }
}

// ── Properties ──────────────────────────────────────────────────────────────

proptest! {
    /// Same country → seller's standard rate, whatever the buyer type.
    #[test]
    fn same_country_uses_standard_rate(
        (seller, buyer) in any_country().prop_flat_map(|c| (arb_party(c), arb_party(c)))
    ) {
        let engine = TaxEngine::builtin();
        let d = engine.determine_rate(&seller, &buyer).unwrap();
        let expected = engine.rates().get(&seller.country_code).unwrap().standard_rate;
        prop_assert_eq!(d.rule_applied, TaxRule::SameCountry);
        prop_assert_eq!(d.applied_rate, expected);
        prop_assert!(!d.reverse_charge);
    }

    /// EU → other EU business with a valid ID → 0% reverse charge.
    #[test]
    fn eu_b2b_with_valid_id_is_reverse_charged(
        from in eu_country(),
        to in eu_country(),
    ) {
        prop_assume!(from != to);
        let seller = PartyBuilder::business(from).build();
        let buyer = PartyBuilder::business(to).tax_id(valid_vat_id(to)).build();
        let d = TaxEngine::builtin().determine_rate(&seller, &buyer).unwrap();
        prop_assert_eq!(d.rule_applied, TaxRule::EuB2bReverseCharge);
        prop_assert_eq!(d.applied_rate, Decimal::ZERO);
        prop_assert!(d.reverse_charge);
    }

    /// EU → non-EU → zero-rated export, any buyer type.
    #[test]
    fn eu_to_non_eu_is_export(
        (seller, buyer) in (eu_country(), non_eu_country())
            .prop_flat_map(|(s, b)| (arb_party(s), arb_party(b)))
    ) {
        let d = TaxEngine::builtin().determine_rate(&seller, &buyer).unwrap();
        prop_assert_eq!(d.rule_applied, TaxRule::ExportZeroRated);
        prop_assert_eq!(d.applied_rate, Decimal::ZERO);
    }

    /// Consumers never get reverse charge, whatever tax_id they carry.
    #[test]
    fn consumers_never_reverse_charged(
        (seller, mut buyer) in (any_country(), any_country())
            .prop_flat_map(|(s, b)| (arb_party(s), arb_party(b)))
    ) {
        buyer.is_business = false;
        let d = TaxEngine::builtin().determine_rate(&seller, &buyer).unwrap();
        prop_assert!(!d.reverse_charge);
    }

    /// compute_totals is deterministic: identical inputs, identical output.
    #[test]
    fn totals_are_idempotent(lines in arb_lines(), rate in arb_rate()) {
        let d = determination(rate);
        let a = compute_totals(&lines, &d).unwrap();
        let b = compute_totals(&lines, &d).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(a.total.serialize(), b.total.serialize());
    }

    /// total == subtotal + tax_amount exactly, all at two decimal places.
    #[test]
    fn total_is_exact_sum(lines in arb_lines(), rate in arb_rate()) {
        let t = compute_totals(&lines, &determination(rate)).unwrap();
        prop_assert_eq!(t.total, t.subtotal + t.tax_amount);
        prop_assert_eq!(t.subtotal.scale(), 2);
        prop_assert_eq!(t.tax_amount.scale(), 2);
        prop_assert_eq!(t.total.scale(), 2);
    }

    /// The subtotal is the exact sum rounded once, within half a cent.
    #[test]
    fn subtotal_rounded_once(lines in arb_lines()) {
        let exact: Decimal = lines.iter().map(LineItem::amount).sum();
        let t = compute_totals(&lines, &determination(Decimal::ZERO)).unwrap();
        prop_assert!((t.subtotal - exact).abs() <= dec!(0.005));
    }

    /// Any negative quantity or price is rejected.
    #[test]
    fn negative_inputs_rejected(
        mut lines in arb_lines(),
        idx in any::<prop::sample::Index>(),
        negate_price in any::<bool>(),
    ) {
        let i = idx.index(lines.len());
        if negate_price {
            lines[i].unit_price = -lines[i].unit_price - dec!(0.01);
        } else {
            lines[i].quantity = -lines[i].quantity;
        }
        let err = compute_totals(&lines, &determination(dec!(0.21))).unwrap_err();
        prop_assert_eq!(err.kind(), Some(InvalidInputKind::NegativeQuantityOrPrice));
    }
}
