//! Environment configuration and rate-table files.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `VAT_ENGINE_RATE_TABLE` | built-in table | path to a `.yaml`/`.yml`/`.json` rate table |
//! | `VAT_ENGINE_INVOICE_PREFIX` | `INV` | invoice number prefix |
//! | `VAT_ENGINE_NUMBER_WIDTH` | `6` | zero-padding of the invoice sequence |
//! | `VAT_ENGINE_LOG` | `info` | `tracing` filter directive |
//!
//! A rate-table file lists profiles:
//!
//! ```yaml
//! profiles:
//!   - country_code: NL
//!     region: EU
//!     standard_rate: "0.21"
//!     reduced_rates: { food: "0.09" }
//!     vat_scheme: VAT
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::{CountryTaxProfile, InvoiceNumberSequence, RateTable, TaxError};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub rate_table: Option<PathBuf>,
    pub invoice_prefix: String,
    pub number_width: usize,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_table: None,
            invoice_prefix: "INV".to_string(),
            number_width: InvoiceNumberSequence::DEFAULT_PADDING,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self, TaxError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, TaxError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let number_width = match non_empty("VAT_ENGINE_NUMBER_WIDTH") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|w| (1..=12).contains(w))
                .ok_or_else(|| {
                    TaxError::Config(format!(
                        "VAT_ENGINE_NUMBER_WIDTH must be between 1 and 12, got '{raw}'"
                    ))
                })?,
            None => defaults.number_width,
        };

        Ok(Self {
            rate_table: non_empty("VAT_ENGINE_RATE_TABLE").map(PathBuf::from),
            invoice_prefix: non_empty("VAT_ENGINE_INVOICE_PREFIX")
                .map(|p| p.trim().to_string())
                .unwrap_or(defaults.invoice_prefix),
            number_width,
            log_level: non_empty("VAT_ENGINE_LOG").unwrap_or(defaults.log_level),
        })
    }

    /// The configured rate table, or the built-in one when no path is set.
    pub fn load_rate_table(&self) -> Result<RateTable, TaxError> {
        match &self.rate_table {
            Some(path) => load_rate_table_file(path),
            None => Ok(RateTable::builtin()),
        }
    }

    /// A numbering sequence for `year` using the configured prefix and width.
    pub fn number_sequence(&self, year: i32, last_issued: Option<&str>) -> InvoiceNumberSequence {
        InvoiceNumberSequence::continue_after(self.invoice_prefix.clone(), year, last_issued)
            .with_padding(self.number_width)
    }

    /// Install a global `tracing` subscriber filtered by `log_level`.
    pub fn init_tracing(&self) -> Result<(), TaxError> {
        let filter = EnvFilter::try_new(&self.log_level)
            .map_err(|e| TaxError::Config(format!("invalid VAT_ENGINE_LOG: {e}")))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| TaxError::Config(format!("tracing already initialised: {e}")))
    }
}

/// On-disk rate table layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableFile {
    pub profiles: Vec<CountryTaxProfile>,
}

impl From<&RateTable> for RateTableFile {
    fn from(table: &RateTable) -> Self {
        Self {
            profiles: table.iter().cloned().collect(),
        }
    }
}

pub fn parse_rate_table_yaml(source: &str) -> Result<RateTable, TaxError> {
    let file: RateTableFile = serde_yaml::from_str(source)
        .map_err(|e| TaxError::RateTable(format!("invalid YAML rate table: {e}")))?;
    RateTable::from_profiles(file.profiles)
}

pub fn parse_rate_table_json(source: &str) -> Result<RateTable, TaxError> {
    let file: RateTableFile = serde_json::from_str(source)
        .map_err(|e| TaxError::RateTable(format!("invalid JSON rate table: {e}")))?;
    RateTable::from_profiles(file.profiles)
}

/// Read a rate table, choosing the format by file extension.
pub fn load_rate_table_file(path: &Path) -> Result<RateTable, TaxError> {
    let source = fs::read_to_string(path)
        .map_err(|e| TaxError::Config(format!("cannot read {}: {e}", path.display())))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let table = match ext.as_deref() {
        Some("yaml" | "yml") => parse_rate_table_yaml(&source)?,
        Some("json") => parse_rate_table_json(&source)?,
        _ => {
            return Err(TaxError::Config(format!(
                "{}: rate table must be .yaml, .yml or .json",
                path.display()
            )));
        }
    };
    info!(path = %path.display(), countries = table.len(), "loaded rate table");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Region, VatScheme};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::io::Write;

    const YAML: &str = r#"
profiles:
  - country_code: nl
    region: EU
    standard_rate: "0.21"
    reduced_rates:
      food: "0.09"
    vat_scheme: VAT
  - country_code: US
    region: Americas
    standard_rate: "0"
    vat_scheme: Sales_Tax
"#;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.load_rate_table().unwrap(), RateTable::builtin());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = EngineConfig::from_lookup(lookup(&[
            ("VAT_ENGINE_RATE_TABLE", "/etc/rates.yaml"),
            ("VAT_ENGINE_INVOICE_PREFIX", "SHOP"),
            ("VAT_ENGINE_NUMBER_WIDTH", "4"),
            ("VAT_ENGINE_LOG", "vat_engine=debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.rate_table, Some(PathBuf::from("/etc/rates.yaml")));
        assert_eq!(cfg.number_sequence(2026, None).peek(), "SHOP-2026-0001");
        assert_eq!(cfg.log_level, "vat_engine=debug");
    }

    #[test]
    fn rejects_bad_width() {
        for raw in ["0", "abc", "99"] {
            let err = EngineConfig::from_lookup(lookup(&[("VAT_ENGINE_NUMBER_WIDTH", raw)]))
                .unwrap_err();
            assert!(matches!(err, TaxError::Config(_)), "width {raw}");
        }
    }

    #[test]
    fn parses_yaml_table() {
        let table = parse_rate_table_yaml(YAML).unwrap();
        assert_eq!(table.len(), 2);
        let nl = table.get("NL").unwrap();
        assert_eq!(nl.region, Region::EU);
        assert_eq!(nl.reduced_rate("food"), Some(dec!(0.09)));
        assert_eq!(table.get("US").unwrap().vat_scheme, VatScheme::SalesTax);
    }

    #[test]
    fn json_round_trips_builtin() {
        let json = serde_json::to_string(&RateTableFile::from(&RateTable::builtin())).unwrap();
        assert_eq!(parse_rate_table_json(&json).unwrap(), RateTable::builtin());
    }

    #[test]
    fn invalid_table_data_is_rate_table_error() {
        let err = parse_rate_table_yaml("profiles: [{country_code: NL}]").unwrap_err();
        assert!(matches!(err, TaxError::RateTable(_)));
        let err = parse_rate_table_json(r#"{"profiles":[{"country_code":"NL","region":"EU","standard_rate":"1.5","vat_scheme":"VAT"}]}"#).unwrap_err();
        assert!(err.to_string().contains("between 0 and 1"));
    }

    #[test]
    fn loads_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();
        let cfg = EngineConfig {
            rate_table: Some(file.path().to_path_buf()),
            ..EngineConfig::default()
        };
        assert_eq!(cfg.load_rate_table().unwrap().len(), 2);

        let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            load_rate_table_file(txt.path()),
            Err(TaxError::Config(_))
        ));
        assert!(matches!(
            load_rate_table_file(Path::new("/nonexistent/rates.yaml")),
            Err(TaxError::Config(_))
        ));
    }
}
