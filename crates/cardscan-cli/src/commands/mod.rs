//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod entry;
pub mod format;
pub mod scan;

use std::path::Path;

use cardscan_core::CardScanConfig;

/// Load the config given on the command line, else the default file.
///
/// A config file that does not exist yet means defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CardScanConfig> {
    match config_path {
        Some(path) => read_or_default(Path::new(path)),
        None => read_or_default(&config::default_config_path()),
    }
}

/// Read a config file, or defaults when it does not exist.
pub fn read_or_default(path: &Path) -> anyhow::Result<CardScanConfig> {
    if path.exists() {
        Ok(CardScanConfig::from_file(path)?)
    } else {
        Ok(CardScanConfig::default())
    }
}

/// Field selector shared by the field commands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FieldArg {
    /// Card number
    Card,
    /// Expiry date (MMYY)
    Expiry,
}

impl From<FieldArg> for cardscan_core::CardField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Card => cardscan_core::CardField::CardNumber,
            FieldArg::Expiry => cardscan_core::CardField::ExpiryDate,
        }
    }
}
