use tracing::{info, instrument};

pub mod classify;
pub mod config;
pub mod confirm;
pub mod convert;
pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod importer;
pub mod types;

pub use convert::{Conversion, convert, convert_file};
pub use error::{ConvertError, Result};

#[instrument(skip(conversion))]
pub fn print_conversion_summary(conversion: &Conversion) {
	info!("Deck: {}", conversion.deck);
	info!("Notes written: {}", conversion.notes);
}
