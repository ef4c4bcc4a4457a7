pub mod config;
pub mod converter;
pub mod copy;
pub mod error;
pub mod site;

pub use config::{BuildConfig, Config, GeneralConfig};
pub use converter::{Converter, ConverterInfo, Priority};
pub use copy::{COPY_EXT, CopyConverter, IncludeEntry, OUTPUT_EXT};
pub use error::{AppError, Result};
pub use site::{BuildOptions, BuildSummary, BuiltPage, build_site, discover_sources};
