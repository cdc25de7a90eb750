//! sqlpretty: a multi-dialect SQL pretty-printer.
//!
//! ```
//! use sqlpretty::{format, Config, Language};
//!
//! let out = format("select a, b from t", Language::Standard, &Config::default());
//! assert_eq!(out, "select\n  a,\n  b\nfrom\n  t");
//! ```

pub mod api;
pub mod color;
pub mod config;
pub mod detect;
pub mod dialect;
pub mod error;
pub mod inline_block;
pub mod layout;
pub mod lexicon;
pub mod mode;
pub mod params;
pub mod report;
pub mod token;
pub mod tokenizer;

// Re-export the main public API
pub use api::{format, format_bytes, format_string, get_matching_paths, run};
pub use config::{load_config, ColorPolicy, Config, KeywordCase};
pub use dialect::Language;
pub use error::SqlprettyError;
pub use mode::Mode;
pub use params::ParameterSet;
