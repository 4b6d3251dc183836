pub mod error;
pub mod humidity;
pub mod merger;
pub mod ordinal;
pub mod sanitizer;
