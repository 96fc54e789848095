// URL handling utilities
pub mod query_string;
pub mod url_builder;
pub mod url_parser;

// Parsing utilities
pub mod parse_flag;
pub mod parse_int;

// Formatting utilities
pub mod address_formatter;
pub mod json_converter;
pub mod slugify;

// Re-export all utilities for convenient access
pub use address_formatter::{format_address, format_category};
pub use json_converter::value_to_short_string;
pub use parse_flag::parse_flag;
pub use parse_int::parse_optional_int;
pub use query_string::build_query_string;
pub use slugify::slugify;
pub use url_builder::absolute_url;
pub use url_parser::hostname_from_url;
