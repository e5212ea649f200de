//! Response extraction helpers: typed JSON decoding and HTML hidden-input scraping.

pub mod html;
pub mod json;
