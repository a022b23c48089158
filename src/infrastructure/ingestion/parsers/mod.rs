//! Document parser implementations

mod pdf;

pub use pdf::PdfParser;

#[cfg(test)]
pub use pdf::test_support;
