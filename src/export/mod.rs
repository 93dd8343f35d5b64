pub mod document;
pub mod excel;

pub use document::write_document;
pub use excel::write_comparison;
