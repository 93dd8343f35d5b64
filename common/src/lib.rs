//! DSS Matrix Common Library
//!
//! 取込CLIと対話UIで共有されるデータモデル・正規化・照合・スコアリング・管理マトリクス

pub mod dataset;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod questions;
pub mod scoring;
pub mod session;
pub mod stewardship;
pub mod text;
pub mod types;
pub mod wizard;

pub use dataset::build_dataset;
pub use error::{Error, Result};
pub use filter::{matches_filters, FilterSource, FilterValues};
pub use normalizer::normalize;
pub use questions::match_questions;
pub use scoring::{Answers, Destination, Policy, Ranking, RuleTarget, ScoredDestination, ScoringRule};
pub use session::{ComparisonTable, Session};
pub use stewardship::{DataCategory, LevelDefinition, MatrixEntry, MatrixRow, SupportLevel};
pub use text::slug;
pub use types::{AttributeColumn, CellValue, Dataset, Entity, Grid, Question};
pub use wizard::{WizardState, WizardStep};
