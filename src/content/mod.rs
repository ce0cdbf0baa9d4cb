pub mod catalog;

pub use catalog::{Catalog, Difficulty, Level, SentenceTemplate, WordId, WordRecord};
