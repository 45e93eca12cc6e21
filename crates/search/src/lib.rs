mod fuzzy;

pub use fuzzy::FuzzySearch;
