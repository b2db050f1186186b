pub mod history;
pub mod prediction;
