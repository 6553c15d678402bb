mod load;
mod parse;
mod records;

pub use load::load_pass_dataset;
pub use records::{PassDataset, PassRecord, TeamEntry};
