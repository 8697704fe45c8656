pub mod import;
pub mod recovery;
