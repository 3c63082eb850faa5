pub mod instance;
pub mod sizing;
pub mod topology;
