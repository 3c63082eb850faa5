pub mod instance;
pub mod topology;
