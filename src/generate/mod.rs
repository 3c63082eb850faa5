pub mod sampler;
pub mod writer;
