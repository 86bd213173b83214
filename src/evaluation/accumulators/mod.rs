mod accumulator;
mod mean_accumulator;

pub use accumulator::Accumulator;
pub use mean_accumulator::MeanAccumulator;
