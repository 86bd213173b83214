mod expert_pool;
mod fixed_share;

pub use expert_pool::{ExpertPool, RTT_MAX, RTT_MIN};
pub use fixed_share::FixedShare;
