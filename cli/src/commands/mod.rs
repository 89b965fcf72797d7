pub mod hash;
pub mod info;
pub mod queue;
