pub mod addressing;
pub mod lifecycle;
pub mod reducer;
pub mod resolve;
