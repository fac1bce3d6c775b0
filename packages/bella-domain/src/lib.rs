pub mod credential;
pub mod ranking;
pub mod viewer;

pub type MemberId = i64;
