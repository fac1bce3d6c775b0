pub mod google;
pub mod media;

pub use google::IdentityAssertion;
