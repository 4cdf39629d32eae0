pub mod mutex;

#[cfg(feature = "reentrant-stress")]
pub mod reentrant;
