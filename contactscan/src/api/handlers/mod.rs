pub mod extract;
pub(crate) mod health;

pub use health::health_check;
