pub mod gmm;
pub mod gsm;

pub use gmm::*;
pub use gsm::*;
