pub mod gnb_context;
pub mod ue_context;

pub use gnb_context::{GnbContext, UeCallContext};
pub use ue_context::UeContext;
