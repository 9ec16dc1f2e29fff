pub mod common;
pub mod pai;

pub use common::{AiChip, Named, ToolQualities};
pub use pai::{CHIP_SLOT_ID, PaiDevice};
