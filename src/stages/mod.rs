pub mod stage0_lineup;
pub mod stage1_attribute;
pub mod stage2_consolidate;
pub mod stage3_repair;

pub use stage0_lineup::*;
pub use stage1_attribute::*;
pub use stage2_consolidate::*;
pub use stage3_repair::*;
