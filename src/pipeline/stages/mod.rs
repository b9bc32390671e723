//! Default pipeline stages.
//!
//! 1. **LiquidStage** - Resolve template tags against the variables
//! 2. **WriteStage** - Write rendered documents to the output directory

mod liquid;
mod write;

pub use liquid::LiquidStage;
pub use write::WriteStage;
