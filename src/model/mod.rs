pub mod issues;
pub mod palette;
pub mod payload;
pub mod thresholds;
