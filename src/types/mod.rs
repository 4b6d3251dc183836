pub mod coordinate;
pub mod dataset;
pub mod report;
