// Domain layer - Forecast records, spots and the normalizer
pub mod forecast;
pub mod merge;
pub mod normalizer;
pub mod report;
pub mod spot;
