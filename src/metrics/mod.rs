pub mod tracker;
pub mod window;

pub use tracker::TrainingMetrics;
pub use window::ReturnWindow;
