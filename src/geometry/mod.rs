pub mod rectangle;

pub use rectangle::{CompartmentId, Rectangle};
