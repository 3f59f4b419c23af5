pub mod backend;
pub mod backends;
pub mod registry;
pub mod result;

pub use backend::DetectorBackend;
pub use registry::BackendRegistry;
pub use result::{Detection, DetectionResult, ObjectClass};
