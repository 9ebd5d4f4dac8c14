//! Digital resource catalog entities.

pub mod category;
pub mod model;

pub use category::{ResourceCategory, ResourceDepartment, ResourceStatus};
pub use model::DigitalResource;
