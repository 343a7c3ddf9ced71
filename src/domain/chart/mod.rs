//! Chart aggregate: panels, their layout rules, drawings and view value objects.

pub mod drawings;
pub mod entities;
pub mod layout;
pub mod value_objects;

pub use drawings::*;
pub use entities::*;
pub use value_objects::*;
