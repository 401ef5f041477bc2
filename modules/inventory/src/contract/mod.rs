//! Types shared with callers of the inventory services.

pub mod dto;
pub mod error;
pub mod model;

pub use error::{ServiceError, ServiceResult, ValidationFailure};
pub use model::{Consumable, Nid, Patrimony, Status, Tag, Unit};
