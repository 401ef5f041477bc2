pub mod consumable_service;
pub mod item_service;
pub mod patrimony_service;
pub mod validation;

pub use consumable_service::ConsumableService;
pub use item_service::ItemService;
pub use patrimony_service::PatrimonyService;
pub use validation::{ConsumableValidator, PatrimonyValidator, ValidationResult, Validator};
