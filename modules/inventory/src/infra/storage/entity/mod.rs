pub mod consumable;
pub mod patrimony;
pub mod patrimony_tag;
pub mod status;
pub mod tag;
pub mod unit;
