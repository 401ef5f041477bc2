//! Field rules checked before an entity is written.

use crate::config::InventoryConfig;
use crate::contract::error::{ServiceError, ValidationFailure};
use crate::contract::model::{Consumable, Nid, Patrimony};

pub trait Validator<T>: Send + Sync {
    fn validate(&self, item: &T) -> ValidationResult;
}

/// Failures collected in the order the rules ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ServiceError::validation(self.failures))
        }
    }

    fn require_text(&mut self, field: &str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(ValidationFailure::new(field, "must not be blank").with_value(value));
        } else {
            self.limit_text(field, value, max_len);
        }
    }

    fn limit_text(&mut self, field: &str, value: &str, max_len: usize) {
        if value.chars().count() > max_len {
            self.push(
                ValidationFailure::new(field, format!("must be at most {max_len} characters"))
                    .with_value(value),
            );
        }
    }

    fn require_reference(&mut self, field: &str, nid: Nid) {
        if nid <= 0 {
            self.push(
                ValidationFailure::new(field, "must be a positive identifier")
                    .with_value(nid.to_string()),
            );
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TextLimits {
    tid: usize,
    name: usize,
    description: usize,
}

impl TextLimits {
    fn check(
        &self,
        result: &mut ValidationResult,
        tid: &str,
        name: &str,
        description: Option<&str>,
    ) {
        result.require_text("tid", tid, self.tid);
        result.require_text("name", name, self.name);
        if let Some(description) = description {
            result.limit_text("description", description, self.description);
        }
    }
}

impl From<&InventoryConfig> for TextLimits {
    fn from(cfg: &InventoryConfig) -> Self {
        Self {
            tid: cfg.max_tid_length,
            name: cfg.max_name_length,
            description: cfg.max_description_length,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatrimonyValidator {
    limits: TextLimits,
}

impl PatrimonyValidator {
    pub fn new(config: &InventoryConfig) -> Self {
        Self {
            limits: config.into(),
        }
    }
}

impl Validator<Patrimony> for PatrimonyValidator {
    fn validate(&self, item: &Patrimony) -> ValidationResult {
        let mut result = ValidationResult::new();
        self.limits
            .check(&mut result, &item.tid, &item.name, item.description.as_deref());
        result.require_reference("status_nid", item.status_nid);
        result
    }
}

#[derive(Debug, Clone)]
pub struct ConsumableValidator {
    limits: TextLimits,
}

impl ConsumableValidator {
    pub fn new(config: &InventoryConfig) -> Self {
        Self {
            limits: config.into(),
        }
    }
}

impl Validator<Consumable> for ConsumableValidator {
    fn validate(&self, item: &Consumable) -> ValidationResult {
        let mut result = ValidationResult::new();
        self.limits
            .check(&mut result, &item.tid, &item.name, item.description.as_deref());
        if item.quantity < 0 {
            result.push(
                ValidationFailure::new("quantity", "must not be negative")
                    .with_value(item.quantity.to_string()),
            );
        }
        result.require_reference("unit_nid", item.unit_nid);
        result
    }
}
