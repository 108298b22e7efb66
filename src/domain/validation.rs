// Request validation shared by every action body
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefix the field path, e.g. `priceLevel` -> `brands[2].priceLevel`
    pub fn within(mut self, prefix: impl AsRef<str>) -> Self {
        self.field = if self.field.starts_with('[') {
            format!("{}{}", prefix.as_ref(), self.field)
        } else {
            format!("{}.{}", prefix.as_ref(), self.field)
        };
        self
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        for (idx, item) in self.iter().enumerate() {
            item.validate().map_err(|e| {
                let field = if e.field.is_empty() {
                    format!("[{}]", idx)
                } else {
                    format!("[{}].{}", idx, e.field)
                };
                ValidationError::new(field, e.reason)
            })?;
        }
        Ok(())
    }
}

pub fn ensure_not_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub fn ensure_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
    Ok(())
}

pub fn ensure_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(
            field,
            format!("must be a non-negative number, got {}", value),
        ));
    }
    Ok(())
}

pub fn ensure_len(field: &str, len: usize, min: usize, max: usize) -> Result<(), ValidationError> {
    if len < min || len > max {
        return Err(ValidationError::new(
            field,
            format!("must contain between {} and {} entries, got {}", min, max, len),
        ));
    }
    Ok(())
}
