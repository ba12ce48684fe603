use crate::error::{HydroRiskError, HydroRiskResult};
use hydrorisk_models::{OutbreakContext, WaterParameter, WaterSample};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

/// Run derived validation rules and report the first offending field.
/// Fields are visited in name order so the reported field is stable.
pub fn validate_model<T: Validate>(model: &T) -> HydroRiskResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
            fields.sort_unstable();
            let field = fields.first().copied().unwrap_or("model");
            Err(HydroRiskError::validation(field, format_validation_errors(&errors)))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut field_errors: Vec<_> = errors.field_errors().into_iter().collect();
    field_errors.sort_by_key(|(field, _)| *field);

    let mut messages = Vec::new();

    for (field, errors) in field_errors {
        for error in errors {
            let message = match (&error.message, &*error.code) {
                (Some(message), _) => format!("{}: {}", field, message),
                (None, "range") => format!("Value out of range for field '{}'", field),
                (None, "required") => format!("Field '{}' is required", field),
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.join(", ")
}

/// Reject non-finite readings and out-of-range values before any scoring.
pub fn validate_water_sample(sample: &WaterSample) -> HydroRiskResult<()> {
    for parameter in WaterParameter::ALL {
        let value = sample.value(parameter);
        if !value.is_finite() {
            return Err(HydroRiskError::validation(
                parameter.field_name(),
                format!("{} must be a finite number, got {}", parameter.label(), value),
            ));
        }
    }

    validate_model(sample)
}

pub fn validate_outbreak(outbreak: &OutbreakContext) -> HydroRiskResult<()> {
    validate_model(outbreak)?;

    if outbreak.region().is_none() {
        return Err(HydroRiskError::validation(
            "region_code",
            format!("Unknown region code {}", outbreak.region_code),
        ));
    }

    Ok(())
}

pub fn validate_months_ahead(months_ahead: u32, max_months_ahead: u32) -> HydroRiskResult<()> {
    if months_ahead > max_months_ahead {
        return Err(HydroRiskError::validation(
            "months_ahead",
            format!(
                "Projection horizon {} exceeds maximum of {} months",
                months_ahead, max_months_ahead
            ),
        ));
    }

    Ok(())
}

/// Per-month water overrides must target a projected month and hold a valid
/// sample. Errors name the field as `water_overrides.<offset>.<field>`.
pub fn validate_water_overrides(
    overrides: &BTreeMap<u32, WaterSample>,
    months_ahead: u32,
) -> HydroRiskResult<()> {
    for (offset, sample) in overrides {
        if *offset == 0 || *offset > months_ahead {
            return Err(HydroRiskError::validation(
                "water_overrides",
                format!(
                    "Override for month offset {} is outside the projection horizon 1..={}",
                    offset, months_ahead
                ),
            ));
        }

        validate_water_sample(sample).map_err(|error| match error {
            HydroRiskError::Validation { field, message } => HydroRiskError::validation(
                format!("water_overrides.{}.{}", offset, field),
                message,
            ),
            other => other,
        })?;
    }

    Ok(())
}
