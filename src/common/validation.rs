// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("The value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("The amount must be greater than zero.".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_negative_but_not_positive() {
        assert!(validate_not_negative(&Decimal::ZERO).is_ok());
        assert!(validate_positive(&Decimal::ZERO).is_err());
    }

    #[test]
    fn negative_values_fail_both() {
        let val = Decimal::new(-150, 2);
        assert!(validate_not_negative(&val).is_err());
        assert!(validate_positive(&val).is_err());
    }
}
