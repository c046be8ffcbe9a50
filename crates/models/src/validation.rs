use thiserror::Error;

/// Maximum length of a registration confirmation token
pub const REGISTER_CONFIRM_TOKEN_MAX_LEN: usize = 300;

/// Maximum number of stars a review can give
pub const MAX_STAR_RATING: i16 = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("price must be greater than or equal to 0, got {0}")]
    NegativePrice(f64),
    #[error("register confirm token must be at most 300 characters, got {0}")]
    TokenTooLong(usize),
    #[error("star rating must be between 1 and 5, got {0}")]
    StarRatingOutOfRange(i16),
    #[error("duration must not be negative, got {0} seconds")]
    NegativeDuration(i64),
}

/// Course prices are optional but never negative
pub fn validate_price(price: Option<f64>) -> Result<(), ValidationError> {
    match price {
        Some(price) if price.is_nan() || price < 0.0 => Err(ValidationError::NegativePrice(price)),
        _ => Ok(()),
    }
}

pub fn validate_register_confirm_token(token: Option<&str>) -> Result<(), ValidationError> {
    match token {
        Some(token) if token.chars().count() > REGISTER_CONFIRM_TOKEN_MAX_LEN => {
            Err(ValidationError::TokenTooLong(token.chars().count()))
        }
        _ => Ok(()),
    }
}

pub fn validate_star_rating(rating: i16) -> Result<(), ValidationError> {
    if (1..=MAX_STAR_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::StarRatingOutOfRange(rating))
    }
}

pub fn validate_duration(seconds: i64) -> Result<(), ValidationError> {
    if seconds < 0 {
        Err(ValidationError::NegativeDuration(seconds))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_price() {
        assert!(validate_price(None).is_ok());
        assert!(validate_price(Some(0.0)).is_ok());
        assert!(validate_price(Some(1490.5)).is_ok());
        assert_eq!(
            validate_price(Some(-0.01)),
            Err(ValidationError::NegativePrice(-0.01))
        );
        assert!(validate_price(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_register_confirm_token() {
        assert!(validate_register_confirm_token(None).is_ok());
        assert!(validate_register_confirm_token(Some(&"a".repeat(300))).is_ok());
        assert_eq!(
            validate_register_confirm_token(Some(&"a".repeat(301))),
            Err(ValidationError::TokenTooLong(301))
        );
    }

    #[test]
    fn test_validate_star_rating() {
        assert!(validate_star_rating(1).is_ok());
        assert!(validate_star_rating(5).is_ok());
        assert!(validate_star_rating(0).is_err());
        assert!(validate_star_rating(6).is_err());
    }
}
