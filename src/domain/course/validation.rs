//! Course validation utilities

use thiserror::Error;

/// Errors that can occur during course validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CourseValidationError {
    #[error("Course title cannot be empty")]
    EmptyTitle,

    #[error("Course title exceeds maximum length of {0} characters")]
    TitleTooLong(usize),

    #[error("Course description exceeds maximum length of {0} characters")]
    DescriptionTooLong(usize),

    #[error("Course category cannot be empty")]
    EmptyCategory,

    #[error("Token reward cannot be negative")]
    NegativeReward,

    #[error("Token reward cannot exceed {0}")]
    RewardTooLarge(i64),
}

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 5000;
const MAX_TOKEN_REWARD: i64 = 10_000;

/// Validate a course title
pub fn validate_title(title: &str) -> Result<(), CourseValidationError> {
    if title.trim().is_empty() {
        return Err(CourseValidationError::EmptyTitle);
    }

    if title.len() > MAX_TITLE_LENGTH {
        return Err(CourseValidationError::TitleTooLong(MAX_TITLE_LENGTH));
    }

    Ok(())
}

/// Validate a course description
pub fn validate_description(description: &str) -> Result<(), CourseValidationError> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(CourseValidationError::DescriptionTooLong(
            MAX_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}

/// Validate a course category
pub fn validate_category(category: &str) -> Result<(), CourseValidationError> {
    if category.trim().is_empty() {
        return Err(CourseValidationError::EmptyCategory);
    }

    Ok(())
}

/// Validate the token reward granted on completion
pub fn validate_token_reward(reward: i64) -> Result<(), CourseValidationError> {
    if reward < 0 {
        return Err(CourseValidationError::NegativeReward);
    }

    if reward > MAX_TOKEN_REWARD {
        return Err(CourseValidationError::RewardTooLarge(MAX_TOKEN_REWARD));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_title() {
        assert!(validate_title("Intro to Rust").is_ok());
    }

    #[test]
    fn test_empty_title() {
        assert_eq!(validate_title(""), Err(CourseValidationError::EmptyTitle));
        assert_eq!(
            validate_title("   "),
            Err(CourseValidationError::EmptyTitle)
        );
    }

    #[test]
    fn test_title_too_long() {
        let long = "a".repeat(201);
        assert_eq!(
            validate_title(&long),
            Err(CourseValidationError::TitleTooLong(200))
        );
    }

    #[test]
    fn test_description_too_long() {
        let long = "a".repeat(5001);
        assert_eq!(
            validate_description(&long),
            Err(CourseValidationError::DescriptionTooLong(5000))
        );
    }

    #[test]
    fn test_empty_category() {
        assert_eq!(
            validate_category(""),
            Err(CourseValidationError::EmptyCategory)
        );
    }

    #[test]
    fn test_reward_bounds() {
        assert!(validate_token_reward(0).is_ok());
        assert!(validate_token_reward(10_000).is_ok());
        assert_eq!(
            validate_token_reward(10_001),
            Err(CourseValidationError::RewardTooLarge(10_000))
        );
        assert_eq!(
            validate_token_reward(-1),
            Err(CourseValidationError::NegativeReward)
        );
    }
}
