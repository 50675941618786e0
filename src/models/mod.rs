pub mod task_item;
pub mod user;

pub use task_item::{NewTaskItem, TaskItem, TaskItemInput};
pub use user::{User, UserInput, UserRow};

use validator::ValidationError;

/// Rejects strings made only of whitespace. Length rules still handle the empty string.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Alice").is_ok());
        assert!(not_blank("  padded  ").is_ok());
        assert!(not_blank("").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
    }
}
