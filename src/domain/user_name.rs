use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct UserName(String);

impl UserName {
    /// Accepts a trimmed, non-empty name of at most 255 graphemes that does
    /// not contain characters commonly used in markup or path injection.
    pub fn parse(s: String) -> Result<UserName, String> {
        let s = s.trim().to_string();
        let is_empty = s.is_empty();
        let is_too_long = s.graphemes(true).count() > 255;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|g| forbidden_characters.contains(&g));

        if is_empty {
            Err("The name field is required.".to_string())
        } else if is_too_long {
            Err("The name field must not be greater than 255 characters.".to_string())
        } else if contains_forbidden_characters {
            Err("The name field format is invalid.".to_string())
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
