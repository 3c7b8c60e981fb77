/// Field-level validation failures, kept in the order the rules ran.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|(_, message)| message.as_str())
    }

    /// Messages recorded for `field`, in insertion order.
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for (field, _) in &self.errors {
            if !fields.contains(field) {
                fields.push(field);
            }
        }
        fields
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.first_message() {
            None => write!(f, "The given data was invalid."),
            Some(message) if self.len() == 1 => write!(f, "{}", message),
            Some(message) => {
                let more = self.len() - 1;
                let noun = if more == 1 { "error" } else { "errors" };
                write!(f, "{} (and {} more {})", message, more, noun)
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}
