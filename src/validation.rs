use crate::services::WidgetError;

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const ERROR_CLASS: &str = "border-red-500";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldInput {
    pub name: String,
    pub value: String,
}

impl FieldInput {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldStatus {
    Valid,
    Missing,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormReport {
    pub statuses: Vec<FieldStatus>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.statuses.iter().all(|status| *status == FieldStatus::Valid)
    }

    /// Index of the field to scroll to and focus.
    pub fn first_invalid(&self) -> Option<usize> {
        self.statuses
            .iter()
            .position(|status| *status == FieldStatus::Missing)
    }

    pub fn errors(&self, fields: &[FieldInput]) -> Vec<WidgetError> {
        fields
            .iter()
            .zip(&self.statuses)
            .filter(|(_, status)| **status == FieldStatus::Missing)
            .map(|(field, _)| {
                WidgetError::ValidationFailure(format!("{}: {REQUIRED_MESSAGE}", field.name))
            })
            .collect()
    }
}

/// Checks the required fields of a form on submit.
pub fn validate_required(fields: &[FieldInput]) -> FormReport {
    FormReport {
        statuses: fields
            .iter()
            .map(|field| {
                if field.value.trim().is_empty() {
                    FieldStatus::Missing
                } else {
                    FieldStatus::Valid
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_missing() {
        let fields = vec![
            FieldInput::new("title", "Welcome"),
            FieldInput::new("email", "   "),
            FieldInput::new("body", ""),
        ];
        let report = validate_required(&fields);
        assert_eq!(
            report.statuses,
            vec![FieldStatus::Valid, FieldStatus::Missing, FieldStatus::Missing]
        );
        assert!(!report.is_valid());
        assert_eq!(report.first_invalid(), Some(1));
        let errors = report.errors(&fields);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "validation failure: email: This field is required"
        );
    }

    #[test]
    fn filled_form_submits() {
        let report = validate_required(&[FieldInput::new("title", "x")]);
        assert!(report.is_valid());
        assert_eq!(report.first_invalid(), None);
        assert!(validate_required(&[]).is_valid());
    }
}
