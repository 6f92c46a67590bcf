/// A WHERE predicate together with the arguments bound to its placeholders
///
/// Each condition owns its arguments, so rendering the SQL fragment and
/// collecting the bind values walk the same list in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field = function(?)`, e.g. `ip = INET_ATON(?)`
    EqFunction {
        field: String,
        function: String,
        value: String,
    },
    /// `field IN (?, ?, ...)` with one placeholder per value
    In { field: String, values: Vec<String> },
    /// `field REGEXP ?`
    Regexp { field: String, pattern: String },
}

impl Condition {
    pub fn eq_function(field: &str, function: &str, value: impl Into<String>) -> Self {
        Condition::EqFunction {
            field: field.to_string(),
            function: function.to_string(),
            value: value.into(),
        }
    }

    /// Membership predicate; `None` for an empty list since `IN ()` is not valid SQL
    pub fn in_list(field: &str, values: Vec<String>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Condition::In {
            field: field.to_string(),
            values,
        })
    }

    pub fn regexp(field: &str, pattern: impl Into<String>) -> Self {
        Condition::Regexp {
            field: field.to_string(),
            pattern: pattern.into(),
        }
    }

    /// Render the predicate with positional `?` placeholders
    pub fn to_sql(&self) -> String {
        match self {
            Condition::EqFunction {
                field, function, ..
            } => format!("{field} = {function}(?)"),
            Condition::In { field, values } => {
                let placeholders = vec!["?"; values.len()].join(", ");
                format!("{field} IN ({placeholders})")
            }
            Condition::Regexp { field, .. } => format!("{field} REGEXP ?"),
        }
    }

    /// Bind arguments in placeholder order
    pub fn arguments(&self) -> Vec<String> {
        match self {
            Condition::EqFunction { value, .. } => vec![value.clone()],
            Condition::In { values, .. } => values.clone(),
            Condition::Regexp { pattern, .. } => vec![pattern.clone()],
        }
    }
}
