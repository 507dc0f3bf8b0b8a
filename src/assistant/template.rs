use std::collections::BTreeMap;

/// Placeholder name → substitution value
pub type VariableValues = BTreeMap<String, String>;

/// Replace every `{{key}}` in `template` with its value
///
/// Replacement is literal: keys are not interpreted as patterns and
/// placeholders without a value are left untouched.
pub fn substitute(template: &str, variables: &VariableValues) -> String {
    variables
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{{{}}}}}", key), value)
        })
}

/// Render a question list the way the interviewer prompt expects it
pub fn format_questions<S: AsRef<str>>(questions: &[S]) -> String {
    questions
        .iter()
        .map(|q| format!("- {}", q.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
