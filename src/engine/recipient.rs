// Evolution Client: Recipient Formatting
// Phone numbers become `<digits>@c.us`; group ids become `<id>@g.us`.

use crate::atoms::constants::{GROUP_SUFFIX, PERSON_SUFFIX};
use crate::atoms::error::{EvolutionError, EvolutionResult};

/// Who a message is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// A phone number in any human format ("+55 (11) 99999-9999").
    Person(String),
    /// A group id, used verbatim.
    Group(String),
}

impl Recipient {
    pub fn person(number: impl Into<String>) -> Self {
        Recipient::Person(number.into())
    }

    pub fn group(id: impl Into<String>) -> Self {
        Recipient::Group(id.into())
    }

    /// Build from the `(number, is_group)` pair most send calls take.
    pub fn from_flag(id: impl Into<String>, is_group: bool) -> Self {
        if is_group {
            Recipient::Group(id.into())
        } else {
            Recipient::Person(id.into())
        }
    }

    /// The id the remote service expects in the `number` field.
    pub fn jid(&self) -> EvolutionResult<String> {
        match self {
            Recipient::Person(raw) => person_jid(raw),
            Recipient::Group(id) => group_jid(id),
        }
    }
}

impl From<&str> for Recipient {
    fn from(number: &str) -> Self {
        Recipient::Person(number.to_string())
    }
}

impl From<String> for Recipient {
    fn from(number: String) -> Self {
        Recipient::Person(number)
    }
}

impl From<&String> for Recipient {
    fn from(number: &String) -> Self {
        Recipient::Person(number.clone())
    }
}

/// Keep only ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// `"+55 (11) 99999-9999"` → `"5511999999999@c.us"`.
pub fn person_jid(raw: &str) -> EvolutionResult<String> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return Err(EvolutionError::validation("phone number is required"));
    }
    Ok(format!("{}{}", digits, PERSON_SUFFIX))
}

/// `"120363042"` → `"120363042@g.us"`. Never digit-stripped.
pub fn group_jid(id: &str) -> EvolutionResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(EvolutionError::validation("group id is required"));
    }
    if id.ends_with(GROUP_SUFFIX) {
        return Ok(id.to_string());
    }
    Ok(format!("{}{}", id, GROUP_SUFFIX))
}

/// Group participants are sent as bare digits.
pub fn participant(raw: &str) -> EvolutionResult<String> {
    let digits = digits_only(raw);
    if digits.is_empty() {
        return Err(EvolutionError::validation(format!("participant '{}' has no digits", raw)));
    }
    Ok(digits)
}

pub fn participants<S: AsRef<str>>(raw: &[S]) -> EvolutionResult<Vec<String>> {
    if raw.is_empty() {
        return Err(EvolutionError::validation("at least one participant is required"));
    }
    raw.iter().map(|p| participant(p.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_formatting_is_idempotent_across_formats() {
        assert_eq!(person_jid("5511999999999").unwrap(), "5511999999999@c.us");
        assert_eq!(person_jid("+55 (11) 99999-9999").unwrap(), "5511999999999@c.us");
    }

    #[test]
    fn empty_phone_is_validation_error() {
        assert!(person_jid("").unwrap_err().is_validation());
        assert!(person_jid("+() -").unwrap_err().is_validation());
    }

    #[test]
    fn group_ids_are_not_digit_stripped() {
        assert_eq!(group_jid("1203-abc").unwrap(), "1203-abc@g.us");
        assert_eq!(Recipient::from_flag("120363042", true).jid().unwrap(), "120363042@g.us");
        assert_eq!(group_jid("120363042@g.us").unwrap(), "120363042@g.us");
    }

    #[test]
    fn group_jid_never_uses_person_suffix() {
        let jid = Recipient::group("5511999999999").jid().unwrap();
        assert!(!jid.contains(PERSON_SUFFIX));
    }

    #[test]
    fn participants_are_bare_digits() {
        assert_eq!(participants(&["+55 11 98888-7777", "5511999999999"]).unwrap(), vec!["5511988887777", "5511999999999"]);
        assert!(participants::<&str>(&[]).unwrap_err().is_validation());
    }
}
