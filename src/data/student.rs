use crate::error::{RollbookResult, ValidationSnafu};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MAX_FIELD_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: String,
    pub blood_group: String,
    pub address: Address,
}

/// Owned by exactly one [`Student`] - no identity of its own, stored and
/// removed together with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
}

/// Request-side payload for create and update. The id is only meaningful on
/// update, where it must agree with the path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStudent {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub address: Option<SaveAddress>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
}

/// A [`SaveStudent`] that has passed validation, with optional fields
/// normalised. The store assigns the id.
#[derive(Debug, Clone)]
pub struct StudentDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: String,
    pub blood_group: String,
    pub address: Address,
}

impl StudentDraft {
    pub fn with_id(self, id: i32) -> Student {
        Student {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            gender: self.gender,
            blood_group: self.blood_group,
            address: self.address,
        }
    }
}

impl From<Student> for SaveStudent {
    fn from(student: Student) -> Self {
        Self {
            id: Some(student.id),
            name: student.name,
            email: student.email,
            phone: student.phone,
            gender: student.gender,
            blood_group: student.blood_group,
            address: Some(SaveAddress {
                street: student.address.street,
                city: student.address.city,
                state: student.address.state,
                country: student.address.country,
            }),
        }
    }
}

impl SaveStudent {
    /// Checks every field and accumulates all violation messages rather than
    /// stopping at the first.
    pub fn validate(self) -> RollbookResult<StudentDraft> {
        let mut messages = Vec::new();

        let name = checked_required(&mut messages, "name", &self.name);
        let email = normalised_optional(self.email);
        if let Some(email) = email.as_deref() {
            if EmailAddress::from_str(email).is_err() {
                messages.push(format!("email '{email}' is not a valid email address"));
            }
        }
        let phone = normalised_optional(self.phone);
        if let Some(phone) = phone.as_deref() {
            if !is_valid_phone(phone) {
                messages.push(format!("phone '{phone}' is not a valid phone number"));
            }
        }
        let gender = checked_required(&mut messages, "gender", &self.gender);
        let blood_group = checked_required(&mut messages, "bloodGroup", &self.blood_group);

        let address = match self.address {
            Some(address) => {
                let street = checked_required(&mut messages, "address.street", &address.street);
                let city = checked_required(&mut messages, "address.city", &address.city);
                let country = checked_required(&mut messages, "address.country", &address.country);
                Address {
                    street,
                    city,
                    state: normalised_optional(address.state),
                    country,
                }
            }
            None => {
                messages.push("address is required".to_string());
                Address {
                    street: String::new(),
                    city: String::new(),
                    state: None,
                    country: String::new(),
                }
            }
        };

        snafu::ensure!(messages.is_empty(), ValidationSnafu { messages });

        Ok(StudentDraft {
            name,
            email,
            phone,
            gender,
            blood_group,
            address,
        })
    }
}

fn checked_required(messages: &mut Vec<String>, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        messages.push(format!("{field} is required"));
    } else if trimmed.len() > MAX_FIELD_LENGTH {
        messages.push(format!(
            "{field} must be at most {MAX_FIELD_LENGTH} characters"
        ));
    }
    trimmed.to_string()
}

fn normalised_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn is_valid_phone(phone: &str) -> bool {
    let mut digits = 0;
    for (i, c) in phone.chars().enumerate() {
        match c {
            '0'..='9' => digits += 1,
            '+' if i == 0 => {}
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }
    digits >= 7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RollbookError;

    fn valid_save() -> SaveStudent {
        SaveStudent {
            id: None,
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: Some("+44 20 7946 0123".to_string()),
            gender: "F".to_string(),
            blood_group: "O+".to_string(),
            address: Some(SaveAddress {
                street: "1 Main".to_string(),
                city: "London".to_string(),
                state: None,
                country: "UK".to_string(),
            }),
        }
    }

    fn messages_of(result: RollbookResult<StudentDraft>) -> Vec<String> {
        match result {
            Err(RollbookError::Validation { messages }) => messages,
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn valid_payload_passes() {
        let draft = valid_save().validate().expect("payload should be valid");
        assert_eq!(draft.name, "Ada Lovelace");
        assert_eq!(draft.address.city, "London");
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut save = valid_save();
        save.name = "   ".to_string();
        let messages = messages_of(save.validate());
        assert_eq!(messages, vec!["name is required".to_string()]);
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut save = valid_save();
        save.email = Some("not-an-email".to_string());
        let messages = messages_of(save.validate());
        assert!(messages[0].contains("not a valid email address"));
    }

    #[test]
    fn malformed_phone_is_rejected() {
        let mut save = valid_save();
        save.phone = Some("call me".to_string());
        let messages = messages_of(save.validate());
        assert!(messages[0].contains("not a valid phone number"));
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut save = valid_save();
        save.phone = Some("123".to_string());
        assert_eq!(messages_of(save.validate()).len(), 1);
    }

    #[test]
    fn blank_optionals_become_none() {
        let mut save = valid_save();
        save.email = Some("  ".to_string());
        save.phone = Some(String::new());
        let draft = save.validate().expect("blank optionals are not errors");
        assert_eq!(draft.email, None);
        assert_eq!(draft.phone, None);
    }

    #[test]
    fn missing_address_collects_one_message() {
        let mut save = valid_save();
        save.address = None;
        let messages = messages_of(save.validate());
        assert_eq!(messages, vec!["address is required".to_string()]);
    }

    #[test]
    fn every_violation_is_reported() {
        let save = SaveStudent::default();
        let messages = messages_of(save.validate());
        // name, gender, bloodGroup, address
        assert_eq!(messages.len(), 4);
        assert!(messages.iter().any(|m| m == "bloodGroup is required"));
        assert!(messages.iter().any(|m| m == "address is required"));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut save = valid_save();
        save.name = "x".repeat(MAX_FIELD_LENGTH + 1);
        let messages = messages_of(save.validate());
        assert!(messages[0].contains("at most"));
    }
}
