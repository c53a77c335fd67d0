// src/registration/models.rs

use serde::{Serialize, Serializer};
use std::fmt;

use super::validators::{validate_age, validate_gender, RegistrationValidator};
use crate::common::{ValidationResult, Validator};

/// Inputs of the registration form, keyed the way errors are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Gender,
    Age,
    Prefecture,
    SelfIntro,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Gender,
        Field::Age,
        Field::Prefecture,
        Field::SelfIntro,
    ];

    /// Key used in `ValidationResult`
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Gender => "gender",
            Field::Age => "age",
            Field::Prefecture => "prefecture",
            Field::SelfIntro => "selfIntro",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "名前",
            Field::Gender => "性別",
            Field::Age => "年齢",
            Field::Prefecture => "出身",
            Field::SelfIntro => "自己PR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    /// Wire value sent in the submission payload
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "1",
            Gender::Female => "2",
            Gender::Other => "3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男性",
            Gender::Female => "女性",
            Gender::Other => "その他",
        }
    }

    /// Accepts either the wire code or the display label
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|gender| gender.code() == input || gender.label() == input)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

/// Current contents of the form; everything starts empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub last_name: String,
    pub first_name: String,
    pub gender: Option<Gender>,
    pub age: Option<i64>,
    pub prefecture: String,
    pub self_intro: String,
}

impl FormValues {
    /// Last and first name joined by a single space
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// A single user edit to one input of the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    LastName(String),
    FirstName(String),
    Gender(Option<Gender>),
    Age(Option<i64>),
    Prefecture(String),
    SelfIntro(String),
}

impl FieldEdit {
    /// The validated field this edit affects
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::LastName(_) | FieldEdit::FirstName(_) => Field::Name,
            FieldEdit::Gender(_) => Field::Gender,
            FieldEdit::Age(_) => Field::Age,
            FieldEdit::Prefecture(_) => Field::Prefecture,
            FieldEdit::SelfIntro(_) => Field::SelfIntro,
        }
    }

    pub fn apply_to(self, values: &mut FormValues) {
        match self {
            FieldEdit::LastName(value) => values.last_name = value,
            FieldEdit::FirstName(value) => values.first_name = value,
            FieldEdit::Gender(value) => values.gender = value,
            FieldEdit::Age(value) => values.age = value,
            FieldEdit::Prefecture(value) => values.prefecture = value,
            FieldEdit::SelfIntro(value) => values.self_intro = value,
        }
    }
}

/// Immutable copy of the form taken when a valid form is submitted.
///
/// Serializes to the submission payload:
/// `{ "fullName", "gender", "age", "prefecture", "selfIntro" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedSnapshot {
    full_name: String,
    gender: Gender,
    age: i64,
    prefecture: String,
    self_intro: String,
}

impl SubmittedSnapshot {
    /// Validates `values` and captures them; the errors are returned instead
    /// when any field is invalid
    pub fn capture(
        values: &FormValues,
        validator: &RegistrationValidator,
    ) -> Result<Self, ValidationResult> {
        let result = validator.validate(values);
        if !result.is_valid {
            return Err(result);
        }

        match (values.gender, values.age) {
            (Some(gender), Some(age)) => Ok(Self {
                full_name: values.full_name(),
                gender,
                age,
                prefecture: values.prefecture.clone(),
                self_intro: values.self_intro.clone(),
            }),
            // unreachable while the validator rejects unset gender and age
            _ => {
                let mut result = ValidationResult::new();
                if let Err(message) = validate_gender(values.gender) {
                    result.add_error(Field::Gender.key(), &message);
                }
                if let Err(message) = validate_age(values.age, validator.rules().age_max) {
                    result.add_error(Field::Age.key(), &message);
                }
                Err(result)
            }
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn prefecture(&self) -> &str {
        &self.prefecture
    }

    pub fn self_intro(&self) -> &str {
        &self.self_intro
    }
}
