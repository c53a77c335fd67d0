// src/registration/validators.rs

use super::models::{Field, FormValues, Gender};
use super::prefectures::is_prefecture;
use crate::common::{ValidationResult, Validator};

pub const AGE_MIN: i64 = 0;
pub const DEFAULT_AGE_MAX: i64 = 120;
pub const SELF_INTRO_MAX_CHARS: usize = 100;

/// Tunable parts of the rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Inclusive upper bound for age
    pub age_max: i64,
    /// Optional bound on the combined length of last and first name
    pub name_max_chars: Option<usize>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            age_max: DEFAULT_AGE_MAX,
            name_max_chars: None,
        }
    }
}

// ============================================================================
// Registration Form Validator
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RegistrationValidator {
    rules: ValidationRules,
}

impl RegistrationValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }
}

impl Validator<FormValues> for RegistrationValidator {
    fn validate(&self, data: &FormValues) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Every field is checked, an error in one never hides another
        if let Err(message) =
            validate_name(&data.last_name, &data.first_name, self.rules.name_max_chars)
        {
            result.add_error(Field::Name.key(), &message);
        }

        if let Err(message) = validate_gender(data.gender) {
            result.add_error(Field::Gender.key(), &message);
        }

        if let Err(message) = validate_age(data.age, self.rules.age_max) {
            result.add_error(Field::Age.key(), &message);
        }

        if let Err(message) = validate_prefecture(&data.prefecture) {
            result.add_error(Field::Prefecture.key(), &message);
        }

        if let Err(message) = validate_self_intro(&data.self_intro) {
            result.add_error(Field::SelfIntro.key(), &message);
        }

        result
    }
}

/// Validates the two name parts
pub fn validate_name(
    last_name: &str,
    first_name: &str,
    max_chars: Option<usize>,
) -> Result<(), String> {
    match (last_name.is_empty(), first_name.is_empty()) {
        (true, true) => return Err("名前は必須です".to_string()),
        (true, false) => return Err("姓は必須です".to_string()),
        (false, true) => return Err("名は必須です".to_string()),
        (false, false) => {}
    }

    if let Some(max) = max_chars {
        let combined = last_name.chars().count() + first_name.chars().count();
        if combined > max {
            return Err(format!("名前は{}文字以内で入力してください", max));
        }
    }

    Ok(())
}

pub fn validate_gender(gender: Option<Gender>) -> Result<(), String> {
    match gender {
        Some(_) => Ok(()),
        None => Err("性別は必須です".to_string()),
    }
}

/// Validates age against the inclusive range `AGE_MIN..=age_max`
pub fn validate_age(age: Option<i64>, age_max: i64) -> Result<(), String> {
    let Some(age) = age else {
        return Err("年齢は必須です".to_string());
    };

    if !(AGE_MIN..=age_max).contains(&age) {
        return Err(format!(
            "年齢は{}以上{}以下でなければなりません",
            AGE_MIN, age_max
        ));
    }

    Ok(())
}

pub fn validate_prefecture(prefecture: &str) -> Result<(), String> {
    if prefecture.is_empty() {
        return Err("出身は必須です".to_string());
    }
    if !is_prefecture(prefecture) {
        return Err("出身は一覧から選んでください".to_string());
    }
    Ok(())
}

/// Validates the self-introduction; length counts characters, not bytes
pub fn validate_self_intro(self_intro: &str) -> Result<(), String> {
    if self_intro.is_empty() {
        return Err("自己PRは必須です".to_string());
    }
    if self_intro.chars().count() > SELF_INTRO_MAX_CHARS {
        return Err(format!(
            "自己PRは{}文字以内で入力してください",
            SELF_INTRO_MAX_CHARS
        ));
    }
    Ok(())
}
