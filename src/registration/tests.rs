//! Tests for registration module
//!
//! These tests verify core registration functionality including:
//! - Field validators and the combined form validator
//! - Snapshot capture
//! - The confirm/cancel/submit lifecycle

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;
    use crate::services::{SubmissionError, SubmissionSink};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn valid_values() -> FormValues {
        FormValues {
            last_name: "山田".to_string(),
            first_name: "太郎".to_string(),
            gender: Some(Gender::Male),
            age: Some(30),
            prefecture: "東京都".to_string(),
            self_intro: "よろしくお願いします".to_string(),
        }
    }

    fn fill(form: &mut RegistrationForm, values: FormValues) {
        form.apply(FieldEdit::LastName(values.last_name)).unwrap();
        form.apply(FieldEdit::FirstName(values.first_name)).unwrap();
        form.apply(FieldEdit::Gender(values.gender)).unwrap();
        form.apply(FieldEdit::Age(values.age)).unwrap();
        form.apply(FieldEdit::Prefecture(values.prefecture)).unwrap();
        form.apply(FieldEdit::SelfIntro(values.self_intro)).unwrap();
    }

    /// Records every snapshot it receives and fails on demand
    #[derive(Default)]
    struct RecordingSink {
        fail: bool,
        received: Mutex<Vec<SubmittedSnapshot>>,
    }

    impl RecordingSink {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn count(&self) -> usize {
            self.received.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SubmissionSink for RecordingSink {
        async fn submit(&self, snapshot: &SubmittedSnapshot) -> Result<(), SubmissionError> {
            self.received.lock().unwrap().push(snapshot.clone());
            if self.fail {
                Err(SubmissionError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    // ============================================================================
    // Validator Tests
    // ============================================================================

    #[test]
    fn test_valid_values_pass() {
        let result = RegistrationValidator::default().validate(&valid_values());
        assert!(result.is_valid, "Valid registration should pass validation");
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let result = RegistrationValidator::default().validate(&FormValues::default());

        assert!(!result.is_valid);
        assert_eq!(result.len(), 5);
        assert_eq!(result.message("name"), Some("名前は必須です"));
        assert_eq!(result.message("gender"), Some("性別は必須です"));
        assert_eq!(result.message("age"), Some("年齢は必須です"));
        assert_eq!(result.message("prefecture"), Some("出身は必須です"));
        assert_eq!(result.message("selfIntro"), Some("自己PRは必須です"));
    }

    #[test]
    fn test_missing_name_does_not_hide_other_errors() {
        let values = FormValues {
            last_name: String::new(),
            first_name: String::new(),
            age: Some(500),
            ..valid_values()
        };
        let result = RegistrationValidator::default().validate(&values);

        assert_eq!(result.message("name"), Some("名前は必須です"));
        assert!(result.has_error("age"));
        assert!(!result.has_error("gender"));
        assert!(!result.has_error("prefecture"));
        assert!(!result.has_error("selfIntro"));
    }

    #[test]
    fn test_partial_name_messages() {
        assert_eq!(
            validators::validate_name("", "太郎", None),
            Err("姓は必須です".to_string())
        );
        assert_eq!(
            validators::validate_name("山田", "", None),
            Err("名は必須です".to_string())
        );
        assert!(validators::validate_name("山田", "太郎", None).is_ok());
    }

    #[test]
    fn test_name_length_bound_is_optional() {
        assert!(validators::validate_name("寿限無寿限無", "五劫の擦り切れ", None).is_ok());
        assert_eq!(
            validators::validate_name("寿限無寿限無", "五劫の擦り切れ", Some(10)),
            Err("名前は10文字以内で入力してください".to_string())
        );
        // 5 + 5 characters sits exactly on the bound
        assert!(validators::validate_name("一二三四五", "六七八九十", Some(10)).is_ok());
    }

    #[test]
    fn test_age_bounds() {
        let rules = ValidationRules::default();
        for age in -20..=140 {
            let result = validators::validate_age(Some(age), rules.age_max);
            if (0..=120).contains(&age) {
                assert!(result.is_ok(), "age {} should be accepted", age);
            } else {
                assert_eq!(
                    result,
                    Err("年齢は0以上120以下でなければなりません".to_string()),
                    "age {} should be rejected",
                    age
                );
            }
        }
    }

    #[test]
    fn test_age_bound_is_configurable() {
        assert!(validators::validate_age(Some(100), 100).is_ok());
        assert_eq!(
            validators::validate_age(Some(101), 100),
            Err("年齢は0以上100以下でなければなりません".to_string())
        );
    }

    #[test]
    fn test_zero_age_is_set_not_missing() {
        assert!(validators::validate_age(Some(0), 120).is_ok());
        assert_eq!(
            validators::validate_age(None, 120),
            Err("年齢は必須です".to_string())
        );
    }

    #[test]
    fn test_self_intro_length_boundary() {
        assert!(validators::validate_self_intro(&"a".repeat(100)).is_ok());
        assert!(validators::validate_self_intro(&"あ".repeat(100)).is_ok());
        assert_eq!(
            validators::validate_self_intro(&"a".repeat(101)),
            Err("自己PRは100文字以内で入力してください".to_string())
        );
        assert!(validators::validate_self_intro(&"あ".repeat(101)).is_err());
    }

    #[test]
    fn test_prefecture_must_be_listed() {
        assert!(validators::validate_prefecture("大阪府").is_ok());
        assert_eq!(
            validators::validate_prefecture("大阪"),
            Err("出身は一覧から選んでください".to_string())
        );
        assert_eq!(
            validators::validate_prefecture(""),
            Err("出身は必須です".to_string())
        );
    }

    #[test]
    fn test_gender_codes() {
        assert_eq!(Gender::parse("1"), Some(Gender::Male));
        assert_eq!(Gender::parse("女性"), Some(Gender::Female));
        assert_eq!(Gender::parse(" 3 "), Some(Gender::Other));
        assert_eq!(Gender::parse("4"), None);
        assert!(validators::validate_gender(None).is_err());
    }

    #[test]
    fn test_validation_has_no_state_between_calls() {
        let validator = RegistrationValidator::default();
        let first = validator.validate(&FormValues::default());
        let _ = validator.validate(&valid_values());
        let again = validator.validate(&FormValues::default());
        assert_eq!(first, again);
    }

    // ============================================================================
    // Snapshot Tests
    // ============================================================================

    #[test]
    fn test_snapshot_joins_name_with_single_space() {
        let snapshot =
            SubmittedSnapshot::capture(&valid_values(), &RegistrationValidator::default()).unwrap();

        assert_eq!(snapshot.full_name(), "山田 太郎");
        assert_eq!(snapshot.gender(), Gender::Male);
        assert_eq!(snapshot.age(), 30);
        assert_eq!(snapshot.prefecture(), "東京都");
        assert_eq!(snapshot.self_intro(), "よろしくお願いします");
    }

    #[test]
    fn test_snapshot_refuses_invalid_values() {
        let values = FormValues {
            self_intro: String::new(),
            ..valid_values()
        };
        let errors =
            SubmittedSnapshot::capture(&values, &RegistrationValidator::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_error("selfIntro"));
    }

    #[test]
    fn test_snapshot_payload_shape() {
        let snapshot =
            SubmittedSnapshot::capture(&valid_values(), &RegistrationValidator::default()).unwrap();
        let payload = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(
            payload,
            serde_json::json!({
                "fullName": "山田 太郎",
                "gender": "1",
                "age": 30,
                "prefecture": "東京都",
                "selfIntro": "よろしくお願いします",
            })
        );
    }

    // ============================================================================
    // Flow Tests
    // ============================================================================

    #[test]
    fn test_new_form_is_editing_with_hidden_errors() {
        let form = RegistrationForm::default();
        assert_eq!(form.phase(), Phase::Editing);
        assert_eq!(form.errors().len(), 5);
        assert!(form.visible_errors().is_empty());
        assert!(!form.can_confirm());
    }

    #[test]
    fn test_edits_revalidate_and_touch_fields() {
        let mut form = RegistrationForm::default();

        let errors = form.apply(FieldEdit::LastName("山田".to_string())).unwrap();
        assert_eq!(errors.message("name"), Some("名は必須です"));
        assert!(form.is_touched(Field::Name));

        let visible = form.visible_errors();
        assert_eq!(visible.len(), 1);
        assert!(visible.has_error("name"));

        form.apply(FieldEdit::FirstName("太郎".to_string())).unwrap();
        assert!(!form.errors().has_error("name"));
    }

    #[test]
    fn test_invalid_submit_stays_editing_and_reveals_errors() {
        let mut form = RegistrationForm::default();
        form.apply(FieldEdit::Age(Some(30))).unwrap();

        let err = form.submit().unwrap_err();
        match err {
            FlowError::Invalid(errors) => {
                assert_eq!(errors.len(), 4);
                assert!(!errors.has_error("age"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(form.phase(), Phase::Editing);
        assert!(form.snapshot().is_none());
        assert_eq!(form.visible_errors().len(), 4);
    }

    #[test]
    fn test_valid_submit_moves_to_confirming() {
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());

        let snapshot = form.submit().unwrap();
        assert_eq!(snapshot.full_name(), "山田 太郎");
        assert_eq!(form.phase(), Phase::Confirming);
        assert_eq!(form.snapshot(), Some(&snapshot));
        assert!(form.can_confirm());
    }

    #[test]
    fn test_edits_rejected_outside_editing() {
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());
        form.submit().unwrap();

        let err = form.apply(FieldEdit::Age(Some(40))).unwrap_err();
        assert!(matches!(err, FlowError::NotEditing(Phase::Confirming)));
        assert!(matches!(form.reset(), Err(FlowError::NotEditing(_))));
        assert!(matches!(form.submit(), Err(FlowError::NotEditing(_))));
        assert_eq!(form.values().age, Some(30));
    }

    #[tokio::test]
    async fn test_cancel_returns_to_editing_without_request() {
        let sink = RecordingSink::default();
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());
        form.submit().unwrap();

        form.cancel().unwrap();
        assert_eq!(form.phase(), Phase::Editing);
        assert!(form.snapshot().is_none());
        assert_eq!(sink.count(), 0);

        // nothing left to confirm after cancelling
        let err = form.confirm(&sink).await.unwrap_err();
        assert!(matches!(err, FlowError::NotConfirming));
        assert_eq!(sink.count(), 0);
        assert_eq!(form.phase(), Phase::Editing);
    }

    #[tokio::test]
    async fn test_confirm_sends_exactly_one_request() {
        let sink = RecordingSink::default();
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());
        let snapshot = form.submit().unwrap();

        let outcome = form.confirm(&sink).await.unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "登録が完了しました");
        assert_eq!(form.phase(), Phase::Editing);
        assert_eq!(sink.received.lock().unwrap().as_slice(), &[snapshot]);

        // values survive a successful submission
        assert_eq!(form.values(), &valid_values());
    }

    #[tokio::test]
    async fn test_failed_confirm_still_closes_confirmation() {
        let sink = RecordingSink::failing();
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());
        form.submit().unwrap();

        let outcome = form.confirm(&sink).await.unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "登録に失敗しました");
        assert_eq!(form.phase(), Phase::Editing);
        assert!(form.snapshot().is_none());
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_second_confirm_rejected_while_in_flight() {
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());
        form.submit().unwrap();

        form.begin_submission().unwrap();
        assert_eq!(form.phase(), Phase::Submitting);
        assert!(!form.can_confirm());
        assert!(matches!(
            form.begin_submission(),
            Err(FlowError::SubmissionInFlight)
        ));
        assert!(matches!(form.cancel(), Err(FlowError::SubmissionInFlight)));

        let outcome = form.finish_submission(Ok(())).unwrap();
        assert!(outcome.is_success());
        assert_eq!(form.phase(), Phase::Editing);
        assert!(matches!(
            form.finish_submission(Ok(())),
            Err(FlowError::NotConfirming)
        ));
    }

    #[test]
    fn test_reset_clears_values_and_touched_state() {
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());
        let _ = form.submit();
        form.cancel().unwrap();

        form.reset().unwrap();
        assert_eq!(form.values(), &FormValues::default());
        assert!(!form.is_touched(Field::Name));
        assert!(form.visible_errors().is_empty());
        assert_eq!(form.errors().len(), 5);
    }

    #[tokio::test]
    async fn test_new_cycle_replaces_snapshot() {
        let sink = RecordingSink::default();
        let mut form = RegistrationForm::default();
        fill(&mut form, valid_values());
        form.submit().unwrap();
        form.confirm(&sink).await.unwrap();

        form.apply(FieldEdit::Age(Some(31))).unwrap();
        let second = form.submit().unwrap();
        assert_eq!(second.age(), 31);
        form.confirm(&sink).await.unwrap();

        let received = sink.received.lock().unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].age(), 30);
        assert_eq!(received[1].age(), 31);
    }

    #[test]
    fn test_configured_rules_reach_validation() {
        let mut form = RegistrationForm::new(ValidationRules {
            age_max: 100,
            name_max_chars: Some(3),
        });
        fill(&mut form, valid_values());
        form.apply(FieldEdit::Age(Some(110))).unwrap();

        let errors = form.errors();
        assert_eq!(
            errors.message("age"),
            Some("年齢は0以上100以下でなければなりません")
        );
        assert_eq!(errors.message("name"), Some("名前は3文字以内で入力してください"));
    }
}
