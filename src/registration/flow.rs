// src/registration/flow.rs
//! Editing → Confirming → Submitting → Editing lifecycle of the form

use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, warn};

use super::models::{Field, FieldEdit, FormValues, SubmittedSnapshot};
use super::validators::{RegistrationValidator, ValidationRules};
use crate::common::{ValidationResult, Validator};
use crate::services::{SubmissionError, SubmissionOutcome, SubmissionSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Confirming,
    Submitting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Editing => "editing",
            Phase::Confirming => "confirming",
            Phase::Submitting => "submitting",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(ValidationResult),

    #[error("form cannot be edited while {0}")]
    NotEditing(Phase),

    #[error("no submission is awaiting confirmation")]
    NotConfirming,

    #[error("a submission is already in flight")]
    SubmissionInFlight,
}

#[derive(Debug)]
enum State {
    Editing,
    Confirming(SubmittedSnapshot),
    Submitting,
}

/// Owns the form values and drives them through confirmation and submission
#[derive(Debug)]
pub struct RegistrationForm {
    values: FormValues,
    validator: RegistrationValidator,
    errors: ValidationResult,
    touched: BTreeSet<Field>,
    submit_attempted: bool,
    state: State,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new(ValidationRules::default())
    }
}

impl RegistrationForm {
    pub fn new(rules: ValidationRules) -> Self {
        let validator = RegistrationValidator::new(rules);
        let values = FormValues::default();
        let errors = validator.validate(&values);

        Self {
            values,
            validator,
            errors,
            touched: BTreeSet::new(),
            submit_attempted: false,
            state: State::Editing,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn rules(&self) -> &ValidationRules {
        self.validator.rules()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Editing => Phase::Editing,
            State::Confirming(_) => Phase::Confirming,
            State::Submitting => Phase::Submitting,
        }
    }

    /// Errors for the current values, whether or not the user has seen them
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    /// Errors worth showing: touched fields, or every field once a submit was attempted
    pub fn visible_errors(&self) -> ValidationResult {
        if self.submit_attempted {
            return self.errors.clone();
        }
        self.errors.filtered(|key| {
            self.touched.iter().any(|field| field.key() == key)
        })
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Snapshot awaiting confirmation, if any
    pub fn snapshot(&self) -> Option<&SubmittedSnapshot> {
        match &self.state {
            State::Confirming(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Whether the confirm control should be enabled
    pub fn can_confirm(&self) -> bool {
        matches!(self.state, State::Confirming(_))
    }

    /// Applies one edit and revalidates the whole form
    pub fn apply(&mut self, edit: FieldEdit) -> Result<&ValidationResult, FlowError> {
        self.ensure_editing()?;

        let field = edit.field();
        edit.apply_to(&mut self.values);
        self.touched.insert(field);
        self.errors = self.validator.validate(&self.values);

        debug!(field = field.key(), valid = !self.errors.has_error(field.key()), "Field edited");
        Ok(&self.errors)
    }

    /// Clears every field back to its initial state
    pub fn reset(&mut self) -> Result<(), FlowError> {
        self.ensure_editing()?;

        self.values = FormValues::default();
        self.touched.clear();
        self.submit_attempted = false;
        self.errors = self.validator.validate(&self.values);

        debug!("Form reset");
        Ok(())
    }

    /// Validates the form and, when valid, captures a snapshot and opens confirmation
    pub fn submit(&mut self) -> Result<SubmittedSnapshot, FlowError> {
        self.ensure_editing()?;
        self.submit_attempted = true;

        match SubmittedSnapshot::capture(&self.values, &self.validator) {
            Ok(snapshot) => {
                debug!(phase = %Phase::Confirming, "Snapshot captured");
                self.state = State::Confirming(snapshot.clone());
                Ok(snapshot)
            }
            Err(errors) => {
                debug!(invalid_fields = errors.len(), "Submit rejected by validation");
                self.errors = errors.clone();
                Err(FlowError::Invalid(errors))
            }
        }
    }

    /// Closes confirmation without sending anything; the snapshot is discarded
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        match self.state {
            State::Confirming(_) => {
                self.state = State::Editing;
                debug!(phase = %Phase::Editing, "Confirmation cancelled");
                Ok(())
            }
            State::Submitting => Err(FlowError::SubmissionInFlight),
            State::Editing => Err(FlowError::NotConfirming),
        }
    }

    /// Moves to Submitting and hands out the snapshot to send.
    ///
    /// Front-ends that drive the request themselves call this, then
    /// [`finish_submission`](Self::finish_submission) once it settles.
    pub fn begin_submission(&mut self) -> Result<SubmittedSnapshot, FlowError> {
        match std::mem::replace(&mut self.state, State::Submitting) {
            State::Confirming(snapshot) => {
                debug!(phase = %Phase::Submitting, "Submission started");
                Ok(snapshot)
            }
            State::Submitting => Err(FlowError::SubmissionInFlight),
            State::Editing => {
                self.state = State::Editing;
                Err(FlowError::NotConfirming)
            }
        }
    }

    /// Returns to Editing whatever the outcome
    pub fn finish_submission(
        &mut self,
        result: Result<(), SubmissionError>,
    ) -> Result<SubmissionOutcome, FlowError> {
        if !matches!(self.state, State::Submitting) {
            return Err(FlowError::NotConfirming);
        }
        self.state = State::Editing;

        let outcome = SubmissionOutcome::from(result);
        match &outcome {
            SubmissionOutcome::Succeeded => info!("Registration submitted"),
            SubmissionOutcome::Failed(e) => warn!(error = %e, "Registration submission failed"),
        }
        Ok(outcome)
    }

    /// Sends the pending snapshot through `sink`, exactly once
    pub async fn confirm<S>(&mut self, sink: &S) -> Result<SubmissionOutcome, FlowError>
    where
        S: SubmissionSink + ?Sized,
    {
        let snapshot = self.begin_submission()?;
        let result = sink.submit(&snapshot).await;
        self.finish_submission(result)
    }

    fn ensure_editing(&self) -> Result<(), FlowError> {
        match self.phase() {
            Phase::Editing => Ok(()),
            phase => Err(FlowError::NotEditing(phase)),
        }
    }
}
