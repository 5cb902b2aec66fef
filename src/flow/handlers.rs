//! Node handlers — what happens when the conversation enters a node.
//!
//! Handlers are a closed set of variants dispatched by `match`. A handler
//! runs to completion (including any eligibility call) before the graph is
//! asked for the next node.

use chrono::Utc;
use tracing::{info, warn};

use crate::config::LastNameRejection;
use crate::eligibility::{Decision, PatientDetails, interpret};
use crate::error::{Error, FlowError};
use crate::session::{FieldKey, SessionState};

use super::engine::NodeContext;
use super::input::{canonical_insurance_id, parse_confirmation, parse_date_of_birth};
use super::node::NodeId;
use super::prompts;

/// Field collected and confirmed by a collect/confirm node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    FirstName,
    LastName,
    DateOfBirth,
    InsuranceId,
}

impl FieldKind {
    /// Session key holding the confirmed value.
    pub fn key(&self) -> FieldKey {
        match self {
            Self::FirstName => FieldKey::FirstName,
            Self::LastName => FieldKey::LastName,
            Self::DateOfBirth => FieldKey::DateOfBirth,
            Self::InsuranceId => FieldKey::InsuranceId,
        }
    }

    /// How the field is named to the caller.
    pub fn spoken_label(&self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::DateOfBirth => "date of birth",
            Self::InsuranceId => "insurance ID",
        }
    }
}

/// Which way the conversation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Goodbye,
    TransferToRepresentative,
}

/// Result of running a node handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Ask the graph for the next node.
    Advance,
    /// The conversation is over.
    End,
}

/// Entry behavior of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeHandler {
    Collect(FieldKind),
    Confirm(FieldKind),
    EligibilityCheck,
    Terminal(TerminalKind),
}

impl NodeHandler {
    pub async fn on_enter(
        &self,
        node: NodeId,
        state: &mut SessionState,
        ctx: &NodeContext<'_>,
    ) -> Result<Transition, Error> {
        match *self {
            Self::Collect(kind) => collect(kind, node, state, ctx).await,
            Self::Confirm(kind) => confirm(kind, node, state, ctx).await,
            Self::EligibilityCheck => eligibility_check(node, state, ctx).await,
            Self::Terminal(kind) => terminal(kind, node, state, ctx).await,
        }
    }
}

async fn collect(
    kind: FieldKind,
    node: NodeId,
    state: &mut SessionState,
    ctx: &NodeContext<'_>,
) -> Result<Transition, Error> {
    ctx.voice.prompt(prompts::ask(kind)).await?;
    let heard = ctx.voice.listen_for_text().await?;
    state.record(node, kind.key().to_string(), heard.as_str());

    match kind {
        FieldKind::FirstName | FieldKind::LastName => {
            state.set_field(kind.key(), heard);
        }
        FieldKind::DateOfBirth => match parse_date_of_birth(&heard, Utc::now().date_naive()) {
            Ok(dob) => {
                state.set_field(FieldKey::DateOfBirthRaw, heard);
                state.set_field(FieldKey::DateOfBirth, dob.normalized);
            }
            Err(e) => {
                warn!(session_id = %state.session_id, node = %node, error = %e, "Date of birth not understood");
                state.clear_field(FieldKey::DateOfBirthRaw);
                state.clear_field(FieldKey::DateOfBirth);
                state.record(node, "input_error", e.to_string());
                ctx.voice.prompt(prompts::INVALID_DATE).await?;
            }
        },
        FieldKind::InsuranceId => match canonical_insurance_id(&heard) {
            Ok(id) => state.set_field(FieldKey::InsuranceId, id),
            Err(e) => {
                warn!(session_id = %state.session_id, node = %node, "Insurance ID rejected by format policy");
                state.clear_field(FieldKey::InsuranceId);
                state.record(node, "input_error", e.to_string());
                ctx.voice.prompt(prompts::INVALID_INSURANCE_ID).await?;
            }
        },
    }

    Ok(Transition::Advance)
}

async fn confirm(
    kind: FieldKind,
    node: NodeId,
    state: &mut SessionState,
    ctx: &NodeContext<'_>,
) -> Result<Transition, Error> {
    let readback = match kind {
        FieldKind::FirstName | FieldKind::LastName => {
            prompts::confirm_name(kind, state.field(kind.key()).unwrap_or_default())
        }
        FieldKind::DateOfBirth => {
            prompts::confirm_dob(state.field(FieldKey::DateOfBirthRaw).unwrap_or_default())
        }
        FieldKind::InsuranceId => {
            prompts::confirm_insurance(state.field(FieldKey::InsuranceId).unwrap_or_default())
        }
    };
    ctx.voice.prompt(&readback).await?;

    let reply = ctx.voice.listen_for_text().await?;
    let accepted = parse_confirmation(&reply);
    state.record(node, "confirm", reply);
    state.set_confirm(accepted);

    if !accepted {
        match kind {
            FieldKind::FirstName => state.clear_field(FieldKey::FirstName),
            FieldKind::LastName => {
                state.clear_field(FieldKey::LastName);
                if ctx.flow.last_name_rejection == LastNameRejection::RestartFromFirstName {
                    state.clear_field(FieldKey::FirstName);
                }
            }
            FieldKind::DateOfBirth => {
                state.clear_field(FieldKey::DateOfBirthRaw);
                state.clear_field(FieldKey::DateOfBirth);
            }
            FieldKind::InsuranceId => state.clear_field(FieldKey::InsuranceId),
        }
        info!(session_id = %state.session_id, node = %node, "Read-back rejected");
        ctx.voice.prompt(&prompts::rejected(kind)).await?;
    }

    Ok(Transition::Advance)
}

fn patient_details(state: &SessionState) -> Result<PatientDetails, FlowError> {
    let get = |key: FieldKey| {
        state
            .field(key)
            .map(String::from)
            .ok_or(FlowError::MissingField(key))
    };
    Ok(PatientDetails {
        first_name: get(FieldKey::FirstName)?,
        last_name: get(FieldKey::LastName)?,
        insurance_id: get(FieldKey::InsuranceId)?,
        date_of_birth: get(FieldKey::DateOfBirth)?,
    })
}

async fn eligibility_check(
    node: NodeId,
    state: &mut SessionState,
    ctx: &NodeContext<'_>,
) -> Result<Transition, Error> {
    let patient = patient_details(state)?;
    let spoken_dob = state
        .field(FieldKey::DateOfBirthRaw)
        .unwrap_or(patient.date_of_birth.as_str())
        .to_string();
    ctx.voice
        .prompt(&prompts::summary(
            &patient.first_name,
            &patient.last_name,
            &spoken_dob,
        ))
        .await?;

    let attempt = state.increment_retry();
    let decision = match ctx.eligibility.check(&patient, attempt).await {
        Ok(response) => interpret(&response, attempt),
        Err(e) => {
            warn!(
                session_id = %state.session_id,
                retry_count = attempt,
                kind = %e.kind(),
                error = %e,
                "Eligibility check failed"
            );
            Decision::from_failure(&e, attempt)
        }
    };

    state.apply_decision(&decision);
    state.record(node, "eligibility", decision.message.as_str());
    info!(
        session_id = %state.session_id,
        valid = decision.is_valid,
        network_status = %decision.network_status,
        needs_representative = decision.needs_representative,
        retry_validation = decision.retry_validation,
        retry_count = state.retry_count(),
        "Eligibility decision"
    );

    ctx.voice.prompt(&decision.message).await?;
    Ok(Transition::Advance)
}

/// Closing utterance, then room teardown. Nothing here fails the call.
async fn terminal(
    kind: TerminalKind,
    node: NodeId,
    state: &mut SessionState,
    ctx: &NodeContext<'_>,
) -> Result<Transition, Error> {
    if let Err(e) = ctx.voice.prompt(prompts::closing(kind)).await {
        warn!(session_id = %state.session_id, node = %node, error = %e, "Closing prompt failed");
    }
    state.record(node, "closed", node.to_string());
    ctx.release_room(state.session_id).await;
    Ok(Transition::End)
}
