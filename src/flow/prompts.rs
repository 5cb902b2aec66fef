//! Utterances spoken by the agent.

use crate::spellback::spell_out;

use super::handlers::{FieldKind, TerminalKind};

pub const GREETING: &str =
    "Hello! I'll be helping you with your information today. Let's start with your name.";

pub const VERIFYING: &str = "One moment while I verify your insurance.";

pub const INVALID_DATE: &str = "Sorry, I didn't catch a valid date. \
     Please say your date of birth with the month, day, and year.";

pub const INVALID_INSURANCE_ID: &str = "Sorry, that doesn't sound like a valid insurance ID. \
     Please say it again, one letter or number at a time.";

/// Question asked when collecting `kind`.
pub fn ask(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::FirstName => "May I have your first name please?",
        FieldKind::LastName => "May I have your last name please?",
        FieldKind::DateOfBirth => "What is your date of birth?",
        FieldKind::InsuranceId => "Now, may I have your insurance ID number?",
    }
}

/// Read-back of a name with its phonetic spelling.
pub fn confirm_name(kind: FieldKind, name: &str) -> String {
    format!(
        "I have your {} as {name}. That's {}. Is that correct?",
        kind.spoken_label(),
        spell_out(name)
    )
}

/// Read-back of the date of birth exactly as it was heard.
pub fn confirm_dob(raw: &str) -> String {
    format!("I have your date of birth as {raw}. Is that correct?")
}

/// Read-back of the canonical insurance id with its phonetic spelling.
pub fn confirm_insurance(id: &str) -> String {
    format!(
        "I have your insurance ID as {id}. That's {}. Is that correct?",
        spell_out(id)
    )
}

/// Acknowledgement after the caller rejects a read-back.
pub fn rejected(kind: FieldKind) -> String {
    format!("Sorry about that. Let's try your {} again.", kind.spoken_label())
}

/// Summary read before the eligibility call.
pub fn summary(first: &str, last: &str, dob: &str) -> String {
    format!("Thank you, {first} {last}, born {dob}. {VERIFYING}")
}

pub fn closing(kind: TerminalKind) -> &'static str {
    match kind {
        TerminalKind::Goodbye => {
            "Thank you for confirming. Your information has been received. Goodbye!"
        }
        TerminalKind::TransferToRepresentative => {
            "Please hold while I transfer you to a representative."
        }
    }
}
