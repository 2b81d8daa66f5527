//! Committed profile record and the edit-session draft.
//!
//! Edits never touch the committed record directly: entering edit mode takes
//! a full copy, cancelling discards it, and only a server-acknowledged save
//! commits it back. The draft's presence *is* the edit mode, so the state
//! "editing without a draft" cannot be constructed.

use serde::{Deserialize, Serialize};

/// Delimiter between fields of the stored profile record; interests reuse it
/// within the final field.
const RECORD_DELIMITER: &str = ", ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub location: String,
    pub occupation: String,
    pub interests: Vec<String>,
}

impl UserProfile {
    /// Profile for an account with no stored record yet. Identity comes from
    /// the authenticated session; everything else starts blank.
    pub fn empty(user_id: &str, email: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: email.to_string(),
            ..Self::default()
        }
    }

    /// Parse the delimited record returned by the profile service.
    ///
    /// Records may be truncated; missing trailing fields stay empty rather
    /// than failing the load. The interests field is the record tail, so
    /// multi-interest records survive the shared delimiter.
    pub fn from_record(user_id: &str, fallback_email: &str, record: &str) -> Self {
        let mut fields = record.splitn(6, RECORD_DELIMITER);
        let mut next = || fields.next().unwrap_or("").trim().to_string();
        let name = next();
        let email = next();
        let gender = next();
        let location = next();
        let occupation = next();
        let interests = fields.next().map(split_interests).unwrap_or_default();
        Self {
            user_id: user_id.to_string(),
            name,
            email: if email.is_empty() {
                fallback_email.to_string()
            } else {
                email
            },
            gender,
            location,
            occupation,
            interests,
        }
    }

    pub fn interests_text(&self) -> String {
        self.interests.join(", ")
    }
}

/// Split a free-text interests entry into the ordered list form.
pub fn split_interests(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .map(String::from)
        .collect()
}

/// Fields reachable through the editor. `user_id` and `email` are deliberately
/// absent: identity comes from the authenticated session and stays immutable
/// no matter what the edit session does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Gender,
    Location,
    Occupation,
    Interests,
}

impl ProfileField {
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Gender => "Gender",
            ProfileField::Location => "Location",
            ProfileField::Occupation => "Occupation",
            ProfileField::Interests => "Interests",
        }
    }
}

/// View/edit state over the committed profile.
#[derive(Debug, Default)]
pub struct ProfileEditor {
    committed: UserProfile,
    draft: Option<UserProfile>,
}

impl ProfileEditor {
    pub fn new(committed: UserProfile) -> Self {
        Self {
            committed,
            draft: None,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.committed
    }

    pub fn draft(&self) -> Option<&UserProfile> {
        self.draft.as_ref()
    }

    /// Record shown on screen: the draft while editing, the committed profile
    /// otherwise.
    pub fn display(&self) -> &UserProfile {
        self.draft.as_ref().unwrap_or(&self.committed)
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Start an edit session over a full copy of the committed record.
    /// Returns false (and changes nothing) when one is already open.
    pub fn enter_edit(&mut self) -> bool {
        if self.draft.is_some() {
            return false;
        }
        self.draft = Some(self.committed.clone());
        true
    }

    /// Update one draft field. Returns false outside an edit session.
    pub fn set_field(&mut self, field: ProfileField, value: &str) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        match field {
            ProfileField::Name => draft.name = value.to_string(),
            ProfileField::Gender => draft.gender = value.to_string(),
            ProfileField::Location => draft.location = value.to_string(),
            ProfileField::Occupation => draft.occupation = value.to_string(),
            ProfileField::Interests => draft.interests = split_interests(value),
        }
        true
    }

    /// Current draft text for a field, for seeding an input line.
    pub fn field_text(&self, field: ProfileField) -> String {
        let source = self.display();
        match field {
            ProfileField::Name => source.name.clone(),
            ProfileField::Gender => source.gender.clone(),
            ProfileField::Location => source.location.clone(),
            ProfileField::Occupation => source.occupation.clone(),
            ProfileField::Interests => source.interests_text(),
        }
    }

    /// Discard the draft. The committed record is unaffected.
    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    /// Apply the draft to the committed record and leave edit mode.
    ///
    /// Call this only after the profile service acknowledged the save; on a
    /// failed save the editor is left alone so the user can retry without
    /// re-entering anything.
    pub fn commit(&mut self) -> bool {
        match self.draft.take() {
            Some(draft) => {
                self.committed = draft;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserProfile {
        UserProfile {
            user_id: "u-7".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            gender: "f".into(),
            location: "London".into(),
            occupation: "engineer".into(),
            interests: vec!["math".into(), "looms".into()],
        }
    }

    #[test]
    fn full_records_parse_field_by_field() {
        let profile = UserProfile::from_record(
            "u-7",
            "fallback@example.com",
            "Ada, ada@example.com, f, London, engineer, math, looms, gardening",
        );
        assert_eq!(profile.user_id, "u-7");
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.occupation, "engineer");
        assert_eq!(profile.interests, vec!["math", "looms", "gardening"]);
    }

    #[test]
    fn short_records_default_missing_fields_to_empty() {
        let profile = UserProfile::from_record("u-7", "ada@example.com", "Ada");
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.gender, "");
        assert_eq!(profile.occupation, "");
        assert!(profile.interests.is_empty());
        // Session email fills in when the record has none.
        assert_eq!(profile.email, "ada@example.com");
    }

    #[test]
    fn empty_records_keep_session_identity() {
        let profile = UserProfile::from_record("u-7", "ada@example.com", "");
        assert_eq!(profile.user_id, "u-7");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.name, "");
    }

    #[test]
    fn interests_split_and_trim() {
        assert_eq!(
            split_interests("chess,  hiking , , tea"),
            vec!["chess", "hiking", "tea"]
        );
        assert!(split_interests("").is_empty());
    }

    #[test]
    fn edits_outside_a_session_are_rejected() {
        let mut editor = ProfileEditor::new(sample());
        assert!(!editor.set_field(ProfileField::Name, "Grace"));
        assert_eq!(editor.profile().name, "Ada");
    }

    #[test]
    fn cancel_discards_the_draft_entirely() {
        let mut editor = ProfileEditor::new(sample());
        assert!(editor.enter_edit());
        assert!(editor.set_field(ProfileField::Name, "Grace"));
        assert_eq!(editor.display().name, "Grace");
        editor.cancel_edit();
        assert!(!editor.is_editing());
        assert_eq!(editor.profile().name, "Ada");
        assert_eq!(editor.display().name, "Ada");
    }

    #[test]
    fn commit_applies_exactly_the_draft() {
        let mut editor = ProfileEditor::new(sample());
        editor.enter_edit();
        editor.set_field(ProfileField::Name, "Grace");
        editor.set_field(ProfileField::Interests, "compilers, navy");
        assert!(editor.commit());
        assert!(!editor.is_editing());
        assert_eq!(editor.profile().name, "Grace");
        assert_eq!(editor.profile().interests, vec!["compilers", "navy"]);
        // Identity fields ride along unchanged.
        assert_eq!(editor.profile().user_id, "u-7");
        assert_eq!(editor.profile().email, "ada@example.com");
    }

    #[test]
    fn reentering_edit_mode_is_rejected_while_editing() {
        let mut editor = ProfileEditor::new(sample());
        assert!(editor.enter_edit());
        editor.set_field(ProfileField::Name, "Grace");
        assert!(!editor.enter_edit());
        // The open draft survives the rejected re-entry.
        assert_eq!(editor.display().name, "Grace");
    }

    #[test]
    fn commit_without_a_draft_is_a_noop() {
        let mut editor = ProfileEditor::new(sample());
        assert!(!editor.commit());
        assert_eq!(editor.profile(), &sample());
    }
}
