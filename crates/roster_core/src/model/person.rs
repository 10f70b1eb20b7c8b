//! Person domain model.
//!
//! # Responsibility
//! - Define the canonical staff record persisted in the roster.
//! - Validate user-entered contact and experience fields.
//! - Apply shallow partial updates (`PersonPatch`).
//!
//! # Invariants
//! - `id` is stable and never reused for another person.
//! - New persons always start `unassigned`.
//! - Input validation runs at the input boundary, not on load.

use crate::model::role::Role;
use crate::model::zone::Location;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));

/// Stable identifier for a roster entry.
pub type PersonId = Uuid;

/// One entry of a person's work history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub start_date: NaiveDate,
    /// `None` means the position is current.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Experience {
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            title: title.into(),
            start_date,
            end_date,
        }
    }

    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }

    fn has_valid_range(&self) -> bool {
        self.end_date.map_or(true, |end| self.start_date <= end)
    }
}

/// Canonical staff record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: Role,
    pub location: Location,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub experiences: Vec<Experience>,
}

impl Person {
    /// Builds an unassigned person with a generated id.
    pub fn from_draft(draft: PersonDraft) -> Self {
        Self::with_id(Uuid::new_v4(), draft)
    }

    /// Builds an unassigned person with a caller-provided id.
    ///
    /// Used by seed data and imports where identity already exists.
    pub fn with_id(id: PersonId, draft: PersonDraft) -> Self {
        Self {
            id,
            name: draft.name,
            role: draft.role,
            location: Location::Unassigned,
            email: draft.email,
            phone: draft.phone,
            photo_url: draft.photo_url,
            experiences: draft.experiences,
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.location.is_unassigned()
    }

    /// Overwrites every field present in `patch`; absent fields are kept.
    pub fn apply(&mut self, patch: PersonPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(photo_url) = patch.photo_url {
            self.photo_url = photo_url;
        }
        if let Some(experiences) = patch.experiences {
            self.experiences = experiences;
        }
    }
}

/// User-entered data for a new person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    pub name: String,
    pub role: Role,
    pub email: String,
    pub phone: String,
    pub photo_url: Option<String>,
    pub experiences: Vec<Experience>,
}

impl PersonDraft {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            email: email.into(),
            phone: phone.into(),
            photo_url: None,
            experiences: Vec::new(),
        }
    }

    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    pub fn with_experience(mut self, experience: Experience) -> Self {
        self.experiences.push(experience);
        self
    }

    /// Checks the fields a form would reject.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        validate_experiences(&self.experiences)
    }
}

/// Shallow partial update. `None` leaves the field untouched.
///
/// Placement is intentionally absent: locations change only through moves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// `Some(None)` clears the photo.
    pub photo_url: Option<Option<String>>,
    pub experiences: Option<Vec<Experience>>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Validates only the fields the patch carries.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(phone) = &self.phone {
            validate_phone(phone)?;
        }
        if let Some(experiences) = &self.experiences {
            validate_experiences(experiences)?;
        }
        Ok(())
    }
}

/// Input validation errors for person fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    InvalidEmail(String),
    InvalidPhone(String),
    /// Experience at `index` ends before it starts.
    ExperienceDateOrder { index: usize },
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::InvalidPhone(value) => {
                write!(f, "invalid phone number `{value}`: expected 10 digits")
            }
            Self::ExperienceDateOrder { index } => write!(
                f,
                "experience #{} starts after it ends",
                index + 1
            ),
        }
    }
}

impl Error for PersonValidationError {}

fn validate_name(name: &str) -> Result<(), PersonValidationError> {
    if name.trim().is_empty() {
        return Err(PersonValidationError::EmptyName);
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), PersonValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(PersonValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), PersonValidationError> {
    let digits: String = phone.chars().filter(|ch| !ch.is_whitespace()).collect();
    if !PHONE_RE.is_match(&digits) {
        return Err(PersonValidationError::InvalidPhone(phone.to_string()));
    }
    Ok(())
}

fn validate_experiences(experiences: &[Experience]) -> Result<(), PersonValidationError> {
    match experiences.iter().position(|exp| !exp.has_valid_range()) {
        Some(index) => Err(PersonValidationError::ExperienceDateOrder { index }),
        None => Ok(()),
    }
}
