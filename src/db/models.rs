use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A registered account. Deliberately not `Serialize`: the stored password
/// hash must never reach a response body. [`UserView`] is the outward shape.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: String,
        password_hash: String,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            first_name,
            last_name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Serializable view of a user. Has no field for the password hash, so it
/// cannot leak it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Profile fields a user may change about themselves. Password is not
/// updatable through this path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "SAVED")]
    Saved,
    #[serde(rename = "APPLIED")]
    Applied,
    #[serde(rename = "SCREENING")]
    Screening,
    #[serde(rename = "INTERVIEW")]
    Interview,
    #[serde(rename = "OFFER")]
    Offer,
    #[serde(rename = "ACCEPTED")]
    Accepted,
    #[serde(rename = "REJECTED")]
    Rejected,
    #[serde(rename = "WITHDRAWN")]
    Withdrawn,
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Applied
    }
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Saved,
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "SAVED",
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Screening => "SCREENING",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Offer => "OFFER",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SAVED" => Ok(ApplicationStatus::Saved),
            "APPLIED" => Ok(ApplicationStatus::Applied),
            "SCREENING" => Ok(ApplicationStatus::Screening),
            "INTERVIEW" => Ok(ApplicationStatus::Interview),
            "OFFER" => Ok(ApplicationStatus::Offer),
            "ACCEPTED" => Ok(ApplicationStatus::Accepted),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            "WITHDRAWN" => Ok(ApplicationStatus::Withdrawn),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

/// A job application, owned by exactly one user. Contacts, interviews and
/// documents live and die with it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub status: ApplicationStatus,
    pub application_date: DateTime<Utc>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub contacts: Vec<Contact>,
    pub interviews: Vec<Interview>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub application_id: Uuid,
    pub name: String,
    pub role: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub application_id: Uuid,
    pub interview_type: String,
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub application_id: Uuid,
    pub name: String,
    pub document_type: Option<String>,
}

/// Payload for creating an application. Company and position are required;
/// everything else falls back to a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub status: Option<String>,
    pub application_date: Option<DateTime<Utc>>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

/// Partial update: absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdate {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub status: Option<String>,
    pub application_date: Option<DateTime<Utc>>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

/// Validated form of [`ApplicationUpdate`] handed to the store: status parsed,
/// required strings trimmed.
#[derive(Debug, Clone, Default)]
pub struct ApplicationChanges {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub application_date: Option<DateTime<Utc>>,
    pub salary: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

/// List filters: exact status, case-insensitive substring on company and
/// position.
#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub company: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: u64,
    pub by_status: HashMap<ApplicationStatus, u64>,
}
