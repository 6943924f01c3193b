use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of an application. Transitions are governed by
/// `applications::status`; repositories reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Evaluated,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Evaluated => "evaluated",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(ApplicationStatus::Pending),
            "evaluated" => Some(ApplicationStatus::Evaluated),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse rank bucket assigned by the external evaluator. `Pending` is the
/// placeholder until the first evaluation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierLetter {
    A,
    B,
    C,
    F,
    #[serde(rename = "pending")]
    Pending,
}

impl TierLetter {
    pub const fn as_str(self) -> &'static str {
        match self {
            TierLetter::A => "A",
            TierLetter::B => "B",
            TierLetter::C => "C",
            TierLetter::F => "F",
            TierLetter::Pending => "pending",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "A" => Some(TierLetter::A),
            "B" => Some(TierLetter::B),
            "C" => Some(TierLetter::C),
            "F" => Some(TierLetter::F),
            "pending" => Some(TierLetter::Pending),
            _ => None,
        }
    }
}

/// Tier as produced by the evaluator. The core stores and returns it
/// verbatim; it never derives these fields itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub letter: TierLetter,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i16>,
}

impl Tier {
    /// Placeholder seeded at creation, before any evaluation exists.
    pub fn placeholder() -> Self {
        Tier {
            letter: TierLetter::Pending,
            code: "Processing...".to_string(),
            level: None,
        }
    }
}

/// Score block. Always present as a full structure; zero-filled until the
/// evaluator writes real values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub overall_score: i16,
    pub content_score: i16,
    pub design_score: i16,
    pub projects_score: i16,
    pub reasoning_summary: String,
}

impl Scores {
    pub fn unevaluated() -> Self {
        Scores {
            overall_score: 0,
            content_score: 0,
            design_score: 0,
            projects_score: 0,
            reasoning_summary: "Evaluation in progress".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PersonalInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateLinks {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
}

/// Reference to resume bytes owned by the blob store. Immutable once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRef {
    pub file_id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub upload_date: DateTime<Utc>,
}

/// The central entity: one candidate's submission to one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub personal_info: PersonalInfo,
    pub resume: Option<ResumeRef>,
    pub links: CandidateLinks,
    pub status: ApplicationStatus,
    pub tier: Tier,
    pub scores: Scores,
    /// Owned entirely by the external evaluator; persisted, never parsed.
    pub evaluator_payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_evaluated_at: Option<DateTime<Utc>>,
}

/// Input for `ApplicationRepository::create`. Id, status, tier, scores, and
/// timestamps are assigned by the repository.
#[derive(Debug, Clone)]
pub struct ApplicationDraft {
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub personal_info: PersonalInfo,
    pub links: CandidateLinks,
    pub resume: Option<ResumeRef>,
}

/// Evaluator callback payload for `ApplicationRepository::update_evaluation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationUpdate {
    pub scores: Scores,
    pub tier: Tier,
    #[serde(default = "empty_payload")]
    pub evaluator_payload: Value,
}

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Flat row shape backing the `applications` table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub company_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub resume_file_id: Option<Uuid>,
    pub resume_filename: Option<String>,
    pub resume_content_type: Option<String>,
    pub resume_upload_date: Option<DateTime<Utc>>,
    pub status: String,
    pub tier_letter: String,
    pub tier_code: String,
    pub tier_level: Option<i16>,
    pub overall_score: i16,
    pub content_score: i16,
    pub design_score: i16,
    pub projects_score: i16,
    pub reasoning_summary: String,
    pub evaluator_payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_evaluated_at: Option<DateTime<Utc>>,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        let resume = match (
            row.resume_file_id,
            row.resume_filename,
            row.resume_content_type,
            row.resume_upload_date,
        ) {
            (Some(file_id), Some(filename), Some(content_type), Some(upload_date)) => {
                Some(ResumeRef {
                    file_id,
                    filename,
                    content_type,
                    upload_date,
                })
            }
            _ => None,
        };

        Application {
            id: row.id,
            job_id: row.job_id,
            company_id: row.company_id,
            personal_info: PersonalInfo {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
            },
            resume,
            links: CandidateLinks {
                linkedin: row.linkedin,
                github: row.github,
                portfolio: row.portfolio,
            },
            status: ApplicationStatus::parse(&row.status).unwrap_or(ApplicationStatus::Pending),
            tier: Tier {
                letter: TierLetter::parse(&row.tier_letter).unwrap_or(TierLetter::Pending),
                code: row.tier_code,
                level: row.tier_level,
            },
            scores: Scores {
                overall_score: row.overall_score,
                content_score: row.content_score,
                design_score: row.design_score,
                projects_score: row.projects_score,
                reasoning_summary: row.reasoning_summary,
            },
            evaluator_payload: row.evaluator_payload,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_evaluated_at: row.last_evaluated_at,
        }
    }
}
