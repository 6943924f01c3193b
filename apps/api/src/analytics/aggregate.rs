//! Read-side aggregation over application records. Pure functions: the
//! handlers fetch from the repositories and hand the rows here, so the
//! dashboard can poll at will without any write-side coupling.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationStatus, TierLetter};
use crate::models::job::Job;

/// One candidate inside a tier bucket.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub id: Uuid,
    pub name: String,
    pub tier: String,
    pub score: i16,
    pub status: ApplicationStatus,
    pub resume_name: Option<String>,
    pub date: DateTime<Utc>,
}

/// Applications for one job partitioned by tier letter. Every application
/// lands in exactly one bucket; `pending` tiers go to `tier_pending`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobTierBuckets {
    pub job_id: String,
    pub tier_a: Vec<CandidateSummary>,
    pub tier_b: Vec<CandidateSummary>,
    pub tier_c: Vec<CandidateSummary>,
    pub tier_f: Vec<CandidateSummary>,
    pub tier_pending: Vec<CandidateSummary>,
}

pub fn partition_by_tier(public_form_id: &str, applications: &[Application]) -> JobTierBuckets {
    let mut sorted: Vec<&Application> = applications.iter().collect();
    sorted.sort_by(|a, b| b.scores.overall_score.cmp(&a.scores.overall_score));

    let mut buckets = JobTierBuckets {
        job_id: public_form_id.to_string(),
        ..JobTierBuckets::default()
    };

    for app in sorted {
        let summary = CandidateSummary {
            id: app.id,
            name: app.personal_info.full_name(),
            tier: app.tier.code.clone(),
            score: app.scores.overall_score,
            status: app.status,
            resume_name: app.resume.as_ref().map(|r| r.filename.clone()),
            date: app.created_at,
        };

        let bucket = match app.tier.letter {
            TierLetter::A => &mut buckets.tier_a,
            TierLetter::B => &mut buckets.tier_b,
            TierLetter::C => &mut buckets.tier_c,
            TierLetter::F => &mut buckets.tier_f,
            TierLetter::Pending => &mut buckets.tier_pending,
        };
        bucket.push(summary);
    }

    buckets
}

/// Entry in the rollup's selected/rejected lists.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionSummary {
    pub id: Uuid,
    pub job_id: Uuid,
    pub tier: String,
    pub score: i16,
    pub date: Option<DateTime<Utc>>,
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStats {
    pub job_id: Uuid,
    pub total: usize,
    pub selected: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyStats {
    pub jobs_posted: usize,
    pub applications_received: usize,
    pub applications_selected: usize,
    pub applications_rejected: usize,
    pub selected_list: Vec<DecisionSummary>,
    pub rejected_list: Vec<DecisionSummary>,
    pub job_stats: Vec<JobStats>,
}

const DECISION_LIST_LIMIT: usize = 10;

/// Rolls up one company's applications. Selection is counted by status
/// alone: `accepted` -> selected, `rejected` -> rejected. Applications whose
/// job has since been deleted still count; `jobs_posted` counts live jobs.
pub fn company_rollup(jobs: &[Job], applications: &[Application]) -> CompanyStats {
    let selected: Vec<&Application> = applications
        .iter()
        .filter(|a| a.status == ApplicationStatus::Accepted)
        .collect();
    let rejected: Vec<&Application> = applications
        .iter()
        .filter(|a| a.status == ApplicationStatus::Rejected)
        .collect();

    let mut per_job: HashMap<Uuid, JobStats> = HashMap::new();
    for app in applications {
        let stats = per_job.entry(app.job_id).or_insert_with(|| JobStats {
            job_id: app.job_id,
            total: 0,
            selected: 0,
            rejected: 0,
        });
        stats.total += 1;
        match app.status {
            ApplicationStatus::Accepted => stats.selected += 1,
            ApplicationStatus::Rejected => stats.rejected += 1,
            _ => {}
        }
    }
    let mut job_stats: Vec<JobStats> = per_job.into_values().collect();
    job_stats.sort_by(|a, b| b.total.cmp(&a.total).then(a.job_id.cmp(&b.job_id)));

    CompanyStats {
        jobs_posted: jobs.len(),
        applications_received: applications.len(),
        applications_selected: selected.len(),
        applications_rejected: rejected.len(),
        selected_list: decision_list(&selected),
        rejected_list: decision_list(&rejected),
        job_stats,
    }
}

/// Most recently evaluated first, capped for dashboard display.
fn decision_list(applications: &[&Application]) -> Vec<DecisionSummary> {
    let mut sorted = applications.to_vec();
    sorted.sort_by(|a, b| b.last_evaluated_at.cmp(&a.last_evaluated_at));

    sorted
        .into_iter()
        .take(DECISION_LIST_LIMIT)
        .map(|app| DecisionSummary {
            id: app.id,
            job_id: app.job_id,
            tier: app.tier.code.clone(),
            score: app.scores.overall_score,
            date: app.last_evaluated_at,
            status: app.status,
        })
        .collect()
}
