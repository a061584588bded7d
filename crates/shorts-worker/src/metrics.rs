//! Job pipeline metrics.

use metrics::{counter, histogram};

pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "shorts_jobs_submitted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "shorts_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "shorts_jobs_failed_total";
    pub const JOB_DURATION_SECONDS: &str = "shorts_job_duration_seconds";
    pub const SEGMENTS_RENDERED_TOTAL: &str = "shorts_segments_rendered_total";
}

pub fn record_job_submitted() {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
}

pub fn record_job_completed(duration_secs: f64) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, "status" => "completed").record(duration_secs);
}

pub fn record_job_failed(reason: &'static str, duration_secs: f64) {
    counter!(names::JOBS_FAILED_TOTAL, "reason" => reason).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, "status" => "failed").record(duration_secs);
}

pub fn record_segment_rendered() {
    counter!(names::SEGMENTS_RENDERED_TOTAL).increment(1);
}
