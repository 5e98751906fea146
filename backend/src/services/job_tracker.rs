//! Job tracking for background simulations.
//!
//! A simple in-memory tracker that stores progress logs for background
//! tasks and supports cancelling an in-flight simulation through its
//! registered abort handle.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Job status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

/// Job metadata and logs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Result of the job (e.g. run_id if successful)
    pub result: Option<serde_json::Value>,
}

/// In-memory job tracker.
#[derive(Clone)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
    handles: Arc<RwLock<HashMap<String, tokio::task::AbortHandle>>>,
}

impl JobTracker {
    /// Create a new job tracker.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            handles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new job and return its ID.
    pub fn create_job(&self) -> String {
        let job_id = Uuid::new_v4().to_string();
        let job = Job {
            job_id: job_id.clone(),
            status: JobStatus::Running,
            logs: vec![],
            created_at: chrono::Utc::now(),
            completed_at: None,
            result: None,
        };
        self.jobs.write().insert(job_id.clone(), job);
        job_id
    }

    /// Register the abort handle of the task driving a job so the job can
    /// be cancelled. Handles for already-finished jobs are dropped.
    pub fn register_handle(&self, job_id: &str, handle: tokio::task::AbortHandle) {
        let running = self
            .jobs
            .read()
            .get(job_id)
            .map(|job| job.status == JobStatus::Running)
            .unwrap_or(false);
        if running {
            self.handles.write().insert(job_id.to_string(), handle);
        }
    }

    /// Add a log entry to a job.
    pub fn log(&self, job_id: &str, level: LogLevel, message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Mark a job as completed with optional result.
    pub fn complete_job(&self, job_id: &str, result: Option<serde_json::Value>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            if job.status == JobStatus::Running {
                job.status = JobStatus::Completed;
                job.completed_at = Some(chrono::Utc::now());
                job.result = result;
            }
        }
        self.handles.write().remove(job_id);
    }

    /// Mark a job as failed.
    pub fn fail_job(&self, job_id: &str, error_message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            if job.status == JobStatus::Running {
                job.status = JobStatus::Failed;
                job.completed_at = Some(chrono::Utc::now());
                job.logs.push(LogEntry {
                    timestamp: chrono::Utc::now(),
                    level: LogLevel::Error,
                    message: error_message.into(),
                });
            }
        }
        self.handles.write().remove(job_id);
    }

    /// Cancel a running job: abort its task and mark it cancelled. Returns
    /// false when the job does not exist or already finished.
    pub fn cancel_job(&self, job_id: &str) -> bool {
        let handle = self.handles.write().remove(job_id);
        let mut jobs = self.jobs.write();
        let Some(job) = jobs.get_mut(job_id) else {
            return false;
        };
        if job.status != JobStatus::Running {
            return false;
        }
        if let Some(handle) = handle {
            handle.abort();
        }
        job.status = JobStatus::Cancelled;
        job.completed_at = Some(chrono::Utc::now());
        job.logs.push(LogEntry {
            timestamp: chrono::Utc::now(),
            level: LogLevel::Warning,
            message: "Job cancelled by user".to_string(),
        });
        true
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Get all logs for a job.
    pub fn get_logs(&self, job_id: &str) -> Vec<LogEntry> {
        self.jobs
            .read()
            .get(job_id)
            .map(|job| job.logs.clone())
            .unwrap_or_default()
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_log() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        tracker.log(&job_id, LogLevel::Info, "step one");
        tracker.log(&job_id, LogLevel::Success, "step two");

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.logs.len(), 2);
    }

    #[test]
    fn test_complete_job_sets_result() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        tracker.complete_job(&job_id, Some(serde_json::json!({ "run_id": 1 })));

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert_eq!(job.result.unwrap()["run_id"], 1);
    }

    #[test]
    fn test_fail_job_appends_error_log() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        tracker.fail_job(&job_id, "engine offline");

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.logs.last().unwrap().message.contains("engine offline"));
    }

    #[tokio::test]
    async fn test_cancel_running_job_aborts_task() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();

        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        tracker.register_handle(&job_id, handle.abort_handle());

        assert!(tracker.cancel_job(&job_id));
        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Cancelled);
        assert!(handle.await.unwrap_err().is_cancelled());
    }

    #[test]
    fn test_cancel_finished_job_is_noop() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job();
        tracker.complete_job(&job_id, None);

        assert!(!tracker.cancel_job(&job_id));
        assert_eq!(tracker.get_job(&job_id).unwrap().status, JobStatus::Completed);
    }

    #[test]
    fn test_cancel_unknown_job_is_noop() {
        let tracker = JobTracker::new();
        assert!(!tracker.cancel_job("no-such-job"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }
}
