use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::info;

pub const TIMING_TARGET: &str = "studio.timing";

#[derive(Debug)]
pub struct ActionTimer {
    action: String,
    subject: Option<String>,
    started_at: DateTime<Utc>,
    started_perf: Instant,
    status: String,
    detail: Option<String>,
    completed: bool,
}

impl ActionTimer {
    pub fn new(action: &str, subject: Option<String>) -> Self {
        ActionTimer {
            action: action.to_string(),
            subject,
            started_at: Utc::now(),
            started_perf: Instant::now(),
            status: "success".to_string(),
            detail: None,
            completed: false,
        }
    }

    pub fn log_received(&self) {
        info!(
            target: TIMING_TARGET,
            "event=action_received action={} subject={:?} received_at={}",
            self.action,
            self.subject,
            self.started_at.to_rfc3339()
        );
    }

    pub fn mark_status(&mut self, status: &str, detail: Option<String>) {
        self.status = status.to_string();
        self.detail = detail;
    }

    pub fn log_completed(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        let completed_at = Utc::now();
        let duration = self.started_perf.elapsed().as_secs_f64();
        info!(
            target: TIMING_TARGET,
            "event=action_completed action={} subject={:?} started_at={} completed_at={} duration_s={:.3} status={} detail={}",
            self.action,
            self.subject,
            self.started_at.to_rfc3339(),
            completed_at.to_rfc3339(),
            duration,
            self.status,
            self.detail.clone().unwrap_or_default()
        );
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

pub fn start_action_timer(action: &str, subject: Option<String>) -> ActionTimer {
    let timer = ActionTimer::new(action, subject);
    timer.log_received();
    timer
}

pub fn complete_action_timer(timer: &mut ActionTimer, status: &str, detail: Option<String>) {
    timer.mark_status(status, detail);
    timer.log_completed();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_recorded_once() {
        let mut timer = start_action_timer("copy", None);
        complete_action_timer(&mut timer, "error", Some("boom".to_string()));
        assert_eq!(timer.status(), "error");
        assert!(timer.completed);
        timer.log_completed();
        assert!(timer.completed);
    }
}
