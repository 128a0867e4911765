use crate::cdd::models::*;

use super::attributes::{ATTR_JOB_MEDIA_SHEETS_COMPLETED, ATTR_JOB_STATE};
use super::models::TagMapping;

/// Converts a CUPS job state (RFC 8011 `job-state`, 3..=9) into a state diff.
/// Codes outside that range leave the state at its zero value.
pub fn convert_job_state(cups_state: i32, pages: i32) -> PrintJobStateDiff {
    let state = match cups_state {
        // pending, pending-held, processing
        3..=5 => JobState { state_type: Some(JobStateType::InProgress), ..Default::default() },
        // processing-stopped
        6 => JobState {
            state_type: Some(JobStateType::Stopped),
            device_action_cause: Some(DeviceActionCause { error_code: DeviceActionCauseCode::Other }),
            ..Default::default()
        },
        // canceled
        7 => JobState {
            state_type: Some(JobStateType::Aborted),
            user_action_cause: Some(UserActionCause { action_code: UserActionCauseCode::Cancelled }),
            ..Default::default()
        },
        // aborted
        8 => JobState {
            state_type: Some(JobStateType::Aborted),
            device_action_cause: Some(DeviceActionCause { error_code: DeviceActionCauseCode::PrintFailure }),
            ..Default::default()
        },
        // completed
        9 => JobState { state_type: Some(JobStateType::Done), ..Default::default() },
        _ => JobState::default(),
    };

    PrintJobStateDiff { state, pages_printed: pages }
}

/// Reads `job-state` and `job-media-sheets-completed` from decoded job tags.
/// Absent or unparsable values count as 0.
pub fn tags_to_job_state(job_tags: &TagMapping) -> PrintJobStateDiff {
    let integer = |key: &str| {
        job_tags
            .get(key)
            .and_then(|v| v.first())
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(0)
    };

    convert_job_state(integer(ATTR_JOB_STATE), integer(ATTR_JOB_MEDIA_SHEETS_COMPLETED))
}
