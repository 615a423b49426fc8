#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

/// Result of notifying a single recipient.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    pub email: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationOutcome {
    pub fn success(member_id: Option<String>, email: String) -> NotificationOutcome {
        NotificationOutcome {
            member_id,
            email,
            status: OutcomeStatus::Success,
            error: None,
        }
    }

    pub fn error(member_id: Option<String>, email: String, error: String) -> NotificationOutcome {
        NotificationOutcome {
            member_id,
            email,
            status: OutcomeStatus::Error,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success)
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub ran_count: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub details: Vec<NotificationOutcome>,
}

impl From<Vec<NotificationOutcome>> for SweepSummary {
    fn from(details: Vec<NotificationOutcome>) -> Self {
        let success_count = details.iter().filter(|outcome| outcome.is_success()).count();

        SweepSummary {
            ran_count: details.len(),
            success_count,
            error_count: details.len() - success_count,
            details,
        }
    }
}
