use std::fmt::Write as _;
use std::time::Duration;

use anyhow::anyhow;
use serde_json::{Value, json};
use tracing::{error, warn};

use crate::config::Config;
use crate::model::timesheet::Timesheet;

const AUDIT_UNAVAILABLE: &str = "AI Audit Unavailable: Missing API Key.";
const AUDIT_FAILED: &str = "Error performing AI audit.";

/// Best-effort boundary to the Gemini `generateContent` endpoint. Every
/// failure mode (missing key, request error, bad payload, timeout) degrades
/// to a fixed fallback; callers never see an error.
#[derive(Clone)]
pub struct DraftingService {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
    timeout: Duration,
}

impl DraftingService {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            endpoint: config.gemini_endpoint.clone(),
            timeout: Duration::from_secs(config.drafting_timeout_secs),
        }
    }

    /// Reviews a timesheet for anomalies. Fallbacks: a literal
    /// "unavailable"/"error" message, never an `Err`.
    pub async fn audit(&self, timesheet: &Timesheet) -> String {
        let Some(api_key) = self.api_key.clone() else {
            return AUDIT_UNAVAILABLE.to_string();
        };

        match tokio::time::timeout(self.timeout, self.generate(&api_key, audit_prompt(timesheet)))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                error!(error = %e, timesheet_id = %timesheet.id, "AI audit request failed");
                AUDIT_FAILED.to_string()
            }
            Err(_) => {
                warn!(timesheet_id = %timesheet.id, "AI audit timed out");
                AUDIT_FAILED.to_string()
            }
        }
    }

    /// Polishes a manager's raw rejection note. Fallback: the raw text
    /// unchanged.
    pub async fn draft_rejection(&self, timesheet: &Timesheet, raw_reason: &str) -> String {
        let Some(api_key) = self.api_key.clone() else {
            return raw_reason.to_string();
        };

        match tokio::time::timeout(
            self.timeout,
            self.generate(&api_key, rejection_prompt(timesheet, raw_reason)),
        )
        .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                error!(error = %e, timesheet_id = %timesheet.id, "Rejection draft request failed");
                raw_reason.to_string()
            }
            Err(_) => {
                warn!(timesheet_id = %timesheet.id, "Rejection draft timed out");
                raw_reason.to_string()
            }
        }
    }

    async fn generate(&self, api_key: &str, prompt: String) -> anyhow::Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let payload: Value = response.json().await?;
        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("response contained no generated text"))
    }
}

fn timesheet_context(timesheet: &Timesheet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Employee: {}", timesheet.employee_name);
    let _ = writeln!(
        out,
        "Period: {} to {}",
        timesheet.period_start, timesheet.period_end
    );
    let _ = writeln!(out, "Entries:");
    for entry in &timesheet.entries {
        let _ = writeln!(
            out,
            "- Date: {}, Type: {}, Hours: {}",
            entry.date, entry.entry_type, entry.hours
        );
    }
    out
}

fn audit_prompt(timesheet: &Timesheet) -> String {
    format!(
        "Act as a strict HR Timesheet Auditor. Review the following timesheet for anomalies.\n\
         \n\
         Rules:\n\
         1. Employees should generally not work more than 7 consecutive days.\n\
         2. 'Shift Allowance' should typically be accompanied by 'Regular' hours on the same day; flag if it looks odd (e.g. 8 hours of just allowance).\n\
         3. Check for any single day with > 12 hours.\n\
         4. Provide a brief, bulleted summary of the hours breakdown by type.\n\
         \n\
         Timesheet Data:\n\
         {}\n\
         Output Format:\n\
         **Summary**: [Brief breakdown]\n\
         **Flags**: [List of potential issues or \"None detected\"]\n\
         **Recommendation**: [Approve / Request Clarification]",
        timesheet_context(timesheet)
    )
}

fn rejection_prompt(timesheet: &Timesheet, raw_reason: &str) -> String {
    format!(
        "Draft a professional and polite rejection comment for a timesheet.\n\
         \n\
         Context:\n\
         Employee: {}\n\
         Manager's Raw Reason: \"{}\"\n\
         \n\
         The tone should be constructive. Keep it under 2 sentences.",
        timesheet.employee_name, raw_reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timesheet::TimesheetStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn service(api_key: Option<&str>) -> DraftingService {
        DraftingService {
            client: reqwest::Client::new(),
            api_key: api_key.map(str::to_string),
            model: "gemini-2.5-flash".to_string(),
            // nothing listens here; a configured key must still fall back
            endpoint: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(2),
        }
    }

    fn sheet() -> Timesheet {
        Timesheet {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            employee_name: "Alice Employee".to_string(),
            period_start: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 1, 11).unwrap(),
            status: TimesheetStatus::Submitted,
            entries: Vec::new(),
            rejection_reason: None,
        }
    }

    #[actix_web::test]
    async fn audit_without_key_reports_unavailable() {
        assert_eq!(service(None).audit(&sheet()).await, AUDIT_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn audit_request_failure_reports_error_message() {
        assert_eq!(service(Some("key")).audit(&sheet()).await, AUDIT_FAILED);
    }

    #[actix_web::test]
    async fn rejection_draft_falls_back_to_the_raw_reason() {
        let raw = "too many hours on Friday";
        assert_eq!(service(None).draft_rejection(&sheet(), raw).await, raw);
        assert_eq!(service(Some("key")).draft_rejection(&sheet(), raw).await, raw);
    }

    #[test]
    fn prompts_carry_the_timesheet_context() {
        let prompt = audit_prompt(&sheet());
        assert!(prompt.contains("Alice Employee"));
        assert!(prompt.contains("2026-01-05 to 2026-01-11"));

        let rejection = rejection_prompt(&sheet(), "sloppy entries");
        assert!(rejection.contains("\"sloppy entries\""));
    }
}
