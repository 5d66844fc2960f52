use chrono::{DateTime, Local};
use std::fmt;

/// Terminal status recorded for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Success,
    Error,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "success",
            LogStatus::Error => "error",
        }
    }
}

/// One line of the append-only API log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub endpoint: String,
    pub filename: String,
    pub status: LogStatus,
    pub error: Option<String>,
}

impl LogEntry {
    pub fn success(endpoint: impl Into<String>, filename: impl Into<String>) -> Self {
        LogEntry {
            timestamp: Local::now(),
            endpoint: endpoint.into(),
            filename: filename.into(),
            status: LogStatus::Success,
            error: None,
        }
    }

    pub fn error(
        endpoint: impl Into<String>,
        filename: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LogEntry {
            timestamp: Local::now(),
            endpoint: endpoint.into(),
            filename: filename.into(),
            status: LogStatus::Error,
            error: Some(message.into()),
        }
    }

    /// The full line including the trailing newline, ready for a single write.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

/// `[YYYY-MM-DD HH:MM:SS] <endpoint> - <filename> - <status>[ - ERROR: <message>]`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.endpoint,
            self.filename,
            self.status.as_str()
        )?;
        if let Some(message) = self.error.as_deref().filter(|m| !m.is_empty()) {
            write!(f, " - ERROR: {}", message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon(mut entry: LogEntry) -> LogEntry {
        entry.timestamp = Local.with_ymd_and_hms(2024, 5, 17, 12, 4, 9).unwrap();
        entry
    }

    #[test]
    fn success_line_has_no_error_suffix() {
        let entry = at_noon(LogEntry::success("/extract/payroll", "maj.pdf"));
        assert_eq!(
            entry.to_line(),
            "[2024-05-17 12:04:09] /extract/payroll - maj.pdf - success\n"
        );
    }

    #[test]
    fn error_line_carries_message() {
        let entry = at_noon(LogEntry::error(
            "/extract/sjuklista",
            "lista.txt",
            "File must be a CSV",
        ));
        assert_eq!(
            entry.to_string(),
            "[2024-05-17 12:04:09] /extract/sjuklista - lista.txt - error - ERROR: File must be a CSV"
        );
    }

    #[test]
    fn empty_error_message_is_omitted() {
        let entry = at_noon(LogEntry::error("/extract/payroll", "a.pdf", ""));
        assert!(entry.to_string().ends_with("- error"));
    }
}
