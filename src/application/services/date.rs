//! Formatted-time result list
//!
//! Renders the current time as the title of a single, non-actionable item.

use std::fmt::Write;
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset};
use tracing::{debug, instrument};

use crate::application::schema::{ItemAttrs, ResultSchema};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::XmlNode;
use crate::infrastructure::traits::UidGenerator;

/// Service producing the time-of-day result list.
pub struct DateService {
    uid: Arc<dyn UidGenerator>,
}

impl DateService {
    pub fn new(uid: Arc<dyn UidGenerator>) -> Self {
        Self { uid }
    }

    /// Format `now` with a strftime-style pattern.
    pub fn format_time(format: &str, now: &DateTime<FixedOffset>) -> ApplicationResult<String> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(ApplicationError::Config {
                message: format!("invalid time format: {format:?}"),
            });
        }
        let mut out = String::new();
        write!(out, "{}", now.format(format)).map_err(|_| ApplicationError::Config {
            message: format!("time format not applicable: {format:?}"),
        })?;
        Ok(out)
    }

    /// Result list with one invalid item titled with the formatted time.
    #[instrument(skip(self))]
    pub fn render(&self, format: &str, now: &DateTime<FixedOffset>) -> ApplicationResult<XmlNode> {
        let title = Self::format_time(format, now)?;
        debug!("render: title={}", title);

        let schema = ResultSchema::new(Arc::clone(&self.uid))?;
        let mut item = schema.item(&ItemAttrs {
            valid: Some(false),
            ..Default::default()
        })?;
        item.append(schema.title(&title)?)?;

        let mut items = schema.items()?;
        items.append(item)?;
        Ok(items.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap()
    }

    #[test]
    fn test_format_time() {
        assert_eq!(
            DateService::format_time("%Y-%m-%d %H:%M:%S", &fixed_time()).unwrap(),
            "2024-03-09 14:05:07"
        );
        assert_eq!(
            DateService::format_time("%H:%M %z", &fixed_time()).unwrap(),
            "14:05 +0100"
        );
    }

    #[test]
    fn test_format_time_rejects_invalid_pattern() {
        let err = DateService::format_time("%Q", &fixed_time()).unwrap_err();
        assert!(matches!(err, ApplicationError::Config { .. }));
    }
}
