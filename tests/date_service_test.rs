//! Tests for the formatted-time result list

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone};
use rstest::rstest;

use wfxml::application::services::DateService;
use wfxml::application::ApplicationError;
use wfxml::infrastructure::traits::UidGenerator;
use wfxml::util::testing::init_test_setup;

struct FixedUid;

impl UidGenerator for FixedUid {
    fn generate(&self) -> String {
        "fixed".to_string()
    }
}

fn noon() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(9 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 12, 31, 12, 0, 30)
        .unwrap()
}

#[rstest]
#[case("%Y-%m-%d %H:%M:%S", "2024-12-31 12:00:30")]
#[case("%Y", "2024")]
#[case("%d.%m. %z", "31.12. +0900")]
#[case("no placeholders", "no placeholders")]
fn given_format_when_rendering_then_title_is_formatted_time(
    #[case] format: &str,
    #[case] title: &str,
) {
    init_test_setup();
    let service = DateService::new(Arc::new(FixedUid));

    let xml = service.render(format, &noon()).unwrap().to_xml_string().unwrap();

    assert_eq!(
        xml,
        format!(r#"<items><item uid="fixed" valid="no"><title>{title}</title></item></items>"#)
    );
}

#[test]
fn given_unknown_specifier_when_rendering_then_config_error() {
    init_test_setup();
    let service = DateService::new(Arc::new(FixedUid));

    let err = service.render("%Y %Q", &noon()).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}
