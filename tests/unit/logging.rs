//! Unit tests for log format selection

use toppicks::logging::LogFormat;

#[test]
fn test_environment_picks_format() {
    assert_eq!(LogFormat::resolve("production", None), LogFormat::Json);
    assert_eq!(LogFormat::resolve("prod", None), LogFormat::Json);
    assert_eq!(LogFormat::resolve("sandbox", None), LogFormat::Pretty);
    assert_eq!(LogFormat::resolve("", None), LogFormat::Pretty);
}

#[test]
fn test_override_wins() {
    assert_eq!(LogFormat::resolve("sandbox", Some("JSON")), LogFormat::Json);
    assert_eq!(LogFormat::resolve("production", Some("pretty")), LogFormat::Pretty);
    assert_eq!(LogFormat::resolve("production", Some("xml")), LogFormat::Json);
}
