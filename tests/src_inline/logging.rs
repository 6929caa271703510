use super::*;

#[test]
fn test_default_level() {
    assert_eq!(default_level(false, false), "info");
    assert_eq!(default_level(true, false), "debug");
    assert_eq!(default_level(false, true), "error");
    assert_eq!(default_level(true, true), "error");
}

#[test]
fn test_init_twice_is_harmless() {
    init_logging(false, true);
    init_logging(true, false);
    tracing::info!("still alive");
}
