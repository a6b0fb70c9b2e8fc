/// Initialises a logger for tests, the output is captured by the test harness.
pub fn test_logger() {
    if cfg!(not(feature = "canon_miri")) {
        // Tests run in parallel, so the logger may already be initialised.
        let _ = env_logger::builder().is_test(true).try_init();
    }
}
