use prism_engine::Engine;

/// Route engine logs to the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("prism=debug")
        .try_init();
}

pub fn engine() -> Engine {
    init_tracing();
    Engine::new().unwrap()
}
