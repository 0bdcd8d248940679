mod app;

fn init_logging() {
    // Initialize tracing with configurable filtering
    tracing_subscriber::fmt()
        .with_env_filter(
            // Default to info level, but allow override via RUST_LOG
            // Example: RUST_LOG=artforge_core::client=debug
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artforge_core=info,artforge_gui=info".into()),
        )
        .init();

    log::debug!("logging initialized");
}

fn main() -> iced::Result {
    init_logging();

    iced::application("Art Forge", app::update, app::view).run_with(app::initialize)
}
