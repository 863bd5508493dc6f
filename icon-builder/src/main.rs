use icon_builder::config::{DESTINATION_PATH, SOURCE_PATH};

fn main() {
    icon_builder::logging::init();

    tracing::info!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    // Every branch has already been reported by the builder
    let _ = icon_builder::build_icon(SOURCE_PATH, DESTINATION_PATH);
}
