mod ui;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use ui::settings::SettingsPaths;

fn main() {
    init_tracing();

    let paths = SettingsPaths::from_env();
    info!(
        "[settings] repo defaults {:?}, overrides {:?}",
        paths.repo_defaults, paths.overrides
    );

    if let Err(err) = ui::run(ui::UiConfig::new(paths)) {
        error!("[ui] failed to start: {err:?}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
