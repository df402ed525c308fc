use std::{env, path::PathBuf};

use anyhow::Context;
use troupe::{config::ViewerConfig, TroupeApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config_path = env::args_os().nth(1).map(PathBuf::from);
    let config = match config_path.as_deref() {
        Some(path) => ViewerConfig::load_from_path(path),
        None => ViewerConfig::default(),
    };

    let base_dir = config_path.as_deref().and_then(|path| path.parent());
    let roster = config
        .load_roster(base_dir)
        .context("failed to load persona roster")?;

    let mut app = TroupeApp::new(config)?;
    app.populate(&roster);
    app.run()
}
