use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;
use crate::io::local_store::LocalStore;
use crate::io::StateStore;
use crate::model::config::Backend;
use crate::model::state::AppState;

const CONFIG_TOML_TEMPLATE: &str = r##"# TaskHive configuration

[store]
# Where your tabs and tasks live:
#   "local"  - a JSON file in this directory
#   "remote" - a TaskHive server (see [remote], then run: th login)
backend = "local"

[remote]
# Base URL of the TaskHive server (remote backend only)
base_url = "http://localhost:5000"

# --- UI Customization ---
# Uncomment and edit to override defaults.
#
# [ui]
# show_key_hints = false
#
# [ui.colors]
# background = "#14100A"
# text = "#D8CBA8"
# text_bright = "#FFFFFF"
# highlight = "#FFB300"
# dim = "#857B5E"
# green = "#9CCC65"
# red = "#EF5350"
"##;

pub fn cmd_init(args: InitArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_io::config_path(data_dir);
    if config_path.exists() && !args.force {
        return Err(format!(
            "taskhive is already initialized at {} (use --force to overwrite the config)",
            data_dir.display()
        )
        .into());
    }

    fs::create_dir_all(data_dir)?;
    fs::write(&config_path, CONFIG_TOML_TEMPLATE)?;

    // Seed the state file so the first `th list` has something to load
    let mut store = LocalStore::new(data_dir);
    if !store.state_path().exists() {
        store.commit(&AppState::default())?;
    }

    let config = config_io::read_config(data_dir)?;
    println!("Initialized taskhive in {}", data_dir.display());
    println!("  backend: {}", config.store.backend.as_str());
    if config.store.backend == Backend::Remote {
        println!("  server:  {}", config.remote.base_url);
    }
    Ok(())
}
