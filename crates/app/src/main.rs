//! `layoutgen`: builds a small layout headlessly and prints it.

mod demo;
mod settings;
mod streamer;

use std::process::ExitCode;

use bevy::log::LogPlugin;

use layout::validators::ValidatorRegistry;

use crate::settings::DemoSettings;

fn main() -> ExitCode {
    let settings = match DemoSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("layoutgen: {e}");
            return ExitCode::FAILURE;
        }
    };
    let catalog = match settings.load_catalog(&ValidatorRegistry::default()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("layoutgen: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut app = demo::build_app_with(&settings, catalog, |app| {
        app.add_plugins(LogPlugin::default());
    });
    let report = demo::run_demo(&mut app, &settings);
    print!("{report}");

    if report.fully_connected && report.open_connections.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
