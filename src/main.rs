//! Starsets: planet skies from block data. Runs the planet_sky viewer.

use std::process::ExitCode;

use planet_sky::sdk::SkyViewerBuilder;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    match SkyViewerBuilder::from_env().build() {
        Ok(mut app) => {
            app.run();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("starsets: {err}");
            ExitCode::FAILURE
        }
    }
}
