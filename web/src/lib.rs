use clap::Parser;
use wasm_bindgen::prelude::*;

pub use game::{Game, KaboomGame};
pub use storage::LocalStore;

mod game;
mod storage;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

#[wasm_bindgen(start)]
pub fn run_app() -> Result<(), JsError> {
    use gloo::utils::window;

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window().location().hash().unwrap_or_default();

    let args = Args::try_parse_from(location_hash.split(['#', '&']))?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).map_err(|err| JsError::new(&err.to_string()))?;
    }

    if let Some(seed) = args.seed {
        log::debug!("seed: {}", seed);
        utils::force_seed(seed);
    }

    log::debug!("App started");
    Ok(())
}
