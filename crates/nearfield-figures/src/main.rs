use anyhow::Context;
use log::info;

use nearfield_figures::{run, Settings};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::from_env().context("invalid NEARFIELD_* environment")?;
    info!("writing figures to {}", settings.output_dir.display());

    for path in run(&settings)? {
        info!("{}", path.display());
    }
    Ok(())
}
