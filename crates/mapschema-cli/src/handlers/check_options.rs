//! Options checking command handler

use super::utils;
use crate::cli::CheckOptionsArgs;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use mapschema_core::Options;
use tracing::{info, instrument, warn};

/// Handle the check-options command
#[instrument(skip(args, output), fields(file = %args.options.display()))]
pub fn handle_check_options(args: CheckOptionsArgs, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("check_options_command", &format!("file: {}", args.options.display()));
    utils::ensure_exists(&args.options)?;
    output.info(&format!("Checking options: {}", args.options.display()))?;

    match Options::from_file(&args.options) {
        Ok(options) => {
            info!("Options are valid");
            output.success("✓ Options are valid")?;

            if args.show {
                output.section("Normalized Options")?;
                output.data(&options)?;
            }
            Ok(())
        }
        Err(mapschema_core::Error::InvalidConfiguration { violations }) => {
            warn!(count = violations.len(), "Options rejected");
            output.error("✗ Options validation failed")?;
            output.violations(&violations)?;

            Err(Error::OptionsRejected {
                count: violations.len(),
            })
        }
        Err(other) => Err(other.into()),
    }
}
