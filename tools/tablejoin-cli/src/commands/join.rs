//! The `join` command.

use anyhow::{bail, Context, Result};
use tablejoin::TracingObserver;

use crate::config::{Config, MalformedMode};
use crate::JoinArgs;

/// Runs a join described by the config file and flags.
pub fn run(args: &JoinArgs) -> Result<()> {
    let config = resolve(args)?;
    let plan = config.plan()?;

    let stats = plan.run(&mut TracingObserver).with_context(|| {
        format!(
            "failed to join {} with {} into {}",
            plan.left.display(),
            plan.right.display(),
            plan.output.display()
        )
    })?;

    println!(
        "Joined {} records into {} ({} left windows, {} right windows)",
        stats.matches,
        plan.output.display(),
        stats.left_windows,
        stats.right_windows
    );
    if stats.malformed_skipped() > 0 {
        println!(
            "Skipped {} malformed lines ({} left, {} right)",
            stats.malformed_skipped(),
            stats.malformed_left,
            stats.malformed_right
        );
    }
    Ok(())
}

/// Applies command line overrides on top of the config file.
fn resolve(args: &JoinArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(left) = &args.left {
        config.input.left.clone_from(left);
    }
    if let Some(right) = &args.right {
        config.input.right.clone_from(right);
    }
    if let Some(output) = &args.output {
        config.output.path.clone_from(output);
    }
    if args.fsync {
        config.output.fsync = true;
    }
    if let Some(window) = args.window {
        config.join.window = window;
    }
    if let Some(strategy) = args.strategy {
        config.join.strategy = strategy;
    }
    if let Some(separator) = args.separator {
        config.join.separator = separator;
    }
    if let Some(mode) = args.on_malformed {
        config.join.on_malformed = mode;
    }
    if let Some(limit) = args.max_malformed {
        if args.on_malformed == Some(MalformedMode::Abort) {
            bail!("--max-malformed cannot be combined with --on-malformed abort");
        }
        config.join.max_malformed = Some(limit);
        config.join.on_malformed = MalformedMode::Skip;
    }

    config.validate()?;
    Ok(config)
}
