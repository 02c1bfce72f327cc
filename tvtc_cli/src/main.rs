use std::{ffi::OsString, io::IsTerminal, path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tvtc_core::{calendar::write_calendar, club_client, source::Source};

/// Convert the Tri-Valley Triathlon Club's workout calendar to an iCalendar file.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Arguments {
    /// test using a predownloaded HTML file
    #[arg(long, value_name = "PATH")]
    pub test: Option<PathBuf>,
    /// output file
    #[arg(long, value_name = "PATH", default_value = "tvtc.ical")]
    pub out: PathBuf,
}

/// Flags which are also accepted with a single dash, e.g. `-out calendar.ics`.
static SINGLE_DASH_FLAGS: [&str; 2] = ["test", "out"];

/// Rewrite single dash long flags to the double dash form understood by clap.
fn long_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(flag) = arg.to_str().and_then(|arg| arg.strip_prefix('-')) else {
                return arg;
            };
            let name = flag.split('=').next().unwrap_or_default();
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("--{flag}"))
            } else {
                arg
            }
        })
        .collect()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
}

async fn run(args: Arguments) -> Result<()> {
    let calendar = club_client::get(&Source::new(args.test)).await?;
    write_calendar(&args.out, &calendar)?;
    info!(
        "wrote {} workouts to {}",
        calendar.events.len(),
        args.out.display()
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let args = Arguments::parse_from(long_flags(std::env::args_os()));
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
