extern crate calgrid as lib;

use flexi_logger::{Duplicate, FileSpec, Logger};
use lib::config::PartialConfig;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "calgrid",
    about = "Renders one month of a calendar as an HTML table."
)]
pub struct Args {
    #[structopt(short = "m", long = "month", help = "month to render (1-12)")]
    pub month: Option<u32>,

    #[structopt(short = "y", long = "year", help = "year of the month to render")]
    pub year: Option<i32>,

    #[structopt(
        short = "l",
        long = "locale",
        help = "locale for month and weekday names, e.g. pl_PL"
    )]
    pub locale: Option<String>,

    #[structopt(
        short = "t",
        long = "timezone",
        help = "IANA timezone, e.g. Europe/Warsaw"
    )]
    pub timezone: Option<String>,

    #[structopt(
        short = "o",
        long = "output",
        help = "path of the HTML file to write, '-' for stdout",
        parse(from_os_str)
    )]
    pub output: Option<PathBuf>,

    #[structopt(long = "stylesheet", help = "stylesheet referenced by the HTML file")]
    pub stylesheet: Option<String>,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> PartialConfig {
        PartialConfig {
            month: self.month,
            year: self.year,
            locale: self.locale.clone(),
            timezone: self.timezone.clone(),
            output: self.output.clone(),
            stylesheet: self.stylesheet.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger =
        Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?.duplicate_to_stderr(Duplicate::Warn);

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file.clone())?)
            .print_message();
    }

    logger.start()?;

    let file_config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let config = args.overrides().or(file_config).resolve()?;

    log::debug!("Resolved configuration: {:?}", config);

    lib::run(&config)?;

    Ok(())
}
