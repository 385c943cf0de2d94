use std::io::Write;

use anyhow::Error;

use clap::{ArgAction, Parser, Subcommand};

mod genotypes;
use genotypes::Genotypes;

mod input;

mod sequence;
use sequence::Sequence;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extract genotypes and haplotype sequences from indexed VCF.
#[derive(Debug, Parser)]
#[clap(name = NAME, version = VERSION, about)]
#[clap(subcommand_required = true)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity, or left unset for quiet mode.
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[clap(long, hide = true, global = true)]
    debug: bool,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[hapseq {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        self.command.run()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Genotypes(Genotypes),
    Sequence(Sequence),
}

impl Command {
    fn run(self) -> Result<(), Error> {
        match self {
            Command::Genotypes(genotypes) => genotypes.run(),
            Command::Sequence(sequence) => sequence.run(),
        }
    }
}

impl TryFrom<Command> for Genotypes {
    type Error = Command;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        match command {
            Command::Genotypes(genotypes) => Ok(genotypes),
            command => Err(command),
        }
    }
}

impl TryFrom<Command> for Sequence {
    type Error = Command;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        match command {
            Command::Sequence(sequence) => Ok(sequence),
            command => Err(command),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
