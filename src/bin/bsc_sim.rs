use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use syndrome_sim::ecc::bits;
use syndrome_sim::sim::{
    comparison_paths, load_image, run_image, run_text, run_vector_round_trip, GeneratorSource,
    IoConsole, Session, SimulationConfig,
};
use syndrome_sim::{Error, Result};

#[derive(Parser, Debug)]
#[command(author, version, about = "Linear block codes over a binary symmetric channel", long_about = None)]
struct Options {
    /// Message dimension k
    #[arg(short, long, default_value_t = 3)]
    k: usize,

    /// Codeword length n
    #[arg(short, long, default_value_t = 6)]
    n: usize,

    /// Generator rows without the identity part, comma separated (e.g. 110,011,101).
    /// Random when omitted, except for the default [6, 3] code
    #[arg(short, long)]
    generator: Option<String>,

    /// Channel error probability
    #[arg(short, long, default_value_t = 0.05)]
    probability: f64,

    /// Seed for random generator data and channel noise
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prompt for everything on the terminal
    Interactive,
    /// Encode, send and decode one message
    Vector {
        /// Message of k bits
        message: String,
        /// Decode this n-bit vector instead of what the channel delivered
        #[arg(long)]
        corrupt: Option<String>,
    },
    /// Send text with and without coding (reads stdin when no text is given)
    Text { text: Option<String> },
    /// Send the pixels of an image with and without coding
    Image {
        /// Input image (any format the image crate reads)
        file: PathBuf,
        /// Where to write the image sent without coding [default: <stem>.uncoded.bmp]
        #[arg(long)]
        uncoded: Option<PathBuf>,
        /// Where to write the decoded image [default: <stem>.coded.bmp]
        #[arg(long)]
        coded: Option<PathBuf>,
    },
}

impl Options {
    fn config(&self) -> Result<SimulationConfig> {
        let defaults = SimulationConfig::default();
        let generator = match &self.generator {
            Some(rows) => GeneratorSource::Explicit(
                rows.split(',')
                    .map(|row| {
                        let columns = self.n.saturating_sub(self.k);
                        bits::parse_bits(row, columns)
                            .map(|parsed| parsed.iter().by_vals().map(u8::from).collect::<Vec<u8>>())
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None if (self.k, self.n) == (defaults.k, defaults.n) => defaults.generator.clone(),
            None => GeneratorSource::Random,
        };

        let mut config = defaults
            .with_code(self.k, self.n, generator)
            .with_error_probability(self.probability);
        config.seed = self.seed;
        Ok(config)
    }
}

fn run<R: BufRead, W: Write>(mut options: Options, mut input: R, output: W) -> Result<()> {
    // The interactive session asks for its own code; code options are only
    // parsed by the other commands
    match options.command.take().unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let console = IoConsole::new(input, output);
            let mut session = Session::new(console);
            if let Some(seed) = options.seed {
                session = session.with_seed(seed);
            }
            session.run()
        }
        Command::Vector { message, corrupt } => {
            let config = options.config()?;
            let codec = config.build_codec()?;
            let mut channel = config.build_channel()?;
            let params = codec.params();
            let message = bits::parse_bits(&message, params.k())?;
            let corrupt = corrupt
                .map(|text| bits::parse_bits(&text, params.n()))
                .transpose()?;

            let result = run_vector_round_trip(&codec, &mut channel, &message, corrupt.as_deref())?;
            println!("Encoded:  {}", bits::format_bits(&result.codeword));
            println!("Received: {}", bits::format_bits(&result.received));
            println!("Errors:   {} at {:?}", result.error_count(), result.error_positions);
            println!("Decoded:  {}", bits::format_bits(&result.decoded));
            println!("Message:  {}", bits::format_bits(&result.decoded_message));
            Ok(())
        }
        Command::Text { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    input.read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let config = options.config()?;
            let codec = config.build_codec()?;
            let mut channel = config.build_channel()?;

            let report = run_text(&text, &codec, &mut channel)?;
            println!("Without coding ({} bit errors):", report.uncoded.bit_errors);
            println!("{}", report.uncoded_text());
            println!(
                "With coding ({} channel errors, {} left):",
                report.coded_channel_errors, report.coded.bit_errors
            );
            println!("{}", report.coded_text());
            Ok(())
        }
        Command::Image {
            file,
            uncoded,
            coded,
        } => {
            let config = options.config()?;
            let image = load_image(&file)?;
            let codec = config.build_codec()?;
            let mut channel = config.build_channel()?;

            let report = run_image(&image, &codec, &mut channel)?;
            let (default_uncoded, default_coded) = comparison_paths(&file);
            let uncoded = uncoded.unwrap_or(default_uncoded);
            let coded = coded.unwrap_or(default_coded);
            report.save(&uncoded, &coded)?;
            println!(
                "Uncoded: {} bit errors, written to {}",
                report.stream.uncoded.bit_errors,
                uncoded.display()
            );
            println!(
                "Coded:   {} bit errors, written to {}",
                report.stream.coded.bit_errors,
                coded.display()
            );
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let env = Env::default().default_filter_or("info");
    // Ignore errors if the logger was already initialized
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();

    match run(Options::parse(), io::stdin().lock(), io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::InvalidConfiguration(msg)) => {
            error!("Configuration rejected: {}", msg);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
