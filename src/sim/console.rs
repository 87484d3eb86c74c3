//! Line-oriented interactive session.
//!
//! The session asks for the code parameters and a flow, re-prompting until
//! each answer is valid, then runs the chosen flow. It talks to the user
//! only through the `Console` trait, so it can run over stdin/stdout, a
//! socket, or an in-memory script in tests.

use crate::ecc::bits::{self, BitVector};
use crate::ecc::{Codec, Error, NoisyChannel, Result, MAX_CODE_LENGTH};
use crate::sim::{
    comparison_paths, decode_transmission, load_image, run_image, run_text, transmit_vector,
    GeneratorSource, SimulationConfig,
};
use log::debug;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Source of input lines and sink for output lines.
pub trait Console {
    /// Reads one line without its terminator, or `None` once input is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Writes one line.
    fn write_line(&mut self, line: &str) -> Result<()>;
}

/// `Console` over any buffered reader and writer.
#[derive(Debug)]
pub struct IoConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> IoConsole<R, W> {
    /// Wraps a reader and a writer
    pub fn new(input: R, output: W) -> Self {
        IoConsole { input, output }
    }

    /// Returns the writer, e.g. to inspect captured output
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for IoConsole<R, W> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        self.output.flush()?;
        Ok(())
    }
}

/// The demonstration flows a session can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Encode, send and decode one vector
    Vector,
    /// Send text with and without coding
    Text,
    /// Send the pixels of an image with and without coding
    Image,
}

/// Interactive simulation driven through a `Console`.
#[derive(Debug)]
pub struct Session<C: Console> {
    console: C,
    seed: Option<u64>,
}

impl<C: Console> Session<C> {
    /// Creates a session over the given console
    pub fn new(console: C) -> Self {
        Session {
            console,
            seed: None,
        }
    }

    /// Make random generator data and channel noise reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Gives the console back
    pub fn into_console(self) -> C {
        self.console
    }

    /// Asks for the code and a flow, then runs it.
    pub fn run(&mut self) -> Result<()> {
        let config = self.read_config()?;
        let codec = config.build_codec()?;
        self.describe_code(&codec)?;
        let mut channel = config.build_channel()?;

        match self.read_flow()? {
            Flow::Vector => self.vector_flow(&codec, &mut channel),
            Flow::Text => self.text_flow(&codec, &mut channel),
            Flow::Image => self.image_flow(&codec, &mut channel),
        }
    }

    /// Asks for `k`, `n`, the generator rows and `p`.
    pub fn read_config(&mut self) -> Result<SimulationConfig> {
        let k: usize = self.prompt_parsed(
            "Enter the dimension k (message block length):",
            "k must be a whole number between 1 and the maximum code length",
            |k: &usize| *k > 0 && *k <= MAX_CODE_LENGTH,
        )?;
        let n: usize = self.prompt_parsed(
            &format!("Enter the code length n ({} to {}):", k, MAX_CODE_LENGTH),
            &format!("n must be a whole number between {} and {}", k, MAX_CODE_LENGTH),
            |n: &usize| *n >= k && *n <= MAX_CODE_LENGTH,
        )?;

        let generator = self.read_generator(k, n - k)?;
        let error_probability: f64 = self.prompt_parsed(
            "Enter the channel error probability (between 0 and 1):",
            "The probability must lie strictly between 0 and 1",
            |p: &f64| *p > 0.0 && *p < 1.0,
        )?;

        let mut config = SimulationConfig::default()
            .with_code(k, n, generator)
            .with_error_probability(error_probability);
        config.seed = self.seed;
        Ok(config)
    }

    fn read_generator(&mut self, rows: usize, columns: usize) -> Result<GeneratorSource> {
        self.console.write_line(
            "Type \"yes\" to enter the generator matrix yourself, anything else generates it:",
        )?;
        let answer = self.next_line()?;
        if !answer.trim().to_lowercase().starts_with("yes") {
            return Ok(GeneratorSource::Random);
        }

        self.console.write_line(&format!(
            "Enter the {} rows of the non-identity part, {} bits each:",
            rows, columns
        ))?;
        let mut matrix = Vec::with_capacity(rows);
        while matrix.len() < rows {
            let line = self.next_line()?;
            match bits::parse_bits(&line, columns) {
                Ok(row) => matrix.push(row.iter().by_vals().map(u8::from).collect()),
                Err(e) => self.console.write_line(&format!("{}. Enter the row again:", e))?,
            }
        }
        Ok(GeneratorSource::Explicit(matrix))
    }

    fn read_flow(&mut self) -> Result<Flow> {
        self.console.write_line("Choose a scenario:")?;
        self.console.write_line("1 - encode, send and decode a single vector")?;
        self.console.write_line("2 - send text with and without coding")?;
        self.console.write_line("3 - send an image with and without coding")?;
        let choice: u8 = self.prompt_parsed("", "No such scenario, enter 1, 2 or 3:", |c: &u8| {
            (1..=3).contains(c)
        })?;
        Ok(match choice {
            1 => Flow::Vector,
            2 => Flow::Text,
            _ => Flow::Image,
        })
    }

    fn describe_code(&mut self, codec: &Codec) -> Result<()> {
        let params = codec.params();
        self.console
            .write_line("Generator matrix (identity part not shown):")?;
        for row in params.generator().rows() {
            let row: BitVector = row.iter().map(|&b| b == 1).collect();
            self.console.write_line(&bits::format_bits(&row))?;
        }
        self.console.write_line(&format!(
            "Minimum distance {}, corrects up to {} errors per block",
            params.minimum_distance(),
            params.correction_radius()
        ))
    }

    fn vector_flow(&mut self, codec: &Codec, channel: &mut NoisyChannel) -> Result<()> {
        let k = codec.params().k();
        let n = codec.params().n();
        let message = self.prompt_vector(&format!("Enter a message of {} bits:", k), k)?;

        // The received vector is shown before the user may replace it
        let transmission = transmit_vector(codec, channel, &message)?;
        self.console.write_line(&format!(
            "Encoded vector: {}",
            bits::format_bits(&transmission.codeword)
        ))?;
        self.console.write_line(&format!(
            "Received vector: {}",
            bits::format_bits(&transmission.received)
        ))?;
        let positions: Vec<String> = transmission
            .error_positions
            .iter()
            .map(|p| (p + 1).to_string())
            .collect();
        self.console.write_line(&format!(
            "{} errors, at positions (1-based): {}",
            transmission.error_count(),
            positions.join(" ")
        ))?;

        self.console.write_line(
            "Enter a vector to decode instead, or press Enter to decode the received one:",
        )?;
        let replacement: Option<BitVector> = loop {
            let line = self.next_line()?;
            if line.trim().is_empty() {
                break None;
            }
            match bits::parse_bits(&line, n) {
                Ok(vector) => break Some(vector),
                Err(e) => self
                    .console
                    .write_line(&format!("{}. Try again, or press Enter:", e))?,
            }
        };

        let result = decode_transmission(codec, transmission, replacement.as_deref())?;
        self.console.write_line(&format!(
            "Decoded message: {}",
            bits::format_bits(&result.decoded_message)
        ))
    }

    fn text_flow(&mut self, codec: &Codec, channel: &mut NoisyChannel) -> Result<()> {
        self.console
            .write_line("Enter text, finish with an empty line:")?;
        let mut text = String::new();
        while let Some(line) = self.console.read_line()? {
            if line.trim().is_empty() {
                break;
            }
            text.push_str(&line);
            text.push('\n');
        }
        if text.is_empty() {
            return self.console.write_line("No text entered.");
        }

        let report = run_text(&text, codec, channel)?;
        self.console.write_line(&format!(
            "Sent without coding ({} bit errors):",
            report.uncoded.bit_errors
        ))?;
        self.console.write_line(&report.uncoded_text())?;
        self.console.write_line(&format!(
            "Sent with coding ({} channel errors, {} left after decoding):",
            report.coded_channel_errors, report.coded.bit_errors
        ))?;
        self.console.write_line(&report.coded_text())
    }

    fn image_flow(&mut self, codec: &Codec, channel: &mut NoisyChannel) -> Result<()> {
        self.console.write_line("Enter the path of an image file:")?;
        let path = PathBuf::from(self.next_line()?.trim());
        let image = load_image(&path)?;
        debug!(
            "Loaded {}x{} image from {}",
            image.width(),
            image.height(),
            path.display()
        );

        let report = run_image(&image, codec, channel)?;
        let (uncoded_path, coded_path) = comparison_paths(&path);
        report.save(&uncoded_path, &coded_path)?;

        self.console.write_line(&format!(
            "Without coding: {} bit errors, written to {}",
            report.stream.uncoded.bit_errors,
            uncoded_path.display()
        ))?;
        self.console.write_line(&format!(
            "With coding: {} bit errors, written to {}",
            report.stream.coded.bit_errors,
            coded_path.display()
        ))
    }

    fn next_line(&mut self) -> Result<String> {
        self.console
            .read_line()?
            .ok_or_else(|| Error::InvalidInput("Input ended before the session finished".to_string()))
    }

    fn prompt_parsed<T: FromStr>(
        &mut self,
        prompt: &str,
        complaint: &str,
        valid: impl Fn(&T) -> bool,
    ) -> Result<T> {
        if !prompt.is_empty() {
            self.console.write_line(prompt)?;
        }
        loop {
            match self.next_line()?.trim().parse::<T>() {
                Ok(value) if valid(&value) => return Ok(value),
                _ => self.console.write_line(complaint)?,
            }
        }
    }

    fn prompt_vector(&mut self, prompt: &str, len: usize) -> Result<BitVector> {
        self.console.write_line(prompt)?;
        loop {
            match bits::parse_bits(&self.next_line()?, len) {
                Ok(vector) => return Ok(vector),
                Err(e) => self.console.write_line(&format!("{}. Enter it again:", e))?,
            }
        }
    }
}
