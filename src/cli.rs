//! Command-line interface.
//!
//! Owns everything the core deliberately does not: paths, file handles,
//! overwrite policy, password acquisition, and progress display.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};

use crate::config::FILE_EXTENSION;
use crate::driver;
use crate::error::Error;
use crate::header::PendingHeader;
use crate::types::Direction;
use crate::ui;
use crate::ui::ProgressBar;

/// Encrypt files into authenticated, erasure-coded .swb containers.
#[derive(Parser)]
#[command(name = "sealbox", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Encrypt a file into a .swb container.
    Encrypt {
        /// File to encrypt.
        input: PathBuf,

        /// Output path (defaults to the input path plus `.swb`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Password (prompted when omitted).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Decrypt a .swb container.
    Decrypt {
        /// Container to decrypt.
        input: PathBuf,

        /// Output path (defaults to the input path minus `.swb`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Password (prompted when omitted).
        #[arg(short, long)]
        password: Option<String>,
    },
}

impl Cli {
    #[must_use]
    pub fn init() -> Self {
        Self::parse()
    }

    /// Runs the selected command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Command::Encrypt { input, output, password } => {
                let output = output.map_or_else(|| derive_output_path(&input, Direction::Encrypt), Ok)?;
                let password = resolve_password(password, Direction::Encrypt)?;
                run_encrypt(&input, &output, &password)
            }
            Command::Decrypt { input, output, password } => {
                let output = output.map_or_else(|| derive_output_path(&input, Direction::Decrypt), Ok)?;
                let password = resolve_password(password, Direction::Decrypt)?;
                run_decrypt(&input, &output, &password)
            }
        }
    }
}

/// Appends or strips the container extension.
fn derive_output_path(input: &Path, direction: Direction) -> Result<PathBuf> {
    match direction {
        Direction::Encrypt => {
            let mut name = input.as_os_str().to_os_string();
            name.push(FILE_EXTENSION);
            Ok(PathBuf::from(name))
        }
        Direction::Decrypt => {
            let stripped = input.to_string_lossy().strip_suffix(FILE_EXTENSION).map(PathBuf::from);
            stripped.with_context(|| format!("{} has no {FILE_EXTENSION} extension; use --output", input.display()))
        }
    }
}

fn resolve_password(arg: Option<String>, direction: Direction) -> Result<SecretString> {
    match arg {
        Some(p) => Ok(SecretString::from(p)),
        None => match direction {
            Direction::Encrypt => ui::prompt::encryption_password(),
            Direction::Decrypt => ui::prompt::decryption_password(),
        },
    }
}

/// Creates the destination, refusing to clobber an existing file.
fn create_output(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .with_context(|| format!("cannot create {} (already exists?)", path.display()))
}

fn run_encrypt(input: &Path, output: &Path, password: &SecretString) -> Result<()> {
    let source = File::open(input).with_context(|| format!("cannot open {}", input.display()))?;
    let in_size = source.metadata()?.len();

    let mut dest = BufWriter::new(create_output(output)?);

    let bar = ProgressBar::new(in_size, Direction::Encrypt.progress_label());
    let outcome = driver::encrypt(BufReader::new(source), &mut dest, in_size, password.expose_secret().as_bytes(), &bar);
    bar.finish();
    drop(dest);

    outcome.with_context(|| format!("encryption failed for {}", input.display()))?;

    let out_size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    ui::display::show_result("encrypted", output, in_size, out_size);
    Ok(())
}

fn run_decrypt(input: &Path, output: &Path, password: &SecretString) -> Result<()> {
    let source = File::open(input).with_context(|| format!("cannot open {}", input.display()))?;
    let in_size = source.metadata()?.len();
    let mut source = BufReader::new(source);

    // Peek the recorded size for the progress total, then rewind. The
    // value is unauthenticated here; `driver::decrypt` re-reads and
    // verifies the header properly.
    let total = PendingHeader::read(&mut source).map(|h| h.original_size()).unwrap_or(0);
    source.seek(SeekFrom::Start(0))?;

    let mut dest = BufWriter::new(create_output(output)?);

    let bar = ProgressBar::new(total, Direction::Decrypt.progress_label());
    let outcome = driver::decrypt(source, &mut dest, password.expose_secret().as_bytes(), &bar);
    bar.finish();
    drop(dest);

    if let Err(err) = outcome {
        // Wrong password and payload tampering must be
        // indistinguishable to the user.
        if payload_auth_failed(&err) {
            bail!("{}", Error::HeaderAuthFailure);
        }
        return Err(anyhow::Error::new(err).context(format!("decryption failed for {}", input.display())));
    }

    let out_size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    ui::display::show_result("decrypted", output, in_size, out_size);
    Ok(())
}

/// True for failures that could equally mean wrong password or
/// corruption: the header MAC or any payload authentication layer.
fn payload_auth_failed(err: &Error) -> bool {
    match err {
        Error::HeaderAuthFailure | Error::AuthFailure { .. } | Error::UnpaddingFailed => true,
        Error::Chunk { source, .. } | Error::Reader(source) | Error::Writer(source) => payload_auth_failed(source),
        _ => false,
    }
}
