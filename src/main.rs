//! hostfs command-line entry point

use anyhow::{Context, Result};
use clap::Parser;
use hostfs::cli::{Args, Command};
use hostfs::{AsyncFileSystem, Contents, Filesystem};
use std::io::{Read, Write};
use std::process::ExitCode;
use tracing::{debug, info};

#[compio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        return ExitCode::from(2);
    }

    tracing_subscriber::fmt()
        .with_max_level(args.output.log_level())
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<ExitCode> {
    let fs = Filesystem::with_options(args.io.to_options());
    let file_options = args.io.file_options();
    debug!(
        "{} backend, {} byte buffers",
        fs.backend().name(),
        fs.backend().options().buffer_size
    );

    match &args.command {
        Command::Ls { path } => {
            let names = fs.readdir(path).await?;
            let mut stdout = std::io::stdout().lock();
            for name in names {
                writeln!(stdout, "{name}")?;
            }
        }
        Command::Mkdir { path } => {
            fs.mkdir(path).await?;
            info!("created {}", path.display());
        }
        Command::Rm { path, force } => match fs.unlink(path).await {
            Ok(()) => info!("removed {}", path.display()),
            Err(e) if *force && e.is_not_found() => {
                debug!("{} already absent", path.display());
            }
            Err(e) => return Err(e.into()),
        },
        Command::Write { path, contents } => {
            fs.write_file(path, input(contents.as_deref())?, file_options)
                .await?;
        }
        Command::Append { path, contents } => {
            fs.append_file(path, input(contents.as_deref())?, file_options)
                .await?;
        }
        Command::Cat { path } => {
            let contents = fs.read_file(path, file_options).await?;
            let mut stdout = std::io::stdout().lock();
            match contents {
                Contents::Text(text) => stdout.write_all(text.as_bytes())?,
                Contents::Bytes(bytes) => stdout.write_all(&bytes)?,
            }
            stdout.flush()?;
        }
        Command::Cp { src, dst } => {
            fs.copy_file(src, dst).await?;
            info!("copied {} -> {}", src.display(), dst.display());
        }
        Command::Mv { src, dst } => {
            fs.move_file(src, dst).await?;
            info!("moved {} -> {}", src.display(), dst.display());
        }
        Command::Stat { path } => {
            let stat = fs.stat(path).await?;
            println!("size: {}", stat.size);
            println!("type: {}", stat.kind.as_str());
            println!("mode: {:o}", stat.mode);
        }
        Command::Exists { path } => {
            if fs.exists(path).await {
                return Ok(ExitCode::SUCCESS);
            }
            debug!("{} does not exist", path.display());
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Contents from the command line, or all of stdin when none were given
fn input(contents: Option<&str>) -> Result<Contents> {
    if let Some(text) = contents {
        return Ok(Contents::from(text));
    }
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(Contents::Bytes(buffer))
}
