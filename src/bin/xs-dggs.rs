// src/bin/xs-dggs.rs
//! Runs one generation from a JSON configuration and writes one
//! `label,lon,lat` line per cell to stdout.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;
use xs_dggs::{DgError, DgResult, GenConfig, GeneratedCell, Generator};

fn run(path: &str) -> DgResult<()> {
  let cfg = GenConfig::from_json_path(path)?;
  let mut generator = Generator::new(cfg)?;
  let mut out = BufWriter::new(io::stdout().lock());
  let mut write_cell = |cell: GeneratedCell| -> DgResult<()> {
    write!(
      out,
      "{},{:.7},{:.7}",
      cell.label,
      cell.center.lng_degrees(),
      cell.center.lat_degrees()
    )?;
    for (k, v) in cell.attributes.iter().flatten() {
      write!(out, ",{k}={v}")?;
    }
    writeln!(out)?;
    Ok(())
  };
  generator.run(&mut write_cell)?;
  out.flush().map_err(DgError::from)
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let Some(path) = std::env::args().nth(1) else {
    eprintln!("usage: xs-dggs <config.json>");
    return ExitCode::from(2);
  };
  match run(&path) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{e}");
      ExitCode::FAILURE
    }
  }
}
