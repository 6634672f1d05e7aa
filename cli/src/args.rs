//! Command-line flags.
//!
//! Flags are a dash, a name, and an optional payload glued to the name:
//! `-d50`, `-v3`, `-r`, `-pi./digits.txt`. A numeric flag without a payload
//! means 0. Everything that does not start with `-` is a program file.

use std::{error::Error, path::PathBuf, str::FromStr};

use anyhow::{Context, Result, bail};

pub const USAGE: &str = "usage: piwalk [-d<ms>] [-v<radius>] [-r] [-pi<path>] FILE...";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Args {
    pub delay_ms: Option<u64>,
    pub view_radius: Option<u32>,
    pub dump_registers: bool,
    pub pi_file: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl Args {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Args::default();

        for arg in args {
            let Some(flag) = arg.strip_prefix('-') else {
                parsed.files.push(PathBuf::from(arg));
                continue;
            };

            if let Some(path) = flag.strip_prefix("pi") {
                if path.is_empty() {
                    bail!("-pi needs a path, e.g. -pi./pi.txt\n{USAGE}");
                }
                parsed.pi_file = Some(PathBuf::from(path));
            } else if let Some(payload) = flag.strip_prefix('d') {
                parsed.delay_ms = Some(number(payload, "d")?);
            } else if let Some(payload) = flag.strip_prefix('v') {
                parsed.view_radius = Some(number(payload, "v")?);
            } else if flag == "r" {
                parsed.dump_registers = true;
            } else {
                bail!("unknown flag '{arg}'\n{USAGE}");
            }
        }

        if parsed.files.is_empty() {
            bail!("no input file supplied\n{USAGE}");
        }
        Ok(parsed)
    }
}

fn number<T>(payload: &str, flag: &str) -> Result<T>
where
    T: FromStr + Default,
    T::Err: Error + Send + Sync + 'static,
{
    if payload.is_empty() {
        return Ok(T::default());
    }
    payload
        .parse()
        .with_context(|| format!("-{flag} expects a number, got '{payload}'"))
}
