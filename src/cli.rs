use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::PackGroup;
use crate::request::{CalculateRequest, RawPacks, RawSelection};

pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub request: Option<PathBuf>,
    pub archetype: Option<String>,
    pub packs: Vec<String>,
    pub selections: Vec<RawSelection>,
    pub expert: bool,
    pub city: Option<String>,
    pub solar_wp: Option<f64>,
    pub json: bool,
    pub recommendations_out: Option<PathBuf>,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: Option<u16>,
}

impl CliOptions {
    fn serving(&self) -> bool {
        #[cfg(feature = "api")]
        {
            self.serve
        }
        #[cfg(not(feature = "api"))]
        {
            false
        }
    }

    fn has_request_flags(&self) -> bool {
        self.archetype.is_some()
            || !self.packs.is_empty()
            || !self.selections.is_empty()
            || self.expert
            || self.city.is_some()
            || self.solar_wp.is_some()
    }

    /// Request assembled from the individual flags.
    ///
    /// `--pack` keys produce the legacy shape, `--select` entries the rich one.
    pub fn flag_request(&self) -> CalculateRequest {
        let packs = if !self.selections.is_empty() {
            Some(RawPacks::Selections(self.selections.clone()))
        } else if !self.packs.is_empty() {
            Some(RawPacks::Keys(self.packs.clone()))
        } else {
            None
        };
        CalculateRequest {
            archetype_id: self.archetype.clone(),
            archetype: None,
            expert_mode: self.expert,
            packs,
            city: self.city.clone(),
            solar_wp: self.solar_wp,
        }
    }

    /// The request to size: the `--request` file when given, otherwise the flags.
    pub fn to_request(&self) -> Result<CalculateRequest, String> {
        match &self.request {
            Some(path) => read_request_file(path),
            None => Ok(self.flag_request()),
        }
    }
}

/// Reads a JSON request body from disk.
pub fn read_request_file(path: &Path) -> Result<CalculateRequest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("failed to read request {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse request {}: {e}", path.display()))
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        config: None,
        catalog: None,
        request: None,
        archetype: None,
        packs: Vec::new(),
        selections: Vec::new(),
        expert: false,
        city: None,
        solar_wp: None,
        json: false,
        recommendations_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: None,
    };

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--catalog" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --catalog (expected a directory)")?;
                if opts.catalog.replace(PathBuf::from(path)).is_some() {
                    return Err("--catalog provided more than once".to_string());
                }
            }
            "--request" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --request (expected a JSON file path)")?;
                if opts.request.replace(PathBuf::from(path)).is_some() {
                    return Err("--request provided more than once".to_string());
                }
            }
            "--archetype" => {
                i += 1;
                let id = args.next_or_err(i, "missing value for --archetype (expected an archetype id)")?;
                if opts.archetype.replace(id.to_string()).is_some() {
                    return Err("--archetype provided more than once".to_string());
                }
            }
            "--pack" => {
                i += 1;
                let key = args.next_or_err(i, "missing value for --pack (expected a pack key)")?;
                opts.packs.push(key.to_string());
            }
            "--select" => {
                i += 1;
                let selection = args.next_or_err(
                    i,
                    "missing value for --select (expected group:key[:usage])",
                )?;
                opts.selections.push(parse_selection(selection)?);
            }
            "--expert" => opts.expert = true,
            "--city" => {
                i += 1;
                let city = args.next_or_err(i, "missing value for --city (expected a city name)")?;
                if opts.city.replace(city.to_string()).is_some() {
                    return Err("--city provided more than once".to_string());
                }
            }
            "--solar-wp" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --solar-wp (expected watts)")?;
                let wp = raw
                    .parse::<f64>()
                    .map_err(|_| format!("--solar-wp value \"{raw}\" is not a number"))?;
                if opts.solar_wp.replace(wp).is_some() {
                    return Err("--solar-wp provided more than once".to_string());
                }
            }
            "--json" => opts.json = true,
            "--recommendations-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --recommendations-out (expected a file path)",
                )?;
                if opts.recommendations_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--recommendations-out provided more than once".to_string());
                }
            }
            #[cfg(feature = "api")]
            "--serve" => opts.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                if opts.port.replace(port).is_some() {
                    return Err("--port provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if !opts.packs.is_empty() && !opts.selections.is_empty() {
        return Err(
            "arguments `--pack` and `--select` are mutually exclusive; choose one pack shape"
                .to_string(),
        );
    }

    if opts.request.is_some() && opts.has_request_flags() {
        return Err(
            "argument `--request` cannot be combined with --archetype, --pack, --select, --expert, --city or --solar-wp"
                .to_string(),
        );
    }

    if !opts.serving() && opts.request.is_none() && opts.archetype.is_none() {
        return Err("one of `--archetype` or `--request` is required".to_string());
    }

    Ok(opts)
}

/// Parses `group:key[:usage]`, e.g. `ac1p:fridge:2`.
fn parse_selection(selection: &str) -> Result<RawSelection, String> {
    let mut parts = selection.splitn(3, ':');
    let (Some(group), Some(key)) = (parts.next(), parts.next()) else {
        return Err(format!(
            "--select value \"{selection}\" must look like group:key[:usage]"
        ));
    };
    if key.is_empty() {
        return Err(format!("--select value \"{selection}\" has an empty pack key"));
    }
    group.parse::<PackGroup>().map_err(|e| e.to_string())?;

    let usage_index = match parts.next() {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| format!("--select usage \"{raw}\" is not an integer"))? as f64,
        None => 1.0,
    };

    Ok(RawSelection {
        group: group.to_string(),
        key: key.to_string(),
        usage_index,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("station-sizer: size a backup or off-grid power station for a household");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  station-sizer [--config <path>] [--catalog <dir>] (--request <json> | --archetype <id> ...)"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>               Load settings from a TOML file");
    eprintln!("  --catalog <dir>               Catalog directory (overrides config)");
    eprintln!("  --request <path>              Read the request body from a JSON file");
    eprintln!("  --archetype <id>              Household archetype");
    eprintln!("  --pack <key>                  Add an AC single-phase pack at typical use (repeatable)");
    eprintln!("  --select <group:key[:usage]>  Add a pack from any group, usage 0-2 (repeatable)");
    eprintln!("  --expert                      Ignore the archetype baseline");
    eprintln!("  --city <name>                 City for the solar estimate");
    eprintln!("  --solar-wp <watts>            Installed solar peak power");
    eprintln!("  --json                        Print the report as JSON");
    eprintln!("  --recommendations-out <path>  Write the ranked tiers to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                       Start the REST API instead of sizing once");
        eprintln!("  --port <u16>                  API port (overrides config)");
    }
    eprintln!("  --help                        Show this help message");
}
