use std::path::PathBuf;

use clap::Parser;

use keygrid::app::{App, ReportFormat};
use keygrid::config::{Config, default_log_dir};
use keygrid::error::AppResult;
use keygrid::geometry::Region;
use keygrid::input::KeymapPreset;
use keygrid::logging;

/// Keyboard-driven pointer navigation over a 3x3 grid
#[derive(Parser, Debug)]
#[command(name = "keygrid", version, about)]
struct Cli {
    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Key layout for the grid cells
    #[arg(long, value_parser = ["qwerty", "numpad"])]
    preset: Option<String>,

    /// Tap disambiguation window in milliseconds
    #[arg(long, value_name = "MS")]
    window_ms: Option<u64>,

    /// Simulated monitor; repeat for several monitors
    #[arg(
        long = "monitor",
        value_name = "LEFT,TOP,WIDTH,HEIGHT",
        value_parser = parse_monitor
    )]
    monitors: Vec<Region>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Log to stderr only
    #[arg(long)]
    no_log_file: bool,
}

impl Cli {
    fn report_format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        }
    }

    fn load_config(&self) -> AppResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_path(path)?,
            None => Config::load()?,
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(preset) = &self.preset {
            config.keymap.preset = KeymapPreset::parse(preset).as_str().to_string();
        }
        if let Some(window_ms) = self.window_ms {
            config.sequence.window_ms = window_ms;
        }
        if !self.monitors.is_empty() {
            config.desktop.monitors = self.monitors.clone();
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let log_dir = if cli.no_log_file {
        None
    } else {
        default_log_dir()
    };
    logging::init(log_dir);

    let config = cli.load_config()?;
    let mut app = App::new_with_config(config)?;
    app.run(cli.report_format()).await
}

fn parse_monitor(value: &str) -> Result<Region, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid monitor `{value}`: {err}"))?;
    let &[left, top, width, height] = parts.as_slice() else {
        return Err(format!(
            "invalid monitor `{value}`: expected LEFT,TOP,WIDTH,HEIGHT"
        ));
    };
    if width <= 0 || height <= 0 {
        return Err(format!(
            "invalid monitor `{value}`: width and height must be positive"
        ));
    }
    Ok(Region::from_origin_size(left, top, width, height))
}
