//! Fauxtoshop CLI
//!
//! Applies scatter, edge detection, green-screen compositing or blur to
//! an image file, or compares two images pixel by pixel. `interactive`
//! runs the prompt-driven menu loop.

use clap::{Parser, Subcommand};
use fauxtoshop::{
    codec::{self, CodecError},
    config::{ConfigError, FileConfig},
    diff::{self, DiffError, DiffReport},
    filters::{
        CompositeParams, Compositor, EdgeDetector, EdgeParams, FilterError, GaussianBlur,
        BlurParams, ScatterFilter, ScatterParams, MAX_RADIUS,
    },
    grid::{Color, PixelGrid},
    location::{parse_location, Location},
    metrics::{MetricsError, MetricsRegistry},
    random::{ChaChaSource, DEFAULT_FIXED_SEED},
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info, warn};

/// Range offered for scatter and blur radius at the interactive prompt.
const RADIUS_RANGE: (i64, i64) = (1, MAX_RADIUS as i64);
/// Range offered for green-screen tolerance at the interactive prompt.
const TOLERANCE_RANGE: (i64, i64) = (0, 100);

#[derive(Parser)]
#[command(name = "fauxtoshop", version, about = "Apply pixel filters to images")]
struct Cli {
    /// TOML file with filter defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in fixed seed so scatter output is reproducible.
    #[arg(long, global = true)]
    fixed_seed: bool,

    /// Seed the random source with this value.
    #[arg(long, global = true, conflicts_with = "fixed_seed")]
    seed: Option<u64>,

    /// Print Prometheus metrics to stdout when done.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resample every pixel from a random nearby pixel.
    Scatter {
        input: PathBuf,
        /// Sampling window half-width, 1 to 100.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_RADIUS as i64))]
        radius: Option<u32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Black where neighboring colors differ by more than the threshold.
    Edges {
        input: PathBuf,
        #[arg(long)]
        threshold: Option<u32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Paste a sticker image, treating near-key-color pixels as transparent.
    GreenScreen {
        base: PathBuf,
        sticker: PathBuf,
        /// Placement as "(row,col)".
        #[arg(long)]
        at: Location,
        #[arg(long)]
        tolerance: Option<u32>,
        /// Key color as #RRGGBB.
        #[arg(long)]
        key: Option<Color>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Gaussian blur.
    Blur {
        input: PathBuf,
        /// Kernel half-width, 1 to 100.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_RADIUS as i64))]
        radius: Option<u32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Count pixels that differ between two images.
    Compare {
        first: PathBuf,
        second: PathBuf,
        /// Write the first image with differing pixels in magenta.
        #[arg(long)]
        highlight: Option<PathBuf>,
    },
    /// Prompt-driven menu loop.
    Interactive,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Shared state for one run: defaults, random source and metrics.
struct Session {
    config: FileConfig,
    rng: ChaChaSource,
    metrics: MetricsRegistry,
}

impl Session {
    fn new(config: FileConfig, seed: Option<u64>) -> Result<Self, AppError> {
        let rng = match seed.or(config.random.seed) {
            Some(seed) => {
                info!(seed, "using fixed random seed");
                ChaChaSource::from_seed_value(seed)
            }
            None => ChaChaSource::from_os_entropy(),
        };
        Ok(Self {
            config,
            rng,
            metrics: MetricsRegistry::new()?,
        })
    }

    fn scatter(&mut self, grid: &PixelGrid, radius: u32) -> Result<PixelGrid, AppError> {
        let filter = ScatterFilter::new(ScatterParams { radius })?;
        let start = Instant::now();
        let out = filter.apply(grid, &mut self.rng);
        self.finish("scatter", &out, start);
        Ok(out)
    }

    fn edges(&mut self, grid: &PixelGrid, threshold: u32) -> PixelGrid {
        let start = Instant::now();
        let out = EdgeDetector::new(EdgeParams { threshold }).apply(grid);
        self.finish("edges", &out, start);
        out
    }

    fn green_screen(
        &mut self,
        base: &PixelGrid,
        sticker: &PixelGrid,
        params: CompositeParams,
    ) -> PixelGrid {
        let start = Instant::now();
        let out = Compositor::new(params).apply(base, sticker);
        self.finish("green_screen", &out, start);
        out
    }

    fn blur(&mut self, grid: &PixelGrid, radius: u32) -> Result<PixelGrid, AppError> {
        let filter = GaussianBlur::new(BlurParams { radius })?;
        let start = Instant::now();
        let out = filter.apply(grid);
        self.finish("blur", &out, start);
        Ok(out)
    }

    fn compare(&mut self, a: &PixelGrid, b: &PixelGrid) -> Result<DiffReport, AppError> {
        let report = diff::diff(a, b)?;
        self.metrics.record_diff(&report);
        Ok(report)
    }

    fn finish(&self, filter: &str, out: &PixelGrid, start: Instant) {
        let elapsed = start.elapsed();
        self.metrics.record_filter(filter, out.len(), elapsed);
        info!(
            filter,
            rows = out.rows(),
            cols = out.cols(),
            elapsed_ms = elapsed.as_millis() as u64,
            "filter applied"
        );
    }

    fn composite_params(
        &self,
        at: Location,
        tolerance: Option<u32>,
        key: Option<Color>,
    ) -> CompositeParams {
        let (offset_row, offset_col) = at.offsets();
        CompositeParams {
            offset_row,
            offset_col,
            tolerance: tolerance.unwrap_or(self.config.green_screen.tolerance),
            key_color: key.unwrap_or(self.config.green_screen.key_color),
        }
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    info!("Fauxtoshop v{}", fauxtoshop::VERSION);

    let config = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let seed = cli.seed.or(cli.fixed_seed.then_some(DEFAULT_FIXED_SEED));
    let mut session = Session::new(config, seed)?;

    match cli.command {
        Command::Scatter {
            input,
            radius,
            output,
        } => {
            let grid = codec::load(&input)?;
            let radius = radius.unwrap_or(session.config.scatter.radius);
            let out = session.scatter(&grid, radius)?;
            write_output(&out, output.as_deref())?;
        }
        Command::Edges {
            input,
            threshold,
            output,
        } => {
            let grid = codec::load(&input)?;
            let threshold = threshold.unwrap_or(session.config.edge.threshold);
            let out = session.edges(&grid, threshold);
            write_output(&out, output.as_deref())?;
        }
        Command::GreenScreen {
            base,
            sticker,
            at,
            tolerance,
            key,
            output,
        } => {
            let base = codec::load(&base)?;
            let sticker = codec::load(&sticker)?;
            let params = session.composite_params(at, tolerance, key);
            let out = session.green_screen(&base, &sticker, params);
            write_output(&out, output.as_deref())?;
        }
        Command::Blur {
            input,
            radius,
            output,
        } => {
            let grid = codec::load(&input)?;
            let radius = radius.unwrap_or(session.config.blur.radius);
            let out = session.blur(&grid, radius)?;
            write_output(&out, output.as_deref())?;
        }
        Command::Compare {
            first,
            second,
            highlight,
        } => {
            let a = codec::load(&first)?;
            let b = codec::load(&second)?;
            let report = session.compare(&a, &b)?;
            println!("{}", describe_diff(&report));
            if let Some(path) = highlight {
                codec::save(&report.highlight(&a)?, path)?;
            }
        }
        Command::Interactive => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Console::new(stdin.lock(), stdout.lock()).run(&mut session)?;
        }
    }

    if cli.metrics {
        print!("{}", session.metrics.encode()?);
    }
    Ok(())
}

fn write_output(grid: &PixelGrid, output: Option<&Path>) -> Result<(), AppError> {
    match output {
        Some(path) => codec::save(grid, path)?,
        None => warn!("no --output given, result discarded"),
    }
    Ok(())
}

fn describe_diff(report: &DiffReport) -> String {
    if report.is_identical() {
        "These images are the same!".to_string()
    } else {
        format!(
            "These images differ in {} pixel locations!",
            report.count()
        )
    }
}

/// Prompt-driven front end over any line source.
///
/// Every prompt loops until it gets acceptable input. End of input ends the
/// session cleanly.
struct Console<R, W> {
    input: R,
    output: W,
}

/// Outcome of a prompt: a value, or end of input.
type Prompted<T> = Result<Option<T>, io::Error>;

impl<R: BufRead, W: Write> Console<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn run(&mut self, session: &mut Session) -> Result<(), AppError> {
        writeln!(self.output, "Welcome to Fauxtoshop!")?;
        while let Some(grid) =
            self.open_image("Enter name of image file to open (or blank to quit): ", true)?
        {
            if !self.apply_filter(session, &grid)? {
                break;
            }
            writeln!(self.output)?;
        }
        writeln!(self.output, "Exiting.")?;
        Ok(())
    }

    /// Runs one menu choice. Returns false if input ended mid-way.
    fn apply_filter(&mut self, session: &mut Session, grid: &PixelGrid) -> Result<bool, AppError> {
        loop {
            writeln!(self.output, "Which image filter would you like to apply?")?;
            writeln!(self.output, "\t1 - Scatter")?;
            writeln!(self.output, "\t2 - Edge detection")?;
            writeln!(self.output, "\t3 - \"Green screen\" with another image")?;
            writeln!(self.output, "\t4 - Compare image with another image")?;
            writeln!(self.output, "\t5 - Gaussian blur")?;
            let Some(choice) = self.read_integer("Your choice: ")? else {
                return Ok(false);
            };

            let result = match choice {
                1 => {
                    let (low, high) = RADIUS_RANGE;
                    let Some(radius) =
                        self.read_integer_in_range("Enter degree of scatter [1 - 100]: ", low, high)?
                    else {
                        return Ok(false);
                    };
                    session.scatter(grid, radius as u32)?
                }
                2 => {
                    let Some(threshold) = self.read_integer_in_range(
                        "Enter threshold for edge detection: ",
                        0,
                        i64::from(u32::MAX),
                    )?
                    else {
                        return Ok(false);
                    };
                    session.edges(grid, threshold as u32)
                }
                3 => match self.green_screen(session, grid)? {
                    Some(out) => out,
                    None => return Ok(false),
                },
                4 => return self.compare(session, grid),
                5 => {
                    let (low, high) = RADIUS_RANGE;
                    let Some(radius) =
                        self.read_integer_in_range("Enter blur radius [1 - 100]: ", low, high)?
                    else {
                        return Ok(false);
                    };
                    session.blur(grid, radius as u32)?
                }
                _ => continue,
            };
            return self.maybe_save(&result);
        }
    }

    fn green_screen(
        &mut self,
        session: &mut Session,
        grid: &PixelGrid,
    ) -> Result<Option<PixelGrid>, AppError> {
        writeln!(self.output, "Now choose another file to add to your background image.")?;
        let Some(sticker) = self.open_image("Enter name of image file to open: ", false)? else {
            return Ok(None);
        };
        let (low, high) = TOLERANCE_RANGE;
        let Some(tolerance) =
            self.read_integer_in_range("Now choose a tolerance threshold: ", low, high)?
        else {
            return Ok(None);
        };
        let Some(at) = self.read_location()? else {
            return Ok(None);
        };
        writeln!(self.output, "You chose {at}")?;

        let params = session.composite_params(at, Some(tolerance as u32), None);
        Ok(Some(session.green_screen(grid, &sticker, params)))
    }

    fn compare(&mut self, session: &mut Session, grid: &PixelGrid) -> Result<bool, AppError> {
        writeln!(self.output, "Now choose another image file to compare to")?;
        let Some(other) = self.open_image("Enter name of image file to open: ", false)? else {
            return Ok(false);
        };
        let report = match session.compare(grid, &other) {
            Ok(report) => report,
            Err(AppError::Diff(e)) => {
                writeln!(self.output, "{e}")?;
                return Ok(true);
            }
            Err(e) => return Err(e),
        };
        writeln!(self.output, "{}", describe_diff(&report))?;
        if report.is_identical() {
            return Ok(true);
        }
        let highlighted = report.highlight(grid)?;
        self.maybe_save_as(
            &highlighted,
            "Enter filename to save difference image (or blank to skip): ",
        )
    }

    fn open_image(&mut self, prompt: &str, allow_blank: bool) -> Prompted<PixelGrid> {
        loop {
            let Some(name) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if name.is_empty() {
                if allow_blank {
                    return Ok(None);
                }
                continue;
            }
            writeln!(self.output, "Opening image file, may take a minute...")?;
            match codec::load(&name) {
                Ok(grid) => return Ok(Some(grid)),
                Err(e) => warn!("{e}"),
            }
        }
    }

    fn maybe_save(&mut self, grid: &PixelGrid) -> Result<bool, AppError> {
        self.maybe_save_as(grid, "Enter filename to save image (or blank to skip saving): ")
    }

    fn maybe_save_as(&mut self, grid: &PixelGrid, prompt: &str) -> Result<bool, AppError> {
        loop {
            let Some(name) = self.read_line(prompt)? else {
                return Ok(false);
            };
            if name.is_empty() {
                return Ok(true);
            }
            match codec::save(grid, &name) {
                Ok(()) => return Ok(true),
                Err(e) => warn!("{e}"),
            }
        }
    }

    fn read_location(&mut self) -> Prompted<Location> {
        loop {
            let Some(line) = self.read_line("Enter location to place image as \"(row,col)\": ")?
            else {
                return Ok(None);
            };
            if line.is_empty() {
                writeln!(self.output, "Mouse placement is not available here; type a location.")?;
                continue;
            }
            match parse_location(&line) {
                Ok(location) => return Ok(Some(location)),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    fn read_integer_in_range(&mut self, prompt: &str, low: i64, high: i64) -> Prompted<i64> {
        loop {
            let Some(value) = self.read_integer(prompt)? else {
                return Ok(None);
            };
            if (low..=high).contains(&value) {
                return Ok(Some(value));
            }
        }
    }

    fn read_integer(&mut self, prompt: &str) -> Prompted<i64> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Illegal integer format. Try again.")?,
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Prompted<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fauxtoshop::grid::{BLACK, WHITE};
    use std::io::Cursor;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fauxtoshop-cli-{}-{name}", std::process::id()))
    }

    fn session() -> Session {
        Session::new(FileConfig::default(), Some(DEFAULT_FIXED_SEED)).unwrap()
    }

    fn run_console(script: &str, session: &mut Session) -> String {
        let mut output = Vec::new();
        Console::new(Cursor::new(script.as_bytes()), &mut output)
            .run(session)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_blank_name_quits() {
        let out = run_console("\n", &mut session());
        assert!(out.contains("Welcome to Fauxtoshop!"));
        assert!(out.ends_with("Exiting.\n"));
    }

    #[test]
    fn test_edge_detection_session_saves_result() {
        let input = temp_path("edges-in.png");
        let output = temp_path("edges-out.png");
        let grid = PixelGrid::from_rows(vec![vec![BLACK, WHITE], vec![WHITE, WHITE]]).unwrap();
        codec::save(&grid, &input).unwrap();

        // bad menu entries are reprompted before choosing 2
        let script = format!(
            "{}\nx\n9\n2\n50\n{}\n\n",
            input.display(),
            output.display()
        );
        let mut session = session();
        let out = run_console(&script, &mut session);
        let saved = codec::load(&output).unwrap();
        let _ = std::fs::remove_file(&input);
        let _ = std::fs::remove_file(&output);

        assert!(out.contains("Illegal integer format. Try again."));
        assert_eq!(saved, PixelGrid::fill(2, 2, BLACK));
        assert!(session
            .metrics
            .encode()
            .unwrap()
            .contains("fauxtoshop_filter_runs_total{filter=\"edges\"} 1"));
    }

    #[test]
    fn test_compare_reports_difference() {
        let first = temp_path("cmp-a.png");
        let second = temp_path("cmp-b.png");
        codec::save(&PixelGrid::fill(2, 2, WHITE), &first).unwrap();
        codec::save(
            &PixelGrid::from_rows(vec![vec![WHITE, BLACK], vec![WHITE, WHITE]]).unwrap(),
            &second,
        )
        .unwrap();

        let script = format!("{}\n4\n{}\n\n\n", first.display(), second.display());
        let out = run_console(&script, &mut session());
        let _ = std::fs::remove_file(&first);
        let _ = std::fs::remove_file(&second);

        assert!(out.contains("These images differ in 1 pixel locations!"));
    }

    #[test]
    fn test_green_screen_location_reprompts() {
        let session = session();
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(&b"\n(1;2)\n(1,2)\n"[..]), &mut output);
        let location = console.read_location().unwrap();
        assert_eq!(location, Some(Location::new(1, 2)));

        let params = session.composite_params(Location::new(1, 2), None, None);
        assert_eq!(params.tolerance, 50);
        assert_eq!((params.offset_row, params.offset_col), (1, 2));
    }

    #[test]
    fn test_cli_parses_green_screen() {
        let cli = Cli::try_parse_from([
            "fauxtoshop",
            "--fixed-seed",
            "green-screen",
            "base.png",
            "sticker.png",
            "--at",
            "(3,4)",
            "--key",
            "#FF00FF",
        ])
        .unwrap();
        assert!(cli.fixed_seed);
        match cli.command {
            Command::GreenScreen { at, key, .. } => {
                assert_eq!(at, Location::new(3, 4));
                assert_eq!(key, Some(fauxtoshop::grid::MAGENTA));
            }
            _ => panic!("expected green-screen"),
        }
    }

    #[test]
    fn test_cli_radius_bounds() {
        for command in ["scatter", "blur"] {
            let cli = Cli::try_parse_from(["fauxtoshop", command, "in.png", "--radius", "100"])
                .unwrap();
            match cli.command {
                Command::Scatter { radius, .. } | Command::Blur { radius, .. } => {
                    assert_eq!(radius, Some(100))
                }
                _ => panic!("expected {command}"),
            }
            for bad in ["0", "101"] {
                assert!(
                    Cli::try_parse_from(["fauxtoshop", command, "in.png", "--radius", bad]).is_err(),
                    "{command} --radius {bad}"
                );
            }
        }
    }

    #[test]
    fn test_interactive_radius_reprompts_above_limit() {
        let mut output = Vec::new();
        let mut console = Console::new(Cursor::new(&b"101
0
100
"[..]), &mut output);
        let (low, high) = RADIUS_RANGE;
        assert_eq!(console.read_integer_in_range("radius: ", low, high).unwrap(), Some(100));
    }

    #[test]
    fn test_cli_rejects_bad_location() {
        let result = Cli::try_parse_from([
            "fauxtoshop",
            "green-screen",
            "a.png",
            "b.png",
            "--at",
            "3,4",
        ]);
        assert!(result.is_err());
    }
}
