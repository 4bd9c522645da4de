use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use clap::{Parser, Subcommand};
use grain_visualiser_core::{
    params, source::samples_per_tick, CanvasSurface, DrawCommand, GrainEngine, GrainVizError,
    ParameterSignal, PlaybackClock, RecordingSurface, SyntheticGrainSource, TickScheduler,
    VisualiserConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> grain_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => run_simulate(&args),
        Commands::Config { fading } => print_config(fading),
    }
}

fn run_simulate(args: &SimulateArgs) -> grain_visualiser_core::Result<()> {
    let mut config = match &args.config {
        Some(path) => VisualiserConfig::from_json_file(path)?,
        None => VisualiserConfig::default(),
    };
    config.seed = config.seed.or(Some(args.seed));
    tracing::info!(
        ticks = args.ticks,
        density = args.density,
        duration_ms = args.duration_ms,
        realtime = args.realtime,
        "starting simulation"
    );

    let samples = samples_per_tick(config.sample_rate, config.refresh_rate_ms);
    let mut engine = GrainEngine::running(config.clone())?;
    let mut source = SyntheticGrainSource::new(args.density, args.duration_ms, args.seed);
    params::forward(&mut source, args.set.iter().copied());

    let mut surface = RecordingSurface::new(config.canvas_width, config.canvas_height);
    let mut step = |tick: u64| -> Vec<DrawCommand> {
        for event in source.process(samples) {
            engine.ingest(event);
        }
        let report = engine.tick(&mut surface);
        if tick % 25 == 0 {
            tracing::debug!(
                tick,
                live = engine.grains().len(),
                pruned = report.pruned,
                "frame"
            );
        }
        surface.take_commands()
    };

    let mut clock = PlaybackClock::new();
    let mut last_frame = Vec::new();
    if args.realtime {
        let mut scheduler = TickScheduler::new(config.tick_interval());
        let mut last = Instant::now();
        let mut tick = 0;
        while tick < args.ticks {
            let now = Instant::now();
            let due = scheduler.advance(now - last);
            clock.advance(now - last);
            last = now;
            for _ in 0..due {
                if tick == args.ticks {
                    break;
                }
                last_frame = step(tick);
                tick += 1;
            }
            thread::sleep(scheduler.until_next());
        }
    } else {
        for tick in 0..args.ticks {
            last_frame = step(tick);
            clock.advance(config.tick_interval());
        }
    }

    tracing::info!(
        total_grains = engine.total_grains_added(),
        live_grains = engine.grains().len(),
        elapsed_ms = clock.elapsed().as_millis() as u64,
        "simulation finished"
    );

    if let Some(path) = &args.frame {
        write_frame(path, &config, &last_frame)?;
    }
    if let Some(path) = &args.commands {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &last_frame)?;
        tracing::info!(?path, commands = last_frame.len(), "wrote draw commands");
    }
    Ok(())
}

fn write_frame(
    path: &Path,
    config: &VisualiserConfig,
    commands: &[DrawCommand],
) -> grain_visualiser_core::Result<()> {
    let mut canvas = CanvasSurface::new(config.canvas_width, config.canvas_height)?;
    for command in commands {
        command.apply(&mut canvas);
    }
    canvas.write_ppm(BufWriter::new(File::create(path)?))?;
    tracing::info!(?path, "wrote frame");
    Ok(())
}

fn print_config(fading: bool) -> grain_visualiser_core::Result<()> {
    let config = if fading {
        VisualiserConfig::fading()
    } else {
        VisualiserConfig::default()
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn parse_signal(raw: &str) -> grain_visualiser_core::Result<ParameterSignal> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| GrainVizError::msg(format!("expected NAME=VALUE, got `{raw}`")))?;
    let value: f32 = value
        .trim()
        .parse()
        .map_err(|err| GrainVizError::msg(format!("invalid value for `{name}`: {err}")))?;
    ParameterSignal::from_name(name.trim(), value)
        .ok_or_else(|| GrainVizError::msg(format!("unknown parameter `{name}`")))
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrolling visualiser for granular synthesis events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Feed synthetic grain events through the visualiser.
    Simulate(SimulateArgs),
    /// Print a configuration file with default values.
    Config {
        /// Emit the thin, fading grain style instead.
        #[arg(long)]
        fading: bool,
    },
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// JSON configuration file. Missing fields use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of redraws to run.
    #[arg(long, default_value_t = 250)]
    ticks: u64,
    /// Seed for grain onsets, and for colors unless the config sets one.
    #[arg(long, default_value_t = 10)]
    seed: u64,
    /// Grain onset density.
    #[arg(long, default_value_t = 50.0)]
    density: f32,
    /// Duration reported for every grain.
    #[arg(long, default_value_t = 70.0)]
    duration_ms: f32,
    /// Granulator parameter updates, e.g. `--set density=20`.
    #[arg(long = "set", value_parser = parse_signal)]
    set: Vec<ParameterSignal>,
    /// Pace redraws in wall-clock time instead of running flat out.
    #[arg(long)]
    realtime: bool,
    /// Write the last frame as a binary PPM image.
    #[arg(long)]
    frame: Option<PathBuf>,
    /// Write the last frame's draw commands as JSON.
    #[arg(long)]
    commands: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parameter_signals() {
        assert_eq!(
            parse_signal("wet_dry=0.4").unwrap(),
            ParameterSignal::WetDry(0.4)
        );
        assert!(parse_signal("density").is_err());
        assert!(parse_signal("density=fast").is_err());

        let err = parse_signal("reverb=1").unwrap_err();
        assert!(matches!(err, GrainVizError::Message(_)));
        assert_eq!(err.to_string(), "unknown parameter `reverb`");
    }

    #[test]
    fn rejects_unknown_signal_on_the_command_line() {
        let err = Cli::try_parse_from(["grain-visualiser", "simulate", "--set", "reverb=1"])
            .unwrap_err();
        assert!(err.to_string().contains("unknown parameter `reverb`"));
    }

    #[test]
    fn simulate_writes_frame_and_commands() {
        let dir = std::env::temp_dir();
        let id = std::process::id();
        let config_path = dir.join(format!("grain-visualiser-sim-{id}.json"));
        let frame_path = dir.join(format!("grain-visualiser-sim-{id}.ppm"));
        let commands_path = dir.join(format!("grain-visualiser-sim-{id}-commands.json"));
        let config = VisualiserConfig {
            canvas_width: 200,
            canvas_height: 100,
            sample_rate: 4000,
            min_grain_duration_ms: 50.0,
            ..VisualiserConfig::default()
        };
        std::fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

        let cli = Cli::try_parse_from([
            "grain-visualiser",
            "simulate",
            "--config",
            config_path.to_str().unwrap(),
            "--ticks",
            "12",
            "--set",
            "density=20",
            "--frame",
            frame_path.to_str().unwrap(),
            "--commands",
            commands_path.to_str().unwrap(),
        ])
        .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let outcome = run_simulate(&args);
        let frame = std::fs::read(&frame_path);
        let commands = std::fs::read_to_string(&commands_path);
        for path in [&config_path, &frame_path, &commands_path] {
            let _ = std::fs::remove_file(path);
        }
        outcome.unwrap();

        let frame = frame.unwrap();
        let header = b"P6\n200 100\n255\n";
        assert_eq!(&frame[..header.len()], header);
        assert_eq!(frame.len(), header.len() + 200 * 100 * 3);

        let commands: Vec<DrawCommand> = serde_json::from_str(&commands.unwrap()).unwrap();
        assert_eq!(commands.first(), Some(&DrawCommand::Clear));
        assert!(commands.len() >= 3);
        assert!(commands
            .iter()
            .any(|command| matches!(command, DrawCommand::FillRect { .. })));
    }

    #[test]
    fn cli_accepts_simulate_flags() {
        let cli = Cli::try_parse_from([
            "grain-visualiser",
            "simulate",
            "--ticks",
            "10",
            "--set",
            "duration=120",
        ])
        .unwrap();

        match cli.command {
            Commands::Simulate(args) => {
                assert_eq!(args.ticks, 10);
                assert_eq!(args.set, vec![ParameterSignal::Duration(120.0)]);
                assert!(!args.realtime);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
