//! # Simplified3D CLI
//!
//! One subcommand per pattern generator, plus `parse` for reading coordinates
//! back out of a G-code file. Geometry flags default to the control panel
//! values; feeds and heights not given on the command line come from the
//! settings file.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use simplified3d_camtools::{
    CleanBlockGenerator, CleanBlockParameters, CleanSweep, CommandSink, PrintBlockGenerator,
    PrintBlockParameters, PrintCylinderGenerator, PrintCylinderParameters, PrintLayer0Generator,
    PrintLayer0Parameters, PrintZigZagGenerator, PrintZigZagParameters, RotateAxisGenerator,
    RotateAxisParameters, RotateGenerator, RotateParameters, SlicerGenerator, SlicerParameters,
    UltrasoundState, WriterSink,
};
use simplified3d_parser::parse_program;
use simplified3d_settings::Config;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// G-code pattern generator for ultrasonic additive printing
#[derive(Parser, Debug)]
#[command(name = "simplified3d")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (TOML or JSON); defaults to the user config directory
    #[arg(short, long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Write output to this file instead of standard output
    #[arg(short, long, global = true, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Waveform applied to the path (default, sawtooth, square)
    #[arg(short, long, global = true, value_name = "TAG")]
    pub waveform: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean the nozzle with the tool engaged
    CleanBlock(CleanArgs),

    /// Clean without a tool; every move is rapid
    CleanNoToolBlock(CleanArgs),

    /// Lift, rotate the tool and print one block
    PrintBlock {
        #[arg(long, default_value_t = 10.0)]
        x: f64,
        #[arg(long, default_value_t = 10.0)]
        y: f64,
        #[arg(long)]
        z: Option<f64>,
        /// Tool angle on the A axis (degrees)
        #[arg(long, default_value_t = 0.0)]
        angle: f64,
        /// Travel without depositing
        #[arg(long)]
        no_deposition: bool,
        /// Step mode
        #[arg(long)]
        step: bool,
        /// Ultrasound is on before the block
        #[arg(long)]
        ultrasound: bool,
    },

    /// Print a ring approximated by line segments
    PrintCylinder {
        #[arg(long, default_value_t = 10.0)]
        x: f64,
        #[arg(long, default_value_t = 10.0)]
        y: f64,
        #[arg(long)]
        z: Option<f64>,
        #[arg(long, default_value_t = 5.0)]
        radius: f64,
        #[arg(long, default_value_t = 36)]
        segments: usize,
        #[arg(long, default_value_t = 1200.0)]
        feed: f64,
    },

    /// Print a single first-layer line
    PrintLayer0 {
        #[arg(long, default_value_t = 0.0)]
        x_start: f64,
        #[arg(long, default_value_t = 0.0)]
        y_start: f64,
        #[arg(long, default_value_t = 20.0)]
        x_end: f64,
        #[arg(long, default_value_t = 0.0)]
        y_end: f64,
        #[arg(long)]
        z: Option<f64>,
        #[arg(long, default_value_t = 1000.0)]
        feed: f64,
    },

    /// Print a zig-zag raster
    PrintZigzag {
        #[arg(long, default_value_t = 0.0)]
        x_start: f64,
        #[arg(long, default_value_t = 20.0)]
        x_end: f64,
        #[arg(long, default_value_t = 10.0)]
        y: f64,
        #[arg(long)]
        z: Option<f64>,
        #[arg(long, default_value_t = 10)]
        passes: usize,
        #[arg(long, default_value_t = 1000.0)]
        feed: f64,
        /// Distance between rows (mm)
        #[arg(long, default_value_t = 0.2)]
        row_spacing: f64,
    },

    /// Signal a rotation by moving to an offset waypoint
    Rotate {
        /// Current angle (degrees)
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        /// Rotation to apply (degrees)
        #[arg(long, default_value_t = 90.0)]
        by: f64,
        #[arg(long, default_value_t = 10.0)]
        x: f64,
        #[arg(long, default_value_t = 10.0)]
        y: f64,
        #[arg(long)]
        z: Option<f64>,
        #[arg(long, default_value_t = 1200.0)]
        feed: f64,
    },

    /// Rotate the A axis directly
    RotateAxis {
        /// Current angle (degrees)
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        /// Rotation to apply (degrees)
        #[arg(long, default_value_t = 90.0)]
        by: f64,
    },

    /// Print one boundary line per layer of a bounding box
    Slicer {
        /// Object height (mm)
        #[arg(long, default_value_t = 1.0)]
        z_height: f64,
        #[arg(long, default_value_t = 0.2)]
        layer_thickness: f64,
        /// Fill density (percent)
        #[arg(long, default_value_t = 20.0)]
        fill_density: f64,
        #[arg(long, default_value_t = 0.4)]
        nozzle_diameter: f64,
        #[arg(long, default_value_t = 0.0)]
        x_min: f64,
        #[arg(long, default_value_t = 20.0)]
        x_max: f64,
        #[arg(long, default_value_t = 0.0)]
        y_min: f64,
        #[arg(long, default_value_t = 20.0)]
        y_max: f64,
    },

    /// Report X, Y and Z for every line of a G-code file
    Parse {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Flags shared by the cleaning commands
#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[arg(long, default_value_t = 0.0)]
    pub x: f64,
    #[arg(long, default_value_t = 0.0)]
    pub y: f64,
    #[arg(long)]
    pub z: Option<f64>,
    /// Approach feed rate
    #[arg(long)]
    pub feed: Option<f64>,
    /// Dwell (ms)
    #[arg(long)]
    pub delay: Option<f64>,
    /// Sweep to this X after the approach
    #[arg(long, requires = "y_end")]
    pub x_end: Option<f64>,
    /// Sweep to this Y after the approach
    #[arg(long, requires = "x_end")]
    pub y_end: Option<f64>,
    /// Sweep feed rate
    #[arg(long)]
    pub sweep_feed: Option<f64>,
}

impl CleanArgs {
    fn parameters(
        &self,
        config: &Config,
        waveform: &str,
        feed: f64,
        delay: f64,
    ) -> CleanBlockParameters {
        let params = CleanBlockParameters {
            x_value: self.x,
            y_value: self.y,
            z_value: self.z.unwrap_or(config.machine.z_value),
            z_feed: self.feed.unwrap_or(feed),
            delay_time: self.delay.unwrap_or(delay),
            sweep: None,
        };
        match (self.x_end, self.y_end) {
            (Some(x_end), Some(y_end)) => params.with_sweep(CleanSweep {
                x_end,
                y_end,
                feedrate: self.sweep_feed.unwrap_or(config.machine.g1_xy_feed),
                waveform: waveform.to_string(),
                amplitude: config.waveform.amplitude,
                subdivisions: config.waveform.subdivisions,
            }),
            _ => params,
        }
    }
}

/// Load the settings named on the command line, or the user's settings file.
pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("Failed to load settings from {}", path.display())),
            Err(_) => Ok(Config::default()),
        },
    }
}

fn open_output(path: Option<&Path>, append: bool) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let opened = if append {
                OpenOptions::new().create(true).append(true).open(path)
            } else {
                File::create(path)
            };
            let file = opened.with_context(|| format!("Failed to open output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Run the selected command, returning a one-line summary for the user.
pub fn run(cli: &Cli, config: &Config) -> Result<String> {
    let output_path = cli.output.as_deref().or(config.output.path.as_deref());
    let mut sink = WriterSink::new(open_output(output_path, config.output.append)?);

    let summary = execute(cli, config, &mut sink)?;
    let lines = sink.lines_written();
    sink.into_inner().flush().context("Failed to flush output")?;

    info!("Wrote {} lines", lines);
    Ok(summary)
}

/// Run the selected command against an arbitrary sink.
pub fn execute(cli: &Cli, config: &Config, sink: &mut dyn CommandSink) -> Result<String> {
    let waveform = cli
        .waveform
        .clone()
        .unwrap_or_else(|| config.waveform.default_waveform.clone());
    let machine = &config.machine;

    let summary = match &cli.command {
        Commands::CleanBlock(args) => {
            let params =
                args.parameters(config, &waveform, machine.clean_feed, machine.clean_dwell);
            params.validate()?;
            CleanBlockGenerator::new(params).generate(sink)?;
            "Clean block generated".to_string()
        }
        Commands::CleanNoToolBlock(args) => {
            let params = args.parameters(
                config,
                &waveform,
                machine.clean_no_tool_feed,
                machine.clean_no_tool_dwell,
            );
            params.validate()?;
            CleanBlockGenerator::without_tool(params).generate(sink)?;
            "Clean no-tool block generated".to_string()
        }
        Commands::PrintBlock {
            x,
            y,
            z,
            angle,
            no_deposition,
            step,
            ultrasound,
        } => {
            let params = PrintBlockParameters {
                z_value: z.unwrap_or(machine.z_value),
                g0_xy_feed: machine.g0_xy_feed,
                g1_xy_feed: machine.g1_xy_feed,
                waveform,
                deposition: !no_deposition,
                x_value: *x,
                y_value: *y,
                vertical_lift: machine.vertical_lift,
                delay_time: machine.delay_time,
                step_button: *step,
                z_feed: machine.z_feed,
                next_tool_angle: *angle,
                a_feed: machine.a_feed,
            };
            params.validate()?;
            let state =
                PrintBlockGenerator::new(params).generate(sink, UltrasoundState(*ultrasound))?;
            format!(
                "Block generated, ultrasound {}",
                if state.is_on() { "on" } else { "off" }
            )
        }
        Commands::PrintCylinder {
            x,
            y,
            z,
            radius,
            segments,
            feed,
        } => {
            let params = PrintCylinderParameters {
                x_center: *x,
                y_center: *y,
                z_value: z.unwrap_or(machine.z_value),
                radius: *radius,
                segments: *segments,
                feedrate: *feed,
                waveform,
            };
            params.validate()?;
            PrintCylinderGenerator::new(params).generate(sink)?;
            format!("Cylinder generated with {} segments", segments)
        }
        Commands::PrintLayer0 {
            x_start,
            y_start,
            x_end,
            y_end,
            z,
            feed,
        } => {
            let params = PrintLayer0Parameters {
                x_start: *x_start,
                y_start: *y_start,
                x_end: *x_end,
                y_end: *y_end,
                z_value: z.unwrap_or(machine.z_value),
                feedrate: *feed,
                waveform,
                amplitude: config.waveform.amplitude,
            };
            params.validate()?;
            PrintLayer0Generator::new(params).generate(sink)?;
            "Layer0 line generated".to_string()
        }
        Commands::PrintZigzag {
            x_start,
            x_end,
            y,
            z,
            passes,
            feed,
            row_spacing,
        } => {
            let params = PrintZigZagParameters {
                x_start: *x_start,
                x_end: *x_end,
                y_value: *y,
                z_value: z.unwrap_or(machine.z_value),
                passes: *passes,
                feedrate: *feed,
                waveform,
                row_spacing: *row_spacing,
                amplitude: config.waveform.amplitude,
            };
            params.validate()?;
            PrintZigZagGenerator::new(params).generate(sink)?;
            format!("ZigZag generated with {} passes", passes)
        }
        Commands::Rotate {
            current,
            by,
            x,
            y,
            z,
            feed,
        } => {
            let params = RotateParameters {
                current_angle: *current,
                rotate_by: *by,
                x_value: *x,
                y_value: *y,
                z_value: z.unwrap_or(machine.z_value),
                feedrate: *feed,
            };
            params.validate()?;
            let angle = RotateGenerator::new(params).generate(sink)?;
            format!("Rotated to {} degrees", angle)
        }
        Commands::RotateAxis { current, by } => {
            let params = RotateAxisParameters {
                current_angle: *current,
                rotate_by: *by,
                a_feed: machine.a_feed,
                waveform,
                steps: config.waveform.rotation_steps,
                overshoot: config.waveform.rotation_overshoot,
            };
            params.validate()?;
            let angle = RotateAxisGenerator::new(params).generate(sink)?;
            format!("A axis rotated to {} degrees", angle)
        }
        Commands::Slicer {
            z_height,
            layer_thickness,
            fill_density,
            nozzle_diameter,
            x_min,
            x_max,
            y_min,
            y_max,
        } => {
            let params = SlicerParameters {
                z_height: *z_height,
                fill_density: *fill_density,
                layer_thickness: *layer_thickness,
                nozzle_diameter: *nozzle_diameter,
                g0_feed: machine.g0_xy_feed,
                g1_feed: machine.g1_xy_feed,
                x_min: *x_min,
                x_max: *x_max,
                y_min: *y_min,
                y_max: *y_max,
                waveform,
                amplitude: config.waveform.amplitude,
            };
            params.validate()?;
            let layers = SlicerGenerator::new(params).generate(sink)?;
            format!("Sliced {} layers", layers)
        }
        Commands::Parse { input, json } => {
            let bytes = std::fs::read(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let report = parse_program(&String::from_utf8_lossy(&bytes));
            if *json {
                sink.write_line(&serde_json::to_string_pretty(&report)?)?;
            } else {
                for entry in &report {
                    sink.write_line(&entry.to_string())?;
                }
            }
            format!("Parsed {} coordinate lines", report.len())
        }
    };

    Ok(summary)
}
