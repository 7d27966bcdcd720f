use awgnsim_core::{
    ber_sweep, run_analog, run_digital, AnalogReport, BerPoint, CodingScheme, DigitalReport,
    ModulationScheme, SimulationConfig,
};
use clap::{Args, Parser, Subcommand};
use hound::WavSpec;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Nominal rate written into WAV headers; frequencies are in cycles/sample
const WAV_SAMPLE_RATE: u32 = 8000;

/// Upper bound on the number of SNR points in one sweep
const MAX_SWEEP_POINTS: usize = 1000;

#[derive(Parser)]
#[command(name = "awgnsim")]
#[command(about = "Simulate a channel corrupted by additive white Gaussian noise")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sine wave through AWGN: measured SNR, zero crossings, phasor statistics
    Analog {
        #[command(flatten)]
        params: SimArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Random bits through the modulated link: BER and Eb/N0
    Digital {
        #[command(flatten)]
        params: SimArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// BER curve over a range of SNR values
    Sweep {
        #[command(flatten)]
        params: SimArgs,

        /// First SNR point (dB)
        #[arg(long, default_value = "0")]
        from: f64,

        /// Last SNR point (dB, inclusive)
        #[arg(long, default_value = "10")]
        to: f64,

        /// SNR increment (dB)
        #[arg(long, default_value = "2")]
        step: f64,

        /// Print the curve as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct SimArgs {
    /// JSON file with simulation parameters; flags override its values
    #[arg(long, value_name = "CONFIG.JSON")]
    config: Option<PathBuf>,

    /// Signal amplitude
    #[arg(short, long)]
    amplitude: Option<f64>,

    /// Sine frequency in cycles per sample
    #[arg(short, long)]
    frequency: Option<f64>,

    /// Number of samples (analog) or bits (digital)
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Target SNR in dB
    #[arg(short, long)]
    snr: Option<f64>,

    /// Noise bandwidth
    #[arg(short, long)]
    bandwidth: Option<f64>,

    /// Bit rate (digital path)
    #[arg(short = 'r', long)]
    bit_rate: Option<f64>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// bpsk, qpsk or qam16
    #[arg(short, long)]
    modulation: Option<ModulationScheme>,

    /// none or convolutional
    #[arg(short, long)]
    coding: Option<CodingScheme>,
}

#[derive(Args)]
struct OutputArgs {
    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Write clean (left) and noisy (right) waveforms to a WAV file
    #[arg(long, value_name = "OUTPUT.WAV")]
    wav: Option<PathBuf>,
}

#[derive(Serialize)]
struct SweepReport<'a> {
    config: &'a SimulationConfig,
    points: &'a [BerPoint],
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analog { params, output } => analog_command(&params, &output)?,
        Commands::Digital { params, output } => digital_command(&params, &output)?,
        Commands::Sweep {
            params,
            from,
            to,
            step,
            json,
        } => sweep_command(&params, from, to, step, json)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_config(args: &SimArgs) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            log::debug!("Loaded config from {}", path.display());
            serde_json::from_str(&text)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(v) = args.amplitude {
        config.amplitude = v;
    }
    if let Some(v) = args.frequency {
        config.frequency = v;
    }
    if let Some(v) = args.samples {
        config.num_samples = v;
    }
    if let Some(v) = args.snr {
        config.snr_db = v;
    }
    if let Some(v) = args.bandwidth {
        config.bandwidth = v;
    }
    if let Some(v) = args.bit_rate {
        config.bit_rate = v;
    }
    if let Some(v) = args.seed {
        config.seed = v;
    }
    if let Some(v) = args.modulation {
        config.modulation = v;
    }
    if let Some(v) = args.coding {
        config.coding = v;
    }

    config.validate()?;
    Ok(config)
}

fn analog_command(params: &SimArgs, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(params)?;
    let report = run_analog(&config)?;

    if let Some(path) = &output.wav {
        write_wav(path, &report.clean, &report.noisy)?;
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_analog(&report);
    }
    Ok(())
}

fn digital_command(params: &SimArgs, output: &OutputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(params)?;
    let report = run_digital(&config)?;

    if let Some(path) = &output.wav {
        write_wav(path, &report.clean, &report.noisy)?;
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_digital(&report);
    }
    Ok(())
}

fn sweep_command(
    params: &SimArgs,
    from: f64,
    to: f64,
    step: f64,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(params)?;
    let snr_points = sweep_points(from, to, step)?;
    let points = ber_sweep(&config, &snr_points)?;

    if json {
        let report = SweepReport {
            config: &config,
            points: &points,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "BER sweep: {} bits, {}, coding {}",
        config.num_samples, config.modulation, config.coding
    );
    println!("{:>10} {:>12} {:>12}", "SNR (dB)", "Eb/N0 (dB)", "BER");
    for point in &points {
        println!(
            "{:>10.2} {:>12.2} {:>12.6}",
            point.snr_db, point.ebn0_db, point.bit_error_rate
        );
    }
    Ok(())
}

/// Inclusive SNR grid `from, from + step, ..` up to `to`
fn sweep_points(from: f64, to: f64, step: f64) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    if !from.is_finite() || !to.is_finite() || !step.is_finite() {
        return Err(format!("SNR range must be finite (got {}..{} step {})", from, to, step).into());
    }
    if !(step > 0.0) {
        return Err(format!("Step must be greater than 0 (got {})", step).into());
    }
    if !(from >= 0.0) || !(to >= from) {
        return Err(format!("Invalid SNR range {}..{}", from, to).into());
    }

    let intervals = ((to - from) / step + 1e-9).floor();
    if !(intervals < MAX_SWEEP_POINTS as f64) {
        return Err(format!(
            "Sweep {}..{} step {} exceeds {} points",
            from, to, step, MAX_SWEEP_POINTS
        )
        .into());
    }

    let count = intervals as usize + 1;
    Ok((0..count).map(|i| from + i as f64 * step).collect())
}

fn print_analog(report: &AnalogReport) {
    let analysis = &report.analysis;
    println!(
        "Generated {} samples (amplitude {}, frequency {})",
        report.clean.len(),
        report.config.amplitude,
        report.config.frequency
    );
    println!("Target SNR: {:.2} dB", report.config.snr_db);
    if analysis.measured_snr_db.is_infinite() {
        println!("Measured SNR: inf dB");
    } else {
        println!("Measured SNR: {:.2} dB", analysis.measured_snr_db);
    }
    println!("Zero Crossings per Second: {:.2}", analysis.zero_crossing_rate);
    println!("Zero Crossing Points: {}", analysis.zero_crossing_indices.len());
    println!(
        "Phasor Statistics: {:.1}% within 1σ, {:.1}% within 2σ, {:.1}% within 3σ",
        analysis.phasor.within_1_sigma * 100.0,
        analysis.phasor.within_2_sigma * 100.0,
        analysis.phasor.within_3_sigma * 100.0
    );
}

fn print_digital(report: &DigitalReport) {
    println!(
        "Transmitted {} bits as {} symbols",
        report.bits.len(),
        report.clean.len()
    );
    println!("Bit Error Rate: {:.4}", report.bit_error_rate);
    println!("Eb/N0: {:.2} dB", report.ebn0_db);
    println!("Modulation: {}", report.config.modulation);
    println!("Coding: {}", report.config.coding);
}

fn write_wav(path: &Path, clean: &[f64], noisy: &[f64]) -> Result<(), Box<dyn std::error::Error>> {
    let spec = WavSpec {
        channels: 2,
        sample_rate: WAV_SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let file = File::create(path)?;
    let mut writer = hound::WavWriter::new(file, spec)?;
    for (&c, &n) in clean.iter().zip(noisy) {
        writer.write_sample(c as f32)?;
        writer.write_sample(n as f32)?;
    }
    writer.finalize()?;

    eprintln!("Wrote {} frames to {}", clean.len(), path.display());
    Ok(())
}
