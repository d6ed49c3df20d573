//! GSM burst simulator
//!
//! Generate a single burst of raw I/Q samples for feeding the decoder:
//! normal, access or EDGE burst with adjustable amplitude, sample delay
//! and additive noise.
//!
//! **Usage**:
//! ```bash
//! cargo run --bin burstsim -- -t tsc -c 2 -s 1 output.iq
//! ```
//!
//! Options:
//!   -t, --type <tsc|rach|edge>   Burst type (default: tsc)
//!   -c, --tsc <0-7>              Training sequence index (default: 0)
//!   -s, --sps <1|4>              Samples per symbol (default: 1)
//!   -a, --amp <factor>           Amplitude scale (default: 1.0)
//!   -d, --delay <samples>        Delay in samples (default: 0)
//!   -n, --noise <sigma>          AWGN per-rail deviation (default: 0)
//!   -h, --help                   Show this help message

use std::fs::File;
use std::io::Write;

use trxdec::synth;

struct SimConfig {
    burst_type: String,
    tsc: u32,
    sps: u32,
    amplitude: f32,
    delay: usize,
    noise_sigma: f32,
    output_path: String,
}

impl SimConfig {
    fn parse_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();

        let mut burst_type = "tsc".to_string();
        let mut tsc = 0u32;
        let mut sps = 1u32;
        let mut amplitude = 1.0f32;
        let mut delay = 0usize;
        let mut noise_sigma = 0.0f32;
        let mut output_path = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-t" | "--type" => {
                    i += 1;
                    burst_type = value(&args, i, "--type")?;
                }
                "-c" | "--tsc" => {
                    i += 1;
                    tsc = value(&args, i, "--tsc")?
                        .parse()
                        .map_err(|_| format!("Invalid TSC value: {}", args[i]))?;
                }
                "-s" | "--sps" => {
                    i += 1;
                    sps = value(&args, i, "--sps")?
                        .parse()
                        .map_err(|_| format!("Invalid SPS value: {}", args[i]))?;
                }
                "-a" | "--amp" => {
                    i += 1;
                    amplitude = value(&args, i, "--amp")?
                        .parse()
                        .map_err(|_| format!("Invalid amplitude: {}", args[i]))?;
                }
                "-d" | "--delay" => {
                    i += 1;
                    delay = value(&args, i, "--delay")?
                        .parse()
                        .map_err(|_| format!("Invalid delay: {}", args[i]))?;
                }
                "-n" | "--noise" => {
                    i += 1;
                    noise_sigma = value(&args, i, "--noise")?
                        .parse()
                        .map_err(|_| format!("Invalid noise sigma: {}", args[i]))?;
                }
                "-h" | "--help" => {
                    print_help(&args[0]);
                    std::process::exit(0);
                }
                arg if !arg.starts_with('-') => {
                    if output_path.is_none() {
                        output_path = Some(arg.to_string());
                    } else {
                        return Err(format!("Unexpected argument: {}", arg));
                    }
                }
                arg => return Err(format!("Unknown option: {}", arg)),
            }
            i += 1;
        }

        if sps != 1 && sps != 4 {
            return Err(format!("Unsupported samples-per-symbol {}", sps));
        }
        if tsc > 7 {
            return Err(format!("Invalid training sequence {}", tsc));
        }
        if burst_type == "edge" && sps != 4 {
            return Err("EDGE bursts need 4 samples per symbol".to_string());
        }

        let output_path = output_path.ok_or_else(|| "Missing output file".to_string())?;

        Ok(Self {
            burst_type,
            tsc,
            sps,
            amplitude,
            delay,
            noise_sigma,
            output_path,
        })
    }
}

fn value(args: &[String], i: usize, flag: &str) -> Result<String, String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| format!("Missing value for {}", flag))
}

fn print_help(program: &str) {
    println!("Usage: {} [OPTIONS] <output.iq>", program);
    println!();
    println!("Options:");
    println!("  -t, --type <tsc|rach|edge>   Burst type (default: tsc)");
    println!("  -c, --tsc <0-7>              Training sequence index (default: 0)");
    println!("  -s, --sps <1|4>              Samples per symbol (default: 1)");
    println!("  -a, --amp <factor>           Amplitude scale (default: 1.0)");
    println!("  -d, --delay <samples>        Delay in samples (default: 0)");
    println!("  -n, --noise <sigma>          AWGN per-rail deviation (default: 0)");
    println!("  -h, --help                   Show this help message");
}

fn main() {
    let config = match SimConfig::parse_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            print_help("burstsim");
            std::process::exit(1);
        }
    };

    let mut rng = rand::rng();

    let burst = match config.burst_type.as_str() {
        "tsc" => synth::normal_burst(config.tsc, config.sps, &mut rng),
        "rach" => synth::rach_burst(config.sps, &mut rng),
        "edge" => synth::edge_burst(config.tsc, config.sps, &mut rng),
        other => {
            eprintln!("Unknown burst type: {}", other);
            std::process::exit(1);
        }
    };

    let mut burst = synth::delay(&synth::scale(&burst, config.amplitude), config.delay);
    synth::add_noise(&mut burst, config.noise_sigma, &mut rng);

    let bytes = burst.to_le_bytes();
    match File::create(&config.output_path).and_then(|mut f| f.write_all(&bytes)) {
        Ok(()) => {
            println!(
                "Wrote {} burst ({} samples) to {}",
                config.burst_type,
                burst.len(),
                config.output_path
            );
        }
        Err(e) => {
            eprintln!("Failed to write '{}': {}", config.output_path, e);
            std::process::exit(1);
        }
    }
}
