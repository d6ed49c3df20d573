//! GSM burst decoder harness
//!
//! Reads one timeslot of raw I/Q samples from a file, runs the
//! classification and demodulation core exactly once, and prints the
//! result.
//!
//! **Usage**:
//! ```bash
//! cargo run --bin trxdec -- -s 1 -t 2 -f burst.iq
//! ```
//!
//! The input file holds `156 × SPS` complex samples as interleaved
//! little-endian f32 values.

use std::fs::File;
use std::io::Read;

use trxdec::tracing_init::init_tracing;
use trxdec::{demodulate_burst, Burst, CorrType, TrxConfig};

struct Options {
    config: TrxConfig,
    filename: String,
}

fn print_help() {
    println!("Options:");
    println!("  -h          This text");
    println!("  -l LEVEL    Logging level (error, warn, info, debug, trace)");
    println!("  -e          Enable EDGE receiver");
    println!("  -s SPS      Samples-per-symbol (1 or 4)");
    println!("  -t TSC      Burst training sequence (0 to 7)");
    println!("  -f FILE     File to read");
}

fn print_config(config: &TrxConfig) {
    println!("Config Settings");
    println!("   Log Level............... {}", config.log_level);
    println!("   Rx Samples-per-Symbol... {}", config.rx_sps);
    println!(
        "   EDGE support............ {}",
        if config.edge { "Enabled" } else { "Disabled" }
    );
    println!("   Burst TSC............... {}", config.rtsc);
    println!();
}

fn handle_options() -> Options {
    let args: Vec<String> = std::env::args().collect();

    let mut config = TrxConfig::default();
    let mut filename = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-l" => {
                i += 1;
                config.log_level = expect_value(&args, i, "-l");
            }
            "-s" => {
                i += 1;
                config.rx_sps = parse_value(&args, i, "-s");
            }
            "-e" => {
                config.edge = true;
            }
            "-t" => {
                i += 1;
                config.rtsc = parse_value(&args, i, "-t");
            }
            "-f" => {
                i += 1;
                filename = Some(expect_value(&args, i, "-f"));
            }
            _ => {
                print_help();
                std::process::exit(0);
            }
        }
        i += 1;
    }

    if let Err(e) = config.validate() {
        println!("{}", e);
        println!();
        print_help();
        std::process::exit(0);
    }

    let Some(filename) = filename else {
        println!("No input file given");
        println!();
        print_help();
        std::process::exit(0);
    };

    Options { config, filename }
}

fn expect_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            println!("Missing value for {}", flag);
            println!();
            print_help();
            std::process::exit(0);
        }
    }
}

fn parse_value(args: &[String], i: usize, flag: &str) -> u32 {
    expect_value(args, i, flag).parse().unwrap_or_else(|_| {
        println!("Invalid value for {}", flag);
        println!();
        print_help();
        std::process::exit(0);
    })
}

fn read_burst(path: &str, sps: u32) -> Result<Burst, String> {
    let mut file = File::open(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("Failed to read '{}': {}", path, e))?;

    let expected = Burst::expected_len(sps) * 8;
    if bytes.len() < expected {
        return Err(format!(
            "'{}' holds {} bytes, need {} for one burst at sps {}",
            path,
            bytes.len(),
            expected,
            sps
        ));
    }

    Burst::from_le_bytes(&bytes[..expected], sps).map_err(|e| e.to_string())
}

fn main() {
    let options = handle_options();
    print_config(&options.config);

    init_tracing(&options.config.log_level);

    let burst = match read_burst(&options.filename, options.config.rx_sps) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let out = demodulate_burst(
        &options.config,
        &burst,
        options.config.rx_sps,
        CorrType::Tsc,
    );

    println!("RSSI: {:.2} dB", out.rssi);

    match out.demod {
        Some(demod) => {
            println!("Type: {}", demod.cor_type);
            println!("Timing offset: {:.2} symbols", demod.timing_offset);

            let hard: String = demod
                .soft_bits
                .iter()
                .map(|&s| if s > 0.0 { '1' } else { '0' })
                .collect();
            println!("Soft bits: {}", demod.soft_bits.len());
            println!("Hard decisions: {}", hard);
        }
        None => println!("No burst demodulated"),
    }
}
