use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic surface profile (headerless, one height per row).
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Number of height samples.
    #[arg(long, default_value_t = 4096)]
    samples: usize,

    /// Seed of the roughness noise.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output CSV path.
    #[arg(long, default_value = "sample_profile.csv")]
    output: PathBuf,
}

/// Long-wavelength form plus waviness, roughness noise and a few scratches.
fn generate_profile(n: usize, rng: &mut SimpleRng) -> Vec<f64> {
    let scratches: Vec<(f64, f64)> = (0..3)
        .map(|_| (rng.next_f64() * n as f64, 0.5 + rng.next_f64()))
        .collect();

    (0..n)
        .map(|i| {
            let x = i as f64;
            let form = 0.8 * (2.0 * PI * x / n as f64).sin();
            let waviness = 0.3 * (2.0 * PI * x / 256.0).sin();
            let roughness = rng.gauss(0.0, 0.05);
            let scratch: f64 = scratches
                .iter()
                .map(|&(center, depth)| -depth * (-(x - center).powi(2) / 8.0).exp())
                .sum();
            form + waviness + roughness + scratch
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let profile = generate_profile(args.samples, &mut rng);

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for height in &profile {
        writer
            .write_record([format!("{height:.6}")])
            .context("writing profile row")?;
    }
    writer.flush().context("flushing profile CSV")?;

    log::info!("Generated profile with seed {}", args.seed);
    println!(
        "Wrote {} samples to {}",
        profile.len(),
        args.output.display()
    );
    Ok(())
}
