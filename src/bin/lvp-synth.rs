use clap::Parser;
use rand::prelude::*;
use rand::distributions::{ WeightedIndex, WeightedError, Distribution };
use std::path::PathBuf;

/// Generate a synthetic CSV load trace with a known mix of value patterns.
#[derive(Parser, Debug)]
#[command(name = "lvp-synth", version)]
struct Args {
    /// Output CSV path
    output: PathBuf,

    /// Number of load records to emit
    #[arg(long, default_value_t = 100_000)]
    loads: usize,

    /// Number of distinct load instructions
    #[arg(long, default_value_t = 256)]
    pcs: usize,

    /// Fraction of loads flagged as MMIO or alias-risk
    #[arg(long, default_value_t = 0.05)]
    hazard_rate: f64,

    /// Seed for the random number generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// The behavior of values returned by a synthetic load.
#[derive(Clone, Copy, Debug)]
enum ValuePattern {
    /// Always the same value
    Constant(u64),

    /// `base + i * stride` on the i-th execution
    Strided { base: u64, stride: u64 },

    /// Cycles between two values
    Alternating(u64, u64),

    /// No structure at all
    Random,
}
impl ValuePattern {
    fn value(&self, ctr: u64, rng: &mut impl Rng) -> u64 {
        match self {
            Self::Constant(v) => *v,
            Self::Strided { base, stride } => {
                base.wrapping_add(ctr.wrapping_mul(*stride))
            },
            Self::Alternating(a, b) => if ctr % 2 == 0 { *a } else { *b },
            Self::Random => rng.gen(),
        }
    }
}

/// A synthetic load instruction.
struct SynthLoad {
    pc: u64,
    width: u8,
    pat: ValuePattern,
    ctr: u64,
}

fn build_loads(num: usize, rng: &mut StdRng)
    -> Result<Vec<SynthLoad>, WeightedError>
{
    let widths = [1u8, 2, 4, 8];
    let strides = [1u64, 4, 8, 16, 64];
    let kinds = WeightedIndex::new([4, 3, 1, 2])?;
    let loads = (0..num).map(|i| {
        let pat = match kinds.sample(rng) {
            0 => ValuePattern::Constant(rng.gen_range(0..0x1_0000)),
            1 => ValuePattern::Strided {
                base: rng.gen_range(0..0x1000_0000),
                stride: strides[rng.gen_range(0..strides.len())],
            },
            2 => ValuePattern::Alternating(rng.gen(), rng.gen()),
            _ => ValuePattern::Random,
        };
        SynthLoad {
            pc: 0x40_0000 + (i as u64) * 4,
            width: widths[rng.gen_range(0..widths.len())],
            pat,
            ctr: 0,
        }
    }).collect();
    Ok(loads)
}

/// Pick the index of the next load to execute, skewed towards low indices
/// like a hot loop.
fn pick_load(num: usize, rng: &mut impl Rng) -> usize {
    let last = num - 1;
    let idx = (rng.gen::<f64>().powi(2) * num as f64) as usize;
    idx.min(last)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
    let args = Args::parse();
    if args.pcs == 0 {
        return Err("--pcs must be nonzero".into());
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut loads = build_loads(args.pcs, &mut rng)?;

    let mut writer = csv::Writer::from_path(&args.output)?;
    writer.write_record(["pc", "width", "value", "eligible", "mmio", "alias_risk"])?;

    let mut hazards = 0usize;
    for _ in 0..args.loads {
        let idx = pick_load(loads.len(), &mut rng);
        let ld = &mut loads[idx];
        let value = ld.pat.value(ld.ctr, &mut rng);
        ld.ctr += 1;

        let hazard = rng.gen_bool(args.hazard_rate.clamp(0.0, 1.0));
        let (mmio, alias) = match (hazard, rng.gen::<bool>()) {
            (false, _) => (0, 0),
            (true, true) => (1, 0),
            (true, false) => (0, 1),
        };
        if hazard { hazards += 1; }

        writer.write_record(&[
            format!("{:#x}", ld.pc),
            ld.width.to_string(),
            value.to_string(),
            "1".to_string(),
            mmio.to_string(),
            alias.to_string(),
        ])?;
    }
    writer.flush()?;

    log::info!("Wrote {} loads from {} PCs ({} flagged) to {}",
        args.loads, args.pcs, hazards, args.output.display()
    );
    Ok(())
}
