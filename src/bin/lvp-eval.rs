use lvp::*;
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

/// Offline LV+LS load value predictor evaluation from a CSV load trace.
#[derive(Parser, Debug)]
#[command(name = "lvp-eval", version)]
struct Args {
    /// CSV with columns: pc,width,value[,eligible,mmio,alias_risk]
    trace: PathBuf,

    /// Number of entries in each predictor table
    #[arg(long, default_value_t = 1024)]
    entries: usize,

    /// Associativity of each predictor table
    #[arg(long, default_value_t = 4)]
    assoc: usize,

    /// Number of low PC bits ignored when indexing
    #[arg(long, default_value_t = 2)]
    idx_shift: u32,

    /// Confidence threshold (0..3)
    #[arg(long, default_value_t = 2)]
    conf: u8,

    /// LS wins if conf_ls >= conf_lv + bias
    #[arg(long, default_value_t = 1)]
    chooser_bias: u8,

    /// Column name for eligibility
    #[arg(long, default_value = "eligible")]
    eligible_field: String,

    /// Optional path to write a JSON summary
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the top-N PCs by used predictions
    #[arg(long, default_value_t = 0)]
    top_pc: usize,
}

fn print_summary(s: &Summary) {
    println!("[*] Global statistics:");
    let counts = [
        ("total_loads", s.total_loads),
        ("eligible_loads", s.eligible_loads),
        ("preds", s.preds),
        ("confident", s.confident),
        ("used", s.used),
        ("correct", s.correct),
    ];
    for (name, val) in counts {
        println!("  {:>18}: {}", name, val);
    }
    let ratios = [
        ("accuracy", s.accuracy),
        ("coverage_overall", s.coverage_overall),
        ("coverage_eligible", s.coverage_eligible),
        ("effective", s.effective),
        ("accuracy_lv", s.accuracy_lv),
        ("accuracy_ls", s.accuracy_ls),
    ];
    for (name, val) in ratios {
        println!("  {:>18}: {:.4}", name, val);
    }
    println!("  {:>18}: {}   {:>10}: {}", "used_lv", s.used_lv, "used_ls", s.used_ls);
}

fn print_top_pcs(stats: &PerAddressStats, n: usize) {
    println!();
    println!("[*] Top {} PCs by used predictions ({} unique):",
        n, stats.num_unique_loads()
    );
    for (pc, d) in stats.top_by_used(n) {
        println!("    {:016x}: total={:6} used={:6} correct={:6} acc={:.3} {}",
            pc, d.total, d.used, d.correct, d.accuracy(), d.recent_pattern(32)
        );
    }
}

fn main() -> LvpResult<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
    let args = Args::parse();

    let cfg = EvalConfig {
        table: TableConfig {
            entries: args.entries,
            assoc: args.assoc,
            idx_shift: args.idx_shift,
        },
        confidence_threshold: args.conf,
        chooser_bias: args.chooser_bias,
        eligibility_field: args.eligible_field,
    };
    let mut eval = cfg.build()?;

    let geometry = eval.lv_table().geometry();
    println!("[*] Predictor configuration:");
    println!("      {} entries per table, {} sets x {} ways",
        geometry.entries, geometry.sets, geometry.assoc
    );
    let storage_bits = eval.lv_table().storage_bits()
        + eval.ls_table().storage_bits();
    println!("      Storage bits: {}b, {:.2}KiB",
        storage_bits, storage_bits as f64 / 1024.0 / 8.0
    );
    println!("      Threshold={} Chooser bias={}",
        cfg.confidence_threshold, cfg.chooser_bias
    );

    let trace = CsvTrace::from_path(&args.trace, &cfg.eligibility_field)?;
    if !trace.has_eligibility() {
        log::info!("No '{}' column, all loads are eligible unless flagged",
            cfg.eligibility_field
        );
    }

    let start = Instant::now();
    eval.run(trace)?;
    log::info!("Simulated in {:.3?}", start.elapsed());

    println!("[*] Table occupancy: LV {}/{}, LS {}/{}",
        eval.lv_table().occupancy(), eval.lv_table().size(),
        eval.ls_table().occupancy(), eval.ls_table().size()
    );

    let report = eval.finish();
    print_summary(&report.summary);
    if args.top_pc > 0 {
        print_top_pcs(&report.per_pc, args.top_pc);
    }

    if let Some(path) = args.json {
        let w = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(w, &report.summary)?;
        log::info!("Wrote summary to {}", path.display());
    }
    Ok(())
}
