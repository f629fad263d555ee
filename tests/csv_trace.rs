use lvp::*;

fn evaluate(csv: &str, cfg: &EvalConfig) -> Report {
    let trace = CsvTrace::from_reader(csv.as_bytes(), &cfg.eligibility_field)
        .unwrap();
    let mut eval = cfg.build().unwrap();
    eval.run(trace).unwrap();
    eval.finish()
}

fn small_config() -> EvalConfig {
    EvalConfig {
        table: TableConfig { entries: 16, assoc: 4, idx_shift: 2 },
        confidence_threshold: 2,
        chooser_bias: 1,
        ..Default::default()
    }
}

#[test]
fn stride_trace() {
    let csv = "pc,width,value\n\
        0x400,4,10\n0x400,4,20\n0x400,4,30\n0x400,4,40\n0x400,4,50\n\
        0x400,4,60\n0x400,4,70\n";
    let s = evaluate(csv, &small_config()).summary;
    assert_eq!(s.total_loads, 7);
    assert!(s.preds >= 3);
    assert!(s.used >= 2);
    assert_eq!(s.accuracy, 1.0);
    assert_eq!(s.used_ls, s.used);
}

#[test]
fn malformed_rows_do_not_count() {
    let csv = "pc,width,value\n\
        0x400,4,7\n\
        nope,4,7\n\
        0x400,5,7\n\
        0x400,4,\n\
        0x400,4,7\n";
    let s = evaluate(csv, &small_config()).summary;
    assert_eq!(s.total_loads, 2);
    assert_eq!(s.preds, 1);
}

#[test]
fn hex_width_and_value_rows_are_skipped() {
    let csv = "pc,width,value\n0x400,4,0x10\n0x400,0x4,16\n";
    let s = evaluate(csv, &small_config()).summary;
    assert_eq!(s.total_loads, 0);
    assert_eq!(s.preds, 0);
}

#[test]
fn oversized_values_still_count() {
    let csv = "pc,width,value\n0x400,4,18446744073709551621\n0x400,4,18446744073709551621\n";
    let s = evaluate(csv, &small_config()).summary;
    assert_eq!(s.total_loads, 2);
    assert_eq!(s.preds, 1);
}

#[test]
fn mmio_loads_are_never_used() {
    let mut csv = String::from("pc,width,value,mmio\n");
    for _ in 0..32 {
        csv.push_str("0x80,8,51966,1\n");
    }
    let cfg = EvalConfig { confidence_threshold: 0, ..small_config() };
    let report = evaluate(&csv, &cfg);
    assert_eq!(report.summary.total_loads, 32);
    assert_eq!(report.summary.eligible_loads, 0);
    assert_eq!(report.summary.used, 0);
    assert_eq!(report.per_pc.get(0x80).unwrap().used, 0);
}

#[test]
fn missing_columns_is_fatal() {
    let res = CsvTrace::from_reader("pc,width\n0x10,4\n".as_bytes(), "eligible");
    assert!(matches!(res, Err(TraceError::MissingColumns { .. })));
}

#[test]
fn top_pcs() {
    let mut csv = String::from("pc,width,value\n");
    for _ in 0..8 {
        csv.push_str("0x100,4,1\n0x200,4,2\n0x300,4,3\n");
    }
    // 0x200 is seen twice as often
    for _ in 0..8 {
        csv.push_str("0x200,4,2\n");
    }
    let cfg = EvalConfig { confidence_threshold: 1, ..small_config() };
    let report = evaluate(&csv, &cfg);
    let top: Vec<u64> = report.per_pc.top_by_used(3).iter()
        .map(|(pc, _)| *pc)
        .collect();
    assert_eq!(top, vec![0x200, 0x100, 0x300]);
}

#[test]
fn repeated_runs_match() {
    let mut csv = String::from("pc,width,value,eligible\n");
    for i in 0..500u64 {
        let pc = 0x1000 + (i % 37) * 4;
        let value = if i % 3 == 0 { i * 8 } else { i % 5 };
        csv.push_str(&format!("{:#x},8,{},{}\n", pc, value, (i % 11 != 0) as u8));
    }
    let cfg = EvalConfig {
        table: TableConfig { entries: 24, assoc: 2, idx_shift: 2 },
        ..small_config()
    };
    let a = evaluate(&csv, &cfg).summary;
    let b = evaluate(&csv, &cfg).summary;
    assert_eq!(a, b);
    assert_eq!(a.total_loads, 500);
    assert_eq!(a.confident, a.used);
}
