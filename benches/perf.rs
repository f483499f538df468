use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use wc_snapshot::flags::merge_flags;
use wc_snapshot::ingest::parse_matches_json;

fn sample_payload(matches: usize) -> String {
    let group = (0..matches)
        .map(|idx| {
            format!(
                r#"{{"n_MatchID":{},"b_Finished":true,"b_Live":false,"c_Date":"2018-07-06 21:00","c_City":"Kazan","c_CountryShort":"RUS","c_Phase_en":"Group","c_HomeNatioShort":"BRA","c_AwayNatioShort":"CRO","c_HomeLogoImage":"","c_AwayLogoImage":"","n_HomeGoals":3,"n_AwayGoals":1,"c_Stadium":"Kazan Arena"}}"#,
                300_186_000 + idx
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!(r#"{{"data":{{"group":[{group}]}}}}"#)
}

fn sample_art(rows: usize) -> String {
    let mut out = String::new();
    for _ in 0..rows {
        out.push_str(&"\x1b[38;2;0;151;57m#".repeat(40));
        out.push_str("\x1b[0m\n");
    }
    out
}

fn bench_parse_matches(c: &mut Criterion) {
    let raw = sample_payload(64);
    c.bench_function("parse_matches_json", |b| {
        b.iter(|| {
            let entries = parse_matches_json(black_box(&raw));
            black_box(entries.len());
        })
    });
}

fn bench_merge_flags(c: &mut Criterion) {
    let home = sample_art(20);
    let away = sample_art(20);
    c.bench_function("merge_flags", |b| {
        b.iter(|| {
            let merged = merge_flags(black_box(&home), black_box(&away));
            black_box(merged.len());
        })
    });
}

criterion_group!(benches, bench_parse_matches, bench_merge_flags);
criterion_main!(benches);
