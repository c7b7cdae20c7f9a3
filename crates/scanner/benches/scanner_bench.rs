//! 스캐너 벤치마크
//!
//! 윈도우 생성, 토큰 매칭, 파일 스캔 처리량을 측정합니다.

use std::io::Write;

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use logwatch_core::config::PatternMode;
use logwatch_core::types::WindowKey;
use logwatch_scanner::{FileTextSearch, SearchToken, TextSearch, WindowGenerator};

const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 매칭되는 라인
const HIT_LINE: &str = "2024-01-01 10:00:05 ERROR disk full on /dev/sda1 (98% used)";

/// 매칭되지 않는 라인
const MISS_LINE: &str = "2024-01-01 09:12:44 INFO request completed status=200 duration_ms=12";

fn bench_window_generation(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 30).unwrap();
    let mut group = c.benchmark_group("window_generation");

    for interval in [5u32, 60, 1440] {
        let generator = WindowGenerator::new("Asia/Seoul", MINUTE_FORMAT, interval).unwrap();
        group.throughput(Throughput::Elements(u64::from(interval)));
        group.bench_with_input(BenchmarkId::from_parameter(interval), &now, |b, now| {
            b.iter(|| generator.generate_at(black_box(*now)))
        });
    }

    group.finish();
}

fn bench_token_match(c: &mut Criterion) {
    let key = WindowKey::new("2024-01-01 10:00");
    let literal = SearchToken::build(&key, "ERROR", PatternMode::Literal).unwrap();
    let regex = SearchToken::build(&key, "ERROR|FATAL|panic", PatternMode::Regex).unwrap();

    let mut group = c.benchmark_group("token_match");
    group.throughput(Throughput::Elements(1));

    group.bench_function("literal_hit", |b| b.iter(|| literal.is_match(black_box(HIT_LINE))));
    group.bench_function("literal_miss", |b| {
        b.iter(|| literal.is_match(black_box(MISS_LINE)))
    });
    group.bench_function("regex_hit", |b| b.iter(|| regex.is_match(black_box(HIT_LINE))));

    group.finish();
}

fn bench_file_search(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..10_000 {
        let line = if i % 100 == 0 { HIT_LINE } else { MISS_LINE };
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();

    let generator = WindowGenerator::new("UTC", MINUTE_FORMAT, 5).unwrap();
    let window = generator.generate_at(Utc.with_ymd_and_hms(2024, 1, 1, 10, 1, 30).unwrap());
    let tokens: Vec<SearchToken> = window
        .keys
        .iter()
        .map(|k| SearchToken::build(k, "ERROR", PatternMode::Literal).unwrap())
        .collect();
    let search = FileTextSearch::default();

    let mut group = c.benchmark_group("file_search");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("10k_lines_5_windows", |b| {
        b.iter(|| {
            runtime
                .block_on(search.search(black_box(file.path()), black_box(&tokens)))
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_window_generation,
    bench_token_match,
    bench_file_search
);
criterion_main!(benches);
