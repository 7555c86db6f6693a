//! 点击聚合性能基准测试

use std::hint::black_box;

use chrono::{Duration, NaiveDate, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use linktally::analytics::{classify_os, summarize_events, summarize_links};
use linktally::storage::{ClickEvent, Link};

const AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) Chrome/120.0 Mobile Safari/537.36",
    "curl/8.4.0",
];

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 生成分布在过去 10 天内的事件，地址约 1/4 重复
fn make_events(n: usize) -> Vec<ClickEvent> {
    let now = Utc::now();
    (0..n)
        .map(|i| {
            ClickEvent::new(
                Some(AGENTS[i % AGENTS.len()].to_string()),
                Some(format!("10.{}.{}.{}", (i / 4) % 256, (i / 1024) % 256, i % 4)),
            )
            .at(now - Duration::hours((i % 240) as i64))
        })
        .collect()
}

fn make_links(count: usize, events_per_link: usize) -> Vec<Link> {
    (0..count)
        .map(|i| {
            let mut link = Link::new(
                format!("code{}", i),
                format!("https://example.com/{}", i),
                "bench@example.com",
                Some("bench".to_string()),
                false,
            );
            link.events = make_events(events_per_link);
            link.click_count = events_per_link as u64;
            link
        })
        .collect()
}

fn bench_summarize_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation/summarize_events");

    for size in [100usize, 10_000, 100_000] {
        let events = make_events(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &events, |b, events| {
            b.iter(|| summarize_events(black_box(events), today()));
        });
    }

    group.finish();
}

fn bench_summarize_links(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation/summarize_links");

    // 同样的事件总量，分散到不同数量的链接
    for (links, per_link) in [(10usize, 10_000usize), (1_000, 100)] {
        let data = make_links(links, per_link);
        group.throughput(Throughput::Elements((links * per_link) as u64));
        group.bench_with_input(
            BenchmarkId::new("links", links),
            &data,
            |b, data| {
                b.iter(|| summarize_links(black_box(data), today()));
            },
        );
    }

    group.finish();
}

fn bench_classify_os(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation/classify_os");
    group.throughput(Throughput::Elements(AGENTS.len() as u64));

    group.bench_function("mixed_agents", |b| {
        b.iter(|| {
            for agent in AGENTS {
                black_box(classify_os(Some(black_box(agent))));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_summarize_events,
    bench_summarize_links,
    bench_classify_os
);
criterion_main!(benches);
