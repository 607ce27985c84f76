//! Benchmarks for flattening and page lookup.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pw_sitemap::{PageNode, PageTable, flatten};

/// Create a sitemap with specified depth and breadth.
fn create_site_map(depth: usize, breadth: usize) -> Vec<PageNode<String>> {
    fn create_level(
        prefix: &str,
        current_depth: usize,
        max_depth: usize,
        breadth: usize,
    ) -> Vec<PageNode<String>> {
        if current_depth > max_depth {
            return Vec::new();
        }

        (0..breadth)
            .map(|i| {
                let url = format!("{prefix}/section-{i}");
                let items = create_level(&url, current_depth + 1, max_depth, breadth);
                PageNode::new(format!("Section {i}"), url.clone())
                    .with_component("Section")
                    .with_items(items)
            })
            .collect()
    }

    create_level("", 1, depth, breadth)
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for (depth, breadth) in [(2, 10), (3, 5), (5, 3)] {
        let site_map = create_site_map(depth, breadth);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{depth}_b{breadth}")),
            &site_map,
            |b, site_map| b.iter(|| flatten(site_map)),
        );
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let table = PageTable::new(&create_site_map(3, 5));

    let mut group = c.benchmark_group("page_lookup");

    group.bench_function("find_hit_first", |b| b.iter(|| table.find("/section-0")));

    group.bench_function("find_hit_deep", |b| {
        b.iter(|| table.find("/section-4/section-4/section-4"))
    });

    group.bench_function("find_miss", |b| b.iter(|| table.find("/nonexistent/path")));

    group.bench_function("breadcrumbs", |b| {
        b.iter(|| table.breadcrumbs("/section-4/section-4/section-4"))
    });

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_lookup);
criterion_main!(benches);
