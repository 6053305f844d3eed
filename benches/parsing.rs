//! Criterion benchmarks for request URI parsing.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use restconf_uri::{
    LocationBuilder, QueryParams, ResourceAddress, classify, parse_list_instance, parse_path,
};

/// Benchmark: parse_path with varying shapes
fn bench_parse_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_path");

    let test_cases = [
        ("root", "/"),
        ("single", "/example-jukebox:jukebox"),
        ("nested", "/example-jukebox:jukebox/library/artist/album/song"),
        (
            "list_keys",
            "/example-jukebox:jukebox/library/artist=Foo%20Fighters/album=Wasting%20Light",
        ),
        (
            "quoted_keys",
            "/ietf-routing:routing/route=\"10.0.0.0,24\",'default',42,true",
        ),
        ("module_switch", "/a:top/b:augment/c:deeper/leaf"),
    ];

    for (name, path) in test_cases {
        group.throughput(Throughput::Bytes(path.len() as u64));
        group.bench_with_input(BenchmarkId::new("path", name), &path, |b, path| {
            b.iter(|| parse_path(black_box(path)));
        });
    }

    group.finish();
}

/// Benchmark: parse_list_instance with growing key counts
fn bench_list_instance(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_instance");

    for count in [1, 2, 4, 8, 16] {
        let keys: Vec<String> = (0..count)
            .map(|i| match i % 4 {
                0 => format!("name{i}"),
                1 => i.to_string(),
                2 => "'quoted,value'".to_string(),
                _ => "true".to_string(),
            })
            .collect();
        let segment = format!("entry={}", keys.join(","));

        group.bench_with_input(BenchmarkId::new("keys", count), &segment, |b, segment| {
            b.iter(|| parse_list_instance(None, black_box(segment)));
        });
    }

    group.finish();
}

/// Benchmark: full request classification
fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    let test_cases = [
        ("root", "/restconf"),
        ("datastore", "/restconf/data/example-jukebox:jukebox/library"),
        ("operations", "/restconf/operations/example-ops:reboot"),
        (
            "absolute_with_query",
            "https://device.example.com:8443/restconf/data/ietf-interfaces:interfaces/interface=eth0?depth=2&content=config",
        ),
    ];

    for (name, url) in test_cases {
        group.throughput(Throughput::Bytes(url.len() as u64));
        group.bench_with_input(BenchmarkId::new("url", name), &url, |b, url| {
            b.iter(|| classify(black_box(url), "GET", "restconf"));
        });
    }

    group.finish();
}

/// Benchmark: ResourceAddress::starts_with at varying depths
fn bench_starts_with(c: &mut Criterion) {
    let mut group = c.benchmark_group("starts_with");

    for depth in [1, 2, 4, 8, 16] {
        let segments: Vec<&str> = (0..depth)
            .map(|i| match i % 4 {
                0 => "alpha",
                1 => "beta",
                2 => "gamma=1,x",
                _ => "delta",
            })
            .collect();

        let path = ResourceAddress::parse(&format!("/m:{}", segments.join("/")));
        let prefix_depth = (depth / 2).max(1);
        let prefix = ResourceAddress::parse(&format!("/m:{}", segments[..prefix_depth].join("/")));

        group.bench_with_input(
            BenchmarkId::new("depth", depth),
            &(path, prefix),
            |b, (path, prefix)| {
                b.iter(|| black_box(path).starts_with(black_box(prefix)));
            },
        );
    }

    group.finish();
}

/// Benchmark: Location header construction
fn bench_location(c: &mut Criterion) {
    let mut group = c.benchmark_group("location");

    let address = parse_path("/example-jukebox:jukebox/library/artist=Foo%20Fighters/album=1");
    group.bench_function("from_address", |b| {
        b.iter(|| black_box(&address).location("restconf"));
    });

    group.bench_function("with_builder", |b| {
        b.iter(|| {
            LocationBuilder::new()
                .try_top(black_box("example-jukebox"), "jukebox")
                .expect("valid identifiers")
                .try_child("library")
                .expect("valid identifier")
                .try_list("artist", [black_box("Foo Fighters")])
                .expect("valid list")
                .location("restconf")
        });
    });

    group.bench_function("query_parse", |b| {
        b.iter(|| {
            QueryParams::parse(black_box(
                "depth=3&content=config&fields=a(b;c)&with-defaults=trim",
            ))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_path,
    bench_list_instance,
    bench_classify,
    bench_starts_with,
    bench_location,
);
criterion_main!(benches);
