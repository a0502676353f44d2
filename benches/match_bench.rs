use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nextep::matcher::EpisodeMatcher;
use std::path::PathBuf;

fn create_file_list(size: usize) -> Vec<PathBuf> {
    // A mix of naming conventions, plus some unmatched noise
    (0..size)
        .map(|i| {
            let season = (i / 24) + 1;
            let episode = (i % 24) + 1;
            match i % 5 {
                0 => PathBuf::from(format!(
                    "Test Show/Season {:02}/Test Show.s{:02}e{:02}.720p.x264.mkv",
                    season, season, episode
                )),
                1 => PathBuf::from(format!(
                    "Test Show/Season {:02}/Test Show {}x{:02}.mkv",
                    season, season, episode
                )),
                2 => PathBuf::from(format!(
                    "Test Show/Season {:02}/Test Show Episode {:02}.mkv",
                    season, episode
                )),
                3 => PathBuf::from(format!(
                    "Test Show/Season {:02}/Test Show {}{:02}.mkv",
                    season, season, episode
                )),
                _ => PathBuf::from(format!("Test Show/Season {:02}/behind the scenes.mkv", season)),
            }
        })
        .collect()
}

fn bench_match_all_small(c: &mut Criterion) {
    let matcher = EpisodeMatcher::new();
    let files = create_file_list(50);

    c.bench_function("match_all_50_files", |b| {
        b.iter(|| black_box(matcher.match_all(&files)));
    });
}

fn bench_match_all_large(c: &mut Criterion) {
    let matcher = EpisodeMatcher::new();
    let files = create_file_list(500);

    c.bench_function("match_all_500_files", |b| {
        b.iter(|| black_box(matcher.match_all(&files)));
    });
}

fn bench_match_largest(c: &mut Criterion) {
    let matcher = EpisodeMatcher::new();
    let files = create_file_list(500);

    c.bench_function("match_largest_500_files", |b| {
        b.iter(|| black_box(matcher.match_largest(&files)));
    });
}

criterion_group!(
    benches,
    bench_match_all_small,
    bench_match_all_large,
    bench_match_largest
);
criterion_main!(benches);
