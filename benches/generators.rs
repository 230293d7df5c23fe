use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maze_carver::{
    generators,
    grid_dimensions::MazeSize,
    pathing::Distances,
};

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    let size = MazeSize::square(32).unwrap();
    let mut rng = generators::seeded_rng(32);
    c.bench_function("recursive_backtracker_maze_32", move |b| {
        b.iter(|| generators::generate(size, &mut rng))
    });
}

fn bench_recursive_backtracker_maze_256(c: &mut Criterion) {
    let size = MazeSize::square(256).unwrap();
    let mut rng = generators::seeded_rng(256);
    c.bench_function("recursive_backtracker_maze_256", move |b| {
        b.iter(|| generators::generate(size, &mut rng))
    });
}

fn bench_recursive_backtracker_with_progress_maze_256(c: &mut Criterion) {
    let size = MazeSize::square(256).unwrap();
    let mut rng = generators::seeded_rng(256);
    c.bench_function("recursive_backtracker_with_progress_maze_256", move |b| {
        b.iter(|| generators::recursive_backtracker(size, &mut rng, |p| {
            black_box(p);
        }))
    });
}

fn bench_distances_maze_256(c: &mut Criterion) {
    let maze = generators::generate(MazeSize::square(256).unwrap(), &mut generators::seeded_rng(7));
    let start = maze.start().unwrap();
    c.bench_function("distances_maze_256", move |b| {
        b.iter(|| Distances::new(maze.grid(), start))
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_256,
    bench_recursive_backtracker_with_progress_maze_256,
    bench_distances_maze_256
);
criterion_main!(benches);
