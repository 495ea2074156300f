use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use tabstate::{Session, StateManager, StateValue};

fn manager_creation_benchmark(c: &mut Criterion) {
    let session = Session::new();

    c.bench_function("manager_creation", |b| {
        b.iter(|| StateManager::in_session(session.clone(), black_box("example_tab")));
    });
}

fn init_rerun_benchmark(c: &mut Criterion) {
    let state = StateManager::in_session(Session::new(), "example_tab");

    c.bench_function("init_rerun", |b| {
        b.iter(|| {
            black_box(state.init([
                ("selected_option", StateValue::from("A")),
                ("threshold", StateValue::from(0.5_f64)),
                ("auto_refresh", StateValue::from(false)),
            ]));
        });
    });
}

fn get_benchmark(c: &mut Criterion) {
    let state = StateManager::in_session(Session::new(), "example_tab");
    state.set("threshold", 0.5_f64);

    c.bench_function("get", |b| {
        b.iter(|| {
            black_box(state.get(black_box("threshold")));
        });
    });
}

fn set_benchmark(c: &mut Criterion) {
    let state = StateManager::in_session(Session::new(), "example_tab");

    c.bench_function("set", |b| {
        let mut i = 0_u64;
        b.iter(|| {
            state.set("counter", black_box(i));
            i += 1;
        });
    });
}

fn copy_from_tab_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("copy_from_tab");

    for key_count in [1, 10, 100].iter() {
        let session = Session::new();
        let source = StateManager::in_session(session.clone(), "source");
        for key in 0..*key_count {
            source.set(format!("key_{key}"), key);
        }
        let target = StateManager::in_session(session, "target");

        group.bench_with_input(BenchmarkId::from_parameter(key_count), key_count, |b, _| {
            b.iter(|| black_box(target.copy_from_tab("source")));
        });
    }
    group.finish();
}

fn watched_set_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("watched_set");

    for watcher_count in [1, 10, 100].iter() {
        let state = StateManager::in_session(Session::new(), "example_tab");
        let _subscriptions: Vec<_> = (0..*watcher_count)
            .map(|_| {
                state.watch(|_| {
                    // Empty watcher
                })
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(watcher_count),
            watcher_count,
            |b, _| {
                let mut i = 0_u64;
                b.iter(|| {
                    state.set("counter", black_box(i));
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    manager_creation_benchmark,
    init_rerun_benchmark,
    get_benchmark,
    set_benchmark,
    copy_from_tab_benchmark,
    watched_set_benchmark,
);
criterion_main!(benches);
