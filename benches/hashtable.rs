use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashbrown::HashMap;
use probetable::{identify_source, Backend, FrequencyModel, Hashtable};

const ITER: u64 = 8 * 1024;

fn sample_text(len: usize) -> String {
    const WORDS: [&str; 8] = [
        "four", "score", "and", "seven", "years", "ago", "our", "fathers",
    ];
    let mut text = String::with_capacity(len + 8);
    let mut i = 0usize;
    while text.len() < len {
        text.push_str(WORDS[(i * 7 + i / 3) % WORDS.len()]);
        text.push(' ');
        i += 1;
    }
    text
}

fn task_insert_hashtable_str_u64() -> Hashtable {
    let mut map = Hashtable::new(57, 0, 0.5, 2.0).unwrap();
    for i in 0..ITER {
        map.set(&i.to_string(), i + 7);
    }
    map
}

fn insert_hashtable_str_u64(c: &mut Criterion) {
    let _ = tracing_subscriber::fmt().try_init();
    let mut group = c.benchmark_group("insert_hashtable_str_u64");
    group.throughput(Throughput::Elements(ITER));
    group.bench_function("hashtable", |b| b.iter(task_insert_hashtable_str_u64));
    group.finish();
}

fn get_hashtable_str_u64(c: &mut Criterion) {
    let map = task_insert_hashtable_str_u64();
    let keys: Vec<String> = (0..ITER).map(|i| i.to_string()).collect();

    let mut group = c.benchmark_group("get_hashtable_str_u64");
    group.throughput(Throughput::Elements(ITER));
    group.bench_function("hashtable", |b| {
        b.iter(|| {
            for (i, key) in keys.iter().enumerate() {
                assert_eq!(map.get(key), i as u64 + 7);
            }
        })
    });
    group.finish();
}

fn train_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("train_model");

    for len in [1_000usize, 10_000] {
        let text = sample_text(len);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("hashtable", len), &text, |b, text| {
            b.iter(|| FrequencyModel::new(4, text).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("hashbrown", len), &text, |b, text| {
            b.iter(|| FrequencyModel::with_table(4, text, HashMap::<String, u64>::new()).unwrap())
        });
    }

    group.finish();
}

fn identify(c: &mut Criterion) {
    let a = sample_text(5_000);
    let b = sample_text(4_000).replace("seven", "eight");
    let unknown = sample_text(500);

    let mut group = c.benchmark_group("identify_source");
    for k in 1..=6 {
        for backend in [Backend::Hashtable, Backend::HashMap] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", backend), k),
                &k,
                |bench, &k| bench.iter(|| identify_source(&a, &b, &unknown, k, backend).unwrap()),
            );
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    insert_hashtable_str_u64,
    get_hashtable_str_u64,
    train_model,
    identify
);
criterion_main!(benches);
