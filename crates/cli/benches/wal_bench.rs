use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::tempdir;
use wal::{WalReader, WalWriter};

const N_RECORDS: usize = 10_000;
const VALUE_SIZE: usize = 100;

fn wal_append_and_sync_benchmark(c: &mut Criterion) {
    c.bench_function("wal_append_and_sync_10k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let path = dir.path().join("bench.log");
                let writer = WalWriter::open(&path, true).unwrap();
                (dir, writer)
            },
            |(_dir, mut writer)| {
                for i in 0..N_RECORDS {
                    let key = format!("key{}", i).into_bytes();
                    let value = vec![b'x'; VALUE_SIZE];
                    writer.append_and_sync(&key, &value).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn wal_append_without_fsync_benchmark(c: &mut Criterion) {
    c.bench_function("wal_append_no_fsync_10k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let path = dir.path().join("bench.log");
                let writer = WalWriter::open(&path, false).unwrap();
                (dir, writer)
            },
            |(_dir, mut writer)| {
                for i in 0..N_RECORDS {
                    let key = format!("key{}", i).into_bytes();
                    let value = vec![b'x'; VALUE_SIZE];
                    writer.append_and_sync(&key, &value).unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });
}

fn wal_replay_benchmark(c: &mut Criterion) {
    c.bench_function("wal_replay_10k", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().unwrap();
                let path = dir.path().join("bench.log");
                let mut writer = WalWriter::open(&path, false).unwrap();
                for i in 0..N_RECORDS {
                    let key = format!("key{}", i).into_bytes();
                    let value = vec![b'x'; VALUE_SIZE];
                    writer.append_and_sync(&key, &value).unwrap();
                }
                writer.sync_to_disk().unwrap();
                (dir, path)
            },
            |(_dir, path)| {
                let mut reader = WalReader::open(&path).unwrap();
                let summary = reader.replay(|_key, _value| {}).unwrap();
                assert_eq!(summary.records_applied, N_RECORDS as u64);
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    wal_append_and_sync_benchmark,
    wal_append_without_fsync_benchmark,
    wal_replay_benchmark
);
criterion_main!(benches);
