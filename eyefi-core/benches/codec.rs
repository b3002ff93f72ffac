use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eyefi_core::{LogHeader, LogLayout, ScannedNetworkList};
use eyefi_types::{Essid, NetType, ScannedNetwork};

fn full_scan_list() -> Vec<u8> {
    let list = ScannedNetworkList {
        networks: (0..100)
            .map(|i| ScannedNetwork {
                essid: Essid::new(format!("network-{i:03}")).unwrap(),
                strength: -(i as i8 % 90),
                net_type: NetType::from((i % 4) as u8),
            })
            .collect(),
    };
    list.encode().to_vec()
}

fn bench_scan_list_decode(c: &mut Criterion) {
    let raw = full_scan_list();
    c.bench_function("decode full scan list", |b| {
        b.iter(|| ScannedNetworkList::decode(black_box(&raw)).unwrap())
    });
}

fn bench_wrapped_log_plan(c: &mut Criterion) {
    let header = LogHeader {
        log_end: 1000,
        log_start: 200_000,
    };
    c.bench_function("plan wrapped log", |b| {
        b.iter(|| {
            let layout = LogLayout::new(black_box(header), 262_144).unwrap();
            layout.chunk_offsets()
        })
    });
}

criterion_group!(benches, bench_scan_list_decode, bench_wrapped_log_plan);
criterion_main!(benches);
