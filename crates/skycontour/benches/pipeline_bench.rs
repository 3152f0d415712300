//! Criterion benchmark for a full event: mixed kept, dropped, and jagged rings.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Vector2;
use skycontour::pipeline::{EventInput, Pipeline};
use skycontour::ring::Winding;
use skycontour::synth::{circle, draw_ring_radial, grid_snap, square_ccw, RadialCfg, ReplayToken};
use skycontour::PipelineCfg;

fn synthetic_event(features: usize, seed: u64) -> EventInput {
    let mut rings = Vec::with_capacity(features);
    for k in 0..features {
        let ring = match k % 3 {
            0 => {
                let cfg = RadialCfg {
                    vertices: 120,
                    center: Vector2::new(30.0 * k as f64, 0.0),
                    radius: 12.0,
                    ..RadialCfg::default()
                };
                let r = draw_ring_radial(cfg, ReplayToken { seed, index: k as u64 }).unwrap();
                grid_snap(&r, 0.8).unwrap()
            }
            1 => square_ccw(Vector2::new(0.0, 50.0), 1.5).unwrap(),
            _ => circle(Vector2::new(-60.0, 20.0), 7.0, 300, Winding::CounterClockwise).unwrap(),
        };
        rings.push(ring.to_pairs());
    }
    EventInput {
        ident: Some(format!("S{seed:06}")),
        peak_gps: Some(1_240_000_000 + seed as i64),
        features: rings,
    }
}

fn bench_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let p = Pipeline::new(PipelineCfg::default()).unwrap();
    for &features in &[1usize, 6, 24] {
        let input = synthetic_event(features, 17);
        group.bench_with_input(
            BenchmarkId::new("process_event", features),
            &input,
            |b, input| {
                b.iter(|| {
                    let _r = p.process_event(input).unwrap();
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_event);
criterion_main!(benches);
