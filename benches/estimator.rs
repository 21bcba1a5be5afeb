use criterion::{criterion_group, criterion_main, Criterion};
use sick_motion::cue::{CueSource, CueVector};
use sick_motion::motion::{channel_source, MotionEstimator, MotionSample};
use sick_motion::overlay::CueRenderer;

fn bench_estimator(c: &mut Criterion) {
    let samples: Vec<MotionSample> = (0..1_000)
        .map(|i| {
            let t = i as f64 * 0.5;
            MotionSample::new(t, 10.0 + (t * 0.3).sin() * 4.0, Some((t * 7.0) % 360.0))
        })
        .collect();

    c.bench_function("estimator_ingest_1k", |b| {
        b.iter(|| {
            let (_feed, source) = channel_source();
            let mut estimator = MotionEstimator::new(Box::new(source));
            estimator.start(0.0);
            for sample in &samples {
                estimator.ingest(*sample, sample.timestamp);
            }
            estimator.cue()
        })
    });
}

fn bench_renderer(c: &mut Criterion) {
    let mut renderer = CueRenderer::new(2560.0, 1440.0, 0.0);
    renderer.set_target_cue(CueVector::new(12.0, -9.0));
    c.bench_function("renderer_step_1440p", |b| b.iter(|| renderer.step()));
}

criterion_group!(benches, bench_estimator, bench_renderer);
criterion_main!(benches);
