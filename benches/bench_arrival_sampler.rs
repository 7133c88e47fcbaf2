// benches/bench_arrival_sampler.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use junction_signals::ArrivalSampler;
use std::time::Duration;

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrival_sampler");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    // Slider range is 0..=25; the larger rates should cost the same as 25.
    for &lambda in [0.0, 5.0, 10.0, 25.0, 1000.0, 1e12].iter() {
        group.bench_function(format!("lambda_{}", lambda), |b| {
            let mut sampler = ArrivalSampler::seeded(1);
            let rates = [lambda; 4];
            b.iter(|| black_box(sampler.sample(black_box(&rates)).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sample);
criterion_main!(benches);
