use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rf_smith::cascade::{render_chart, RenderSettings};
use rf_smith::schematic::{CircuitElement, ElementKind, GlobalConfig, Schematic};

fn build_matching_chain(tolerance: f64) -> Schematic {
    let mut config = GlobalConfig::single_ended(50.0, 28.0, 1.0e9);
    config.span = 2.0;
    let mut sch = Schematic::new(config);
    sch.push(
        CircuitElement::lumped(
            ElementKind::SeriesInductor,
            vec![20.0, 300.0],
            vec!["Q".into(), "pH".into()],
            tolerance,
        )
        .unwrap(),
    )
    .unwrap();
    sch.push(
        CircuitElement::lumped(
            ElementKind::ShuntCapacitor,
            vec![0.0, 150.0],
            vec!["Q".into(), "fF".into()],
            tolerance,
        )
        .unwrap(),
    )
    .unwrap();
    sch.push(CircuitElement::line(ElementKind::TransmissionLine, 500.0, "um", 75.0, 0.0).unwrap())
        .unwrap();
    sch.push(CircuitElement::line(ElementKind::ShortedStub, 300.0, "um", 60.0, 0.0).unwrap())
        .unwrap();
    sch
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_chart");
    let settings = RenderSettings::default();

    for (label, tol) in [("nominal", 0.0), ("with_corners", 10.0)] {
        group.bench_function(BenchmarkId::new("chain", label), |b| {
            b.iter_batched(
                || build_matching_chain(tol),
                |sch| {
                    let _ = render_chart(&sch, &settings).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
