use bmshv_core::config::MonitorConfig;
use bmshv_core::telemetry::{TelemetryDecoder, TelemetrySchema};
use bmshv_core::view::build_view;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn full_pack_line() -> String {
    let join = |values: Vec<String>| values.join(",");
    let cells = join((0..135).map(|i| format!("{:.3}", 3.6 + (i % 40) as f64 * 0.01)).collect());
    let temps = join((0..45).map(|i| format!("{:.1}", 22.0 + (i % 9) as f64)).collect());
    let discharge = join((0..135).map(|i| ((i % 17 == 0) as u8).to_string()).collect());

    format!(
        concat!(
            r#"{{"current":-4.2,"acc_voltage":520.1,"car_voltage":519.8,"soc":[0.71,0.72,0.7],"#,
            r#""cell_voltage":[{}],"temperature":[{}],"discharge":[{}],"balance":1,"charging":1,"#,
            r#""under_voltage":[0,0],"over_voltage":[0,0],"under_temperature":[0,0],"#,
            r#""over_temperature":[0,0],"over_current":[0,0],"current_sensor_disconnected":[0,0],"#,
            r#""timestamp":987654}}"#
        ),
        cells, temps, discharge
    )
}

fn bench_pipeline(c: &mut Criterion) {
    let config = MonitorConfig::default();
    let decoder = TelemetryDecoder::new(TelemetrySchema::from_features(&config.features));
    let line = full_pack_line();

    c.bench_function("decode_full_pack", |b| {
        b.iter(|| decoder.decode(black_box(&line)))
    });

    let snapshot = decoder.decode(&line).expect("bench line decodes");
    c.bench_function("build_view_full_pack", |b| {
        b.iter(|| build_view(black_box(&snapshot), &config))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
