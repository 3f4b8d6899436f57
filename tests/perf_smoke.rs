use pagefall_engine::World;

#[test]
fn perf_smoke_frame() {
    let mut world = World::new();
    world.enable_perf_metrics(true);
    world.add_obstacle(-50.0, 30.0, 50.0, 32.0);
    for i in 0..100 {
        world.spawn_body((i % 10) as f32 * 2.0, (i / 10) as f32 * 2.0, 0.4, 0.4);
    }
    for _ in 0..60 {
        world.frame_advance(1.0 / 60.0);
    }
    let stats = world.get_perf_stats();
    assert!(stats.frame_ms() >= 0.0);
    assert_eq!(stats.body_count(), 100);
}
