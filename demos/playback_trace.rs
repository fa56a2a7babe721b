use stagecraft::{
    Director, HeadlessSurface, ManualClock, ManualFrameScheduler, Performer, SnapshotOptions,
    StageFixture,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let fixture = StageFixture::from_json_str(include_str!("data/stage.json"))?;
    let canvas = fixture.canvas;

    let clock = ManualClock::new();
    let frames = ManualFrameScheduler::new();
    let mut director = Director::new(
        Box::new(HeadlessSurface::new(canvas).with_background([16, 16, 24, 255])),
        Box::new(frames.clone()),
    )
    .with_clock(Box::new(clock.clone()));

    pollster::block_on(async {
        director.ready().await?;
        for performer in fixture.into_performers()? {
            director.hire(Box::new(performer)).await?;
        }
        director.flush_loads().await;
        Ok::<_, stagecraft::StagecraftError>(())
    })?;

    director.play();
    let mut frame = 0u32;
    while frames.take_pending().is_some() {
        clock.advance(1000.0 / 30.0);
        director.on_frame();
        frame += 1;
        if frame % 15 != 0 {
            continue;
        }
        println!("t={:>7.1}ms", director.current_time());
        for id in director.visible_ids() {
            if let Some(p) = director.performer(&id) {
                let t = p.rendered_transform();
                println!(
                    "  {id:<10} pos=({:>6.1},{:>6.1}) scale=({:.2},{:.2}) rot={:>6.1} alpha={:.2}",
                    t.x,
                    t.y,
                    t.scale_x,
                    t.scale_y,
                    t.rotation,
                    t.alpha()
                );
            }
        }
    }
    println!("ended at {}ms after {frame} frames", director.current_time());

    let url = director.snapshot(&SnapshotOptions::default())?;
    println!("snapshot: {} bytes of data URL", url.len());
    Ok(())
}
