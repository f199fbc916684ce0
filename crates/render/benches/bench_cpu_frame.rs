use std::hint::black_box;
use std::time::Instant;

use papillon_common::{FrameParams, Resolution};
use papillon_render::{FrameTimer, Preset, Renderer};
use papillon_sdf::DistanceField;

fn bench_field(preset: Preset, samples: usize) {
    let config = preset.config();
    let Ok(scene) = config.scene() else {
        println!("  {preset}: invalid preset");
        return;
    };

    let start = Instant::now();
    let mut acc = 0.0_f32;
    for i in 0..samples {
        let x = (i % 97) as f32 / 97.0 - 0.5;
        let y = (i % 89) as f32 / 89.0 - 0.5;
        acc += scene.distance(black_box(glam::Vec3::new(x, y, 0.0)), black_box(1.0));
    }
    black_box(acc);
    let elapsed = start.elapsed();
    let per_eval = elapsed / samples as u32;
    println!("  field eval ({preset}, {samples} samples): {per_eval:?}/eval, total {elapsed:?}");
}

fn bench_frame(preset: Preset, resolution: Resolution, frames: usize) {
    let config = preset.config();
    let Ok(scene) = config.scene() else {
        return;
    };
    let renderer = config.renderer();
    let mut timer = FrameTimer::new(frames);

    for i in 0..frames {
        let params = FrameParams::new(resolution, i as f32 / 30.0);
        let out = renderer.render(black_box(&scene), &params);
        timer.record(out.elapsed);
    }
    println!(
        "  frame ({preset}, {}x{}, {frames} frames): avg {:?}, min {:?}, max {:?}, {:.1} fps",
        resolution.width,
        resolution.height,
        timer.average(),
        timer.min(),
        timer.max(),
        timer.fps()
    );
}

fn main() {
    println!("=== CPU Frame Benchmarks ===\n");

    println!("Distance field:");
    for preset in Preset::ALL {
        bench_field(preset, 100_000);
    }

    println!("\nFull frames:");
    for preset in Preset::ALL {
        bench_frame(preset, Resolution::new(160, 90), 10);
        bench_frame(preset, Resolution::new(320, 180), 5);
    }

    println!("\nDone.");
}
