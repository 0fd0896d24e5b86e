use std::env;
use std::process::ExitCode;
use std::time::Instant;

use lantern_cpu::{Image, Lantern, RenderConfig, Result};
use log::{error, info};

fn run() -> Result<()> {
    // 설정 파일이 없으면 기본 장면을 그림
    let config = match env::args_os().nth(1) {
        Some(path) => RenderConfig::from_path(path)?,
        None => RenderConfig::default(),
    };

    let scene = config.scene();
    let camera = config.camera.build(config.width, config.height);

    // 출력 이미지는 카메라 방향 표와 같은 크기여야 함
    let (width, height) = camera.viewport_size();
    let mut lantern = Lantern::with_settings(Image::new(width, height, "Lantern Output"), config.settings);

    info!(
        "rendering {} sphere(s) at {}x{}, {} frame(s), {:?} ({} sample(s) per pixel)",
        scene.spheres.len(),
        width,
        height,
        config.frames.max(1),
        config.settings.supersampling,
        config.settings.supersampling.samples_per_pixel()
    );

    let started = Instant::now();
    for _ in 0..config.frames.max(1) {
        lantern.render(&scene, &camera);
    }
    info!("rendered in {:.2?}", started.elapsed());

    lantern.final_image().save(&config.output)?;
    info!("wrote {}", config.output.display());

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
