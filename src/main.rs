use eyetype::config::Config;
use eyetype::logging::{init_tracing, LogConfig};
use eyetype::provider::{FaceLandmarkProvider, FrameSource, LogRenderer, Renderer};
use eyetype::session::{FrameInput, Session};
use eyetype::trace::TracePlayer;

fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig {
        log_level: config.log_level.clone(),
        enable_file_logs: config.enable_file_logs,
        log_dir: config.log_dir.clone(),
    });
    tracing::info!(mode = %config.mode, trace = %config.trace_path, "Starting eyetype");

    let mut player = TracePlayer::from_path(
        &config.trace_path,
        config.frame_width,
        config.frame_height,
    )
    .expect("Failed to open session trace");

    let mut session = Session::new(config.mode, config.engine.clone());
    let mut renderer = LogRenderer::new();

    // 每帧一轮：取帧 → 关键点 → 状态转移 → 渲染。取帧失败为致命错误。
    loop {
        let frame = match player.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "frame source failed, terminating session");
                std::process::exit(1);
            }
        };

        let landmarks = match player.landmarks(&frame) {
            Ok(found) => found,
            Err(e) => {
                // 检测器内部失败按“本帧无人脸”降级处理
                tracing::warn!(error = %e, "landmark provider failed, skipping frame");
                None
            }
        };

        let output = session.process_frame(FrameInput {
            frame: &frame,
            landmarks: landmarks.as_ref(),
            capture_requested: player.capture_requested(),
        });
        renderer.render(&frame, &output);
    }

    tracing::info!(message = %session.message(), "session complete");
    println!("{}", session.message());
}
