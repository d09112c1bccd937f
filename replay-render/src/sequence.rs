//! Parallel PNG sequence output

use crate::{FrameRenderer, ProgressTracker, Result};
use replay_core::Frame;
use std::path::{Path, PathBuf};

/// Path of the `index`-th frame image inside `out_dir`
pub fn frame_path(out_dir: &Path, index: usize) -> PathBuf {
    out_dir.join(format!("frame_{:06}.png", index))
}

/// Renders every frame to `out_dir/frame_NNNNNN.png`, splitting the work
/// across one scoped thread per CPU. Returns the number of images written.
pub fn render_sequence(frames: &[Frame], out_dir: impl AsRef<Path>, renderer: &FrameRenderer) -> Result<usize> {
    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;
    if frames.is_empty() {
        return Ok(0);
    }

    let workers = num_cpus::get().clamp(1, frames.len());
    let chunk_size = frames.len().div_ceil(workers);
    let progress = ProgressTracker::new(frames.len() as u64, "Rendered");
    tracing::debug!(frames = frames.len(), workers, "rendering frame sequence");

    std::thread::scope(|s| {
        let handles: Vec<_> = frames
            .chunks(chunk_size)
            .enumerate()
            .map(|(chunk_idx, chunk)| {
                let progress = &progress;
                s.spawn(move || -> Result<()> {
                    for (offset, frame) in chunk.iter().enumerate() {
                        let index = chunk_idx * chunk_size + offset;
                        renderer.render(frame).save(frame_path(out_dir, index))?;
                        progress.increment_and_report(10);
                    }
                    Ok(())
                })
            })
            .collect();

        handles
            .into_iter()
            .try_for_each(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
    })?;

    Ok(frames.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderConfig, Viewport};
    use replay_core::{AgentPoint, SpatialBounds, StatusColor};
    use tempfile::TempDir;

    #[test]
    fn test_writes_numbered_frames() {
        let bounds = SpatialBounds {
            min_latitude: 0.0,
            max_latitude: 1.0,
            min_longitude: 0.0,
            max_longitude: 1.0,
        };
        let config = RenderConfig {
            width: 32,
            height: 24,
            ..Default::default()
        };
        let viewport = Viewport::from_bounds(&bounds, config.width, config.height, config.padding_ratio);
        let renderer = FrameRenderer::new(config, viewport);

        let frames: Vec<Frame> = (0..5)
            .map(|i| {
                Frame::new(
                    i * 10_000,
                    vec![AgentPoint {
                        agent_id: "a".into(),
                        latitude: 0.5,
                        longitude: 0.1 * i as f64,
                        status: StatusColor::Idle,
                    }],
                    vec![],
                )
            })
            .collect();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("frames");
        assert_eq!(render_sequence(&frames, &out, &renderer).unwrap(), 5);

        for i in 0..5 {
            let image = image::open(frame_path(&out, i)).unwrap();
            assert_eq!((image.width(), image.height()), (32, 24));
        }
        assert!(!frame_path(&out, 5).exists());
    }

    #[test]
    fn test_empty_sequence() {
        let dir = TempDir::new().unwrap();
        let bounds = SpatialBounds {
            min_latitude: 0.0,
            max_latitude: 1.0,
            min_longitude: 0.0,
            max_longitude: 1.0,
        };
        let renderer = FrameRenderer::new(RenderConfig::default(), Viewport::from_bounds(&bounds, 8, 8, 0.0));
        assert_eq!(render_sequence(&[], dir.path(), &renderer).unwrap(), 0);
    }
}
