use futures::channel::oneshot;
use image::RgbaImage;
use tiny_skia::Pixmap;

use super::{pixmap_to_image, RenderError, RenderResult, RenderTarget, Renderer};
use crate::element::Line;

pub type FlattenReceiver = oneshot::Receiver<RenderResult<RgbaImage>>;

/// Snapshot of everything an offscreen flatten needs
#[derive(Debug, Clone)]
pub struct FlattenJob {
    pub renderer: Renderer,
    pub target: RenderTarget,
    pub backing: Option<Pixmap>,
    pub lines: Vec<Line>,
}

impl FlattenJob {
    pub fn run(&self) -> RenderResult<RgbaImage> {
        let pixmap = self
            .renderer
            .flatten(self.target, self.backing.as_ref(), &self.lines)?;
        pixmap_to_image(&pixmap)
    }
}

/// Run `job` on a worker thread. Poll the receiver with `try_recv` from the
/// UI loop; a dropped sender shows up as `Canceled`.
pub fn spawn_flatten(job: FlattenJob) -> RenderResult<FlattenReceiver> {
    let (sender, receiver) = oneshot::channel();
    std::thread::Builder::new()
        .name("flatten".to_owned())
        .spawn(move || {
            let result = job.run();
            if let Err(err) = &result {
                log::error!("Offscreen flatten failed: {}", err);
            }
            // The UI may have gone away; nothing to do then
            let _ = sender.send(result);
        })
        .map_err(RenderError::from)?;
    Ok(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};
    use futures::executor::block_on;

    #[test]
    fn worker_delivers_flattened_image() {
        let line = Line::stroke(vec![pos2(5.0, 5.0), pos2(25.0, 25.0)], Default::default());
        let job = FlattenJob {
            renderer: Renderer::new(16),
            target: RenderTarget::new(vec2(30.0, 30.0), 2.0),
            backing: None,
            lines: vec![line],
        };
        let image = block_on(spawn_flatten(job).unwrap()).unwrap().unwrap();
        assert_eq!(image.dimensions(), (60, 60));
        assert!(image.pixels().any(|p| p.0[3] > 0));
    }
}
