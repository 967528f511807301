//! Offline playback of a tooltip's lifecycle.
//!
//! A [`Scene`] owns an in-memory view tree with one reference view, a
//! tooltip and a [`TimelineAnimator`]. [`Scene::record`] presents the
//! tooltip, optionally resizes the container and dismisses it again,
//! sampling the animator at a fixed rate and writing every sample as a PNG.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tiny_skia::Pixmap;
use tipview_ui::{
    Preferences, Rectangle, Size, TextMeasure, TimelineAnimator, TooltipError, TooltipView,
    ViewArena, ViewId, ViewTree, VisualState,
};

use crate::config::SceneConfig;
use crate::constants::MIN_VISIBLE_SCALE;
use crate::skia::{PixmapSurface, RenderError, composite, pixmap_for, save_png};
use crate::text::CosmicText;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Tooltip error: {0}")]
    Tooltip(#[from] TooltipError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid scene: {0}")]
    Invalid(String),
}

/// Where a recorded frame came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Appear,
    Relayout,
    Dismiss,
}

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Appear => "appear",
            Phase::Relayout => "relayout",
            Phase::Dismiss => "dismiss",
        }
    }
}

/// `<stem>_<index>_<phase>.png`, next to `stem`.
fn frame_path(stem: &Path, index: usize, phase: Phase) -> PathBuf {
    let mut name = stem.file_name().map(|s| s.to_os_string()).unwrap_or_default();
    name.push(format!("_{:03}_{}.png", index, phase.name()));
    stem.with_file_name(name)
}

/// One sampled frame: the tooltip's visual state, or `None` once detached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub phase: Phase,
    pub visual: Option<VisualState>,
}

pub struct Scene {
    config: SceneConfig,
    tree: ViewArena,
    container: ViewId,
    reference: ViewId,
    tooltip: TooltipView,
    animator: TimelineAnimator,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("container", &self.container)
            .field("reference", &self.reference)
            .field("tooltip", &self.tooltip)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Build the view tree and measure the tooltip.
    ///
    /// With a scroll content size the reference lives inside a scroll view
    /// covering the root, and that scroll view is the container.
    pub fn new(
        config: SceneConfig,
        preferences: Preferences,
        measure: &impl TextMeasure,
    ) -> Result<Self, SceneError> {
        if config.frames == 0 {
            return Err(SceneError::Invalid("frame count must be at least 1".into()));
        }
        if config.container.width < 1.0 || config.container.height < 1.0 {
            return Err(SceneError::Invalid(format!(
                "container {}x{} is empty",
                config.container.width, config.container.height
            )));
        }

        let mut tree = ViewArena::new(config.container);
        let root = tree.root();
        let container = match config.content_size {
            Some(content) => {
                let scroll = tree
                    .add_view(root, Rectangle::from_origin_size(Default::default(), config.container))
                    .ok_or(TooltipError::ViewGone(root))?;
                tree.set_content_size(scroll, Some(content));
                scroll
            }
            None => root,
        };
        let reference = tree
            .add_view(container, config.reference)
            .ok_or(TooltipError::ViewGone(container))?;

        let tooltip = TooltipView::new(config.text.clone(), preferences, measure);
        log::info!(
            "Tooltip '{}' measures {}x{}",
            tooltip.text(),
            tooltip.content_size().width,
            tooltip.content_size().height
        );

        Ok(Self {
            config,
            tree,
            container,
            reference,
            tooltip,
            animator: TimelineAnimator::new(),
        })
    }

    pub fn tooltip(&self) -> &TooltipView {
        &self.tooltip
    }

    pub fn tree(&self) -> &ViewArena {
        &self.tree
    }

    /// Run the configured lifecycle and collect one sample per frame.
    pub fn play(&mut self) -> Result<Vec<Sample>, SceneError> {
        let mut samples = Vec::new();

        self.tooltip.present(
            &mut self.tree,
            &mut self.animator,
            Some(self.container),
            self.reference,
            self.config.animated,
        )?;
        if self.config.animated {
            let duration = self.tooltip.preferences().animating.show_duration;
            self.run_transition(Phase::Appear, duration, &mut samples);
        } else {
            samples.push(self.still(Phase::Appear));
        }

        if let Some(size) = self.config.resize_to {
            self.resize(size);
            if self.tooltip.container_changed(&mut self.tree, &mut self.animator) {
                let duration = self.tooltip.preferences().animating.relayout_duration;
                self.run_transition(Phase::Relayout, duration, &mut samples);
            }
        }

        if self.config.dismiss {
            let text = self.tooltip.text().to_string();
            let dismissing = self
                .tooltip
                .dismiss_with(&mut self.animator, move || {
                    log::info!("Tooltip '{}' dismissed", text)
                });
            if dismissing {
                let duration = self.tooltip.preferences().animating.dismiss_duration;
                self.run_transition(Phase::Dismiss, duration, &mut samples);
            }
        }

        Ok(samples)
    }

    /// Play the scene and write every sample as `<stem>_<index>_<phase>.png`.
    pub fn record(&mut self, text: &CosmicText) -> Result<Vec<PathBuf>, SceneError> {
        let samples = self.play()?;
        let stem = self.config.output.clone();
        let mut written = Vec::with_capacity(samples.len());

        for (index, sample) in samples.iter().enumerate() {
            let pixmap = self.render(sample, text)?;
            let path = frame_path(&stem, index, sample.phase);
            save_png(&pixmap, &path)?;
            written.push(path);
        }

        log::info!("Wrote {} frames", written.len());
        Ok(written)
    }

    /// Step the animator through one transition, sampling `frames` times.
    fn run_transition(&mut self, phase: Phase, duration: f32, samples: &mut Vec<Sample>) {
        let frames = self.config.frames;
        let total = Duration::from_secs_f32(duration.max(0.0));
        let mut elapsed = Duration::ZERO;

        for i in 1..=frames {
            let target = if i == frames {
                total
            } else {
                total.mul_f32(i as f32 / frames as f32)
            };
            let Some(frame) = self.animator.step(target.saturating_sub(elapsed)) else {
                break;
            };
            elapsed = target;

            if frame.finished {
                self.tooltip.transition_finished(&mut self.tree);
                samples.push(self.still(phase));
                return;
            }
            samples.push(Sample {
                phase,
                visual: Some(frame.visual),
            });
        }

        // Float rounding can leave the last step a hair short of the end;
        // finish it and let the settled state replace that frame.
        if self.animator.is_running() {
            while let Some(frame) = self.animator.step(Duration::from_millis(1)) {
                if frame.finished {
                    break;
                }
            }
            self.tooltip.transition_finished(&mut self.tree);
            samples.pop();
            samples.push(self.still(phase));
        }
    }

    fn still(&self, phase: Phase) -> Sample {
        Sample {
            phase,
            visual: self.tooltip.overlay().map(|_| self.tooltip.visual()),
        }
    }

    fn resize(&mut self, size: Size) {
        let root = self.tree.root();
        let frame = Rectangle::from_origin_size(Default::default(), size);
        self.tree.set_frame(root, frame);
        if self.container != root {
            self.tree.set_frame(self.container, frame);
        }
        self.config.container = size;
        log::info!("Container resized to {}x{}", size.width, size.height);
    }

    /// Paint the container, the reference view and the tooltip.
    pub fn render(&self, sample: &Sample, text: &CosmicText) -> Result<Pixmap, SceneError> {
        let size = self.config.container;
        let mut pixmap = pixmap_for(size.width, size.height)?;
        let root = self.tree.root();

        {
            let mut surface = PixmapSurface::new(&mut pixmap, text);
            surface.clear(self.config.background);
            if let Some(reference) = self.tree.bounding_rect_in_ancestor(self.reference, root) {
                surface.fill_rect(reference, self.config.reference_color);
            }
        }

        let Some(visual) = sample.visual else {
            return Ok(pixmap);
        };
        if visual.alpha <= 0.0 || visual.scale < MIN_VISIBLE_SCALE {
            return Ok(pixmap);
        }

        let content = self.tooltip.content_size();
        let mut layer = pixmap_for(content.width, content.height)?;
        self.tooltip
            .draw(&mut PixmapSurface::new(&mut layer, text));

        let origin = self
            .tree
            .bounding_rect_in_ancestor(self.container, root)
            .map(|r| (r.x, r.y))
            .unwrap_or((0.0, 0.0));
        composite(&mut pixmap, &layer, origin, &visual);
        Ok(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tipview_ui::{PresentationState, Side, TextMetrics};

    fn config() -> SceneConfig {
        SceneConfig {
            frames: 4,
            ..SceneConfig::default()
        }
    }

    fn scene(config: SceneConfig) -> Scene {
        Scene::new(config, Preferences::default(), &TextMetrics::default()).unwrap()
    }

    #[test]
    fn test_frame_path_names_index_and_phase() {
        let path = frame_path(Path::new("out/tip"), 7, Phase::Relayout);
        assert_eq!(path, PathBuf::from("out/tip_007_relayout.png"));
        assert_eq!(
            frame_path(Path::new("tip"), 12, Phase::Dismiss),
            PathBuf::from("tip_012_dismiss.png")
        );
    }

    #[test]
    fn test_rejects_zero_frames() {
        let config = SceneConfig {
            frames: 0,
            ..SceneConfig::default()
        };
        let result = Scene::new(config, Preferences::default(), &TextMetrics::default());
        assert!(matches!(result, Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_full_lifecycle_samples() {
        let mut scene = scene(config());
        let samples = scene.play().unwrap();

        let appear: Vec<_> = samples.iter().filter(|s| s.phase == Phase::Appear).collect();
        let dismiss: Vec<_> = samples.iter().filter(|s| s.phase == Phase::Dismiss).collect();
        assert_eq!(appear.len(), 4);
        assert_eq!(dismiss.len(), 4);

        // Appearance ends fully shown, dismissal ends detached.
        assert_eq!(appear.last().unwrap().visual.unwrap().alpha, 1.0);
        assert_eq!(dismiss.last().unwrap().visual, None);
        assert_eq!(scene.tooltip().state(), PresentationState::Hidden);
    }

    #[test]
    fn test_still_presentation() {
        let mut scene = scene(SceneConfig {
            animated: false,
            dismiss: false,
            ..config()
        });
        let samples = scene.play().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(scene.tooltip().state(), PresentationState::Visible);
    }

    #[test]
    fn test_resize_relayouts() {
        let mut scene = scene(SceneConfig {
            reference: Rectangle::new(100.0, 400.0, 50.0, 30.0),
            animated: false,
            dismiss: false,
            resize_to: Some(Size::new(320.0, 440.0)),
            ..config()
        });
        let preferences = Preferences::default().with_side(Side::Top);
        scene.tooltip = TooltipView::new("Hi", preferences, &TextMetrics::default());

        let samples = scene.play().unwrap();
        assert!(samples.iter().any(|s| s.phase == Phase::Relayout));
        let arrangement = scene.tooltip().arrangement().unwrap();
        assert_eq!(arrangement.side, Side::Bottom);
        assert!(arrangement.frame.max_y() <= 400.0);
    }

    #[test]
    fn test_scroll_container_holds_reference() {
        let scene = scene(SceneConfig {
            content_size: Some(Size::new(320.0, 1000.0)),
            ..config()
        });
        let container = scene.tree().parent(scene.reference).unwrap();
        assert_ne!(container, scene.tree().root());
        assert_eq!(scene.tree().content_size(container), Some(Size::new(320.0, 1000.0)));
    }

    #[test]
    fn test_render_draws_reference_and_tooltip() {
        let text = CosmicText::new();
        let mut scene = scene(SceneConfig {
            animated: false,
            dismiss: false,
            ..config()
        });
        let samples = scene.play().unwrap();
        let pixmap = scene.render(&samples[0], &text).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (320, 480));

        // Reference view is light gray on white.
        let reference = pixmap.pixel(105, 75).unwrap();
        assert_eq!(reference.red(), 204);

        // Bubble body is blue.
        let frame = scene.tooltip().arrangement().unwrap().frame;
        let center = frame.center();
        let bubble = pixmap.pixel(frame.x as u32 + 5, center.y as u32).unwrap();
        assert!(bubble.blue() > 240);
        assert!(bubble.red() < 10);
    }
}
