//! The tooltip controller.
//!
//! [`TooltipView`] ties the pieces together: it measures its text once,
//! arranges itself around a reference view whenever it is presented or the
//! container changes, hands show/dismiss transitions to an [`Animator`] and
//! draws its bubble on a [`Surface`].

use std::fmt;

use crate::animation::{Animator, Transition, TransitionKind, VisualState};
use crate::arrow::arrow_tip;
use crate::error::{Result, TooltipError};
use crate::layout::{Point, Rectangle, Size};
use crate::outline::{build_outline, bubble_frame, draw_bubble, text_rect, BubbleOutline};
use crate::placement::{arrange, Side};
use crate::preferences::Preferences;
use crate::renderer::Surface;
use crate::text_metrics::TextMeasure;
use crate::view_tree::{ViewId, ViewTree};

/// Where the tooltip is in its show/dismiss cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationState {
    #[default]
    Hidden,
    Appearing,
    Visible,
    Dismissing,
}

impl PresentationState {
    /// Appearing or visible: the states a dismissal can start from.
    pub fn is_shown(self) -> bool {
        matches!(self, PresentationState::Appearing | PresentationState::Visible)
    }
}

/// Result of one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrangement {
    /// Content frame in container coordinates.
    pub frame: Rectangle,
    /// Side actually used, possibly different from the preferred one.
    pub side: Side,
    /// Arrow apex in bubble-local coordinates.
    pub arrow_tip: Point,
}

#[derive(Debug, Clone, Copy)]
struct Presentation {
    container: ViewId,
    reference: ViewId,
    overlay: ViewId,
    arrangement: Arrangement,
}

type Completion = Box<dyn FnOnce()>;

/// A text tooltip anchored to a reference view.
pub struct TooltipView {
    text: String,
    preferences: Preferences,
    text_size: Size,
    content_size: Size,
    state: PresentationState,
    presentation: Option<Presentation>,
    visual: VisualState,
    on_dismissed: Option<Completion>,
}

impl fmt::Debug for TooltipView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipView")
            .field("text", &self.text)
            .field("state", &self.state)
            .field("content_size", &self.content_size)
            .field("arrangement", &self.arrangement())
            .finish_non_exhaustive()
    }
}

impl TooltipView {
    /// Create a tooltip and measure its text.
    ///
    /// Text and font are fixed for the tooltip's lifetime, so the sizes
    /// computed here are reused by every layout pass.
    pub fn new(text: impl Into<String>, preferences: Preferences, measure: &impl TextMeasure) -> Self {
        let text = text.into();
        let drawing = &preferences.drawing;
        let positioning = &preferences.positioning;

        let measured = measure
            .measure(&text, &drawing.font, positioning.max_width)
            .ceil();
        let text_size = Size::new(measured.width.max(drawing.arrow_width), measured.height);
        let content_size = Size::new(
            text_size.width + positioning.text_h_inset * 2.0 + positioning.bubble_h_inset * 2.0,
            text_size.height
                + positioning.text_v_inset * 2.0
                + positioning.bubble_v_inset * 2.0
                + drawing.arrow_height,
        );

        Self {
            text,
            preferences,
            text_size,
            content_size,
            state: PresentationState::Hidden,
            presentation: None,
            visual: VisualState::identity(Rectangle::default()),
            on_dismissed: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Measured text block, never narrower than the arrow.
    pub fn text_size(&self) -> Size {
        self.text_size
    }

    /// Full frame size: text plus insets plus arrow height.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    pub fn state(&self) -> PresentationState {
        self.state
    }

    /// Latest arrangement, while presented.
    pub fn arrangement(&self) -> Option<Arrangement> {
        self.presentation.map(|p| p.arrangement)
    }

    /// Overlay view attached to the container, while presented.
    pub fn overlay(&self) -> Option<ViewId> {
        self.presentation.map(|p| p.overlay)
    }

    /// Target visual state of the current or last transition.
    pub fn visual(&self) -> VisualState {
        self.visual
    }

    /// Show the tooltip pointing at `reference`.
    ///
    /// `container` must be a direct or indirect parent of `reference`; when
    /// omitted the tree's root is used. Fails before touching the tree if
    /// the tooltip is already presented or a handle is stale.
    pub fn present<T, A>(
        &mut self,
        tree: &mut T,
        animator: &mut A,
        container: Option<ViewId>,
        reference: ViewId,
        animated: bool,
    ) -> Result<()>
    where
        T: ViewTree + ?Sized,
        A: Animator + ?Sized,
    {
        if self.state != PresentationState::Hidden {
            return Err(TooltipError::AlreadyPresented);
        }
        if !tree.contains(reference) {
            return Err(TooltipError::ViewGone(reference));
        }
        let container = match container {
            Some(container) => {
                if !tree.contains(container) {
                    return Err(TooltipError::ViewGone(container));
                }
                if !tree.is_ancestor_of(container, reference) {
                    return Err(TooltipError::NotAnAncestor {
                        container,
                        reference,
                    });
                }
                container
            }
            None => tree.root(),
        };

        let arrangement = self.arrange_in(&*tree, container, reference)?;
        let overlay = tree
            .add_overlay(container, arrangement.frame)
            .ok_or(TooltipError::ViewGone(container))?;

        self.presentation = Some(Presentation {
            container,
            reference,
            overlay,
            arrangement,
        });

        let animating = &self.preferences.animating;
        let shown = VisualState {
            alpha: 1.0,
            scale: animating.show_final_scale,
            frame: arrangement.frame,
        };
        self.visual = shown;

        if animated {
            let transition = Transition {
                kind: TransitionKind::Appear,
                duration: animating.show_duration,
                damping_ratio: animating.spring_damping,
                initial_velocity: animating.spring_velocity,
                from: VisualState {
                    alpha: animating.show_initial_alpha,
                    scale: animating.show_initial_scale,
                    frame: arrangement.frame,
                },
                to: shown,
            };
            self.state = PresentationState::Appearing;
            animator.animate(transition);
        } else {
            self.state = PresentationState::Visible;
        }

        log::debug!(
            "Presented tooltip '{}' on {} side at {:?}",
            self.text,
            arrangement.side,
            arrangement.frame
        );
        Ok(())
    }

    /// Start dismissing. Returns false when the tooltip is not shown.
    pub fn dismiss<A: Animator + ?Sized>(&mut self, animator: &mut A) -> bool {
        self.start_dismiss(animator, None)
    }

    /// Start dismissing and run `completion` once the tooltip is detached.
    ///
    /// When the tooltip is not shown nothing happens and `completion` is
    /// dropped without running.
    pub fn dismiss_with<A, F>(&mut self, animator: &mut A, completion: F) -> bool
    where
        A: Animator + ?Sized,
        F: FnOnce() + 'static,
    {
        self.start_dismiss(animator, Some(Box::new(completion)))
    }

    fn start_dismiss<A: Animator + ?Sized>(
        &mut self,
        animator: &mut A,
        completion: Option<Completion>,
    ) -> bool {
        if !self.state.is_shown() {
            log::warn!("Ignoring dismiss of tooltip in state {:?}", self.state);
            return false;
        }

        let animating = &self.preferences.animating;
        let from = self.visual;
        let to = VisualState {
            alpha: animating.dismiss_final_alpha,
            scale: animating.dismiss_scale,
            frame: from.frame,
        };
        let transition = Transition {
            kind: TransitionKind::Dismiss,
            duration: animating.dismiss_duration,
            damping_ratio: animating.spring_damping,
            initial_velocity: animating.spring_velocity,
            from,
            to,
        };

        self.visual = to;
        self.on_dismissed = completion;
        self.state = PresentationState::Dismissing;
        animator.animate(transition);
        true
    }

    /// Tap on the bubble. Dismisses when `dismiss_on_tap` is set.
    pub fn handle_tap<A: Animator + ?Sized>(&mut self, animator: &mut A) -> bool {
        if !self.preferences.animating.dismiss_on_tap {
            return false;
        }
        self.dismiss(animator)
    }

    /// Completion hook for the animator.
    ///
    /// Finishing an appearance makes the tooltip visible. Finishing a
    /// dismissal detaches the overlay, runs the dismiss completion and
    /// leaves the tooltip hidden and ready to be presented again.
    pub fn transition_finished<T: ViewTree + ?Sized>(&mut self, tree: &mut T) {
        match self.state {
            PresentationState::Appearing => self.state = PresentationState::Visible,
            PresentationState::Dismissing => {
                if let Some(presentation) = self.presentation.take() {
                    tree.remove(presentation.overlay);
                }
                self.state = PresentationState::Hidden;
                self.visual = VisualState::identity(self.visual.frame);
                if let Some(completion) = self.on_dismissed.take() {
                    completion();
                }
                log::debug!("Dismissed tooltip '{}'", self.text);
            }
            PresentationState::Visible | PresentationState::Hidden => {}
        }
    }

    /// Re-run layout after the container was resized or rotated.
    ///
    /// Returns true when the tooltip was re-arranged and needs a redraw.
    /// A hidden tooltip, or one whose views were removed, is left alone.
    pub fn container_changed<T, A>(&mut self, tree: &mut T, animator: &mut A) -> bool
    where
        T: ViewTree + ?Sized,
        A: Animator + ?Sized,
    {
        let Some(presentation) = self.presentation else {
            return false;
        };
        if !tree.contains(presentation.overlay) {
            log::warn!("Tooltip overlay {} was detached externally", presentation.overlay);
            return false;
        }

        let arrangement =
            match self.arrange_in(&*tree, presentation.container, presentation.reference) {
                Ok(arrangement) => arrangement,
                Err(e) => {
                    log::warn!("Skipping tooltip relayout: {}", e);
                    return false;
                }
            };

        tree.set_frame(presentation.overlay, arrangement.frame);
        self.presentation = Some(Presentation {
            arrangement,
            ..presentation
        });

        let from = self.visual;
        self.visual.frame = arrangement.frame;

        if from.frame == arrangement.frame {
            return true;
        }
        let duration = self.preferences.animating.relayout_duration;
        match self.state {
            PresentationState::Visible if duration > 0.0 => animator.animate(Transition {
                kind: TransitionKind::Relayout,
                duration,
                damping_ratio: 1.0,
                initial_velocity: 0.0,
                from,
                to: self.visual,
            }),
            // Appear and dismiss keep their progress and follow the new frame.
            PresentationState::Appearing | PresentationState::Dismissing => {
                animator.retarget(arrangement.frame)
            }
            _ => {}
        }
        true
    }

    /// The outline for the current arrangement, in bubble-local coordinates.
    pub fn outline(&self) -> Option<BubbleOutline> {
        let arrangement = self.arrangement()?;
        let drawing = &self.preferences.drawing;
        let bubble = bubble_frame(arrangement.side, self.content_size, &self.preferences);
        Some(build_outline(
            arrangement.side,
            &bubble,
            drawing.corner_radius,
            drawing.arrow_width,
            drawing.arrow_height,
            arrangement.arrow_tip,
        ))
    }

    /// Draw bubble and text in bubble-local coordinates. Draws nothing
    /// while hidden.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let (Some(arrangement), Some(outline)) = (self.arrangement(), self.outline()) else {
            return;
        };
        let drawing = &self.preferences.drawing;

        draw_bubble(surface, &outline, &self.preferences);

        let bubble = bubble_frame(arrangement.side, self.content_size, &self.preferences);
        surface.draw_text(
            text_rect(&bubble, self.text_size),
            &self.text,
            &drawing.font,
            drawing.foreground_color,
            drawing.text_alignment,
        );
    }

    fn arrange_in<T: ViewTree + ?Sized>(
        &self,
        tree: &T,
        container: ViewId,
        reference: ViewId,
    ) -> Result<Arrangement> {
        let reference_rect = tree
            .bounding_rect_in_ancestor(reference, container)
            .ok_or(TooltipError::ViewGone(reference))?;
        let container_rect = tree
            .container_bounds(container)
            .ok_or(TooltipError::ViewGone(container))?;

        let positioning = &self.preferences.positioning;
        let (frame, side) = arrange(
            self.preferences.drawing.arrow_side,
            &reference_rect,
            &container_rect,
            self.content_size,
            positioning.clamp_mode,
        );
        let arrow_tip = arrow_tip(side, &frame, &reference_rect, self.content_size, positioning);

        log::debug!(
            "Arranged tooltip: reference {:?}, container {:?}, frame {:?}, side {}, tip {:?}",
            reference_rect,
            container_rect,
            frame,
            side,
            arrow_tip
        );
        Ok(Arrangement {
            frame,
            side,
            arrow_tip,
        })
    }
}
