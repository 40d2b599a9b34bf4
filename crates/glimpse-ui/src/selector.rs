use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use glimpse_core::{SelectionInput, SelectionSession, Stage, Transition};
use glimpse_types::{Point, SelectionResult};
use image::RgbaImage;
use kanal::AsyncSender;
use slint::{ComponentHandle, ModelRc, Rgba8Pixel, SharedPixelBuffer, VecModel};

use crate::focus;
use crate::handle::SelectionReply;
use crate::mapping::ViewMapping;
use crate::state::UiState;
use crate::{SelectorWindow, ViewRect};

/// Drives one overlay: routes pointer and key events through the selection
/// session and mirrors its state back into the window
struct SelectorController {
    session: RefCell<SelectionSession>,
    reply: RefCell<Option<AsyncSender<SelectionReply>>>,
    window: slint::Weak<SelectorWindow>,
    image_size: (u32, u32),
    id: u64,
    state: Rc<UiState>,
}

impl SelectorController {
    fn mapping(&self) -> ViewMapping {
        let (image_w, image_h) = self.image_size;
        let Some(window) = self.window.upgrade() else {
            return ViewMapping::new(image_w, image_h, image_w as f32, image_h as f32);
        };
        let native = window.window();
        let view = native.size().to_logical(native.scale_factor());
        ViewMapping::new(image_w, image_h, view.width, view.height)
    }

    fn pointer(&self, x: f32, y: f32, input: impl FnOnce(Point) -> SelectionInput) {
        let at = self.mapping().to_image(x, y);
        self.input(input(at));
    }

    fn input(&self, input: SelectionInput) {
        let transition = self.session.borrow_mut().handle(input);

        match transition {
            Transition::Ignored => return,
            Transition::Redraw => {}
            Transition::CropCommitted(crop) => tracing::debug!("Crop committed: {:?}", crop),
            Transition::HighlightAdded(b) => tracing::debug!("Highlight added: {:?}", b),
            Transition::Rejected(b) => tracing::debug!("Ignoring degenerate box {:?}", b),
            Transition::Finished(result) => {
                self.complete(Ok(Some(result)));
                return;
            }
            Transition::Cancelled => {
                tracing::info!("Selection cancelled");
                self.complete(Ok(None));
                return;
            }
        }

        self.refresh();
    }

    fn refresh(&self) {
        let Some(window) = self.window.upgrade() else {
            return;
        };
        let mapping = self.mapping();
        let session = self.session.borrow();

        let live = session.live_box();
        window.set_show_live(live.is_some());
        window.set_live_rect(live.map(|b| mapping.to_view(&b)).unwrap_or_default());

        let crop = session.crop_box();
        window.set_show_crop(crop.is_some());
        window.set_crop_rect(crop.map(|b| mapping.to_view(&b)).unwrap_or_default());

        let highlights: Vec<ViewRect> = session
            .highlights_absolute()
            .iter()
            .map(|b| mapping.to_view(b))
            .collect();
        window.set_highlights(ModelRc::new(VecModel::from(highlights)));

        window.set_annotating(matches!(session.stage(), Stage::AnnotatingBoxes { .. }));
        window.set_hint(hint_for(&session).into());
    }

    /// Reply once, hide the overlay and release it on the next loop turn
    fn complete(&self, outcome: SelectionReply) {
        if let Ok(Some(selection)) = &outcome {
            log_selection(selection);
        }

        if let Some(reply) = self.reply.borrow_mut().take()
            && reply.try_send(outcome).is_err()
        {
            tracing::warn!("Selection requester went away before the result arrived");
        }

        if let Some(window) = self.window.upgrade() {
            window.hide().ok();
        }

        let state = self.state.clone();
        let id = self.id;
        slint::Timer::single_shot(Duration::ZERO, move || state.release_selector(id));
    }
}

fn log_selection(selection: &SelectionResult) {
    match selection {
        SelectionResult::Crop(crop) => tracing::info!("Selected {:?}", crop),
        SelectionResult::Annotated { crop, highlights } => {
            tracing::info!("Selected {:?} with {} highlight(s)", crop, highlights.len())
        }
    }
}

fn hint_for(session: &SelectionSession) -> &'static str {
    match session.stage() {
        Stage::Idle | Stage::CroppingCrop { .. } => {
            if session.annotate() {
                "Drag to select the region, then mark the important parts. Esc cancels."
            } else {
                "Drag to select the region. Esc cancels."
            }
        }
        Stage::AnnotatingBoxes { .. } => {
            "Drag inside the region to highlight. Hold Ctrl or Shift to add more, Enter or Space to finish."
        }
        Stage::Done(_) | Stage::Cancelled => "",
    }
}

/// Build and show the overlay. Errors are reported by the caller as a
/// failed selection.
pub(crate) fn open_selector(
    state: &Rc<UiState>,
    screenshot: Arc<RgbaImage>,
    origin: Point,
    label: String,
    annotate: bool,
    reply: AsyncSender<SelectionReply>,
) -> anyhow::Result<()> {
    let (width, height) = screenshot.dimensions();
    anyhow::ensure!(width > 0 && height > 0, "Screenshot is empty");

    // A new activation cancels any overlay still open
    let previous = state.selector.borrow_mut().take();
    if let Some((_, previous)) = previous {
        tracing::debug!("Replacing an open selector");
        previous.invoke_cancel();
        previous.hide().ok();
    }

    let window = SelectorWindow::new()?;
    let pixels = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(screenshot.as_raw(), width, height);
    window.set_screenshot(slint::Image::from_rgba8(pixels));
    window.set_mode_label(label.into());

    let controller = Rc::new(SelectorController {
        session: RefCell::new(SelectionSession::new(width, height, annotate)),
        reply: RefCell::new(Some(reply)),
        window: window.as_weak(),
        image_size: (width, height),
        id: state.next_id(),
        state: state.clone(),
    });

    window.on_pointer_down({
        let c = controller.clone();
        move |x, y| c.pointer(x, y, SelectionInput::PointerDown)
    });
    window.on_pointer_move({
        let c = controller.clone();
        move |x, y| c.pointer(x, y, SelectionInput::PointerMove)
    });
    window.on_pointer_up({
        let c = controller.clone();
        move |x, y, keep_drawing| {
            c.pointer(x, y, |at| SelectionInput::PointerUp { at, keep_drawing })
        }
    });
    window.on_finish({
        let c = controller.clone();
        move || c.input(SelectionInput::Finish)
    });
    window.on_cancel({
        let c = controller.clone();
        move || c.input(SelectionInput::Cancel)
    });
    window.window().on_close_requested({
        let c = controller.clone();
        move || {
            c.input(SelectionInput::Cancel);
            slint::CloseRequestResponse::HideWindow
        }
    });

    let native = window.window();
    native.set_position(slint::PhysicalPosition::new(origin.x, origin.y));
    native.set_size(slint::PhysicalSize::new(width, height));

    controller.refresh();
    window.show()?;
    focus::raise(window.window(), "selector overlay");

    *state.selector.borrow_mut() = Some((controller.id, window));
    Ok(())
}
