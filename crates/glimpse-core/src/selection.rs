
use glimpse_types::{BoundingBox, Point, SelectionResult};

/// Input the overlay forwards to the session, in image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionInput {
    PointerDown(Point),
    PointerMove(Point),
    /// `keep_drawing` is set when the continue modifier is held at release
    PointerUp { at: Point, keep_drawing: bool },
    /// Space or Enter
    Finish,
    /// Escape
    Cancel,
}

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub anchor: Point,
    pub current: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    CroppingCrop { drag: Drag },
    AnnotatingBoxes { crop: BoundingBox, drag: Option<Drag> },
    Done(SelectionResult),
    Cancelled,
}

/// Effect of one input, so the overlay knows what to redraw or whether to close
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Ignored,
    Redraw,
    /// Crop accepted and annotation begins
    CropCommitted(BoundingBox),
    /// Highlight stored, crop-relative; drawing continues
    HighlightAdded(BoundingBox),
    /// Box too small to use; absolute coordinates
    Rejected(BoundingBox),
    Finished(SelectionResult),
    Cancelled,
}

pub struct SelectionSession {
    bounds: BoundingBox,
    annotate: bool,
    stage: Stage,
    highlights: Vec<BoundingBox>,
}

impl SelectionSession {
    pub fn new(image_width: u32, image_height: u32, annotate: bool) -> Self {
        Self {
            bounds: BoundingBox::from_size(image_width, image_height),
            annotate,
            stage: Stage::Idle,
            highlights: Vec::new(),
        }
    }

    pub fn handle(&mut self, input: SelectionInput) -> Transition {
        if self.is_closed() {
            return Transition::Ignored;
        }

        if input == SelectionInput::Cancel {
            self.stage = Stage::Cancelled;
            return Transition::Cancelled;
        }

        match self.stage {
            Stage::Idle => self.on_idle(input),
            Stage::CroppingCrop { drag } => self.on_cropping(drag, input),
            Stage::AnnotatingBoxes { crop, drag } => self.on_annotating(crop, drag, input),
            Stage::Done(_) | Stage::Cancelled => Transition::Ignored,
        }
    }

    fn on_idle(&mut self, input: SelectionInput) -> Transition {
        match input {
            SelectionInput::PointerDown(at) if self.bounds.contains(at) => {
                self.stage = Stage::CroppingCrop {
                    drag: Drag {
                        anchor: at,
                        current: at,
                    },
                };
                Transition::Redraw
            }
            _ => Transition::Ignored,
        }
    }

    fn on_cropping(&mut self, drag: Drag, input: SelectionInput) -> Transition {
        match input {
            SelectionInput::PointerMove(at) => {
                self.stage = Stage::CroppingCrop {
                    drag: Drag {
                        anchor: drag.anchor,
                        current: at,
                    },
                };
                Transition::Redraw
            }
            SelectionInput::PointerUp { at, .. } => {
                let crop = BoundingBox::from_corners(drag.anchor, at, &self.bounds);
                if crop.is_degenerate() {
                    tracing::debug!("crop box {:?} too small, back to idle", crop);
                    self.stage = Stage::Idle;
                    return Transition::Rejected(crop);
                }

                if self.annotate {
                    self.stage = Stage::AnnotatingBoxes { crop, drag: None };
                    Transition::CropCommitted(crop)
                } else {
                    self.complete(SelectionResult::Crop(crop))
                }
            }
            _ => Transition::Ignored,
        }
    }

    fn on_annotating(
        &mut self,
        crop: BoundingBox,
        drag: Option<Drag>,
        input: SelectionInput,
    ) -> Transition {
        match (input, drag) {
            (SelectionInput::Finish, None) => self.finish_annotation(crop),
            (SelectionInput::PointerDown(at), None) if crop.contains(at) => {
                self.stage = Stage::AnnotatingBoxes {
                    crop,
                    drag: Some(Drag {
                        anchor: at,
                        current: at,
                    }),
                };
                Transition::Redraw
            }
            (SelectionInput::PointerMove(at), Some(drag)) => {
                self.stage = Stage::AnnotatingBoxes {
                    crop,
                    drag: Some(Drag {
                        anchor: drag.anchor,
                        current: at,
                    }),
                };
                Transition::Redraw
            }
            (SelectionInput::PointerUp { at, keep_drawing }, Some(drag)) => {
                self.stage = Stage::AnnotatingBoxes { crop, drag: None };

                let highlight = BoundingBox::from_corners(drag.anchor, at, &crop);
                if highlight.is_degenerate() {
                    return Transition::Rejected(highlight);
                }

                let relative = highlight.relative_to(&crop);
                self.highlights.push(relative);

                if keep_drawing {
                    Transition::HighlightAdded(relative)
                } else {
                    self.finish_annotation(crop)
                }
            }
            _ => Transition::Ignored,
        }
    }

    /// Zero highlights falls back to a plain crop
    fn finish_annotation(&mut self, crop: BoundingBox) -> Transition {
        let result = if self.highlights.is_empty() {
            SelectionResult::Crop(crop)
        } else {
            SelectionResult::Annotated {
                crop,
                highlights: std::mem::take(&mut self.highlights),
            }
        };
        self.complete(result)
    }

    fn complete(&mut self, result: SelectionResult) -> Transition {
        self.stage = Stage::Done(result.clone());
        Transition::Finished(result)
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn annotate(&self) -> bool {
        self.annotate
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.stage, Stage::Done(_) | Stage::Cancelled)
    }

    /// Rectangle being dragged right now, absolute and clamped
    pub fn live_box(&self) -> Option<BoundingBox> {
        match self.stage {
            Stage::CroppingCrop { drag } => Some(BoundingBox::from_corners(
                drag.anchor,
                drag.current,
                &self.bounds,
            )),
            Stage::AnnotatingBoxes {
                crop,
                drag: Some(drag),
            } => Some(BoundingBox::from_corners(drag.anchor, drag.current, &crop)),
            _ => None,
        }
    }

    /// Committed crop box, absolute
    pub fn crop_box(&self) -> Option<BoundingBox> {
        match &self.stage {
            Stage::AnnotatingBoxes { crop, .. } => Some(*crop),
            Stage::Done(result) => Some(result.crop_box()),
            _ => None,
        }
    }

    /// Committed highlight boxes, crop-relative
    pub fn highlights(&self) -> &[BoundingBox] {
        match &self.stage {
            Stage::Done(result) => result.highlight_boxes(),
            _ => &self.highlights,
        }
    }

    /// Committed highlight boxes mapped back onto the full image for drawing
    pub fn highlights_absolute(&self) -> Vec<BoundingBox> {
        let Some(crop) = self.crop_box() else {
            return Vec::new();
        };
        self.highlights()
            .iter()
            .map(|h| h.offset_by(&crop))
            .collect()
    }
}
