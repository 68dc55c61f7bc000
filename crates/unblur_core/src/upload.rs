use crate::{validate, CandidateFile, FileOrigin, HandleRegistry, Msg};

/// Fan-in of the drag-and-drop and picker channels.
///
/// Both channels keep only the first file, validate it, and yield exactly one
/// of `Msg::FileAccepted` or `Msg::FileRejected`. The only state held here is
/// the presentational drag flag.
#[derive(Debug, Clone)]
pub struct UploadSurface {
    registry: HandleRegistry,
    dragging: bool,
}

impl UploadSurface {
    pub fn new(registry: HandleRegistry) -> Self {
        Self {
            registry,
            dragging: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn drag_enter(&mut self) {
        self.dragging = true;
    }

    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Ends a drag gesture. Returns `None` when nothing was dropped.
    pub fn drop_files<I>(&mut self, files: I) -> Option<Msg>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        self.dragging = false;
        let first = files.into_iter().next()?;
        Some(self.receive(first.with_origin(FileOrigin::DragDrop)))
    }

    /// Handles a picker selection. Returns `None` when the picker was dismissed.
    pub fn pick_files<I>(&mut self, files: I) -> Option<Msg>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        let first = files.into_iter().next()?;
        Some(self.receive(first.with_origin(FileOrigin::Picker)))
    }

    fn receive(&self, file: CandidateFile) -> Msg {
        match validate(file, &self.registry) {
            Ok(image) => Msg::FileAccepted(image),
            Err(err) => Msg::FileRejected(err),
        }
    }
}
