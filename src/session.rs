// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The annotation loop.
//!
//! [`Annotator`] walks a [`ClipSet`] one clip at a time. Each clip goes
//! through `Loading -> Playing` and ends `Labeled`, `Skipped` or, when the
//! user quits, `Aborted`. Playback is driven one frame per [`Annotator::tick`]:
//! read, transform, present, then drain the queued input. Clips loop from
//! the first frame until a bound key is pressed.
//!
//! Per-clip decoding problems never escape the loop; only a failure to
//! write the label file does.

use crate::error::{MediaError, SinkError};
use crate::io::label_sink::LabelSink;
use crate::io::media::{Frame, FrameSource, MediaBackend, ReadOutcome};
use crate::models::clip::{clip_identifier, ClipIdentifier, ClipSet};
use crate::models::label::{Key, LabelMap, LabelValue};
use crate::util::geometry::{DisplayGeometry, Size};
use crate::util::transform::prepare_for_display;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Frame interval used when a clip does not declare its rate.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Input observed by a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
}

/// Where decoded frames are shown and input comes from.
pub trait DisplaySurface {
    /// Adopt the geometry of the next clip. Called only when it changes.
    fn ensure_size(&mut self, size: Size);

    /// Show a prepared frame.
    fn present(&mut self, frame: &Frame);

    /// Everything queued since the last poll, in arrival order. Never blocks.
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every clip was visited.
    Completed,
    /// The user quit; labels written so far are kept.
    Aborted,
    /// The label file could not be written.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub total: usize,
    pub labeled: usize,
    pub skipped: usize,
    pub label_file: PathBuf,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// A frame of clip `clip` was shown and no bound key arrived.
    Frame { clip: usize, frame: u64 },
    /// A frame was shown and the clip was labeled.
    Labeled { clip: usize, label: LabelValue },
    /// The clip stopped decoding and was skipped without a label.
    Skipped { clip: usize },
    /// The run is over.
    Finished(RunSummary),
}

enum Phase {
    Loading,
    Playing(PlayingClip),
    Done(RunSummary),
}

/// Result of one playback step on the open clip.
enum ClipStep {
    Presented(u64),
    Labeled(LabelValue),
    ReadFailed(MediaError),
    Quit,
}

/// The clip currently on screen.
struct PlayingClip {
    index: usize,
    path: PathBuf,
    source: Box<dyn FrameSource>,
    frame_count: u64,
    frame_index: u64,
    target: Size,
}

impl PlayingClip {
    fn rewind(&mut self) -> Result<(), MediaError> {
        self.source.rewind()?;
        self.frame_index = 0;
        log::debug!("looping {}", self.path.display());
        Ok(())
    }

    /// Next frame, wrapping to the start at the declared count or when the
    /// decoder runs dry. A zero declared count means "unknown".
    fn read_frame(&mut self) -> Result<Frame, MediaError> {
        if self.frame_count > 0 && self.frame_index >= self.frame_count {
            self.rewind()?;
        }

        match self.source.read_next()? {
            ReadOutcome::Frame(frame) => return Ok(frame),
            // Nothing decodable from the first frame on
            ReadOutcome::EndOfStream if self.frame_index == 0 => {}
            ReadOutcome::EndOfStream => {
                self.rewind()?;
                if let ReadOutcome::Frame(frame) = self.source.read_next()? {
                    return Ok(frame);
                }
            }
        }

        Err(MediaError::Read {
            frame: self.frame_index,
            reason: "no decodable frames".to_string(),
        })
    }

    fn step(&mut self, surface: &mut dyn DisplaySurface, labels: &LabelMap) -> ClipStep {
        let frame = match self.read_frame() {
            Ok(frame) => frame,
            Err(e) => return ClipStep::ReadFailed(e),
        };

        surface.present(&prepare_for_display(frame, self.target));

        for event in surface.poll_events() {
            match event {
                InputEvent::Quit => return ClipStep::Quit,
                InputEvent::KeyDown(key) => {
                    // First bound key wins; the rest of the queue is dropped
                    if let Some(label) = labels.lookup(key) {
                        return ClipStep::Labeled(label.clone());
                    }
                }
            }
        }

        let shown = self.frame_index;
        self.frame_index += 1;
        ClipStep::Presented(shown)
    }

    fn close(&mut self) {
        self.source.close();
    }
}

/// Drives a labeling run over a clip set.
pub struct Annotator {
    clips: ClipSet,
    label_map: LabelMap,
    backend: Box<dyn MediaBackend>,
    sink: LabelSink,
    geometry: DisplayGeometry,
    identifier: ClipIdentifier,
    phase: Phase,
    next_clip: usize,
    surface_size: Option<Size>,
    frame_interval: Duration,
    skipped: usize,
}

impl Annotator {
    pub fn new(
        clips: ClipSet,
        label_map: LabelMap,
        backend: Box<dyn MediaBackend>,
        sink: LabelSink,
    ) -> Self {
        Self {
            clips,
            label_map,
            backend,
            sink,
            geometry: DisplayGeometry::Native,
            identifier: ClipIdentifier::Path,
            phase: Phase::Loading,
            next_clip: 0,
            surface_size: None,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            skipped: 0,
        }
    }

    pub fn with_geometry(mut self, geometry: DisplayGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_identifier(mut self, identifier: ClipIdentifier) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn label_map(&self) -> &LabelMap {
        &self.label_map
    }

    /// `(position of the current clip counting from 1, total clips)`.
    pub fn progress(&self) -> (usize, usize) {
        let position = match &self.phase {
            Phase::Playing(clip) => clip.index + 1,
            _ => self.next_clip,
        };
        (position, self.clips.len())
    }

    /// Path of the clip on screen, if any.
    pub fn current_clip(&self) -> Option<&Path> {
        match &self.phase {
            Phase::Playing(clip) => Some(clip.path.as_path()),
            _ => None,
        }
    }

    /// Playback pace of the current clip.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// Advance by one displayed frame.
    pub fn tick(&mut self, surface: &mut dyn DisplaySurface) -> Result<Tick, SinkError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Loading);
        let clip = match phase {
            Phase::Done(summary) => {
                self.phase = Phase::Done(summary.clone());
                return Ok(Tick::Finished(summary));
            }
            Phase::Playing(clip) => clip,
            Phase::Loading => match self.open_next(surface) {
                Some(clip) => clip,
                None => return Ok(Tick::Finished(self.finish(RunOutcome::Completed))),
            },
        };

        match self.play(clip, surface) {
            Ok(tick) => Ok(tick),
            Err(e) => {
                self.finish(RunOutcome::Failed);
                Err(e)
            }
        }
    }

    /// End the run early. Labels already written are kept.
    pub fn abort(&mut self) -> RunSummary {
        match std::mem::replace(&mut self.phase, Phase::Loading) {
            Phase::Done(summary) => {
                self.phase = Phase::Done(summary.clone());
                summary
            }
            Phase::Playing(mut clip) => {
                clip.close();
                self.finish(RunOutcome::Aborted)
            }
            Phase::Loading => self.finish(RunOutcome::Aborted),
        }
    }

    /// Tick until the run ends.
    #[cfg(test)]
    pub fn run(&mut self, surface: &mut dyn DisplaySurface) -> Result<RunSummary, SinkError> {
        loop {
            if let Tick::Finished(summary) = self.tick(surface)? {
                return Ok(summary);
            }
        }
    }

    /// Open clips in order until one plays; unopenable clips are skipped.
    fn open_next(&mut self, surface: &mut dyn DisplaySurface) -> Option<PlayingClip> {
        while let Some(path) = self.clips.get(self.next_clip) {
            let index = self.next_clip;
            let path = path.to_path_buf();
            self.next_clip += 1;

            let mut source = match self.backend.open(&path) {
                Ok(source) => source,
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    self.skipped += 1;
                    continue;
                }
            };

            let native = source.native_size();
            let target = self.geometry.resolve(native);
            if target.pixel_count() == 0 {
                log::warn!("skipping {}: empty frame size {}", path.display(), native);
                source.close();
                self.skipped += 1;
                continue;
            }
            log::debug!("{}: native {}, showing at {}", path.display(), native, target);

            if self.surface_size != Some(target) {
                surface.ensure_size(target);
                self.surface_size = Some(target);
            }

            self.frame_interval = source
                .frame_rate()
                .and_then(|fps| Duration::try_from_secs_f64(1.0 / fps).ok())
                .unwrap_or(DEFAULT_FRAME_INTERVAL);

            return Some(PlayingClip {
                index,
                path,
                frame_count: source.frame_count(),
                source,
                frame_index: 0,
                target,
            });
        }
        None
    }

    fn play(
        &mut self,
        mut clip: PlayingClip,
        surface: &mut dyn DisplaySurface,
    ) -> Result<Tick, SinkError> {
        match clip.step(surface, &self.label_map) {
            ClipStep::Presented(frame) => {
                let index = clip.index;
                self.phase = Phase::Playing(clip);
                Ok(Tick::Frame { clip: index, frame })
            }
            ClipStep::Labeled(label) => {
                clip.close();
                let name = clip_identifier(&clip.path, self.identifier);
                self.sink.commit(&name, &label)?;
                log::info!("labeled {} as {}", name, label);
                Ok(Tick::Labeled {
                    clip: clip.index,
                    label,
                })
            }
            ClipStep::ReadFailed(e) => {
                clip.close();
                log::warn!("skipping {}: {}", clip.path.display(), e);
                self.skipped += 1;
                Ok(Tick::Skipped { clip: clip.index })
            }
            ClipStep::Quit => {
                clip.close();
                Ok(Tick::Finished(self.finish(RunOutcome::Aborted)))
            }
        }
    }

    fn finish(&mut self, outcome: RunOutcome) -> RunSummary {
        let summary = RunSummary {
            outcome,
            total: self.clips.len(),
            labeled: self.sink.records(),
            skipped: self.skipped,
            label_file: self.sink.path().to_path_buf(),
        };
        match outcome {
            RunOutcome::Completed => log::info!(
                "labeling complete: {} labeled, {} skipped, saved to {}",
                summary.labeled,
                summary.skipped,
                summary.label_file.display()
            ),
            RunOutcome::Aborted => log::info!(
                "user quit after {} of {} clips, progress saved to {}",
                summary.labeled + summary.skipped,
                summary.total,
                summary.label_file.display()
            ),
            RunOutcome::Failed => log::error!(
                "labeling stopped: {} could not be written",
                summary.label_file.display()
            ),
        }
        self.phase = Phase::Done(summary.clone());
        summary
    }
}

/// Scripted fakes for driving the loop without a decoder or a window.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::io::media::ChannelOrder;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashMap};
    use std::rc::Rc;
    use tempfile::{tempdir, TempDir};

    pub const NATIVE: Size = Size::new(2, 1);

    /// Behaviour of one decodable fake clip.
    #[derive(Debug, Clone, Copy)]
    pub struct FakeClip {
        /// Frame count reported by the container.
        pub declared: u64,
        /// Frames the decoder really yields.
        pub decodable: u64,
        /// Position where reading errors out.
        pub fail_at: Option<u64>,
        pub size: Size,
        pub fps: Option<f64>,
    }

    /// A well-formed clip of `n` frames at [`NATIVE`] size.
    pub fn clip(n: u64) -> FakeClip {
        FakeClip {
            declared: n,
            decodable: n,
            fail_at: None,
            size: NATIVE,
            fps: None,
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub enum Script {
        Unopenable,
        Frames(FakeClip),
    }

    pub fn frames(n: u64) -> Script {
        Script::Frames(clip(n))
    }

    pub type Journal = Rc<RefCell<Vec<String>>>;

    pub struct FakeBackend {
        pub scripts: HashMap<String, Script>,
        pub journal: Journal,
    }

    impl MediaBackend for FakeBackend {
        fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>, MediaError> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.journal.borrow_mut().push(format!("open {}", name));
            match self.scripts[&name] {
                Script::Unopenable => Err(MediaError::Open {
                    path: path.to_path_buf(),
                    reason: "bad codec".into(),
                }),
                Script::Frames(clip) => Ok(Box::new(FakeSource {
                    name,
                    clip,
                    position: 0,
                    journal: self.journal.clone(),
                })),
            }
        }
    }

    struct FakeSource {
        name: String,
        clip: FakeClip,
        position: u64,
        journal: Journal,
    }

    impl FrameSource for FakeSource {
        fn frame_count(&self) -> u64 {
            self.clip.declared
        }

        fn native_size(&self) -> Size {
            self.clip.size
        }

        fn frame_rate(&self) -> Option<f64> {
            self.clip.fps
        }

        fn read_next(&mut self) -> Result<ReadOutcome, MediaError> {
            if self.clip.fail_at == Some(self.position) {
                return Err(MediaError::Read {
                    frame: self.position,
                    reason: "corrupt packet".into(),
                });
            }
            if self.position >= self.clip.decodable {
                return Ok(ReadOutcome::EndOfStream);
            }
            let value = self.position as u8;
            self.position += 1;
            let size = self.clip.size;
            let pixels = vec![value; size.pixel_count() * 3];
            Ok(ReadOutcome::Frame(
                Frame::from_raw(size, ChannelOrder::Bgr, pixels).unwrap(),
            ))
        }

        fn rewind(&mut self) -> Result<(), MediaError> {
            self.journal.borrow_mut().push(format!("rewind {}", self.name));
            self.position = 0;
            Ok(())
        }

        fn close(&mut self) {
            self.journal.borrow_mut().push(format!("close {}", self.name));
        }
    }

    /// Surface that records what it shows and replays input keyed by the
    /// running count of presented frames.
    #[derive(Default)]
    pub struct ScriptedSurface {
        pub input: BTreeMap<usize, Vec<InputEvent>>,
        pub presented: Vec<(Size, u8)>,
        pub resizes: Vec<Size>,
    }

    impl ScriptedSurface {
        pub fn with_input(input: Vec<(usize, Vec<InputEvent>)>) -> Self {
            Self {
                input: input.into_iter().collect(),
                ..Default::default()
            }
        }

        pub fn shown_values(&self) -> Vec<u8> {
            self.presented.iter().map(|(_, v)| *v).collect()
        }
    }

    impl DisplaySurface for ScriptedSurface {
        fn ensure_size(&mut self, size: Size) {
            self.resizes.push(size);
        }

        fn present(&mut self, frame: &Frame) {
            self.presented.push((frame.size(), frame.as_bytes()[0]));
        }

        fn poll_events(&mut self) -> Vec<InputEvent> {
            self.input
                .remove(&(self.presented.len() - 1))
                .unwrap_or_default()
        }
    }

    /// An annotator over fake clips in a temporary `clips` directory,
    /// writing bare file names to `clips_label.txt`.
    pub struct Harness {
        pub dir: TempDir,
        pub journal: Journal,
        pub annotator: Annotator,
    }

    impl Harness {
        pub fn new(clips: &[(&str, Script)], labels: LabelMap) -> Self {
            let dir = tempdir().unwrap();
            let clip_dir = dir.path().join("clips");
            let journal = Journal::default();
            let backend = FakeBackend {
                scripts: clips
                    .iter()
                    .map(|(name, script)| (name.to_string(), *script))
                    .collect(),
                journal: journal.clone(),
            };
            let set = ClipSet::from_paths(clips.iter().map(|(n, _)| clip_dir.join(n)).collect());
            let sink = LabelSink::create(&dir.path().join("clips_label.txt")).unwrap();
            let annotator = Annotator::new(set, labels, Box::new(backend), sink)
                .with_identifier(ClipIdentifier::FileName);
            Self {
                dir,
                journal,
                annotator,
            }
        }

        pub fn labels_written(&self) -> String {
            labels_in(&self.dir)
        }

        pub fn journal(&self) -> Vec<String> {
            self.journal.borrow().clone()
        }
    }

    /// Contents of the label file a [`Harness`] writes into `dir`.
    pub fn labels_in(dir: &TempDir) -> String {
        std::fs::read_to_string(dir.path().join("clips_label.txt")).unwrap()
    }

    pub fn key(k: Key) -> InputEvent {
        InputEvent::KeyDown(k)
    }
}
