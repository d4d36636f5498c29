// Sprite component and flipbook animation assets

use std::sync::Arc;

use serde::Deserialize;

/// One frame of a flipbook: a rectangle on its sprite sheet, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where a flipbook's frames sit on a sprite sheet
///
/// Frames are read left to right along `row`, wrapping to the next row after
/// `columns` frames.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlipbookDefinition {
    pub name: String,
    /// Sprite sheet path, relative to the asset root
    pub sheet: String,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Frames per row on the sheet
    pub columns: u32,
    /// Row of the first frame
    #[serde(default)]
    pub row: u32,
    pub frame_count: u32,
    pub frames_per_second: f32,
    #[serde(default = "default_looping")]
    pub looping: bool,
}

fn default_looping() -> bool {
    true
}

/// Frame-sequence sprite animation asset
///
/// Shared between components through `Arc`; immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Flipbook {
    name: String,
    sheet: String,
    frames: Vec<SpriteFrame>,
    frames_per_second: f32,
    looping: bool,
}

impl Flipbook {
    pub fn new(
        name: &str,
        sheet: &str,
        frames: Vec<SpriteFrame>,
        frames_per_second: f32,
        looping: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            sheet: sheet.to_string(),
            frames,
            frames_per_second: frames_per_second.max(0.0),
            looping,
        }
    }

    /// Lay out frames from a sprite sheet grid
    ///
    /// Coordinates saturate at the edge of a u32 sheet; config validation
    /// rejects grids that would get there.
    pub fn from_definition(definition: &FlipbookDefinition) -> Self {
        let columns = definition.columns.max(1);
        let frames = (0..definition.frame_count)
            .map(|i| SpriteFrame {
                x: (i % columns).saturating_mul(definition.frame_width),
                y: definition
                    .row
                    .saturating_add(i / columns)
                    .saturating_mul(definition.frame_height),
                width: definition.frame_width,
                height: definition.frame_height,
            })
            .collect();

        Self::new(
            &definition.name,
            &definition.sheet,
            frames,
            definition.frames_per_second,
            definition.looping,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frames_per_second(&self) -> f32 {
        self.frames_per_second
    }

    /// Whether components restart this flipbook when it reaches the end
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Length of one pass through the animation, in seconds
    pub fn total_duration(&self) -> f32 {
        if self.frames_per_second > 0.0 {
            self.frames.len() as f32 / self.frames_per_second
        } else {
            0.0
        }
    }

    /// Frame shown `time` seconds into the animation, clamped to the last frame
    pub fn frame_index_at_time(&self, time: f32) -> usize {
        let last = self.frames.len().saturating_sub(1);
        if self.frames_per_second <= 0.0 || time <= 0.0 {
            return 0;
        }
        ((time * self.frames_per_second) as usize).min(last)
    }

    pub fn frame(&self, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(index)
    }

    /// UV rectangle of a frame as (u_min, v_min, u_max, v_max)
    pub fn frame_uvs(
        &self,
        index: usize,
        texture_width: u32,
        texture_height: u32,
    ) -> Option<(f32, f32, f32, f32)> {
        if texture_width == 0 || texture_height == 0 {
            return None;
        }
        let frame = self.frame(index)?;
        let (w, h) = (texture_width as f32, texture_height as f32);

        Some((
            frame.x as f32 / w,
            frame.y as f32 / h,
            (frame.x as f32 + frame.width as f32) / w,
            (frame.y as f32 + frame.height as f32) / h,
        ))
    }
}

/// Data needed to draw the sprite this frame
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrameData {
    pub flipbook: String,
    pub sheet: String,
    pub frame_index: usize,
    pub frame: SpriteFrame,
    pub flip_horizontal: bool,
}

/// Sprite component that plays a flipbook
#[derive(Debug, Clone)]
pub struct FlipbookComponent {
    flipbook: Option<Arc<Flipbook>>,
    playback_time: f32,
    play_rate: f32,
    playing: bool,
    looping: bool,
    flip_horizontal: bool,
}

impl Default for FlipbookComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl FlipbookComponent {
    pub fn new() -> Self {
        Self {
            flipbook: None,
            playback_time: 0.0,
            play_rate: 1.0,
            playing: true,
            looping: true,
            flip_horizontal: false,
        }
    }

    /// Switch to another flipbook and play it from the start
    ///
    /// Takes the flipbook's looping flag. Returns false (and changes nothing)
    /// if it is already the current one.
    pub fn set_flipbook(&mut self, flipbook: Arc<Flipbook>) -> bool {
        if self.is_playing_flipbook(&flipbook) {
            return false;
        }

        self.looping = flipbook.is_looping();
        self.flipbook = Some(flipbook);
        self.playback_time = 0.0;
        self.playing = true;
        true
    }

    pub fn flipbook(&self) -> Option<&Arc<Flipbook>> {
        self.flipbook.as_ref()
    }

    /// Check whether `flipbook` is the asset currently assigned
    pub fn is_playing_flipbook(&self, flipbook: &Arc<Flipbook>) -> bool {
        self.flipbook
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, flipbook))
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Stop and rewind
    pub fn stop(&mut self) {
        self.playing = false;
        self.playback_time = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// A non-looping flipbook that has reached its last frame
    pub fn is_finished(&self) -> bool {
        !self.looping
            && self
                .flipbook
                .as_ref()
                .is_some_and(|flipbook| self.playback_time >= flipbook.total_duration())
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Set playback speed (1.0 = normal, 2.0 = double speed)
    pub fn set_play_rate(&mut self, rate: f32) {
        self.play_rate = rate.max(0.0);
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    pub fn playback_time(&self) -> f32 {
        self.playback_time
    }

    /// Advance playback (called every update)
    pub fn tick(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(flipbook) = &self.flipbook else {
            return;
        };

        let duration = flipbook.total_duration();
        if duration <= 0.0 {
            return;
        }

        self.playback_time += dt * self.play_rate;

        if self.playback_time >= duration {
            if self.looping {
                self.playback_time %= duration;
            } else {
                // Stay on last frame
                self.playback_time = duration;
                self.playing = false;
            }
        }
    }

    pub fn current_frame_index(&self) -> usize {
        self.flipbook
            .as_ref()
            .map_or(0, |flipbook| flipbook.frame_index_at_time(self.playback_time))
    }

    /// Frame data for drawing, or `None` with no flipbook or an empty one
    pub fn frame_data(&self) -> Option<SpriteFrameData> {
        let flipbook = self.flipbook.as_ref()?;
        let frame_index = self.current_frame_index();
        let frame = *flipbook.frame(frame_index)?;

        Some(SpriteFrameData {
            flipbook: flipbook.name().to_string(),
            sheet: flipbook.sheet().to_string(),
            frame_index,
            frame,
            flip_horizontal: self.flip_horizontal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, frame_count: u32, fps: f32) -> FlipbookDefinition {
        FlipbookDefinition {
            name: name.to_string(),
            sheet: "sprites/flint.png".to_string(),
            frame_width: 64,
            frame_height: 64,
            columns: 4,
            row: 1,
            frame_count,
            frames_per_second: fps,
            looping: true,
        }
    }

    #[test]
    fn test_frames_laid_out_on_grid() {
        let flipbook = Flipbook::from_definition(&definition("run", 6, 12.0));

        assert_eq!(flipbook.num_frames(), 6);
        assert_eq!(
            flipbook.frame(0),
            Some(&SpriteFrame { x: 0, y: 64, width: 64, height: 64 })
        );
        // Fifth frame wraps to the next row
        assert_eq!(
            flipbook.frame(4),
            Some(&SpriteFrame { x: 0, y: 128, width: 64, height: 64 })
        );
        assert_eq!(flipbook.total_duration(), 0.5);
    }

    #[test]
    fn test_oversized_grid_saturates() {
        let mut huge = definition("huge", 8, 12.0);
        huge.frame_width = 3_000_000_000;
        let flipbook = Flipbook::from_definition(&huge);

        assert_eq!(flipbook.frame(1).map(|f| f.x), Some(3_000_000_000));
        assert_eq!(flipbook.frame(2).map(|f| f.x), Some(u32::MAX));
    }

    #[test]
    fn test_frame_uvs() {
        let flipbook = Flipbook::from_definition(&definition("run", 6, 12.0));

        let (u_min, v_min, u_max, v_max) = flipbook.frame_uvs(1, 512, 512).unwrap();
        assert_eq!(u_min, 0.125);
        assert_eq!(v_min, 0.125);
        assert_eq!(u_max, 0.25);
        assert_eq!(v_max, 0.25);

        assert!(flipbook.frame_uvs(99, 512, 512).is_none());
        assert!(flipbook.frame_uvs(0, 0, 512).is_none());
    }

    #[test]
    fn test_component_loops() {
        let flipbook = Arc::new(Flipbook::from_definition(&definition("idle", 4, 10.0)));
        let mut sprite = FlipbookComponent::new();
        sprite.set_flipbook(flipbook);

        sprite.tick(0.15);
        assert_eq!(sprite.current_frame_index(), 1);

        sprite.tick(0.3); // 0.45s into a 0.4s loop
        assert_eq!(sprite.current_frame_index(), 0);
        assert!(sprite.is_playing());
    }

    #[test]
    fn test_component_one_shot_holds_last_frame() {
        let land = FlipbookDefinition {
            looping: false,
            ..definition("land", 3, 10.0)
        };
        let mut sprite = FlipbookComponent::new();
        sprite.set_flipbook(Arc::new(Flipbook::from_definition(&land)));

        sprite.tick(0.2);
        assert!(!sprite.is_finished());

        sprite.tick(0.3);
        assert_eq!(sprite.current_frame_index(), 2);
        assert!(!sprite.is_playing());
        assert!(sprite.is_finished());
    }

    #[test]
    fn test_setting_same_flipbook_is_noop() {
        let idle = Arc::new(Flipbook::from_definition(&definition("idle", 4, 10.0)));
        let run = Arc::new(Flipbook::from_definition(&definition("run", 4, 10.0)));
        let mut sprite = FlipbookComponent::new();

        assert!(sprite.set_flipbook(idle.clone()));
        sprite.tick(0.2);
        assert!(!sprite.set_flipbook(idle.clone()));
        assert_eq!(sprite.current_frame_index(), 2);

        assert!(sprite.set_flipbook(run.clone()));
        assert!(sprite.is_playing_flipbook(&run));
        assert_eq!(sprite.current_frame_index(), 0);
    }

    #[test]
    fn test_play_rate() {
        let flipbook = Arc::new(Flipbook::from_definition(&definition("run", 8, 10.0)));
        let mut sprite = FlipbookComponent::new();
        sprite.set_flipbook(flipbook);
        sprite.set_play_rate(2.0);

        sprite.tick(0.1);
        assert_eq!(sprite.current_frame_index(), 2);
    }

    #[test]
    fn test_frame_data_carries_flip() {
        let flipbook = Arc::new(Flipbook::from_definition(&definition("idle", 4, 10.0)));
        let mut sprite = FlipbookComponent::new();
        assert!(sprite.frame_data().is_none());

        sprite.set_flipbook(flipbook);
        sprite.set_flip_horizontal(true);

        let data = sprite.frame_data().unwrap();
        assert_eq!(data.flipbook, "idle");
        assert!(data.flip_horizontal);
        assert_eq!(data.frame_index, 0);
    }

    #[test]
    fn test_zero_fps_never_advances() {
        let flipbook = Arc::new(Flipbook::from_definition(&definition("still", 4, 0.0)));
        let mut sprite = FlipbookComponent::new();
        sprite.set_flipbook(flipbook);
        sprite.tick(5.0);
        assert_eq!(sprite.current_frame_index(), 0);
    }
}
