use crate::config::ZoomSettings;

pub const BASE_ZOOM_LEVEL: u32 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zoom {
    level: u32,
    settings: ZoomSettings,
}

impl Zoom {
    pub fn new(settings: ZoomSettings) -> Self {
        let level = settings.default.clamp(settings.min, settings.max);
        Self { level, settings }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn scale(&self) -> f64 {
        f64::from(self.level) / f64::from(BASE_ZOOM_LEVEL)
    }

    pub fn set(&mut self, level: u32) {
        self.level = level.clamp(self.settings.min, self.settings.max);
    }

    pub fn zoom_in(&mut self) {
        self.set(self.level.saturating_add(self.settings.step));
    }

    pub fn zoom_out(&mut self) {
        self.set(self.level.saturating_sub(self.settings.step));
    }

    pub fn reset(&mut self) {
        self.set(self.settings.default);
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::new(ZoomSettings::default())
    }
}
