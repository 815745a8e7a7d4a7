use eframe::egui;

// ---------------------------------------------------------------------------
// Cosmetic theme switching
// ---------------------------------------------------------------------------

/// Visual style selected in the top bar. Purely a rendering parameter: it is
/// never consulted by the filter engine or the projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Push this theme's visuals onto the egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        });
    }
}
