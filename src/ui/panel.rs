//! Persona info panel
//!
//! [`DisplaySurface`] is the seam the hover logic writes to; [`InfoPanel`] is the imgui
//! implementation the viewer draws every frame.

use imgui::{Condition, WindowFlags};

const HEADING_COLOR: [f32; 4] = [1.0, 0.84, 0.0, 1.0];

/// A heading and a paragraph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelContent {
    pub heading: String,
    pub paragraph: String,
}

impl PanelContent {
    pub fn new(heading: impl Into<String>, paragraph: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            paragraph: paragraph.into(),
        }
    }

    /// `<h3>heading</h3><p>paragraph</p>` with both parts HTML-escaped
    pub fn to_html(&self) -> String {
        format!(
            "<h3>{}</h3><p>{}</p>",
            escape_html(&self.heading),
            escape_html(&self.paragraph)
        )
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Window flags for the info panel
///
/// The panel takes no input, so it never makes imgui claim the pointer that the hover test
/// reads.
pub fn panel_flags() -> WindowFlags {
    WindowFlags::NO_INPUTS
        | WindowFlags::NO_TITLE_BAR
        | WindowFlags::NO_RESIZE
        | WindowFlags::NO_MOVE
        | WindowFlags::NO_COLLAPSE
        | WindowFlags::ALWAYS_AUTO_RESIZE
        | WindowFlags::NO_FOCUS_ON_APPEARING
        | WindowFlags::NO_SAVED_SETTINGS
}

/// Something that can show panel content and be shown or hidden
pub trait DisplaySurface {
    fn set_content(&mut self, content: PanelContent);
    fn set_visible(&mut self, visible: bool);
}

/// Floating imgui window showing the hovered persona
///
/// Hiding the panel keeps its last content.
#[derive(Debug, Clone)]
pub struct InfoPanel {
    content: Option<PanelContent>,
    visible: bool,
    /// Top-left corner in logical pixels
    pub position: [f32; 2],
    pub width: f32,
}

impl InfoPanel {
    pub fn new(position: [f32; 2], width: f32) -> Self {
        Self {
            content: None,
            visible: false,
            position,
            width,
        }
    }

    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Draws the panel if it is visible and has something to show
    pub fn render(&self, ui: &imgui::Ui) {
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return;
        }
        let (true, Some(content)) = (self.visible, self.content.as_ref()) else {
            return;
        };

        ui.window("##persona_info")
            .position(self.position, Condition::Always)
            .size_constraints([self.width, 0.0], [self.width, display_size[1]])
            .flags(panel_flags())
            .build(|| {
                ui.text_colored(HEADING_COLOR, &content.heading);
                ui.separator();
                ui.text_wrapped(&content.paragraph);
            });
    }
}

impl Default for InfoPanel {
    fn default() -> Self {
        Self::new([20.0, 20.0], 320.0)
    }
}

impl DisplaySurface for InfoPanel {
    fn set_content(&mut self, content: PanelContent) {
        self.content = Some(content);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_escapes_markup() {
        let content = PanelContent::new("Ada & Co", "<b>bold</b> \"quoted\"");
        assert_eq!(
            content.to_html(),
            "<h3>Ada &amp; Co</h3><p>&lt;b&gt;bold&lt;/b&gt; &quot;quoted&quot;</p>"
        );
    }

    #[test]
    fn test_empty_fields_render_empty() {
        assert_eq!(PanelContent::default().to_html(), "<h3></h3><p></p>");
    }

    #[test]
    fn test_panel_never_takes_the_mouse() {
        let flags = panel_flags();
        assert!(flags.contains(WindowFlags::NO_MOUSE_INPUTS));
        assert!(flags.contains(WindowFlags::NO_NAV_INPUTS));
        assert!(flags.contains(WindowFlags::NO_FOCUS_ON_APPEARING));
        assert!(flags.contains(WindowFlags::NO_TITLE_BAR));
    }

    #[test]
    fn test_hiding_keeps_content() {
        let mut panel = InfoPanel::default();
        assert!(!panel.is_visible());
        assert!(panel.content().is_none());

        panel.set_content(PanelContent::new("Ada", "Engineer"));
        panel.set_visible(true);
        panel.set_visible(false);

        assert!(!panel.is_visible());
        assert_eq!(panel.content(), Some(&PanelContent::new("Ada", "Engineer")));
    }
}
