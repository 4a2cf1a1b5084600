use crate::ui::{
    InputEvent, Point, Rect, UIComponent,
    about::{APPLICATION_NAME, LICENSE_URL, ORGANIZATION_DOMAIN, ORGANIZATION_NAME},
};

const PAGE_TAB_HEIGHT: f32 = 30.0;
const PAGE_TAB_WIDTH: f32 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColophonPage {
    About,
    Environment,
    Authors,
    Credits,
    License,
}

impl ColophonPage {
    pub const fn all() -> [Self; 5] {
        [
            Self::About,
            Self::Environment,
            Self::Authors,
            Self::Credits,
            Self::License,
        ]
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::About => "About",
            Self::Environment => "Environment",
            Self::Authors => "Authors",
            Self::Credits => "Credits",
            Self::License => "License",
        }
    }
}

/// A term and its description, rendered as a definition list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColophonEntry {
    pub term: Option<String>,
    pub text: String,
}

impl ColophonEntry {
    fn paragraph(text: impl Into<String>) -> Self {
        Self {
            term: None,
            text: text.into(),
        }
    }

    fn definition(term: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            text: text.into(),
        }
    }
}

/// Build facts reported on the Environment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEnvironment {
    pub version: &'static str,
    pub os: &'static str,
    pub family: &'static str,
    pub arch: &'static str,
}

impl BuildEnvironment {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            family: std::env::consts::FAMILY,
            arch: std::env::consts::ARCH,
        }
    }
}

pub fn page_entries(page: ColophonPage, environment: &BuildEnvironment) -> Vec<ColophonEntry> {
    match page {
        ColophonPage::About => vec![
            ColophonEntry::paragraph(format!(
                "{APPLICATION_NAME} is an open source table editor written in Rust."
            )),
            ColophonEntry::paragraph(format!(
                "Copyright \u{a9} 2022 {ORGANIZATION_NAME} <{ORGANIZATION_DOMAIN}>."
            )),
            ColophonEntry::paragraph(
                "This application is licensed under the terms of the GNU General Public License, version 3.",
            ),
        ],
        ColophonPage::Environment => vec![
            ColophonEntry::definition("Application version", environment.version),
            ColophonEntry::definition(
                "Operating System",
                format!("{} ({} family) on {}", environment.os, environment.family, environment.arch),
            ),
        ],
        ColophonPage::Authors => vec![ColophonEntry::definition(
            "naracanto",
            "Created and developed by naracanto <https://naracanto.github.io>.",
        )],
        ColophonPage::Credits => vec![ColophonEntry::definition(
            "BreezeIcons project",
            "Application logo and icons made by BreezeIcons project from KDE are licensed under LGPLv3.",
        )],
        ColophonPage::License => vec![
            ColophonEntry::paragraph(format!(
                "{APPLICATION_NAME} is free software: you can redistribute it and/or modify it under the terms of the \
                 GNU General Public License as published by the Free Software Foundation, either version 3 of the \
                 License, or (at your option) any later version."
            )),
            ColophonEntry::paragraph(format!(
                "{APPLICATION_NAME} is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; \
                 without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the \
                 GNU General Public License for more details."
            )),
            ColophonEntry::paragraph(format!(
                "You should have received a copy of the GNU General Public License along with {APPLICATION_NAME}. \
                 If not, see <https://www.gnu.org/licenses/>. ({LICENSE_URL})"
            )),
        ],
    }
}

/// Tabbed colophon window.
#[derive(Debug, Clone)]
pub struct ColophonDialog {
    bounds: Rect,
    visible: bool,
    environment: BuildEnvironment,
    pub current: ColophonPage,
}

impl Default for ColophonDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ColophonDialog {
    pub fn new() -> Self {
        Self {
            bounds: Rect::default(),
            visible: false,
            environment: BuildEnvironment::current(),
            current: ColophonPage::About,
        }
    }

    pub fn title(&self) -> String {
        format!("Colophon \u{2013} {APPLICATION_NAME}")
    }

    pub fn select(&mut self, page: ColophonPage) {
        self.current = page;
    }

    pub fn entries(&self) -> Vec<ColophonEntry> {
        page_entries(self.current, &self.environment)
    }

    /// Page rendered as plain text.
    pub fn page_text(&self) -> String {
        self.entries()
            .into_iter()
            .map(|entry| match entry.term {
                Some(term) => format!("{term}\n    {}", entry.text),
                None => entry.text,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn page_tab_rect(&self, index: usize) -> Rect {
        Rect {
            x: self.bounds.x + index as f32 * PAGE_TAB_WIDTH,
            y: self.bounds.y,
            width: PAGE_TAB_WIDTH,
            height: PAGE_TAB_HEIGHT,
        }
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }
}

impl UIComponent for ColophonDialog {
    fn layout(&mut self, bounds: Rect, _dpi: f32) {
        self.bounds = bounds;
    }

    fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.visible {
            return false;
        }
        match event {
            InputEvent::MouseDown(point) => {
                let hit = ColophonPage::all()
                    .into_iter()
                    .enumerate()
                    .find(|(index, _)| self.page_tab_rect(*index).contains(*point));
                match hit {
                    Some((_, page)) => {
                        self.select(page);
                        true
                    }
                    None => false,
                }
            }
            InputEvent::KeyDown(0x1B) => {
                self.visible = false;
                true
            }
            _ => false,
        }
    }

    fn hit_test(&self, point: Point) -> bool {
        self.visible && self.bounds.contains(point)
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
