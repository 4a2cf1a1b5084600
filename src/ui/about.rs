pub const APPLICATION_NAME: &str = "Tabelo";
pub const ORGANIZATION_NAME: &str = "Tabelo";
pub const ORGANIZATION_DOMAIN: &str = "https://github.com/tabeloapp";
pub const LICENSE_URL: &str = "https://www.gnu.org/licenses/gpl-3.0.en.html";

/// Contents of the About box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutDialog {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub links: Vec<(&'static str, &'static str)>,
}

impl Default for AboutDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl AboutDialog {
    pub fn new() -> Self {
        Self {
            title: format!("About {APPLICATION_NAME}"),
            paragraphs: vec![
                format!("{APPLICATION_NAME} is an open source table editor written in Rust."),
                format!("Copyright \u{a9} 2022 {ORGANIZATION_NAME}."),
                "This application is licensed under the terms of the GNU General Public License, version 3."
                    .to_string(),
            ],
            links: vec![(ORGANIZATION_NAME, ORGANIZATION_DOMAIN), ("GNU General Public License", LICENSE_URL)],
        }
    }

    /// Body as plain text, one paragraph per block.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_names_the_application_and_license() {
        let about = AboutDialog::new();
        assert_eq!(about.title, "About Tabelo");
        assert_eq!(about.paragraphs.len(), 3);
        assert!(about.text().contains("GNU General Public License, version 3"));
        assert!(about.links.iter().any(|(_, url)| *url == LICENSE_URL));
    }
}
