//! vCard 3.0 contact-card generation for the share panel.

use crate::profile::{Profile, slugify};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VCard {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub url: Option<String>,
    pub organization: Option<String>,
}

impl VCard {
    pub fn from_profile(profile: &Profile, url: Option<String>) -> Self {
        Self {
            name: profile.name.clone(),
            phone: profile.phone.clone(),
            email: profile.email.clone(),
            url,
            organization: None,
        }
    }

    /// Render the card. Optional lines are omitted entirely rather than
    /// emitted empty.
    pub fn generate(&self) -> String {
        let mut lines = vec![
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("FN:{}", self.name),
            format!("TEL:{}", self.phone),
            format!("EMAIL:{}", self.email),
        ];
        if let Some(url) = self.url.as_deref().filter(|u| !u.is_empty()) {
            lines.push(format!("URL:{url}"));
        }
        if let Some(org) = self.organization.as_deref().filter(|o| !o.is_empty()) {
            lines.push(format!("ORG:{org}"));
        }
        lines.push("END:VCARD".to_string());
        lines.join("\n")
    }

    /// `<slugified-name>.vcf`, the filename offered for download.
    pub fn download_filename(&self) -> String {
        format!("{}.vcf", slugify(&self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_card_omits_optional_lines() {
        let card = VCard {
            name: "Ada Lovelace".to_string(),
            phone: "+84 123 456 789".to_string(),
            email: "ada@example.com".to_string(),
            ..VCard::default()
        };

        assert_eq!(
            card.generate(),
            "BEGIN:VCARD\nVERSION:3.0\nFN:Ada Lovelace\nTEL:+84 123 456 789\nEMAIL:ada@example.com\nEND:VCARD"
        );
    }

    #[test]
    fn full_card_includes_url_and_org() {
        let card = VCard {
            name: "Ada".to_string(),
            phone: "123".to_string(),
            email: "ada@example.com".to_string(),
            url: Some("https://ada.dev".to_string()),
            organization: Some("Analytical Engines".to_string()),
        };

        let text = card.generate();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[5], "URL:https://ada.dev");
        assert_eq!(lines[6], "ORG:Analytical Engines");
        assert_eq!(lines.last(), Some(&"END:VCARD"));
    }

    #[test]
    fn empty_optionals_are_treated_as_absent() {
        let card = VCard {
            name: "Ada".to_string(),
            phone: "123".to_string(),
            email: "ada@example.com".to_string(),
            url: Some(String::new()),
            organization: Some(String::new()),
        };
        assert!(!card.generate().contains("URL:"));
        assert!(!card.generate().contains("ORG:"));
    }

    #[test]
    fn filename_slugifies_the_name() {
        let card = VCard {
            name: "Ada Lovelace".to_string(),
            ..VCard::default()
        };
        assert_eq!(card.download_filename(), "ada_lovelace.vcf");
    }
}
