//! Contact form state and validation.
//!
//! Submission has no backend: a valid form composes a `mailto:` URL for the
//! profile's address. An invalid form blocks submission with per-field
//! errors and produces no side effect at all.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValidationKind {
    Required,
    InvalidEmail,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: ValidationKind,
}

impl ContactForm {
    /// All validation failures at once, so the UI can mark every offending
    /// field inline rather than one at a time.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Name,
                kind: ValidationKind::Required,
            });
        }

        if self.email.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Email,
                kind: ValidationKind::Required,
            });
        } else if !is_valid_email(self.email.trim()) {
            errors.push(FieldError {
                field: Field::Email,
                kind: ValidationKind::InvalidEmail,
            });
        }

        if self.message.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Message,
                kind: ValidationKind::Required,
            });
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Compose the `mailto:` URL for a valid form; `None` when validation
    /// fails, so callers cannot launch a half-filled draft by accident.
    pub fn mailto(&self, recipient: &str) -> Option<String> {
        if !self.is_valid() {
            return None;
        }

        let name = self.name.trim();
        let subject = encode_component(&format!("Contact from {name} via Profile Link"));
        let body = encode_component(&format!(
            "Name: {name}\r\nEmail: {}\r\n\r\nMessage:\r\n{}",
            self.email.trim(),
            self.message.trim()
        ));

        Some(format!("mailto:{recipient}?subject={subject}&body={body}"))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Structural email check: one `@` with a non-empty local part and a domain
/// containing a dot. Deliberately loose; the mail client is the arbiter.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !email.contains(char::is_whitespace)
}

/// Percent-encode a `mailto:` query component.
fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello there".to_string(),
        }
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = ContactForm::default().validate();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.kind == ValidationKind::Required));
    }

    #[test]
    fn whitespace_only_fields_count_as_empty() {
        let form = ContactForm {
            name: "   ".to_string(),
            ..filled()
        };
        assert_eq!(form.validate(), vec![FieldError {
            field: Field::Name,
            kind: ValidationKind::Required,
        }]);
    }

    #[test]
    fn malformed_email_is_flagged() {
        for bad in ["plainaddress", "a@b", "@example.com", "a@.com", "a b@example.com"] {
            let form = ContactForm {
                email: bad.to_string(),
                ..filled()
            };
            assert_eq!(
                form.validate(),
                vec![FieldError {
                    field: Field::Email,
                    kind: ValidationKind::InvalidEmail,
                }],
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn reasonable_emails_pass() {
        for good in ["ada@example.com", "a.b+tag@mail.example.org", "x@y.co"] {
            assert!(is_valid_email(good), "expected {good:?} to pass");
        }
    }

    #[test]
    fn invalid_form_produces_no_mailto() {
        assert_eq!(ContactForm::default().mailto("owner@example.com"), None);
    }

    #[test]
    fn valid_form_composes_mailto_url() {
        let url = filled().mailto("owner@example.com").unwrap();
        assert!(url.starts_with("mailto:owner@example.com?subject="));
        assert!(url.contains("Contact%20from%20Ada%20via%20Profile%20Link"));
        assert!(url.contains("Name%3A%20Ada%0D%0A"));
        assert!(url.contains("Message%3A%0D%0AHello%20there"));
    }

    #[test]
    fn clear_resets_all_fields() {
        let mut form = filled();
        form.clear();
        assert_eq!(form, ContactForm::default());
    }
}
