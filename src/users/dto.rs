use bytes::Bytes;

/// One entry of a user's work history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub description: String,
}

/// File attached to the profile form.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub body: Bytes,
}

/// Decoded `multipart/form-data` body of the profile edit form.
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub role: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub about: Option<String>,
    pub titles: Vec<String>,
    pub companies: Vec<String>,
    pub descriptions: Vec<String>,
    pub photo: Option<UploadedFile>,
    pub resume: Option<UploadedFile>,
}

impl ProfileForm {
    /// Record a text field. Unknown names are ignored.
    pub fn push_text(&mut self, name: &str, value: String) {
        match name {
            "name" => self.name = Some(value),
            "role" => self.role = Some(value),
            "address" => self.address = Some(value),
            "linkedin" => self.linkedin = Some(value),
            "about" => self.about = Some(value),
            "title[]" | "title" => self.titles.push(value),
            "company[]" | "company" => self.companies.push(value),
            "desc[]" | "desc" => self.descriptions.push(value),
            _ => {}
        }
    }

    /// Pair the repeated title/company/description groups into records.
    pub fn experiences(&self) -> Result<Vec<Experience>, String> {
        zip_experiences(&self.titles, &self.companies, &self.descriptions)
    }
}

/// Zip three positionally aligned groups. Unequal lengths are refused and
/// entries whose three values are all blank are skipped.
pub fn zip_experiences(
    titles: &[String],
    companies: &[String],
    descriptions: &[String],
) -> Result<Vec<Experience>, String> {
    if titles.len() != companies.len() || titles.len() != descriptions.len() {
        return Err(format!(
            "work experience entries are misaligned: {} titles, {} companies, {} descriptions",
            titles.len(),
            companies.len(),
            descriptions.len()
        ));
    }

    Ok(titles
        .iter()
        .zip(companies)
        .zip(descriptions)
        .filter(|((t, c), d)| !(t.trim().is_empty() && c.trim().is_empty() && d.trim().is_empty()))
        .map(|((t, c), d)| Experience {
            title: t.trim().to_string(),
            company: c.trim().to_string(),
            description: d.trim().to_string(),
        })
        .collect())
}

/// Empty submissions clear the column instead of storing `""`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn zips_entries_in_order() {
        let got = zip_experiences(
            &strings(&["Engineer", "Lead"]),
            &strings(&["Acme", "Globex"]),
            &strings(&["Built things", "Led things"]),
        )
        .unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].title, "Engineer");
        assert_eq!(got[0].company, "Acme");
        assert_eq!(got[1].description, "Led things");
    }

    #[test]
    fn rejects_misaligned_groups() {
        let err = zip_experiences(&strings(&["a", "b"]), &strings(&["c"]), &strings(&["d", "e"]))
            .unwrap_err();
        assert!(err.contains("misaligned"));
    }

    #[test]
    fn skips_fully_blank_rows() {
        let got = zip_experiences(
            &strings(&["", "Dev"]),
            &strings(&[" ", "Initech"]),
            &strings(&["", ""]),
        )
        .unwrap();
        assert_eq!(
            got,
            vec![Experience {
                title: "Dev".into(),
                company: "Initech".into(),
                description: String::new(),
            }]
        );
    }

    #[test]
    fn push_text_collects_repeated_fields() {
        let mut form = ProfileForm::default();
        form.push_text("name", "Ada".into());
        form.push_text("title[]", "A".into());
        form.push_text("title[]", "B".into());
        form.push_text("unknown", "ignored".into());
        assert_eq!(form.name.as_deref(), Some("Ada"));
        assert_eq!(form.titles, strings(&["A", "B"]));
    }

    #[test]
    fn non_blank_clears_empty_values() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" Rust ".into())).as_deref(), Some("Rust"));
    }
}
