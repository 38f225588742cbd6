use serde::{Deserialize, Serialize};

/// Contact details collected once an estimate is ready. Presence of name and
/// phone gates submission; formats are not checked, matching what the hosted
/// forms accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactDraft {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ContactDraft;

    #[test]
    fn reports_blank_and_whitespace_fields_as_missing() {
        let draft = ContactDraft { name: "  ".to_owned(), phone: String::new(), email: None };
        assert_eq!(draft.missing_fields(), vec!["name", "phone"]);
        assert!(!draft.is_complete());
    }

    #[test]
    fn email_is_never_required() {
        let draft = ContactDraft {
            name: "June Kim".to_owned(),
            phone: "(914) 555-0101".to_owned(),
            email: None,
        };
        assert!(draft.is_complete());
    }
}
