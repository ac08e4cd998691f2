use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ContactInfo;
use crate::parsing::normalize::normalize;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("valid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+\d][\d\s-]{8,}").expect("valid phone regex"));

/// Location patterns in priority order. The first one captures the value of
/// an explicit label; the others match the whole `City, ST [ZIP]` shape.
static LOCATION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:Address|Location|City|State):\s*([^,\n]+(?:,\s*[^,\n]+)*)",
        r"\b[A-Z][a-zA-Z\s]+,\s*[A-Z]{2}\s*\d{5}\b",
        r"\b[A-Z][a-zA-Z\s]+,\s*[A-Z]{2}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid location regex"))
    .collect()
});

pub fn extract_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().trim().to_lowercase())
        .unwrap_or_default()
}

/// First phone-shaped run, reduced to its digits.
pub fn extract_phone(text: &str) -> String {
    PHONE_RE
        .find(text)
        .map(|m| m.as_str().chars().filter(char::is_ascii_digit).collect())
        .unwrap_or_default()
}

pub fn extract_location(text: &str) -> String {
    for re in LOCATION_RES.iter() {
        if let Some(caps) = re.captures(text) {
            let value = caps
                .get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str())
                .unwrap_or_default();
            return normalize(value);
        }
    }
    String::new()
}

pub fn extract_contact(text: &str) -> ContactInfo {
    ContactInfo {
        email: extract_email(text),
        phone: extract_phone(text),
        location: extract_location(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_digits_only() {
        assert_eq!(extract_phone("Phone: 090-123-4567"), "0901234567");
        assert_eq!(extract_phone("Tel +84 90 123 4567"), "84901234567");
    }

    #[test]
    fn test_short_number_is_not_a_phone() {
        assert_eq!(extract_phone("Room 12-34"), "");
    }

    #[test]
    fn test_email_lowercased() {
        assert_eq!(
            extract_email("Email: Jane.Doe@Example.COM | Phone"),
            "jane.doe@example.com"
        );
        assert_eq!(extract_email("no address here"), "");
    }

    #[test]
    fn test_explicit_location_label_wins() {
        let text = "Location: Hanoi\nHanoi, VN";
        assert_eq!(extract_location(text), "Hanoi");
    }

    #[test]
    fn test_label_captures_comma_separated_parts() {
        assert_eq!(
            extract_location("Address: 12 Main St,  Springfield, IL\nPhone: 555"),
            "12 Main St, Springfield, IL"
        );
    }

    #[test]
    fn test_city_state_zip_before_city_state() {
        assert_eq!(extract_location("Lives in Austin, TX 78701"), "Lives in Austin, TX 78701");
    }

    #[test]
    fn test_city_state() {
        assert_eq!(extract_location("email@x.io\nSeattle, WA"), "Seattle, WA");
    }

    #[test]
    fn test_empty_contact() {
        assert_eq!(extract_contact(""), ContactInfo::default());
    }
}
