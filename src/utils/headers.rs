use http::{HeaderMap, HeaderName, HeaderValue};

/// Header value as a string, or `default` when absent, blank or not UTF-8.
pub fn get_header(headers: &HeaderMap, name: &str, default: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Sets `name` on `headers`; a `None` or blank value removes the header.
pub fn set_header(headers: &mut HeaderMap, name: HeaderName, value: Option<&str>) {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => match HeaderValue::from_str(v) {
            Ok(header_value) => {
                headers.insert(name, header_value);
            }
            Err(_) => {
                headers.remove(name);
            }
        },
        None => {
            headers.remove(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;

    #[test]
    fn blank_header_falls_back_to_default() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("   "));
        assert_eq!(get_header(&headers, "authorization", "none"), "none");
        assert_eq!(get_header(&HeaderMap::new(), "authorization", ""), "");
    }

    #[test]
    fn setting_blank_clears_header() {
        let mut headers = HeaderMap::new();
        set_header(&mut headers, AUTHORIZATION, Some("Bearer abc"));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");

        set_header(&mut headers, AUTHORIZATION, Some(""));
        assert!(headers.get(AUTHORIZATION).is_none());
    }
}
