//! URL helpers for building the chat completions endpoint.

/// Strip trailing slashes so endpoint paths can be appended safely.
///
/// ```
/// use arkchat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://ark.cn-beijing.volces.com/api/v3/"), "https://ark.cn-beijing.volces.com/api/v3");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash.
///
/// ```
/// use arkchat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://ark.cn-beijing.volces.com/api/v3/", "/chat/completions"),
///     "https://ark.cn-beijing.volces.com/api/v3/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Substitute every `{region}` placeholder in a base URL template.
pub fn expand_region(template: &str, region: &str) -> String {
    template.replace("{region}", region.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://ark.cn-beijing.volces.com/api/v3"),
            "https://ark.cn-beijing.volces.com/api/v3"
        );
        assert_eq!(
            normalize_base_url("https://ark.cn-beijing.volces.com/api/v3///"),
            "https://ark.cn-beijing.volces.com/api/v3"
        );
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://127.0.0.1:9000/api/v3", "chat/completions"),
            "http://127.0.0.1:9000/api/v3/chat/completions"
        );
        assert_eq!(
            construct_api_url("http://127.0.0.1:9000/api/v3/", "///chat/completions"),
            "http://127.0.0.1:9000/api/v3/chat/completions"
        );
    }

    #[test]
    fn test_expand_region() {
        assert_eq!(
            expand_region("https://ark.{region}.volces.com/api/v3", "cn-shanghai"),
            "https://ark.cn-shanghai.volces.com/api/v3"
        );
        assert_eq!(
            expand_region("https://proxy.example.com/v3", "cn-beijing"),
            "https://proxy.example.com/v3"
        );
        assert_eq!(expand_region("{region}/{region}", " x "), "x/x");
    }
}
