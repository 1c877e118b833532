/// Desktop Chrome 132 on Windows. The upstream site serves the full
/// `__NEXT_DATA__` payload to this agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36";

/// Client-hint brand list matching [`USER_AGENT`].
pub(crate) const SEC_CH_UA: &str =
    r#""Not A(Brand";v="8", "Chromium";v="132", "Google Chrome";v="132""#;

pub fn get_user_agent() -> &'static str {
    USER_AGENT
}
