use serde::{Deserialize, Deserializer, Serialize};

/// Root of a Next.js `__NEXT_DATA__` document.
#[derive(Serialize, Deserialize, Debug)]
pub struct NextData<P> {
    pub props: Props<P>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Props<P> {
    pub page_props: P,
}

/// Listing ids are strings on most country sites but have been seen as
/// bare numbers; both are accepted and kept as text.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
