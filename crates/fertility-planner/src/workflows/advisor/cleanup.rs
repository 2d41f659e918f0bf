//! Best-effort repair of model output before JSON parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z]*").expect("code fence pattern compiles"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma pattern compiles"));

#[derive(Debug, thiserror::Error)]
pub enum ModelJsonError {
    #[error("model output contains no JSON object")]
    NoObject,
    #[error("model output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Strip code fences, keep the outermost `{...}` and drop trailing commas.
pub fn clean_model_json(raw: &str) -> String {
    let unfenced = CODE_FENCE.replace_all(raw, "");
    let object = outermost_object(&unfenced).unwrap_or_else(|| unfenced.trim());
    TRAILING_COMMA.replace_all(object, "$1").into_owned()
}

pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, ModelJsonError> {
    let cleaned = clean_model_json(raw);
    if !cleaned.starts_with('{') {
        return Err(ModelJsonError::NoObject);
    }
    Ok(serde_json::from_str(&cleaned)?)
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
