use super::query::validate;
use regex::RegexBuilder;

/// Wrap every case-insensitive occurrence of the sanitized `query` in
/// `<mark>` tags. Invalid queries leave `text` untouched.
pub fn highlight_matches(text: &str, query: &str) -> String {
    let query = match validate(query) {
        Ok(query) => query,
        Err(_) => return text.to_string(),
    };

    match RegexBuilder::new(&regex::escape(query.as_str()))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(text, "<mark>${0}</mark>").into_owned(),
        Err(_) => text.to_string(),
    }
}
