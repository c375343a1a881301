use convert_case::{Case, Casing};

/// Maps a storage name to the class name of its generated model
pub trait Inflector: Send + Sync {
    fn classify(&self, storage: &str) -> String;
}

/// English inflector: singularizes the last word and PascalCases the result.
///
/// `abstract_comments` becomes `AbstractComment`, `schema_info` stays
/// `SchemaInfo`. A dotted prefix (`main.users`) is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultInflector;

impl Inflector for DefaultInflector {
    fn classify(&self, storage: &str) -> String {
        let table = storage.rsplit('.').next().unwrap_or(storage);
        let (head, last) = match table.rfind('_') {
            Some(idx) => (&table[..=idx], &table[idx + 1..]),
            None => ("", table),
        };
        format!("{}{}", head, singularize(last)).to_case(Case::Pascal)
    }
}

/// Singular form of one lowercase-or-mixed-case English word.
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let strip = |n: usize| word[..word.len() - n].to_string();

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", strip(3));
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return strip(2);
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return strip(1);
    }
    word.to_string()
}
