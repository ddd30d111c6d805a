use cartlist::client::ALL_CATEGORIES;

/// Suggests existing categories for the category field.
#[derive(Default)]
pub struct Autocompleter;

impl Autocompleter {
    pub fn new() -> Self {
        Self
    }

    /// Categories starting with `input`, case-insensitively. The filter-only
    /// `"All"` entry and an exact match of the input are left out.
    pub fn get_suggestions(&self, input: &str, categories: &[String]) -> Vec<String> {
        let input = input.trim();
        if input.is_empty() {
            return Vec::new();
        }
        let input_lower = input.to_lowercase();

        let mut suggestions: Vec<String> = categories
            .iter()
            .filter(|category| category.as_str() != ALL_CATEGORIES)
            .filter(|category| category.as_str() != input)
            .filter(|category| category.to_lowercase().starts_with(&input_lower))
            .cloned()
            .collect();

        suggestions.sort();
        suggestions.dedup();
        suggestions
    }
}
