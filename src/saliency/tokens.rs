/// Lowercase alphabetic word tokens of a caption.
///
/// Splits on whitespace, trims surrounding punctuation, cuts clitics at the
/// first apostrophe (`dog's` becomes `dog`), and drops anything left that
/// is not purely alphabetic (`3`, `t-shirt`, `b&w`).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()))
        .map(|word| word.split(['\'', '’']).next().unwrap_or_default())
        .filter(|word| !word.is_empty())
        .filter(|word| word.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}
