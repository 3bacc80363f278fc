use scraper::ElementRef;
use unicode_normalization::UnicodeNormalization;

/// Replaces non-breaking spaces with plain ones and trims the result.
pub fn clean_text(text: &str) -> String {
    text.replace('\u{a0}', " ").trim().to_string()
}

/// Cleans a characteristic title and puts it in canonical composed form.
///
/// Titles are used verbatim as column names, so `"é"` written as `e` + combining
/// accent must end up as the same key as the precomposed character.
pub fn normalize_title(title: &str) -> String {
    clean_text(title).nfc().collect()
}

/// Joins trimmed fragments with single spaces, skipping the blank ones.
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text nodes that are direct children of `elem`, in document order.
pub fn own_texts<'a>(elem: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    elem.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
}

/// First direct text node found among `elems`, skipping blank ones.
pub fn first_own_text<'a, I>(elems: I) -> Option<&'a str>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    elems
        .into_iter()
        .flat_map(own_texts)
        .find(|text| !text.trim().is_empty())
}
