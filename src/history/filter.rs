use crate::feeds::Record;

/// Keep records whose text contains at least one keyword, ignoring case.
///
/// Keywords are ORed: a tweet only has to mention one of them. No keywords
/// keeps everything. Order is preserved.
pub fn filter_records(records: Vec<Record>, keywords: &[String]) -> Vec<Record> {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    if needles.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|record| matches_any(&record.text, &needles))
        .collect()
}

fn matches_any(text: &str, needles: &[String]) -> bool {
    let haystack = text.to_lowercase();
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
