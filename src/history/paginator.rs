use crate::feeds::{RawRecord, Record, TimelineFetcher};
use anyhow::{Context, Result};
use std::collections::HashSet;

/// Every reachable tweet for one account, without duplicates.
#[derive(Debug, Clone)]
pub struct IdentityHistory {
    pub identity: String,
    pub records: Vec<Record>,
    pub pages: usize,
}

fn min_id(page: &[RawRecord]) -> Option<u64> {
    page.iter().map(|r| r.id).min()
}

/// Walk an account's timeline backwards with `max_id` until it is exhausted.
///
/// Stops on an empty page, or when a page fails to move the cursor below the
/// previous minimum id (the boundary tweet being returned on its own again).
/// Fetch errors are not retried.
pub async fn collect_history(
    fetcher: &dyn TimelineFetcher,
    identity: &str,
) -> Result<IdentityHistory> {
    let mut raw = fetcher.fetch_page(identity, None).await?;
    let mut pages = 1;
    let mut cursor = min_id(&raw);

    while let Some(max_id) = cursor {
        let page = fetcher.fetch_page(identity, Some(max_id)).await?;
        pages += 1;

        if page.is_empty() {
            break;
        }

        let next = min_id(&page);
        raw.extend(page);

        match next {
            Some(id) if id < max_id => cursor = Some(id),
            _ => break,
        }
    }

    // max_id is inclusive, so boundary tweets show up on two pages
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());
    for item in raw {
        if seen.insert(item.id) {
            records.push(Record::from_raw(item)?);
        }
    }

    Ok(IdentityHistory {
        identity: identity.to_string(),
        records,
        pages,
    })
}

/// Fetch each account in turn. A failure is kept against its account and
/// does not stop the remaining ones. Screen names ignore case, so an account
/// repeated in any spelling is fetched once, under its first spelling.
pub async fn collect_all(
    fetcher: &dyn TimelineFetcher,
    identities: &[String],
) -> Vec<(String, Result<IdentityHistory>)> {
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for identity in identities {
        if !seen.insert(identity.to_lowercase()) {
            continue;
        }

        eprintln!("Fetching tweets for @{}...", identity);
        let result = collect_history(fetcher, identity)
            .await
            .with_context(|| format!("Failed to fetch tweets for @{}", identity));

        match &result {
            Ok(history) => eprintln!(
                "Fetched {} tweets for @{} in {} requests",
                history.records.len(),
                identity,
                history.pages
            ),
            Err(e) => eprintln!("{:#}", e),
        }

        results.push((identity.clone(), result));
    }

    results
}
