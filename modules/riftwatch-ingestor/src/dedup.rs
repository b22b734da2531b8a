use std::collections::HashMap;

use riftwatch_common::{fingerprint, Article};

/// Deduplicate a cycle's candidate articles by content fingerprint. Groups
/// are formed across sources; the first article seen in each group becomes
/// the representative, with `source_count` set to the number of distinct
/// `source` values in its group and `veracity_score = min(1, 0.5 *
/// source_count)`. When more than one source corroborates a story but the
/// veracity score still falls short of the verified threshold, the
/// representative is flagged for manual verification.
pub fn dedup_articles(mut articles: Vec<Article>) -> Vec<Article> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();

    for (idx, article) in articles.iter().enumerate() {
        let fp = fingerprint(&format!("{}{}", article.title, article.content));
        let bucket = groups.entry(fp.clone()).or_insert_with(|| {
            order.push(fp.clone());
            Vec::new()
        });
        bucket.push(idx);
    }

    let mut representatives = Vec::with_capacity(order.len());
    for fp in order {
        let indices = &groups[&fp];
        let representative_idx = indices[0];
        let distinct_sources: std::collections::HashSet<&str> = indices
            .iter()
            .map(|&i| articles[i].source.as_str())
            .collect();
        let source_count = distinct_sources.len() as u32;
        let veracity_score = (0.5 * source_count as f64).min(1.0);

        let mut representative = articles[representative_idx].clone();
        representative.fingerprint = fp;
        representative.source_count = source_count;
        representative.veracity_score = veracity_score;
        if source_count > 1 && veracity_score < 0.8 {
            representative.features.verification_needed = true;
        }
        representatives.push(representative);
    }

    articles.clear();
    representatives
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use riftwatch_common::Features;

    fn article(source: &str, url: &str, title: &str, content: &str) -> Article {
        Article {
            title: title.to_string(),
            content: content.to_string(),
            source: source.to_string(),
            url: url.to_string(),
            scraped_at: Utc::now(),
            published_at: None,
            author: None,
            tags: vec![],
            features: Features::default(),
            fingerprint: String::new(),
            veracity_score: 0.0,
            source_count: 1,
        }
    }

    #[test]
    fn two_sources_same_content_dedup_to_one_with_veracity_one() {
        let articles = vec![
            article("Source A", "https://a.example.com/1", "Clash", "There was a clash"),
            article("Source B", "https://b.example.com/1", "Clash", "There was a clash"),
        ];
        let result = dedup_articles(articles);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source_count, 2);
        assert_eq!(result[0].veracity_score, 1.0);
        assert!(!result[0].features.verification_needed);
    }

    #[test]
    fn distinct_content_is_not_merged() {
        let articles = vec![
            article("Source A", "https://a.example.com/1", "Clash in Ikeja", "Body one"),
            article("Source B", "https://b.example.com/2", "Flood in Epe", "Body two"),
        ];
        let result = dedup_articles(articles);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].source_count, 1);
        assert_eq!(result[0].veracity_score, 0.5);
    }

    #[test]
    fn same_source_duplicate_does_not_raise_source_count() {
        let articles = vec![
            article("Source A", "https://a.example.com/1", "Clash", "There was a clash"),
            article("Source A", "https://a.example.com/1-amp", "Clash", "There was a clash"),
        ];
        let result = dedup_articles(articles);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source_count, 1);
        assert_eq!(result[0].veracity_score, 0.5);
    }

    #[test]
    fn rerunning_dedup_on_already_deduped_set_is_a_no_op() {
        let articles = vec![
            article("Source A", "https://a.example.com/1", "Clash", "There was a clash"),
            article("Source B", "https://b.example.com/1", "Clash", "There was a clash"),
        ];
        let once = dedup_articles(articles);
        let twice = dedup_articles(once.clone());
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].fingerprint, twice[0].fingerprint);
    }
}
