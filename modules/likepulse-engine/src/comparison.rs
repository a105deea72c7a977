//! Pairwise comparison and multi-way ranking of likability results.

use chrono::Utc;

use likepulse_common::{ComparisonResult, LikabilityResult, RankingEntry};

use crate::scoring::round1;

/// Compare two results. The winner has the strictly higher score; on a tie
/// the first-listed entity wins (deterministic tie-break). Field insights
/// are only emitted where the two sides actually differ.
pub fn compare(result1: &LikabilityResult, result2: &LikabilityResult) -> ComparisonResult {
    let first_leads = result1.score >= result2.score;
    let winner = if first_leads {
        result1.name.clone()
    } else {
        result2.name.clone()
    };
    let score_difference = round1((result1.score - result2.score).abs());

    let mut insights = Vec::new();
    insights.push(format!("{winner} leads by {score_difference:.1} points"));

    let news1 = result1.breakdown.news_sentiment;
    let news2 = result2.breakdown.news_sentiment;
    if news1 > news2 {
        insights.push(format!(
            "{} has better news coverage (+{:.0})",
            result1.name,
            news1 - news2
        ));
    } else if news2 > news1 {
        insights.push(format!(
            "{} has better news coverage (+{:.0})",
            result2.name,
            news2 - news1
        ));
    }

    let reddit1 = result1.breakdown.reddit_sentiment;
    let reddit2 = result2.breakdown.reddit_sentiment;
    if reddit1 > reddit2 {
        insights.push(format!(
            "{} has stronger social media support (+{:.0})",
            result1.name,
            reddit1 - reddit2
        ));
    } else if reddit2 > reddit1 {
        insights.push(format!(
            "{} has stronger social media support (+{:.0})",
            result2.name,
            reddit2 - reddit1
        ));
    }

    let (leading, trailing) = if first_leads {
        (result1, result2)
    } else {
        (result2, result1)
    };

    let mut recommendations = Vec::new();
    if trailing.breakdown.news_sentiment < leading.breakdown.news_sentiment {
        recommendations.push(format!(
            "{} should focus on improving news media presence",
            trailing.name
        ));
    }
    if trailing.breakdown.reddit_sentiment < leading.breakdown.reddit_sentiment {
        recommendations.push(format!(
            "{} should increase social media engagement",
            trailing.name
        ));
    }
    if trailing.breakdown.engagement < leading.breakdown.engagement {
        recommendations.push(format!(
            "{} should generate more public discussion and engagement",
            trailing.name
        ));
    }
    for weakness in trailing.weaknesses.iter().take(2) {
        recommendations.push(format!("Address: {weakness}"));
    }

    ComparisonResult {
        politician1: result1.clone(),
        politician2: result2.clone(),
        ai_analysis: format!(
            "{winner} has higher likability with a {score_difference:.1} point lead."
        ),
        winner,
        score_difference,
        comparison_insights: insights,
        recommendations,
        analyzed_at: Utc::now(),
    }
}

/// Rank 3+ results by score, descending. Equal scores keep input order.
pub fn rank(results: &[LikabilityResult]) -> Vec<RankingEntry> {
    let mut sorted: Vec<&LikabilityResult> = results.iter().collect();
    sorted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, result)| RankingEntry {
            rank: i + 1,
            name: result.name.clone(),
            score: result.score,
        })
        .collect()
}
